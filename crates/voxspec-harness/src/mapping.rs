//! Capability → failure → layer mapping.

use voxspec_contracts::harness::{
    Capabilities, CaptureMode, FailureKind, Failures, Layers, NoiseTolerance,
};

/// The failure kinds `caps` exposes.
pub fn map_failures(caps: &Capabilities) -> Failures {
    Failures {
        asr_drift: caps.noise_tolerance == NoiseTolerance::High,
        semantic_normalization: caps.capture_mode == CaptureMode::Semantic
            || caps.execution_dependency,
        hallucinated_completion: caps.execution_dependency,
        tool_schema_mismatch: caps.execution_dependency,
        phonetic_ambiguity: caps.capture_mode == CaptureMode::Symbolic,
    }
}

/// Bucket the triggered kinds by pipeline layer.
pub fn map_layers(failures: &Failures) -> Layers {
    let mut layers = Layers::default();

    for kind in failures.triggered() {
        match kind {
            FailureKind::AsrDrift => layers.asr.push(kind),
            FailureKind::SemanticNormalization | FailureKind::HallucinatedCompletion => {
                layers.llm.push(kind)
            }
            FailureKind::ToolSchemaMismatch => layers.router.push(kind),
            FailureKind::PhoneticAmbiguity => {
                layers.asr.push(kind);
                layers.tts.push(kind);
            }
        }
    }

    layers
}
