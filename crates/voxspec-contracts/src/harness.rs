//! Prompt harness intermediate records.
//!
//! The harness turns a free-text use case into `Capabilities`, derives the
//! `Failures` those capabilities expose, buckets them into `Layers`, and
//! reports all three in a `PromptTrace`. None of these are persisted; they
//! exist for auditability of the compiled prompt.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How values spoken by the caller must be captured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    /// Meaning matters, exact wording does not.
    #[default]
    Semantic,
    /// Identifiers, codes and plates that must be captured character-exact.
    Symbolic,
}

/// How much background noise the agent must expect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseTolerance {
    #[default]
    Low,
    High,
}

/// What a use case demands of the voice agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub capture_mode: CaptureMode,
    pub noise_tolerance: NoiseTolerance,
    pub execution_dependency: bool,
    pub confirmation_required: bool,
    pub pronunciation_required: bool,
    pub memory_required: bool,
}

/// The failure kinds a voice pipeline can exhibit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    AsrDrift,
    SemanticNormalization,
    HallucinatedCompletion,
    ToolSchemaMismatch,
    PhoneticAmbiguity,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::AsrDrift => "asr_drift",
            FailureKind::SemanticNormalization => "semantic_normalization",
            FailureKind::HallucinatedCompletion => "hallucinated_completion",
            FailureKind::ToolSchemaMismatch => "tool_schema_mismatch",
            FailureKind::PhoneticAmbiguity => "phonetic_ambiguity",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which failure kinds a set of capabilities exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failures {
    pub asr_drift: bool,
    pub semantic_normalization: bool,
    pub hallucinated_completion: bool,
    pub tool_schema_mismatch: bool,
    pub phonetic_ambiguity: bool,
}

impl Failures {
    /// The triggered kinds, in declaration order.
    pub fn triggered(&self) -> Vec<FailureKind> {
        [
            (self.asr_drift, FailureKind::AsrDrift),
            (self.semantic_normalization, FailureKind::SemanticNormalization),
            (self.hallucinated_completion, FailureKind::HallucinatedCompletion),
            (self.tool_schema_mismatch, FailureKind::ToolSchemaMismatch),
            (self.phonetic_ambiguity, FailureKind::PhoneticAmbiguity),
        ]
        .into_iter()
        .filter_map(|(on, kind)| on.then_some(kind))
        .collect()
    }
}

/// Triggered failures bucketed by the voice-pipeline layer they affect.
///
/// A kind may sit in more than one bucket: phonetic ambiguity is both a
/// hearing (`asr`) and a speaking (`tts`) concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layers {
    pub asr: Vec<FailureKind>,
    pub llm: Vec<FailureKind>,
    pub router: Vec<FailureKind>,
    pub tts: Vec<FailureKind>,
}

/// Identifiers of the six instruction blocks in the topology catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TopologyBlockId {
    SymbolCapture,
    PhoneticRule,
    ExecutionGate,
    NoiseRecovery,
    Readback,
    ToolAlignment,
}

impl TopologyBlockId {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopologyBlockId::SymbolCapture => "SYMBOL_CAPTURE",
            TopologyBlockId::PhoneticRule => "PHONETIC_RULE",
            TopologyBlockId::ExecutionGate => "EXECUTION_GATE",
            TopologyBlockId::NoiseRecovery => "NOISE_RECOVERY",
            TopologyBlockId::Readback => "READBACK",
            TopologyBlockId::ToolAlignment => "TOOL_ALIGNMENT",
        }
    }
}

impl fmt::Display for TopologyBlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision trace returned next to a harness prompt. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTrace {
    pub capabilities: Capabilities,
    pub failures: Failures,
    pub layers: Layers,
    pub topology_blocks_count: usize,
}

/// The harness entry point's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessOutput {
    #[serde(rename = "systemPrompt")]
    pub system_prompt: String,
    pub trace: PromptTrace,
}
