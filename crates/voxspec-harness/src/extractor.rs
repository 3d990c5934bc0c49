//! Use case → `Capabilities`.

use voxspec_contracts::harness::{Capabilities, CaptureMode, NoiseTolerance};

use crate::keywords::{contains_any, KeywordTable};

/// Classify `use_case` against `keywords`.
///
/// Matching is case-insensitive substring membership on the trimmed text, so
/// short keywords such as `"id"` also fire inside longer words. Pronunciation
/// is always required when capture is symbolic.
pub fn extract_capabilities(use_case: &str, keywords: &KeywordTable) -> Capabilities {
    let text = use_case.trim().to_lowercase();

    let symbolic = contains_any(&text, &keywords.symbolic);

    Capabilities {
        capture_mode: if symbolic {
            CaptureMode::Symbolic
        } else {
            CaptureMode::Semantic
        },
        noise_tolerance: if contains_any(&text, &keywords.noisy) {
            NoiseTolerance::High
        } else {
            NoiseTolerance::Low
        },
        execution_dependency: contains_any(&text, &keywords.execution),
        confirmation_required: contains_any(&text, &keywords.confirmation),
        pronunciation_required: symbolic || contains_any(&text, &keywords.pronunciation),
        memory_required: contains_any(&text, &keywords.memory),
    }
}
