//! Block selection and prompt assembly.

use std::collections::HashSet;

use voxspec_contracts::harness::{
    Capabilities, CaptureMode, Failures, NoiseTolerance, TopologyBlockId,
};

use crate::blocks::block_text;

/// First paragraph of every harness prompt.
pub const PROMPT_PREFIX: &str = "You are a voice logistics dispatch agent.";

/// Last paragraph of every harness prompt.
pub const PROMPT_SUFFIX: &str = "Maintain deterministic capture before execution.";

/// Pick topology blocks in fixed priority order, each at most once.
pub fn select_blocks(caps: &Capabilities, failures: &Failures) -> Vec<TopologyBlockId> {
    let candidates = [
        (
            caps.capture_mode == CaptureMode::Symbolic,
            &[TopologyBlockId::SymbolCapture, TopologyBlockId::PhoneticRule][..],
        ),
        (failures.semantic_normalization, &[TopologyBlockId::ExecutionGate][..]),
        (
            caps.noise_tolerance == NoiseTolerance::High,
            &[TopologyBlockId::NoiseRecovery][..],
        ),
        (caps.execution_dependency, &[TopologyBlockId::ToolAlignment][..]),
        (caps.confirmation_required, &[TopologyBlockId::Readback][..]),
    ];

    let mut seen = HashSet::new();
    let mut selected = Vec::new();
    for (on, ids) in candidates {
        if !on {
            continue;
        }
        for &id in ids {
            if seen.insert(id) {
                selected.push(id);
            }
        }
    }
    selected
}

/// Ordered, trimmed block texts for `caps` and `failures`.
pub fn build_prompt(caps: &Capabilities, failures: &Failures) -> Vec<String> {
    select_blocks(caps, failures)
        .into_iter()
        .map(|id| block_text(id).trim().to_string())
        .collect()
}

/// Join prefix, non-empty blocks, and suffix with blank lines.
pub fn compile_prompt<S: AsRef<str>>(blocks: &[S]) -> String {
    let mut parts = Vec::with_capacity(blocks.len() + 2);
    parts.push(PROMPT_PREFIX);
    parts.extend(
        blocks
            .iter()
            .map(|b| b.as_ref().trim())
            .filter(|b| !b.is_empty()),
    );
    parts.push(PROMPT_SUFFIX);
    parts.join("\n\n").trim().to_string()
}
