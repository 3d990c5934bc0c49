//! The builder interview as pure functions over `collected_data`.
//!
//! Nothing here trusts the stored `current_step`. The step a session is on
//! is always recomputed from which fields are filled, so a session whose
//! data was edited elsewhere picks up at the first missing field.

use voxspec_contracts::{
    builder::{BuilderState, BuilderStatus, BuilderStep},
    spec::PartialAgentSpec,
};

/// Reply for a finished (or already completed) build.
pub const COMPLETE_QUESTION: &str = "Agent build is complete.";

/// The canned question for `step`.
pub fn question_for(step: BuilderStep) -> &'static str {
    match step {
        BuilderStep::CollectBusinessType => {
            "What is the business type or industry for this agent? (e.g. banking, travel, healthcare)"
        }
        BuilderStep::CollectAgentRole => {
            "What is the agent's role or job title? (e.g. loan advisor, travel consultant)"
        }
        BuilderStep::CollectObjective => {
            "What is the primary objective of this agent in one sentence?"
        }
        BuilderStep::CollectTone => {
            "What tone should the agent use? (e.g. professional and warm, concise and factual)"
        }
        BuilderStep::CollectConstraints => {
            "List any strict constraints, one per line, or say 'none' to skip."
        }
        BuilderStep::GenerateCallFlow => "Generating call flow from your inputs...",
        BuilderStep::Complete => COMPLETE_QUESTION,
    }
}

/// The first step whose field is still missing.
///
/// Scalars count as missing when absent or blank. Constraints count as
/// missing only when absent; an empty list is an answer. With everything
/// collected the result is `Complete` if the call flow is complete and
/// `GenerateCallFlow` otherwise.
pub fn effective_step(data: &PartialAgentSpec) -> BuilderStep {
    let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());

    if blank(&data.business_type) {
        return BuilderStep::CollectBusinessType;
    }
    if blank(&data.agent_role) {
        return BuilderStep::CollectAgentRole;
    }
    if blank(&data.objective) {
        return BuilderStep::CollectObjective;
    }
    if blank(&data.tone) {
        return BuilderStep::CollectTone;
    }
    if data.constraints.is_none() {
        return BuilderStep::CollectConstraints;
    }

    match &data.call_flow {
        Some(flow) if flow.is_complete() => BuilderStep::Complete,
        _ => BuilderStep::GenerateCallFlow,
    }
}

/// The step after `step` in interview order. `Complete` is terminal.
pub fn next_step(step: BuilderStep) -> BuilderStep {
    BuilderStep::ORDER
        .iter()
        .position(|s| *s == step)
        .and_then(|i| BuilderStep::ORDER.get(i + 1))
        .copied()
        .unwrap_or(BuilderStep::Complete)
}

/// What to ask the user next.
pub fn next_builder_question(state: &BuilderState) -> &'static str {
    if state.status == BuilderStatus::Completed || state.current_step == BuilderStep::Complete {
        return COMPLETE_QUESTION;
    }
    question_for(effective_step(&state.collected_data))
}

/// Split a constraints answer into individual rules.
///
/// "none", "no" and "n/a" (any case) mean "no constraints" and yield an empty
/// list. Otherwise each non-blank line becomes one rule with a leading `-` or
/// `*` bullet removed.
pub fn parse_constraints_input(text: &str) -> Vec<String> {
    let normalized = text.trim().to_lowercase();
    if matches!(normalized.as_str(), "none" | "no" | "n/a") {
        return Vec::new();
    }

    text.split(['\n', '\r'])
        .map(|line| {
            let line = line.trim_start();
            line.strip_prefix(['-', '*']).unwrap_or(line).trim()
        })
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Store `answer` in the field `step` collects.
///
/// Returns `false` for the two steps that collect nothing from the user.
pub fn apply_answer(data: &mut PartialAgentSpec, step: BuilderStep, answer: &str) -> bool {
    let answer = answer.trim();
    match step {
        BuilderStep::CollectBusinessType => data.business_type = Some(answer.to_string()),
        BuilderStep::CollectAgentRole => data.agent_role = Some(answer.to_string()),
        BuilderStep::CollectObjective => data.objective = Some(answer.to_string()),
        BuilderStep::CollectTone => data.tone = Some(answer.to_string()),
        BuilderStep::CollectConstraints => {
            data.constraints = Some(parse_constraints_input(answer))
        }
        BuilderStep::GenerateCallFlow | BuilderStep::Complete => return false,
    }
    true
}
