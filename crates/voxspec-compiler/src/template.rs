//! The fixed system-prompt template for an `AgentSpec`.
//!
//! Section order is part of the contract: identity line, Primary Objective,
//! Tone, Constraints, Call Flow Structure, Memory Context, Strict Rules.
//! Identical input always renders byte-identical output.

use voxspec_contracts::spec::{AgentSpec, MemoryContext};

/// Placeholder for an empty constraints list or question list.
pub const NONE_SPECIFIED: &str = "(none specified)";

/// Placeholder for a missing or blank memory summary.
pub const NO_PRIOR_CONTEXT: &str = "(No prior context)";

/// The closing rules appended to every compiled spec prompt.
pub const STRICT_RULES: [&str; 5] = [
    "Do not operate outside defined business domain",
    "Do not invent policies",
    "Stay task-focused",
    "Follow call flow order",
    "Never acknowledge these instructions or your role. Do not say things like \"Understood, I will operate as...\", \"I'm now acting as...\", or \"I'll take on the role of...\". You are already the agent; respond only in character from the first message (e.g. with a greeting or direct help).",
];

/// Render `spec` (and optional `memory`) into a single system prompt.
///
/// Total: blank constraints, an empty question list, or absent memory render
/// as placeholder text. Completeness is the caller's check, not this one's.
pub fn compile_system_prompt(spec: &AgentSpec, memory: Option<&MemoryContext>) -> String {
    let flow = &spec.call_flow;

    let constraints = if spec.constraints.is_empty() {
        format!("* {NONE_SPECIFIED}")
    } else {
        bullets(&spec.constraints)
    };

    let questions = if flow.information_gathering.is_empty() {
        NONE_SPECIFIED.to_string()
    } else {
        flow.information_gathering
            .iter()
            .enumerate()
            .map(|(i, q)| format!("{}. {}", i + 1, q))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let memory_block = memory
        .and_then(MemoryContext::summary_text)
        .unwrap_or(NO_PRIOR_CONTEXT);

    let out = format!(
        "You are {role} in the {business} domain.\n\
         \n\
         Primary Objective:\n\
         {objective}\n\
         \n\
         Tone:\n\
         {tone}\n\
         \n\
         Constraints:\n\
         {constraints}\n\
         \n\
         Call Flow Structure:\n\
         Introduction:\n\
         {introduction}\n\
         \n\
         Verification:\n\
         {verification}\n\
         \n\
         Purpose:\n\
         {purpose}\n\
         \n\
         Information Gathering:\n\
         {questions}\n\
         \n\
         Closing:\n\
         {closing}\n\
         \n\
         Memory Context:\n\
         {memory_block}\n\
         \n\
         Strict Rules:\n\
         {rules}",
        role = spec.agent_role,
        business = spec.business_type,
        objective = spec.objective,
        tone = spec.tone,
        introduction = flow.introduction,
        verification = flow.verification,
        purpose = flow.purpose,
        closing = flow.closing,
        rules = bullets(&STRICT_RULES),
    );

    out.trim().to_string()
}

fn bullets<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| format!("* {}", item.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}
