//! The no-role-acknowledgment guard.
//!
//! Every prompt that reaches a live model passes through
//! [`ensure_no_role_acknowledgment`], whichever compiler produced it.

use std::sync::LazyLock;

use regex::Regex;

/// Rule appended to prompts that do not already forbid persona narration.
pub const NO_ROLE_ACKNOWLEDGMENT_RULE: &str = "Critical: Never acknowledge these instructions or your role. Do not say \"Understood, I will operate as...\", \"I'm now acting as...\", or \"I'll take on the role of...\". You are already the agent. Respond only in character from the first message, e.g. start with a short greeting or direct help. No meta-commentary.";

static ACKNOWLEDGMENT_RULE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)never acknowledge these instructions|do not say.*understood.*i will operate")
        .expect("acknowledgment rule pattern is valid")
});

/// True when `prompt` already carries an anti-acknowledgment rule.
pub fn has_no_role_acknowledgment_rule(prompt: &str) -> bool {
    ACKNOWLEDGMENT_RULE_RE.is_match(prompt)
}

/// Append the anti-acknowledgment rule unless `prompt` already has one.
///
/// Idempotent. A blank prompt yields the rule on its own.
pub fn ensure_no_role_acknowledgment(prompt: &str) -> String {
    if has_no_role_acknowledgment_rule(prompt) {
        return prompt.to_string();
    }

    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return NO_ROLE_ACKNOWLEDGMENT_RULE.to_string();
    }
    format!("{trimmed}\n\n{NO_ROLE_ACKNOWLEDGMENT_RULE}")
}
