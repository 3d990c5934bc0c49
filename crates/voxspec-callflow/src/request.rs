//! The generation request sent to a chat-completion model.

use voxspec_contracts::spec::CallFlowRequest;

/// Chat model used when no other is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Low temperature keeps the five-key shape stable across attempts.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Render the single user message that asks for a call flow.
pub fn render_generation_prompt(request: &CallFlowRequest) -> String {
    format!(
        "Generate a structured call flow for:
Business type: {business_type}
Agent role: {agent_role}
Objective: {objective}
Tone: {tone}
Constraints: {constraints}

Return strict JSON only, no markdown, matching this shape:
{{
  \"introduction\": \"string\",
  \"verification\": \"string\",
  \"purpose\": \"string\",
  \"information_gathering\": [\"string\", \"string\", ...],
  \"closing\": \"string\"
}}",
        business_type = request.business_type,
        agent_role = request.agent_role,
        objective = request.objective,
        tone = request.tone,
        constraints = request.constraints.join("; "),
    )
}
