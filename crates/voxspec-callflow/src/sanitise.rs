//! Untyped model reply → typed `CallFlow`.
//!
//! Parsing is strict about the outer shape (the reply must contain a JSON
//! object) and lenient about the inside: a missing or mistyped field becomes
//! an empty string or list and is recorded as a note. An incomplete result
//! is left for the builder's completeness check to catch.

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use voxspec_contracts::{
    error::{VoxspecError, VoxspecResult},
    spec::CallFlow,
};

/// A parsed call flow plus every coercion applied to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitisedCallFlow {
    pub call_flow: CallFlow,
    /// Schema violations found in the raw object, one per line. Empty when
    /// the reply matched the expected shape exactly.
    pub notes: Vec<String>,
}

/// JSON Schema of the object the generation prompt asks for.
pub fn call_flow_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "introduction": { "type": "string" },
            "verification": { "type": "string" },
            "purpose": { "type": "string" },
            "information_gathering": { "type": "array", "items": { "type": "string" } },
            "closing": { "type": "string" }
        },
        "required": [
            "introduction",
            "verification",
            "purpose",
            "information_gathering",
            "closing"
        ]
    })
}

/// The span from the first `{` to the last `}`, or the whole trimmed text.
pub fn extract_json_object(raw: &str) -> &str {
    let trimmed = raw.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

/// Parse a model reply into a call flow.
///
/// Returns `VoxspecError::CallFlowParse` when the reply holds no JSON or the
/// JSON is not an object.
pub fn sanitise_call_flow_response(raw: &str) -> VoxspecResult<SanitisedCallFlow> {
    let candidate = extract_json_object(raw);
    let parsed: Value = serde_json::from_str(candidate).map_err(|e| VoxspecError::CallFlowParse {
        reason: format!("reply is not valid JSON: {e}"),
    })?;

    let Value::Object(object) = &parsed else {
        return Err(VoxspecError::CallFlowParse {
            reason: format!("expected a JSON object, got {}", kind_of(&parsed)),
        });
    };

    let notes = schema_notes(&parsed);
    for note in &notes {
        warn!(%note, "coercing call flow reply");
    }

    let call_flow = CallFlow {
        introduction: string_field(object, "introduction"),
        verification: string_field(object, "verification"),
        purpose: string_field(object, "purpose"),
        information_gathering: list_field(object, "information_gathering"),
        closing: string_field(object, "closing"),
    };

    debug!(
        questions = call_flow.information_gathering.len(),
        complete = call_flow.is_complete(),
        "call flow reply parsed"
    );

    Ok(SanitisedCallFlow { call_flow, notes })
}

fn schema_notes(instance: &Value) -> Vec<String> {
    match jsonschema::validator_for(&call_flow_schema()) {
        Ok(validator) => validator
            .iter_errors(instance)
            .map(|error| {
                let path = error.instance_path.to_string();
                let at = if path.is_empty() { "/".to_string() } else { path };
                format!("{at}: {error}")
            })
            .collect(),
        Err(e) => vec![format!("call flow schema did not compile: {e}")],
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

fn list_field(object: &Map<String, Value>, key: &str) -> Vec<String> {
    match object.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
