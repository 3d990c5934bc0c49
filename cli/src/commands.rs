//! Subcommand implementations.
//!
//! Each command returns the text to print so that `main` owns stdout.

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use voxspec_compiler::{
    compile_system_prompt, ensure_no_role_acknowledgment, extract_greeting_from_compiled_prompt,
};
use voxspec_contracts::{
    builder::{AgentId, BuilderStatus, BuilderStep},
    error::{VoxspecError, VoxspecResult},
    spec::{AgentSpec, MemoryContext},
};
use voxspec_core::{effective_step, AgentBuilder, AgentStore};
use voxspec_harness::PromptHarness;
use voxspec_openai::{OpenAiClient, OpenAiConfig};
use voxspec_store::{InMemoryAgentStore, InMemorySessionStore};

use crate::config::CliConfig;

// ── compile ───────────────────────────────────────────────────────────────────

/// Compile the spec at `spec_path`, guarded unless `unguarded`.
pub fn compile(spec_path: &Path, memory_path: Option<&Path>, unguarded: bool) -> VoxspecResult<String> {
    let spec: AgentSpec = read_json(spec_path, "agent spec")?;
    if !spec.is_complete() {
        return Err(VoxspecError::IncompleteSpec {
            reason: format!(
                "'{}' needs non-empty business_type, agent_role, objective and tone",
                spec_path.display()
            ),
        });
    }
    let memory: Option<MemoryContext> = memory_path
        .map(|p| read_json(p, "memory context"))
        .transpose()?;

    let prompt = compile_system_prompt(&spec, memory.as_ref());
    Ok(if unguarded {
        prompt
    } else {
        ensure_no_role_acknowledgment(&prompt)
    })
}

// ── harness ───────────────────────────────────────────────────────────────────

/// Load the harness, preferring `--keywords` over the config file entry.
pub fn load_harness(keywords: Option<&Path>, config: &CliConfig) -> VoxspecResult<PromptHarness> {
    match keywords.or(config.harness.keywords_file.as_deref()) {
        Some(path) => PromptHarness::from_file(path),
        None => Ok(PromptHarness::default()),
    }
}

pub fn harness(harness: &PromptHarness, use_case: &str, json: bool) -> VoxspecResult<String> {
    let output = harness.run(use_case);
    if json {
        serde_json::to_string_pretty(&output).map_err(|e| VoxspecError::Io {
            reason: format!("failed to serialise harness output: {e}"),
        })
    } else {
        Ok(output.system_prompt)
    }
}

// ── greeting ──────────────────────────────────────────────────────────────────

pub fn greeting(prompt_path: &Path) -> VoxspecResult<String> {
    let prompt = read_text(prompt_path)?;
    Ok(extract_greeting_from_compiled_prompt(&prompt))
}

// ── build ─────────────────────────────────────────────────────────────────────

/// Run an interactive build against OpenAI and return the agent as JSON.
pub fn build(config: &CliConfig, user_id: Option<String>) -> VoxspecResult<String> {
    let client = OpenAiClient::new(config.apply_to(OpenAiConfig::from_env()?))?;

    let agents = InMemoryAgentStore::new();
    let builder = AgentBuilder::new(
        Box::new(InMemorySessionStore::new()),
        Box::new(agents.clone()),
        Arc::new(client),
    )
    .with_policy(config.generation_policy());

    let stdin = std::io::stdin();
    let mut stderr = std::io::stderr();
    let agent_id = interview(&builder, user_id, stdin.lock(), &mut stderr)?;

    let record = agents.get(&agent_id)?.ok_or_else(|| VoxspecError::Store {
        reason: format!("agent '{agent_id}' missing after build"),
    })?;
    serde_json::to_string_pretty(&record).map_err(|e| VoxspecError::Io {
        reason: format!("failed to serialise agent: {e}"),
    })
}

/// Ask every builder question on `out` and read answers from `input` until
/// the build completes.
///
/// Constraints are read as a block terminated by an empty line. A failed
/// generation shows the error and asks the constraints question again. An
/// incomplete generated call flow is only regenerated after an empty line,
/// so every generator call is paid for by a line of input.
pub fn interview<R: BufRead, W: Write>(
    builder: &AgentBuilder,
    user_id: Option<String>,
    mut input: R,
    out: &mut W,
) -> VoxspecResult<AgentId> {
    let mut response = builder.start(user_id)?;
    let session_id = response.session.id;

    loop {
        if response.state().status == BuilderStatus::Completed {
            return response.agent_id.ok_or_else(|| VoxspecError::Store {
                reason: "completed session has no agent id".to_string(),
            });
        }

        let answer = match effective_step(&response.state().collected_data) {
            BuilderStep::CollectConstraints => {
                say(out, &response.question)?;
                say(out, "(finish with an empty line)")?;
                read_block(&mut input)?
            }
            BuilderStep::GenerateCallFlow => {
                say(out, "The generated call flow was incomplete.")?;
                say(out, "Press Enter to generate it again.")?;
                read_line(&mut input)?;
                say(out, &response.question)?;
                String::new()
            }
            _ => {
                say(out, &response.question)?;
                read_line(&mut input)?
            }
        };

        response = match builder.submit(&session_id, &answer) {
            Ok(next) => next,
            Err(
                e @ (VoxspecError::CallFlowGeneration { .. }
                | VoxspecError::CallFlowParse { .. }
                | VoxspecError::GenerationTimeout { .. }),
            ) => {
                warn!(session_id = %session_id, error = %e, "generation failed during interview");
                say(out, &format!("Call flow generation failed: {e}"))?;
                say(out, "Answer again to retry.")?;
                builder.inspect(&session_id)?
            }
            Err(e) => return Err(e),
        };
        info!(session_id = %session_id, step = %response.state().current_step, "interview advanced");
    }
}

fn say<W: Write>(out: &mut W, text: &str) -> VoxspecResult<()> {
    writeln!(out, "{text}").map_err(|e| VoxspecError::Io {
        reason: format!("failed to write prompt: {e}"),
    })
}

fn read_line<R: BufRead>(input: &mut R) -> VoxspecResult<String> {
    let mut line = String::new();
    let read = input.read_line(&mut line).map_err(|e| VoxspecError::Io {
        reason: format!("failed to read answer: {e}"),
    })?;
    if read == 0 {
        return Err(VoxspecError::Io {
            reason: "input closed before the build completed".to_string(),
        });
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn read_block<R: BufRead>(input: &mut R) -> VoxspecResult<String> {
    let mut lines = Vec::new();
    loop {
        let line = read_line(input)?;
        if line.trim().is_empty() {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

// ── File helpers ──────────────────────────────────────────────────────────────

fn read_text(path: &Path) -> VoxspecResult<String> {
    std::fs::read_to_string(path).map_err(|e| VoxspecError::Io {
        reason: format!("failed to read '{}': {e}", path.display()),
    })
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> VoxspecResult<T> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|e| VoxspecError::Io {
        reason: format!("'{}' is not a valid {what}: {e}", path.display()),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Mutex;

    use serde_json::json;
    use voxspec_contracts::spec::{CallFlow, CallFlowRequest};
    use voxspec_core::{CallFlowGenerator, GenerationPolicy, RetryPolicy};

    use super::*;

    /// Fails the first `failures` calls with a parse error, then succeeds.
    struct FlakyGenerator {
        failures: Mutex<u32>,
    }

    impl CallFlowGenerator for FlakyGenerator {
        fn generate(&self, request: &CallFlowRequest) -> VoxspecResult<CallFlow> {
            let mut left = self.failures.lock().unwrap();
            if *left > 0 {
                *left -= 1;
                return Err(VoxspecError::CallFlowParse {
                    reason: "prose".into(),
                });
            }
            Ok(CallFlow {
                introduction: format!("Welcome to {}.", request.business_type),
                verification: "Your name?".into(),
                purpose: request.objective.clone(),
                information_gathering: vec![],
                closing: "Bye.".into(),
            })
        }
    }

    /// Always answers with a call flow missing its verification line.
    struct IncompleteGenerator {
        calls: Arc<Mutex<u32>>,
    }

    impl CallFlowGenerator for IncompleteGenerator {
        fn generate(&self, request: &CallFlowRequest) -> VoxspecResult<CallFlow> {
            *self.calls.lock().unwrap() += 1;
            Ok(CallFlow {
                introduction: format!("Welcome to {}.", request.business_type),
                verification: String::new(),
                purpose: request.objective.clone(),
                information_gathering: vec![],
                closing: "Bye.".into(),
            })
        }
    }

    fn builder_with(failures: u32, agents: &InMemoryAgentStore) -> AgentBuilder {
        AgentBuilder::new(
            Box::new(InMemorySessionStore::new()),
            Box::new(agents.clone()),
            Arc::new(FlakyGenerator {
                failures: Mutex::new(failures),
            }),
        )
        .with_policy(GenerationPolicy {
            retry: RetryPolicy::none(),
            ..GenerationPolicy::default()
        })
    }

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("voxspec-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_interview_reads_constraint_block() {
        let agents = InMemoryAgentStore::new();
        let builder = builder_with(0, &agents);
        let input = "travel\ntravel consultant\nBook holidays\nupbeat\n- No visas advice\n- Quote in EUR\n\n";
        let mut out = Vec::new();

        let id = interview(&builder, None, Cursor::new(input), &mut out).unwrap();

        let record = agents.get(&id).unwrap().unwrap();
        assert_eq!(record.name, "travel - travel consultant");
        assert_eq!(record.spec.constraints, vec!["No visas advice", "Quote in EUR"]);
        let transcript = String::from_utf8(out).unwrap();
        assert!(transcript.contains("What is the business type or industry"));
        assert!(transcript.contains("(finish with an empty line)"));
    }

    #[test]
    fn test_interview_reasks_constraints_after_failed_generation() {
        let agents = InMemoryAgentStore::new();
        let builder = builder_with(1, &agents);
        let input = "retail\ncashier\nSell things\nfriendly\n- Be brief\n\n- Be polite\n\n";
        let mut out = Vec::new();

        let id = interview(&builder, None, Cursor::new(input), &mut out).unwrap();

        let record = agents.get(&id).unwrap().unwrap();
        assert_eq!(record.spec.constraints, vec!["Be polite"]);
        let transcript = String::from_utf8(out).unwrap();
        assert!(transcript.contains("Call flow generation failed"));
        assert_eq!(
            transcript.matches("List any strict constraints").count(),
            2
        );
    }

    #[test]
    fn test_interview_waits_for_input_before_regenerating() {
        let calls = Arc::new(Mutex::new(0u32));
        let agents = InMemoryAgentStore::new();
        let builder = AgentBuilder::new(
            Box::new(InMemorySessionStore::new()),
            Box::new(agents.clone()),
            Arc::new(IncompleteGenerator {
                calls: Arc::clone(&calls),
            }),
        )
        .with_policy(GenerationPolicy {
            retry: RetryPolicy::none(),
            ..GenerationPolicy::default()
        });
        let input = "retail\ncashier\nSell things\nfriendly\nnone\n\n\n\n";
        let mut out = Vec::new();

        let err = interview(&builder, None, Cursor::new(input), &mut out).unwrap_err();

        assert!(matches!(err, VoxspecError::Io { .. }));
        assert_eq!(*calls.lock().unwrap(), 3);
        assert!(agents.all().unwrap().is_empty());
        let transcript = String::from_utf8(out).unwrap();
        assert!(transcript.contains("The generated call flow was incomplete."));
    }

    #[test]
    fn test_interview_eof_is_io_error() {
        let agents = InMemoryAgentStore::new();
        let builder = builder_with(0, &agents);
        let mut out = Vec::new();

        let err = interview(&builder, None, Cursor::new("banking\n"), &mut out).unwrap_err();
        assert!(matches!(err, VoxspecError::Io { .. }));
        assert!(agents.all().unwrap().is_empty());
    }

    #[test]
    fn test_compile_command_guards_by_default() {
        let spec = json!({
            "business_type": "banking",
            "agent_role": "loan advisor",
            "objective": "Explain loan options",
            "tone": "calm",
            "constraints": [],
            "call_flow": {
                "introduction": "Hello from the bank.",
                "verification": "Date of birth?",
                "purpose": "Loans.",
                "information_gathering": [],
                "closing": "Goodbye."
            }
        });
        let spec_path = temp_file("spec.json", &spec.to_string());
        let memory_path = temp_file("memory.json", r#"{"summary": "Asked about mortgages."}"#);

        let guarded = compile(&spec_path, Some(&memory_path), false).unwrap();
        let raw = compile(&spec_path, Some(&memory_path), true).unwrap();

        assert!(guarded.starts_with("You are loan advisor in the banking domain."));
        assert!(guarded.contains("Memory Context:\nAsked about mortgages."));
        assert_eq!(guarded, ensure_no_role_acknowledgment(&raw));
    }

    #[test]
    fn test_compile_command_rejects_incomplete_spec() {
        let spec = json!({
            "business_type": "banking",
            "agent_role": "",
            "objective": "x",
            "tone": "y",
            "constraints": [],
            "call_flow": {
                "introduction": "a", "verification": "b", "purpose": "c",
                "information_gathering": [], "closing": "d"
            }
        });
        let path = temp_file("incomplete.json", &spec.to_string());
        assert!(matches!(
            compile(&path, None, false),
            Err(VoxspecError::IncompleteSpec { .. })
        ));
    }

    #[test]
    fn test_harness_command_json_shape() {
        let text = harness(&PromptHarness::default(), "confirm the plate number", true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(value["systemPrompt"]
            .as_str()
            .unwrap()
            .starts_with("You are a voice logistics dispatch agent."));
        assert_eq!(value["trace"]["capabilities"]["capture_mode"], "symbolic");
    }

    #[test]
    fn test_greeting_command() {
        let path = temp_file(
            "prompt.txt",
            "You are an agent.\n\nIntroduction:\nGood morning, Acme dispatch.\n",
        );
        assert_eq!(greeting(&path).unwrap(), "Good morning, Acme dispatch.");
        assert!(matches!(
            greeting(Path::new("/nonexistent/prompt.txt")),
            Err(VoxspecError::Io { .. })
        ));
    }
}
