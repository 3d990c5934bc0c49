//! The agent builder service.
//!
//! `AgentBuilder` drives one interview answer at a time:
//!
//!   load → apply answer → recompute step → [generate call flow] → persist
//!
//! The step is always recomputed from the collected data, so a submit never
//! trusts the stored pointer. Generation is the only step that can fail for
//! reasons outside the caller's input; when it does, the answer that led to
//! it is still persisted and the session waits at `generate_call_flow`.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use voxspec_compiler::{prompt_fingerprint, runtime_prompt};
use voxspec_contracts::{
    builder::{
        AgentId, AgentRecord, BuilderRequest, BuilderResponse, BuilderSession, BuilderState,
        BuilderStatus, BuilderStep, SessionId,
    },
    error::{VoxspecError, VoxspecResult},
    spec::{AgentSpec, CallFlowRequest},
};

use crate::{
    machine::{apply_answer, effective_step, next_builder_question, COMPLETE_QUESTION},
    retry::{generate_with_policy, GenerationPolicy},
    traits::{AgentStore, CallFlowGenerator, SessionStore},
};

/// Longest agent name stored on an `AgentRecord`.
pub const MAX_AGENT_NAME_CHARS: usize = 255;

/// Runs builder interviews against a session store, an agent store, and a
/// call-flow generator.
pub struct AgentBuilder {
    sessions: Box<dyn SessionStore>,
    agents: Box<dyn AgentStore>,
    generator: Arc<dyn CallFlowGenerator>,
    policy: GenerationPolicy,
}

impl AgentBuilder {
    pub fn new(
        sessions: Box<dyn SessionStore>,
        agents: Box<dyn AgentStore>,
        generator: Arc<dyn CallFlowGenerator>,
    ) -> Self {
        Self {
            sessions,
            agents,
            generator,
            policy: GenerationPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: GenerationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Dispatch a `{action: start|submit}` request.
    pub fn handle(&self, request: BuilderRequest) -> VoxspecResult<BuilderResponse> {
        match request {
            BuilderRequest::Start { user_id } => self.start(user_id),
            BuilderRequest::Submit {
                session_id: Some(id),
                message,
            } => self.submit(&id, &message),
            BuilderRequest::Submit {
                session_id: None, ..
            } => Err(VoxspecError::MissingSessionId),
        }
    }

    /// Open a new session at the first step.
    pub fn start(&self, user_id: Option<String>) -> VoxspecResult<BuilderResponse> {
        let session = BuilderSession::start(user_id);
        self.sessions.save(&session)?;

        info!(session_id = %session.id, "builder session started");

        Ok(respond(session))
    }

    /// The stored session with its next question. Read-only.
    pub fn inspect(&self, id: &SessionId) -> VoxspecResult<BuilderResponse> {
        let session = self.load(id)?;
        Ok(respond(session))
    }

    /// The active session `user_id` started most recently, if any.
    pub fn inspect_for_user(&self, user_id: &str) -> VoxspecResult<Option<BuilderResponse>> {
        Ok(self.sessions.find_active_by_user(user_id)?.map(respond))
    }

    /// Apply one answer and advance the session.
    ///
    /// # Errors
    ///
    /// `SessionNotFound` for an unknown id. Any generator error once every
    /// answer is collected; the stored session is left untouched, so
    /// resubmitting the same (or a corrected) answer reruns the attempt.
    /// Store errors as-is.
    pub fn submit(&self, id: &SessionId, message: &str) -> VoxspecResult<BuilderResponse> {
        let mut session = self.load(id)?;

        if session.state.status == BuilderStatus::Completed {
            debug!(session_id = %id, "submit to completed session ignored");
            return Ok(BuilderResponse {
                question: COMPLETE_QUESTION.to_string(),
                agent_id: session.agent_id,
                session,
            });
        }

        let mut data = session.state.collected_data.clone();
        let answering = effective_step(&data);
        let message = message.trim();
        if !message.is_empty() && apply_answer(&mut data, answering, message) {
            debug!(session_id = %id, step = %answering, "answer applied");
        }

        let mut step = effective_step(&data);

        if step == BuilderStep::GenerateCallFlow {
            let request =
                CallFlowRequest::from_partial(&data).ok_or_else(|| VoxspecError::IncompleteSpec {
                    reason: "call flow requested before every answer was collected".to_string(),
                })?;

            match generate_with_policy(&self.generator, &request, &self.policy) {
                Ok(flow) => {
                    if !flow.is_complete() {
                        warn!(session_id = %id, "generated call flow is incomplete");
                    }
                    data.call_flow = Some(flow.into());
                    step = effective_step(&data);
                }
                Err(e) => {
                    // Nothing is saved: the stored session still waits for
                    // this same answer.
                    warn!(session_id = %id, step = %answering, error = %e, "call flow generation failed");
                    return Err(e);
                }
            }
        }

        let status = if step == BuilderStep::Complete {
            BuilderStatus::Completed
        } else {
            BuilderStatus::Active
        };

        if status == BuilderStatus::Completed {
            let spec = data.to_spec().ok_or_else(|| VoxspecError::IncompleteSpec {
                reason: "completed session has an incomplete spec".to_string(),
            })?;
            let record = agent_record(spec);
            self.agents.create(&record)?;
            session.agent_id = Some(record.id);

            info!(
                session_id = %id,
                agent_id = %record.id,
                fingerprint = %record.prompt_fingerprint,
                "agent build complete"
            );
        }

        if step != answering {
            info!(session_id = %id, from = %answering, to = %step, "builder step advanced");
        }

        session.state = BuilderState {
            current_step: step,
            collected_data: data,
            status,
        };
        session.updated_at = Utc::now();
        self.sessions.save(&session)?;

        Ok(respond(session))
    }

    fn load(&self, id: &SessionId) -> VoxspecResult<BuilderSession> {
        self.sessions
            .load(id)?
            .ok_or_else(|| VoxspecError::SessionNotFound {
                session_id: id.to_string(),
            })
    }
}

fn respond(session: BuilderSession) -> BuilderResponse {
    BuilderResponse {
        question: next_builder_question(&session.state).to_string(),
        agent_id: session.agent_id,
        session,
    }
}

/// A version-1 record for a completed spec.
pub fn agent_record(spec: AgentSpec) -> AgentRecord {
    let name: String = format!("{} - {}", spec.business_type, spec.agent_role)
        .chars()
        .take(MAX_AGENT_NAME_CHARS)
        .collect();
    let fingerprint = prompt_fingerprint(&runtime_prompt(Some(&spec), None));

    AgentRecord {
        id: AgentId::new(),
        name,
        description: Some(spec.objective.clone()),
        spec,
        version: 1,
        prompt_fingerprint: fingerprint,
        created_at: Utc::now(),
    }
}
