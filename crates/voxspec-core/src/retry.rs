//! Timeout and retry around call-flow generation.
//!
//! Each attempt runs on its own worker thread and the caller waits at most
//! `GenerationPolicy::timeout` for it. A timed-out worker is detached, not
//! killed; its late result is dropped. Only errors for which
//! `VoxspecError::is_transient` holds are retried, with exponential backoff
//! between attempts.

use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use voxspec_contracts::{
    error::{VoxspecError, VoxspecResult},
    spec::{CallFlow, CallFlowRequest},
};

use crate::traits::CallFlowGenerator;

/// Exponential backoff settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. 0 disables retrying.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (0-indexed), capped at `max_delay`.
    ///
    /// A multiplier that drives the delay negative or NaN yields `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        Duration::try_from_secs_f64(base.clamp(0.0, self.max_delay.as_secs_f64()))
            .unwrap_or(self.max_delay)
    }
}

/// How long one generation attempt may take, and how failures are retried.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationPolicy {
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

/// Call `generator` under `policy`, returning the first success or the last
/// error.
pub fn generate_with_policy(
    generator: &Arc<dyn CallFlowGenerator>,
    request: &CallFlowRequest,
    policy: &GenerationPolicy,
) -> VoxspecResult<CallFlow> {
    let mut attempt = 0;
    loop {
        match attempt_with_timeout(generator, request, policy.timeout) {
            Ok(flow) => {
                debug!(attempt, "call flow generated");
                return Ok(flow);
            }
            Err(e) if e.is_transient() && attempt < policy.retry.max_retries => {
                let delay = policy.retry.delay_for_attempt(attempt);
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "call flow generation failed; retrying"
                );
                thread::sleep(delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

fn attempt_with_timeout(
    generator: &Arc<dyn CallFlowGenerator>,
    request: &CallFlowRequest,
    timeout: Duration,
) -> VoxspecResult<CallFlow> {
    let (tx, rx) = mpsc::channel();
    let worker = Arc::clone(generator);
    let request = request.clone();

    thread::spawn(move || {
        // The receiver is gone if the caller already timed out.
        let _ = tx.send(worker.generate(&request));
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(VoxspecError::GenerationTimeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(VoxspecError::CallFlowGeneration {
            status: None,
            reason: "generator worker exited without a result".to_string(),
        }),
    }
}
