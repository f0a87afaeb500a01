//! Bounded act → settle → verify loop.

use crate::guard::InputController;
use crate::types::Verdict;
use futures::FutureExt;
use std::any::Any;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

pub const DEFAULT_MAX_RETRIES: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryMode {
    /// Run the action again before every retry.
    Reinvoke,
    /// Run the action once; later attempts only wait and verify again.
    ReverifyOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub settle_delay: Duration,
    pub backoff: Duration,
    pub mode: RetryMode,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            settle_delay: Duration::from_secs(2),
            backoff: Duration::from_secs(1),
            mode: RetryMode::Reinvoke,
        }
    }
}

impl RetryPolicy {
    /// Launch once, then give a slow app one more look after a longer wait.
    pub fn open_app() -> Self {
        Self {
            max_retries: 1,
            settle_delay: Duration::from_secs(3),
            backoff: Duration::from_secs(2),
            mode: RetryMode::ReverifyOnly,
        }
    }

    /// Close, and on failure run the (forced) close action once more.
    pub fn close_app() -> Self {
        Self {
            max_retries: 1,
            settle_delay: Duration::from_secs(2),
            backoff: Duration::ZERO,
            mode: RetryMode::Reinvoke,
        }
    }

    pub fn open_path() -> Self {
        Self {
            max_retries: 0,
            settle_delay: Duration::from_secs(3),
            backoff: Duration::ZERO,
            mode: RetryMode::Reinvoke,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_delays(mut self, settle_delay: Duration, backoff: Duration) -> Self {
        self.settle_delay = settle_delay;
        self.backoff = backoff;
        self
    }

    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryOutcome {
    pub success: bool,
    pub attempts: u32,
    pub message: String,
}

struct RetrySession {
    attempt: u32,
    max_retries: u32,
}

impl RetrySession {
    fn new(max_retries: u32) -> Self {
        Self {
            attempt: 0,
            max_retries,
        }
    }

    fn begin(&mut self) -> u32 {
        self.attempt += 1;
        self.attempt
    }

    fn total(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    fn has_remaining(&self) -> bool {
        self.attempt < self.total()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "action panicked".to_string())
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        sleep(delay).await;
    }
}

pub struct RetryOrchestrator {
    policy: RetryPolicy,
    controller: InputController,
}

impl RetryOrchestrator {
    pub fn new(policy: RetryPolicy, controller: InputController) -> Self {
        Self { policy, controller }
    }

    /// Runs `action` and `verify` under the policy. Returns on the first
    /// successful verification; never panics or errors.
    pub async fn run<A, AF, E, V, VF, R>(&self, label: &str, mut action: A, mut verify: V) -> RetryOutcome
    where
        A: FnMut() -> AF,
        AF: Future<Output = Result<String, E>>,
        E: Display,
        V: FnMut() -> VF,
        VF: Future<Output = R>,
        R: Into<Verdict>,
    {
        let mut session = RetrySession::new(self.policy.max_retries);
        let mut action_done = false;

        loop {
            let attempt = session.begin();

            if self.policy.mode == RetryMode::Reinvoke || !action_done {
                let guard = self.controller.acquire(label);
                let result = AssertUnwindSafe(action()).catch_unwind().await;
                drop(guard);

                let result = match result {
                    Ok(result) => result.map_err(|e| e.to_string()),
                    Err(payload) => Err(panic_message(payload)),
                };

                match result {
                    Ok(status) => {
                        debug!(label, attempt, status = %status, "Action invoked");
                        action_done = true;
                    }
                    Err(e) if session.has_remaining() => {
                        warn!("Error in action attempt {}: {}", attempt, e);
                        pause(self.policy.backoff).await;
                        continue;
                    }
                    Err(e) => {
                        error!(label, attempt, "Action failed with error: {}", e);
                        return RetryOutcome {
                            success: false,
                            attempts: attempt,
                            message: format!("❌ Action failed with error: {e}"),
                        };
                    }
                }

                pause(self.policy.settle_delay).await;
            }

            let verdict: Verdict = match AssertUnwindSafe(verify()).catch_unwind().await {
                Ok(result) => result.into(),
                Err(payload) => Verdict::error(format!(
                    "❌ Verification aborted: {}",
                    panic_message(payload)
                )),
            };

            if verdict.success {
                info!(label, attempt, "Action verified");
                return RetryOutcome {
                    success: true,
                    attempts: attempt,
                    message: verdict.message,
                };
            }

            if session.has_remaining() {
                info!(
                    "Action failed, retrying... (attempt {}/{})",
                    attempt,
                    self.policy.max_retries
                );
                pause(self.policy.backoff).await;
            } else {
                error!(label, attempts = attempt, "Action not verified");
                return RetryOutcome {
                    success: false,
                    attempts: attempt,
                    message: format!(
                        "❌ Action failed after {} attempts. {}",
                        session.total(),
                        verdict.message
                    ),
                };
            }
        }
    }
}

/// Generic act/verify loop with the default delays and `max_retries`
/// additional attempts.
pub async fn run_with_verification<A, AF, E, V, VF, R>(action: A, verify: V, max_retries: u32) -> String
where
    A: FnMut() -> AF,
    AF: Future<Output = Result<String, E>>,
    E: Display,
    V: FnMut() -> VF,
    VF: Future<Output = R>,
    R: Into<Verdict>,
{
    let policy = RetryPolicy::default().with_max_retries(max_retries);
    RetryOrchestrator::new(policy, InputController::new())
        .run("action", action, verify)
        .await
        .message
}
