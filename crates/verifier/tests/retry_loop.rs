#![allow(clippy::unwrap_used, clippy::panic)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use vai_verifier::*;

fn instant(max_retries: u32) -> RetryPolicy {
    RetryPolicy::default()
        .with_max_retries(max_retries)
        .with_delays(Duration::ZERO, Duration::ZERO)
}

struct Counters {
    actions: Arc<AtomicU32>,
    verifications: Arc<AtomicU32>,
}

impl Counters {
    fn new() -> Self {
        Self {
            actions: Arc::new(AtomicU32::new(0)),
            verifications: Arc::new(AtomicU32::new(0)),
        }
    }
}

#[tokio::test]
async fn test_returns_first_success_without_more_attempts() {
    let c = Counters::new();
    let orchestrator = RetryOrchestrator::new(instant(2), InputController::new());

    let outcome = orchestrator
        .run(
            "open",
            || {
                c.actions.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, String>("launched".to_string()) }
            },
            || {
                c.verifications.fetch_add(1, Ordering::SeqCst);
                async { (true, "✅ Notepad appears open.".to_string()) }
            },
        )
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.attempts, 1);
    assert_eq!(c.actions.load(Ordering::SeqCst), 1);
    assert_eq!(c.verifications.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failing_action_then_success_takes_two_attempts() {
    let c = Counters::new();
    let orchestrator = RetryOrchestrator::new(instant(2), InputController::new());

    let outcome = orchestrator
        .run(
            "open",
            || {
                let n = c.actions.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err("launcher crashed".to_string())
                    } else {
                        Ok("launched".to_string())
                    }
                }
            },
            || {
                c.verifications.fetch_add(1, Ordering::SeqCst);
                async { Verdict::confirmed("✅ VLC appears open.".to_string()) }
            },
        )
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.message, "✅ VLC appears open.");
    assert_eq!(c.actions.load(Ordering::SeqCst), 2);
    assert_eq!(c.verifications.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_verification_reports_attempts_and_last_message() {
    let c = Counters::new();

    let message = run_with_verification(
        || {
            c.actions.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, String>("done".to_string()) }
        },
        || {
            let n = c.verifications.fetch_add(1, Ordering::SeqCst) + 1;
            async move { (false, format!("❌ still not open (check {n})")) }
        },
        0,
    )
    .await;
    assert!(message.contains("failed after 1 attempts"));

    let c = Counters::new();
    let orchestrator = RetryOrchestrator::new(instant(2), InputController::new());
    let outcome = orchestrator
        .run(
            "open",
            || {
                c.actions.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, String>("done".to_string()) }
            },
            || {
                let n = c.verifications.fetch_add(1, Ordering::SeqCst) + 1;
                async move { (false, format!("❌ still not open (check {n})")) }
            },
        )
        .await;

    assert!(!outcome.success);
    assert!(outcome.message.contains("failed after 3 attempts"));
    assert!(outcome.message.contains("check 3"));
    assert_eq!(c.actions.load(Ordering::SeqCst), 3);
    assert_eq!(c.verifications.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_action_error_on_last_attempt_is_surfaced() {
    let c = Counters::new();
    let orchestrator = RetryOrchestrator::new(instant(1), InputController::new());

    let outcome = orchestrator
        .run(
            "close",
            || {
                c.actions.fetch_add(1, Ordering::SeqCst);
                async { Err::<String, _>("permission denied") }
            },
            || {
                c.verifications.fetch_add(1, Ordering::SeqCst);
                async { (true, "unreachable".to_string()) }
            },
        )
        .await;

    assert!(!outcome.success);
    assert_eq!(outcome.message, "❌ Action failed with error: permission denied");
    assert_eq!(c.actions.load(Ordering::SeqCst), 2);
    assert_eq!(c.verifications.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_panicking_action_counts_as_failed_attempt() {
    let controller = InputController::new();
    let orchestrator = RetryOrchestrator::new(instant(0), controller.clone());

    let outcome = orchestrator
        .run(
            "open",
            || async {
                if true {
                    panic!("launcher exploded");
                }
                Ok::<_, String>(String::new())
            },
            || async { (true, "unreachable".to_string()) },
        )
        .await;

    assert!(!outcome.success);
    assert!(outcome.message.contains("launcher exploded"));
    assert!(!controller.is_active());
}

#[tokio::test]
async fn test_controller_is_active_only_during_action() {
    let controller = InputController::new();
    let orchestrator = RetryOrchestrator::new(instant(0), controller.clone());
    let seen_active = Arc::new(AtomicU32::new(0));
    let seen_during_verify = Arc::new(AtomicU32::new(0));

    let outcome = orchestrator
        .run(
            "open",
            || {
                if controller.is_active() {
                    seen_active.fetch_add(1, Ordering::SeqCst);
                }
                async { Ok::<_, String>("ok".to_string()) }
            },
            || {
                if controller.is_active() {
                    seen_during_verify.fetch_add(1, Ordering::SeqCst);
                }
                async { (true, "ok".to_string()) }
            },
        )
        .await;

    assert!(outcome.success);
    assert_eq!(seen_active.load(Ordering::SeqCst), 1);
    assert_eq!(seen_during_verify.load(Ordering::SeqCst), 0);
    assert!(!controller.is_active());
}

#[tokio::test]
async fn test_reverify_only_runs_action_once() {
    let c = Counters::new();
    let policy = RetryPolicy::open_app().with_delays(Duration::ZERO, Duration::ZERO);
    let orchestrator = RetryOrchestrator::new(policy, InputController::new());

    let outcome = orchestrator
        .run(
            "open",
            || {
                c.actions.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, String>("launched".to_string()) }
            },
            || {
                let n = c.verifications.fetch_add(1, Ordering::SeqCst);
                async move { (n == 1, format!("check {n}")) }
            },
        )
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.attempts, 2);
    assert_eq!(c.actions.load(Ordering::SeqCst), 1);
    assert_eq!(c.verifications.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_waits_settle_delay_before_verifying() {
    let start = tokio::time::Instant::now();
    let verified_at = Arc::new(std::sync::Mutex::new(None));
    let orchestrator = RetryOrchestrator::new(RetryPolicy::default(), InputController::new());

    orchestrator
        .run(
            "open",
            || async { Ok::<_, String>("ok".to_string()) },
            || {
                *verified_at.lock().unwrap() = Some(start.elapsed());
                async { (true, "ok".to_string()) }
            },
        )
        .await;

    let elapsed = verified_at.lock().unwrap().unwrap();
    assert!(elapsed >= Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_default_policy_backs_off_between_attempts() {
    let start = tokio::time::Instant::now();
    let message = run_with_verification(
        || async { Ok::<_, String>("ok".to_string()) },
        || async { (false, "nope".to_string()) },
        2,
    )
    .await;

    assert!(message.contains("failed after 3 attempts"));
    // three settles of 2s plus two backoffs of 1s
    assert!(start.elapsed() >= Duration::from_secs(8));
}
