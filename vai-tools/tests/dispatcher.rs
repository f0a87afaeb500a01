#![allow(clippy::unwrap_used)]

mod common;

use async_trait::async_trait;
use common::{tool_context, FakeDesktop};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use vai_tools::*;

#[derive(Default)]
struct RecordingAudit {
    events: Mutex<Vec<ToolEvent>>,
}

#[async_trait]
impl AuditLogger for RecordingAudit {
    async fn log(&self, event: ToolEvent) {
        self.events.lock().push(event);
    }
}

struct SleepyTool;
struct PanickyTool;

#[async_trait]
impl Tool for SleepyTool {
    fn name(&self) -> &'static str {
        "test.sleepy"
    }
    fn description(&self) -> &'static str {
        "Sleeps for a minute"
    }
    fn schema(&self) -> Value {
        json!({"type": "object"})
    }
    async fn execute(&self, _ctx: ExecutionContext, _input: Value) -> Result<ToolResult, ToolError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(ToolResult {
            success: true,
            output: None,
            error: None,
        })
    }
}

#[async_trait]
impl Tool for PanickyTool {
    fn name(&self) -> &'static str {
        "test.panicky"
    }
    fn description(&self) -> &'static str {
        "Always panics"
    }
    fn schema(&self) -> Value {
        json!({"type": "object"})
    }
    async fn execute(&self, _ctx: ExecutionContext, _input: Value) -> Result<ToolResult, ToolError> {
        panic!("tool blew up");
    }
}

fn dispatcher(desktop: Arc<FakeDesktop>, timeout_ms: u64) -> (ToolDispatcherImpl, Arc<RecordingAudit>) {
    let mut registry = ToolRegistryImpl::with_verified_tools(tool_context(desktop));
    registry
        .register(Arc::new(SleepyTool))
        .register(Arc::new(PanickyTool));
    let audit = Arc::new(RecordingAudit::default());
    (
        ToolDispatcherImpl::new(Arc::new(registry), audit.clone(), timeout_ms),
        audit,
    )
}

#[test]
fn test_registry_lists_verified_tools_sorted() {
    let registry = ToolRegistryImpl::with_verified_tools(tool_context(Arc::new(FakeDesktop::default())));
    assert_eq!(
        registry.list(),
        vec![
            "desktop.verified_close_app",
            "desktop.verified_open_app",
            "desktop.verified_open_file",
            "desktop.verified_open_folder",
            "desktop.verify",
        ]
    );
    assert_eq!(registry.schemas().len(), 5);
}

#[tokio::test]
async fn test_success_is_audited() {
    let (dispatcher, audit) = dispatcher(Arc::new(FakeDesktop::default()), 5000);

    let result = dispatcher
        .dispatch("s1".into(), "desktop.verified_open_app".into(), json!({"app": "vlc"}))
        .await
        .unwrap();
    assert!(result.success);

    let events = audit.events.lock();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].session, "s1");
    assert_eq!(events[0].tool, "desktop.verified_open_app");
    assert_eq!(events[0].args, json!({"app": "vlc"}));
    assert!(events[0].success);
    assert!(events[0].result_snippet.starts_with("✅ SUCCESS"));
}

#[tokio::test]
async fn test_unknown_tool_is_audited_as_failure() {
    let (dispatcher, audit) = dispatcher(Arc::new(FakeDesktop::default()), 5000);

    let result = dispatcher
        .dispatch("s1".into(), "desktop.teleport".into(), json!({}))
        .await;
    assert!(matches!(result, Err(ToolError::NotFound(_))));

    let events = audit.events.lock();
    assert_eq!(events.len(), 1);
    assert!(!events[0].success);
}

#[tokio::test]
async fn test_non_object_input_rejected() {
    let (dispatcher, audit) = dispatcher(Arc::new(FakeDesktop::default()), 5000);

    let result = dispatcher
        .dispatch("s1".into(), "desktop.verify".into(), json!("vlc"))
        .await;
    assert!(matches!(result, Err(ToolError::ValidationError(_))));
    assert_eq!(audit.events.lock().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_enforced() {
    let (dispatcher, audit) = dispatcher(Arc::new(FakeDesktop::default()), 100);

    let result = dispatcher
        .dispatch("s1".into(), "test.sleepy".into(), json!({}))
        .await;
    assert!(matches!(result, Err(ToolError::Timeout(100))));
    assert_eq!(audit.events.lock()[0].result_snippet, "Operation timed out after 100ms");
}

#[tokio::test]
async fn test_panic_is_isolated() {
    let (dispatcher, audit) = dispatcher(Arc::new(FakeDesktop::default()), 5000);

    let result = dispatcher
        .dispatch("s1".into(), "test.panicky".into(), json!({}))
        .await;
    assert!(matches!(result, Err(ToolError::Internal)));
    assert!(!audit.events.lock()[0].success);
}
