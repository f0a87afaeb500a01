//! Desktop tools that only report success after the result is verified on screen.

use crate::backend::ActionBackend;
use crate::error::ToolError;
use crate::execution_context::ExecutionContext;
use crate::os_capabilities::{filesystem::display_name, OsError};
use crate::tools::base::{Tool, ToolResult};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use vai_verifier::{
    ActionVerifier, InputController, Intent, RetryOrchestrator, RetryOutcome, RetryPolicy,
    TargetKind,
};

fn required_str<'a>(input: &'a Value, field: &str) -> Result<&'a str, ToolError> {
    input[field]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::ValidationError(format!("Missing or invalid '{field}'")))
}

fn target_schema(field: &str) -> Value {
    json!({
        "type": "object",
        "properties": { field: {"type": "string"} },
        "required": [field],
        "additionalProperties": false
    })
}

/// Retry policies per verified tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPolicies {
    pub open_app: RetryPolicy,
    pub close_app: RetryPolicy,
    pub open_path: RetryPolicy,
}

impl Default for ToolPolicies {
    fn default() -> Self {
        Self {
            open_app: RetryPolicy::open_app(),
            close_app: RetryPolicy::close_app(),
            open_path: RetryPolicy::open_path(),
        }
    }
}

impl ToolPolicies {
    /// Apply the same adjustment to every policy.
    pub fn map(self, f: impl Fn(RetryPolicy) -> RetryPolicy) -> Self {
        Self {
            open_app: f(self.open_app),
            close_app: f(self.close_app),
            open_path: f(self.open_path),
        }
    }

    /// Presets with every wait removed.
    pub fn immediate() -> Self {
        Self::default().map(|p| p.with_delays(Duration::ZERO, Duration::ZERO))
    }
}

/// Everything a verified tool needs: something to act, something to check.
#[derive(Clone)]
pub struct VerifiedToolContext {
    pub verifier: Arc<ActionVerifier>,
    pub backend: Arc<dyn ActionBackend>,
    pub controller: InputController,
    pub policies: ToolPolicies,
}

impl VerifiedToolContext {
    pub fn new(verifier: Arc<ActionVerifier>, backend: Arc<dyn ActionBackend>) -> Self {
        Self {
            verifier,
            backend,
            controller: InputController::new(),
            policies: ToolPolicies::default(),
        }
    }

    pub fn with_policies(mut self, policies: ToolPolicies) -> Self {
        self.policies = policies;
        self
    }

    fn orchestrator(&self, policy: &RetryPolicy) -> RetryOrchestrator {
        RetryOrchestrator::new(policy.clone(), self.controller.clone())
    }
}

fn report(outcome: RetryOutcome, confirmed: String, recovered: String, failed: String) -> ToolResult {
    let message = match (outcome.success, outcome.attempts) {
        (true, 1) => confirmed,
        (true, _) => recovered,
        (false, _) => failed,
    };
    ToolResult {
        success: outcome.success,
        output: Some(json!({
            "message": message,
            "verified": outcome.success,
            "attempts": outcome.attempts,
        })),
        error: (!outcome.success).then(|| outcome.message),
    }
}

pub struct VerifiedOpenAppTool {
    ctx: VerifiedToolContext,
}

impl VerifiedOpenAppTool {
    pub fn new(ctx: VerifiedToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for VerifiedOpenAppTool {
    fn name(&self) -> &'static str {
        "desktop.verified_open_app"
    }
    fn description(&self) -> &'static str {
        "Open an application and confirm it is visible on screen"
    }
    fn schema(&self) -> Value {
        target_schema("app")
    }
    async fn execute(&self, _ctx: ExecutionContext, input: Value) -> Result<ToolResult, ToolError> {
        let app = required_str(&input, "app")?;
        let backend = self.ctx.backend.as_ref();
        let verifier = self.ctx.verifier.as_ref();

        info!("Attempting to open {}", app);
        let outcome = self
            .ctx
            .orchestrator(&self.ctx.policies.open_app)
            .run(
                &format!("open {app}"),
                || backend.open_app(app),
                || verifier.verify_app_opened(app),
            )
            .await;

        Ok(report(
            outcome.clone(),
            format!("✅ SUCCESS: {app} is confirmed open and visible on screen!"),
            format!("✅ SUCCESS: {app} is now confirmed open (took a moment to load)!"),
            format!(
                "❌ Sorry! Could not open {app}. {} Is the app installed?",
                outcome.message
            ),
        ))
    }
}

pub struct VerifiedCloseAppTool {
    ctx: VerifiedToolContext,
}

impl VerifiedCloseAppTool {
    pub fn new(ctx: VerifiedToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for VerifiedCloseAppTool {
    fn name(&self) -> &'static str {
        "desktop.verified_close_app"
    }
    fn description(&self) -> &'static str {
        "Close an application window and confirm it is gone from the screen"
    }
    fn schema(&self) -> Value {
        target_schema("window")
    }
    async fn execute(&self, _ctx: ExecutionContext, input: Value) -> Result<ToolResult, ToolError> {
        let window = required_str(&input, "window")?;
        let backend = self.ctx.backend.as_ref();
        let verifier = self.ctx.verifier.as_ref();

        info!("Attempting to close {}", window);
        let mut calls = 0u32;
        let outcome = self
            .ctx
            .orchestrator(&self.ctx.policies.close_app)
            .run(
                &format!("close {window}"),
                move || {
                    calls += 1;
                    let force = calls > 1;
                    async move {
                        let result = if force {
                            info!("App still visible, attempting force close for {}", window);
                            backend.force_close_app(window).await
                        } else {
                            backend.close_app(window).await
                        };
                        // Nothing left to close is for verification to judge.
                        match result {
                            Err(OsError::NotFound(msg)) => Ok(format!("⏳ {msg}")),
                            other => other,
                        }
                    }
                },
                || verifier.verify_app_closed(window),
            )
            .await;

        Ok(report(
            outcome.clone(),
            format!("✅ SUCCESS: {window} is confirmed closed!"),
            format!("✅ SUCCESS: {window} is now confirmed closed!"),
            format!(
                "❌ Sorry! Could not close {window}. {} It may need to be closed manually.",
                outcome.message
            ),
        ))
    }
}

pub struct VerifiedOpenFileTool {
    ctx: VerifiedToolContext,
}

impl VerifiedOpenFileTool {
    pub fn new(ctx: VerifiedToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for VerifiedOpenFileTool {
    fn name(&self) -> &'static str {
        "desktop.verified_open_file"
    }
    fn description(&self) -> &'static str {
        "Open or play a file with its default application and confirm it is showing"
    }
    fn schema(&self) -> Value {
        target_schema("path")
    }
    async fn execute(&self, _ctx: ExecutionContext, input: Value) -> Result<ToolResult, ToolError> {
        let path = required_str(&input, "path")?;
        let name = display_name(path);
        let backend = self.ctx.backend.as_ref();
        let verifier = self.ctx.verifier.as_ref();

        info!("Attempting to open file: {}", path);
        let outcome = self
            .ctx
            .orchestrator(&self.ctx.policies.open_path)
            .run(
                &format!("open file {name}"),
                || backend.open_path(path),
                || verifier.verify_file_opened(&name),
            )
            .await;

        Ok(report(
            outcome.clone(),
            format!("✅ SUCCESS: File '{name}' is confirmed open and visible!"),
            format!("✅ SUCCESS: File '{name}' is now confirmed open!"),
            format!(
                "❌ Sorry! Could not open file '{name}'. {} Does the file exist?",
                outcome.message
            ),
        ))
    }
}

pub struct VerifiedOpenFolderTool {
    ctx: VerifiedToolContext,
}

impl VerifiedOpenFolderTool {
    pub fn new(ctx: VerifiedToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for VerifiedOpenFolderTool {
    fn name(&self) -> &'static str {
        "desktop.verified_open_folder"
    }
    fn description(&self) -> &'static str {
        "Open a folder in the file manager and confirm it is showing"
    }
    fn schema(&self) -> Value {
        target_schema("path")
    }
    async fn execute(&self, _ctx: ExecutionContext, input: Value) -> Result<ToolResult, ToolError> {
        let path = required_str(&input, "path")?;
        let name = display_name(path);
        let backend = self.ctx.backend.as_ref();
        let verifier = self.ctx.verifier.as_ref();

        info!("Attempting to open folder: {}", path);
        let outcome = self
            .ctx
            .orchestrator(&self.ctx.policies.open_path)
            .run(
                &format!("open folder {name}"),
                || backend.open_folder(path),
                || verifier.verify_folder_opened(&name),
            )
            .await;

        Ok(report(
            outcome.clone(),
            format!("✅ SUCCESS: Folder '{name}' is confirmed open in the file manager!"),
            format!("✅ SUCCESS: Folder '{name}' is now confirmed open!"),
            format!("❌ Sorry! Could not open folder '{name}'. {}", outcome.message),
        ))
    }
}

/// Verification without any action.
pub struct VerifyTool {
    verifier: Arc<ActionVerifier>,
}

impl VerifyTool {
    pub fn new(verifier: Arc<ActionVerifier>) -> Self {
        Self { verifier }
    }
}

#[async_trait]
impl Tool for VerifyTool {
    fn name(&self) -> &'static str {
        "desktop.verify"
    }
    fn description(&self) -> &'static str {
        "Check whether an app, file or folder is currently open or closed"
    }
    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "kind": {"type": "string", "enum": ["app", "file", "folder"]},
                "intent": {"type": "string", "enum": ["opened", "closed"]},
                "name": {"type": "string"}
            },
            "required": ["kind", "intent", "name"],
            "additionalProperties": false
        })
    }
    async fn execute(&self, _ctx: ExecutionContext, input: Value) -> Result<ToolResult, ToolError> {
        let kind = required_str(&input, "kind")?;
        let kind = TargetKind::parse(kind)
            .ok_or_else(|| ToolError::ValidationError(format!("Unknown kind '{kind}'")))?;
        let intent = required_str(&input, "intent")?;
        let intent = Intent::parse(intent)
            .ok_or_else(|| ToolError::ValidationError(format!("Unknown intent '{intent}'")))?;
        let name = required_str(&input, "name")?;

        let verdict = self.verifier.verify(kind, intent, name).await;
        Ok(ToolResult {
            success: verdict.success,
            output: Some(json!({
                "message": verdict.message,
                "outcome": verdict.outcome,
            })),
            error: None,
        })
    }
}
