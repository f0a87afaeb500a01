use crate::error::ToolError;
use crate::execution_context::ExecutionContext;
use crate::registry::ToolRegistryImpl;
use crate::tools::ToolResult;
use crate::traits::{AuditLogger, ToolEvent};
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info, warn};

const MAX_INPUT_BYTES: usize = 64 * 1024;

pub struct ToolDispatcherImpl {
    registry: Arc<ToolRegistryImpl>,
    audit: Arc<dyn AuditLogger>,
    timeout_ms: u64,
}

impl ToolDispatcherImpl {
    pub fn new(registry: Arc<ToolRegistryImpl>, audit: Arc<dyn AuditLogger>, timeout_ms: u64) -> Self {
        Self {
            registry,
            audit,
            timeout_ms,
        }
    }

    pub fn registry(&self) -> &ToolRegistryImpl {
        &self.registry
    }

    pub async fn dispatch(
        &self,
        session_key: String,
        tool_name: String,
        input: serde_json::Value,
    ) -> Result<ToolResult, ToolError> {
        info!("Dispatching tool: {} for session: {}", tool_name, session_key);

        let result = match self.registry.get(&tool_name) {
            None => Err(ToolError::NotFound(tool_name.clone())),
            Some(_) if !Self::validate_input(&input) => {
                Err(ToolError::ValidationError("Input must be a JSON object".into()))
            }
            Some(tool) => {
                let ctx = ExecutionContext::new(session_key.clone(), self.timeout_ms);
                debug!(request_id = %ctx.request_id, started_at = %ctx.started_at, "Executing {}", tool_name);
                self.execute_with_protection(tool, ctx, input.clone()).await
            }
        };

        // Always audit, whatever the result
        let (success, message) = match &result {
            Ok(r) => (r.success, r.message()),
            Err(e) => (false, e.to_string()),
        };
        self.audit
            .log(ToolEvent::new(&session_key, &tool_name, input, success, &message))
            .await;

        result
    }

    fn validate_input(input: &serde_json::Value) -> bool {
        if !input.is_object() {
            return false;
        }
        serde_json::to_string(input)
            .map(|s| s.len() <= MAX_INPUT_BYTES)
            .unwrap_or(false)
    }

    async fn execute_with_protection(
        &self,
        tool: Arc<dyn crate::tools::Tool>,
        ctx: ExecutionContext,
        input: serde_json::Value,
    ) -> Result<ToolResult, ToolError> {
        let timeout_ms = ctx.timeout_ms;

        // Spawn task to isolate panics
        let handle = tokio::spawn(async move { tool.execute(ctx, input).await });

        match timeout(Duration::from_millis(timeout_ms), handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => {
                if join_err.is_panic() {
                    error!("Tool execution panicked");
                } else {
                    error!("Tool execution cancelled");
                }
                Err(ToolError::Internal)
            }
            Err(_) => {
                warn!("Tool execution timed out after {}ms", timeout_ms);
                Err(ToolError::Timeout(timeout_ms))
            }
        }
    }
}
