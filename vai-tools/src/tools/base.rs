use crate::error::ToolError;
use crate::execution_context::ExecutionContext;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub output: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl ToolResult {
    /// User-facing message carried in `output.message`, falling back to the error.
    pub fn message(&self) -> String {
        self.output
            .as_ref()
            .and_then(|o| o["message"].as_str())
            .map(str::to_string)
            .or_else(|| self.error.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn schema(&self) -> serde_json::Value;

    async fn execute(
        &self,
        ctx: ExecutionContext,
        input: serde_json::Value,
    ) -> Result<ToolResult, ToolError>;
}
