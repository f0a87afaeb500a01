use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vai_verifier::types::truncate_chars;

/// Characters of the result message kept in a tool event.
pub const RESULT_SNIPPET_CHARS: usize = 200;

/// One audit record of a tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolEvent {
    pub timestamp: String,
    pub session: String,
    pub tool: String,
    pub args: Value,
    pub success: bool,
    pub result_snippet: String,
}

impl ToolEvent {
    pub fn new(session: &str, tool: &str, args: Value, success: bool, result: &str) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            session: session.to_string(),
            tool: tool.to_string(),
            args,
            success,
            result_snippet: truncate_chars(result, RESULT_SNIPPET_CHARS).to_string(),
        }
    }
}

/// Audit logger trait. Implementations swallow their own failures.
#[async_trait]
pub trait AuditLogger: Send + Sync {
    async fn log(&self, event: ToolEvent);
}

/// Discards every event.
pub struct NoopAuditLogger;

#[async_trait]
impl AuditLogger for NoopAuditLogger {
    async fn log(&self, _event: ToolEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snippet_is_bounded() {
        let long = "x".repeat(500);
        let event = ToolEvent::new("cli", "desktop.verify", json!({}), false, &long);
        assert_eq!(event.result_snippet.chars().count(), RESULT_SNIPPET_CHARS);
    }

    #[test]
    fn snippet_respects_char_boundaries() {
        let msg = "✅".repeat(300);
        let event = ToolEvent::new("cli", "desktop.verify", json!({}), true, &msg);
        assert_eq!(event.result_snippet.chars().count(), RESULT_SNIPPET_CHARS);
    }
}
