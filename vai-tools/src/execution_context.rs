use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionContext {
    pub session_key: String,
    pub request_id: String,
    pub timeout_ms: u64,
    pub started_at: DateTime<Utc>,
}

impl ExecutionContext {
    pub fn new(session_key: String, timeout_ms: u64) -> Self {
        Self {
            session_key,
            request_id: uuid::Uuid::new_v4().to_string(),
            timeout_ms,
            started_at: Utc::now(),
        }
    }
}
