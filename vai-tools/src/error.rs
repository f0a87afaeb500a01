use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    #[error("Internal error")]
    Internal,
}

