//! Thin OS capability layer used by the verified desktop tools:
//! - Window listing and screen capture
//! - Hyprland launch/close dispatch
//! - Process force-kill by PID
//! - Opening files and folders

pub mod desktop;
pub mod filesystem;
pub mod hyprland;
pub mod process;

/// OS capability error types
#[derive(Debug, thiserror::Error)]
pub enum OsError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type OsResult<T> = Result<T, OsError>;

/// Rejects empty names and control characters before they reach a command line.
pub(crate) fn validate_name(value: &str, label: &str) -> OsResult<()> {
    if value.trim().is_empty() {
        return Err(OsError::InvalidArgument(format!("{label} cannot be empty")));
    }
    if value.contains('\0') || value.contains('\n') {
        return Err(OsError::InvalidArgument(format!(
            "{label} contains invalid control characters"
        )));
    }
    Ok(())
}
