use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum VerifyError {
    #[error("Window enumeration unavailable: {0}")]
    WindowSource(String),

    #[error("Vision query failed: {0}")]
    Vision(String),

    #[error("Verification timed out after {0}s")]
    Timeout(u64),

    #[error("Verification aborted: {0}")]
    Aborted(String),
}

impl VerifyError {
    /// The underlying diagnostic, without this error's own prefix.
    pub fn detail(&self) -> String {
        match self {
            Self::WindowSource(msg) | Self::Vision(msg) | Self::Aborted(msg) => msg.clone(),
            Self::Timeout(_) => self.to_string(),
        }
    }
}
