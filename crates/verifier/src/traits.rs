use crate::error::VerifyError;
use crate::types::WindowInfo;
use async_trait::async_trait;

/// Window enumeration facility (hyprctl, X11, test doubles).
#[async_trait]
pub trait WindowSource: Send + Sync {
    async fn list_windows(&self) -> Result<Vec<WindowInfo>, VerifyError>;
}

/// Answers a natural-language question about the current screen.
#[async_trait]
pub trait VisionService: Send + Sync {
    async fn query(&self, question: &str) -> Result<String, VerifyError>;
}
