//! Hyprland-backed evidence sources for the verifier.

use crate::os_capabilities::desktop;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};
use vai_providers::{ImageInput, VisionProvider};
use vai_verifier::{VerifyError, VisionService, WindowInfo, WindowSource};

/// Lists windows with `hyprctl clients -j`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HyprlandWindows;

#[async_trait]
impl WindowSource for HyprlandWindows {
    async fn list_windows(&self) -> Result<Vec<WindowInfo>, VerifyError> {
        desktop::list_windows()
            .await
            .map_err(|e| VerifyError::WindowSource(e.to_string()))
    }
}

/// Answers screen questions by capturing a screenshot and asking a vision model.
pub struct ScreenVision {
    provider: Arc<dyn VisionProvider>,
}

impl ScreenVision {
    pub fn new(provider: Arc<dyn VisionProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl VisionService for ScreenVision {
    async fn query(&self, question: &str) -> Result<String, VerifyError> {
        let path = desktop::capture_screen(None)
            .await
            .map_err(|e| VerifyError::Vision(e.to_string()))?;

        let bytes = tokio::fs::read(&path).await;
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(path = %path, "Failed to remove screenshot: {}", e);
        }
        let bytes = bytes.map_err(|e| VerifyError::Vision(format!("reading {path}: {e}")))?;

        debug!(provider = self.provider.name(), bytes = bytes.len(), "Asking vision model");
        self.provider
            .analyze_image(&ImageInput::png(&bytes), question)
            .await
            .map_err(|e| VerifyError::Vision(e.to_string()))
    }
}
