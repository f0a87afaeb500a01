use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Empty response from model")]
    Empty,
}

/// An encoded image attached to a vision request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageInput {
    pub media_type: String,
    pub data: String,
}

impl ImageInput {
    pub fn png(bytes: &[u8]) -> Self {
        Self {
            media_type: "image/png".to_string(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Ask `question` about `image` and return the model's free-text answer.
    async fn analyze_image(&self, image: &ImageInput, question: &str) -> Result<String, ProviderError>;

    fn name(&self) -> &str;
}
