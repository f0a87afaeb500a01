use crate::traits::*;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

pub struct OpenAICompatibleProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAICompatibleProvider {
    pub fn with_timeout(
        base_url: String,
        api_key: Option<String>,
        model: String,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url,
            api_key,
            model,
        }
    }
}

/// Chat completion body with one user turn carrying the question and the image.
pub fn build_vision_body(model: &str, image: &ImageInput, question: &str) -> Value {
    json!({
        "model": model,
        "messages": [{
            "role": "user",
            "content": [
                { "type": "text", "text": question },
                { "type": "image_url", "image_url": { "url": image.data_url() } }
            ]
        }],
        "temperature": 0.0,
    })
}

/// Extracts the answer text from an OpenAI-compatible response.
///
/// `content` may be a plain string or an array of typed parts.
pub fn parse_answer(json: &Value) -> Result<String, ProviderError> {
    let choice = json["choices"]
        .get(0)
        .ok_or_else(|| ProviderError::Parse("No choices in response".to_string()))?;

    let content = &choice["message"]["content"];
    let text = match content {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect::<Vec<&str>>()
            .join("\n"),
        _ => String::new(),
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(ProviderError::Empty);
    }
    Ok(text)
}

#[async_trait]
impl VisionProvider for OpenAICompatibleProvider {
    async fn analyze_image(&self, image: &ImageInput, question: &str) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = build_vision_body(&self.model, image, question);

        let mut request = self.client.post(&url).json(&body);

        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        debug!(model = %self.model, "Sending vision request");
        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!("{}: {}", status, text)));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        parse_answer(&json)
    }

    fn name(&self) -> &str {
        "OpenAI Compatible"
    }
}
