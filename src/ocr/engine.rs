//! Vision-model collaborators behind a common trait.
//!
//! The real engine talks to an OpenAI-compatible chat-completions endpoint
//! with an inline base64 JPEG; the mock returns a canned response for
//! development and tests. Which one runs is a configuration decision, not
//! a branch inside the parser.

use crate::config::{OcrConfig, OcrEngineKind};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("vision engine not configured: {0}")]
    NotConfigured(String),

    #[error("vision API error: {0}")]
    Api(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("empty response from vision model")]
    EmptyResponse,
}

/// One extraction call: image in, free-form model text out. Retry policy,
/// if any, belongs to the caller.
#[async_trait]
pub trait VisionEngine: Send + Sync {
    async fn extract(
        &self,
        image_jpeg: &[u8],
        prompt: &str,
        temperature: f32,
    ) -> Result<String, EngineError>;
}

/// Build the configured engine.
pub fn from_config(config: &OcrConfig) -> Result<Arc<dyn VisionEngine>, EngineError> {
    match config.engine {
        OcrEngineKind::Openai => Ok(Arc::new(OpenAiVisionEngine::new(
            &config.api_base,
            &config.api_key,
            &config.model,
        )?)),
        OcrEngineKind::Mock => Ok(Arc::new(MockVisionEngine::default())),
    }
}

/// OpenAI-compatible vision chat client.
pub struct OpenAiVisionEngine {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl OpenAiVisionEngine {
    pub fn new(api_base: &str, api_key: &str, model: &str) -> Result<Self, EngineError> {
        if api_key.is_empty() {
            return Err(EngineError::NotConfigured(
                "OPENAI_API_KEY is required for the real OCR engine".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl VisionEngine for OpenAiVisionEngine {
    async fn extract(
        &self,
        image_jpeg: &[u8],
        prompt: &str,
        temperature: f32,
    ) -> Result<String, EngineError> {
        let data_url = format!("data:image/jpeg;base64,{}", BASE64.encode(image_jpeg));

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text { text: prompt },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ],
            }],
            temperature,
            max_tokens: 1000,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Api(format!("{status}: {body}")));
        }

        let parsed: ChatResponse = response.json().await?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.is_empty())
            .ok_or(EngineError::EmptyResponse)
    }
}

/// Deterministic engine for development and tests: always returns the
/// same fenced JSON, shaped exactly like a cooperative model reply.
#[derive(Default)]
pub struct MockVisionEngine;

impl MockVisionEngine {
    const CANNED_RESPONSE: &'static str = "```json\n{\n  \"supplierName\": \"Proveedor de Prueba SA\",\n  \"supplierCuit\": \"30-71056429-5\",\n  \"amount\": 1000.00,\n  \"amount_105\": 0,\n  \"total_neto\": 1000.00,\n  \"vat_amount_21\": 210.00,\n  \"vat_amount_105\": 0,\n  \"has_ii_bb\": false,\n  \"ii_bb_amount\": 0,\n  \"total_amount\": 1210.00,\n  \"date\": \"2026-01-15\",\n  \"invoiceType\": \"A\",\n  \"confidence\": 97\n}\n```";
}

#[async_trait]
impl VisionEngine for MockVisionEngine {
    async fn extract(
        &self,
        _image_jpeg: &[u8],
        _prompt: &str,
        _temperature: f32,
    ) -> Result<String, EngineError> {
        Ok(Self::CANNED_RESPONSE.to_string())
    }
}
