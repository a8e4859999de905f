use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clients::traits::{ImageRef, ImageSynthesizer, SynthesisError};
use crate::config::SynthesisConfig;
use crate::error::{PhotoshootError, Result};
use crate::prompt::SYSTEM_INSTRUCTION;

static DATA_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^data:(image/[^;]+);base64,(.+)$").expect("data url regex should compile")
});

/// Splits a `data:image/...;base64,...` url into mime type and payload.
pub fn parse_data_url(input: &str) -> Option<(&str, &str)> {
    let caps = DATA_URL_RE.captures(input)?;
    let mime = caps.get(1)?.as_str();
    let data = caps.get(2)?.as_str();
    Some((mime, data))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    inline_data: Option<ResponseInlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseInlineData {
    mime_type: String,
    data: String,
}

/// Gemini image model over the Generative Language REST API.
#[derive(Debug, Clone)]
pub struct GeminiImageClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout_ms: u64,
}

impl GeminiImageClient {
    pub fn new(config: &SynthesisConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| PhotoshootError::Config {
                message: format!("Failed to build reqwest client with timeout: {}", e),
            })?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_ms: config.timeout_ms,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    async fn send(
        &self,
        image: Option<&str>,
        text: &str,
        with_system: bool,
    ) -> std::result::Result<ImageRef, SynthesisError> {
        let mut parts = Vec::with_capacity(2);
        if let Some(image) = image {
            let (mime_type, data) = parse_data_url(image).ok_or_else(|| {
                SynthesisError::InvalidInput(
                    "expected a base64 data url (data:image/...;base64,...)".into(),
                )
            })?;
            parts.push(RequestPart::Inline {
                inline_data: InlineData { mime_type, data },
            });
        }
        parts.push(RequestPart::Text { text });

        let body = GenerateContentRequest {
            system_instruction: with_system.then(|| Content {
                parts: vec![RequestPart::Text {
                    text: SYSTEM_INSTRUCTION,
                }],
            }),
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE"],
            },
        };

        debug!(
            "Gemini generateContent (model={}, with_image={}, chars={})",
            self.model,
            image.is_some(),
            text.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SynthesisError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    SynthesisError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let message = response.text().await.unwrap_or_default();
            return Err(SynthesisError::RateLimited { message });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| SynthesisError::ParseError(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|content| content.parts.into_iter().find_map(|p| p.inline_data))
            .map(|inline| format!("data:{};base64,{}", inline.mime_type, inline.data))
            .ok_or(SynthesisError::NoImage)
    }
}

#[async_trait]
impl ImageSynthesizer for GeminiImageClient {
    async fn generate(
        &self,
        subject_image: &str,
        instruction: &str,
    ) -> std::result::Result<ImageRef, SynthesisError> {
        self.send(Some(subject_image), instruction, true).await
    }

    async fn generate_from_text(
        &self,
        prompt: &str,
    ) -> std::result::Result<ImageRef, SynthesisError> {
        self.send(None, prompt, false).await
    }

    async fn edit(
        &self,
        base_image: &str,
        instruction: &str,
    ) -> std::result::Result<ImageRef, SynthesisError> {
        self.send(Some(base_image), instruction, true).await
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_urls_split_into_mime_and_payload() {
        assert_eq!(
            parse_data_url("data:image/jpeg;base64,/9j/4AAQ"),
            Some(("image/jpeg", "/9j/4AAQ"))
        );
        assert_eq!(parse_data_url("https://picsum.photos/seed/x/800/1000"), None);
        assert_eq!(parse_data_url("data:text/plain;base64,aGk="), None);
    }

    #[test]
    fn request_body_uses_camel_case_wire_names() {
        let body = GenerateContentRequest {
            system_instruction: None,
            contents: vec![Content {
                parts: vec![
                    RequestPart::Inline {
                        inline_data: InlineData {
                            mime_type: "image/png",
                            data: "AAAA",
                        },
                    },
                    RequestPart::Text { text: "hello" },
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE"],
            },
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "contents": [{"parts": [
                    {"inlineData": {"mimeType": "image/png", "data": "AAAA"}},
                    {"text": "hello"}
                ]}],
                "generationConfig": {"responseModalities": ["IMAGE"]}
            })
        );
    }
}
