use async_trait::async_trait;
use thiserror::Error;

/// Images travel as strings: `data:<mime>;base64,<payload>` or an http(s) url.
pub type ImageRef = String;

#[derive(Debug, Clone, Error)]
pub enum SynthesisError {
    #[error("rate limited (HTTP 429): {message}")]
    RateLimited { message: String },
    #[error("api error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("no image data found in response")]
    NoImage,
    #[error("invalid input image: {0}")]
    InvalidInput(String),
    #[error("injected failure on call {call}")]
    Injected { call: usize },
}

impl SynthesisError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SynthesisError::RateLimited { .. })
    }
}

/// External image synthesis capability. Every call may take seconds and may
/// fail; callers never retry on their own.
#[async_trait]
pub trait ImageSynthesizer: Send + Sync {
    /// Photorealistic image of the subject, conditioned on the instruction.
    async fn generate(&self, subject_image: &str, instruction: &str)
    -> Result<ImageRef, SynthesisError>;

    /// Backdrop image from text alone, no subject involved.
    async fn generate_from_text(&self, prompt: &str) -> Result<ImageRef, SynthesisError>;

    /// Localized change to an existing image, keeping identity and everything
    /// the instruction does not mention.
    async fn edit(&self, base_image: &str, instruction: &str) -> Result<ImageRef, SynthesisError>;

    fn name(&self) -> &'static str;
}
