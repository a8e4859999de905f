//! Domain-specific error types for neuro-photoshoot

use thiserror::Error;

use crate::clients::SynthesisError;

/// Main error type for the photoshoot engine
#[derive(Error, Debug)]
pub enum PhotoshootError {
    #[error("Missing selection: {what}")]
    MissingSelection { what: String },

    #[error("Generation failed at batch index {index}: {source}")]
    Generation {
        index: usize,
        #[source]
        source: SynthesisError,
    },

    #[error("Edit failed: {source}")]
    EditFailed {
        #[source]
        source: SynthesisError,
    },

    /// Non-fatal: the prompt compiler logs this and substitutes a placeholder.
    #[error("Unresolved {kind} preset: {id}")]
    UnresolvedReference { kind: &'static str, id: String },

    #[error("Invalid selection: {message}")]
    InvalidSelection { message: String },

    #[error("Image {id} not found in output document")]
    ImageNotFound { id: u32 },

    #[error("Image synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },
}

impl PhotoshootError {
    /// True when the underlying capability rejected the call for quota reasons.
    /// Callers use this to show dedicated rate-limit messaging.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            PhotoshootError::Generation { source, .. }
            | PhotoshootError::EditFailed { source }
            | PhotoshootError::Synthesis(source) => source.is_rate_limited(),
            _ => false,
        }
    }

    /// Batch index of a failed generation, if this is one.
    pub fn failed_index(&self) -> Option<usize> {
        match self {
            PhotoshootError::Generation { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub(crate) fn missing(what: impl Into<String>) -> Self {
        PhotoshootError::MissingSelection { what: what.into() }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        PhotoshootError::InvalidSelection {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for PhotoshootError {
    fn from(err: serde_json::Error) -> Self {
        PhotoshootError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for PhotoshootError {
    fn from(err: std::io::Error) -> Self {
        PhotoshootError::Io {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PhotoshootError {
    fn from(err: toml::de::Error) -> Self {
        PhotoshootError::Config {
            message: format!("Invalid config file: {}", err),
        }
    }
}

/// Result type alias for photoshoot operations
pub type Result<T> = std::result::Result<T, PhotoshootError>;
