pub mod gemini;
pub mod placeholder;
pub mod traits;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::{Provider, SynthesisConfig};
use crate::error::{PhotoshootError, Result};

pub use gemini::GeminiImageClient;
pub use placeholder::PlaceholderSynthesizer;
pub use traits::{ImageRef, ImageSynthesizer, SynthesisError};

// Factory function to create the image capability from configuration
pub fn create_synthesizer(
    config: &SynthesisConfig,
    api_key: Option<&str>,
) -> Result<Arc<dyn ImageSynthesizer>> {
    let key = api_key.filter(|k| !is_placeholder_key(k));
    let placeholder = || {
        Arc::new(PlaceholderSynthesizer::new(Duration::from_millis(
            config.mock_latency_ms,
        )))
    };

    match config.provider {
        Provider::Gemini => {
            let key = key.ok_or_else(|| PhotoshootError::Config {
                message: "provider=gemini but GEMINI_API_KEY is not set".into(),
            })?;
            info!("Using Gemini image synthesis (model={})", config.model);
            Ok(Arc::new(GeminiImageClient::new(config, key.to_string())?))
        }
        Provider::Placeholder => {
            info!("Using placeholder image synthesis");
            Ok(placeholder())
        }
        Provider::Auto => match key {
            Some(key) => {
                info!("Using Gemini image synthesis (model={})", config.model);
                Ok(Arc::new(GeminiImageClient::new(config, key.to_string())?))
            }
            None => {
                warn!("GEMINI_API_KEY is not set; using placeholder images");
                Ok(placeholder())
            }
        },
    }
}

pub(crate) fn is_placeholder_key(s: &str) -> bool {
    let t = s.trim();
    t.is_empty()
        || t.contains("${")
        || t.eq_ignore_ascii_case("your-api-key-here")
        || t.eq_ignore_ascii_case("changeme")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_falls_back_to_placeholder_without_key() {
        let cfg = SynthesisConfig::default();
        let synth = create_synthesizer(&cfg, Some("changeme")).unwrap();
        assert_eq!(synth.name(), "placeholder");
    }

    #[test]
    fn auto_prefers_gemini_with_key() {
        let cfg = SynthesisConfig::default();
        let synth = create_synthesizer(&cfg, Some("real-key")).unwrap();
        assert_eq!(synth.name(), "gemini");
    }

    #[test]
    fn explicit_gemini_requires_key() {
        let cfg = SynthesisConfig {
            provider: Provider::Gemini,
            ..SynthesisConfig::default()
        };
        assert!(matches!(
            create_synthesizer(&cfg, None),
            Err(PhotoshootError::Config { .. })
        ));
    }

    #[test]
    fn placeholder_keys_are_detected() {
        assert!(is_placeholder_key("  "));
        assert!(is_placeholder_key("${GEMINI_API_KEY}"));
        assert!(!is_placeholder_key("AIza-something"));
    }
}
