use serde::{Deserialize, Serialize};

/// Main configuration structure loaded from neuro_photoshoot.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Which image capability backs the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// Gemini when an API key is present, placeholder images otherwise
    #[default]
    Auto,
    Gemini,
    Placeholder,
}

impl std::str::FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Provider::Auto),
            "gemini" => Ok(Provider::Gemini),
            "placeholder" | "mock" => Ok(Provider::Placeholder),
            other => anyhow::bail!("Unknown provider '{}'", other),
        }
    }
}

/// Image synthesis client settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SynthesisConfig {
    pub provider: Provider,
    pub model: String,
    pub base_url: String,
    pub timeout_ms: u64,
    /// Artificial delay of the placeholder provider, per call
    pub mock_latency_ms: u64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Auto,
            model: "gemini-2.5-flash-image".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_ms: 120_000,
            mock_latency_ms: 1500,
        }
    }
}

/// Where the CLI writes result bundles
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "photoshoots".to_string(),
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub api_key: Option<String>,
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            log_level: "neuro_photoshoot=info".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .or_else(|| std::env::var("API_KEY").ok())
                .filter(|k| !crate::clients::is_placeholder_key(k)),
            log_level: std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "neuro_photoshoot=info".to_string()),
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses NEURO_PHOTOSHOOT_CONFIG environment variable or defaults to "neuro_photoshoot.toml"
    pub fn load() -> anyhow::Result<Self> {
        // A missing .env is fine; real env vars still apply
        let _ = dotenvy::dotenv();

        let config_path = std::env::var("NEURO_PHOTOSHOOT_CONFIG")
            .unwrap_or_else(|_| "neuro_photoshoot.toml".to_string());

        let mut config: Config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            Self::from_toml(&content)?
        } else {
            tracing::debug!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides()?;
        config.runtime = RuntimeConfig::load_from_env();
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Env-first overrides for the synthesis section
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        if let Ok(provider) = std::env::var("PHOTOSHOOT_PROVIDER") {
            self.synthesis.provider = provider.parse()?;
            tracing::debug!("PHOTOSHOOT_PROVIDER env override applied");
        }
        if let Ok(model) = std::env::var("GEMINI_IMAGE_MODEL")
            && !model.trim().is_empty()
        {
            self.synthesis.model = model;
        }
        if let Ok(url) = std::env::var("GEMINI_BASE_URL")
            && !url.trim().is_empty()
        {
            self.synthesis.base_url = url;
        }
        if let Some(timeout) = std::env::var("PHOTOSHOOT_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.synthesis.timeout_ms = timeout;
        }
        if let Some(latency) = std::env::var("PHOTOSHOOT_MOCK_LATENCY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.synthesis.mock_latency_ms = latency;
        }
        if let Ok(dir) = std::env::var("PHOTOSHOOT_OUTPUT_DIR") {
            self.output.dir = dir;
        }
        Ok(())
    }

    /// Replaces the provider chosen by file/env and re-checks the result.
    pub fn override_provider(&mut self, provider: Provider) -> anyhow::Result<()> {
        self.synthesis.provider = provider;
        tracing::debug!("provider override: {:?}", provider);
        self.validate()
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.synthesis.timeout_ms == 0 {
            anyhow::bail!("synthesis.timeout_ms must be > 0");
        }
        if self.synthesis.model.trim().is_empty() {
            anyhow::bail!("synthesis.model must not be empty");
        }
        if !self.synthesis.base_url.starts_with("http://")
            && !self.synthesis.base_url.starts_with("https://")
        {
            anyhow::bail!(
                "synthesis.base_url '{}' must start with http:// or https://",
                self.synthesis.base_url
            );
        }
        if self.synthesis.provider == Provider::Gemini && self.runtime.api_key.is_none() {
            tracing::warn!("provider=gemini but no API key is configured");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.synthesis.model, "gemini-2.5-flash-image");
        assert_eq!(config.synthesis.provider, Provider::Auto);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [synthesis]
            provider = "placeholder"
            mock_latency_ms = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.synthesis.provider, Provider::Placeholder);
        assert_eq!(config.synthesis.mock_latency_ms, 0);
        assert_eq!(config.synthesis.timeout_ms, 120_000);
        assert_eq!(config.output.dir, "photoshoots");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = Config::default();
        config.synthesis.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn provider_override_is_revalidated() {
        let mut config = Config::default();
        config.override_provider(Provider::Placeholder).unwrap();
        assert_eq!(config.synthesis.provider, Provider::Placeholder);

        config.synthesis.base_url = "generativelanguage.googleapis.com".to_string();
        assert!(config.override_provider(Provider::Gemini).is_err());
        assert_eq!(config.synthesis.provider, Provider::Gemini);
    }

    #[test]
    fn provider_parses_aliases() {
        assert_eq!("mock".parse::<Provider>().unwrap(), Provider::Placeholder);
        assert_eq!("Gemini".parse::<Provider>().unwrap(), Provider::Gemini);
        assert!("dalle".parse::<Provider>().is_err());
    }
}
