use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub inference: InferenceConfig,
    pub digest: DigestConfig,
    pub classify: ClassifyConfig,
    pub features: FeatureFlags,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InferenceConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub summarization_model: String,
    pub classification_model: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DigestConfig {
    pub max_chunk_words: usize,
    pub min_summary_tokens: usize,
    pub max_summary_tokens: usize,
    pub soft_word_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClassifyConfig {
    pub head_chars: usize,
    pub default_labels: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeatureFlags {
    pub pdf_upload_enabled: bool,
    pub pdf_export_enabled: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = AppConfig::load();
        assert!(config.is_ok(), "Default config should load: {config:?}");

        // server.port is asserted in test_env_override, which mutates it.
        let config = config.unwrap();
        assert!(config.features.pdf_upload_enabled);
        assert!(config.features.pdf_export_enabled);
        assert_eq!(config.digest.max_chunk_words, 250);
        assert_eq!(config.digest.min_summary_tokens, 50);
        assert_eq!(config.classify.head_chars, 800);
        assert_eq!(config.classify.default_labels.len(), 8);
        assert!(config.inference.api_token.is_none());
    }

    #[test]
    fn test_env_override() {
        unsafe {
            std::env::set_var("APP__SERVER__PORT", "8080");
        }

        let config = AppConfig::load().unwrap();
        assert_eq!(config.server.port, 8080);

        unsafe {
            std::env::remove_var("APP__SERVER__PORT");
        }
    }
}
