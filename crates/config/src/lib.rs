//! Configuration management for the polyglot voice agent
//!
//! Supports loading configuration from:
//! - YAML/TOML/JSON files (`config/default`, `config/{env}`)
//! - Environment variables (POLYGLOT_ prefix, `__` separator)

pub mod agent;
pub mod languages;
pub mod settings;

pub use agent::{AgentConfig, LlmConfig, LlmProvider};
pub use languages::{DetectionConfig, DetectionStrategy, LanguagesConfig};
pub use settings::{
    load_settings, load_settings_from, ObservabilityConfig, RuntimeEnvironment, ServerConfig,
    Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Unknown language in configuration: {0}")]
    UnknownLanguage(String),
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for polyglot_core::Error {
    fn from(err: ConfigError) -> Self {
        polyglot_core::Error::Config(err.to_string())
    }
}
