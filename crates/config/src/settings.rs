//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{AgentConfig, ConfigError, DetectionConfig, LanguagesConfig};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Agent configuration
    #[serde(default)]
    pub agent: AgentConfig,

    /// Enabled languages
    #[serde(default)]
    pub languages: LanguagesConfig,

    /// Language detection
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_agent()?;
        self.detection.validate()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "Port cannot be 0"));
        }
        if self.environment.is_production()
            && self.server.cors_enabled
            && self.server.cors_origins.iter().any(|o| o == "*")
        {
            return Err(ConfigError::invalid(
                "server.cors_origins",
                "Wildcard origin is not allowed in production",
            ));
        }
        Ok(())
    }

    fn validate_agent(&self) -> Result<(), ConfigError> {
        if self.agent.max_history_turns == 0 {
            return Err(ConfigError::invalid("agent.max_history_turns", "Must be at least 1"));
        }
        if !(0.0..=2.0).contains(&self.agent.llm.temperature) {
            return Err(ConfigError::invalid(
                "agent.llm.temperature",
                format!("Must be between 0.0 and 2.0, got {}", self.agent.llm.temperature),
            ));
        }
        let registry = self.languages.build_registry()?;
        if !registry.contains(&self.agent.default_language) {
            return Err(ConfigError::invalid(
                "agent.default_language",
                format!(
                    "'{}' is not one of the enabled languages",
                    self.agent.default_language
                ),
            ));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_timeout() -> u64 {
    30
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Expose Prometheus metrics on /metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from `config/` in the working directory
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings from `dir/default.*`, `dir/{env}.*` and POLYGLOT__* variables
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::from(dir.join("default")).required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder = builder.add_source(File::from(dir.join(env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("POLYGLOT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;
    tracing::debug!(
        default_language = %settings.agent.default_language,
        strategy = ?settings.detection.strategy,
        "Settings loaded"
    );

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DetectionStrategy, LlmProvider};
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.agent.default_language, "en-US");
        assert_eq!(settings.detection.confidence_threshold, 0.5);
        assert_eq!(settings.detection.min_chars, 3);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());

        settings.server.port = 9000;
        settings.agent.max_history_turns = 0;
        assert!(settings.validate().is_err());

        settings.agent.max_history_turns = 4;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_default_language_must_be_enabled() {
        let mut settings = Settings::default();
        settings.languages.enabled = vec!["hi-IN".to_string(), "ta-IN".to_string()];
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "agent.default_language"
        ));

        settings.agent.default_language = "ta-IN".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let mut settings = Settings::default();
        settings.server.cors_origins = vec!["*".to_string()];
        assert!(settings.validate().is_ok());

        settings.environment = RuntimeEnvironment::Production;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_settings_from_files() {
        let dir = tempfile::tempdir().unwrap();

        let mut default = std::fs::File::create(dir.path().join("default.toml")).unwrap();
        writeln!(
            default,
            r#"
[agent]
default_language = "hi-IN"

[languages]
enabled = ["hi-IN", "en-US", "ta-IN"]

[detection]
strategy = "script"
confidence_threshold = 0.6
"#
        )
        .unwrap();

        let mut staging = std::fs::File::create(dir.path().join("staging.toml")).unwrap();
        writeln!(
            staging,
            r#"
[server]
port = 9090

[agent.llm]
provider = "openai"
model = "gpt-4o-mini"
"#
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), Some("staging")).unwrap();
        assert_eq!(settings.agent.default_language, "hi-IN");
        assert_eq!(settings.languages.enabled.len(), 3);
        assert_eq!(settings.detection.strategy, DetectionStrategy::Script);
        assert_eq!(settings.detection.confidence_threshold, 0.6);
        assert_eq!(settings.detection.min_chars, 3);
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.agent.llm.provider, LlmProvider::OpenAi);
        assert_eq!(settings.agent.llm.model, "gpt-4o-mini");
    }

    #[test]
    fn test_load_settings_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[detection]\nconfidence_threshold = 3.0\n",
        )
        .unwrap();

        assert!(load_settings_from(dir.path(), None).is_err());
    }
}
