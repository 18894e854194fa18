//! Agent configuration

use serde::{Deserialize, Serialize};

const DEFAULT_SYSTEM_PROMPT: &str = "You are a voice assistant. Your interface with users \
will be voice. You should use short and concise responses, and avoid usage of \
unpronounceable punctuation. You are multilingual and always respond in the same \
language the user speaks.";

/// Agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent name for logs and session listings
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Language every session starts in (must be an enabled language)
    #[serde(default = "default_agent_language")]
    pub default_language: String,

    /// System prompt prepended to every LLM request
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Speak the greeting when a participant joins
    #[serde(default = "default_true")]
    pub greet_on_join: bool,

    /// Speak the "language not recognized" notice on a rejected switch request
    #[serde(default = "default_true")]
    pub speak_rejection_notice: bool,

    /// User/assistant exchanges kept as chat history
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,

    /// LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
}

fn default_agent_name() -> String {
    "polyglot".to_string()
}
fn default_agent_language() -> String {
    "en-US".to_string()
}
fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}
fn default_true() -> bool {
    true
}
fn default_max_history_turns() -> usize {
    10
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            default_language: default_agent_language(),
            system_prompt: default_system_prompt(),
            greet_on_join: true,
            speak_rejection_notice: true,
            max_history_turns: default_max_history_turns(),
            llm: LlmConfig::default(),
        }
    }
}

/// LLM provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Local Ollama server
    Ollama,
    /// OpenAI or any OpenAI-compatible chat completions endpoint
    #[serde(alias = "openai_compatible")]
    OpenAi,
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// LLM provider
    #[serde(default = "default_llm_provider")]
    pub provider: LlmProvider,

    /// Model name/ID
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API endpoint
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// API key (for cloud providers); set via POLYGLOT__AGENT__LLM__API_KEY
    #[serde(default)]
    pub api_key: Option<String>,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature for generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries on network errors and timeouts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_llm_provider() -> LlmProvider {
    LlmProvider::Ollama
}
fn default_llm_model() -> String {
    "qwen2.5:7b-instruct-q4_K_M".to_string()
}
fn default_llm_endpoint() -> String {
    "http://localhost:11434".to_string()
}
fn default_max_tokens() -> u32 {
    256
}
fn default_temperature() -> f32 {
    0.7
}
fn default_timeout_ms() -> u64 {
    30_000
}
fn default_max_retries() -> u32 {
    3
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            model: default_llm_model(),
            endpoint: default_llm_endpoint(),
            api_key: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.default_language, "en-US");
        assert!(config.greet_on_join);
        assert!(config.system_prompt.contains("same language"));
        assert_eq!(config.llm.provider, LlmProvider::Ollama);
    }

    #[test]
    fn test_provider_aliases() {
        let provider: LlmProvider = serde_json::from_str("\"openai_compatible\"").unwrap();
        assert_eq!(provider, LlmProvider::OpenAi);
    }
}
