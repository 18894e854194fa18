//! LLM Factory
//!
//! Creates the configured backend behind the core `LanguageModel` trait.

use std::sync::Arc;

use polyglot_config::LlmProvider;
use polyglot_core::LanguageModel;

use crate::backend::{LlmConfig, OllamaBackend, OpenAiBackend};
use crate::LlmError;

/// Build the language model selected by `config.provider`
pub fn create_language_model(
    config: &polyglot_config::LlmConfig,
) -> Result<Arc<dyn LanguageModel>, LlmError> {
    let backend_config = LlmConfig::from(config);
    tracing::info!(
        provider = ?config.provider,
        model = %backend_config.model,
        endpoint = %backend_config.endpoint,
        "Creating LLM backend"
    );

    let model: Arc<dyn LanguageModel> = match config.provider {
        LlmProvider::Ollama => Arc::new(OllamaBackend::new(backend_config)?),
        LlmProvider::OpenAi => Arc::new(OpenAiBackend::new(backend_config)?),
    };
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_ollama_by_default() {
        let llm = create_language_model(&polyglot_config::LlmConfig::default()).unwrap();
        assert_eq!(llm.model_name(), "qwen2.5:7b-instruct-q4_K_M");
    }

    #[test]
    fn test_openai_without_key_fails() {
        let config = polyglot_config::LlmConfig {
            provider: LlmProvider::OpenAi,
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            create_language_model(&config),
            Err(LlmError::Configuration(_))
        ));
    }
}
