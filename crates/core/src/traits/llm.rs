//! Language Model traits

use async_trait::async_trait;

use crate::{GenerateRequest, GenerateResponse, Result};

/// Language Model interface
///
/// Implementations:
/// - `OllamaBackend` - Local Ollama inference
/// - `OpenAiBackend` - OpenAI-compatible chat completions
///
/// # Example
///
/// ```ignore
/// let llm: Arc<dyn LanguageModel> = Arc::new(OllamaBackend::new(config)?);
/// let request = GenerateRequest::new("You are a voice assistant")
///     .with_user_message("How is the weather?")
///     .with_language_hint("hi-IN");
/// let response = llm.generate(request).await?;
/// println!("{}", response.text);
/// ```
#[async_trait]
pub trait LanguageModel: Send + Sync + 'static {
    /// Generate completion
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;

    /// Check if the backend is reachable
    async fn is_available(&self) -> bool;

    /// Get model name for logging
    fn model_name(&self) -> &str;
}
