//! Prompt Building
//!
//! Every turn is sent as: the configured system prompt, a system message
//! pinning the reply language to the session's current language, the
//! bounded chat history, and the new user message.

use polyglot_core::{GenerateRequest, LanguageProfile, Message};

/// Builds the LLM request for one conversation turn
pub struct PromptBuilder {
    system_prompt: String,
    messages: Vec<Message>,
    language_hint: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            messages: Vec::new(),
            language_hint: None,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Instruct the model to reply in `language`
    pub fn with_language(mut self, language: &LanguageProfile) -> Self {
        self.messages
            .push(Message::system(Self::language_instruction(language)));
        self.language_hint = Some(language.id.clone());
        self
    }

    /// Language instruction for `language`
    pub fn language_instruction(language: &LanguageProfile) -> String {
        format!(
            "The user is speaking {name}. Reply only in {name} ({native}), written in {script} \
             script, even if earlier messages were in another language. Do not use markdown, \
             lists or emoji.",
            name = language.display_name,
            native = language.native_name,
            script = language.script,
        )
    }

    /// Add conversation history
    pub fn with_history<'a>(mut self, history: impl IntoIterator<Item = &'a Message>) -> Self {
        self.messages.extend(history.into_iter().cloned());
        self
    }

    /// Add current user message
    pub fn user_message(mut self, message: &str) -> Self {
        self.messages.push(Message::user(message));
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Get message count, including the system prompt
    pub fn message_count(&self) -> usize {
        self.messages.len() + 1
    }

    /// Build the generation request
    pub fn build(self) -> GenerateRequest {
        let mut request = GenerateRequest::new(self.system_prompt);
        request.messages.extend(self.messages);
        request.language_hint = self.language_hint;
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        request
    }
}
