//! Speech processing traits

use async_trait::async_trait;

use crate::Result;

/// Streaming speech-to-text session
///
/// Transcripts flow out of the recognizer on their own channel; the
/// controller only ever reconfigures it.
///
/// # Example
///
/// ```ignore
/// let stt: Arc<dyn SpeechRecognizer> = Arc::new(AzureRecognizer::new(config));
/// stt.set_language("hi-IN").await?;
/// ```
#[async_trait]
pub trait SpeechRecognizer: Send + Sync + 'static {
    /// Recognize subsequent audio as `language_id` (BCP-47 tag)
    async fn set_language(&self, language_id: &str) -> Result<()>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Text-to-speech session bound to one participant
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + 'static {
    /// Speak subsequent text in `language_id` with `voice_id`
    async fn set_language(&self, language_id: &str, voice_id: &str) -> Result<()>;

    /// Speak `text` with the current voice
    async fn speak(&self, text: &str) -> Result<()>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mock implementation for testing
    #[derive(Default)]
    struct MockTts {
        voice: Mutex<Option<(String, String)>>,
        spoken: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SpeechSynthesizer for MockTts {
        async fn set_language(&self, language_id: &str, voice_id: &str) -> Result<()> {
            *self.voice.lock().unwrap() = Some((language_id.to_string(), voice_id.to_string()));
            Ok(())
        }

        async fn speak(&self, text: &str) -> Result<()> {
            self.spoken.lock().unwrap().push(text.to_string());
            Ok(())
        }

        fn name(&self) -> &str {
            "mock-tts"
        }
    }

    #[tokio::test]
    async fn test_synthesizer_as_trait_object() {
        let mock = std::sync::Arc::new(MockTts::default());
        let tts: std::sync::Arc<dyn SpeechSynthesizer> = mock.clone();

        tts.set_language("ta-IN", "ta-IN-PallaviNeural").await.unwrap();
        tts.speak("வணக்கம்").await.unwrap();

        assert_eq!(
            mock.voice.lock().unwrap().clone(),
            Some(("ta-IN".to_string(), "ta-IN-PallaviNeural".to_string()))
        );
        assert_eq!(mock.spoken.lock().unwrap().as_slice(), ["வணக்கம்"]);
        assert_eq!(tts.name(), "mock-tts");
    }
}
