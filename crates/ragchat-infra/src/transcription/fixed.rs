//! Transcriber that ignores the audio and returns a configured string.

use ragchat_core::transcription::TranscriptionPort;
use ragchat_types::error::TranscriptionError;

pub struct FixedTranscriber {
    text: String,
}

impl FixedTranscriber {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TranscriptionPort for FixedTranscriber {
    async fn transcribe_audio(&self, audio: &[u8]) -> Result<String, TranscriptionError> {
        tracing::debug!(bytes = audio.len(), "Fixed transcription");
        Ok(self.text.clone())
    }
}
