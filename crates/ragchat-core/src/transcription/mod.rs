//! Speech-to-text port for ragchat.
//!
//! - `TranscriptionPort`: RPITIT trait implemented in ragchat-infra
//! - `BoxTranscriber`: object-safe wrapper for runtime backend selection

use std::future::Future;
use std::pin::Pin;

use ragchat_types::error::TranscriptionError;

/// Converts an audio payload into text.
pub trait TranscriptionPort: Send + Sync {
    /// Transcribe `audio` and return the recognized text.
    ///
    /// Fails on upstream HTTP errors; never returns the raw bytes.
    fn transcribe_audio(
        &self,
        audio: &[u8],
    ) -> impl Future<Output = Result<String, TranscriptionError>> + Send;
}

/// Object-safe version of [`TranscriptionPort`] with boxed futures.
pub trait TranscriptionPortDyn: Send + Sync {
    fn transcribe_audio_boxed<'a>(
        &'a self,
        audio: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = Result<String, TranscriptionError>> + Send + 'a>>;
}

impl<T: TranscriptionPort> TranscriptionPortDyn for T {
    fn transcribe_audio_boxed<'a>(
        &'a self,
        audio: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = Result<String, TranscriptionError>> + Send + 'a>> {
        Box::pin(self.transcribe_audio(audio))
    }
}

/// Type-erased transcriber (OpenAI vs fixed text).
pub struct BoxTranscriber {
    inner: Box<dyn TranscriptionPortDyn + Send + Sync>,
}

impl BoxTranscriber {
    pub fn new<T: TranscriptionPort + 'static>(transcriber: T) -> Self {
        Self {
            inner: Box::new(transcriber),
        }
    }
}

impl TranscriptionPort for BoxTranscriber {
    async fn transcribe_audio(&self, audio: &[u8]) -> Result<String, TranscriptionError> {
        self.inner.transcribe_audio_boxed(audio).await
    }
}
