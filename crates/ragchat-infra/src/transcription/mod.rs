//! Speech-to-text adapters implementing `TranscriptionPort`.
//!
//! - `OpenAiTranscriptionClient`: multipart upload to an OpenAI-style
//!   `/audio/transcriptions` endpoint
//! - `FixedTranscriber`: returns configured text, for offline runs

pub mod fixed;
pub mod openai;

use ragchat_core::transcription::BoxTranscriber;
use ragchat_types::config::{TranscriptionBackend, TranscriptionSettings};
use ragchat_types::error::TranscriptionError;
use secrecy::SecretString;

use self::fixed::FixedTranscriber;
use self::openai::OpenAiTranscriptionClient;

/// Build the transcriber selected by `settings.backend`.
pub fn create_transcriber(
    settings: &TranscriptionSettings,
    api_key: &str,
) -> Result<BoxTranscriber, TranscriptionError> {
    match settings.backend {
        TranscriptionBackend::OpenAi => {
            let client = OpenAiTranscriptionClient::new(
                SecretString::from(api_key.to_string()),
                settings.url.clone(),
                settings.model.clone(),
            )?;
            Ok(BoxTranscriber::new(client))
        }
        TranscriptionBackend::Fixed => {
            Ok(BoxTranscriber::new(FixedTranscriber::new(settings.fixed_text.clone())))
        }
    }
}
