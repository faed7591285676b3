//! OpenAI transcription client (Whisper-style multipart API).

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use ragchat_core::transcription::TranscriptionPort;
use ragchat_types::error::TranscriptionError;

/// Uploads audio as `audio.m4a` and returns the `text` field of the reply.
///
/// The API key is held as a `SecretString` and only exposed when building
/// the `Authorization` header.
pub struct OpenAiTranscriptionClient {
    http: reqwest::Client,
    api_key: SecretString,
    url: String,
    model: String,
}

impl OpenAiTranscriptionClient {
    const FILE_NAME: &'static str = "audio.m4a";
    const MIME_TYPE: &'static str = "audio/m4a";

    pub fn new(api_key: SecretString, url: String, model: String) -> Result<Self, TranscriptionError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| TranscriptionError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key,
            url,
            model,
        })
    }
}

impl TranscriptionPort for OpenAiTranscriptionClient {
    async fn transcribe_audio(&self, audio: &[u8]) -> Result<String, TranscriptionError> {
        debug!(model = %self.model, size = audio.len(), "Transcription request");

        let file_part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name(Self::FILE_NAME)
            .mime_str(Self::MIME_TYPE)
            .map_err(|e| TranscriptionError::Network(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.model.clone());

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranscriptionError::Parse(e.to_string()))?;

        json["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| TranscriptionError::Parse("response has no 'text' field".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;

    fn client(url: String) -> OpenAiTranscriptionClient {
        OpenAiTranscriptionClient::new(
            SecretString::from("sk-test".to_string()),
            url,
            "whisper-1".to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_transcribe_posts_multipart_and_reads_text() {
        let (base, server) = serve_once(200, r#"{"text": "what is rust"}"#).await;
        let client = client(format!("{base}/v1/audio/transcriptions"));

        let text = client.transcribe_audio(b"fake-audio").await.unwrap();
        assert_eq!(text, "what is rust");

        let request = server.await.unwrap();
        assert_eq!(request.request_line, "POST /v1/audio/transcriptions HTTP/1.1");
        assert_eq!(request.header("authorization"), Some("Bearer sk-test"));
        assert!(
            request
                .header("content-type")
                .unwrap()
                .starts_with("multipart/form-data")
        );
        let body = request.body_text();
        assert!(body.contains("filename=\"audio.m4a\""));
        assert!(body.contains("audio/m4a"));
        assert!(body.contains("whisper-1"));
        assert!(body.contains("fake-audio"));
    }

    #[tokio::test]
    async fn test_upstream_error_is_http_error() {
        let (base, _server) = serve_once(401, r#"{"error": {"message": "bad key"}}"#).await;
        let client = client(base);

        let err = client.transcribe_audio(b"x").await.unwrap_err();
        match err {
            TranscriptionError::Http { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("bad key"));
            }
            other => panic!("Expected Http error, got: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_text_is_parse_error() {
        let (base, _server) = serve_once(200, r#"{"segments": []}"#).await;
        let client = client(base);

        let err = client.transcribe_audio(b"x").await.unwrap_err();
        assert!(matches!(err, TranscriptionError::Parse(_)));
    }
}
