//! Chat service orchestrating conversation start and continuation.
//!
//! ChatService coordinates the ChatRepository, the AgentPort, and the
//! TranscriptionPort. It holds no conversation state between calls: the
//! repository owns persisted chats and every turn runs on a fresh agent
//! session loaded from the stored history.

use tracing::{debug, info};

use ragchat_types::chat::Chat;
use ragchat_types::error::ChatError;

use crate::agent::port::AgentPort;
use crate::chat::repository::ChatRepository;
use crate::transcription::TranscriptionPort;

/// Starts and continues conversations.
///
/// Generic over its three ports to keep ragchat-core free of any
/// infrastructure dependency.
pub struct ChatService<A: AgentPort, R: ChatRepository, T: TranscriptionPort> {
    /// Template for per-turn agent sessions.
    agent: A,
    repository: R,
    transcriber: T,
}

impl<A: AgentPort, R: ChatRepository, T: TranscriptionPort> ChatService<A, R, T> {
    pub fn new(agent: A, repository: R, transcriber: T) -> Self {
        Self {
            agent,
            repository,
            transcriber,
        }
    }

    /// Access the chat repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Create and persist an empty chat, returning its id.
    pub async fn start_conversation(&self) -> Result<String, ChatError> {
        let chat = Chat::new();
        self.repository.save_chat(&chat).await?;
        info!(chat_id = %chat.id, "Conversation started");
        Ok(chat.id)
    }

    /// Run one agent turn on an existing chat and return the agent's reply.
    ///
    /// A non-empty `voice` payload takes precedence over `query`. With
    /// neither present the call fails with `InputNotProvided` before any
    /// port is touched.
    pub async fn continue_conversation(
        &self,
        conversation_id: &str,
        query: Option<&str>,
        voice: Option<&[u8]>,
    ) -> Result<String, ChatError> {
        let input = match (voice, query) {
            (Some(audio), _) if !audio.is_empty() => {
                debug!(chat_id = %conversation_id, bytes = audio.len(), "Transcribing voice input");
                self.transcriber.transcribe_audio(audio).await?
            }
            (_, Some(text)) if !text.is_empty() => text.to_string(),
            _ => return Err(ChatError::InputNotProvided),
        };

        let chat = self
            .repository
            .get_chat(conversation_id)
            .await?
            .ok_or_else(|| ChatError::NoChatFound(conversation_id.to_string()))?;

        let agent = self.agent.new_session();
        agent
            .set_memory_variables(chat.conversation_history().to_vec())
            .await;
        let reply = agent.invoke(&input).await?;
        debug!(
            chat_id = %conversation_id,
            steps = reply.intermediate_steps.len(),
            "Agent turn complete"
        );

        let mut updated = Chat::with_id(conversation_id);
        updated.update_conversation(agent.get_conversation_history().await);

        info!(chat_id = %conversation_id, "Saving chat");
        self.repository.save_chat(&updated).await?;
        info!(chat_id = %conversation_id, "Chat saved");

        Ok(agent.get_last_response().await?)
    }
}
