//! ChatRepository trait definition.

use ragchat_types::chat::Chat;
use ragchat_types::error::RepositoryError;

/// Repository trait for chat aggregate persistence.
///
/// Implementations live in ragchat-infra (`InMemoryChatRepository`,
/// `SqliteChatRepository`). Uses native async fn in traits (RPITIT, Rust
/// 2024 edition).
pub trait ChatRepository: Send + Sync {
    /// Insert or fully replace the chat stored under `chat.id`.
    fn save_chat(
        &self,
        chat: &Chat,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a chat by its id. Returns `Ok(None)` when absent.
    fn get_chat(
        &self,
        chat_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Chat>, RepositoryError>> + Send;
}
