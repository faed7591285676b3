//! In-memory chat repository.
//!
//! Backs `ChatRepository` with a concurrent map. State lives only as long
//! as the process; used for tests and `storage.backend = "memory"`.

use dashmap::DashMap;

use ragchat_core::chat::repository::ChatRepository;
use ragchat_types::chat::Chat;
use ragchat_types::error::RepositoryError;

/// Process-local chat store keyed by chat id.
#[derive(Default)]
pub struct InMemoryChatRepository {
    chats: DashMap<String, Chat>,
}

impl InMemoryChatRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChatRepository for InMemoryChatRepository {
    async fn save_chat(&self, chat: &Chat) -> Result<(), RepositoryError> {
        if chat.id.is_empty() {
            return Err(RepositoryError::Query("chat id must not be empty".to_string()));
        }
        self.chats.insert(chat.id.clone(), chat.clone());
        Ok(())
    }

    async fn get_chat(&self, chat_id: &str) -> Result<Option<Chat>, RepositoryError> {
        Ok(self.chats.get(chat_id).map(|entry| entry.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragchat_types::chat::Message;

    #[tokio::test]
    async fn test_save_then_get() {
        let repo = InMemoryChatRepository::new();
        let mut chat = Chat::with_id("abc");
        chat.update_conversation(vec![Message::human("hi")]);

        repo.save_chat(&chat).await.unwrap();

        let loaded = repo.get_chat("abc").await.unwrap().unwrap();
        assert_eq!(loaded, chat);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let repo = InMemoryChatRepository::new();
        assert!(repo.get_chat("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_existing() {
        let repo = InMemoryChatRepository::new();
        let mut chat = Chat::with_id("abc");
        repo.save_chat(&chat).await.unwrap();

        chat.update_conversation(vec![Message::human("q"), Message::ai("a")]);
        repo.save_chat(&chat).await.unwrap();

        let loaded = repo.get_chat("abc").await.unwrap().unwrap();
        assert_eq!(loaded.conversation_history().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_id_rejected() {
        let repo = InMemoryChatRepository::new();
        let result = repo.save_chat(&Chat::with_id("")).await;
        assert!(matches!(result, Err(RepositoryError::Query(_))));
        assert!(repo.get_chat("").await.unwrap().is_none());
    }
}
