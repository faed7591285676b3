//! BoxChatRepository -- object-safe dynamic dispatch wrapper for ChatRepository.

use std::future::Future;
use std::pin::Pin;

use ragchat_types::chat::Chat;
use ragchat_types::error::RepositoryError;

use super::repository::ChatRepository;

/// Object-safe version of [`ChatRepository`] with boxed futures.
pub trait ChatRepositoryDyn: Send + Sync {
    fn save_chat_boxed<'a>(
        &'a self,
        chat: &'a Chat,
    ) -> Pin<Box<dyn Future<Output = Result<(), RepositoryError>> + Send + 'a>>;

    fn get_chat_boxed<'a>(
        &'a self,
        chat_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Chat>, RepositoryError>> + Send + 'a>>;
}

impl<T: ChatRepository> ChatRepositoryDyn for T {
    fn save_chat_boxed<'a>(
        &'a self,
        chat: &'a Chat,
    ) -> Pin<Box<dyn Future<Output = Result<(), RepositoryError>> + Send + 'a>> {
        Box::pin(self.save_chat(chat))
    }

    fn get_chat_boxed<'a>(
        &'a self,
        chat_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Chat>, RepositoryError>> + Send + 'a>> {
        Box::pin(self.get_chat(chat_id))
    }
}

/// Type-erased chat repository for runtime backend selection
/// (in-memory vs SQLite).
pub struct BoxChatRepository {
    inner: Box<dyn ChatRepositoryDyn + Send + Sync>,
}

impl BoxChatRepository {
    /// Wrap a concrete `ChatRepository` in a type-erased box.
    pub fn new<T: ChatRepository + 'static>(repository: T) -> Self {
        Self {
            inner: Box::new(repository),
        }
    }
}

impl ChatRepository for BoxChatRepository {
    async fn save_chat(&self, chat: &Chat) -> Result<(), RepositoryError> {
        self.inner.save_chat_boxed(chat).await
    }

    async fn get_chat(&self, chat_id: &str) -> Result<Option<Chat>, RepositoryError> {
        self.inner.get_chat_boxed(chat_id).await
    }
}
