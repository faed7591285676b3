//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `ragchat-core` using sqlx with split
//! read/write pools. One row per chat; the conversation is stored as its
//! JSON record shape in a TEXT column and replaced wholesale on save.

use chrono::Utc;
use sqlx::Row;

use ragchat_core::chat::repository::ChatRepository;
use ragchat_types::chat::{Chat, Conversation};
use ragchat_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Pool failures mean the database is unreachable; everything else is a
/// failed statement.
fn map_sqlx_error(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
            tracing::warn!(error = %err, "SQLite connection unavailable");
            RepositoryError::Connection
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

/// Internal row type for mapping SQLite rows to the domain Chat.
struct ChatRow {
    id: String,
    conversation: String,
}

impl ChatRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            conversation: row.try_get("conversation")?,
        })
    }

    fn into_chat(self) -> Result<Chat, RepositoryError> {
        let conversation: Conversation = serde_json::from_str(&self.conversation)
            .map_err(|e| RepositoryError::Serialization(format!("invalid conversation: {e}")))?;
        Ok(Chat {
            id: self.id,
            conversation,
        })
    }
}

impl ChatRepository for SqliteChatRepository {
    async fn save_chat(&self, chat: &Chat) -> Result<(), RepositoryError> {
        if chat.id.is_empty() {
            return Err(RepositoryError::Query("chat id must not be empty".to_string()));
        }

        let conversation = serde_json::to_string(&chat.conversation)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO chats (id, conversation, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?3)
               ON CONFLICT(id) DO UPDATE SET
                   conversation = excluded.conversation,
                   updated_at = excluded.updated_at"#,
        )
        .bind(&chat.id)
        .bind(&conversation)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        tracing::debug!(chat_id = %chat.id, messages = chat.conversation_history().len(), "Chat row upserted");
        Ok(())
    }

    async fn get_chat(&self, chat_id: &str) -> Result<Option<Chat>, RepositoryError> {
        let row = sqlx::query("SELECT id, conversation FROM chats WHERE id = ?1")
            .bind(chat_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        match row {
            Some(row) => {
                let chat_row = ChatRow::from_row(&row).map_err(map_sqlx_error)?;
                Ok(Some(chat_row.into_chat()?))
            }
            None => Ok(None),
        }
    }
}
