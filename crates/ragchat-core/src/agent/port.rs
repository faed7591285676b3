//! AgentPort trait definition and its boxed wrapper.

use std::future::Future;
use std::pin::Pin;

use ragchat_types::agent::AgentReply;
use ragchat_types::chat::Message;
use ragchat_types::error::AgentError;

/// A tool-using conversational agent with its own memory buffer.
///
/// The memory is stateful: callers load a chat's history with
/// `set_memory_variables`, run one `invoke`, then read the updated
/// history back with `get_conversation_history`. Concurrent turns each take
/// their own `new_session`.
pub trait AgentPort: Send + Sync {
    /// An agent with the same model and tools and an empty memory buffer.
    fn new_session(&self) -> Self
    where
        Self: Sized;

    /// Run one agent turn for `query`.
    fn invoke(&self, query: &str) -> impl Future<Output = Result<AgentReply, AgentError>> + Send;

    /// Snapshot of the messages the agent would persist (its memory window).
    fn get_conversation_history(&self) -> impl Future<Output = Vec<Message>> + Send;

    /// Replace the memory buffer with `history`.
    fn set_memory_variables(&self, history: Vec<Message>) -> impl Future<Output = ()> + Send;

    /// Content of the last message in the memory buffer.
    fn get_last_response(&self) -> impl Future<Output = Result<String, AgentError>> + Send;
}

/// Object-safe version of [`AgentPort`] with boxed futures.
pub trait AgentPortDyn: Send + Sync {
    fn new_session_boxed(&self) -> Box<dyn AgentPortDyn + Send + Sync>;

    fn invoke_boxed<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<AgentReply, AgentError>> + Send + 'a>>;

    fn get_conversation_history_boxed(&self) -> Pin<Box<dyn Future<Output = Vec<Message>> + Send + '_>>;

    fn set_memory_variables_boxed(
        &self,
        history: Vec<Message>,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;

    fn get_last_response_boxed(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<String, AgentError>> + Send + '_>>;
}

impl<T: AgentPort + 'static> AgentPortDyn for T {
    fn new_session_boxed(&self) -> Box<dyn AgentPortDyn + Send + Sync> {
        Box::new(self.new_session())
    }

    fn invoke_boxed<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<AgentReply, AgentError>> + Send + 'a>> {
        Box::pin(self.invoke(query))
    }

    fn get_conversation_history_boxed(&self) -> Pin<Box<dyn Future<Output = Vec<Message>> + Send + '_>> {
        Box::pin(self.get_conversation_history())
    }

    fn set_memory_variables_boxed(
        &self,
        history: Vec<Message>,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(self.set_memory_variables(history))
    }

    fn get_last_response_boxed(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<String, AgentError>> + Send + '_>> {
        Box::pin(self.get_last_response())
    }
}

/// Type-erased agent, so the HTTP layer can be wired with the real
/// conversational agent or a test double.
pub struct BoxAgent {
    inner: Box<dyn AgentPortDyn + Send + Sync>,
}

impl BoxAgent {
    pub fn new<T: AgentPort + 'static>(agent: T) -> Self {
        Self {
            inner: Box::new(agent),
        }
    }
}

impl AgentPort for BoxAgent {
    fn new_session(&self) -> Self {
        Self {
            inner: self.inner.new_session_boxed(),
        }
    }

    async fn invoke(&self, query: &str) -> Result<AgentReply, AgentError> {
        self.inner.invoke_boxed(query).await
    }

    async fn get_conversation_history(&self) -> Vec<Message> {
        self.inner.get_conversation_history_boxed().await
    }

    async fn set_memory_variables(&self, history: Vec<Message>) {
        self.inner.set_memory_variables_boxed(history).await
    }

    async fn get_last_response(&self) -> Result<String, AgentError> {
        self.inner.get_last_response_boxed().await
    }
}
