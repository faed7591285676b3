//! Tool trait for agent-callable capabilities, plus its boxed wrapper.

use std::future::Future;
use std::pin::Pin;

use ragchat_types::error::AgentError;

/// A named capability the agent can invoke with a text input.
///
/// The name and description are rendered into the agent prompt verbatim.
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Run the tool and return its observation.
    fn run(&self, input: &str) -> impl Future<Output = Result<String, AgentError>> + Send;
}

/// Object-safe version of [`Tool`] with boxed futures.
pub trait ToolDyn: Send + Sync {
    fn name_dyn(&self) -> &str;

    fn description_dyn(&self) -> &str;

    fn run_boxed<'a>(
        &'a self,
        input: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, AgentError>> + Send + 'a>>;
}

impl<T: Tool> ToolDyn for T {
    fn name_dyn(&self) -> &str {
        self.name()
    }

    fn description_dyn(&self) -> &str {
        self.description()
    }

    fn run_boxed<'a>(
        &'a self,
        input: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, AgentError>> + Send + 'a>> {
        Box::pin(self.run(input))
    }
}

/// Type-erased tool so the agent can hold a heterogeneous tool list.
pub struct BoxTool {
    inner: Box<dyn ToolDyn + Send + Sync>,
}

impl BoxTool {
    pub fn new<T: Tool + 'static>(tool: T) -> Self {
        Self {
            inner: Box::new(tool),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name_dyn()
    }

    pub fn description(&self) -> &str {
        self.inner.description_dyn()
    }

    pub async fn run(&self, input: &str) -> Result<String, AgentError> {
        self.inner.run_boxed(input).await
    }
}
