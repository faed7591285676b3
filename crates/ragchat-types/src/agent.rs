//! Agent configuration and turn result types for ragchat.

use serde::{Deserialize, Serialize};

use crate::chat::Message;

/// Settings for running the conversational agent.
///
/// Built from `AppConfig` at startup and shared by every agent turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Number of human/AI exchanges kept in the memory window.
    pub memory_window: usize,
    /// Maximum model calls that may request a tool before the agent is
    /// forced to answer.
    pub max_iterations: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            memory_window: 5,
            max_iterations: 3,
        }
    }
}

/// One tool invocation performed while answering a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStep {
    pub tool: String,
    pub tool_input: String,
    /// Raw model output that requested the tool.
    pub log: String,
    pub observation: String,
}

/// Result of a single agent invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentReply {
    pub input: String,
    /// The memory window the agent saw when it started the turn.
    pub chat_history: Vec<Message>,
    pub output: String,
    #[serde(default)]
    pub intermediate_steps: Vec<AgentStep>,
}
