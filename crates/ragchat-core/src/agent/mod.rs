//! Conversational agent for ragchat.
//!
//! - `AgentPort` / `BoxAgent`: the port the chat service drives
//! - `WindowMemory`: sliding window over the chat history
//! - `Tool` / `BoxTool`: named capabilities the agent may call
//! - `ReactPromptBuilder` and `output_parser`: the JSON-blob ReAct protocol
//! - `ConversationalAgent`: the loop tying the above to an LLM provider

pub mod executor;
pub mod memory;
pub mod output_parser;
pub mod port;
pub mod prompt;
pub mod tool;
