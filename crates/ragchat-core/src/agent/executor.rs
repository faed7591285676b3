//! ConversationalAgent -- the ReAct loop behind `AgentPort`.
//!
//! Each turn snapshots the memory window, asks the model for a JSON action,
//! runs requested tools and feeds their observations back, and stops on a
//! final answer. When the tool budget runs out the model gets one last call
//! to generate an answer from the steps so far. Every LLM call runs inside
//! a `gen_ai.complete` span.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{Instrument, debug, info, info_span, warn};

use ragchat_types::agent::{AgentConfig, AgentReply, AgentStep};
use ragchat_types::chat::Message;
use ragchat_types::error::AgentError;
use ragchat_types::llm::CompletionRequest;

use crate::llm::box_provider::BoxLlmProvider;

use super::memory::WindowMemory;
use super::output_parser::{self, AgentAction};
use super::port::AgentPort;
use super::prompt::{ReactPromptBuilder, ToolSpec};
use super::tool::BoxTool;

/// Tool-using chat agent with a sliding-window memory.
///
/// The provider and tools are shared between sessions; the memory is not.
pub struct ConversationalAgent {
    provider: Arc<BoxLlmProvider>,
    tools: Arc<Vec<BoxTool>>,
    config: AgentConfig,
    memory: Mutex<WindowMemory>,
}

impl ConversationalAgent {
    pub fn new(provider: Arc<BoxLlmProvider>, tools: Vec<BoxTool>, config: AgentConfig) -> Self {
        let memory = Mutex::new(WindowMemory::new(config.memory_window));
        Self {
            provider,
            tools: Arc::new(tools),
            config,
            memory,
        }
    }

    fn tool_specs(&self) -> Vec<ToolSpec<'_>> {
        self.tools
            .iter()
            .map(|t| ToolSpec {
                name: t.name(),
                description: t.description(),
            })
            .collect()
    }

    async fn call_model(
        &self,
        chat_history: &[Message],
        input: &str,
        steps: &[AgentStep],
        force_final: bool,
    ) -> Result<String, AgentError> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages: ReactPromptBuilder::build_messages(
                &self.tool_specs(),
                chat_history,
                input,
                steps,
                force_final,
            ),
            system: Some(ReactPromptBuilder::system_prompt().to_string()),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
            stop_sequences: None,
        };

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            agent.step = steps.len(),
        );

        let response = self.provider.complete(&request).instrument(span).await?;
        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            stop_reason = %response.stop_reason,
            "Model call complete"
        );
        Ok(response.content)
    }

    async fn run_tool(&self, name: &str, input: &str) -> Result<String, AgentError> {
        match self.tools.iter().find(|t| t.name() == name) {
            Some(tool) => {
                info!(tool = name, "Running tool");
                tool.run(input).await
            }
            None => {
                let valid = self
                    .tools
                    .iter()
                    .map(|t| t.name())
                    .collect::<Vec<_>>()
                    .join(", ");
                warn!(tool = name, "Model requested an unknown tool");
                Ok(format!(
                    "{name} is not a valid tool, try one of [{valid}]."
                ))
            }
        }
    }
}

impl AgentPort for ConversationalAgent {
    fn new_session(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            tools: self.tools.clone(),
            config: self.config.clone(),
            memory: Mutex::new(WindowMemory::new(self.config.memory_window)),
        }
    }

    async fn invoke(&self, query: &str) -> Result<AgentReply, AgentError> {
        let chat_history = self.memory.lock().await.window().to_vec();
        let mut steps: Vec<AgentStep> = Vec::new();
        let mut output = None;

        for iteration in 0..self.config.max_iterations {
            let raw = self.call_model(&chat_history, query, &steps, false).await?;
            match output_parser::parse(&raw) {
                AgentAction::Finish(answer) => {
                    debug!(iteration, "Agent produced final answer");
                    output = Some(answer);
                    break;
                }
                AgentAction::Tool { name, input } => {
                    debug!(iteration, tool = %name, "Agent requested tool");
                    let observation = self.run_tool(&name, &input).await?;
                    steps.push(AgentStep {
                        tool: name,
                        tool_input: input,
                        log: raw,
                        observation,
                    });
                }
            }
        }

        let output = match output {
            Some(answer) => answer,
            None => {
                info!(
                    max_iterations = self.config.max_iterations,
                    "Iteration budget exhausted, generating final answer"
                );
                let raw = self.call_model(&chat_history, query, &steps, true).await?;
                match output_parser::parse(&raw) {
                    AgentAction::Finish(answer) => answer,
                    AgentAction::Tool { .. } => raw,
                }
            }
        };

        self.memory.lock().await.save_context(query, &output);

        Ok(AgentReply {
            input: query.to_string(),
            chat_history,
            output,
            intermediate_steps: steps,
        })
    }

    async fn get_conversation_history(&self) -> Vec<Message> {
        self.memory.lock().await.window().to_vec()
    }

    async fn set_memory_variables(&self, history: Vec<Message>) {
        self.memory.lock().await.set_messages(history);
    }

    async fn get_last_response(&self) -> Result<String, AgentError> {
        self.memory
            .lock()
            .await
            .last_message()
            .map(|m| m.content().to_string())
            .ok_or(AgentError::EmptyMemory)
    }
}
