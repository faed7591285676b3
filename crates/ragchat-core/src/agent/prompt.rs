//! Prompt builder for the conversational ReAct agent.
//!
//! Layout of one model call:
//! ```text
//! system:    assistant persona
//! user/ai:   memory window, oldest first
//! user:      TOOLS list + response format + USER'S INPUT
//! ai/user:   scratchpad (model output, TOOL RESPONSE) per tool step
//! ```

use ragchat_types::agent::AgentStep;
use ragchat_types::chat::Message;
use ragchat_types::llm::LlmMessage;

use super::output_parser::FINAL_ANSWER_ACTION;

const SYSTEM_PROMPT: &str = "Assistant is a large language model trained to help with a wide \
range of tasks, from answering simple questions to giving in-depth explanations on many \
topics. Assistant generates human-like text so that its replies read naturally and stay \
relevant to the conversation.\n\n\
Assistant keeps learning as it talks: it can process large amounts of text and use it to \
give accurate, informative answers, and it can produce its own text to explain or discuss \
a topic.\n\n\
Overall, Assistant is a capable system that can help with many tasks and give valuable \
information on many topics, whether the user needs a specific answer or just wants to talk.";

const TOOL_RESPONSE_FOLLOWUP: &str = "Okay, so what is the response to my last comment? If \
using information obtained from the tools you must mention it explicitly without mentioning \
the tool names - I have forgotten all TOOL RESPONSES! Remember to respond with a markdown \
code snippet of a json blob with a single action, and NOTHING else.";

const FORCE_FINAL_ANSWER: &str =
    "I now need to return a final answer based on the previous steps.";

/// Tool name and description, as shown to the model.
pub struct ToolSpec<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

/// Builds the system prompt and message list for each agent step.
pub struct ReactPromptBuilder;

impl ReactPromptBuilder {
    pub fn system_prompt() -> &'static str {
        SYSTEM_PROMPT
    }

    /// Assemble the messages for one model call.
    ///
    /// When `force_final` is set, a closing user turn asks the model to stop
    /// calling tools and answer.
    pub fn build_messages(
        tools: &[ToolSpec<'_>],
        chat_history: &[Message],
        input: &str,
        steps: &[AgentStep],
        force_final: bool,
    ) -> Vec<LlmMessage> {
        let mut messages = Vec::with_capacity(chat_history.len() + steps.len() * 2 + 2);

        for message in chat_history {
            messages.push(match message {
                Message::Human { content } => LlmMessage::user(content.clone()),
                Message::Ai { content } => LlmMessage::assistant(content.clone()),
            });
        }

        messages.push(LlmMessage::user(Self::user_turn(tools, input)));

        for step in steps {
            messages.push(LlmMessage::assistant(step.log.clone()));
            messages.push(LlmMessage::user(format!(
                "TOOL RESPONSE:\n---------------------\n{}\n\nUSER'S INPUT\n--------------------\n\n{}",
                step.observation, TOOL_RESPONSE_FOLLOWUP
            )));
        }

        if force_final {
            messages.push(LlmMessage::user(FORCE_FINAL_ANSWER));
        }

        messages
    }

    fn user_turn(tools: &[ToolSpec<'_>], input: &str) -> String {
        let tool_lines = tools
            .iter()
            .map(|t| format!("> {}: {}", t.name, t.description))
            .collect::<Vec<_>>()
            .join("\n");
        let tool_names = tools.iter().map(|t| t.name).collect::<Vec<_>>().join(", ");

        format!(
            "TOOLS\n------\n\
Assistant can ask the user to use tools to look up information that may be helpful in \
answering the user's original question. The tools the human can use are:\n\n\
{tool_lines}\n\n\
RESPONSE FORMAT INSTRUCTIONS\n----------------------------\n\n\
When responding to me, please output a response in one of two formats:\n\n\
**Option 1:**\n\
Use this if you want the human to use a tool.\n\
Markdown code snippet formatted in the following schema:\n\n\
```json\n{{\n    \"action\": string, \\\\ The action to take. Must be one of {tool_names}\n    \
\"action_input\": string \\\\ The input to the action\n}}\n```\n\n\
**Option #2:**\n\
Use this if you want to respond directly to the human. Markdown code snippet formatted in \
the following schema:\n\n\
```json\n{{\n    \"action\": \"{FINAL_ANSWER_ACTION}\",\n    \
\"action_input\": string \\\\ You should put what you want to return to use here\n}}\n```\n\n\
USER'S INPUT\n--------------------\n\
Here is the user's input (remember to respond with a markdown code snippet of a json blob \
with a single action, and NOTHING else):\n\n\
{input}"
        )
    }
}
