//! Parser for the agent's JSON-blob responses.
//!
//! The model is asked to answer with a markdown `json` code snippet holding
//! a single object such as
//! `{"action": "Knowledge Base", "action_input": "what is a vector index"}`.
//!
//! An `action` of `"Final Answer"` ends the turn. Anything that does not
//! contain a parsable action blob is treated as the final answer itself.

use serde_json::Value;

/// Action name that ends the agent loop.
pub const FINAL_ANSWER_ACTION: &str = "Final Answer";

/// What the model asked the agent to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentAction {
    /// Call the named tool with `input`.
    Tool { name: String, input: String },
    /// Reply to the user with this text.
    Finish(String),
}

/// Parse raw model output into an [`AgentAction`].
pub fn parse(text: &str) -> AgentAction {
    json_candidates(text)
        .into_iter()
        .find_map(parse_blob)
        .unwrap_or_else(|| AgentAction::Finish(text.trim().to_string()))
}

fn parse_blob(blob: &str) -> Option<AgentAction> {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(blob) else {
        return None;
    };
    let action = map.get("action").and_then(Value::as_str)?;

    let input = match map.get("action_input") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    Some(if action == FINAL_ANSWER_ACTION {
        AgentAction::Finish(input)
    } else {
        AgentAction::Tool {
            name: action.to_string(),
            input,
        }
    })
}

/// Possible JSON objects in `text`, in the order they are tried: the body
/// between the first and the last code fence, then the outermost braces.
///
/// Spanning to the last fence keeps code fences inside `action_input`
/// strings part of the blob.
fn json_candidates(text: &str) -> Vec<&str> {
    let mut candidates = Vec::with_capacity(2);

    if let (Some(open), Some(close)) = (text.find("```"), text.rfind("```")) {
        let after_fence = open + 3;
        let body_start = text[after_fence..]
            .find('\n')
            .map_or(after_fence, |i| after_fence + i + 1);
        if close >= body_start {
            let candidate = text[body_start..close].trim();
            if candidate.starts_with('{') {
                candidates.push(candidate);
            }
        }
    }

    if let (Some(open), Some(close)) = (text.find('{'), text.rfind('}')) {
        if close > open {
            candidates.push(&text[open..=close]);
        }
    }

    candidates
}
