//! Sliding-window conversation memory.

use ragchat_types::chat::Message;

/// Message buffer that exposes only its last `k` exchanges.
///
/// The full buffer is kept so the last message can always be read back,
/// but prompts and history snapshots see only the window of `2 * k`
/// messages.
#[derive(Debug, Clone)]
pub struct WindowMemory {
    k: usize,
    buffer: Vec<Message>,
}

impl WindowMemory {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            buffer: Vec::new(),
        }
    }

    /// Replace the buffer wholesale.
    pub fn set_messages(&mut self, messages: Vec<Message>) {
        self.buffer = messages;
    }

    /// The last `2 * k` messages, oldest first.
    pub fn window(&self) -> &[Message] {
        let keep = self.k.saturating_mul(2);
        let start = self.buffer.len().saturating_sub(keep);
        &self.buffer[start..]
    }

    /// Record one exchange: the human input followed by the AI output.
    pub fn save_context(&mut self, input: &str, output: &str) {
        self.buffer.push(Message::human(input));
        self.buffer.push(Message::ai(output));
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.buffer.last()
    }
}
