//! Chat history bounded by a token budget

use arxcon_core::chunking::count_tokens;
use arxcon_core::Message;
use std::collections::VecDeque;

/// Memory budget used when none is configured
pub const DEFAULT_MEMORY_TOKENS: usize = 3072;

/// Completed turns in order, oldest dropped first once over `token_limit`.
///
/// A turn is kept or dropped whole so tool results never lose the assistant
/// message that requested them. A single turn larger than the budget is not kept.
#[derive(Debug, Clone)]
pub struct ChatMemory {
    turns: VecDeque<(usize, Vec<Message>)>,
    tokens: usize,
    token_limit: usize,
}

impl ChatMemory {
    pub fn new(token_limit: usize) -> Self {
        Self {
            turns: VecDeque::new(),
            tokens: 0,
            token_limit: token_limit.max(1),
        }
    }

    pub fn token_limit(&self) -> usize {
        self.token_limit
    }

    /// Tokens currently held
    pub fn tokens(&self) -> usize {
        self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Messages of all kept turns, oldest first
    pub fn messages(&self) -> Vec<Message> {
        self.turns
            .iter()
            .flat_map(|(_, turn)| turn.iter().cloned())
            .collect()
    }

    pub fn push_turn(&mut self, turn: Vec<Message>) {
        if turn.is_empty() {
            return;
        }
        let size = turn.iter().map(message_tokens).sum::<usize>();
        self.tokens += size;
        self.turns.push_back((size, turn));

        while self.tokens > self.token_limit {
            let Some((dropped, _)) = self.turns.pop_front() else {
                break;
            };
            self.tokens -= dropped;
            tracing::debug!("chat memory over {} tokens, dropped a turn", self.token_limit);
        }
    }

    pub fn clear(&mut self) {
        self.turns.clear();
        self.tokens = 0;
    }
}

impl Default for ChatMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_TOKENS)
    }
}

/// Content plus any tool-call names and arguments
pub fn message_tokens(message: &Message) -> usize {
    let calls: usize = message
        .tool_calls
        .iter()
        .map(|c| count_tokens(&c.function.name) + count_tokens(&c.function.arguments))
        .sum();
    count_tokens(&message.content) + calls
}
