//! Bounded chat history

use std::collections::VecDeque;

use polyglot_core::Message;

/// Most recent user/assistant exchanges, oldest dropped first
#[derive(Debug, Clone)]
pub struct ChatHistory {
    max_turns: usize,
    messages: VecDeque<Message>,
}

impl ChatHistory {
    /// Keep at most `max_turns` exchanges (at least one)
    pub fn new(max_turns: usize) -> Self {
        let max_turns = max_turns.max(1);
        Self {
            max_turns,
            messages: VecDeque::with_capacity(max_turns * 2),
        }
    }

    /// Record one user message and the assistant's reply
    pub fn push_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.messages.push_back(Message::user(user));
        self.messages.push_back(Message::assistant(assistant));
        while self.messages.len() > self.max_turns * 2 {
            self.messages.pop_front();
        }
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Number of stored exchanges
    pub fn turns(&self) -> usize {
        self.messages.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyglot_core::Role;

    #[test]
    fn test_history_is_bounded() {
        let mut history = ChatHistory::new(2);
        history.push_exchange("one", "1");
        history.push_exchange("two", "2");
        history.push_exchange("three", "3");

        assert_eq!(history.turns(), 2);
        let contents: Vec<&str> = history.messages().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["two", "2", "three", "3"]);
        assert_eq!(history.messages().next().map(|m| m.role), Some(Role::User));
    }

    #[test]
    fn test_zero_capacity_keeps_one_turn() {
        let mut history = ChatHistory::new(0);
        history.push_exchange("a", "b");
        history.push_exchange("c", "d");
        assert_eq!(history.turns(), 1);

        history.clear();
        assert!(history.is_empty());
    }
}
