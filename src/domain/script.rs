//! The rolling script: narration context accumulated across iterations.
//!
//! Each narration iteration appends the model's answer as an assistant turn,
//! so every subsequent prompt sees all prior narrations, not just the current
//! frame. The window is bounded: past the capacity, the oldest turn is
//! evicted from the front so the context sent upstream cannot grow without
//! limit.

use serde::{Deserialize, Serialize};

/// Conversation role, serialized the way chat-completion APIs expect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered narration turns with a bounded window.
///
/// Eviction rule: when a push would exceed `max_turns`, the oldest turn is
/// dropped first. Within the window, order is strictly append order.
#[derive(Debug, Clone)]
pub struct Script {
    turns: Vec<Turn>,
    max_turns: usize,
}

/// Default context window. Generous relative to a single pass over a prompt
/// list; the cap exists so a long run cannot exceed upstream request limits.
pub const DEFAULT_MAX_TURNS: usize = 64;

impl Default for Script {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_TURNS)
    }
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a script holding at most `max_turns` turns.
    pub fn with_capacity(max_turns: usize) -> Self {
        Self {
            turns: Vec::new(),
            max_turns: max_turns.max(1),
        }
    }

    /// Append the model's narration as an assistant turn, evicting the
    /// oldest turn if the window is full.
    pub fn push_assistant(&mut self, narration: impl Into<String>) {
        if self.turns.len() == self.max_turns {
            self.turns.remove(0);
        }
        self.turns.push(Turn::assistant(narration));
    }

    /// Turns in append order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let mut script = Script::new();
        script.push_assistant("first");
        script.push_assistant("second");
        script.push_assistant("third");

        let contents: Vec<&str> = script.turns().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert!(script.turns().iter().all(|t| t.role == Role::Assistant));
    }

    #[test]
    fn test_eviction_drops_oldest() {
        let mut script = Script::with_capacity(2);
        script.push_assistant("a");
        script.push_assistant("b");
        script.push_assistant("c");

        let contents: Vec<&str> = script.turns().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["b", "c"]);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let turn = Turn::assistant("hello");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hello");
    }
}
