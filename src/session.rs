//! Per-session conversation history.

use serde::{Deserialize, Serialize};

/// One completed question/response exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub question: String,
    pub response: String,
}

/// Append-only history of completed turns for a single session.
///
/// Turns are recorded only after the whole pipeline succeeds; failed turns
/// leave no trace here.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    turns: Vec<ConversationTurn>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_turn(&mut self, question: String, response: String) {
        self.turns.push(ConversationTurn { question, response });
    }

    pub fn turns(&self) -> &[ConversationTurn] {
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
    fn test_starts_empty() {
        let context = SessionContext::new();
        assert!(context.is_empty());
        assert_eq!(context.len(), 0);
    }

    #[test]
    fn test_records_in_order() {
        let mut context = SessionContext::new();
        context.record_turn("first?".to_string(), "one".to_string());
        context.record_turn("second?".to_string(), "two".to_string());

        assert_eq!(context.len(), 2);
        assert_eq!(context.turns()[0].question, "first?");
        assert_eq!(context.turns()[1].response, "two");
    }
}
