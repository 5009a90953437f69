use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub question: String,
    pub answer: String,
}

/// Question/answer pairs in arrival order. Append-only apart from `reset`.
#[derive(Debug, Default)]
pub struct ConversationStore {
    turns: Vec<ConversationTurn>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: ConversationTurn) -> &ConversationTurn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    pub fn all(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn reset(&mut self) {
        self.turns.clear();
    }

    /// "1. question" lines for a history sidebar.
    pub fn questions(&self) -> Vec<String> {
        self.turns
            .iter()
            .enumerate()
            .map(|(i, turn)| format!("{}. {}", i + 1, turn.question))
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.turns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(q: &str, a: &str) -> ConversationTurn {
        ConversationTurn {
            question: q.into(),
            answer: a.into(),
        }
    }

    #[test]
    fn test_append_keeps_order() {
        let mut store = ConversationStore::new();
        store.append(turn("first", "1"));
        let last = store.append(turn("second", "2"));
        assert_eq!(last.question, "second");
        assert_eq!(store.len(), 2);
        assert_eq!(store.all()[0].question, "first");
        assert_eq!(store.questions(), vec!["1. first", "2. second"]);
    }

    #[test]
    fn test_reset_clears() {
        let mut store = ConversationStore::new();
        store.append(turn("q", "a"));
        store.reset();
        assert!(store.is_empty());
        assert!(store.questions().is_empty());
    }

    #[test]
    fn test_json_export() {
        let mut store = ConversationStore::new();
        store.append(turn("What is 2+2?", "4 👍"));
        let parsed: Vec<ConversationTurn> =
            serde_json::from_str(&store.to_json().unwrap()).unwrap();
        assert_eq!(parsed, store.all());
    }
}
