//! Evaluation of compiled queries against subject text.
//!
//! Matching is case-insensitive contiguous substring containment per term;
//! the subject is never tokenized, so the phrase `"free software"` only
//! matches when that exact substring appears. Boolean operators short
//! circuit. Evaluation reads the tree and nothing else, so one
//! [`CompiledQuery`] can serve many subjects, concurrently if shared.

use crate::query::parser::{CompiledQuery, Node};

impl CompiledQuery {
    /// Evaluate the query against `text`.
    ///
    /// Returns `None` when the compiler flagged the query unusable, the
    /// "not applicable" sentinel. An empty query matches everything, the
    /// way an empty filter box hides nothing.
    pub fn exec(&self, text: &str) -> Option<bool> {
        if self.error {
            return None;
        }
        let Some(root) = &self.root else {
            return Some(true);
        };
        Some(root.matches(&text.to_lowercase()))
    }
}

impl Node {
    /// `subject` must already be lowercased; term values are lowercased at
    /// compile time.
    fn matches(&self, subject: &str) -> bool {
        match self {
            Node::Term(value) => subject.contains(value.as_str()),
            Node::And(left, right) => left.matches(subject) && right.matches(subject),
            Node::Or(left, right) => left.matches(subject) || right.matches(subject),
            Node::Not(child) => !child.matches(subject),
        }
    }
}
