//! The transition function of a machine: a partial map from `(state, symbol)` to a
//! [`Transition`]. A missing entry is meaningful, it halts the run with an undefined
//! transition.

use crate::types::{Symbol, Transition, TransitionRecord};
use std::collections::HashMap;

/// Partial transition table keyed by `(state, symbol read)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delta {
    rules: HashMap<String, HashMap<Symbol, Transition>>,
    /// Keys in declaration order, so encoding and display are reproducible.
    order: Vec<(String, Symbol)>,
}

impl Delta {
    /// Builds a table from transition records. Later records with an already present key
    /// replace the earlier rule; duplicates are rejected during analysis before this point.
    pub fn from_records(records: &[TransitionRecord]) -> Self {
        let mut delta = Self::default();
        for record in records {
            delta.insert(
                record.state.clone(),
                record.read.clone(),
                record.transition.clone(),
            );
        }
        delta
    }

    fn insert(&mut self, state: String, read: Symbol, transition: Transition) {
        let previous = self
            .rules
            .entry(state.clone())
            .or_default()
            .insert(read.clone(), transition);
        if previous.is_none() {
            self.order.push((state, read));
        }
    }

    /// Looks up the rule for `state` reading `symbol`.
    pub fn get(&self, state: &str, symbol: &str) -> Option<&Transition> {
        self.rules.get(state).and_then(|row| row.get(symbol))
    }

    /// Number of defined rules.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates over `(state, symbol, transition)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &Transition)> {
        self.order.iter().filter_map(|(state, symbol)| {
            self.get(state, symbol)
                .map(|transition| (state.as_str(), symbol.as_str(), transition))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    fn record(state: &str, read: &str, next: &str, write: &str, direction: Direction) -> TransitionRecord {
        TransitionRecord {
            state: state.to_string(),
            read: read.to_string(),
            transition: Transition {
                next_state: next.to_string(),
                write: write.to_string(),
                direction,
            },
        }
    }

    #[test]
    fn test_lookup_defined_and_missing() {
        let delta = Delta::from_records(&[
            record("q0", "a", "q1", "b", Direction::Right),
            record("q1", "_", "q0", "_", Direction::Left),
        ]);

        let transition = delta.get("q0", "a").unwrap();
        assert_eq!(transition.next_state, "q1");
        assert_eq!(transition.write, "b");
        assert_eq!(transition.direction, Direction::Right);

        assert!(delta.get("q0", "b").is_none());
        assert!(delta.get("q2", "a").is_none());
        assert_eq!(delta.len(), 2);
    }

    #[test]
    fn test_iter_keeps_declaration_order() {
        let delta = Delta::from_records(&[
            record("z", "a", "z", "a", Direction::Right),
            record("a", "b", "z", "a", Direction::Left),
            record("m", "a", "a", "a", Direction::Right),
        ]);

        let keys: Vec<_> = delta.iter().map(|(state, symbol, _)| (state, symbol)).collect();
        assert_eq!(keys, vec![("z", "a"), ("a", "b"), ("m", "a")]);
    }

    #[test]
    fn test_multi_character_symbols() {
        let delta = Delta::from_records(&[record("q0", "X1", "q0", "Y2", Direction::Left)]);

        assert_eq!(delta.get("q0", "X1").unwrap().write, "Y2");
        assert!(delta.get("q0", "X").is_none());
    }

    #[test]
    fn test_empty_table() {
        let delta = Delta::from_records(&[]);
        assert!(delta.is_empty());
        assert!(delta.get("q0", "a").is_none());
    }
}
