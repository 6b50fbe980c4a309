//! The instantaneous description of a run: current state, tape contents and head position.

use crate::types::{Symbol, Transition};
use std::fmt;

/// Mutable execution state owned by a single run.
///
/// The tape starts as `[blank] + input + [blank]` with the head on the first input cell and
/// never grows. A head that moves past either end reads no symbol, which the engine treats
/// as an undefined transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    state: String,
    tape: Vec<Symbol>,
    head: isize,
}

impl Configuration {
    /// Builds the initial configuration for `input`.
    pub fn new(start: &str, blank: char, input: &str) -> Self {
        let mut tape = Vec::with_capacity(input.len() + 2);
        tape.push(blank.to_string());
        tape.extend(input.chars().map(String::from));
        tape.push(blank.to_string());

        Self {
            state: start.to_string(),
            tape,
            head: 1,
        }
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn tape(&self) -> &[Symbol] {
        &self.tape
    }

    pub fn head(&self) -> isize {
        self.head
    }

    /// The symbol under the head, or `None` once the head has left the tape.
    pub fn symbol(&self) -> Option<&str> {
        usize::try_from(self.head)
            .ok()
            .and_then(|index| self.tape.get(index))
            .map(String::as_str)
    }

    /// Writes, changes state and moves the head according to `transition`.
    ///
    /// Must only be called while [`symbol`](Self::symbol) is `Some`.
    pub(crate) fn apply(&mut self, transition: &Transition) {
        if let Some(cell) = usize::try_from(self.head)
            .ok()
            .and_then(|index| self.tape.get_mut(index))
        {
            cell.clone_from(&transition.write);
        }
        self.state.clone_from(&transition.next_state);
        self.head += transition.direction.offset();
    }

    /// Tape symbols joined with `|`.
    pub fn render_tape(&self) -> String {
        self.tape.join("|")
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:10} {} {:3}", self.state, self.render_tape(), self.head)
    }
}
