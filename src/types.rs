//! This module defines the core data structures and types used throughout the Turing Machine
//! simulator, including the raw machine description, transitions, execution outcomes, and
//! error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The maximum allowed size for a machine description in bytes.
pub const MAX_PROGRAM_SIZE: usize = 65536; // 64KB

/// A tape symbol. Input symbols are single characters, but symbols that only ever appear on
/// the tape may be longer, e.g. `X1`.
pub type Symbol = String;

/// A machine description as written in a `.tm` file, before validation.
///
/// Every list keeps declaration order. The order of `input_alphabet` is significant: it is
/// the total order used when enumerating the strings of the machine's language.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Program {
    /// All state names.
    pub states: Vec<String>,
    /// Symbols allowed in input strings.
    pub input_alphabet: Vec<char>,
    /// Symbols allowed anywhere on the tape, including the blank.
    pub tape_alphabet: Vec<Symbol>,
    /// The state every run starts in.
    pub start: String,
    /// The symbol padding both ends of the initial tape.
    pub blank: char,
    /// Accepting states.
    pub accept: Vec<String>,
    /// The explicit reject state.
    pub reject: String,
    /// Transition records, in declaration order.
    pub transitions: Vec<TransitionRecord>,
}

/// One `<state> <symbol>: <next-state> <write-symbol> <R|L>` record of a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The state the rule applies in.
    pub state: String,
    /// The symbol under the head the rule applies to.
    pub read: Symbol,
    /// What the machine does when the rule fires.
    pub transition: Transition,
}

/// The right-hand side of a transition rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The next state the machine transitions to.
    pub next_state: String,
    /// The symbol written into the current cell.
    pub write: Symbol,
    /// The direction the head moves after writing.
    pub direction: Direction,
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
}

impl Direction {
    /// The head offset this direction applies.
    pub fn offset(self) -> isize {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    /// The single-letter token used in description files.
    pub fn as_char(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A transition was applied and execution may continue.
    Continue,
    /// The machine has halted.
    Halt(Halt),
}

/// Why a run stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Halt {
    /// The current state is an accepting state.
    Accept,
    /// The current state is the explicit reject state.
    Reject,
    /// No rule exists for the current state and the symbol under the head.
    /// `symbol` is `None` when the head has moved past either end of the tape.
    UndefinedTransition {
        state: String,
        symbol: Option<Symbol>,
    },
}

impl Halt {
    /// Folds the halting reason into the externally visible verdict.
    pub fn verdict(&self) -> Verdict {
        match self {
            Halt::Accept => Verdict::Accepted,
            Halt::Reject | Halt::UndefinedTransition { .. } => Verdict::Rejected,
        }
    }
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Halt::Accept => write!(f, "reached an accepting state"),
            Halt::Reject => write!(f, "reached the reject state"),
            Halt::UndefinedTransition {
                state,
                symbol: Some(symbol),
            } => write!(f, "no rule for state {state} and symbol '{symbol}'"),
            Halt::UndefinedTransition {
                state,
                symbol: None,
            } => write!(f, "head left the tape in state {state}"),
        }
    }
}

/// The verdict of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Accepted,
    Rejected,
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        self == Verdict::Accepted
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accepted => write!(f, "ACCEPTED"),
            Verdict::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// The result of running a machine on one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    pub verdict: Verdict,
    pub halt: Halt,
    /// Number of transitions applied before halting.
    pub steps: usize,
}

/// Represents various errors that can occur during Turing Machine operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// Indicates an error during the parsing of a machine description.
    #[error("Program parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates that a machine description violates a structural rule.
    #[error("Program validation error: {0}")]
    ValidationError(String),
    /// Indicates an input string containing a symbol outside the input alphabet.
    #[error("Invalid input: symbol '{symbol}' at position {position} is not in the input alphabet")]
    InvalidInput { symbol: char, position: usize },
    /// Indicates an error related to file system operations, such as reading description files.
    #[error("File error: {0}")]
    FileError(String),
}
