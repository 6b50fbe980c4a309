//! This crate provides the core logic for a single-tape deterministic Turing machine
//! simulator. It includes modules for parsing machine descriptions, validating them,
//! running machines on inputs, and lazily enumerating the strings a machine accepts.

pub mod analyzer;
pub mod configuration;
pub mod delta;
pub mod encoder;
pub mod language;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the `Configuration` struct from the configuration module.
pub use configuration::Configuration;
/// Re-exports the `Delta` transition table from the delta module.
pub use delta::Delta;
/// Re-exports the encoding functions from the encoder module.
pub use encoder::{encode, encode_program};
/// Re-exports the enumeration functions and iterators from the language module.
pub use language::{accepted_language, enumerate_strings, first_n_accepted, AcceptedLanguage, Strings};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `TuringMachine` and `Execution` structs from the machine module.
pub use machine::{Execution, TuringMachine};
/// Re-exports the parsing functions from the parser module.
pub use parser::{parse, parse_program};
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports various types related to machine definition and execution from the types module.
pub use types::{
    Direction, Halt, Program, Run, Step, Symbol, Transition, TransitionRecord, TuringMachineError,
    Verdict, MAX_PROGRAM_SIZE,
};
