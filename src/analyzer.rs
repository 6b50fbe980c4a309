//! This module provides functions for validating machine descriptions before a machine is
//! built from them. A description that fails any check never becomes a `TuringMachine`.

use crate::types::{Program, Symbol, TuringMachineError};
use std::collections::HashSet;

/// Represents the defects that can be found while analyzing a machine description.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// Input alphabet symbols that are missing from the tape alphabet.
    InputAlphabetNotSubset(Vec<char>),
    /// The blank symbol is not part of the tape alphabet.
    BlankNotInTapeAlphabet(char),
    /// The start state is not a declared state.
    InvalidStartState(String),
    /// Accepting states that are not declared states.
    AcceptStatesNotFound(Vec<String>),
    /// The blank symbol is also an input symbol, making the tape ends ambiguous.
    BlankInInputAlphabet(char),
    /// The reject state is not a declared state.
    InvalidRejectState(String),
    /// Transitions that mention undeclared states, formatted as `state symbol`.
    UndefinedStates(Vec<String>),
    /// Symbols used in transitions that are not part of the tape alphabet.
    UndefinedSymbols(Vec<Symbol>),
    /// More than one rule for the same `(state, symbol)` pair.
    DuplicateTransitions(Vec<String>),
}

impl From<AnalysisError> for TuringMachineError {
    /// Converts an `AnalysisError` into a `TuringMachineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        let message = match error {
            AnalysisError::InputAlphabetNotSubset(symbols) => format!(
                "Input alphabet is not a subset of the tape alphabet: {:?}",
                symbols
            ),
            AnalysisError::BlankNotInTapeAlphabet(blank) => {
                format!("Blank symbol '{}' is not in the tape alphabet", blank)
            }
            AnalysisError::InvalidStartState(state) => {
                format!("Start state '{}' is not in the set of states", state)
            }
            AnalysisError::AcceptStatesNotFound(states) => {
                format!("Accepting states are not in the set of states: {:?}", states)
            }
            AnalysisError::BlankInInputAlphabet(blank) => {
                format!("Blank symbol '{}' must not be an input symbol", blank)
            }
            AnalysisError::InvalidRejectState(state) => {
                format!("Reject state '{}' is not in the set of states", state)
            }
            AnalysisError::UndefinedStates(transitions) => {
                format!("Transitions reference undefined states: {:?}", transitions)
            }
            AnalysisError::UndefinedSymbols(symbols) => format!(
                "Transitions use symbols outside the tape alphabet: {:?}",
                symbols
            ),
            AnalysisError::DuplicateTransitions(keys) => {
                format!("Duplicate transitions for: {:?}", keys)
            }
        };

        TuringMachineError::ValidationError(message)
    }
}

/// Analyzes a machine description for structural errors.
///
/// The checks run in a fixed order and the first failure is reported.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(TuringMachineError::ValidationError)` if any validation rule is violated.
pub fn analyze(program: &Program) -> Result<(), TuringMachineError> {
    [
        check_input_alphabet,
        check_blank,
        check_start_state,
        check_accept_states,
        check_blank_not_input,
        check_reject_state,
        check_transition_states,
        check_transition_symbols,
        check_duplicate_transitions,
    ]
    .iter()
    .find_map(|f| f(program).err())
    .map_or(Ok(()), |error| Err(error.into()))
}

fn check_input_alphabet(program: &Program) -> Result<(), AnalysisError> {
    let tape: HashSet<&str> = program.tape_alphabet.iter().map(String::as_str).collect();
    let missing = sorted_unique(
        program
            .input_alphabet
            .iter()
            .filter(|c| !tape.contains(c.to_string().as_str()))
            .copied(),
    );

    if !missing.is_empty() {
        return Err(AnalysisError::InputAlphabetNotSubset(missing));
    }

    Ok(())
}

fn check_blank(program: &Program) -> Result<(), AnalysisError> {
    if !program.tape_alphabet.contains(&program.blank.to_string()) {
        return Err(AnalysisError::BlankNotInTapeAlphabet(program.blank));
    }

    Ok(())
}

fn check_start_state(program: &Program) -> Result<(), AnalysisError> {
    if !program.states.contains(&program.start) {
        return Err(AnalysisError::InvalidStartState(program.start.clone()));
    }

    Ok(())
}

fn check_accept_states(program: &Program) -> Result<(), AnalysisError> {
    let missing = sorted_unique(
        program
            .accept
            .iter()
            .filter(|state| !program.states.contains(state))
            .cloned(),
    );

    if !missing.is_empty() {
        return Err(AnalysisError::AcceptStatesNotFound(missing));
    }

    Ok(())
}

fn check_blank_not_input(program: &Program) -> Result<(), AnalysisError> {
    if program.input_alphabet.contains(&program.blank) {
        return Err(AnalysisError::BlankInInputAlphabet(program.blank));
    }

    Ok(())
}

fn check_reject_state(program: &Program) -> Result<(), AnalysisError> {
    if !program.states.contains(&program.reject) {
        return Err(AnalysisError::InvalidRejectState(program.reject.clone()));
    }

    Ok(())
}

/// Checks that both ends of every transition are declared states.
fn check_transition_states(program: &Program) -> Result<(), AnalysisError> {
    let states: HashSet<&String> = program.states.iter().collect();
    let undefined: Vec<String> = program
        .transitions
        .iter()
        .filter(|record| {
            !states.contains(&record.state) || !states.contains(&record.transition.next_state)
        })
        .map(|record| {
            format!(
                "{} {} -> {}",
                record.state, record.read, record.transition.next_state
            )
        })
        .collect();

    if !undefined.is_empty() {
        return Err(AnalysisError::UndefinedStates(undefined));
    }

    Ok(())
}

/// Checks that every read and written symbol belongs to the tape alphabet.
fn check_transition_symbols(program: &Program) -> Result<(), AnalysisError> {
    let tape: HashSet<&Symbol> = program.tape_alphabet.iter().collect();
    let undefined = sorted_unique(
        program
            .transitions
            .iter()
            .flat_map(|record| [&record.read, &record.transition.write])
            .filter(|symbol| !tape.contains(symbol))
            .cloned(),
    );

    if !undefined.is_empty() {
        return Err(AnalysisError::UndefinedSymbols(undefined));
    }

    Ok(())
}

fn check_duplicate_transitions(program: &Program) -> Result<(), AnalysisError> {
    let mut seen = HashSet::new();
    let duplicates = sorted_unique(
        program
            .transitions
            .iter()
            .filter(|record| !seen.insert((record.state.as_str(), record.read.as_str())))
            .map(|record| format!("{} {}", record.state, record.read)),
    );

    if !duplicates.is_empty() {
        return Err(AnalysisError::DuplicateTransitions(duplicates));
    }

    Ok(())
}

/// Collects into a sorted, deduplicated vector so error messages are deterministic.
fn sorted_unique<T: Ord>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort();
    items.dedup();
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, Transition, TransitionRecord};

    fn create_test_program() -> Program {
        Program {
            states: vec!["q0".into(), "qa".into(), "qr".into()],
            input_alphabet: vec!['a', 'b'],
            tape_alphabet: vec!["a".into(), "b".into(), "_".into()],
            start: "q0".into(),
            blank: '_',
            accept: vec!["qa".into()],
            reject: "qr".into(),
            transitions: vec![
                create_record("q0", "a", "q0", "a", Direction::Right),
                create_record("q0", "_", "qa", "_", Direction::Left),
            ],
        }
    }

    fn create_record(
        state: &str,
        read: &str,
        next_state: &str,
        write: &str,
        direction: Direction,
    ) -> TransitionRecord {
        TransitionRecord {
            state: state.to_string(),
            read: read.to_string(),
            transition: Transition {
                next_state: next_state.to_string(),
                write: write.to_string(),
                direction,
            },
        }
    }

    #[test]
    fn test_valid_program() {
        assert!(analyze(&create_test_program()).is_ok());
    }

    #[test]
    fn test_input_alphabet_not_subset() {
        let mut program = create_test_program();
        program.input_alphabet.push('c');

        assert_eq!(
            check_input_alphabet(&program),
            Err(AnalysisError::InputAlphabetNotSubset(vec!['c']))
        );
        assert!(analyze(&program).is_err());
    }

    #[test]
    fn test_blank_not_in_tape_alphabet() {
        let mut program = create_test_program();
        program.tape_alphabet.retain(|s| s != "_");

        let error = analyze(&program).unwrap_err();
        assert_eq!(
            error,
            TuringMachineError::ValidationError(
                "Blank symbol '_' is not in the tape alphabet".to_string()
            )
        );
    }

    #[test]
    fn test_invalid_start_state() {
        let mut program = create_test_program();
        program.start = "missing".into();

        assert_eq!(
            check_start_state(&program),
            Err(AnalysisError::InvalidStartState("missing".into()))
        );
    }

    #[test]
    fn test_accept_states_not_found() {
        let mut program = create_test_program();
        program.accept.push("qz".into());

        assert_eq!(
            check_accept_states(&program),
            Err(AnalysisError::AcceptStatesNotFound(vec!["qz".into()]))
        );
    }

    #[test]
    fn test_blank_in_input_alphabet() {
        let mut program = create_test_program();
        program.input_alphabet.push('_');

        assert_eq!(
            check_blank_not_input(&program),
            Err(AnalysisError::BlankInInputAlphabet('_'))
        );
    }

    #[test]
    fn test_invalid_reject_state() {
        let mut program = create_test_program();
        program.reject = "nowhere".into();

        assert_eq!(
            check_reject_state(&program),
            Err(AnalysisError::InvalidRejectState("nowhere".into()))
        );
    }

    #[test]
    fn test_transition_to_undefined_state() {
        let mut program = create_test_program();
        program
            .transitions
            .push(create_record("q0", "b", "q9", "b", Direction::Right));

        assert_eq!(
            check_transition_states(&program),
            Err(AnalysisError::UndefinedStates(vec!["q0 b -> q9".into()]))
        );
    }

    #[test]
    fn test_transition_with_undefined_symbol() {
        let mut program = create_test_program();
        program
            .transitions
            .push(create_record("q0", "b", "q0", "x", Direction::Right));

        assert_eq!(
            check_transition_symbols(&program),
            Err(AnalysisError::UndefinedSymbols(vec!["x".into()]))
        );
    }

    #[test]
    fn test_multi_character_tape_symbols() {
        let mut program = create_test_program();
        program.tape_alphabet.push("X1".into());
        program
            .transitions
            .push(create_record("q0", "b", "q0", "X1", Direction::Right));
        assert!(analyze(&program).is_ok());

        // `X` is a prefix of a declared symbol, not a declared symbol.
        program
            .transitions
            .push(create_record("q0", "X", "q0", "X1", Direction::Right));
        assert_eq!(
            check_transition_symbols(&program),
            Err(AnalysisError::UndefinedSymbols(vec!["X".into()]))
        );
    }

    #[test]
    fn test_duplicate_transitions() {
        let mut program = create_test_program();
        program
            .transitions
            .push(create_record("q0", "a", "qr", "a", Direction::Left));

        assert_eq!(
            check_duplicate_transitions(&program),
            Err(AnalysisError::DuplicateTransitions(vec!["q0 a".into()]))
        );
    }

    #[test]
    fn test_first_failure_is_reported() {
        let mut program = create_test_program();
        program.tape_alphabet = vec!["a".into()];
        program.start = "missing".into();

        let error = analyze(&program).unwrap_err();
        assert!(error
            .to_string()
            .contains("Input alphabet is not a subset of the tape alphabet"));
    }

    #[test]
    fn test_accept_and_reject_may_overlap() {
        let mut program = create_test_program();
        program.reject = "qa".into();

        assert!(analyze(&program).is_ok());
    }
}
