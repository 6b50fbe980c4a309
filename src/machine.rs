//! This module defines the `TuringMachine` struct, an immutable single-tape deterministic
//! machine, and `Execution`, the stepwise simulation of one run over a private
//! [`Configuration`].
//!
//! The engine has no step bound. A machine that never reaches an accepting state, the
//! reject state or an undefined transition makes [`TuringMachine::run`] loop forever.

use crate::analyzer::analyze;
use crate::configuration::Configuration;
use crate::delta::Delta;
use crate::types::{
    Halt, Program, Run, Step, Symbol, TransitionRecord, TuringMachineError, Verdict,
};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, trace};

/// A validated single-tape Turing machine.
///
/// Construction is the only place validation happens; afterwards the machine is read-only
/// and can be shared by any number of runs, including runs on other threads.
#[derive(Debug, Clone, PartialEq)]
pub struct TuringMachine {
    states: BTreeSet<String>,
    input_alphabet: Vec<char>,
    tape_alphabet: BTreeSet<Symbol>,
    start: String,
    blank: char,
    accept: BTreeSet<String>,
    reject: String,
    delta: Delta,
}

impl TuringMachine {
    /// Creates a new `TuringMachine` from a machine description.
    ///
    /// # Returns
    ///
    /// * `Ok(TuringMachine)` if the description passes analysis.
    /// * `Err(TuringMachineError::ValidationError)` naming the first defect otherwise.
    pub fn new(program: Program) -> Result<Self, TuringMachineError> {
        analyze(&program)?;

        let mut input_alphabet = Vec::with_capacity(program.input_alphabet.len());
        for symbol in program.input_alphabet {
            if !input_alphabet.contains(&symbol) {
                input_alphabet.push(symbol);
            }
        }

        Ok(Self {
            states: program.states.into_iter().collect(),
            input_alphabet,
            tape_alphabet: program.tape_alphabet.into_iter().collect(),
            start: program.start,
            blank: program.blank,
            accept: program.accept.into_iter().collect(),
            reject: program.reject,
            delta: Delta::from_records(&program.transitions),
        })
    }

    pub fn states(&self) -> &BTreeSet<String> {
        &self.states
    }

    /// The input alphabet in declaration order, which is also the enumeration order.
    pub fn input_alphabet(&self) -> &[char] {
        &self.input_alphabet
    }

    pub fn tape_alphabet(&self) -> &BTreeSet<Symbol> {
        &self.tape_alphabet
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn blank(&self) -> char {
        self.blank
    }

    pub fn accept(&self) -> &BTreeSet<String> {
        &self.accept
    }

    pub fn reject(&self) -> &str {
        &self.reject
    }

    pub fn delta(&self) -> &Delta {
        &self.delta
    }

    /// Returns `true` if `state` is an accepting state.
    pub fn is_accepting(&self, state: &str) -> bool {
        self.accept.contains(state)
    }

    /// Checks that every character of `input` belongs to the input alphabet.
    pub fn validate_input(&self, input: &str) -> Result<(), TuringMachineError> {
        match input
            .chars()
            .enumerate()
            .find(|(_, c)| !self.input_alphabet.contains(c))
        {
            Some((position, symbol)) => Err(TuringMachineError::InvalidInput { symbol, position }),
            None => Ok(()),
        }
    }

    /// Starts a run over `input`, validating it first.
    pub fn start_run(&self, input: &str) -> Result<Execution<'_>, TuringMachineError> {
        self.validate_input(input)?;
        Ok(Execution::new(self, input))
    }

    /// Runs the machine on `input` and returns its verdict.
    pub fn run(&self, input: &str) -> Result<Verdict, TuringMachineError> {
        Ok(self.execute(input, |_| {})?.verdict)
    }

    /// Returns `true` if the machine accepts `input`.
    pub fn accepts(&self, input: &str) -> Result<bool, TuringMachineError> {
        Ok(self.run(input)?.is_accepted())
    }

    /// Runs the machine on `input`, calling `observer` with the initial configuration and
    /// again after every applied transition.
    ///
    /// The observer only sees the configuration; it cannot influence the run.
    pub fn execute<F>(&self, input: &str, observer: F) -> Result<Run, TuringMachineError>
    where
        F: FnMut(&Configuration),
    {
        Ok(self.start_run(input)?.run_with(observer))
    }

    /// Runs an input that is already known to be over the input alphabet.
    pub(crate) fn execute_unchecked(&self, input: &str) -> Run {
        Execution::new(self, input).run_with(|_| {})
    }
}

impl fmt::Display for TuringMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:-^15}", "States")?;
        for state in &self.states {
            writeln!(f, "{}", state)?;
        }
        writeln!(f, "{:-^20}", "Initial state")?;
        writeln!(f, "{}", self.start)?;
        writeln!(f, "{:-^20}", "End states")?;
        for state in &self.accept {
            writeln!(f, "{}", state)?;
        }
        writeln!(f, "{:-^20}", "Reject state")?;
        writeln!(f, "{}", self.reject)?;
        writeln!(f, "{:-^20}", "Input alphabet")?;
        for symbol in &self.input_alphabet {
            writeln!(f, "{}", symbol)?;
        }
        writeln!(f, "{:-^20}", "Tape alphabet")?;
        for symbol in &self.tape_alphabet {
            writeln!(f, "{}", symbol)?;
        }
        writeln!(f, "{:-^20}", "Delta function")?;
        for (state, symbol, transition) in self.delta.iter() {
            writeln!(
                f,
                "({}, {}) -> ({}, {}, {})",
                state,
                symbol,
                transition.next_state,
                transition.write,
                transition.direction.as_char()
            )?;
        }

        Ok(())
    }
}

impl From<&TuringMachine> for Program {
    fn from(machine: &TuringMachine) -> Self {
        Program {
            states: machine.states.iter().cloned().collect(),
            input_alphabet: machine.input_alphabet.clone(),
            tape_alphabet: machine.tape_alphabet.iter().cloned().collect(),
            start: machine.start.clone(),
            blank: machine.blank,
            accept: machine.accept.iter().cloned().collect(),
            reject: machine.reject.clone(),
            transitions: machine
                .delta
                .iter()
                .map(|(state, read, transition)| TransitionRecord {
                    state: state.to_string(),
                    read: read.to_string(),
                    transition: transition.clone(),
                })
                .collect(),
        }
    }
}

/// One run of a machine over a single input.
///
/// The configuration is owned by the execution, so runs never share mutable state.
pub struct Execution<'m> {
    machine: &'m TuringMachine,
    configuration: Configuration,
    step_count: usize,
}

impl<'m> Execution<'m> {
    fn new(machine: &'m TuringMachine, input: &str) -> Self {
        debug!(input, start = %machine.start, "Starting run");

        Self {
            machine,
            configuration: Configuration::new(&machine.start, machine.blank, input),
            step_count: 0,
        }
    }

    /// Executes a single step of the computation.
    ///
    /// Accepting states are checked before the reject state, so a state that is both
    /// accepting and the reject state accepts.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a transition was applied.
    /// * `Step::Halt(_)` if the run is over; the configuration is left untouched.
    pub fn step(&mut self) -> Step {
        let state = self.configuration.state();

        if self.machine.is_accepting(state) {
            return Step::Halt(Halt::Accept);
        }

        if state == self.machine.reject {
            return Step::Halt(Halt::Reject);
        }

        let symbol = self.configuration.symbol();
        let transition = match symbol.and_then(|symbol| self.machine.delta.get(state, symbol)) {
            Some(transition) => transition,
            None => {
                return Step::Halt(Halt::UndefinedTransition {
                    state: state.to_string(),
                    symbol: symbol.map(str::to_string),
                })
            }
        };

        trace!(
            state,
            ?symbol,
            next = %transition.next_state,
            write = %transition.write,
            direction = ?transition.direction,
            "Apply"
        );

        self.configuration.apply(transition);
        self.step_count += 1;

        Step::Continue
    }

    /// Runs until the machine halts and reports the outcome.
    pub fn run(self) -> Run {
        self.run_with(|_| {})
    }

    /// Runs until the machine halts, calling `observer` with the initial configuration and
    /// after every applied transition.
    pub fn run_with<F>(mut self, mut observer: F) -> Run
    where
        F: FnMut(&Configuration),
    {
        observer(&self.configuration);

        loop {
            match self.step() {
                Step::Continue => observer(&self.configuration),
                Step::Halt(halt) => {
                    let verdict = halt.verdict();
                    debug!(%verdict, %halt, steps = self.step_count, "Run halted");

                    return Run {
                        verdict,
                        halt,
                        steps: self.step_count,
                    };
                }
            }
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Returns the number of transitions applied so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, Transition};

    fn record(
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

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Moves right over a run of `0`s, then over a run of `1`s, and turns the trailing
    /// blank into a `1`. There is no rule for a `0` after the `1`s, nor for a lone `0`
    /// followed by the blank.
    fn create_increment_machine() -> TuringMachine {
        TuringMachine::new(Program {
            states: strings(&["q0", "q1", "qa", "qr"]),
            input_alphabet: vec!['0', '1'],
            tape_alphabet: strings(&["0", "1", "_"]),
            start: "q0".into(),
            blank: '_',
            accept: strings(&["qa"]),
            reject: "qr".into(),
            transitions: vec![
                record("q0", "0", "q0", "0", Direction::Right),
                record("q0", "1", "q1", "1", Direction::Right),
                record("q1", "1", "q1", "1", Direction::Right),
                record("q1", "_", "qa", "1", Direction::Left),
            ],
        })
        .unwrap()
    }

    /// Accepts strings starting with `a`, explicitly rejects strings starting with `b`.
    fn create_reject_machine() -> TuringMachine {
        TuringMachine::new(Program {
            states: strings(&["start", "accept", "reject"]),
            input_alphabet: vec!['a', 'b'],
            tape_alphabet: strings(&["a", "b", "_"]),
            start: "start".into(),
            blank: '_',
            accept: strings(&["accept"]),
            reject: "reject".into(),
            transitions: vec![
                record("start", "a", "accept", "a", Direction::Right),
                record("start", "b", "reject", "b", Direction::Right),
            ],
        })
        .unwrap()
    }

    #[test]
    fn test_increment_accepts() {
        let machine = create_increment_machine();

        let run = machine.execute("011", |_| {}).unwrap();
        assert_eq!(run.verdict, Verdict::Accepted);
        assert_eq!(run.halt, Halt::Accept);
        assert_eq!(run.steps, 4);
    }

    #[test]
    fn test_increment_rejects_by_undefined_transition() {
        let machine = create_increment_machine();

        let run = machine.execute("0", |_| {}).unwrap();
        assert_eq!(run.verdict, Verdict::Rejected);
        assert_eq!(
            run.halt,
            Halt::UndefinedTransition {
                state: "q0".into(),
                symbol: Some("_".into()),
            }
        );
    }

    #[test]
    fn test_explicit_reject_after_one_step() {
        let machine = create_reject_machine();
        let mut trace = Vec::new();

        let run = machine
            .execute("b", |config| trace.push(config.clone()))
            .unwrap();

        assert_eq!(run.verdict, Verdict::Rejected);
        assert_eq!(run.halt, Halt::Reject);
        assert_eq!(run.steps, 1);
        assert_eq!(trace.len(), 2);
        assert_eq!(trace[0].state(), "start");
        assert_eq!(trace[1].state(), "reject");
    }

    #[test]
    fn test_start_in_reject_state_halts_immediately() {
        let mut program = Program::from(&create_reject_machine());
        program.start = "reject".into();
        let machine = TuringMachine::new(program).unwrap();

        let run = machine.execute("a", |_| {}).unwrap();
        assert_eq!(run.halt, Halt::Reject);
        assert_eq!(run.steps, 0);
    }

    #[test]
    fn test_accepting_state_wins_over_reject() {
        let mut program = Program::from(&create_reject_machine());
        program.reject = "accept".into();
        let machine = TuringMachine::new(program).unwrap();

        assert_eq!(machine.run("a").unwrap(), Verdict::Accepted);
    }

    #[test]
    fn test_empty_input_is_valid() {
        let machine = create_reject_machine();
        let mut trace = Vec::new();

        let run = machine
            .execute("", |config| trace.push(config.clone()))
            .unwrap();

        assert_eq!(trace[0].tape(), ["_", "_"]);
        assert_eq!(trace[0].head(), 1);
        assert_eq!(
            run.halt,
            Halt::UndefinedTransition {
                state: "start".into(),
                symbol: Some("_".into()),
            }
        );
    }

    #[test]
    fn test_invalid_input_symbol() {
        let machine = create_reject_machine();

        let error = machine.run("abc").unwrap_err();
        assert_eq!(
            error,
            TuringMachineError::InvalidInput {
                symbol: 'c',
                position: 2,
            }
        );

        // The machine stays usable after a rejected input.
        assert_eq!(machine.run("a").unwrap(), Verdict::Accepted);
    }

    #[test]
    fn test_blank_is_not_a_valid_input() {
        let machine = create_reject_machine();
        assert!(matches!(
            machine.run("_"),
            Err(TuringMachineError::InvalidInput { symbol: '_', .. })
        ));
    }

    #[test]
    fn test_walking_off_the_tape_rejects() {
        let machine = TuringMachine::new(Program {
            states: strings(&["q0", "qa", "qr"]),
            input_alphabet: vec!['a'],
            tape_alphabet: strings(&["a", "_"]),
            start: "q0".into(),
            blank: '_',
            accept: strings(&["qa"]),
            reject: "qr".into(),
            transitions: vec![
                record("q0", "a", "q0", "a", Direction::Left),
                record("q0", "_", "q0", "_", Direction::Left),
            ],
        })
        .unwrap();

        let run = machine.execute("a", |_| {}).unwrap();
        assert_eq!(
            run.halt,
            Halt::UndefinedTransition {
                state: "q0".into(),
                symbol: None,
            }
        );
        assert_eq!(run.steps, 2);
    }

    #[test]
    fn test_runs_are_idempotent() {
        let machine = create_increment_machine();
        let mut first = Vec::new();
        let mut second = Vec::new();

        let run1 = machine
            .execute("0011", |config| first.push(config.to_string()))
            .unwrap();
        let run2 = machine
            .execute("0011", |config| second.push(config.to_string()))
            .unwrap();

        assert_eq!(run1, run2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_manual_stepping() {
        let machine = create_increment_machine();
        let mut execution = machine.start_run("1").unwrap();

        assert_eq!(execution.step(), Step::Continue);
        assert_eq!(execution.configuration().state(), "q1");
        assert_eq!(execution.step(), Step::Continue);
        assert_eq!(execution.configuration().tape(), ["_", "1", "1"]);
        assert_eq!(execution.step(), Step::Halt(Halt::Accept));
        assert_eq!(execution.step(), Step::Halt(Halt::Accept));
        assert_eq!(execution.step_count(), 2);
    }

    #[test]
    fn test_invalid_model_is_rejected() {
        let mut program = Program::from(&create_reject_machine());
        program.tape_alphabet.retain(|s| s != "_");

        assert!(matches!(
            TuringMachine::new(program),
            Err(TuringMachineError::ValidationError(_))
        ));
    }

    #[test]
    fn test_machine_is_shareable_across_threads() {
        let machine = std::sync::Arc::new(create_increment_machine());

        let handles: Vec<_> = ["011", "0", "1"]
            .into_iter()
            .map(|input| {
                let machine = machine.clone();
                std::thread::spawn(move || machine.run(input).unwrap())
            })
            .collect();

        let verdicts: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(
            verdicts,
            vec![Verdict::Accepted, Verdict::Rejected, Verdict::Accepted]
        );
    }

    #[test]
    fn test_multi_character_tape_symbols() {
        // Marks every `a` as `X1`, then walks back over the marks and accepts on the left
        // sentinel.
        let machine = TuringMachine::new(Program {
            states: strings(&["mark", "back", "qa", "qr"]),
            input_alphabet: vec!['a'],
            tape_alphabet: strings(&["a", "X1", "_"]),
            start: "mark".into(),
            blank: '_',
            accept: strings(&["qa"]),
            reject: "qr".into(),
            transitions: vec![
                record("mark", "a", "mark", "X1", Direction::Right),
                record("mark", "_", "back", "_", Direction::Left),
                record("back", "X1", "back", "X1", Direction::Left),
                record("back", "_", "qa", "_", Direction::Right),
            ],
        })
        .unwrap();

        let mut last = None;
        let run = machine
            .execute("aa", |config| last = Some(config.clone()))
            .unwrap();

        assert_eq!(run.verdict, Verdict::Accepted);
        assert_eq!(run.steps, 6);
        let last = last.unwrap();
        assert_eq!(last.tape(), ["_", "X1", "X1", "_"]);
        assert_eq!(last.render_tape(), "_|X1|X1|_");
        assert!(machine.tape_alphabet().contains("X1"));
        assert!(machine.to_string().contains("(mark, a) -> (mark, X1, R)"));
    }

    #[test]
    fn test_display_summary() {
        let summary = create_reject_machine().to_string();

        assert!(summary.starts_with("----States-----\n"));
        assert!(summary.contains("---Initial state----\nstart\n"));
        assert!(summary.contains("(start, b) -> (reject, b, R)"));
    }
}
