//! This module provides the parser for machine descriptions, utilizing the `pest` crate.
//!
//! A description lists, one entry per line and in this order: the states, the input
//! alphabet and the tape alphabet (each preceded by its count), the start state, the blank
//! symbol, the accepting states (with count), the reject state, and the transition records
//! (with count), each written as `<state> <symbol>: <next-state> <write-symbol> <R|L>`.
//!
//! Input symbols and the blank are single characters. Symbols that only appear in the tape
//! alphabet may be longer, e.g. `X1`.

use crate::{
    machine::TuringMachine,
    types::{
        Direction, Program, Symbol, Transition, TransitionRecord, TuringMachineError,
        MAX_PROGRAM_SIZE,
    },
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::{Pair, Pairs},
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;

/// Derives a `PestParser` for the description grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct TuringMachineParser;

/// Parses and validates a machine description.
///
/// # Returns
///
/// * `Ok(TuringMachine)` if the description is well formed and valid.
/// * `Err(TuringMachineError::ParseError)` if there are any syntax errors.
/// * `Err(TuringMachineError::ValidationError)` if the machine fails validation.
pub fn parse(input: &str) -> Result<TuringMachine, TuringMachineError> {
    TuringMachine::new(parse_program(input)?)
}

/// Parses a machine description into a `Program` without validating it.
pub fn parse_program(input: &str) -> Result<Program, TuringMachineError> {
    if input.len() > MAX_PROGRAM_SIZE {
        return Err(TuringMachineError::ValidationError(format!(
            "Program exceeds the maximum size of {} bytes",
            MAX_PROGRAM_SIZE
        )));
    }

    let root = TuringMachineParser::parse(Rule::description, input)
        .map_err(|e| TuringMachineError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| TuringMachineError::ValidationError("Empty program".to_string()))?;

    let mut lines = Lines::new(root.into_inner());

    let states = lines.section("states", parse_state)?;
    let input_alphabet = lines.section("input alphabet", parse_symbol)?;
    let tape_alphabet = lines.section("tape alphabet", parse_tape_symbol)?;
    let start = parse_state(lines.next("start state")?)?;
    let blank = parse_symbol(lines.next("blank symbol")?)?;
    let accept = lines.section("accepting states", parse_state)?;
    let reject = parse_state(lines.next("reject state")?)?;
    let transitions = lines.section("transitions", parse_transition)?;

    lines.finish()?;

    Ok(Program {
        states,
        input_alphabet,
        tape_alphabet,
        start,
        blank,
        accept,
        reject,
        transitions,
    })
}

/// Cursor over the lines of a description.
struct Lines<'i> {
    pairs: Pairs<'i, Rule>,
}

impl<'i> Lines<'i> {
    fn new(pairs: Pairs<'i, Rule>) -> Self {
        Self { pairs }
    }

    /// Returns the next line, or an error naming `expected` at the end of input.
    fn next(&mut self, expected: &str) -> Result<Pair<'i, Rule>, TuringMachineError> {
        match self.pairs.next() {
            Some(pair) if pair.as_rule() == Rule::line => Ok(pair),
            Some(pair) => Err(parse_error(
                &format!("Unexpected end of input, expected {expected}"),
                pair.as_span(),
            )),
            None => Err(TuringMachineError::ValidationError(format!(
                "Missing {expected}"
            ))),
        }
    }

    /// Reads a count line followed by that many entries parsed with `entry`.
    fn section<T>(
        &mut self,
        name: &str,
        entry: impl Fn(Pair<'i, Rule>) -> Result<T, TuringMachineError>,
    ) -> Result<Vec<T>, TuringMachineError> {
        let count = parse_count(self.next(&format!("{name} count"))?)?;
        let mut entries = Vec::with_capacity(count.min(1024));

        for _ in 0..count {
            entries.push(entry(self.next(name)?)?);
        }

        Ok(entries)
    }

    /// Only blank lines may follow the last transition record.
    fn finish(self) -> Result<(), TuringMachineError> {
        for pair in self.pairs {
            if pair.as_rule() == Rule::line && !pair.as_str().trim().is_empty() {
                return Err(parse_error(
                    "Unexpected content after the last transition",
                    pair.as_span(),
                ));
            }
        }

        Ok(())
    }
}

/// Parses a count line.
fn parse_count(line: Pair<Rule>) -> Result<usize, TuringMachineError> {
    let span = line.as_span();
    let count = TuringMachineParser::parse(Rule::count_line, line.as_str())
        .map_err(|_| parse_error("Expected a count", span))?
        .flatten()
        .find(|pair| pair.as_rule() == Rule::count)
        .ok_or_else(|| parse_error("Expected a count", span))?;

    count
        .as_str()
        .parse::<usize>()
        .map_err(|e| parse_error(&format!("Invalid count: {e}"), span))
}

/// Parses a state name entry. Names may not contain whitespace or `:`, otherwise they could
/// not be referenced from a transition record.
fn parse_state(line: Pair<Rule>) -> Result<String, TuringMachineError> {
    parse_token(line, "state name")
}

/// Parses a tape alphabet entry, which follows the same rules as a state name.
fn parse_tape_symbol(line: Pair<Rule>) -> Result<Symbol, TuringMachineError> {
    parse_token(line, "tape symbol")
}

fn parse_token(line: Pair<Rule>, what: &str) -> Result<String, TuringMachineError> {
    let token = line.as_str().trim();

    if token.is_empty() || token.contains(|c: char| c.is_whitespace() || c == ':') {
        return Err(parse_error(
            &format!("Invalid {what}: '{token}'"),
            line.as_span(),
        ));
    }

    Ok(token.to_string())
}

/// Parses an input symbol or blank entry, which must be exactly one non-whitespace character.
fn parse_symbol(line: Pair<Rule>) -> Result<char, TuringMachineError> {
    let text = line.as_str().trim();
    let mut chars = text.chars();

    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(parse_error(
            &format!("Expected a single-character symbol, found '{text}'"),
            line.as_span(),
        )),
    }
}

/// Parses a `<state> <symbol>: <next-state> <write-symbol> <R|L>` record.
fn parse_transition(line: Pair<Rule>) -> Result<TransitionRecord, TuringMachineError> {
    let span = line.as_span();
    let record = TuringMachineParser::parse(Rule::transition, line.as_str()).map_err(|e| {
        parse_error(
            &format!("Invalid transition record: {}", e.variant.message()),
            span,
        )
    })?;

    let tokens: Vec<&str> = record
        .flatten()
        .filter(|pair| matches!(pair.as_rule(), Rule::state | Rule::symbol | Rule::direction))
        .map(|pair| pair.as_str())
        .collect();

    let [state, read, next_state, write, direction] = tokens[..] else {
        return Err(parse_error("Invalid transition record", span));
    };

    Ok(TransitionRecord {
        state: state.to_string(),
        read: read.to_string(),
        transition: Transition {
            next_state: next_state.to_string(),
            write: write.to_string(),
            direction: parse_direction(direction, span)?,
        },
    })
}

/// Parses a direction token. Only `R` and `L` are supported.
fn parse_direction(token: &str, span: Span) -> Result<Direction, TuringMachineError> {
    match token {
        "L" => Ok(Direction::Left),
        "R" => Ok(Direction::Right),
        _ => Err(parse_error(&format!("Unsupported direction: {token}"), span)),
    }
}

/// Creates a `TuringMachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> TuringMachineError {
    TuringMachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}
