//! This module writes machines back into the line-oriented description format read by
//! [`crate::parser`], so that parsing an encoded machine yields an equal machine.

use crate::machine::TuringMachine;
use crate::types::Program;
use std::fmt::Display;

/// Encodes a machine as a description.
///
/// Sets are written in sorted order; the input alphabet and the transitions keep their
/// declaration order because the enumeration order and the display depend on it.
pub fn encode(machine: &TuringMachine) -> String {
    encode_program(&Program::from(machine))
}

/// Encodes a raw `Program` as a description.
pub fn encode_program(program: &Program) -> String {
    let mut lines: Vec<String> = Vec::new();

    encode_section(&mut lines, &program.states);
    encode_section(&mut lines, &program.input_alphabet);
    encode_section(&mut lines, &program.tape_alphabet);
    lines.push(program.start.clone());
    lines.push(program.blank.to_string());
    encode_section(&mut lines, &program.accept);
    lines.push(program.reject.clone());

    let transitions: Vec<String> = program
        .transitions
        .iter()
        .map(|record| {
            format!(
                "{} {}: {} {} {}",
                record.state,
                record.read,
                record.transition.next_state,
                record.transition.write,
                record.transition.direction.as_char()
            )
        })
        .collect();
    encode_section(&mut lines, &transitions);

    let mut encoded = lines.join("\n");
    encoded.push('\n');
    encoded
}

/// Appends a count line followed by one line per item.
fn encode_section<T: Display>(lines: &mut Vec<String>, items: &[T]) {
    lines.push(items.len().to_string());
    lines.extend(items.iter().map(|item| item.to_string()));
}
