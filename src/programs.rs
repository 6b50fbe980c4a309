//! Machines bundled with the library, embedded at compile time.

use crate::machine::TuringMachine;
use crate::parser::parse;
use crate::types::TuringMachineError;
use serde::Serialize;
use tracing::{debug, warn};

// Default embedded machines, by name.
const PROGRAM_TEXTS: [(&str, &str); 4] = [
    ("even-zeros", include_str!("../machines/even-zeros.tm")),
    ("anbn", include_str!("../machines/anbn.tm")),
    ("ends-with-one", include_str!("../machines/ends-with-one.tm")),
    ("increment", include_str!("../machines/increment.tm")),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<(&'static str, TuringMachine)> = load();
}

fn load() -> Vec<(&'static str, TuringMachine)> {
    let programs: Vec<_> = PROGRAM_TEXTS
        .iter()
        .filter_map(|&(name, text)| match parse(text) {
            Ok(machine) => Some((name, machine)),
            Err(e) => {
                warn!(name, error = %e, "Failed to parse bundled machine");
                None
            }
        })
        .collect();

    debug!(count = programs.len(), "Loaded bundled machines");
    programs
}

/// Read-only access to the bundled machines.
pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available machines
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get a machine by its index
    pub fn get_program_by_index(index: usize) -> Result<&'static TuringMachine, TuringMachineError> {
        PROGRAMS
            .get(index)
            .map(|(_, machine)| machine)
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program index {} out of range", index))
            })
    }

    /// Get a machine by its name
    pub fn get_program_by_name(name: &str) -> Result<&'static TuringMachine, TuringMachineError> {
        PROGRAMS
            .iter()
            .find(|(program_name, _)| *program_name == name)
            .map(|(_, machine)| machine)
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program '{}' not found", name))
            })
    }

    /// List all machine names
    pub fn list_program_names() -> Vec<&'static str> {
        PROGRAMS.iter().map(|(name, _)| *name).collect()
    }

    /// Get information about a machine by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, TuringMachineError> {
        let machine = Self::get_program_by_index(index)?;

        Ok(ProgramInfo {
            index,
            name: PROGRAMS[index].0.to_string(),
            start: machine.start().to_string(),
            input_alphabet: machine.input_alphabet().iter().collect(),
            state_count: machine.states().len(),
            transition_count: machine.delta().len(),
        })
    }

    /// Get the embedded description text of a machine by its name
    pub fn get_program_text(name: &str) -> Result<&'static str, TuringMachineError> {
        PROGRAM_TEXTS
            .iter()
            .find(|(program_name, _)| *program_name == name)
            .map(|(_, text)| *text)
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program '{}' not found", name))
            })
    }
}

/// Summary of a bundled machine, as listed by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub start: String,
    pub input_alphabet: String,
    pub state_count: usize,
    pub transition_count: usize,
}
