//! This module provides the `ProgramLoader` struct, responsible for loading machine
//! descriptions from files and strings.

use crate::machine::TuringMachine;
use crate::parser::parse;
use crate::types::TuringMachineError;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of machine description files.
pub const PROGRAM_EXTENSION: &str = "tm";

/// `ProgramLoader` is a utility struct for loading machines.
/// It provides methods to load a machine from a file or from string content, and to
/// discover and load all `.tm` files within a directory.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single machine from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(TuringMachine)` if the file is read, parsed and validated.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::ParseError)` or `ValidationError` if the content is not a
    ///   valid description.
    pub fn load_program(path: &Path) -> Result<TuringMachine, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        parse(&content)
    }

    /// Loads a single machine from the provided string content.
    pub fn load_program_from_string(content: &str) -> Result<TuringMachine, TuringMachineError> {
        parse(content)
    }

    /// Loads all machine description files (`.tm` extension) from a given directory.
    ///
    /// Directories and files with other extensions are skipped. Each element of the result
    /// is either the path and machine of a loaded file, or the error that prevented loading
    /// it.
    pub fn load_programs(
        directory: &Path,
    ) -> Vec<Result<(PathBuf, TuringMachine), TuringMachineError>> {
        if !directory.exists() {
            return vec![Err(TuringMachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results: Vec<_> = entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(TuringMachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir() || path.extension().is_none_or(|ext| ext != PROGRAM_EXTENSION) {
                    return None;
                }

                match Self::load_program(&path) {
                    Ok(machine) => Some(Ok((path, machine))),
                    Err(e) => Some(Err(TuringMachineError::FileError(format!(
                        "Failed to load machine from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect();

        // Directory iteration order is platform dependent.
        results.sort_by_key(|result| result.as_ref().ok().map(|(path, _)| path.clone()));
        results
    }
}
