//! This module provides the `ProgramLoader` struct, responsible for loading programs from
//! files, directories and strings and compiling them.

use crate::compiler::scan;
use crate::program::Program;
use crate::types::{InterpreterError, MAX_PROGRAM_SIZE};
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions recognized as program sources when scanning a directory.
pub const PROGRAM_EXTENSIONS: [&str; 2] = ["b", "bf"];

/// `ProgramLoader` is a utility struct for loading programs.
/// It provides methods to load programs from individual files, from string content,
/// and to discover and load all program files within a specified directory.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Reads the raw source of a program file.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` with the file content. Invalid UTF-8 sequences are replaced, which only
    ///   affects comments since every command character is ASCII.
    /// * `Err(InterpreterError::FileError)` if the file cannot be read or exceeds
    ///   `MAX_PROGRAM_SIZE`.
    pub fn read_source(path: &Path) -> Result<String, InterpreterError> {
        let bytes = fs::read(path).map_err(|e| {
            InterpreterError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        if bytes.len() > MAX_PROGRAM_SIZE {
            return Err(InterpreterError::FileError(format!(
                "File {} is {} bytes, larger than the {} byte limit",
                path.display(),
                bytes.len(),
                MAX_PROGRAM_SIZE
            )));
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Loads and compiles a single program from the specified file path.
    ///
    /// # Arguments
    ///
    /// * `path` - A reference to the `Path` of the source file to load.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is successfully read.
    /// * `Err(InterpreterError::FileError)` if the file cannot be read.
    pub fn load_program(path: &Path) -> Result<Program, InterpreterError> {
        Self::read_source(path).map(|source| scan(&source))
    }

    /// Compiles a program from the provided string content.
    ///
    /// Every string is a valid program, so this never fails.
    pub fn load_program_from_string(content: &str) -> Program {
        scan(content)
    }

    /// Loads all program files (`.b` or `.bf`) from a given directory.
    ///
    /// Directories and files with other extensions are skipped.
    ///
    /// # Returns
    ///
    /// * `Vec<Result<(PathBuf, Program), InterpreterError>>` - one entry per program file, holding
    ///   either its path and compiled program or the error that occurred while loading it.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), InterpreterError>> {
        if !directory.exists() {
            return vec![Err(InterpreterError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(InterpreterError::FileError(format!(
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
                        return Some(Err(InterpreterError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir() || !is_program_file(&path) {
                    return None;
                }

                Some(Self::load_program(&path).map(|program| (path, program)))
            })
            .collect();

        // Directory iteration order is platform dependent.
        results.sort_by(|a, b| match (a, b) {
            (Ok((a, _)), Ok((b, _))) => a.cmp(b),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => std::cmp::Ordering::Equal,
        });

        results
    }
}

fn is_program_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| PROGRAM_EXTENSIONS.contains(&ext))
}
