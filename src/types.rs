//! This module defines the core data structures and types used throughout the interpreter,
//! including instructions, execution results, configuration and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One unsigned storage slot on the tape. Arithmetic on cells wraps.
pub type Cell = u64;

/// The number of cells a fresh tape starts with.
pub const DEFAULT_TAPE_SIZE: usize = 30000;
/// The initial capacity reserved for a compiled instruction stream.
pub const INSTRUCTION_INITIAL_CAPACITY: usize = 64;
/// The maximum allowed size for a program source in bytes when loading from disk.
pub const MAX_PROGRAM_SIZE: usize = 16 * 1024 * 1024; // 16MB

/// A single compiled instruction.
///
/// `Move` and `Add` carry the net signed magnitude of a run of `>`/`<` or `+`/`-` characters.
/// Every other kind has no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    /// Shift the tape cursor by the payload (positive is right).
    Move(i64),
    /// Add the payload to the current cell, wrapping.
    Add(i64),
    /// Skip past the matching `EndLoop` when the current cell is zero.
    BeginLoop,
    /// Jump back to the matching `BeginLoop` when the current cell is not zero.
    EndLoop,
    /// Read one byte into the current cell.
    Input,
    /// Write the low byte of the current cell.
    Output,
    /// Terminates the stream.
    End,
}

impl Instruction {
    /// Returns the signed payload of a `Move` or `Add`, and zero for every other kind.
    pub fn payload(&self) -> i64 {
        match self {
            Instruction::Move(n) | Instruction::Add(n) => *n,
            _ => 0,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Move(n) => write!(f, "MOVE {}", n),
            Instruction::Add(n) => write!(f, "ADD {}", n),
            Instruction::BeginLoop => write!(f, "BEGIN_LOOP"),
            Instruction::EndLoop => write!(f, "END_LOOP"),
            Instruction::Input => write!(f, "IN"),
            Instruction::Output => write!(f, "OUT"),
            Instruction::End => write!(f, "END"),
        }
    }
}

/// What an `Input` instruction stores once the input stream is exhausted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Eof {
    /// Store zero.
    #[default]
    Zero,
    /// Store an all-ones cell.
    Max,
    /// Leave the current cell untouched.
    Unchanged,
}

/// How loop brackets are resolved at run time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Jumps {
    /// Rescan the instruction stream on every taken branch.
    #[default]
    Scan,
    /// Look targets up in a table built once per session.
    Table,
}

/// Settings for one interpretation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial number of cells on the tape.
    pub tape_size: usize,
    /// End-of-input behavior for `Input`.
    pub eof: Eof,
    /// Maximum number of instructions to execute, unbounded when `None`.
    pub step_limit: Option<usize>,
    /// Branch target resolution strategy.
    pub jumps: Jumps,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tape_size: DEFAULT_TAPE_SIZE,
            eof: Eof::default(),
            step_limit: None,
            jumps: Jumps::default(),
        }
    }
}

impl Config {
    /// Parses a configuration from its JSON representation. Missing fields take their defaults.
    pub fn from_json(content: &str) -> Result<Self, InterpreterError> {
        serde_json::from_str(content)
            .map_err(|e| InterpreterError::ValidationError(format!("Invalid configuration: {}", e)))
    }
}

/// Represents the outcome of an execution step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The machine executed an instruction and can continue.
    Continue,
    /// The machine has stopped.
    Halt(Halt),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Halt {
    /// Reached `End` or ran past the last instruction.
    Ok,

    Err(InterpreterError),
}

/// Represents the errors that can surface at the edges of an interpretation session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpreterError {
    /// Reading from or writing to one of the session's byte streams failed.
    #[error("I/O error: {0}")]
    Io(String),
    /// The configured step limit was reached before the program halted.
    #[error("Step limit of {0} exceeded")]
    StepLimitExceeded(usize),
    /// No embedded program is registered under the requested name.
    #[error("Program '{0}' not found")]
    ProgramNotFound(String),
    /// A configuration value or lookup argument is invalid.
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to file system operations, such as reading program files.
    #[error("File error: {0}")]
    FileError(String),
}

impl From<std::io::Error> for InterpreterError {
    fn from(error: std::io::Error) -> Self {
        InterpreterError::Io(error.to_string())
    }
}
