use crate::compiler::scan;
use crate::program::Program;
use crate::types::InterpreterError;

// Default embedded programs
const PROGRAM_TEXTS: [(&str, &str); 4] = [
    ("Hello World", include_str!("../programs/hello-world.b")),
    ("Cat", include_str!("../programs/cat.b")),
    ("Reverse", include_str!("../programs/reverse.b")),
    ("Alphabet", include_str!("../programs/alphabet.b")),
];

/// An embedded program together with its compiled form.
#[derive(Debug, Clone)]
pub struct EmbeddedProgram {
    pub name: &'static str,
    pub source: &'static str,
    pub program: Program,
}

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<EmbeddedProgram> = PROGRAM_TEXTS
        .iter()
        .map(|&(name, source)| EmbeddedProgram {
            name,
            source,
            program: scan(source),
        })
        .collect();
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<Program, InterpreterError> {
        PROGRAMS
            .get(index)
            .map(|embedded| embedded.program.clone())
            .ok_or_else(|| {
                InterpreterError::ValidationError(format!("Program index {} out of range", index))
            })
    }

    /// Get a program by its name, ignoring case
    pub fn get_program_by_name(name: &str) -> Result<Program, InterpreterError> {
        PROGRAMS
            .iter()
            .find(|embedded| embedded.name.eq_ignore_ascii_case(name))
            .map(|embedded| embedded.program.clone())
            .ok_or_else(|| InterpreterError::ProgramNotFound(name.to_string()))
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        PROGRAMS
            .iter()
            .map(|embedded| embedded.name.to_string())
            .collect()
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, InterpreterError> {
        let embedded = PROGRAMS.get(index).ok_or_else(|| {
            InterpreterError::ValidationError(format!("Program index {} out of range", index))
        })?;

        Ok(ProgramInfo {
            index,
            name: embedded.name.to_string(),
            source_len: embedded.source.len(),
            instruction_count: embedded.program.len(),
            loop_count: embedded.program.loop_count(),
        })
    }

    /// Search for programs by name
    pub fn search_programs(query: &str) -> Vec<usize> {
        let query = query.to_lowercase();

        PROGRAMS
            .iter()
            .enumerate()
            .filter(|(_, embedded)| embedded.name.to_lowercase().contains(&query))
            .map(|(index, _)| index)
            .collect()
    }

    /// Get the original text of a program by its index
    pub fn get_program_text_by_index(index: usize) -> Result<&'static str, InterpreterError> {
        PROGRAMS
            .get(index)
            .map(|embedded| embedded.source)
            .ok_or_else(|| {
                InterpreterError::ValidationError(format!(
                    "Program text index {} out of range",
                    index
                ))
            })
    }

    /// Get the original text of a program by its name, ignoring case
    pub fn get_program_text_by_name(name: &str) -> Result<&'static str, InterpreterError> {
        PROGRAMS
            .iter()
            .find(|embedded| embedded.name.eq_ignore_ascii_case(name))
            .map(|embedded| embedded.source)
            .ok_or_else(|| InterpreterError::ProgramNotFound(name.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub source_len: usize,
    pub instruction_count: usize,
    pub loop_count: usize,
}
