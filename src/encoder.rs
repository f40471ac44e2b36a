//! This module provides encoding of compiled programs back into source text.
//!
//! The encoding is canonical: comments are gone and every `Move`/`Add` is written as a run of a
//! single character matching its net effect, so `+-+` and `+` encode identically.

use crate::compiler::scan;
use crate::program::Program;
use crate::types::{Instruction, InterpreterError, MAX_PROGRAM_SIZE};

/// Encodes a program as the shortest source that compiles to the same behavior.
///
/// Zero-payload moves and adds produce no text. `End` is implicit.
///
/// # Errors
///
/// Returns `InterpreterError::ValidationError` if a `Move` or `Add` payload would render as a
/// run longer than `MAX_PROGRAM_SIZE` characters, since such source could never be loaded back.
pub fn encode(program: &Program) -> Result<String, InterpreterError> {
    if let Some((position, instruction)) = program
        .iter()
        .enumerate()
        .find(|(_, instruction)| instruction.payload().unsigned_abs() > MAX_PROGRAM_SIZE as u64)
    {
        return Err(InterpreterError::ValidationError(format!(
            "Instruction {} at position {} is too large to encode",
            instruction, position
        )));
    }

    Ok(render(program))
}

/// Strips comments and redundant operations from `source`.
pub fn minify(source: &str) -> String {
    // Runs from `scan` are never longer than the source they came from.
    render(&scan(source))
}

fn render(program: &Program) -> String {
    let mut source = String::with_capacity(program.len());

    for instruction in program {
        match *instruction {
            Instruction::Move(n) => push_run(&mut source, n, '>', '<'),
            Instruction::Add(n) => push_run(&mut source, n, '+', '-'),
            Instruction::BeginLoop => source.push('['),
            Instruction::EndLoop => source.push(']'),
            Instruction::Input => source.push(','),
            Instruction::Output => source.push('.'),
            Instruction::End => {}
        }
    }

    source
}

fn push_run(source: &mut String, n: i64, up: char, down: char) {
    let symbol = if n >= 0 { up } else { down };
    source.extend(std::iter::repeat(symbol).take(n.unsigned_abs() as usize));
}
