//! This module defines `Program`, the compiled instruction stream handed from the compiler to
//! the machine. Positions are stable once assigned: instructions are only ever appended.

use crate::types::{Instruction, INSTRUCTION_INITIAL_CAPACITY};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// An ordered sequence of instructions that always ends with `Instruction::End`.
///
/// `End` may also appear earlier in a stream built from raw instructions; execution halts at
/// the first one reached. Deserialization goes through [`From<Vec<Instruction>>`], so a decoded
/// program is terminated the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Instruction>", into = "Vec<Instruction>")]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Creates an empty stream. A finished program always ends with `End`; see [`Program::finish`].
    pub(crate) fn new() -> Self {
        Self {
            instructions: Vec::with_capacity(INSTRUCTION_INITIAL_CAPACITY),
        }
    }

    /// Builds a program from raw instructions. Every instruction keeps its position, interior
    /// `End`s included, and `End` is appended unless the slice already ends with one.
    pub fn from_instructions(instructions: &[Instruction]) -> Self {
        Self::from(instructions.to_vec())
    }

    pub(crate) fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Appends the terminating `End` instruction.
    pub(crate) fn finish(mut self) -> Self {
        self.push(Instruction::End);
        self
    }

    /// Returns the instruction at `position`, if any.
    pub fn get(&self, position: usize) -> Option<&Instruction> {
        self.instructions.get(position)
    }

    /// Returns the number of instructions, `End` included.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Returns the number of `BeginLoop` instructions.
    pub fn loop_count(&self) -> usize {
        self.iter()
            .filter(|i| matches!(i, Instruction::BeginLoop))
            .count()
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instructions: Vec<Instruction>) -> Self {
        let terminated = instructions.last() == Some(&Instruction::End);
        let program = Self { instructions };
        if terminated {
            program
        } else {
            program.finish()
        }
    }
}

impl From<Program> for Vec<Instruction> {
    fn from(program: Program) -> Self {
        program.instructions
    }
}

impl Index<usize> for Program {
    type Output = Instruction;

    fn index(&self, position: usize) -> &Self::Output {
        &self.instructions[position]
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
