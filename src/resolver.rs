//! This module provides the loop resolver: bracket matching for `BeginLoop` and `EndLoop`.
//!
//! [`jump_forward`] and [`jump_back`] rescan the instruction stream on every call, counting
//! nesting depth. [`JumpTable`] answers the same questions from a table built once per program.
//! Both agree on every position, including unmatched brackets: a forward scan that finds no
//! match stops at `End` (or the end of the stream), a backward scan stops at position 0.

use crate::types::{Instruction, Jumps};

/// Given the position of a `BeginLoop`, returns the position just past its matching `EndLoop`.
///
/// If no match exists the scan stops at the first `End` and returns its position, or returns
/// `instructions.len()` if the stream has no `End`.
pub fn jump_forward(instructions: &[Instruction], position: usize) -> usize {
    let mut depth = 0usize;
    let mut i = position + 1;

    while let Some(instruction) = instructions.get(i) {
        match instruction {
            Instruction::End => return i,
            Instruction::EndLoop if depth == 0 => return i + 1,
            Instruction::BeginLoop => depth += 1,
            Instruction::EndLoop => depth -= 1,
            _ => {}
        }
        i += 1;
    }

    i
}

/// Given the position of an `EndLoop`, returns the position of its matching `BeginLoop`.
///
/// If no match exists the scan stops at position 0 and returns 0.
pub fn jump_back(instructions: &[Instruction], position: usize) -> usize {
    let mut depth = 0usize;
    let mut i = position.min(instructions.len());

    while i > 0 {
        i -= 1;
        match instructions[i] {
            Instruction::BeginLoop if depth == 0 => return i,
            Instruction::EndLoop => depth += 1,
            Instruction::BeginLoop => depth -= 1,
            _ => {}
        }
    }

    0
}

/// Branch targets for every bracket of a program, computed in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpTable {
    targets: Vec<usize>,
}

impl JumpTable {
    /// Builds the table. Entries for non-bracket positions hold the position itself.
    pub fn build(instructions: &[Instruction]) -> Self {
        let mut targets: Vec<usize> = (0..instructions.len()).collect();
        // Opens still waiting for a forward match. Drained at `End`, where forward scans stop.
        let mut forward: Vec<usize> = Vec::new();
        // Opens still waiting for a backward match. Backward scans cross `End`, so never drained.
        let mut backward: Vec<usize> = Vec::new();

        for (i, instruction) in instructions.iter().enumerate() {
            match instruction {
                Instruction::BeginLoop => {
                    forward.push(i);
                    backward.push(i);
                }
                Instruction::EndLoop => {
                    if let Some(open) = forward.pop() {
                        targets[open] = i + 1;
                    }
                    targets[i] = backward.pop().unwrap_or(0);
                }
                Instruction::End => {
                    for open in forward.drain(..) {
                        targets[open] = i;
                    }
                }
                _ => {}
            }
        }

        for open in forward {
            targets[open] = instructions.len();
        }

        Self { targets }
    }

    /// Target of the `BeginLoop` at `position` when its cell is zero.
    pub fn forward(&self, position: usize) -> usize {
        self.targets[position]
    }

    /// Target of the `EndLoop` at `position` when its cell is not zero.
    pub fn back(&self, position: usize) -> usize {
        self.targets[position]
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// The resolution strategy a machine uses for taken branches.
#[derive(Debug, Clone)]
pub(crate) enum Resolver {
    Scan,
    Table(JumpTable),
}

impl Resolver {
    pub(crate) fn new(jumps: Jumps, instructions: &[Instruction]) -> Self {
        match jumps {
            Jumps::Scan => Resolver::Scan,
            Jumps::Table => Resolver::Table(JumpTable::build(instructions)),
        }
    }

    pub(crate) fn forward(&self, instructions: &[Instruction], position: usize) -> usize {
        match self {
            Resolver::Scan => jump_forward(instructions, position),
            Resolver::Table(table) => table.forward(position),
        }
    }

    pub(crate) fn back(&self, instructions: &[Instruction], position: usize) -> usize {
        match self {
            Resolver::Scan => jump_back(instructions, position),
            Resolver::Table(table) => table.back(position),
        }
    }
}
