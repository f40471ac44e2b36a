//! This module provides `scan`, the compilation pass that turns program source into a
//! [`Program`].
//!
//! Runs of `>`/`<` and `+`/`-` collapse into a single `Move` or `Add` carrying their net signed
//! effect, so a run of N characters costs one instruction. Loop and I/O characters map to one
//! instruction each and every other byte is a comment.

use crate::program::Program;
use crate::types::Instruction;
use log::debug;

/// Compiles `source` into an instruction stream terminated by `End`.
pub fn scan(source: &str) -> Program {
    let bytes = source.as_bytes();
    let mut program = Program::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'>' | b'<' => {
                let (payload, next) = run(bytes, i, b'>', b'<');
                program.push(Instruction::Move(payload));
                i = next;
            }
            b'+' | b'-' => {
                let (payload, next) = run(bytes, i, b'+', b'-');
                program.push(Instruction::Add(payload));
                i = next;
            }
            b'.' => {
                program.push(Instruction::Output);
                i += 1;
            }
            b',' => {
                program.push(Instruction::Input);
                i += 1;
            }
            b'[' => {
                program.push(Instruction::BeginLoop);
                i += 1;
            }
            b']' => {
                program.push(Instruction::EndLoop);
                i += 1;
            }
            _ => i += 1,
        }
    }

    let program = program.finish();
    debug!(
        "Compiled {} bytes of source into {} instructions",
        bytes.len(),
        program.len()
    );

    program
}

/// Consumes the maximal run of `up`/`down` bytes starting at `start`.
///
/// Returns the net count (`up` is +1, `down` is -1) and the index just past the run.
fn run(bytes: &[u8], start: usize, up: u8, down: u8) -> (i64, usize) {
    let mut payload: i64 = 0;
    let mut i = start;

    while let Some(&byte) = bytes.get(i) {
        if byte == up {
            payload = payload.wrapping_add(1);
        } else if byte == down {
            payload = payload.wrapping_sub(1);
        } else {
            break;
        }
        i += 1;
    }

    (payload, i)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn move_runs_collapse_to_one_instruction(steps in prop::collection::vec(any::<bool>(), 1..512)) {
            let source: String = steps.iter().map(|&right| if right { '>' } else { '<' }).collect();
            let sum: i64 = steps.iter().map(|&right| if right { 1 } else { -1 }).sum();

            let program = scan(&source);
            prop_assert_eq!(program.instructions(), &[Instruction::Move(sum), Instruction::End][..]);
        }

        #[test]
        fn add_runs_collapse_to_one_instruction(steps in prop::collection::vec(any::<bool>(), 1..512)) {
            let source: String = steps.iter().map(|&up| if up { '+' } else { '-' }).collect();
            let sum: i64 = steps.iter().map(|&up| if up { 1 } else { -1 }).sum();

            let program = scan(&source);
            prop_assert_eq!(program.instructions(), &[Instruction::Add(sum), Instruction::End][..]);
        }

        #[test]
        fn structure_is_preserved(source in "[<>+\\-.,\\[\\]a-z ]{0,200}") {
            let program = scan(&source);
            let structural = |c: char| matches!(c, '.' | ',' | '[' | ']');

            let expected: Vec<char> = source.chars().filter(|&c| structural(c)).collect();
            let actual: Vec<char> = program
                .iter()
                .filter_map(|i| match i {
                    Instruction::Output => Some('.'),
                    Instruction::Input => Some(','),
                    Instruction::BeginLoop => Some('['),
                    Instruction::EndLoop => Some(']'),
                    _ => None,
                })
                .collect();

            prop_assert_eq!(actual, expected);
            prop_assert_eq!(program.iter().filter(|i| **i == Instruction::End).count(), 1);
            prop_assert_eq!(program.instructions().last(), Some(&Instruction::End));
        }
    }
}
