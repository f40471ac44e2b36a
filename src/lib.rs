//! This crate provides the core logic for an interpreter of the eight-symbol tape language
//! (`<` `>` `+` `-` `[` `]` `,` `.`).
//! It includes modules for compiling source into a run-length-encoded instruction stream,
//! resolving loop brackets, executing programs against a bidirectionally growable tape, and
//! managing a collection of embedded programs.

pub mod compiler;
pub mod encoder;
pub mod loader;
pub mod machine;
pub mod program;
pub mod programs;
pub mod resolver;
pub mod tape;
pub mod types;

/// Re-exports the `scan` function from the compiler module.
pub use compiler::scan;
/// Re-exports the encoding functions from the encoder module.
pub use encoder::{encode, minify};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `Machine` struct and the one-shot entry points from the machine module.
pub use machine::{execute, execute_with_config, interpret, Machine};
/// Re-exports the compiled instruction stream.
pub use program::Program;
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the bracket-matching functions and the precomputed `JumpTable`.
pub use resolver::{jump_back, jump_forward, JumpTable};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports various types related to instructions and execution from the types module.
pub use types::{
    Cell, Config, Eof, Halt, Instruction, InterpreterError, Jumps, Step, DEFAULT_TAPE_SIZE,
    MAX_PROGRAM_SIZE,
};
