//! This module defines the `Machine` struct, which executes a compiled [`Program`] against a
//! [`Tape`]. It owns the program counter, the tape, and the byte streams used for input and
//! output, and resolves taken branches through the loop resolver.

use crate::compiler::scan;
use crate::program::Program;
use crate::resolver::Resolver;
use crate::tape::Tape;
use crate::types::{Cell, Config, Eof, Halt, Instruction, InterpreterError, Step};
use log::{debug, trace};
use std::io::{self, ErrorKind, Read, Write};

/// An interpretation session: one program, one tape, one input and one output stream.
pub struct Machine<R, W> {
    program: Program,
    resolver: Resolver,
    tape: Tape,
    pc: usize,
    step_count: usize,
    config: Config,
    input: R,
    output: W,
}

impl<R: Read, W: Write> Machine<R, W> {
    /// Creates a machine with the default configuration.
    pub fn new(program: Program, input: R, output: W) -> Self {
        Self::with_config(program, Config::default(), input, output)
    }

    /// Creates a machine with a fresh tape sized by `config`.
    pub fn with_config(program: Program, config: Config, input: R, output: W) -> Self {
        let tape = Tape::new(config.tape_size);
        Self::with_tape(program, tape, config, input, output)
    }

    /// Creates a machine that continues on an existing tape, cursor and contents included.
    pub fn with_tape(program: Program, tape: Tape, config: Config, input: R, output: W) -> Self {
        let resolver = Resolver::new(config.jumps, program.instructions());

        Self {
            program,
            resolver,
            tape,
            pc: 0,
            step_count: 0,
            config,
            input,
            output,
        }
    }

    /// Executes the instruction under the program counter.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if an instruction was executed.
    /// * `Step::Halt(Halt::Ok)` on `End` or when the counter runs past the stream.
    /// * `Step::Halt(Halt::Err(_))` on an I/O failure or when the step limit is reached.
    pub fn step(&mut self) -> Step {
        let instruction = match self.program.get(self.pc) {
            Some(&instruction) if instruction != Instruction::End => instruction,
            _ => return self.halt(Halt::Ok),
        };

        if let Some(limit) = self.config.step_limit {
            if self.step_count >= limit {
                return self.halt(Halt::Err(InterpreterError::StepLimitExceeded(limit)));
            }
        }

        trace!("{:>6}: {}", self.pc, instruction);

        match instruction {
            Instruction::Move(offset) => {
                self.tape.shift(offset);
                self.pc += 1;
            }
            Instruction::Add(amount) => {
                self.tape.add_current(amount);
                self.pc += 1;
            }
            Instruction::BeginLoop => {
                self.pc = if self.tape.current() == 0 {
                    self.resolver.forward(self.program.instructions(), self.pc)
                } else {
                    self.pc + 1
                };
            }
            Instruction::EndLoop => {
                self.pc = if self.tape.current() != 0 {
                    self.resolver.back(self.program.instructions(), self.pc)
                } else {
                    self.pc + 1
                };
            }
            Instruction::Input => {
                if let Err(e) = self.read_input() {
                    return self.halt(Halt::Err(e));
                }
                self.pc += 1;
            }
            Instruction::Output => {
                let byte = self.tape.current() as u8;
                if let Err(e) = self.output.write_all(&[byte]) {
                    return self.halt(Halt::Err(e.into()));
                }
                self.pc += 1;
            }
            Instruction::End => return self.halt(Halt::Ok),
        }

        self.step_count += 1;
        Step::Continue
    }

    /// Runs the machine until it halts.
    pub fn run(&mut self) -> Step {
        loop {
            match self.step() {
                Step::Continue => continue,
                halt => {
                    debug!(
                        "Machine halted after {} steps with {} tape cells: {:?}",
                        self.step_count,
                        self.tape.len(),
                        halt
                    );
                    return halt;
                }
            }
        }
    }

    /// Flushes pending output before reporting a halt.
    fn halt(&mut self, halt: Halt) -> Step {
        match (halt, self.output.flush()) {
            (Halt::Ok, Err(e)) => Step::Halt(Halt::Err(e.into())),
            (halt, _) => Step::Halt(halt),
        }
    }

    /// Reads one byte into the current cell, applying the configured end-of-input behavior.
    fn read_input(&mut self) -> Result<(), InterpreterError> {
        // Prompts written so far must be visible before blocking on input.
        self.output.flush()?;

        let mut byte = [0u8; 1];
        loop {
            match self.input.read(&mut byte) {
                Ok(0) => {
                    match self.config.eof {
                        Eof::Zero => self.tape.set_current(0),
                        Eof::Max => self.tape.set_current(Cell::MAX),
                        Eof::Unchanged => {}
                    }
                    return Ok(());
                }
                Ok(_) => {
                    self.tape.set_current(Cell::from(byte[0]));
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Resets the tape, program counter and step count. The byte streams are left as they are.
    pub fn reset(&mut self) {
        self.tape = Tape::new(self.config.tape_size);
        self.pc = 0;
        self.step_count = 0;
    }

    /// Checks whether the next step would halt normally.
    pub fn is_halted(&self) -> bool {
        self.program
            .get(self.pc)
            .is_none_or(|instruction| *instruction == Instruction::End)
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the position of the next instruction to execute.
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Returns the number of instructions executed so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Ends the session, keeping its tape.
    pub fn into_tape(self) -> Tape {
        self.tape
    }
}

/// Converts the final step of a run into a `Result`.
fn outcome(step: Step) -> Result<(), InterpreterError> {
    match step {
        Step::Halt(Halt::Err(e)) => Err(e),
        _ => Ok(()),
    }
}

/// Runs `program` against the process's standard input and output.
pub fn interpret(program: Program, config: Config) -> Result<(), InterpreterError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut machine = Machine::with_config(program, config, stdin.lock(), stdout.lock());

    outcome(machine.run())
}

/// Compiles and runs `source` against an in-memory input, returning everything it wrote.
pub fn execute(source: &str, input: &[u8]) -> Result<Vec<u8>, InterpreterError> {
    execute_with_config(source, input, Config::default())
}

/// Like [`execute`], with explicit settings.
pub fn execute_with_config(
    source: &str,
    input: &[u8],
    config: Config,
) -> Result<Vec<u8>, InterpreterError> {
    let mut machine = Machine::with_config(scan(source), config, input, Vec::new());
    outcome(machine.run())?;

    Ok(machine.into_output())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Jumps;

    fn machine(source: &str, input: &'static [u8]) -> Machine<&'static [u8], Vec<u8>> {
        Machine::new(scan(source), input, Vec::new())
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_machine_creation() {
        let machine = machine("++", b"");

        assert_eq!(machine.pc(), 0);
        assert_eq!(machine.step_count(), 0);
        assert_eq!(machine.tape().current(), 0);
        assert!(!machine.is_halted());
    }

    #[test]
    fn test_add_run() {
        let mut machine = machine("++++", b"");

        assert_eq!(machine.run(), Step::Halt(Halt::Ok));
        assert_eq!(machine.tape().current(), 4);
        assert_eq!(machine.step_count(), 1);
        assert!(machine.is_halted());
    }

    #[test]
    fn test_clear_loop() {
        let mut machine = machine("+[-]", b"");

        assert_eq!(machine.run(), Step::Halt(Halt::Ok));
        assert_eq!(machine.tape().current(), 0);
    }

    #[test]
    fn test_copy_loop() {
        let mut machine = machine("+[>+<-]", b"");
        machine.run();

        assert_eq!(machine.tape().value_at(0), 0);
        assert_eq!(machine.tape().value_at(1), 1);
        assert_eq!(machine.tape().offset(), 0);
    }

    #[test]
    fn test_single_step() {
        let mut machine = machine("+>", b"");

        assert_eq!(machine.step(), Step::Continue);
        assert_eq!(machine.pc(), 1);
        assert_eq!(machine.tape().current(), 1);

        assert_eq!(machine.step(), Step::Continue);
        assert_eq!(machine.tape().offset(), 1);

        assert_eq!(machine.step(), Step::Halt(Halt::Ok));
        assert_eq!(machine.step(), Step::Halt(Halt::Ok));
        assert_eq!(machine.step_count(), 2);
    }

    #[test]
    fn test_skips_loop_on_zero() {
        let mut machine = machine("[+++]++", b"");
        machine.run();

        assert_eq!(machine.tape().current(), 2);
    }

    #[test]
    fn test_unmatched_end_loop_terminates() {
        let mut machine = machine("]", b"");
        assert_eq!(machine.run(), Step::Halt(Halt::Ok));
    }

    #[test]
    fn test_unmatched_begin_loop_terminates() {
        let mut machine = machine(">[+", b"");
        assert_eq!(machine.run(), Step::Halt(Halt::Ok));
        assert_eq!(machine.tape().current(), 0);
    }

    #[test]
    fn test_step_limit_stops_runaway_program() {
        // The unmatched `]` jumps back to position 0 forever.
        let config = Config {
            step_limit: Some(100),
            ..Config::default()
        };
        let mut machine = Machine::with_config(scan("+]"), config, &b""[..], Vec::new());

        assert_eq!(
            machine.run(),
            Step::Halt(Halt::Err(InterpreterError::StepLimitExceeded(100)))
        );
        assert_eq!(machine.step_count(), 100);
    }

    #[test]
    fn test_output_truncates_to_byte() {
        // 256 + 65 prints 'A'.
        let mut machine = machine(&format!("{}.", "+".repeat(256 + 65)), b"");
        machine.run();

        assert_eq!(machine.tape().current(), 321);
        assert_eq!(machine.output(), b"A");
    }

    #[test]
    fn test_input_echo() {
        let mut machine = machine(",.,.,.", b"hey");
        machine.run();

        assert_eq!(machine.into_output(), b"hey");
    }

    #[test]
    fn test_eof_zero() {
        let mut machine = machine("+++,", b"");
        machine.run();

        assert_eq!(machine.tape().current(), 0);
    }

    #[test]
    fn test_eof_max() {
        let config = Config {
            eof: Eof::Max,
            ..Config::default()
        };
        let output = execute_with_config(",.", b"", config).unwrap();

        assert_eq!(output, vec![0xFF]);
    }

    #[test]
    fn test_eof_unchanged() {
        let config = Config {
            eof: Eof::Unchanged,
            ..Config::default()
        };
        let mut machine = Machine::with_config(scan("+++,"), config, &b""[..], Vec::new());
        machine.run();

        assert_eq!(machine.tape().current(), 3);
    }

    #[test]
    fn test_write_failure_halts_with_error() {
        let mut machine = Machine::new(scan("+."), &b""[..], BrokenPipe);

        match machine.run() {
            Step::Halt(Halt::Err(InterpreterError::Io(msg))) => assert!(msg.contains("closed")),
            other => panic!("Expected an I/O error, but got {:?}", other),
        }
    }

    #[test]
    fn test_jump_table_matches_scan() {
        let source = "++++++[>++++++++<-]>+.[-]<++[>+++++<-]>.";
        let scanned = execute(source, b"").unwrap();

        let config = Config {
            jumps: Jumps::Table,
            ..Config::default()
        };
        let tabled = execute_with_config(source, b"", config).unwrap();

        assert_eq!(scanned, vec![b'1', 10]);
        assert_eq!(scanned, tabled);
    }

    #[test]
    fn test_reset() {
        let mut machine = machine("+>+", b"");
        machine.run();
        assert!(machine.is_halted());

        machine.reset();
        assert_eq!(machine.pc(), 0);
        assert_eq!(machine.step_count(), 0);
        assert_eq!(machine.tape().value_at(0), 0);
        assert_eq!(machine.tape().offset(), 0);

        machine.run();
        assert_eq!(machine.tape().value_at(1), 1);
    }

    #[test]
    fn test_with_tape_continues_session() {
        let mut first = machine("+++>", b"");
        first.run();
        let tape = first.into_tape();

        let mut second =
            Machine::with_tape(scan("<."), tape, Config::default(), &b""[..], Vec::new());
        second.run();

        assert_eq!(second.output(), &[3]);
    }

    #[test]
    fn test_left_growth_during_execution() {
        let config = Config {
            tape_size: 2,
            ..Config::default()
        };
        let mut machine =
            Machine::with_config(scan("+<<<<<++>>>>>."), config, &b""[..], Vec::new());
        machine.run();

        assert_eq!(machine.output(), &[1]);
        assert_eq!(machine.tape().value_at(-5), 2);
        assert!(machine.tape().len() >= 8);
    }

    #[test]
    fn test_zero_payloads_leave_tape_unchanged() {
        let program = Program::from_instructions(&[Instruction::Add(0), Instruction::Move(0)]);
        let mut machine = Machine::new(program, &b""[..], Vec::new());
        let before = machine.tape().clone();

        machine.run();
        assert_eq!(machine.tape(), &before);
    }

    #[test]
    fn test_deserialized_program_halts_at_appended_end() {
        let program: Program = serde_json::from_str(r#"[{"Add":2}]"#).unwrap();
        let mut machine = Machine::new(program, &b""[..], Vec::new());

        assert_eq!(machine.run(), Step::Halt(Halt::Ok));
        assert_eq!(machine.tape().current(), 2);
        assert_eq!(machine.pc(), 1);
    }

    #[test]
    fn test_interior_end_halts_before_later_output() {
        use Instruction::*;
        let program = Program::from_instructions(&[Add(65), End, Output]);
        let mut machine = Machine::new(program, &b""[..], Vec::new());

        assert_eq!(machine.run(), Step::Halt(Halt::Ok));
        assert!(machine.output().is_empty());
        assert_eq!(machine.pc(), 1);
    }
}
