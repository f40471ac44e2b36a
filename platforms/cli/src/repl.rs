//! Line-at-a-time interactive mode. Every line is compiled and run as its own program on a
//! tape that carries over between lines.

use bfi::{scan, Config, Halt, InterpreterError, Machine, Step, Tape};
use std::io::{self, Write};

pub fn run(config: Config) -> Result<(), InterpreterError> {
    println!(
        "bfi {} - one program per line, Ctrl-D to quit",
        env!("CARGO_PKG_VERSION")
    );

    let stdin = io::stdin();
    let mut tape = Tape::new(config.tape_size);
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }

        let program = scan(&line);
        let mut machine =
            Machine::with_tape(program, tape, config.clone(), io::stdin(), io::stdout());
        let step = machine.run();
        tape = machine.into_tape();

        if let Step::Halt(Halt::Err(e)) = step {
            eprintln!("Error: {}", e);
        }
        println!("\n[{}] = {}", tape.offset(), tape.current());
    }
}
