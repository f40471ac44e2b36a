mod repl;

use bfi::{
    minify, scan, Config, Eof, Halt, InterpreterError, Jumps, Machine, ProgramLoader,
    ProgramManager, Step,
};
use clap::{Parser, ValueEnum};
use log::debug;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

/// An interpreter for the eight-symbol tape language.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  bfi-cli programs/hello-world.b
  bfi-cli --builtin reverse < input.txt
  cat programs/cat.b | bfi-cli
  bfi-cli --dump programs/alphabet.b")]
struct Cli {
    /// Path to a program file.
    /// Without it, the program is read from piped stdin, or a REPL starts on a terminal.
    program_file: Option<PathBuf>,

    /// Run an embedded program by name
    #[clap(short, long, conflicts_with = "program_file")]
    builtin: Option<String>,

    /// List the embedded programs and exit
    #[clap(short, long)]
    list: bool,

    /// Print the compiled instruction stream as JSON instead of running it
    #[clap(long)]
    dump: bool,

    /// Print the program without comments and redundant operations instead of running it
    #[clap(long, conflicts_with = "dump")]
    minify: bool,

    /// Load settings from a JSON file; flags below override it
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Initial number of tape cells
    #[clap(long)]
    tape_size: Option<usize>,

    /// Value stored by `,` once input is exhausted
    #[clap(long, value_enum)]
    eof: Option<EofArg>,

    /// Stop with an error after this many instructions
    #[clap(long)]
    max_steps: Option<usize>,

    /// Resolve loops with a precomputed jump table
    #[clap(long)]
    jump_table: bool,

    /// Print execution statistics to stderr
    #[clap(short, long)]
    stats: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EofArg {
    Zero,
    Max,
    Unchanged,
}

impl From<EofArg> for Eof {
    fn from(arg: EofArg) -> Self {
        match arg {
            EofArg::Zero => Eof::Zero,
            EofArg::Max => Eof::Max,
            EofArg::Unchanged => Eof::Unchanged,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), InterpreterError> {
    if cli.list {
        list_programs();
        return Ok(());
    }

    let config = load_config(&cli)?;
    debug!("Using {:?}", config);

    let piped = atty::isnt(atty::Stream::Stdin).then(io::stdin);
    let source = match load_source(&cli, piped)? {
        Some(source) => source,
        None => return repl::run(config),
    };

    if cli.minify {
        println!("{}", minify(&source));
        return Ok(());
    }

    let program = scan(&source);

    if cli.dump {
        let json = serde_json::to_string_pretty(&program).map_err(|e| {
            InterpreterError::ValidationError(format!("Failed to serialize program: {}", e))
        })?;
        println!("{}", json);
        return Ok(());
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut machine = Machine::with_config(program, config, stdin.lock(), stdout.lock());
    let step = machine.run();

    if cli.stats {
        eprintln!(
            "{} instructions, {} steps, {} tape cells",
            machine.program().len(),
            machine.step_count(),
            machine.tape().len()
        );
    }

    match step {
        Step::Halt(Halt::Err(e)) => Err(e),
        _ => Ok(()),
    }
}

fn list_programs() {
    for index in 0..ProgramManager::get_program_count() {
        if let Ok(info) = ProgramManager::get_program_info(index) {
            println!(
                "{:<12} {:>4} instructions, {} loops",
                info.name, info.instruction_count, info.loop_count
            );
        }
    }
}

/// Builds the session settings: defaults, then the config file, then flags.
fn load_config(cli: &Cli) -> Result<Config, InterpreterError> {
    let mut config = match &cli.config {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|e| {
                InterpreterError::FileError(format!(
                    "Failed to read config {}: {}",
                    path.display(),
                    e
                ))
            })?;
            Config::from_json(&content)?
        }
        None => Config::default(),
    };

    if let Some(tape_size) = cli.tape_size {
        config.tape_size = tape_size;
    }
    if let Some(eof) = cli.eof {
        config.eof = eof.into();
    }
    if cli.max_steps.is_some() {
        config.step_limit = cli.max_steps;
    }
    if cli.jump_table {
        config.jumps = Jumps::Table;
    }

    Ok(config)
}

/// Resolves the program source from an embedded program, a file, or piped stdin.
///
/// `piped` is stdin when it is not a terminal. Returns `None` when no program was given and
/// nothing is piped.
fn load_source<R: Read>(
    cli: &Cli,
    piped: Option<R>,
) -> Result<Option<String>, InterpreterError> {
    if let Some(name) = &cli.builtin {
        ProgramManager::get_program_text_by_name(name).map(|text| Some(text.to_string()))
    } else if let Some(path) = &cli.program_file {
        ProgramLoader::read_source(path).map(Some)
    } else if let Some(mut stdin) = piped {
        let mut buffer = String::new();
        stdin
            .read_to_string(&mut buffer)
            .map_err(|e| InterpreterError::Io(format!("Failed to read from stdin: {}", e)))?;
        Ok(Some(buffer))
    } else {
        Ok(None)
    }
}
