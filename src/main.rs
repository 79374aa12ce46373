use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use monkey::ast::Program;
use monkey::environment::Environment;
use monkey::interpreter::{self, Interpreter};
use monkey::macros;
use monkey::parser;
use monkey::scanner::Scanner;
use monkey::value::Value;

const PROMPT: &str = ">> ";

#[derive(ClapParser, Debug)]
#[command(version, about = "Monkey language interpreter with compile-time macros", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Option<Commands>,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize { filename: Option<PathBuf> },

    /// Parses input from a file and prints the syntax tree
    Parse {
        filename: Option<PathBuf>,

        /// Print the tree as JSON instead of source form
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file and prints it with all macros expanded
    Expand { filename: Option<PathBuf> },

    /// Runs input from a file as a Monkey program and prints its result
    Run { filename: Option<PathBuf> },

    /// Starts an interactive session (the default)
    Repl,
}

/// Reads the contents of a file as UTF‑8 text.
fn read_file(filename: PathBuf) -> Result<String> {
    interpreter::read_source(&filename).context(format!("Failed to read file {:?}", filename))
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'monkey::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("monkey::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn no_input() {
    info!("No filepath provided");
    println!("No input filepath was provided. Exiting...");
    std::process::exit(0);
}

fn repl() -> Result<()> {
    info!("Starting REPL");

    let mut editor = DefaultEditor::new().context("Failed to initialise line editor")?;
    let mut interpreter = Interpreter::new();

    println!("Monkey REPL. Press Ctrl-D to exit.");

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line.as_str());

                match interpreter.run(&line) {
                    Ok(Some(value)) => println!("{}", value),

                    Ok(None) => {}

                    Err(e) => {
                        debug!("REPL input rejected: {}", e);
                        eprintln!("\t{}", e);
                    }
                }
            }

            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,

            Err(e) => return Err(e).context("Failed to read line"),
        }
    }

    info!("REPL closed");
    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands.unwrap_or(Commands::Repl) {
        Commands::Tokenize { filename } => {
            let Some(filename) = filename else {
                no_input();
                return Ok(());
            };

            info!("Running Tokenize subcommand");
            let source = read_file(filename)?;
            let mut tokenized = true;

            for token in Scanner::new(&source) {
                match token {
                    Ok(token) => println!("{}", token),

                    Err(e) => {
                        tokenized = false;
                        debug!("Tokenization debug: {}", e);
                        eprintln!("{}", e);
                    }
                }
            }

            if !tokenized {
                debug!("Tokenization failed, exiting with code 65");
                std::process::exit(65);
            }
        }

        Commands::Parse { filename, json } => {
            let Some(filename) = filename else {
                no_input();
                return Ok(());
            };

            info!("Running Parse subcommand");
            let source = read_file(filename)?;

            match parser::parse_source(&source) {
                Ok(program) if json => {
                    let rendered = serde_json::to_string_pretty(&program)
                        .context("Failed to serialise syntax tree")?;
                    println!("{}", rendered);
                }

                Ok(program) => print_program(&program),

                Err(e) => {
                    debug!("Parse debug: {}", e);
                    eprintln!("{}", e);
                    std::process::exit(65);
                }
            }
        }

        Commands::Expand { filename } => {
            let Some(filename) = filename else {
                no_input();
                return Ok(());
            };

            info!("Running Expand subcommand");
            let source = read_file(filename)?;
            let env = Environment::new();

            let expanded = parser::parse_source(&source).and_then(|mut program| {
                macros::define_macros(&mut program, &env);
                macros::expand_macros(program, &env)
            });

            match expanded {
                Ok(program) => print_program(&program),

                Err(e) => {
                    debug!("Expand debug: {}", e);
                    eprintln!("{}", e);
                    std::process::exit(65);
                }
            }
        }

        Commands::Run { filename } => {
            let Some(filename) = filename else {
                no_input();
                return Ok(());
            };

            info!("Running Run subcommand");
            let source = read_file(filename)?;
            info!("Provided input:\n {}", source);

            let mut interpreter = Interpreter::new();

            match interpreter.run(&source) {
                Ok(Some(err @ Value::Error(_))) => {
                    debug!("Runtime debug: {}", err);
                    eprintln!("{}", err);
                    std::process::exit(70);
                }

                Ok(Some(value)) => println!("{}", value),

                Ok(None) => info!("Program produced no value"),

                Err(e) => {
                    debug!("Run debug: {}", e);
                    eprintln!("{}", e);
                    std::process::exit(65);
                }
            }
        }

        Commands::Repl => repl()?,
    }

    Ok(())
}

fn print_program(program: &Program) {
    for stmt in &program.statements {
        println!("{}", stmt);
    }
}
