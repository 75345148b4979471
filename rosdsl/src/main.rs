use std::path::Path;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use rosdsl::settings::{default_settings, load_settings, Settings};
use rosdsl_core::{format_json, format_tree, parse_file};
use tracing_subscriber::EnvFilter;

mod cli;
mod compile_cmd;
mod output;
mod verify_cmd;

use cli::{Cli, Command, CompileArgs, InspectArgs, OutputFormat};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Some(Command::Compile(args)) => args.verbose,
        Some(Command::Verify(args)) => args.verbose,
        Some(Command::Inspect(args)) => args.verbose,
        None => cli.verbose,
    };
    init_tracing(verbose);

    match cli.command {
        Some(Command::Compile(args)) => compile_cmd::run_compile(args),
        Some(Command::Verify(args)) => verify_cmd::run_verify(args),
        Some(Command::Inspect(args)) => run_inspect(args),
        None => match cli.input {
            Some(input) => {
                compile_cmd::run_compile(CompileArgs::shorthand(input, cli.output, cli.verbose))
            }
            None => {
                Cli::command().print_help()?;
                Ok(())
            }
        },
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub(crate) fn settings_for(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => load_settings(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Ok(default_settings()),
    }
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let program = parse_file(&args.input)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;

    match args.format {
        OutputFormat::Text => print!("{}", format_tree(&program, args.depth)),
        OutputFormat::Json => println!("{}", format_json(&program)),
    }
    Ok(())
}
