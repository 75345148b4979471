use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "rosdsl")]
#[command(about = "Validate and compile network configuration DSL files into RouterOS scripts")]
#[command(args_conflicts_with_subcommands = true, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
    /// Input file; `rosdsl <input> [output]` is shorthand for `compile`.
    pub input: Option<PathBuf>,
    /// Output script for the shorthand form (default: `<input>.rsc`).
    pub output: Option<PathBuf>,
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Validate a file and write the RouterOS script.
    Compile(CompileArgs),
    /// Report semantic, type and reference problems without writing a script.
    Verify(VerifyArgs),
    /// Show the parsed section tree of a file.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
pub struct CompileArgs {
    pub input: PathBuf,
    /// Output script; `-` writes to stdout (default: `<input>.rsc`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Settings file replacing the built-in defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Emit without running semantic validation.
    #[arg(long)]
    pub skip_validation: bool,
    /// Write banner comments before each section.
    #[arg(long)]
    pub banners: bool,
    #[arg(short, long)]
    pub verbose: bool,
}

impl CompileArgs {
    /// Arguments for the `rosdsl <input> [output]` form.
    pub fn shorthand(input: PathBuf, output: Option<PathBuf>, verbose: bool) -> Self {
        Self {
            input,
            output,
            config: None,
            skip_validation: false,
            banners: false,
            verbose,
        }
    }
}

#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// Config file to verify.
    pub input: PathBuf,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Settings file replacing the built-in defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Treat references to undeclared interfaces as errors.
    #[arg(long)]
    pub strict_references: bool,
    /// Fail on warnings as well as errors.
    #[arg(long)]
    pub strict: bool,
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    pub input: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    #[arg(long, default_value_t = 3)]
    pub depth: usize,
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
