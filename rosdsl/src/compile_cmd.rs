use std::fs;
use std::io::Write;

use anyhow::{bail, Context, Result};
use rosdsl::compile::{compile, CompileError, CompileOptions};
use rosdsl::report::render_validation_failure;
use rosdsl::settings::skip_validation_from_env;
use rosdsl_core::parse_file;
use tracing::info;

use crate::cli::CompileArgs;
use crate::output::{default_output_path, ensure_output_not_input, is_stdout};
use crate::settings_for;

pub fn run_compile(args: CompileArgs) -> Result<()> {
    let mut settings = settings_for(args.config.as_deref())?;
    if args.banners {
        settings.emit.banners = true;
    }
    if args.skip_validation {
        eprintln!("warning: skipping semantic validation (--skip-validation)");
        settings.validation.enabled = false;
    } else if skip_validation_from_env() {
        eprintln!("warning: skipping semantic validation (SKIP_VALIDATION)");
        settings.validation.enabled = false;
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    if !is_stdout(&output) {
        ensure_output_not_input(&output, &args.input)?;
    }

    let program = parse_file(&args.input)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;
    let script = match compile(&program, &CompileOptions::from(&settings)) {
        Ok(script) => script,
        Err(CompileError::Validation(report)) => {
            eprintln!("{}", render_validation_failure(&report));
            bail!("compilation aborted: {} semantic errors", report.errors);
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to compile {}", args.input.display()))
        }
    };

    if is_stdout(&output) {
        std::io::stdout()
            .write_all(script.as_bytes())
            .context("failed to write script to stdout")?;
        return Ok(());
    }
    fs::write(&output, &script)
        .with_context(|| format!("failed to write output script {}", output.display()))?;
    info!(path = %output.display(), "wrote script");
    println!("RouterOS script written to {}", output.display());
    Ok(())
}
