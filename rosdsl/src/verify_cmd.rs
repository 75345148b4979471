use anyhow::{bail, Context, Result};
use rosdsl::report::render_verify;
use rosdsl::verify::build_verify_report;
use rosdsl_core::parse_file;

use crate::cli::{OutputFormat, VerifyArgs};
use crate::settings_for;

pub fn run_verify(args: VerifyArgs) -> Result<()> {
    let settings = settings_for(args.config.as_deref())?;
    let program = parse_file(&args.input)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;
    let strict_references = args.strict_references || settings.validation.strict_references;
    let report = build_verify_report(&program, strict_references);

    match args.format {
        OutputFormat::Text => println!("{}", render_verify(&report, args.verbose)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if report.errors > 0 {
        bail!("verify failed: {} errors", report.errors);
    }
    if args.strict && report.warnings > 0 {
        bail!("verify failed in strict mode: {} warnings", report.warnings);
    }
    Ok(())
}
