//! Parse, verify and emit in one call.

use rosdsl_core::{parse, ParseError, Program};
use thiserror::Error;
use tracing::{info, warn};

use crate::emit::{emit_program, EmitError, EmitOptions};
use crate::settings::{Settings, ValidationSettings};
use crate::verify::{build_verify_report, VerifyReport};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub validation: ValidationSettings,
    pub emit: EmitOptions,
}

impl From<&Settings> for CompileOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            validation: settings.validation.clone(),
            emit: settings.emit.options(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Verification found errors; the report carries every issue.
    #[error("semantic validation failed: {} errors", .0.errors)]
    Validation(VerifyReport),
    #[error(transparent)]
    Emit(#[from] EmitError),
}

/// Verify `program` (unless disabled) and render the script.
pub fn compile(program: &Program, options: &CompileOptions) -> Result<String, CompileError> {
    if options.validation.enabled {
        let report = build_verify_report(program, options.validation.strict_references);
        if report.errors > 0 {
            return Err(CompileError::Validation(report));
        }
        for issue in &report.issues {
            warn!(code = %issue.code, "{}", issue.message);
        }
    } else {
        info!("semantic validation disabled");
    }
    let script = emit_program(program, &options.emit)?;
    info!(lines = script.lines().count(), "emitted script");
    Ok(script)
}

pub fn compile_source(source: &str, options: &CompileOptions) -> Result<String, CompileError> {
    let program = parse(source)?;
    compile(&program, options)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const BASIC: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../fixtures/basic.rdsl"));

    #[test]
    fn basic_fixture_compiles_to_four_lines() {
        let script = compile_source(BASIC, &CompileOptions::default()).unwrap();
        assert_eq!(
            script,
            "/system identity set name=\"mikrotik_r1_CCR2004\"\n\
             /interface ethernet set ether1\n\
             /ip address add address=10.0.0.1/24 interface=ether1\n\
             /ip firewall filter add chain=input action=accept comment=\"rule1\"\n"
        );
    }

    #[test]
    fn banners_and_indent() {
        let options = CompileOptions {
            emit: EmitOptions {
                banners: true,
                indent: "  ".to_string(),
            },
            ..CompileOptions::default()
        };
        let script = compile_source("snmp:\n    enabled = true\n", &options).unwrap();
        assert_eq!(script, "# generated by rosdsl\n# snmp\n  /snmp set enabled=yes\n");
    }

    #[test]
    fn validation_failure_returns_report() {
        let source = "firewall:\n    filter:\n        rule1:\n            chain = \"input\"\n";
        let Err(CompileError::Validation(report)) =
            compile_source(source, &CompileOptions::default())
        else {
            panic!("expected validation failure");
        };
        assert_eq!(report.errors, 1);
    }

    #[test]
    fn disabled_validation_still_emits() {
        let source = "firewall:\n    filter:\n        rule1:\n            chain = \"input\"\n";
        let options = CompileOptions {
            validation: ValidationSettings {
                enabled: false,
                strict_references: false,
            },
            ..CompileOptions::default()
        };
        assert_eq!(compile_source(source, &options).unwrap(), "");
    }

    #[test]
    fn parse_errors_pass_through() {
        assert!(matches!(
            compile_source("device:\n    vendor = \"mikrotik\n", &CompileOptions::default()),
            Err(CompileError::Parse(ParseError::UnterminatedString { .. }))
        ));
    }

    #[test]
    fn settings_convert_to_options() {
        let options = CompileOptions::from(&Settings::default());
        assert!(options.validation.enabled);
        assert!(!options.emit.banners);
    }
}
