//! Whole-program verification report.
//!
//! ## Checks Performed
//!
//! 1. **Semantic rules**: the kind-specific validator of every root section
//!    (first failure per section)
//! 2. **Types**: uniform lists in every section
//! 3. **References**: duplicate names and interface references, see
//!    [`crate::resolve`]

use rosdsl_core::Program;
use serde::Serialize;
use tracing::{debug, info};

use crate::resolve::{reference_findings, FindingSeverity, ResolveFinding};
use crate::section::SpecializedSection;
use crate::typecheck::check_section;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum VerifySeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyIssue {
    pub severity: VerifySeverity,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub sections: usize,
    pub strict_references: bool,
    pub errors: usize,
    pub warnings: usize,
    pub issues: Vec<VerifyIssue>,
}

impl VerifyReport {
    /// Messages of every error issue, in report order.
    pub fn error_messages(&self) -> Vec<&str> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == VerifySeverity::Error)
            .map(|issue| issue.message.as_str())
            .collect()
    }
}

pub fn build_verify_report(program: &Program, strict_references: bool) -> VerifyReport {
    let mut issues = Vec::new();
    for section in &program.sections {
        let specialized = SpecializedSection::from_section(section);
        debug!(section = %section.name, kind = %specialized.kind(), "validating section");
        if let Err(error) = specialized.validate() {
            issues.push(err(
                "semantic",
                format!("Error in section '{}': {}", section.name, error),
            ));
        }
        if let Err(error) = check_section(section) {
            issues.push(err(
                "type_error",
                format!("Error in section '{}': {}", section.name, error),
            ));
        }
    }
    issues.extend(
        reference_findings(program, strict_references)
            .into_iter()
            .map(map_finding),
    );

    let errors = issues
        .iter()
        .filter(|i| i.severity == VerifySeverity::Error)
        .count();
    let warnings = issues
        .iter()
        .filter(|i| i.severity == VerifySeverity::Warning)
        .count();
    info!(
        sections = program.sections.len(),
        errors, warnings, "verification finished"
    );

    VerifyReport {
        sections: program.sections.len(),
        strict_references,
        errors,
        warnings,
        issues,
    }
}

pub fn render_verify_text(report: &VerifyReport, verbose: bool) -> String {
    let mut out = Vec::new();
    out.push(format!("verify sections={}", report.sections));
    if verbose {
        let mode = if report.strict_references {
            "strict"
        } else {
            "lenient"
        };
        out.push(format!("Reference checks: {mode}"));
    }
    out.push(format!(
        "result errors={} warnings={}",
        report.errors, report.warnings
    ));
    out.push("issues".to_string());
    if report.issues.is_empty() {
        out.push("- none".to_string());
        return out.join("\n");
    }
    for issue in &report.issues {
        let sev = match issue.severity {
            VerifySeverity::Error => "error",
            VerifySeverity::Warning => "warning",
        };
        out.push(format!("- [{sev}] {}: {}", issue.code, issue.message));
    }
    out.join("\n")
}

fn map_finding(finding: ResolveFinding) -> VerifyIssue {
    let message = format!("section '{}': {}", finding.section, finding.message);
    match finding.severity {
        FindingSeverity::Error => err(&finding.code, message),
        FindingSeverity::Warning => warn(&finding.code, message),
    }
}

fn err(code: &str, message: impl Into<String>) -> VerifyIssue {
    VerifyIssue {
        severity: VerifySeverity::Error,
        code: code.to_string(),
        message: message.into(),
    }
}

fn warn(code: &str, message: impl Into<String>) -> VerifyIssue {
    VerifyIssue {
        severity: VerifySeverity::Warning,
        code: code.to_string(),
        message: message.into(),
    }
}
