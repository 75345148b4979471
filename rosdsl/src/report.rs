use colored::Colorize;

use crate::verify::{render_verify_text, VerifyReport};

/// Render a verify report for terminal output.
pub fn render_verify(report: &VerifyReport, verbose: bool) -> String {
    let raw = render_verify_text(report, verbose);
    let mut out = Vec::new();

    for line in raw.lines() {
        let colored = if line.starts_with("- [error]") {
            line.red().to_string()
        } else if line.starts_with("- [warning]") {
            line.yellow().to_string()
        } else if line.starts_with("result ") {
            line.cyan().to_string()
        } else {
            line.to_string()
        };
        out.push(colored);
    }

    out.join("\n")
}

/// Error listing printed when compilation stops at validation.
pub fn render_validation_failure(report: &VerifyReport) -> String {
    let mut out = vec!["Semantic validation failed with the following errors:".to_string()];
    for message in report.error_messages() {
        out.push(format!("- {message}").red().to_string());
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use rosdsl_core::parse;

    use super::*;
    use crate::verify::build_verify_report;

    #[test]
    fn failure_lists_every_error() {
        colored::control::set_override(false);
        let program = parse(
            "device:\n    vendor = \"mikrotik\"\nfirewall:\n    filter:\n        r:\n            action = \"accept\"\n",
        )
        .unwrap();
        let report = build_verify_report(&program, false);
        assert_eq!(
            render_validation_failure(&report),
            "Semantic validation failed with the following errors:\n\
             - Error in section 'device': Device section is missing required 'model' property\n\
             - Error in section 'firewall': Filter rule 'r' is missing required 'chain' property"
        );
    }

    #[test]
    fn plain_lines_survive_coloring() {
        colored::control::set_override(false);
        let program = parse("snmp:\n    enabled = true\n").unwrap();
        let report = build_verify_report(&program, false);
        assert_eq!(render_verify(&report, false), render_verify_text(&report, false));
    }
}
