//! Inspection formatters for parsed programs.

use crate::ast::{Program, Section, SectionKind};

/// Format a program as pretty JSON.
pub fn format_json(program: &Program) -> String {
    serde_json::to_string_pretty(program).unwrap_or_else(|_| "{}".to_string())
}

/// Render the section outline down to `max_depth` nesting levels.
///
/// Each line shows the section name, its effective kind and how many
/// properties it holds directly.
pub fn format_tree(program: &Program, max_depth: usize) -> String {
    let mut out = String::new();
    for section in &program.sections {
        render_section(section, None, 0, max_depth, &mut out);
    }
    out
}

fn render_section(
    section: &Section,
    parent_kind: Option<SectionKind>,
    depth: usize,
    max_depth: usize,
    out: &mut String,
) {
    let kind = section.kind.effective(parent_kind);
    let props = section.properties().count();
    out.push_str(&format!(
        "{}{} [{}] props={}\n",
        "  ".repeat(depth),
        section.name,
        kind,
        props
    ));

    if depth >= max_depth {
        return;
    }
    for child in section.subsections() {
        render_section(child, Some(kind), depth + 1, max_depth, out);
    }
}
