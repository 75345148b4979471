//! Name binding and cross-reference checks.
//!
//! Root section names are bound in the global scope of a [`SymbolTable`];
//! interfaces declared under `interfaces` are bound in a nested scope.
//!
//! ## Checks Performed
//!
//! 1. **Duplicate sections**: the same root name defined twice
//! 2. **Duplicate interfaces**: the same interface declared twice
//! 3. **Firewall rule references**: `in-interface`/`out-interface` name a
//!    declared interface
//! 4. **DHCP references**: DHCP server `interface` and DHCP client entries
//!    name a declared interface
//!
//! Reference checks only run when the program declares at least one
//! interface; physical ports need no declaration.

use rosdsl_core::{Datatype, Program, Section, SectionKind, Symbol, SymbolTable};

use crate::validate::firewall::{IN_INTERFACE_KEYS, OUT_INTERFACE_KEYS};
use crate::validate::is_grouping;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveFinding {
    pub severity: FindingSeverity,
    pub code: String,
    /// Root section the finding belongs to.
    pub section: String,
    pub message: String,
}

/// Bound names of a program.
#[derive(Debug)]
pub struct Bindings {
    pub symbols: SymbolTable,
    pub findings: Vec<ResolveFinding>,
}

/// Bind root sections and declared interfaces.
///
/// The returned table has the interface scope open on top of the global
/// section scope.
pub fn bind_program(program: &Program) -> Bindings {
    let mut symbols = SymbolTable::new();
    let mut findings = Vec::new();

    for section in &program.sections {
        if !symbols.bind(&section.name, Symbol::new(&section.name, Datatype::Section)) {
            findings.push(finding(
                FindingSeverity::Warning,
                "duplicate_section",
                &section.name,
                format!("section '{}' is defined more than once", section.name),
            ));
        }
    }

    symbols.enter_scope();
    for root in program
        .sections
        .iter()
        .filter(|section| section.kind == SectionKind::Interfaces)
    {
        for iface in interface_definitions(root) {
            if !symbols.bind(&iface.name, Symbol::new(&iface.name, Datatype::Interface)) {
                findings.push(finding(
                    FindingSeverity::Warning,
                    "duplicate_interface",
                    &root.name,
                    format!("interface '{}' is declared more than once", iface.name),
                ));
            }
        }
    }

    Bindings { symbols, findings }
}

fn interface_definitions(root: &Section) -> Vec<&Section> {
    let mut out = Vec::new();
    for member in root.subsections() {
        if is_grouping(&member.name) {
            out.extend(member.subsections());
        } else {
            out.push(member);
        }
    }
    out
}

/// Run binding and every reference check.
///
/// Unresolved references are errors when `strict` is set, warnings
/// otherwise.
pub fn reference_findings(program: &Program, strict: bool) -> Vec<ResolveFinding> {
    let Bindings {
        symbols,
        mut findings,
    } = bind_program(program);
    if !has_interfaces(program) {
        return findings;
    }

    let severity = if strict {
        FindingSeverity::Error
    } else {
        FindingSeverity::Warning
    };
    let mut check = |root: &Section, what: String, name: String| {
        let known = symbols
            .lookup(&name)
            .is_some_and(|symbol| symbol.datatype == Datatype::Interface);
        if !known {
            findings.push(finding(
                severity,
                "undefined_interface",
                &root.name,
                format!("{what} references undefined interface '{name}'"),
            ));
        }
    };

    for root in &program.sections {
        match root.kind {
            SectionKind::Firewall => {
                for table in root.subsections() {
                    for rule in table.subsections() {
                        for (name, role) in rule_interfaces(rule) {
                            check(root, format!("firewall rule '{}' {role}", rule.name), name);
                        }
                    }
                }
            }
            SectionKind::Ip => {
                for sub in root.subsections() {
                    match sub.name.as_str() {
                        "dhcp-server" => {
                            for server in sub.subsections() {
                                if let Some(name) = server.text_any(&["interface"]) {
                                    check(root, format!("DHCP server '{}'", server.name), name);
                                }
                            }
                        }
                        "dhcp-client" => {
                            for entry in sub.properties() {
                                check(root, "DHCP client".to_string(), entry.name.clone());
                            }
                        }
                        "firewall" => {
                            for table in sub.subsections() {
                                for chain in table.subsections() {
                                    for (name, role) in rule_interfaces(chain) {
                                        check(
                                            root,
                                            format!("firewall chain '{}' {role}", chain.name),
                                            name,
                                        );
                                    }
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
    findings
}

fn has_interfaces(program: &Program) -> bool {
    program
        .sections
        .iter()
        .any(|section| section.kind == SectionKind::Interfaces && section.has_subsections())
}

fn rule_interfaces(rule: &Section) -> Vec<(String, &'static str)> {
    let mut out = Vec::new();
    if let Some(name) = rule.text_any(&IN_INTERFACE_KEYS) {
        out.push((name, "in-interface"));
    }
    if let Some(name) = rule.text_any(&OUT_INTERFACE_KEYS) {
        out.push((name, "out-interface"));
    }
    out
}

fn finding(
    severity: FindingSeverity,
    code: &str,
    section: &str,
    message: String,
) -> ResolveFinding {
    ResolveFinding {
        severity,
        code: code.to_string(),
        section: section.to_string(),
        message,
    }
}
