//! Firewall section translation.
//!
//! Rule tables take rules as named subsections. Every rule property may be
//! spelled with `-` or `_`; the command always uses the `-` form. A rule
//! without an action produces no command, and a rule without a comment is
//! commented with its own name.

use rosdsl_core::{quote, yes_no, Section, SectionKind, Statement};
use tracing::warn;

use super::{expression_flag, text_either, texts};
use crate::emit::declaration::emit_declaration;
use crate::emit::{dashed, emit_body, Command, EmitError, Verb};
use crate::validate::firewall::CONNECTION_STATE_KEYS;

const MATCH_FIELDS: [&str; 7] = [
    "protocol",
    "src-address",
    "dst-address",
    "src-port",
    "dst-port",
    "in-interface",
    "out-interface",
];

const MANGLE_FIELDS: [&str; 4] = [
    "new-connection-mark",
    "new-packet-mark",
    "new-routing-mark",
    "passthrough",
];

/// Rule tables and the chain used when a rule names none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleTable {
    Filter,
    Nat,
    Raw,
    Mangle,
}

impl RuleTable {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "filter" => Some(RuleTable::Filter),
            "nat" => Some(RuleTable::Nat),
            "raw" => Some(RuleTable::Raw),
            "mangle" => Some(RuleTable::Mangle),
            _ => None,
        }
    }

    fn path(self) -> &'static str {
        match self {
            RuleTable::Filter => "/ip firewall filter",
            RuleTable::Nat => "/ip firewall nat",
            RuleTable::Raw => "/ip firewall raw",
            RuleTable::Mangle => "/ip firewall mangle",
        }
    }

    fn default_chain(self) -> &'static str {
        match self {
            RuleTable::Filter => "forward",
            RuleTable::Nat => "srcnat",
            RuleTable::Raw | RuleTable::Mangle => "prerouting",
        }
    }
}

pub fn translate(section: &Section, indent: &str) -> Result<Vec<String>, EmitError> {
    let mut out = Vec::new();
    let Some(block) = &section.block else {
        return Ok(out);
    };
    for stmt in &block.statements {
        match stmt {
            Statement::Section(sub) => translate_subsection(sub, indent, &mut out)?,
            Statement::Declaration(decl) => out.extend(emit_declaration(decl, indent)?),
            Statement::Property(_) | Statement::Block(_) => {}
        }
    }
    Ok(out)
}

fn translate_subsection(sub: &Section, indent: &str, out: &mut Vec<String>) -> Result<(), EmitError> {
    if let Some(table) = RuleTable::from_name(&sub.name) {
        for rule in sub.subsections() {
            if let Some(line) = rule_command(table, rule) {
                out.push(line.finish(indent));
            }
        }
        return Ok(());
    }
    match sub.name.as_str() {
        "address-list" => address_lists(sub, indent, out),
        "service-port" => service_ports(sub, indent, out)?,
        "layer7-protocol" => layer7_protocols(sub, indent, out),
        _ => {
            let path = format!("/ip firewall {}", dashed(&sub.name));
            emit_body(sub, &path, SectionKind::Firewall, indent, out)?;
        }
    }
    Ok(())
}

fn rule_command(table: RuleTable, rule: &Section) -> Option<Command> {
    let Some(action) = rule.text_any(&["action"]) else {
        warn!(rule = %rule.name, table = table.path(), "skipping firewall rule without action");
        return None;
    };
    let chain = rule
        .text_any(&["chain"])
        .unwrap_or_else(|| table.default_chain().to_string());

    let mut command = Command::new(table.path(), Verb::Add)
        .arg("chain", chain)
        .arg("action", &action);

    if matches!(table, RuleTable::Filter | RuleTable::Raw) {
        let states = texts(rule, &CONNECTION_STATE_KEYS);
        if !states.is_empty() {
            command = command.arg("connection-state", states.join(","));
        }
    }
    for field in MATCH_FIELDS {
        command = command.opt(field, text_either(rule, field));
    }
    match table {
        RuleTable::Nat => {
            if action != "masquerade" {
                command = command.opt("to-addresses", text_either(rule, "to-addresses"));
            }
            command = command.opt("to-ports", text_either(rule, "to-ports"));
        }
        RuleTable::Mangle => {
            for field in MANGLE_FIELDS {
                command = command.opt(field, text_either(rule, field));
            }
        }
        RuleTable::Filter | RuleTable::Raw => {}
    }

    let comment = rule
        .text_any(&["comment"])
        .unwrap_or_else(|| rule.name.clone());
    Some(command.arg("comment", quote(&comment)))
}

/// `address-list { <list> { <address> = "comment" } }`
fn address_lists(sub: &Section, indent: &str, out: &mut Vec<String>) {
    for list in sub.subsections() {
        for entry in list.properties() {
            let comment = entry.plain();
            out.push(
                Command::new("/ip firewall address-list", Verb::Add)
                    .arg("list", &list.name)
                    .arg("address", &entry.name)
                    .opt("comment", (!comment.is_empty()).then(|| quote(&comment)))
                    .finish(indent),
            );
        }
    }
}

/// `service-port { <service> = yes|no }`; `no` disables the helper.
fn service_ports(sub: &Section, indent: &str, out: &mut Vec<String>) -> Result<(), EmitError> {
    for entry in sub.properties() {
        let enabled = expression_flag(sub, &entry.name, entry.value.as_ref())?;
        out.push(
            Command::new("/ip firewall service-port", Verb::Set)
                .word(&entry.name)
                .arg("disabled", yes_no(!enabled))
                .finish(indent),
        );
    }
    Ok(())
}

fn layer7_protocols(sub: &Section, indent: &str, out: &mut Vec<String>) {
    for protocol in sub.subsections() {
        let Some(regexp) = protocol.text_any(&["regexp"]) else {
            warn!(protocol = %protocol.name, "skipping layer7 protocol without regexp");
            continue;
        };
        out.push(
            Command::new("/ip firewall layer7-protocol", Verb::Add)
                .arg("name", &protocol.name)
                .arg("regexp", quote(&regexp))
                .finish(indent),
        );
    }
}
