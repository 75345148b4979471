//! RouterOS script emission.
//!
//! Sections map to a menu path (`/interface`, `/ip firewall`, ...) and every
//! command line is `<path> <verb> key=value ...`. Kinds without a dedicated
//! translator go through [`emit_generic`], which turns direct properties
//! into one command and recurses into nested sections with a longer path.

use std::fmt::{self, Display, Formatter};

use rosdsl_core::{Program, Property, Section, SectionKind, Statement};
use thiserror::Error;
use tracing::debug;

use crate::section::SpecializedSection;

pub mod declaration;

/// A value the translator has to interpret could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    #[error("invalid value '{value}' for '{property}' in section '{section}': expected {expected}")]
    InvalidValue {
        section: String,
        property: String,
        value: String,
        expected: &'static str,
    },
}

/// RouterOS command verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Add,
    Set,
    Save,
    Print,
    Remove,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Add => "add",
            Verb::Set => "set",
            Verb::Save => "save",
            Verb::Print => "print",
            Verb::Remove => "remove",
        }
    }
}

impl Display for Verb {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for [`emit_program`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitOptions {
    /// Write `# generated by rosdsl` and a `# <section>` line per root.
    pub banners: bool,
    /// Prefix for every command line.
    pub indent: String,
}

/// Lower-case a name and replace spaces with dashes.
pub fn dashed(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

/// Menu path for a section of the given kind.
pub fn path_for(kind: SectionKind, name: &str) -> String {
    match kind {
        SectionKind::Device => "/system identity".to_string(),
        SectionKind::Interfaces => "/interface".to_string(),
        SectionKind::Ip => "/ip".to_string(),
        SectionKind::Routing => "/routing".to_string(),
        SectionKind::Firewall => "/ip firewall".to_string(),
        SectionKind::System => "/system".to_string(),
        SectionKind::Custom => format!("/{}", dashed(name)),
    }
}

/// Pick the command verb for a section from its kind and name.
pub fn determine_action(kind: SectionKind, name: &str) -> Verb {
    let name = name.trim().to_lowercase();
    match kind {
        SectionKind::System => match name.as_str() {
            "identity" | "clock" | "ntp client" => Verb::Set,
            "backup" => Verb::Save,
            "scheduler" | "script" => Verb::Add,
            _ => Verb::Set,
        },
        SectionKind::Interfaces | SectionKind::Routing | SectionKind::Firewall => Verb::Add,
        SectionKind::Ip => match name.as_str() {
            "dns" | "settings" => Verb::Set,
            "address" | "route" | "pool" | "dhcp-server" | "firewall" => Verb::Add,
            _ => Verb::Set,
        },
        SectionKind::Device if name == "user" => Verb::Add,
        _ => Verb::Set,
    }
}

/// `name=value` parameter in target syntax; absent values become `""`.
pub fn property_param(prop: &Property) -> String {
    match &prop.value {
        Some(value) => format!("{}={}", prop.name, value.emit()),
        None => format!("{}=\"\"", prop.name),
    }
}

/// One command line assembled parameter by parameter.
#[derive(Debug, Clone)]
pub(crate) struct Command {
    line: String,
}

impl Command {
    pub(crate) fn new(path: &str, verb: Verb) -> Self {
        Self {
            line: format!("{path} {verb}"),
        }
    }

    /// Append a bare word such as an item name or a flag.
    pub(crate) fn word(mut self, word: &str) -> Self {
        self.line.push(' ');
        self.line.push_str(word);
        self
    }

    pub(crate) fn arg(mut self, key: &str, value: impl Display) -> Self {
        self.line.push_str(&format!(" {key}={value}"));
        self
    }

    pub(crate) fn opt(self, key: &str, value: Option<impl Display>) -> Self {
        match value {
            Some(value) => self.arg(key, value),
            None => self,
        }
    }

    pub(crate) fn finish(self, indent: &str) -> String {
        format!("{indent}{}", self.line)
    }
}

/// Generic emission for a root section of the given effective kind.
pub fn emit_generic(
    section: &Section,
    kind: SectionKind,
    indent: &str,
) -> Result<Vec<String>, EmitError> {
    let mut out = Vec::new();
    let path = path_for(kind, &section.name);
    emit_body(section, &path, kind, indent, &mut out)?;
    Ok(out)
}

/// Emit only the nested sections and declarations of a root section.
pub(crate) fn emit_nested(
    section: &Section,
    kind: SectionKind,
    indent: &str,
) -> Result<Vec<String>, EmitError> {
    let mut out = Vec::new();
    let path = path_for(kind, &section.name);
    emit_children(section, &path, kind, indent, &mut out)?;
    Ok(out)
}

pub(crate) fn emit_body(
    section: &Section,
    path: &str,
    kind: SectionKind,
    indent: &str,
    out: &mut Vec<String>,
) -> Result<(), EmitError> {
    let params: Vec<String> = section
        .properties()
        .filter(|prop| !matches!(prop.name.as_str(), "vendor" | "model"))
        .map(property_param)
        .collect();
    if !params.is_empty() {
        let verb = determine_action(kind, &section.name);
        out.push(format!("{indent}{path} {verb} {}", params.join(" ")));
    }
    emit_children(section, path, kind, indent, out)
}

fn emit_children(
    section: &Section,
    path: &str,
    kind: SectionKind,
    indent: &str,
    out: &mut Vec<String>,
) -> Result<(), EmitError> {
    let Some(block) = &section.block else {
        return Ok(());
    };
    for stmt in &block.statements {
        match stmt {
            Statement::Section(child) => {
                let child_kind = child.kind.effective(Some(kind));
                let child_path = format!("{path} {}", dashed(&child.name));
                emit_body(child, &child_path, child_kind, indent, out)?;
            }
            Statement::Declaration(decl) => {
                out.extend(declaration::emit_declaration(decl, indent)?);
            }
            Statement::Property(_) | Statement::Block(_) => {}
        }
    }
    Ok(())
}

/// Translate a whole program into script text, one command per line.
pub fn emit_program(program: &Program, options: &EmitOptions) -> Result<String, EmitError> {
    let mut out = String::new();
    if options.banners {
        out.push_str("# generated by rosdsl\n");
    }
    for section in &program.sections {
        debug!(section = %section.name, kind = %section.kind, "emitting section");
        if options.banners {
            out.push_str(&format!("# {}\n", section.name));
        }
        for line in SpecializedSection::from_section(section).translate(&options.indent)? {
            out.push_str(&line);
            out.push('\n');
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use rosdsl_core::Value;

    use super::*;

    #[test]
    fn paths_by_kind() {
        assert_eq!(path_for(SectionKind::Firewall, "firewall"), "/ip firewall");
        assert_eq!(path_for(SectionKind::Device, "device"), "/system identity");
        assert_eq!(path_for(SectionKind::Custom, "SNMP Community"), "/snmp-community");
    }

    #[test]
    fn action_inference() {
        assert_eq!(determine_action(SectionKind::System, "identity"), Verb::Set);
        assert_eq!(determine_action(SectionKind::System, "ntp client"), Verb::Set);
        assert_eq!(determine_action(SectionKind::System, "backup"), Verb::Save);
        assert_eq!(determine_action(SectionKind::System, "scheduler"), Verb::Add);
        assert_eq!(determine_action(SectionKind::Interfaces, "anything"), Verb::Add);
        assert_eq!(determine_action(SectionKind::Ip, "dns"), Verb::Set);
        assert_eq!(determine_action(SectionKind::Ip, "dhcp-server"), Verb::Add);
        assert_eq!(determine_action(SectionKind::Ip, "neighbor"), Verb::Set);
        assert_eq!(determine_action(SectionKind::Device, "user"), Verb::Add);
        assert_eq!(determine_action(SectionKind::Custom, "user"), Verb::Set);
    }

    #[test]
    fn params_quote_strings_only() {
        assert_eq!(
            property_param(&Property::new("comment", Value::string("uplink"))),
            "comment=\"uplink\""
        );
        assert_eq!(
            property_param(&Property::new("enabled", Value::boolean(true))),
            "enabled=yes"
        );
        assert_eq!(property_param(&Property::empty("comment")), "comment=\"\"");
    }

    #[test]
    fn generic_emission_recurses_with_longer_paths() {
        let section = Section::with_statements(
            "snmp",
            SectionKind::Custom,
            vec![
                Property::new("enabled", Value::boolean(true)).into(),
                Section::custom(
                    "community",
                    vec![Property::new("name", Value::string("public")).into()],
                )
                .into(),
                Section::custom("empty", Vec::new()).into(),
            ],
        );
        assert_eq!(
            emit_generic(&section, SectionKind::Custom, "").unwrap(),
            vec![
                "/snmp set enabled=yes".to_string(),
                "/snmp community set name=\"public\"".to_string(),
            ]
        );
    }

    #[test]
    fn generic_emission_skips_identity_fields() {
        let section = Section::with_statements(
            "system",
            SectionKind::System,
            vec![
                Property::new("vendor", Value::string("mikrotik")).into(),
                Property::new("model", Value::string("hEX")).into(),
            ],
        );
        assert!(emit_generic(&section, SectionKind::System, "")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn command_builder() {
        let line = Command::new("/ip route", Verb::Add)
            .arg("dst-address", "0.0.0.0/0")
            .opt("distance", None::<String>)
            .word("disabled")
            .finish("  ");
        assert_eq!(line, "  /ip route add dst-address=0.0.0.0/0 disabled");
    }
}
