//! Declaration emission.
//!
//! A `config <name>:` declaration has no section kind, so its menu path is
//! inferred from keywords in the name. Names are split into tokens on
//! spaces, `_` and `-` and matched word by word, so `ntp_client` selects
//! `/system ntp client` only when it also carries the `system` keyword.

use rosdsl_core::{ConfigDeclaration, Declaration, Property, SectionKind, Statement};

use super::{dashed, emit_body, property_param, EmitError, Verb};
use crate::section::SpecializedSection;

/// Lower-cased name split into keyword tokens.
struct Keywords {
    tokens: Vec<String>,
}

impl Keywords {
    fn new(name: &str) -> Self {
        let tokens = name
            .to_lowercase()
            .split([' ', '_', '-'])
            .filter(|token| !token.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        Self { tokens }
    }

    fn has(&self, keyword: &str) -> bool {
        self.tokens.iter().any(|token| token == keyword)
    }

    fn has_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|keyword| self.has(keyword))
    }
}

/// Menu path for a config declaration, or `None` for identity declarations
/// that the device section already covers.
pub fn config_path(name: &str) -> Option<String> {
    let lower = name.trim().to_lowercase();
    if lower == "device" || lower == "system identity" {
        return None;
    }
    let words = Keywords::new(&lower);

    let path = if words.has("dhcp") {
        if words.has("server") {
            "/ip dhcp-server"
        } else if words.has("network") {
            "/ip dhcp-server network"
        } else if words.has("client") {
            "/ip dhcp-client"
        } else if words.has("pool") {
            "/ip pool"
        } else {
            "/ip dhcp-server"
        }
    } else if words.has("firewall") {
        if words.has("nat") {
            "/ip firewall nat"
        } else if words.has("mangle") {
            "/ip firewall mangle"
        } else {
            "/ip firewall filter"
        }
    } else if words.has_any(&["interface", "interfaces", "iface"]) {
        if words.has("bridge") {
            if words.has_any(&["port", "ports"]) {
                "/interface bridge port"
            } else {
                "/interface bridge"
            }
        } else if words.has("vlan") {
            "/interface vlan"
        } else if words.has_any(&["wireless", "wifi"]) {
            "/interface wireless"
        } else {
            "/interface"
        }
    } else if words.has("ip") {
        if words.has("address") {
            "/ip address"
        } else if words.has("dns") {
            "/ip dns"
        } else if words.has("route") {
            "/ip route"
        } else {
            "/ip"
        }
    } else if words.has("routing") {
        if words.has("ospf") {
            "/routing ospf"
        } else if words.has("bgp") {
            "/routing bgp"
        } else {
            "/routing"
        }
    } else if words.has("system") {
        if words.has("scheduler") {
            "/system scheduler"
        } else if words.has("script") {
            "/system script"
        } else if words.has("identity") {
            "/system identity"
        } else if words.has_any(&["ntp", "time"]) {
            "/system ntp client"
        } else if words.has("clock") {
            "/system clock"
        } else if words.has("backup") {
            "/system backup"
        } else {
            "/system"
        }
    } else if words.has("user") {
        "/user"
    } else {
        return Some(format!("/{}", dashed(&lower)));
    };
    Some(path.to_string())
}

const ADD_PREFIXES: [&str; 10] = [
    "/interface",
    "/ip address",
    "/ip route",
    "/ip pool",
    "/ip dhcp-server",
    "/ip firewall",
    "/routing",
    "/system scheduler",
    "/system script",
    "/user",
];

/// Verb for a config declaration: by menu path first, then by name keyword.
pub fn config_verb(path: &str, name: &str) -> Verb {
    match path {
        "/system identity" | "/system clock" | "/system ntp client" | "/ip dns" => {
            return Verb::Set
        }
        "/system backup" => return Verb::Save,
        _ => {}
    }
    if ADD_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return Verb::Add;
    }
    let words = Keywords::new(name);
    if words.has("add") {
        Verb::Add
    } else if words.has("set") {
        Verb::Set
    } else if words.has("print") {
        Verb::Print
    } else if words.has_any(&["remove", "delete"]) {
        Verb::Remove
    } else {
        Verb::Add
    }
}

/// Emit any declaration found inside a section body.
pub fn emit_declaration(decl: &Declaration, indent: &str) -> Result<Vec<String>, EmitError> {
    match decl {
        Declaration::Config(config) => emit_config(config, indent),
        Declaration::Program(program) => {
            let mut out = Vec::new();
            for section in &program.sections {
                out.extend(SpecializedSection::from_section(section).translate(indent)?);
            }
            Ok(out)
        }
        Declaration::Interface { name, statements } => Ok(emit_legacy_interface(name, statements, indent)),
        Declaration::Property(prop) => Ok(vec![format!("{indent}# Declaration: {}", prop.name)]),
    }
}

fn emit_config(config: &ConfigDeclaration, indent: &str) -> Result<Vec<String>, EmitError> {
    let Some(path) = config_path(&config.name) else {
        return Ok(Vec::new());
    };
    let verb = config_verb(&path, &config.name);
    let mut out = Vec::new();

    if path == "/system identity" {
        let name: Vec<String> = ["vendor", "model"]
            .iter()
            .filter_map(|key| config.properties().find(|prop| prop.name == *key))
            .map(Property::plain)
            .filter(|text| !text.is_empty())
            .collect();
        if !name.is_empty() {
            out.push(format!("{indent}{path} {verb} name=\"{}\"", name.join("_")));
        }
    } else {
        let params: Vec<String> = config.properties().map(property_param).collect();
        if !params.is_empty() {
            out.push(format!("{indent}{path} {verb} {}", params.join(" ")));
        }
    }

    for stmt in &config.statements {
        match stmt {
            Statement::Section(section) => {
                let kind = section.kind.effective(None);
                let child_path = format!("{path} {}", dashed(&section.name));
                emit_body(section, &child_path, kind, indent, &mut out)?;
            }
            Statement::Declaration(nested) => out.extend(emit_declaration(nested, indent)?),
            Statement::Property(_) | Statement::Block(_) => {}
        }
    }
    Ok(out)
}

/// `interface <name>:` blocks set properties on an existing interface.
fn emit_legacy_interface(name: &str, statements: &[Statement], indent: &str) -> Vec<String> {
    let params: Vec<String> = statements
        .iter()
        .filter_map(|stmt| match stmt {
            Statement::Property(prop) => Some(property_param(prop)),
            _ => None,
        })
        .collect();
    if params.is_empty() {
        return Vec::new();
    }
    vec![format!(
        "{indent}{} {} {name} {}",
        super::path_for(SectionKind::Interfaces, name),
        Verb::Set,
        params.join(" ")
    )]
}
