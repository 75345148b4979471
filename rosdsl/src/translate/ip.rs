//! IP section translation.

use rosdsl_core::{yes_no, Section, SectionKind, Statement};
use tracing::warn;

use super::{expression_flag, text_either, texts};
use crate::emit::declaration::emit_declaration;
use crate::emit::{dashed, emit_body, Command, EmitError, Verb};
use crate::validate::is_grouping;

const RULE_FIELDS: [&str; 6] = [
    "protocol",
    "dst-port",
    "dst-address",
    "src-address",
    "out-interface",
    "in-interface",
];

pub fn translate(section: &Section, indent: &str) -> Result<Vec<String>, EmitError> {
    let mut out = Vec::new();

    let servers = texts(section, &["dns-server"]);
    let remote = section.text_any(&["allow-remote-requests"]);
    if !servers.is_empty() || remote.is_some() {
        out.push(
            Command::new("/ip dns", Verb::Set)
                .opt("servers", (!servers.is_empty()).then(|| servers.join(",")))
                .opt("allow-remote-requests", remote)
                .finish(indent),
        );
    }

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
    match sub.name.as_str() {
        "route" | "routes" => routes(sub, indent, out),
        "firewall" => firewall(sub, indent, out),
        "dhcp-server" => dhcp_servers(sub, indent, out),
        "dhcp-client" => dhcp_clients(sub, indent, out)?,
        "dns" => {
            let servers = texts(sub, &["servers", "dns-server"]);
            let remote = sub.text_any(&["allow-remote-requests"]);
            if !servers.is_empty() || remote.is_some() {
                out.push(
                    Command::new("/ip dns", Verb::Set)
                        .opt("servers", (!servers.is_empty()).then(|| servers.join(",")))
                        .opt("allow-remote-requests", remote)
                        .finish(indent),
                );
            }
        }
        "arp" => {
            for entry in sub.subsections() {
                out.push(
                    Command::new("/ip arp", Verb::Add)
                        .arg("address", sub_text(entry, "address"))
                        .arg("mac-address", sub_text(entry, "mac-address"))
                        .arg("interface", sub_text(entry, "interface"))
                        .finish(indent),
                );
            }
        }
        "address" | "service" | "neighbor" | "proxy" => {
            let path = format!("/ip {}", dashed(&sub.name));
            emit_body(sub, &path, SectionKind::Ip, indent, out)?;
        }
        name if is_grouping(name) => {
            for member in sub.subsections() {
                interface_addresses(member, indent, out);
            }
        }
        _ => interface_addresses(sub, indent, out),
    }
    Ok(())
}

/// Property text, or `""` when the property is missing.
fn sub_text(entry: &Section, param: &str) -> String {
    text_either(entry, param).unwrap_or_else(|| "\"\"".to_string())
}

fn interface_addresses(sub: &Section, indent: &str, out: &mut Vec<String>) {
    for address in texts(sub, &["address"]) {
        out.push(
            Command::new("/ip address", Verb::Add)
                .arg("address", address)
                .arg("interface", &sub.name)
                .finish(indent),
        );
    }
}

fn routes(sub: &Section, indent: &str, out: &mut Vec<String>) {
    if let Some(gateway) = sub.text_any(&["default"]) {
        out.push(
            Command::new("/ip route", Verb::Add)
                .arg("dst-address", "0.0.0.0/0")
                .arg("gateway", gateway)
                .finish(indent),
        );
    }
    for entry in sub.subsections() {
        let Some(gateway) = entry.text_any(&["gateway"]) else {
            warn!(route = %entry.name, "skipping IP route without gateway");
            continue;
        };
        out.push(
            Command::new("/ip route", Verb::Add)
                .arg("dst-address", &entry.name)
                .arg("gateway", gateway)
                .opt("distance", entry.text_any(&["distance"]))
                .finish(indent),
        );
    }
}

/// `firewall { filter|nat { <chain> { ... } } }` inside the IP section.
fn firewall(sub: &Section, indent: &str, out: &mut Vec<String>) {
    for table in sub.subsections() {
        let path = format!("/ip firewall {}", dashed(&table.name));
        for chain in table.subsections() {
            let Some(action) = chain.text_any(&["action"]) else {
                warn!(table = %table.name, chain = %chain.name, "skipping firewall rule without action");
                continue;
            };
            let mut command = Command::new(&path, Verb::Add)
                .arg("chain", &chain.name)
                .arg("action", action);
            for field in RULE_FIELDS {
                command = command.opt(field, text_either(chain, field));
            }
            out.push(command.finish(indent));
        }
    }
}

fn dhcp_servers(sub: &Section, indent: &str, out: &mut Vec<String>) {
    for server in sub.subsections() {
        let Some(interface) = server.text_any(&["interface"]) else {
            warn!(server = %server.name, "skipping DHCP server without interface");
            continue;
        };
        out.push(
            Command::new("/ip dhcp-server", Verb::Add)
                .arg("name", &server.name)
                .arg("interface", interface)
                .opt("address-pool", text_either(server, "address-pool"))
                .opt("lease-time", text_either(server, "lease-time"))
                .finish(indent),
        );
    }
}

/// `<interface> = yes|no` entries; `yes` enables the client.
fn dhcp_clients(sub: &Section, indent: &str, out: &mut Vec<String>) -> Result<(), EmitError> {
    for entry in sub.properties() {
        let enabled = expression_flag(sub, &entry.name, entry.value.as_ref())?;
        out.push(
            Command::new("/ip dhcp-client", Verb::Add)
                .arg("interface", &entry.name)
                .arg("disabled", yes_no(!enabled))
                .finish(indent),
        );
    }
    Ok(())
}
