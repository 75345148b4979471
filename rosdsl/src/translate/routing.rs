//! Routing section translation.
//!
//! Static routes are written under `/ip route`; tables, policy rules and
//! route filters under `/routing`.

use rosdsl_core::{quote, Section, Statement};
use tracing::warn;

use super::{flag, text_either};
use crate::emit::declaration::emit_declaration;
use crate::emit::{Command, EmitError, Verb};
use crate::validate::routing::{RoutingGroup, DESTINATION_KEYS, GATEWAY_KEYS};

const RULE_FIELDS: [&str; 5] = ["src-address", "dst-address", "interface", "action", "table"];

pub fn translate(section: &Section, indent: &str) -> Result<Vec<String>, EmitError> {
    let mut out = Vec::new();
    let Some(block) = &section.block else {
        return Ok(out);
    };
    for stmt in &block.statements {
        match stmt {
            Statement::Property(prop) if prop.name == "static_route_default_gw" => {
                out.push(
                    Command::new("/ip route", Verb::Add)
                        .arg("dst-address", "0.0.0.0/0")
                        .arg("gateway", prop.plain())
                        .finish(indent),
                );
            }
            Statement::Section(sub) => match RoutingGroup::from_name(&sub.name) {
                Some(RoutingGroup::Table) => tables(sub, indent, &mut out)?,
                Some(RoutingGroup::Rule) => rules(sub, indent, &mut out),
                Some(RoutingGroup::Filter) => filters(sub, indent, &mut out),
                None => route(sub, indent, &mut out)?,
            },
            Statement::Declaration(decl) => out.extend(emit_declaration(decl, indent)?),
            Statement::Property(_) | Statement::Block(_) => {}
        }
    }
    Ok(out)
}

fn route(entry: &Section, indent: &str, out: &mut Vec<String>) -> Result<(), EmitError> {
    let (Some(destination), Some(gateway)) = (
        entry.text_any(&DESTINATION_KEYS),
        entry.text_any(&GATEWAY_KEYS),
    ) else {
        warn!(route = %entry.name, "skipping route without destination or gateway");
        return Ok(());
    };
    let suppress = flag(entry, &["suppress-hw-offload"])?.unwrap_or(false);
    let mut command = Command::new("/ip route", Verb::Add)
        .arg("dst-address", destination)
        .arg("gateway", gateway)
        .opt("distance", entry.text_any(&["distance"]))
        .opt("routing-table", entry.text_any(&["routing-table", "table"]))
        .opt("check-gateway", entry.text_any(&["check-gateway"]))
        .opt("scope", entry.text_any(&["scope"]))
        .opt("target-scope", entry.text_any(&["target-scope"]));
    if suppress {
        command = command.arg("suppress-hw-offload", "yes");
    }
    out.push(command.finish(indent));
    Ok(())
}

/// Tables are FIB tables unless `fib` is explicitly off.
fn tables(group: &Section, indent: &str, out: &mut Vec<String>) -> Result<(), EmitError> {
    for table in group.subsections() {
        let mut command = Command::new("/routing table", Verb::Add).arg("name", &table.name);
        if flag(table, &["fib"])?.unwrap_or(true) {
            command = command.word("fib");
        }
        out.push(command.finish(indent));
    }
    Ok(())
}

fn rules(group: &Section, indent: &str, out: &mut Vec<String>) {
    for rule in group.subsections() {
        let mut command = Command::new("/routing rule", Verb::Add);
        for field in RULE_FIELDS {
            command = command.opt(field, text_either(rule, field));
        }
        out.push(command.finish(indent));
    }
}

fn filters(group: &Section, indent: &str, out: &mut Vec<String>) {
    for chain in group.subsections() {
        let Some(rule) = chain.text_any(&["rule"]) else {
            warn!(chain = %chain.name, "skipping routing filter without rule");
            continue;
        };
        out.push(
            Command::new("/routing/filter/rule", Verb::Add)
                .arg("chain", &chain.name)
                .arg("rule", quote(&rule))
                .finish(indent),
        );
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rosdsl_core::{Property, SectionKind, Value};

    use super::*;

    fn routing(statements: Vec<Statement>) -> Section {
        Section::with_statements("routing", SectionKind::Routing, statements)
    }

    fn prop(name: &str, value: Value) -> Statement {
        Property::new(name, value).into()
    }

    #[test]
    fn default_gateway_and_routes() {
        let tree = routing(vec![
            prop("static_route_default_gw", Value::ip_address("203.0.113.1")),
            Section::custom(
                "backup-link",
                vec![
                    prop("dst-address", Value::ip_cidr("172.16.0.0/12")),
                    prop("gateway", Value::ip_address("10.0.0.3")),
                    prop("distance", Value::number(20)),
                    prop("check-gateway", Value::string("ping")),
                    prop("suppress-hw-offload", Value::boolean(true)),
                ],
            )
            .into(),
        ]);
        assert_eq!(
            translate(&tree, "").unwrap(),
            vec![
                "/ip route add dst-address=0.0.0.0/0 gateway=203.0.113.1".to_string(),
                "/ip route add dst-address=172.16.0.0/12 gateway=10.0.0.3 distance=20 check-gateway=ping suppress-hw-offload=yes".to_string(),
            ]
        );
    }

    #[test]
    fn tables_default_to_fib() {
        let tree = routing(vec![Section::custom(
            "table",
            vec![
                Section::custom("vpn", Vec::new()).into(),
                Section::custom("lab", vec![prop("fib", Value::boolean(false))]).into(),
            ],
        )
        .into()]);
        assert_eq!(
            translate(&tree, "").unwrap(),
            vec![
                "/routing table add name=vpn fib".to_string(),
                "/routing table add name=lab".to_string(),
            ]
        );
    }

    #[test]
    fn invalid_fib_is_an_error() {
        let tree = routing(vec![Section::custom(
            "tables",
            vec![Section::custom("vpn", vec![prop("fib", Value::string("sure"))]).into()],
        )
        .into()]);
        assert!(matches!(
            translate(&tree, ""),
            Err(EmitError::InvalidValue { ref property, .. }) if property == "fib"
        ));
    }

    #[test]
    fn rules_and_filters() {
        let tree = routing(vec![
            Section::custom(
                "rule",
                vec![Section::custom(
                    "guest-to-vpn",
                    vec![
                        prop("src-address", Value::ip_cidr("192.168.20.0/24")),
                        prop("action", Value::string("lookup")),
                        prop("table", Value::string("vpn")),
                    ],
                )
                .into()],
            )
            .into(),
            Section::custom(
                "filter",
                vec![Section::custom(
                    "bgp-in",
                    vec![prop("rule", Value::string("if (dst-len > 24) { reject }"))],
                )
                .into()],
            )
            .into(),
        ]);
        assert_eq!(
            translate(&tree, "").unwrap(),
            vec![
                "/routing rule add src-address=192.168.20.0/24 action=lookup table=vpn".to_string(),
                "/routing/filter/rule add chain=bgp-in rule=\"if (dst-len > 24) { reject }\""
                    .to_string(),
            ]
        );
    }

    #[test]
    fn incomplete_route_is_skipped() {
        let tree = routing(vec![Section::custom(
            "half",
            vec![prop("dst", Value::ip_cidr("10.0.0.0/8"))],
        )
        .into()]);
        assert!(translate(&tree, "").unwrap().is_empty());
    }
}
