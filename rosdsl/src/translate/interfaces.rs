//! Interface definitions to `/interface` commands.
//!
//! One interface per subsection. After the interface command come its
//! bridge ports, interface-list memberships and the addresses from a nested
//! `ip` section, in that order.

use rosdsl_core::{quote, yes_no, Section, Statement};

use super::{flag, text_either, texts};
use crate::emit::declaration::emit_declaration;
use crate::emit::{Command, EmitError, Verb};
use crate::validate::interfaces::InterfaceKind;
use crate::validate::is_grouping;

pub fn translate(section: &Section, indent: &str) -> Result<Vec<String>, EmitError> {
    let mut out = Vec::new();
    let Some(block) = &section.block else {
        return Ok(out);
    };
    for stmt in &block.statements {
        match stmt {
            Statement::Section(member) if is_grouping(&member.name) => {
                for inner in member.subsections() {
                    out.extend(translate_interface(inner, indent)?);
                }
            }
            Statement::Section(member) => out.extend(translate_interface(member, indent)?),
            Statement::Declaration(decl) => out.extend(emit_declaration(decl, indent)?),
            Statement::Property(_) | Statement::Block(_) => {}
        }
    }
    Ok(out)
}

/// Settings shared by every interface kind.
struct Common {
    disabled: Option<&'static str>,
    mtu: Option<String>,
    comment: Option<String>,
}

impl Common {
    fn read(iface: &Section) -> Result<Self, EmitError> {
        let disabled = match flag(iface, &["disabled"])? {
            Some(value) => Some(value),
            None => match iface.text_any(&["admin_state"]).as_deref() {
                Some("enabled") => Some(false),
                Some("disabled") => Some(true),
                _ => None,
            },
        };
        Ok(Self {
            disabled: disabled.map(yes_no),
            mtu: iface.text_any(&["mtu"]),
            comment: iface
                .text_any(&["comment", "description"])
                .map(|text| quote(&text)),
        })
    }
}

fn translate_interface(iface: &Section, indent: &str) -> Result<Vec<String>, EmitError> {
    let name = iface.name.as_str();
    let common = Common::read(iface)?;

    let mut out = vec![match InterfaceKind::of(iface) {
        InterfaceKind::Ethernet => Command::new("/interface ethernet", Verb::Set)
            .word(name)
            .opt("mtu", common.mtu)
            .opt("disabled", common.disabled)
            .opt("mac-address", iface.text_any(&["mac_address", "mac"]))
            .opt("comment", common.comment)
            .opt("advertise", iface.text_any(&["advertise"]))
            .opt("arp", iface.text_any(&["arp"]))
            .opt("auto-negotiation", iface.text_any(&["auto-negotiation"]))
            .opt("speed", iface.text_any(&["speed"]))
            .opt("full-duplex", full_duplex(iface)?),
        InterfaceKind::Vlan => Command::new("/interface vlan", Verb::Add)
            .arg("name", name)
            .opt("vlan-id", text_either(iface, "vlan-id"))
            .opt("interface", iface.text_any(&["interface"]))
            .opt("disabled", common.disabled)
            .opt("mtu", common.mtu)
            .opt("comment", common.comment),
        InterfaceKind::Bridge => Command::new("/interface bridge", Verb::Add)
            .arg("name", name)
            .opt("disabled", common.disabled)
            .opt("mtu", common.mtu)
            .opt("comment", common.comment)
            .opt("protocol-mode", iface.text_any(&["protocol-mode"]))
            .opt("fast-forward", iface.text_any(&["fast-forward"])),
        InterfaceKind::Loopback => Command::new("/interface", Verb::Add)
            .arg("name", name)
            .arg("type", "loopback")
            .opt("disabled", common.disabled)
            .opt("comment", common.comment),
        InterfaceKind::Bonding => {
            let slaves = texts(iface, &["slaves"]);
            Command::new("/interface bonding", Verb::Add)
                .arg("name", name)
                .opt("disabled", common.disabled)
                .opt("mtu", common.mtu)
                .opt("comment", common.comment)
                .opt("mode", iface.text_any(&["mode"]))
                .opt("slaves", (!slaves.is_empty()).then(|| slaves.join(",")))
        }
        InterfaceKind::Other(_) | InterfaceKind::Unspecified => {
            Command::new("/interface", Verb::Set)
                .word(name)
                .opt("disabled", common.disabled)
                .opt("mtu", common.mtu)
                .opt("comment", common.comment)
        }
    }
    .finish(indent)];

    if InterfaceKind::of(iface) == InterfaceKind::Bridge {
        for port in texts(iface, &["ports"]) {
            out.push(
                Command::new("/interface bridge port", Verb::Add)
                    .arg("bridge", name)
                    .arg("interface", port)
                    .finish(indent),
            );
        }
    }

    for list in texts(iface, &["lists"]) {
        out.push(
            Command::new("/interface list member", Verb::Add)
                .arg("list", list)
                .arg("interface", name)
                .finish(indent),
        );
    }

    if let Some(ip) = iface.subsection("ip") {
        for address in texts(ip, &["address"]) {
            out.push(
                Command::new("/ip address", Verb::Add)
                    .arg("address", address)
                    .arg("interface", name)
                    .finish(indent),
            );
        }
    }
    Ok(out)
}

/// `duplex = "full"|"half"` or a yes/no flag.
fn full_duplex(iface: &Section) -> Result<Option<&'static str>, EmitError> {
    match iface.text_any(&["duplex"]).as_deref() {
        None => Ok(None),
        Some("full") => Ok(Some("yes")),
        Some("half") => Ok(Some("no")),
        Some(_) => Ok(flag(iface, &["duplex"])?.map(yes_no)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rosdsl_core::{Property, SectionKind, Value};

    use super::*;

    fn interfaces(members: Vec<Section>) -> Section {
        Section::with_statements(
            "interfaces",
            SectionKind::Interfaces,
            members.into_iter().map(Statement::from).collect(),
        )
    }

    fn prop(name: &str, value: Value) -> Statement {
        Property::new(name, value).into()
    }

    #[test]
    fn ether_prefix_becomes_ethernet_set() {
        let tree = interfaces(vec![Section::custom("ether1", Vec::new())]);
        assert_eq!(
            translate(&tree, "").unwrap(),
            vec!["/interface ethernet set ether1".to_string()]
        );
    }

    #[test]
    fn ethernet_with_address_and_lists() {
        let tree = interfaces(vec![Section::custom(
            "ether1",
            vec![
                prop("description", Value::string("WAN uplink")),
                prop("admin_state", Value::string("enabled")),
                prop("lists", Value::list(vec![Value::string("WAN")])),
                Section::custom("ip", vec![prop("address", Value::ip_cidr("10.0.0.1/24"))]).into(),
            ],
        )]);
        assert_eq!(
            translate(&tree, "").unwrap(),
            vec![
                "/interface ethernet set ether1 disabled=no comment=\"WAN uplink\"".to_string(),
                "/interface list member add list=WAN interface=ether1".to_string(),
                "/ip address add address=10.0.0.1/24 interface=ether1".to_string(),
            ]
        );
    }

    #[test]
    fn bridge_with_ports() {
        let tree = interfaces(vec![Section::custom(
            "bridge-lan",
            vec![
                prop("protocol-mode", Value::string("rstp")),
                prop(
                    "ports",
                    Value::list(vec![Value::string("ether2"), Value::string("ether3")]),
                ),
            ],
        )]);
        assert_eq!(
            translate(&tree, "").unwrap(),
            vec![
                "/interface bridge add name=bridge-lan protocol-mode=rstp".to_string(),
                "/interface bridge port add bridge=bridge-lan interface=ether2".to_string(),
                "/interface bridge port add bridge=bridge-lan interface=ether3".to_string(),
            ]
        );
    }

    #[test]
    fn vlan_bonding_loopback_and_other() {
        let tree = interfaces(vec![
            Section::custom(
                "guest",
                vec![
                    prop("type", Value::string("vlan")),
                    prop("vlan_id", Value::number(20)),
                    prop("interface", Value::string("bridge-lan")),
                ],
            ),
            Section::custom(
                "bond1",
                vec![
                    prop("mode", Value::string("802.3ad")),
                    prop(
                        "slaves",
                        Value::list(vec![Value::string("ether4"), Value::string("ether5")]),
                    ),
                    prop("disabled", Value::boolean(true)),
                ],
            ),
            Section::custom("lo0", vec![prop("type", Value::string("loopback"))]),
            Section::custom("wlan1", vec![prop("mtu", Value::number(1400))]),
        ]);
        assert_eq!(
            translate(&tree, "").unwrap(),
            vec![
                "/interface vlan add name=guest vlan-id=20 interface=bridge-lan".to_string(),
                "/interface bonding add name=bond1 disabled=yes mode=802.3ad slaves=ether4,ether5"
                    .to_string(),
                "/interface add name=lo0 type=loopback".to_string(),
                "/interface set wlan1 mtu=1400".to_string(),
            ]
        );
    }

    #[test]
    fn template_members_are_translated() {
        let tree = interfaces(vec![Section::custom(
            "template",
            vec![Section::custom("ether7", vec![prop("mtu", Value::number(9000))]).into()],
        )]);
        assert_eq!(
            translate(&tree, "").unwrap(),
            vec!["/interface ethernet set ether7 mtu=9000".to_string()]
        );
    }

    #[test]
    fn non_boolean_disabled_is_an_error() {
        let tree = interfaces(vec![Section::custom(
            "ether1",
            vec![prop("disabled", Value::string("sometimes"))],
        )]);
        assert!(matches!(
            translate(&tree, ""),
            Err(EmitError::InvalidValue { .. })
        ));
    }
}
