//! Interface definition validation.
//!
//! Every subsection of `interfaces` defines one interface. Its kind comes
//! from the `type` property or, when absent, from the name prefix. The kind
//! is settled before any property is checked so property order never
//! matters.
//!
//! ## Checks Performed
//!
//! 1. **Allowed properties**: common set plus the kind-specific extras
//! 2. **Required properties**: vlan needs `vlan_id` and `interface`,
//!    bonding needs `mode` and `slaves`
//! 3. **Addresses**: a nested `ip` section may only set `address`, which
//!    must be IPv4 with an optional prefix
//! 4. **Nesting**: only `template`/`group` containers and the `ip` child

use rosdsl_core::Section;

use super::{fail, is_grouping, text_of, NestingPolicy, SectionValidator, ValidationError};
use crate::address::is_ipv4_address;

const COMMON_PROPERTIES: [&str; 10] = [
    "type",
    "mtu",
    "disabled",
    "admin_state",
    "mac_address",
    "mac",
    "comment",
    "description",
    "lists",
    "arp",
];

const VLAN_PROPERTIES: [&str; 2] = ["vlan_id", "interface"];
const BONDING_PROPERTIES: [&str; 2] = ["mode", "slaves"];
const BRIDGE_PROPERTIES: [&str; 3] = ["protocol-mode", "fast-forward", "ports"];
const ETHERNET_PROPERTIES: [&str; 4] = ["advertise", "auto-negotiation", "speed", "duplex"];

/// Interface kind, from the `type` property or the name prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceKind {
    Ethernet,
    Vlan,
    Bridge,
    Bonding,
    Loopback,
    /// An explicit type that has no dedicated handling.
    Other(String),
    /// No `type` property and no recognised prefix.
    Unspecified,
}

impl InterfaceKind {
    /// Determine the kind of an interface definition.
    pub fn of(section: &Section) -> Self {
        match text_of(section, &["type"]) {
            Some(declared) if !declared.trim().is_empty() => Self::from_type(&declared),
            _ => Self::from_name(&section.name),
        }
    }

    fn from_type(declared: &str) -> Self {
        match declared.trim().to_ascii_lowercase().as_str() {
            "ethernet" | "ether" => InterfaceKind::Ethernet,
            "vlan" => InterfaceKind::Vlan,
            "bridge" => InterfaceKind::Bridge,
            "bonding" | "bond" => InterfaceKind::Bonding,
            "loopback" | "loop" => InterfaceKind::Loopback,
            other => InterfaceKind::Other(other.to_string()),
        }
    }

    fn from_name(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if name.starts_with("ether") {
            InterfaceKind::Ethernet
        } else if name.starts_with("bridge") {
            InterfaceKind::Bridge
        } else if name.starts_with("vlan") {
            InterfaceKind::Vlan
        } else if name.starts_with("bond") {
            InterfaceKind::Bonding
        } else if name.starts_with("loop") {
            InterfaceKind::Loopback
        } else {
            InterfaceKind::Unspecified
        }
    }

    fn extra_properties(&self) -> &'static [&'static str] {
        match self {
            InterfaceKind::Vlan => &VLAN_PROPERTIES,
            InterfaceKind::Bonding => &BONDING_PROPERTIES,
            InterfaceKind::Bridge => &BRIDGE_PROPERTIES,
            InterfaceKind::Ethernet | InterfaceKind::Unspecified => &ETHERNET_PROPERTIES,
            InterfaceKind::Loopback | InterfaceKind::Other(_) => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InterfacesValidator;

impl SectionValidator for InterfacesValidator {
    fn label(&self) -> &str {
        "Interfaces"
    }

    fn nesting_policy(&self) -> NestingPolicy {
        NestingPolicy::ConditionalNesting
    }

    /// Groups hold interfaces, and an interface may hold one `ip` block.
    fn is_valid_nesting(&self, parent: &str, child: &str, depth: usize) -> bool {
        match depth {
            1 => is_grouping(parent) || child == "ip",
            2 => child == "ip" && parent != "ip",
            _ => false,
        }
    }

    fn validate_direct_properties(&self, section: &Section) -> Result<(), ValidationError> {
        match section.properties().next() {
            Some(prop) => fail(invalid_property(&prop.name)),
            None => Ok(()),
        }
    }

    fn validate_properties(&self, section: &Section) -> Result<(), ValidationError> {
        if is_grouping(&section.name) {
            for member in section.subsections() {
                validate_interface(member)?;
            }
            return Ok(());
        }
        validate_interface(section)
    }
}

fn validate_interface(section: &Section) -> Result<(), ValidationError> {
    let kind = InterfaceKind::of(section);
    let extras = kind.extra_properties();

    for prop in section.properties() {
        let name = prop.name.as_str();
        if !COMMON_PROPERTIES.contains(&name) && !extras.contains(&name) {
            return fail(invalid_property(name));
        }
    }

    let required: &[&str] = match kind {
        InterfaceKind::Vlan => &VLAN_PROPERTIES,
        InterfaceKind::Bonding => &BONDING_PROPERTIES,
        _ => &[],
    };
    let kind_label = match kind {
        InterfaceKind::Vlan => "VLAN",
        _ => "Bonding",
    };
    for name in required {
        if section.property(name).is_none() {
            return fail(format!(
                "{kind_label} interface is missing required '{name}' property"
            ));
        }
    }

    if let Some(ip) = section.subsection("ip") {
        validate_interface_address(&section.name, ip)?;
    }
    Ok(())
}

/// Check an address-only section that belongs to interface `owner`.
pub(crate) fn validate_interface_address(
    owner: &str,
    section: &Section,
) -> Result<(), ValidationError> {
    for prop in section.properties() {
        if prop.name != "address" {
            return fail(format!(
                "Invalid property '{}' in IP interface section '{}'. Only 'address' is allowed.",
                prop.name, owner
            ));
        }
        let Some(value) = &prop.value else {
            return fail(format!(
                "IP interface section '{owner}' is missing required 'address' property"
            ));
        };
        let addresses: Vec<String> = match value.as_value() {
            Some(value) => value.elements().into_iter().map(|v| v.plain()).collect(),
            None => vec![value.plain()],
        };
        for address in addresses {
            if !is_ipv4_address(&address) {
                return fail(format!(
                    "Invalid IP address format in interface '{owner}': {address}"
                ));
            }
        }
    }
    if section.property("address").is_none() {
        return fail(format!(
            "IP interface section '{owner}' is missing required 'address' property"
        ));
    }
    Ok(())
}

fn invalid_property(name: &str) -> String {
    format!(
        "Interface section contains invalid property '{name}'. This property is not valid for interface configuration."
    )
}

#[cfg(test)]
mod tests {
    use rosdsl_core::{Property, SectionKind, Statement, Value};

    use super::*;

    fn interfaces(children: Vec<Section>) -> Section {
        Section::with_statements(
            "interfaces",
            SectionKind::Interfaces,
            children.into_iter().map(Statement::from).collect(),
        )
    }

    fn prop(name: &str, value: Value) -> Statement {
        Property::new(name, value).into()
    }

    #[test]
    fn kind_from_type_or_prefix() {
        let explicit = Section::custom("uplink", vec![prop("type", Value::string("vlan"))]);
        assert_eq!(InterfaceKind::of(&explicit), InterfaceKind::Vlan);
        let inferred = Section::custom("ether1", Vec::new());
        assert_eq!(InterfaceKind::of(&inferred), InterfaceKind::Ethernet);
        let unknown = Section::custom("wlan1", Vec::new());
        assert_eq!(InterfaceKind::of(&unknown), InterfaceKind::Unspecified);
    }

    #[test]
    fn property_order_does_not_change_kind() {
        let section = Section::custom(
            "uplink",
            vec![
                prop("vlan_id", Value::number(10)),
                prop("interface", Value::string("ether1")),
                prop("type", Value::string("vlan")),
            ],
        );
        assert!(InterfacesValidator.validate(&interfaces(vec![section])).is_ok());
    }

    #[test]
    fn vlan_requires_parent_interface() {
        let section = Section::custom(
            "vlan10",
            vec![prop("type", Value::string("vlan")), prop("vlan_id", Value::number(10))],
        );
        let err = InterfacesValidator
            .validate(&interfaces(vec![section]))
            .unwrap_err();
        assert_eq!(
            err.message,
            "VLAN interface is missing required 'interface' property"
        );
    }

    #[test]
    fn bonding_requires_mode() {
        let section = Section::custom("bond0", vec![prop("slaves", Value::string("ether2"))]);
        let err = InterfacesValidator
            .validate(&interfaces(vec![section]))
            .unwrap_err();
        assert_eq!(err.message, "Bonding interface is missing required 'mode' property");
    }

    #[test]
    fn type_specific_properties_are_scoped() {
        let section = Section::custom(
            "ether1",
            vec![prop("vlan_id", Value::number(10))],
        );
        let err = InterfacesValidator
            .validate(&interfaces(vec![section]))
            .unwrap_err();
        assert_eq!(
            err.message,
            "Interface section contains invalid property 'vlan_id'. This property is not valid for interface configuration."
        );
    }

    #[test]
    fn nested_ip_address_is_checked() {
        let bad = Section::custom(
            "ether1",
            vec![Section::custom("ip", vec![prop("address", Value::string("999.1.1.1"))]).into()],
        );
        let err = InterfacesValidator
            .validate(&interfaces(vec![bad]))
            .unwrap_err();
        assert_eq!(
            err.message,
            "Invalid IP address format in interface 'ether1': 999.1.1.1"
        );
    }

    #[test]
    fn nesting_only_inside_templates() {
        let nested = Section::custom(
            "ether1",
            vec![Section::custom("extra", vec![prop("mtu", Value::number(1500))]).into()],
        );
        let err = InterfacesValidator
            .validate(&interfaces(vec![nested]))
            .unwrap_err();
        assert_eq!(
            err.message,
            "Semantic error: Section 'extra' cannot be defined under 'ether1' in Interfaces section"
        );

        let grouped = Section::custom(
            "template",
            vec![Section::custom("ether7", vec![prop("mtu", Value::number(9000))]).into()],
        );
        assert!(InterfacesValidator.validate(&interfaces(vec![grouped])).is_ok());
    }

    #[test]
    fn ip_block_only_directly_under_interface() {
        let address = || prop("address", Value::string("10.0.0.1/24"));
        let repeated = Section::custom(
            "ether1",
            vec![Section::custom(
                "ip",
                vec![address(), Section::custom("ip", vec![address()]).into()],
            )
            .into()],
        );
        let err = InterfacesValidator
            .validate(&interfaces(vec![repeated]))
            .unwrap_err();
        assert_eq!(
            err.message,
            "Semantic error: Section 'ip' cannot be defined under 'ip' in Interfaces section"
        );

        let grouped = Section::custom(
            "template",
            vec![Section::custom(
                "ether7",
                vec![Section::custom("ip", vec![address()]).into()],
            )
            .into()],
        );
        assert!(InterfacesValidator.validate(&interfaces(vec![grouped])).is_ok());
    }
}
