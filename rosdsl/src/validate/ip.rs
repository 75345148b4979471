//! IP section validation.
//!
//! Subsections are either standard menus (`route`, `dhcp-server`, `dns`, …)
//! or interface-shaped sections that only assign an address to the interface
//! with the same name.

use rosdsl_core::Section;

use super::firewall::validate_chain_rule;
use super::interfaces::validate_interface_address;
use super::{fail, is_grouping, text_of, NestingPolicy, SectionValidator, ValidationError};
use crate::address::is_ipv4;

const STANDARD_SUBSECTIONS: [&str; 11] = [
    "address",
    "route",
    "routes",
    "firewall",
    "dhcp-server",
    "dhcp-client",
    "dns",
    "arp",
    "service",
    "neighbor",
    "proxy",
];

const DIRECT_PROPERTIES: [&str; 2] = ["dns-server", "allow-remote-requests"];

pub(crate) fn is_standard_subsection(name: &str) -> bool {
    STANDARD_SUBSECTIONS.contains(&name)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IpValidator;

impl SectionValidator for IpValidator {
    fn label(&self) -> &str {
        "IP"
    }

    fn nesting_policy(&self) -> NestingPolicy {
        NestingPolicy::ConditionalNesting
    }

    /// Standard menus and grouping containers may hold entries. The
    /// `filter`/`nat` tables below `firewall` hold per-chain rules.
    fn is_valid_nesting(&self, parent: &str, _child: &str, depth: usize) -> bool {
        match depth {
            1 => is_standard_subsection(parent) || is_grouping(parent),
            2 => matches!(parent, "filter" | "nat"),
            _ => false,
        }
    }

    fn validate_direct_properties(&self, section: &Section) -> Result<(), ValidationError> {
        for prop in section.properties() {
            if !DIRECT_PROPERTIES.contains(&prop.name.as_str()) {
                return fail(format!(
                    "Invalid property '{}' directly under IP section",
                    prop.name
                ));
            }
        }
        Ok(())
    }

    fn validate_properties(&self, section: &Section) -> Result<(), ValidationError> {
        let name = section.name.as_str();
        if matches!(name, "route" | "routes") {
            return validate_routes(section);
        }
        if name == "firewall" {
            return validate_firewall(section);
        }
        if is_standard_subsection(name) {
            return Ok(());
        }
        if is_grouping(name) {
            for member in section.subsections() {
                validate_interface_address(&member.name, member)?;
            }
            return Ok(());
        }
        validate_interface_address(name, section)
    }
}

/// `firewall { <table> { <chain> { ... } } }`, the chain named by the section.
fn validate_firewall(section: &Section) -> Result<(), ValidationError> {
    for table in section.subsections() {
        for chain in table.subsections() {
            validate_chain_rule(&table.name, chain)?;
        }
    }
    Ok(())
}

fn validate_routes(section: &Section) -> Result<(), ValidationError> {
    for entry in section.subsections() {
        let Some(gateway) = text_of(entry, &["gateway"]) else {
            return fail(format!(
                "IP route entry '{}' is missing required 'gateway' property",
                entry.name
            ));
        };
        if !is_ipv4(&gateway) {
            return fail(format!(
                "Invalid gateway IP address format in route '{}': {}",
                entry.name, gateway
            ));
        }
    }
    Ok(())
}
