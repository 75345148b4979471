//! Firewall rule validation.
//!
//! ## Checks Performed
//!
//! 1. **Structure**: `filter` and `nat` contain only rule subsections;
//!    standard tables hold one level of rules
//! 2. **Rule properties**: only known match/action properties, in either
//!    `_` or `-` spelling
//! 3. **Chains and actions**: must belong to the table's valid set
//! 4. **Masquerade**: NAT masquerade rules need an outgoing interface
//! 5. **Connection state**: every state must be a known connection state

use rosdsl_core::Section;

use super::{fail, is_grouping, text_of, NestingPolicy, SectionValidator, ValidationError};

const STANDARD_SUBSECTIONS: [&str; 7] = [
    "filter",
    "nat",
    "mangle",
    "raw",
    "address-list",
    "service-port",
    "layer7-protocol",
];

const FILTER_CHAINS: [&str; 3] = ["input", "forward", "output"];
const FILTER_ACTIONS: [&str; 9] = [
    "accept",
    "drop",
    "reject",
    "log",
    "tarpit",
    "jump",
    "fasttrack-connection",
    "add-src-to-address-list",
    "add-dst-to-address-list",
];
const NAT_CHAINS: [&str; 4] = ["srcnat", "dstnat", "prerouting", "postrouting"];
const NAT_ACTIONS: [&str; 8] = [
    "accept",
    "drop",
    "masquerade",
    "redirect",
    "dst-nat",
    "src-nat",
    "same",
    "netmap",
];
const CONNECTION_STATES: [&str; 4] = ["established", "related", "new", "invalid"];

const RULE_PROPERTIES: [&str; 19] = [
    "chain",
    "action",
    "protocol",
    "src-address",
    "src_address",
    "dst-address",
    "dst_address",
    "src-port",
    "src_port",
    "dst-port",
    "dst_port",
    "in-interface",
    "in_interface",
    "out-interface",
    "out_interface",
    "comment",
    "connection-state",
    "connection_state",
    "disabled",
];
const NAT_PROPERTIES: [&str; 4] = ["to-addresses", "to_addresses", "to-ports", "to_ports"];

pub(crate) const CONNECTION_STATE_KEYS: [&str; 2] = ["connection_state", "connection-state"];
pub(crate) const OUT_INTERFACE_KEYS: [&str; 2] = ["out_interface", "out-interface"];
pub(crate) const IN_INTERFACE_KEYS: [&str; 2] = ["in_interface", "in-interface"];

/// Rule tables with enforced chain/action vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleTable {
    Filter,
    Nat,
}

impl RuleTable {
    fn label(self) -> &'static str {
        match self {
            RuleTable::Filter => "Filter",
            RuleTable::Nat => "NAT",
        }
    }

    fn lower_label(self) -> &'static str {
        match self {
            RuleTable::Filter => "filter",
            RuleTable::Nat => "NAT",
        }
    }

    fn chains(self) -> &'static [&'static str] {
        match self {
            RuleTable::Filter => &FILTER_CHAINS,
            RuleTable::Nat => &NAT_CHAINS,
        }
    }

    fn actions(self) -> &'static [&'static str] {
        match self {
            RuleTable::Filter => &FILTER_ACTIONS,
            RuleTable::Nat => &NAT_ACTIONS,
        }
    }

    fn allows(self, property: &str) -> bool {
        RULE_PROPERTIES.contains(&property)
            || (self == RuleTable::Nat && NAT_PROPERTIES.contains(&property))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FirewallValidator;

impl SectionValidator for FirewallValidator {
    fn label(&self) -> &str {
        "Firewall"
    }

    fn nesting_policy(&self) -> NestingPolicy {
        NestingPolicy::ConditionalNesting
    }

    /// Tables and groups hold one level of entries; entries hold only
    /// properties.
    fn is_valid_nesting(&self, parent: &str, _child: &str, depth: usize) -> bool {
        depth == 1 && (STANDARD_SUBSECTIONS.contains(&parent) || is_grouping(parent))
    }

    fn validate_direct_properties(&self, section: &Section) -> Result<(), ValidationError> {
        match section.properties().next() {
            Some(prop) => fail(format!(
                "Invalid property '{}' directly under firewall section",
                prop.name
            )),
            None => Ok(()),
        }
    }

    fn validate_properties(&self, section: &Section) -> Result<(), ValidationError> {
        let table = match section.name.as_str() {
            "filter" => RuleTable::Filter,
            "nat" => RuleTable::Nat,
            _ => return Ok(()),
        };
        if section.properties().next().is_some() {
            return fail(format!(
                "{} section can only contain rule subsections",
                table.label()
            ));
        }
        for rule in section.subsections() {
            validate_rule(table, rule)?;
        }
        Ok(())
    }
}

fn validate_rule(table: RuleTable, rule: &Section) -> Result<(), ValidationError> {
    check_rule_properties(table, rule)?;
    let Some(chain) = text_of(rule, &["chain"]) else {
        return fail(format!(
            "{} rule '{}' is missing required 'chain' property",
            table.label(),
            rule.name
        ));
    };
    check_rule_body(table, rule, &chain)
}

/// Check a rule written as `<table> { <chain> { ... } }`, where the section
/// name is the chain. Tables other than `filter` and `nat` are not checked.
pub(crate) fn validate_chain_rule(table: &str, rule: &Section) -> Result<(), ValidationError> {
    let table = match table {
        "filter" => RuleTable::Filter,
        "nat" => RuleTable::Nat,
        _ => return Ok(()),
    };
    check_rule_properties(table, rule)?;
    check_rule_body(table, rule, &rule.name)
}

fn check_rule_properties(table: RuleTable, rule: &Section) -> Result<(), ValidationError> {
    let name = &rule.name;
    for prop in rule.properties() {
        if !table.allows(&prop.name) {
            return fail(format!(
                "Invalid property '{}' in {} rule '{}'",
                prop.name,
                table.lower_label(),
                name
            ));
        }
    }
    Ok(())
}

fn check_rule_body(table: RuleTable, rule: &Section, chain: &str) -> Result<(), ValidationError> {
    let name = &rule.name;
    let Some(action) = text_of(rule, &["action"]) else {
        return fail(format!(
            "{} rule '{name}' is missing required 'action' property",
            table.label()
        ));
    };

    if !table.chains().contains(&chain) {
        return fail(format!(
            "Invalid {} chain '{chain}'. Valid chains are: {}",
            table.lower_label(),
            table.chains().join(", ")
        ));
    }
    if !table.actions().contains(&action.as_str()) {
        return fail(format!(
            "Invalid {} action '{action}'. Valid actions are: {}",
            table.lower_label(),
            table.actions().join(", ")
        ));
    }

    if table == RuleTable::Nat
        && action == "masquerade"
        && text_of(rule, &OUT_INTERFACE_KEYS).is_none()
    {
        return fail("NAT rule with 'masquerade' action requires 'out_interface' property");
    }

    if let Some(states) = rule
        .property_any(&CONNECTION_STATE_KEYS)
        .and_then(|prop| prop.value.as_ref())
    {
        for state in connection_states(&states.plain()) {
            if !CONNECTION_STATES.contains(&state.as_str()) {
                return fail(format!(
                    "Invalid connection state '{state}'. Valid states are: {}",
                    CONNECTION_STATES.join(", ")
                ));
            }
        }
    }
    Ok(())
}

/// Split a flattened connection-state value into individual states.
pub(crate) fn connection_states(flattened: &str) -> Vec<String> {
    flattened
        .split(',')
        .map(str::trim)
        .filter(|state| !state.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
