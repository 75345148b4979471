//! Routing section validation.
//!
//! Subsections named `table`/`tables`, `rule`/`rules` and `filter` are
//! structural and hold one level of named entries. Every other subsection is
//! a static route and may not nest.

use rosdsl_core::Section;

use super::{fail, text_of, NestingPolicy, SectionValidator, ValidationError};
use crate::address::{is_ipv4, is_ipv4_cidr};

const ROUTE_PROPERTIES: [&str; 15] = [
    "src_address",
    "src",
    "src-address",
    "destination",
    "dst-address",
    "dst",
    "gateway",
    "gw",
    "distance",
    "routing-table",
    "table",
    "check-gateway",
    "scope",
    "target-scope",
    "suppress-hw-offload",
];

const TABLE_PROPERTIES: [&str; 1] = ["fib"];
const RULE_PROPERTIES: [&str; 5] = ["src-address", "dst-address", "interface", "action", "table"];
const FILTER_PROPERTIES: [&str; 1] = ["rule"];

pub(crate) const DESTINATION_KEYS: [&str; 3] = ["destination", "dst-address", "dst"];
pub(crate) const GATEWAY_KEYS: [&str; 2] = ["gateway", "gw"];

/// Structural subsection families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RoutingGroup {
    Table,
    Rule,
    Filter,
}

impl RoutingGroup {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name {
            "table" | "tables" => Some(RoutingGroup::Table),
            "rule" | "rules" => Some(RoutingGroup::Rule),
            "filter" => Some(RoutingGroup::Filter),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            RoutingGroup::Table => "table",
            RoutingGroup::Rule => "rule",
            RoutingGroup::Filter => "filter",
        }
    }

    fn allowed_properties(self) -> &'static [&'static str] {
        match self {
            RoutingGroup::Table => &TABLE_PROPERTIES,
            RoutingGroup::Rule => &RULE_PROPERTIES,
            RoutingGroup::Filter => &FILTER_PROPERTIES,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RoutingValidator;

impl SectionValidator for RoutingValidator {
    fn label(&self) -> &str {
        "Routing"
    }

    fn nesting_policy(&self) -> NestingPolicy {
        NestingPolicy::ConditionalNesting
    }

    fn is_valid_nesting(&self, parent: &str, _child: &str, depth: usize) -> bool {
        depth == 1 && RoutingGroup::from_name(parent).is_some()
    }

    fn validate_direct_properties(&self, section: &Section) -> Result<(), ValidationError> {
        for prop in section.properties() {
            if prop.name != "static_route_default_gw" {
                return fail(format!(
                    "Invalid property '{}' in routing section. Top-level routing properties are limited.",
                    prop.name
                ));
            }
            let gateway = prop.plain();
            if !is_ipv4(&gateway) {
                return fail(format!(
                    "Invalid default gateway IP address format: {gateway}"
                ));
            }
        }
        Ok(())
    }

    fn validate_properties(&self, section: &Section) -> Result<(), ValidationError> {
        match RoutingGroup::from_name(&section.name) {
            Some(group) => validate_group(group, section),
            None => validate_route(section),
        }
    }
}

fn validate_group(group: RoutingGroup, section: &Section) -> Result<(), ValidationError> {
    if section.block.is_none() {
        return fail(format!(
            "Routing {} section is missing its block",
            group.label()
        ));
    }
    let allowed = group.allowed_properties();
    for entry in section.subsections() {
        for prop in entry.properties() {
            if !allowed.contains(&prop.name.as_str()) {
                return fail(format!(
                    "Invalid property '{}' in routing {} '{}'",
                    prop.name,
                    group.label(),
                    entry.name
                ));
            }
        }
    }
    Ok(())
}

fn validate_route(route: &Section) -> Result<(), ValidationError> {
    let name = &route.name;
    for prop in route.properties() {
        if !ROUTE_PROPERTIES.contains(&prop.name.as_str()) {
            return fail(format!("Invalid property '{}' in route '{}'", prop.name, name));
        }
    }

    let Some(destination) = text_of(route, &DESTINATION_KEYS) else {
        return fail(format!(
            "Route '{name}' is missing required 'destination/dst-address' property"
        ));
    };
    if !is_ipv4_cidr(&destination) {
        return fail(format!(
            "Invalid destination network format in route '{name}': {destination}. Must be in CIDR format (e.g. 192.168.1.0/24)"
        ));
    }

    if text_of(route, &GATEWAY_KEYS).is_none() {
        return fail(format!(
            "Route '{name}' is missing required 'gateway' property"
        ));
    }

    if let Some(distance) = route.property("distance") {
        let Some(value) = distance
            .value
            .as_ref()
            .and_then(|expr| expr.as_value())
            .and_then(|value| value.as_number())
        else {
            return fail(format!("Distance property in route '{name}' must be a number"));
        };
        if !(1..=255).contains(&value) {
            return fail(format!(
                "Distance value in route '{name}' must be between 1 and 255"
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rosdsl_core::{Property, SectionKind, Statement, Value};

    use super::*;

    fn routing(statements: Vec<Statement>) -> Section {
        Section::with_statements("routing", SectionKind::Routing, statements)
    }

    fn prop(name: &str, value: Value) -> Statement {
        Property::new(name, value).into()
    }

    fn route(props: Vec<Statement>) -> Statement {
        Section::custom("backup", props).into()
    }

    fn base_route() -> Vec<Statement> {
        vec![
            prop("dst-address", Value::ip_cidr("172.16.0.0/12")),
            prop("gateway", Value::ip_address("10.0.0.3")),
        ]
    }

    #[test]
    fn complete_route_passes() {
        let mut props = base_route();
        props.push(prop("distance", Value::number(20)));
        assert!(RoutingValidator.validate(&routing(vec![route(props)])).is_ok());
    }

    #[test]
    fn distance_range_and_type() {
        let mut props = base_route();
        props.push(prop("distance", Value::number(0)));
        assert_eq!(
            RoutingValidator
                .validate(&routing(vec![route(props)]))
                .unwrap_err()
                .message,
            "Distance value in route 'backup' must be between 1 and 255"
        );

        let mut props = base_route();
        props.push(prop("distance", Value::string("far")));
        assert_eq!(
            RoutingValidator
                .validate(&routing(vec![route(props)]))
                .unwrap_err()
                .message,
            "Distance property in route 'backup' must be a number"
        );

        let mut props = base_route();
        props.push(prop("distance", Value::number(255)));
        assert!(RoutingValidator.validate(&routing(vec![route(props)])).is_ok());
    }

    #[test]
    fn destination_must_be_cidr() {
        let props = vec![
            prop("dst", Value::ip_address("172.16.0.0")),
            prop("gw", Value::ip_address("10.0.0.3")),
        ];
        assert_eq!(
            RoutingValidator
                .validate(&routing(vec![route(props)]))
                .unwrap_err()
                .message,
            "Invalid destination network format in route 'backup': 172.16.0.0. Must be in CIDR format (e.g. 192.168.1.0/24)"
        );
    }

    #[test]
    fn missing_gateway() {
        let props = vec![prop("destination", Value::ip_cidr("0.0.0.0/0"))];
        assert_eq!(
            RoutingValidator
                .validate(&routing(vec![route(props)]))
                .unwrap_err()
                .message,
            "Route 'backup' is missing required 'gateway' property"
        );
    }

    #[test]
    fn top_level_property_rules() {
        let ok = routing(vec![prop(
            "static_route_default_gw",
            Value::ip_address("203.0.113.1"),
        )]);
        assert!(RoutingValidator.validate(&ok).is_ok());

        let bad = routing(vec![prop("static_route_default_gw", Value::string("gw1"))]);
        assert_eq!(
            RoutingValidator.validate(&bad).unwrap_err().message,
            "Invalid default gateway IP address format: gw1"
        );
    }

    #[test]
    fn tables_hold_one_level_and_routes_never_nest() {
        let table = Section::custom(
            "table",
            vec![Section::custom("vpn", vec![prop("fib", Value::boolean(true))]).into()],
        );
        assert!(RoutingValidator.validate(&routing(vec![table.into()])).is_ok());

        let deep = Section::custom(
            "table",
            vec![Section::custom(
                "vpn",
                vec![Section::custom("x", vec![prop("fib", Value::boolean(true))]).into()],
            )
            .into()],
        );
        assert_eq!(
            RoutingValidator
                .validate(&routing(vec![deep.into()]))
                .unwrap_err()
                .message,
            "Semantic error: Section 'x' cannot be defined under 'vpn' in Routing section"
        );

        let mut props = base_route();
        props.push(Section::custom("extra", Vec::new()).into());
        assert_eq!(
            RoutingValidator
                .validate(&routing(vec![route(props)]))
                .unwrap_err()
                .message,
            "Semantic error: Section 'extra' cannot be defined under 'backup' in Routing section"
        );
    }

    #[test]
    fn table_entries_check_properties() {
        let table = Section::custom(
            "tables",
            vec![Section::custom("vpn", vec![prop("gateway", Value::string("x"))]).into()],
        );
        assert_eq!(
            RoutingValidator
                .validate(&routing(vec![table.into()]))
                .unwrap_err()
                .message,
            "Invalid property 'gateway' in routing table 'vpn'"
        );
    }
}
