use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// Type descriptor computed for values, expressions and statements.
///
/// Descriptors are built on demand and owned by the caller; nothing in the
/// tree caches them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Datatype {
    String,
    Number,
    Boolean,
    IpAddress,
    IpCidr,
    IpRange,
    Ipv6Address,
    Ipv6Cidr,
    Ipv6Range,
    /// A configuration section bound by name resolution.
    Section,
    /// An interface defined under the `interfaces` section.
    Interface,
    List(Box<Datatype>),
}

impl Datatype {
    /// Stable lowercase name used in messages and JSON output.
    pub fn type_name(&self) -> String {
        match self {
            Datatype::String => "string".to_string(),
            Datatype::Number => "number".to_string(),
            Datatype::Boolean => "boolean".to_string(),
            Datatype::IpAddress => "ip_address".to_string(),
            Datatype::IpCidr => "ip_cidr".to_string(),
            Datatype::IpRange => "ip_range".to_string(),
            Datatype::Ipv6Address => "ipv6_address".to_string(),
            Datatype::Ipv6Cidr => "ipv6_cidr".to_string(),
            Datatype::Ipv6Range => "ipv6_range".to_string(),
            Datatype::Section => "section".to_string(),
            Datatype::Interface => "interface".to_string(),
            Datatype::List(inner) => format!("list<{}>", inner.type_name()),
        }
    }

    /// Compare only the outer tag, ignoring list element types.
    pub fn same_tag(&self, other: &Datatype) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Element type for list descriptors.
    pub fn element_type(&self) -> Option<&Datatype> {
        match self {
            Datatype::List(inner) => Some(inner),
            _ => None,
        }
    }
}

impl Display for Datatype {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_type_name_includes_element() {
        let ty = Datatype::List(Box::new(Datatype::IpCidr));
        assert_eq!(ty.type_name(), "list<ip_cidr>");
        assert_eq!(ty.element_type(), Some(&Datatype::IpCidr));
    }

    #[test]
    fn same_tag_ignores_list_elements() {
        let a = Datatype::List(Box::new(Datatype::String));
        let b = Datatype::List(Box::new(Datatype::Number));
        assert!(a.same_tag(&b));
        assert!(!Datatype::String.same_tag(&Datatype::Number));
    }
}
