use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::datatype::Datatype;

/// Literal and composite values carried by properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Value {
    String { value: String },
    Number { value: i64 },
    Boolean { value: bool },
    IpAddress { value: String },
    IpCidr { value: String },
    IpRange { value: String },
    Ipv6Address { value: String },
    Ipv6Cidr { value: String },
    Ipv6Range { value: String },
    /// Ordered values with an optional declared element type.
    ///
    /// Element uniformity is not checked here; the type checker rejects
    /// mixed lists.
    List {
        items: Vec<Value>,
        element_type: Option<Datatype>,
    },
}

impl Value {
    pub fn string(value: impl Into<String>) -> Self {
        Value::String {
            value: value.into(),
        }
    }

    pub fn number(value: i64) -> Self {
        Value::Number { value }
    }

    pub fn boolean(value: bool) -> Self {
        Value::Boolean { value }
    }

    pub fn ip_address(value: impl Into<String>) -> Self {
        Value::IpAddress {
            value: value.into(),
        }
    }

    pub fn ip_cidr(value: impl Into<String>) -> Self {
        Value::IpCidr {
            value: value.into(),
        }
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List {
            items,
            element_type: None,
        }
    }

    pub fn typed_list(items: Vec<Value>, element_type: Datatype) -> Self {
        Value::List {
            items,
            element_type: Some(element_type),
        }
    }

    /// Build a fresh type descriptor for this value.
    ///
    /// Lists use the declared element type when present, otherwise the type
    /// of the first element. Empty untyped lists are lists of strings.
    pub fn get_type(&self) -> Datatype {
        match self {
            Value::String { .. } => Datatype::String,
            Value::Number { .. } => Datatype::Number,
            Value::Boolean { .. } => Datatype::Boolean,
            Value::IpAddress { .. } => Datatype::IpAddress,
            Value::IpCidr { .. } => Datatype::IpCidr,
            Value::IpRange { .. } => Datatype::IpRange,
            Value::Ipv6Address { .. } => Datatype::Ipv6Address,
            Value::Ipv6Cidr { .. } => Datatype::Ipv6Cidr,
            Value::Ipv6Range { .. } => Datatype::Ipv6Range,
            Value::List {
                items,
                element_type,
            } => {
                let inner = match (element_type, items.first()) {
                    (Some(declared), _) => declared.clone(),
                    (None, Some(first)) => first.get_type(),
                    (None, None) => Datatype::String,
                };
                Datatype::List(Box::new(inner))
            }
        }
    }

    /// Unquoted text form, as used inside RouterOS parameters.
    ///
    /// Booleans become `yes`/`no` and lists are joined with commas.
    pub fn plain(&self) -> String {
        match self {
            Value::String { value }
            | Value::IpAddress { value }
            | Value::IpCidr { value }
            | Value::IpRange { value }
            | Value::Ipv6Address { value }
            | Value::Ipv6Cidr { value }
            | Value::Ipv6Range { value } => value.clone(),
            Value::Number { value } => value.to_string(),
            Value::Boolean { value } => yes_no(*value).to_string(),
            Value::List { items, .. } => items
                .iter()
                .map(Value::plain)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Target-script form: strings are quoted, everything else is bare.
    pub fn emit(&self) -> String {
        match self {
            Value::String { value } => quote(value),
            other => other.plain(),
        }
    }

    /// Interpret the value as a yes/no flag.
    ///
    /// Accepts booleans and the strings `yes`, `true`, `no`, `false`.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Value::Boolean { value } => Some(*value),
            Value::String { value } => match value.trim().to_ascii_lowercase().as_str() {
                "yes" | "true" => Some(true),
                "no" | "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Interpret the value as an integer, accepting numeric strings.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number { value } => Some(*value),
            Value::String { value } => value.trim().parse().ok(),
            _ => None,
        }
    }

    /// Return the string payload for `Value::String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String { value } => Some(value),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List { .. })
    }

    /// Flatten into element values; scalars yield themselves.
    pub fn elements(&self) -> Vec<&Value> {
        match self {
            Value::List { items, .. } => items.iter().collect(),
            other => vec![other],
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::String { value } => write!(f, "\"{}\"", escape(value)),
            Value::Boolean { value } => write!(f, "{value}"),
            Value::List { items, .. } => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            other => write!(f, "{}", other.plain()),
        }
    }
}

/// Names, property references and literal values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expression {
    Value { value: Value },
    /// Unresolved bare name. Typed as a string until resolved.
    Identifier { name: String },
    /// `base.property` access.
    PropertyReference {
        base: Box<Expression>,
        property: String,
    },
}

impl Expression {
    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier { name: name.into() }
    }

    pub fn property_reference(base: Expression, property: impl Into<String>) -> Self {
        Expression::PropertyReference {
            base: Box::new(base),
            property: property.into(),
        }
    }

    /// Build a fresh type descriptor.
    ///
    /// Identifiers and property references report `string`; the type
    /// checker refines references once their base resolves.
    pub fn get_type(&self) -> Datatype {
        match self {
            Expression::Value { value } => value.get_type(),
            Expression::Identifier { .. } | Expression::PropertyReference { .. } => {
                Datatype::String
            }
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Expression::Value { value } => Some(value),
            _ => None,
        }
    }

    /// Unquoted text form.
    pub fn plain(&self) -> String {
        match self {
            Expression::Value { value } => value.plain(),
            other => other.to_string(),
        }
    }

    /// Target-script form.
    pub fn emit(&self) -> String {
        match self {
            Expression::Value { value } => value.emit(),
            other => other.to_string(),
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Expression::Value { value } => value.as_flag(),
            Expression::Identifier { name } => Value::string(name.as_str()).as_flag(),
            Expression::PropertyReference { .. } => None,
        }
    }
}

impl From<Value> for Expression {
    fn from(value: Value) -> Self {
        Expression::Value { value }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Value { value } => write!(f, "{value}"),
            Expression::Identifier { name } => f.write_str(name),
            Expression::PropertyReference { base, property } => write!(f, "{base}.{property}"),
        }
    }
}

/// RouterOS boolean spelling.
pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Wrap text in double quotes, escaping quotes and backslashes.
pub fn quote(text: &str) -> String {
    format!("\"{}\"", escape(text))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}
