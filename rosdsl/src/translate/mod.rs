//! Per-kind translators from validated sections to RouterOS commands.
//!
//! Each translator walks the root's statements in source order and returns
//! the command lines for that root. Entries that lack the data a command
//! cannot be built without are skipped with a warning; flags that cannot be
//! read as yes/no fail with [`EmitError::InvalidValue`].

use rosdsl_core::{Expression, Section};

use crate::emit::EmitError;

pub mod device;
pub mod firewall;
pub mod interfaces;
pub mod ip;
pub mod routing;

/// Text of a parameter written with either `-` or `_` separators.
pub(crate) fn text_either(section: &Section, param: &str) -> Option<String> {
    let underscored = param.replace('-', "_");
    section.text_any(&[param, underscored.as_str()])
}

/// Element texts of a property; scalars yield one element.
pub(crate) fn texts(section: &Section, names: &[&str]) -> Vec<String> {
    section
        .property_any(names)
        .and_then(|prop| prop.value.as_ref())
        .map(expression_texts)
        .unwrap_or_default()
}

pub(crate) fn expression_texts(expr: &Expression) -> Vec<String> {
    match expr.as_value() {
        Some(value) => value
            .elements()
            .into_iter()
            .map(|item| item.plain())
            .filter(|text| !text.is_empty())
            .collect(),
        None => vec![expr.plain()],
    }
}

/// Read a yes/no flag, `None` when the property or its value is absent.
pub(crate) fn flag(section: &Section, names: &[&str]) -> Result<Option<bool>, EmitError> {
    let Some(prop) = section.property_any(names) else {
        return Ok(None);
    };
    let Some(expr) = &prop.value else {
        return Ok(None);
    };
    match expr.as_flag() {
        Some(value) => Ok(Some(value)),
        None => Err(EmitError::InvalidValue {
            section: section.name.clone(),
            property: prop.name.clone(),
            value: expr.plain(),
            expected: "yes/no",
        }),
    }
}

/// Read a flag from a bare expression belonging to `section`.
pub(crate) fn expression_flag(
    section: &Section,
    property: &str,
    expr: Option<&Expression>,
) -> Result<bool, EmitError> {
    let text = expr.map(Expression::plain).unwrap_or_default();
    expr.and_then(Expression::as_flag)
        .ok_or_else(|| EmitError::InvalidValue {
            section: section.name.clone(),
            property: property.to_string(),
            value: text,
            expected: "yes/no",
        })
}
