//! Type checking of property values.
//!
//! Every expression and statement yields `Ok(Some(type))`, `Ok(None)` for
//! statements without a type (blocks, declarations), or the first
//! [`TypeError`] found. Lists must be uniform: every element shares the
//! first element's type, or the declared element type when there is one.

use rosdsl_core::{Datatype, Declaration, Expression, Section, Statement, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("mixed list: element {index} is {found}, expected {expected}")]
    MixedList {
        index: usize,
        expected: Datatype,
        found: Datatype,
    },
    #[error("property '{name}': {source}")]
    Property {
        name: String,
        #[source]
        source: Box<TypeError>,
    },
}

pub fn check_value(value: &Value) -> Result<Option<Datatype>, TypeError> {
    let Value::List {
        items,
        element_type,
    } = value
    else {
        return Ok(Some(value.get_type()));
    };

    let expected = match (element_type, items.first()) {
        (Some(declared), _) => declared.clone(),
        (None, Some(first)) => first.get_type(),
        (None, None) => return Ok(Some(Datatype::List(Box::new(Datatype::String)))),
    };
    for (index, item) in items.iter().enumerate() {
        let found = check_value(item)?.unwrap_or(Datatype::String);
        if found != expected {
            return Err(TypeError::MixedList {
                index,
                expected,
                found,
            });
        }
    }
    Ok(Some(Datatype::List(Box::new(expected))))
}

pub fn check_expression(expr: &Expression) -> Result<Option<Datatype>, TypeError> {
    match expr {
        Expression::Value { value } => check_value(value),
        Expression::Identifier { .. } => Ok(Some(Datatype::String)),
        Expression::PropertyReference { base, .. } => {
            check_expression(base)?;
            Ok(Some(Datatype::String))
        }
    }
}

pub fn check_statement(stmt: &Statement) -> Result<Option<Datatype>, TypeError> {
    match stmt {
        Statement::Property(prop) => match &prop.value {
            Some(expr) => check_expression(expr).map_err(|source| TypeError::Property {
                name: prop.name.clone(),
                source: Box::new(source),
            }),
            None => Ok(None),
        },
        Statement::Block(block) => {
            check_statements(&block.statements)?;
            Ok(None)
        }
        Statement::Section(section) => check_section(section),
        Statement::Declaration(decl) => {
            check_declaration(decl)?;
            Ok(None)
        }
    }
}

pub fn check_section(section: &Section) -> Result<Option<Datatype>, TypeError> {
    if let Some(block) = &section.block {
        check_statements(&block.statements)?;
    }
    Ok(Some(Datatype::Section))
}

fn check_declaration(decl: &Declaration) -> Result<(), TypeError> {
    match decl {
        Declaration::Config(config) => check_statements(&config.statements),
        Declaration::Interface { statements, .. } => check_statements(statements),
        Declaration::Property(prop) => {
            check_statement(&Statement::Property(prop.clone()))?;
            Ok(())
        }
        Declaration::Program(program) => {
            for section in &program.sections {
                check_section(section)?;
            }
            Ok(())
        }
    }
}

fn check_statements(statements: &[Statement]) -> Result<(), TypeError> {
    for stmt in statements {
        check_statement(stmt)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rosdsl_core::{parse, Property, SectionKind};

    use super::*;

    #[test]
    fn literal_types() {
        assert_eq!(check_value(&Value::string("x")).unwrap(), Some(Datatype::String));
        assert_eq!(check_value(&Value::number(3)).unwrap(), Some(Datatype::Number));
        assert_eq!(
            check_value(&Value::ip_cidr("10.0.0.0/8")).unwrap(),
            Some(Datatype::IpCidr)
        );
        assert_eq!(
            check_value(&Value::list(Vec::new())).unwrap(),
            Some(Datatype::List(Box::new(Datatype::String)))
        );
    }

    #[test]
    fn mixed_list_is_flagged() {
        let mixed = Value::list(vec![Value::string("a"), Value::number(1)]);
        assert_eq!(
            check_value(&mixed).unwrap_err(),
            TypeError::MixedList {
                index: 1,
                expected: Datatype::String,
                found: Datatype::Number,
            }
        );
    }

    #[test]
    fn declared_element_type_wins() {
        let declared = Value::typed_list(vec![Value::ip_address("10.0.0.1")], Datatype::IpCidr);
        assert!(matches!(
            check_value(&declared),
            Err(TypeError::MixedList { index: 0, .. })
        ));
    }

    #[test]
    fn nested_lists_compare_element_types() {
        let nested = Value::list(vec![
            Value::list(vec![Value::number(1)]),
            Value::list(vec![Value::string("x")]),
        ]);
        assert!(check_value(&nested).is_err());
    }

    #[test]
    fn names_are_strings() {
        let reference = Expression::property_reference(Expression::identifier("wan"), "address");
        assert_eq!(check_expression(&reference).unwrap(), Some(Datatype::String));
    }

    #[test]
    fn statements_and_sections() {
        let section = Section::with_statements(
            "ip",
            SectionKind::Ip,
            vec![Property::new(
                "dns-server",
                Value::list(vec![Value::ip_address("1.1.1.1"), Value::string("dns.example")]),
            )
            .into()],
        );
        let err = check_section(&section).unwrap_err();
        assert_eq!(
            err.to_string(),
            "property 'dns-server': mixed list: element 1 is string, expected ip_address"
        );
        assert_eq!(
            check_statement(&Statement::Property(Property::empty("x"))).unwrap(),
            None
        );
    }

    #[test]
    fn parsed_mixed_list_is_rejected() {
        let program = parse("snmp:\n    hosts = [10.0.0.1, \"backup\"]\n").unwrap();
        assert!(check_section(&program.sections[0]).is_err());
    }
}
