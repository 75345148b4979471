//! Per-section semantic validation.
//!
//! Every section kind has a validator with a nesting policy and a set of
//! property rules. [`SectionValidator::validate`] runs the checks in a fixed
//! order and stops at the first failure:
//!
//! 1. **Block presence**: a section must carry a block
//! 2. **Hierarchy**: nested sections must satisfy the nesting policy
//! 3. **Direct properties**: properties placed on the root section itself
//! 4. **Subsections**: `validate_properties` on every direct subsection
//!
//! Validation never mutates the tree, so running it twice gives the same
//! result.

use rosdsl_core::{Expression, Property, Section};
use thiserror::Error;

pub mod custom;
pub mod device;
pub mod firewall;
pub mod interfaces;
pub mod ip;
pub mod routing;

pub use custom::CustomValidator;
pub use device::DeviceValidator;
pub use firewall::FirewallValidator;
pub use interfaces::InterfacesValidator;
pub use ip::IpValidator;
pub use routing::RoutingValidator;

/// A semantic rule violation with a message naming the offending item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Shorthand for returning a validation failure.
pub(crate) fn fail<T>(message: impl Into<String>) -> Result<T, ValidationError> {
    Err(ValidationError::new(message))
}

/// How deep sections may nest below the validated root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestingPolicy {
    /// The root may not contain sections at all.
    NoNesting,
    /// One level of subsections; those may not nest further.
    ShallowNesting,
    DeepNesting,
    /// Each parent/child pair is checked by `is_valid_nesting`.
    ConditionalNesting,
}

pub trait SectionValidator {
    /// Name used in messages, for example `Firewall`.
    fn label(&self) -> &str;

    fn nesting_policy(&self) -> NestingPolicy;

    /// Decide whether `child` may appear inside `parent`.
    ///
    /// Only consulted under [`NestingPolicy::ConditionalNesting`], for every
    /// pair below the root's direct subsections. `depth` is the parent's
    /// level below the root: 1 for a direct subsection.
    fn is_valid_nesting(&self, _parent: &str, _child: &str, _depth: usize) -> bool {
        true
    }

    /// Check properties set directly on the root section.
    fn validate_direct_properties(&self, _section: &Section) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Check one direct subsection of the root.
    fn validate_properties(&self, section: &Section) -> Result<(), ValidationError>;

    fn validate(&self, section: &Section) -> Result<(), ValidationError> {
        if section.block.is_none() {
            return fail(format!(
                "{} section is missing a block statement",
                self.label()
            ));
        }
        check_hierarchy(self, section)?;
        self.validate_direct_properties(section)?;
        for subsection in section.subsections() {
            self.validate_properties(subsection)?;
        }
        Ok(())
    }
}

/// Apply the validator's nesting policy to the tree below `root`.
pub fn check_hierarchy<V>(validator: &V, root: &Section) -> Result<(), ValidationError>
where
    V: SectionValidator + ?Sized,
{
    match validator.nesting_policy() {
        NestingPolicy::DeepNesting => Ok(()),
        NestingPolicy::NoNesting => {
            match root.subsections().next() {
                Some(child) => fail(format!(
                    "Semantic error: Section '{}' cannot contain nested sections in {} section",
                    child.name,
                    validator.label()
                )),
                None => Ok(()),
            }
        }
        NestingPolicy::ShallowNesting => {
            let too_deep = root
                .subsections()
                .flat_map(Section::subsections)
                .any(Section::has_subsections);
            if too_deep {
                return fail(format!(
                    "Semantic error: Nesting depth exceeded in {} section (max 2 levels)",
                    validator.label()
                ));
            }
            Ok(())
        }
        NestingPolicy::ConditionalNesting => {
            for subsection in root.subsections() {
                check_conditional(validator, subsection, 1)?;
            }
            Ok(())
        }
    }
}

fn check_conditional<V>(validator: &V, parent: &Section, depth: usize) -> Result<(), ValidationError>
where
    V: SectionValidator + ?Sized,
{
    for child in parent.subsections() {
        if !validator.is_valid_nesting(&parent.name, &child.name, depth) {
            return fail(format!(
                "Semantic error: Section '{}' cannot be defined under '{}' in {} section",
                child.name,
                parent.name,
                validator.label()
            ));
        }
        check_conditional(validator, child, depth + 1)?;
    }
    Ok(())
}

/// Grouping containers that may hold definitions one level down.
pub(crate) fn is_grouping(name: &str) -> bool {
    matches!(name, "template" | "group")
}

/// Unquoted text of a property, or `None` when the value is absent.
pub(crate) fn property_text(prop: &Property) -> Option<String> {
    prop.value.as_ref().map(Expression::plain)
}

/// Text of the first property matching any spelling, skipping absent values.
pub(crate) fn text_of(section: &Section, names: &[&str]) -> Option<String> {
    section.property_any(names).and_then(property_text)
}
