//! Validation for sections without a dedicated kind.

use rosdsl_core::Section;

use super::{NestingPolicy, SectionValidator, ValidationError};

/// Accepts any structure and any property.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomValidator;

impl SectionValidator for CustomValidator {
    fn label(&self) -> &str {
        "Custom"
    }

    fn nesting_policy(&self) -> NestingPolicy {
        NestingPolicy::DeepNesting
    }

    fn validate_properties(&self, _section: &Section) -> Result<(), ValidationError> {
        Ok(())
    }
}
