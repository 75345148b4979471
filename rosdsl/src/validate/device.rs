//! Device identity validation.
//!
//! The device section (and the system section, which shares its rules) must
//! set exactly `vendor`, `model` and `hostname` as strings. Subsections are
//! allowed at any depth and are not checked.

use rosdsl_core::{Section, Value};

use super::{fail, NestingPolicy, SectionValidator, ValidationError};

const IDENTITY_PROPERTIES: [&str; 3] = ["vendor", "model", "hostname"];

/// Validator for `device` and `system` sections.
#[derive(Debug, Clone, Copy)]
pub struct DeviceValidator {
    label: &'static str,
}

impl DeviceValidator {
    pub fn device() -> Self {
        Self { label: "Device" }
    }

    pub fn system() -> Self {
        Self { label: "System" }
    }
}

impl SectionValidator for DeviceValidator {
    fn label(&self) -> &str {
        self.label
    }

    fn nesting_policy(&self) -> NestingPolicy {
        NestingPolicy::DeepNesting
    }

    fn validate_direct_properties(&self, section: &Section) -> Result<(), ValidationError> {
        for prop in section.properties() {
            if !IDENTITY_PROPERTIES.contains(&prop.name.as_str()) {
                return fail(format!(
                    "{} section contains invalid property: {}. Only 'hostname', 'vendor', and 'model' are allowed",
                    self.label, prop.name
                ));
            }
            let is_string = prop
                .value
                .as_ref()
                .and_then(|value| value.as_value())
                .is_some_and(|value| matches!(value, Value::String { .. }));
            if !is_string {
                return fail(format!(
                    "{} property '{}' must be a string",
                    self.label, prop.name
                ));
            }
        }

        for required in IDENTITY_PROPERTIES {
            if section.property(required).is_none() {
                return fail(format!(
                    "{} section is missing required '{}' property",
                    self.label, required
                ));
            }
        }
        Ok(())
    }

    fn validate_properties(&self, _section: &Section) -> Result<(), ValidationError> {
        Ok(())
    }
}
