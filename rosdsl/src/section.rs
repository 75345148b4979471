//! Section specialization.
//!
//! A parsed section only carries its kind tag. [`SpecializedSection`] pairs
//! the section with the validator and translator for that kind, so the
//! driver can treat every root section the same way.

use rosdsl_core::{Section, SectionKind};

use crate::emit::{emit_generic, EmitError};
use crate::translate;
use crate::validate::{
    CustomValidator, DeviceValidator, FirewallValidator, InterfacesValidator, IpValidator,
    RoutingValidator, SectionValidator, ValidationError,
};

/// A root section viewed through its kind-specific behavior.
#[derive(Debug, Clone, Copy)]
pub enum SpecializedSection<'a> {
    Device(&'a Section),
    Interfaces(&'a Section),
    Ip(&'a Section),
    Routing(&'a Section),
    Firewall(&'a Section),
    /// Shares the device rules and identity translation.
    System(&'a Section),
    Custom(&'a Section),
}

impl<'a> SpecializedSection<'a> {
    pub fn from_section(section: &'a Section) -> Self {
        match section.kind {
            SectionKind::Device => SpecializedSection::Device(section),
            SectionKind::Interfaces => SpecializedSection::Interfaces(section),
            SectionKind::Ip => SpecializedSection::Ip(section),
            SectionKind::Routing => SpecializedSection::Routing(section),
            SectionKind::Firewall => SpecializedSection::Firewall(section),
            SectionKind::System => SpecializedSection::System(section),
            SectionKind::Custom => SpecializedSection::Custom(section),
        }
    }

    pub fn section(&self) -> &'a Section {
        match *self {
            SpecializedSection::Device(section)
            | SpecializedSection::Interfaces(section)
            | SpecializedSection::Ip(section)
            | SpecializedSection::Routing(section)
            | SpecializedSection::Firewall(section)
            | SpecializedSection::System(section)
            | SpecializedSection::Custom(section) => section,
        }
    }

    pub fn kind(&self) -> SectionKind {
        match self {
            SpecializedSection::Device(_) => SectionKind::Device,
            SpecializedSection::Interfaces(_) => SectionKind::Interfaces,
            SpecializedSection::Ip(_) => SectionKind::Ip,
            SpecializedSection::Routing(_) => SectionKind::Routing,
            SpecializedSection::Firewall(_) => SectionKind::Firewall,
            SpecializedSection::System(_) => SectionKind::System,
            SpecializedSection::Custom(_) => SectionKind::Custom,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match *self {
            SpecializedSection::Device(section) => DeviceValidator::device().validate(section),
            SpecializedSection::System(section) => DeviceValidator::system().validate(section),
            SpecializedSection::Interfaces(section) => InterfacesValidator.validate(section),
            SpecializedSection::Ip(section) => IpValidator.validate(section),
            SpecializedSection::Routing(section) => RoutingValidator.validate(section),
            SpecializedSection::Firewall(section) => FirewallValidator.validate(section),
            SpecializedSection::Custom(section) => CustomValidator.validate(section),
        }
    }

    /// Command lines for this section, each prefixed with `indent`.
    pub fn translate(&self, indent: &str) -> Result<Vec<String>, EmitError> {
        match *self {
            SpecializedSection::Device(section) | SpecializedSection::System(section) => {
                translate::device::translate(section, self.kind(), indent)
            }
            SpecializedSection::Interfaces(section) => translate::interfaces::translate(section, indent),
            SpecializedSection::Ip(section) => translate::ip::translate(section, indent),
            SpecializedSection::Routing(section) => translate::routing::translate(section, indent),
            SpecializedSection::Firewall(section) => translate::firewall::translate(section, indent),
            SpecializedSection::Custom(section) => emit_generic(section, SectionKind::Custom, indent),
        }
    }
}
