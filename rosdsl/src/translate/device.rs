use rosdsl_core::{quote, Section, SectionKind};

use crate::emit::{emit_nested, Command, EmitError, Verb};

/// Translate a device (or system) section.
///
/// The identity name joins the non-empty `vendor`, `hostname` and `model`
/// values with `_`, falling back to `router`. Nested sections and
/// declarations follow through generic emission.
pub fn translate(
    section: &Section,
    kind: SectionKind,
    indent: &str,
) -> Result<Vec<String>, EmitError> {
    let parts: Vec<String> = ["vendor", "hostname", "model"]
        .into_iter()
        .filter_map(|name| section.text_any(&[name]))
        .collect();
    let name = if parts.is_empty() {
        "router".to_string()
    } else {
        parts.join("_")
    };

    let mut out = vec![Command::new("/system identity", Verb::Set)
        .arg("name", quote(&name))
        .finish(indent)];
    out.extend(emit_nested(section, kind, indent)?);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use rosdsl_core::{Property, Value};

    use super::*;

    #[test]
    fn identity_is_vendor_hostname_model() {
        let section = Section::with_statements(
            "device",
            SectionKind::Device,
            vec![
                Property::new("vendor", Value::string("V")).into(),
                Property::new("model", Value::string("M")).into(),
                Property::new("hostname", Value::string("H")).into(),
            ],
        );
        assert_eq!(
            translate(&section, SectionKind::Device, "").unwrap(),
            vec!["/system identity set name=\"V_H_M\"".to_string()]
        );
    }

    #[test]
    fn empty_parts_are_skipped() {
        let section = Section::with_statements(
            "device",
            SectionKind::Device,
            vec![
                Property::new("vendor", Value::string("mikrotik")).into(),
                Property::new("hostname", Value::string("")).into(),
            ],
        );
        assert_eq!(
            translate(&section, SectionKind::Device, "").unwrap(),
            vec!["/system identity set name=\"mikrotik\"".to_string()]
        );

        let bare = Section::with_statements("device", SectionKind::Device, Vec::new());
        assert_eq!(
            translate(&bare, SectionKind::Device, "").unwrap(),
            vec!["/system identity set name=\"router\"".to_string()]
        );
    }

    #[test]
    fn system_subsections_use_system_paths() {
        let section = Section::with_statements(
            "system",
            SectionKind::System,
            vec![
                Property::new("hostname", Value::string("r1")).into(),
                Section::custom(
                    "clock",
                    vec![Property::new("time-zone-name", Value::string("UTC")).into()],
                )
                .into(),
            ],
        );
        assert_eq!(
            translate(&section, SectionKind::System, "  ").unwrap(),
            vec![
                "  /system identity set name=\"r1\"".to_string(),
                "  /system clock set time-zone-name=\"UTC\"".to_string(),
            ]
        );
    }
}
