//! `icskit build`.

use std::path::Path;

use icskit_core::{AttributeSet, Builder, CalendarObject, Event, Subscription, TimeZone};
use tracing::debug;

use crate::cli::ObjectKind;
use crate::error::CliResult;
use crate::input::{attributes_from_table, read_table};

/// Builds one calendar object from an attribute file plus overrides.
pub fn run(
    kind: ObjectKind,
    input: &Path,
    overrides: &[(String, String)],
    builder: &Builder<'_>,
) -> CliResult<String> {
    let mut attributes = attributes_from_table(&read_table(input)?)?;
    for (name, value) in overrides {
        attributes.insert(name.as_str(), value.as_str());
    }
    debug!(kind = ?kind, attributes = attributes.len(), "Building calendar object");

    match kind {
        ObjectKind::Subscription => build_object::<Subscription>(&attributes, builder),
        ObjectKind::Timezone => build_object::<TimeZone>(&attributes, builder),
        ObjectKind::Event => build_object::<Event>(&attributes, builder),
    }
}

fn build_object<T: CalendarObject>(
    attributes: &AttributeSet,
    builder: &Builder<'_>,
) -> CliResult<String> {
    let object = T::from_attributes(attributes)?;
    Ok(object.build(builder)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use icskit_core::CodecError;

    const TIME_ZONE: &str = r#"
tzid = "America/Costa_Rica"
standard_dtstart = "20000101T000000"
offset_from = "-0600"
offset_to = "-0600"
standard_tzname = "DST"
daylight_dtstart = "20000101T000000"
daylight_tzname = "DLT"
"#;

    fn write_input(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn builds_time_zone() {
        let (_dir, path) = write_input(TIME_ZONE);
        let text = run(ObjectKind::Timezone, &path, &[], &Builder::bundled()).unwrap();
        assert!(text.starts_with("BEGIN:VTIMEZONE\r\nTZID:America/Costa_Rica\r\n"));
        assert!(text.ends_with("END:VTIMEZONE\r\n"));
    }

    #[test]
    fn overrides_replace_file_values() {
        let (_dir, path) = write_input(TIME_ZONE);
        let overrides = [("tzid".to_string(), "Europe/Madrid".to_string())];
        let text = run(ObjectKind::Timezone, &path, &overrides, &Builder::bundled()).unwrap();
        assert!(text.contains("TZID:Europe/Madrid\r\n"));
    }

    #[test]
    fn invalid_offset_is_reported() {
        let (_dir, path) = write_input(TIME_ZONE);
        let overrides = [("offset_from".to_string(), "600".to_string())];
        let err = run(ObjectKind::Timezone, &path, &overrides, &Builder::bundled()).unwrap_err();
        assert!(matches!(err, CliError::Codec(CodecError::InvalidArgument { .. })));
    }

    #[test]
    fn missing_attribute_is_reported() {
        let (_dir, path) = write_input("uid = \"1\"\n");
        let err = run(ObjectKind::Event, &path, &[], &Builder::bundled()).unwrap_err();
        assert!(matches!(
            err,
            CliError::Codec(CodecError::MissingAttribute { ref name }) if name == "dtstamp"
        ));
    }
}
