//! Calendar object templates.
//!
//! A template is plain text with `{attribute_name}` placeholders. Templates
//! come from a [`TemplateSource`]: the ones compiled into the crate
//! ([`BundledTemplates`]) or a directory of overrides
//! ([`DirectoryTemplates`]).

use std::io;
use std::path::{Path, PathBuf};

use crate::attributes::AttributeSet;
use crate::error::{CodecError, CodecResult};

/// Template for the VCALENDAR envelope of a subscription.
pub const VCALENDAR_TEMPLATE: &str = "VCalendar.txt";
/// Template for a VTIMEZONE component.
pub const VTIMEZONE_TEMPLATE: &str = "VTimeZone.txt";
/// Template for a VEVENT component.
pub const VEVENT_TEMPLATE: &str = "VEvent.txt";

static BUNDLED: &[(&str, &str)] = &[
    (VCALENDAR_TEMPLATE, include_str!("../templates/VCalendar.txt")),
    (VTIMEZONE_TEMPLATE, include_str!("../templates/VTimeZone.txt")),
    (VEVENT_TEMPLATE, include_str!("../templates/VEvent.txt")),
];

/// Read-only provider of template text by name.
pub trait TemplateSource {
    /// Returns the full text of the named template.
    fn load(&self, name: &str) -> CodecResult<String>;
}

/// Templates compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledTemplates;

impl BundledTemplates {
    /// Names of all bundled templates.
    pub fn names() -> impl Iterator<Item = &'static str> {
        BUNDLED.iter().map(|(name, _)| *name)
    }
}

impl TemplateSource for BundledTemplates {
    fn load(&self, name: &str) -> CodecResult<String> {
        BUNDLED
            .iter()
            .find(|(bundled, _)| *bundled == name)
            .map(|(_, text)| (*text).to_string())
            .ok_or_else(|| CodecError::TemplateNotFound {
                name: name.to_string(),
            })
    }
}

/// Templates read from `<root>/<name>`.
#[derive(Debug, Clone)]
pub struct DirectoryTemplates {
    root: PathBuf,
}

impl DirectoryTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateSource for DirectoryTemplates {
    fn load(&self, name: &str) -> CodecResult<String> {
        let path = self.root.join(name);
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => CodecError::TemplateNotFound {
                name: name.to_string(),
            },
            _ => CodecError::resource(format!("template {}", path.display()), e),
        })
    }
}

/// Replaces `{name}` placeholders with attribute values in a single pass.
///
/// Substituted values are never scanned again, and placeholders without a
/// matching attribute are kept verbatim.
pub fn fill(template: &str, attributes: &AttributeSet) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replacement = after
            .find('}')
            .and_then(|close| attributes.get(&after[..close]).map(|value| (close, value)));

        match replacement {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_occurrence() {
        let attrs = AttributeSet::new().with("language", "EN").with("cal_name", "Team");
        let text = fill("X-WR-CALNAME;LANGUAGE={language}:{cal_name} ({language})", &attrs);
        assert_eq!(text, "X-WR-CALNAME;LANGUAGE=EN:Team (EN)");
    }

    #[test]
    fn values_are_not_rescanned() {
        let attrs = AttributeSet::new()
            .with("summary", "{location}")
            .with("location", "Room 4");
        assert_eq!(fill("{summary}|{location}", &attrs), "{location}|Room 4");
    }

    #[test]
    fn unknown_placeholders_are_kept() {
        let attrs = AttributeSet::new().with("tzid", "UTC");
        assert_eq!(fill("{tzid} {unknown} {", &attrs), "UTC {unknown} {");
        assert_eq!(fill("{{tzid}}", &attrs), "{UTC}");
    }

    #[test]
    fn bundled_templates_are_available() {
        let names: Vec<_> = BundledTemplates::names().collect();
        assert_eq!(names, [VCALENDAR_TEMPLATE, VTIMEZONE_TEMPLATE, VEVENT_TEMPLATE]);

        let text = BundledTemplates.load(VTIMEZONE_TEMPLATE).unwrap();
        assert!(text.starts_with("BEGIN:VTIMEZONE\n"));
        assert!(matches!(
            BundledTemplates.load("VTodo.txt"),
            Err(CodecError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn directory_templates_read_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("VCustom.txt"), "BEGIN:VCUSTOM\n").unwrap();

        let source = DirectoryTemplates::new(dir.path());
        assert_eq!(source.load("VCustom.txt").unwrap(), "BEGIN:VCUSTOM\n");
        assert!(matches!(
            source.load("VMissing.txt"),
            Err(CodecError::TemplateNotFound { .. })
        ));
    }
}
