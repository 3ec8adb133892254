//! Attribute sets and extraction specs.
//!
//! An [`AttributeSet`] carries the named string values that are filled into
//! a template or digested out of calendar text. An [`AttributeSpec`] says,
//! for every attribute of an object kind, how to find its value in text.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{CodecError, CodecResult};

// ---------------------------------------------------------------------------
// AttributeSet
// ---------------------------------------------------------------------------

/// Insertion-ordered map of attribute name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    entries: Vec<(String, String)>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`.
    ///
    /// Replacing an existing value keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the value of a required attribute.
    ///
    /// Absent and empty values both count as missing.
    pub fn require(&self, name: &str) -> CodecResult<&str> {
        match self.get(name) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(CodecError::missing_attribute(name)),
        }
    }

    /// Checks that every name in `schema` has a non-empty value.
    ///
    /// Reports the first missing name in schema order.
    pub fn validate(&self, schema: &[&str]) -> CodecResult<()> {
        schema.iter().try_for_each(|name| self.require(name).map(|_| ()))
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

impl Serialize for AttributeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Rule declarations
// ---------------------------------------------------------------------------

/// Kind of extraction rule, as named in textual declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// `REGEX`: one pattern, one capture group.
    SingleLine,
    /// `FREE_TEXT`: start and end patterns around multi-line content.
    FreeText,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleLine => "REGEX",
            Self::FreeText => "FREE_TEXT",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = CodecError;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind {
            "REGEX" => Ok(Self::SingleLine),
            "FREE_TEXT" => Ok(Self::FreeText),
            other => Err(CodecError::UnknownExtractionRule {
                kind: other.to_string(),
            }),
        }
    }
}

/// An uncompiled extraction rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleDecl<'a> {
    SingleLineMatch(&'a str),
    DelimitedBlock { start: &'a str, end: &'a str },
}

impl<'a> RuleDecl<'a> {
    /// Builds a declaration from a kind name and its patterns.
    ///
    /// `end` is required for `FREE_TEXT` rules and ignored otherwise.
    pub fn parse(
        name: &str,
        kind: &str,
        pattern: &'a str,
        end: Option<&'a str>,
    ) -> CodecResult<Self> {
        match kind.parse::<RuleKind>()? {
            RuleKind::SingleLine => Ok(Self::SingleLineMatch(pattern)),
            RuleKind::FreeText => {
                let end = end.ok_or_else(|| CodecError::InvalidPattern {
                    name: name.to_string(),
                    pattern: pattern.to_string(),
                    reason: "FREE_TEXT rules need an end pattern".to_string(),
                })?;
                Ok(Self::DelimitedBlock {
                    start: pattern,
                    end,
                })
            }
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            Self::SingleLineMatch(_) => RuleKind::SingleLine,
            Self::DelimitedBlock { .. } => RuleKind::FreeText,
        }
    }
}

// ---------------------------------------------------------------------------
// Compiled spec
// ---------------------------------------------------------------------------

/// A compiled extraction rule.
#[derive(Debug, Clone)]
pub enum ExtractionRule {
    /// Applied to the unfolded block; the first capture group is the value.
    SingleLineMatch(Regex),
    /// Content between a line matching `start` and a line matching `end`.
    DelimitedBlock { start: Regex, end: Regex },
}

impl ExtractionRule {
    fn compile(name: &str, decl: &RuleDecl<'_>) -> CodecResult<Self> {
        match *decl {
            RuleDecl::SingleLineMatch(pattern) => {
                let regex = compile_pattern(name, pattern)?;
                if regex.captures_len() != 2 {
                    return Err(CodecError::InvalidPattern {
                        name: name.to_string(),
                        pattern: pattern.to_string(),
                        reason: format!(
                            "expected exactly one capture group, found {}",
                            regex.captures_len() - 1
                        ),
                    });
                }
                Ok(Self::SingleLineMatch(regex))
            }
            RuleDecl::DelimitedBlock { start, end } => Ok(Self::DelimitedBlock {
                start: compile_pattern(name, start)?,
                end: compile_pattern(name, end)?,
            }),
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            Self::SingleLineMatch(_) => RuleKind::SingleLine,
            Self::DelimitedBlock { .. } => RuleKind::FreeText,
        }
    }
}

fn compile_pattern(name: &str, pattern: &str) -> CodecResult<Regex> {
    Regex::new(pattern).map_err(|e| CodecError::InvalidPattern {
        name: name.to_string(),
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Ordered attribute name to extraction rule mapping for one object kind.
#[derive(Debug, Clone)]
pub struct AttributeSpec {
    rules: Vec<(String, ExtractionRule)>,
}

impl AttributeSpec {
    /// Compiles rule declarations, in order.
    ///
    /// Fails on an uncompilable pattern or an attribute declared twice.
    pub fn compile<'a, I, N>(decls: I) -> CodecResult<Self>
    where
        I: IntoIterator<Item = (N, RuleDecl<'a>)>,
        N: Into<String>,
    {
        let mut rules: Vec<(String, ExtractionRule)> = Vec::new();
        for (name, decl) in decls {
            let name = name.into();
            if rules.iter().any(|(existing, _)| *existing == name) {
                return Err(CodecError::DuplicateRule { name });
            }
            let rule = ExtractionRule::compile(&name, &decl)?;
            rules.push((name, rule));
        }
        Ok(Self { rules })
    }

    /// Checks that every attribute of `schema` has a rule.
    pub fn ensure_covers(&self, schema: &[&str]) -> CodecResult<()> {
        match schema.iter().find(|name| self.rule(name).is_none()) {
            Some(name) => Err(CodecError::MissingRule {
                name: name.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Compiles declarations and checks them against `schema` in one step.
    pub fn for_schema<'a>(
        schema: &[&str],
        decls: impl IntoIterator<Item = (&'a str, RuleDecl<'a>)>,
    ) -> CodecResult<Self> {
        let spec = Self::compile(decls)?;
        spec.ensure_covers(schema)?;
        Ok(spec)
    }

    pub fn rule(&self, name: &str) -> Option<&ExtractionRule> {
        self.rules
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, rule)| rule)
    }

    /// Iterates rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtractionRule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_keeps_insertion_order() {
        let set = AttributeSet::new()
            .with("tzid", "America/Costa_Rica")
            .with("offset_from", "-0600")
            .with("tzid", "Europe/Madrid");

        let names: Vec<_> = set.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["tzid", "offset_from"]);
        assert_eq!(set.get("tzid"), Some("Europe/Madrid"));
    }

    #[test]
    fn validate_reports_first_missing_in_schema_order() {
        let set = AttributeSet::new().with("b", "1").with("d", "");
        let err = set.validate(&["a", "b", "c", "d"]).unwrap_err();
        assert_eq!(err.attribute(), Some("a"));

        let set = set.with("a", "x").with("c", "y");
        let err = set.validate(&["a", "b", "c", "d"]).unwrap_err();
        assert!(matches!(err, CodecError::MissingAttribute { ref name } if name == "d"));
    }

    #[test]
    fn serializes_as_ordered_map() {
        let set = AttributeSet::new().with("z", "1").with("a", "2");
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"{"z":"1","a":"2"}"#);
    }

    #[test]
    fn rule_kinds_parse_from_text() {
        assert_eq!("REGEX".parse::<RuleKind>().unwrap(), RuleKind::SingleLine);
        assert_eq!("FREE_TEXT".parse::<RuleKind>().unwrap(), RuleKind::FreeText);

        let err = "XPATH".parse::<RuleKind>().unwrap_err();
        assert!(matches!(err, CodecError::UnknownExtractionRule { ref kind } if kind == "XPATH"));
    }

    #[test]
    fn free_text_declaration_needs_end_pattern() {
        let decl = RuleDecl::parse("cal_name", "FREE_TEXT", "^X-WR-CALNAME", Some("^X-WR-CALDESC"));
        assert_eq!(decl.unwrap().kind(), RuleKind::FreeText);

        let err = RuleDecl::parse("cal_name", "FREE_TEXT", "^X-WR-CALNAME", None).unwrap_err();
        assert_eq!(err.attribute(), Some("cal_name"));
    }

    #[test]
    fn compile_rejects_duplicates_and_bad_groups() {
        let err = AttributeSpec::compile([
            ("uid", RuleDecl::SingleLineMatch("(?m)^UID:(.*)$")),
            ("uid", RuleDecl::SingleLineMatch("(?m)^UID:(.*)$")),
        ])
        .unwrap_err();
        assert!(matches!(err, CodecError::DuplicateRule { .. }));

        let err = AttributeSpec::compile([("uid", RuleDecl::SingleLineMatch("^UID:.*$"))])
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidPattern { .. }));

        let err = AttributeSpec::compile([("uid", RuleDecl::SingleLineMatch("^UID:(.*$"))])
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidPattern { .. }));
    }

    #[test]
    fn schema_coverage_is_checked() {
        let err = AttributeSpec::for_schema(
            &["uid", "summary"],
            [("uid", RuleDecl::SingleLineMatch("(?m)^UID:(.*)$"))],
        )
        .unwrap_err();
        assert!(matches!(err, CodecError::MissingRule { ref name } if name == "summary"));
    }
}
