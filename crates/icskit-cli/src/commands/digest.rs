//! `icskit digest`.
//!
//! Custom rule files list one `[[rule]]` table per attribute:
//!
//! ```toml
//! [[rule]]
//! name = "uid"
//! kind = "REGEX"
//! pattern = '(?m)^UID:([^\r\n]+)'
//!
//! [[rule]]
//! name = "summary"
//! kind = "FREE_TEXT"
//! pattern = "^SUMMARY"
//! end = "^DESCRIPTION"
//! ```

use std::path::Path;

use icskit_core::{
    AttributeSet, AttributeSpec, CalendarObject, CodecResult, Event, RuleDecl, Subscription,
    TimeZone, block_between, digest,
};
use serde::Deserialize;
use tracing::debug;

use super::format_attributes;
use crate::cli::ObjectKind;
use crate::error::{CliError, CliResult};

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default, rename = "rule")]
    rules: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize)]
struct RuleEntry {
    name: String,
    kind: String,
    pattern: String,
    end: Option<String>,
}

/// Digests `file` with the rules of `kind` or of the rule file `spec`.
///
/// `block` limits a custom digest to the lines between an opening and a
/// closing tag.
pub fn run(
    file: &Path,
    kind: Option<ObjectKind>,
    spec: Option<&Path>,
    block: Option<(&str, &str)>,
    json: bool,
) -> CliResult<String> {
    let text = std::fs::read_to_string(file)
        .map_err(|e| CliError::Input(format!("failed to read {}: {}", file.display(), e)))?;

    let attributes = match (kind, spec) {
        (Some(kind), _) => digest_kind(kind, &text)?,
        (None, Some(spec)) => {
            let spec = load_rules(spec)?;
            let block = match block {
                Some((opening, closing)) => block_between(&text, opening, closing)?,
                None => text.as_str(),
            };
            digest(block, &spec)?
        }
        (None, None) => {
            return Err(CliError::Input("either --kind or --spec is required".to_string()));
        }
    };
    format_attributes(&attributes, json)
}

/// Digests the block of a built-in object kind.
pub fn digest_kind(kind: ObjectKind, text: &str) -> CliResult<AttributeSet> {
    match kind {
        ObjectKind::Subscription => digest_object::<Subscription>(text),
        ObjectKind::Timezone => digest_object::<TimeZone>(text),
        ObjectKind::Event => digest_object::<Event>(text),
    }
}

fn digest_object<T: CalendarObject>(text: &str) -> CliResult<AttributeSet> {
    let block = block_between(text, T::OPENING_TAG, T::CLOSING_TAG)?;
    let attributes = digest(block, T::spec())?;
    T::from_attributes(&attributes)?;
    Ok(attributes)
}

/// Compiles the rules of a TOML rule file.
pub fn load_rules(path: &Path) -> CliResult<AttributeSpec> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::Input(format!("failed to read {}: {}", path.display(), e)))?;
    let file: RuleFile = toml::from_str(&content)
        .map_err(|e| CliError::Input(format!("failed to parse {}: {}", path.display(), e)))?;

    let decls = file
        .rules
        .iter()
        .map(|rule| {
            RuleDecl::parse(&rule.name, &rule.kind, &rule.pattern, rule.end.as_deref())
                .map(|decl| (rule.name.as_str(), decl))
        })
        .collect::<CodecResult<Vec<_>>>()?;
    debug!(path = %path.display(), rules = decls.len(), "Loaded extraction rules");
    Ok(AttributeSpec::compile(decls)?)
}
