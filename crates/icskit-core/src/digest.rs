//! Extraction of attribute values from calendar text.
//!
//! The digester reads values back out of text produced by the
//! [`Builder`](crate::Builder). Two rule kinds exist:
//!
//! - single-line rules run their pattern over the unfolded block and take
//!   the first capture group;
//! - free-text rules collect everything from a line matching a start
//!   pattern up to (excluding) the next line matching an end pattern,
//!   rejoining folded continuation lines.

use crate::attributes::{AttributeSet, AttributeSpec, ExtractionRule};
use crate::error::{CodecError, CodecResult};
use crate::fold::{LINE_BREAK, unfold};

use regex::Regex;

/// Extracts every attribute of `spec` from `block`, in declaration order.
///
/// The first attribute that cannot be found aborts the whole digest.
pub fn digest(block: &str, spec: &AttributeSpec) -> CodecResult<AttributeSet> {
    let unfolded = unfold(block);
    let mut attributes = AttributeSet::new();
    for (name, rule) in spec.iter() {
        let value = apply(block, &unfolded, rule)
            .ok_or_else(|| CodecError::attribute_not_found(name, block))?;
        attributes.insert(name, value);
    }
    Ok(attributes)
}

/// Applies one rule to `block`.
pub fn extract(block: &str, rule: &ExtractionRule) -> Option<String> {
    match rule {
        ExtractionRule::SingleLineMatch(_) => apply(block, &unfold(block), rule),
        ExtractionRule::DelimitedBlock { .. } => apply(block, "", rule),
    }
}

/// Single-line patterns see `unfolded`; free text scans the physical lines
/// of `block`.
fn apply(block: &str, unfolded: &str, rule: &ExtractionRule) -> Option<String> {
    match rule {
        ExtractionRule::SingleLineMatch(pattern) => pattern
            .captures(unfolded)
            .and_then(|caps| caps.get(1))
            .map(|value| value.as_str().to_string()),
        ExtractionRule::DelimitedBlock { start, end } => {
            let content = delimited(block, start, end);
            (!content.is_empty()).then_some(content)
        }
    }
}

fn delimited(block: &str, start: &Regex, end: &Regex) -> String {
    let mut content = String::new();
    let mut started = false;

    for line in block.split(LINE_BREAK) {
        if let Some(found) = start.find(line) {
            let rest = &line[found.end()..];
            if found.as_str().ends_with(':') {
                content.push_str(rest);
            } else {
                content.push_str(strip_parameters(rest));
            }
            started = true;
            continue;
        }
        if !started {
            continue;
        }
        if end.is_match(line) {
            break;
        }
        content.push_str(strip_leading_whitespace(line));
    }

    content
}

/// Drops a property parameter list and the value separator left after a
/// start match on the property name (`;LANGUAGE=EN:value` -> `value`).
fn strip_parameters(rest: &str) -> &str {
    if rest.starts_with([';', ':']) {
        rest.split_once(':').map_or("", |(_, value)| value)
    } else {
        rest
    }
}

fn strip_leading_whitespace(line: &str) -> &str {
    let mut chars = line.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() => chars.as_str(),
        _ => line,
    }
}

/// Returns the component block that starts with a line beginning with
/// `opening` and ends with the first later line beginning with `closing`.
///
/// Both tag lines are part of the block, including the closing line break.
pub fn block_between<'a>(text: &'a str, opening: &str, closing: &str) -> CodecResult<&'a str> {
    let not_found = || CodecError::block_not_found(opening, closing);

    let begin = line_starts(text)
        .find(|&pos| text[pos..].starts_with(opening))
        .ok_or_else(not_found)?;
    let close = line_starts(text)
        .filter(|&pos| pos > begin)
        .find(|&pos| text[pos..].starts_with(closing))
        .ok_or_else(not_found)?;

    let end = text[close..]
        .find(LINE_BREAK)
        .map_or(text.len(), |pos| close + pos + LINE_BREAK.len());
    Ok(&text[begin..end])
}

/// Byte offsets at which physical lines start.
fn line_starts(text: &str) -> impl Iterator<Item = usize> + '_ {
    std::iter::once(0).chain(
        text.match_indices(LINE_BREAK)
            .map(|(pos, _)| pos + LINE_BREAK.len())
            .filter(move |&pos| pos < text.len()),
    )
}
