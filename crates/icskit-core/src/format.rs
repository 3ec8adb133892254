//! Formatting of filled templates into wire text.

use crate::fold::{LINE_BREAK, fold};

/// Splits text into logical lines.
///
/// A line break is an optional CR followed by LF. A trailing line break
/// does not produce an empty last line.
pub fn logical_lines(text: &str) -> impl Iterator<Item = &str> {
    let body = text.strip_suffix('\n').unwrap_or(text);
    let empty = text.is_empty();
    body.split('\n')
        .filter(move |_| !empty)
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// Folds every logical line of `text` and joins them with CRLF.
///
/// The result ends with CRLF.
pub fn format_content(text: &str) -> String {
    logical_lines(text).map(fold).collect()
}

/// Inserts a formatted component before the last physical line of `outer`.
///
/// Used to nest a VTIMEZONE inside a VCALENDAR, right before its closing
/// `END:` line.
pub fn embed_component(outer: &str, inner: &str) -> String {
    let body = outer.strip_suffix(LINE_BREAK).unwrap_or(outer);
    let split = body.rfind(LINE_BREAK).map_or(0, |pos| pos + LINE_BREAK.len());

    let mut out = String::with_capacity(outer.len() + inner.len());
    out.push_str(&outer[..split]);
    out.push_str(inner);
    out.push_str(&outer[split..]);
    out
}
