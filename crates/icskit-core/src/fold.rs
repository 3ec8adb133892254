//! RFC 5545 line folding.
//!
//! Content lines longer than 75 octets (excluding the line break) are split
//! into several physical lines: a CRLF followed by a single space starts
//! each continuation. Folding never splits a multi-byte UTF-8 sequence and
//! never splits an escaped newline token (`\n`).
//!
//! ```
//! use icskit_core::fold::{fold, unfold_line};
//!
//! let line = "DESCRIPTION:".to_string() + &"x".repeat(70);
//! let folded = fold(&line);
//! assert_eq!(folded.split("\r\n").next().unwrap().len(), 75);
//! assert_eq!(unfold_line(&folded), line);
//! ```

/// Maximum octets per physical line, excluding the line break.
pub const MAX_LINE_OCTETS: usize = 75;

/// Line terminator used on the wire.
pub const LINE_BREAK: &str = "\r\n";

const CONTINUATION: &[u8] = b"\r\n ";
const ESCAPED_NEWLINE: &[u8] = b"\\n";

/// Folds one logical line and terminates it with CRLF.
///
/// The input must not contain CRLF itself.
pub fn fold(line: &str) -> String {
    let folded = fold_bytes(line.as_bytes());
    // Whole code points are copied, so valid input stays valid.
    match String::from_utf8(folded) {
        Ok(folded) => folded,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Folds one logical line given as raw bytes.
///
/// Malformed UTF-8 is passed through byte for byte; each stray byte counts
/// as one octet.
pub fn fold_bytes(line: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3 + 2);
    let mut count = 0;
    let mut pos = 0;

    while pos < line.len() {
        let rest = &line[pos..];

        if count >= MAX_LINE_OCTETS - 1 && rest.starts_with(ESCAPED_NEWLINE) {
            out.extend_from_slice(CONTINUATION);
            out.extend_from_slice(ESCAPED_NEWLINE);
            count = 1 + ESCAPED_NEWLINE.len();
            pos += ESCAPED_NEWLINE.len();
            continue;
        }

        let width = unit_width(rest);
        if count + width > MAX_LINE_OCTETS {
            out.extend_from_slice(CONTINUATION);
            count = 1;
        }
        out.extend_from_slice(&rest[..width]);
        count += width;
        pos += width;
    }

    out.extend_from_slice(LINE_BREAK.as_bytes());
    out
}

/// Length of the atomic unit starting at `rest[0]`.
///
/// A multi-byte sequence is sized by its lead byte; a truncated sequence
/// degrades to a single byte.
fn unit_width(rest: &[u8]) -> usize {
    let width = match rest[0] {
        b if b & 0xE0 == 0xC0 => 2,
        b if b & 0xF0 == 0xE0 => 3,
        b if b & 0xF8 == 0xF0 => 4,
        b if b & 0xFC == 0xF8 => 5,
        b if b & 0xFE == 0xFC => 6,
        _ => 1,
    };
    if rest.len() < width { 1 } else { width }
}

/// Removes every fold (CRLF followed by one space or tab).
pub fn unfold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find(LINE_BREAK) {
        let after = &rest[pos + LINE_BREAK.len()..];
        if after.starts_with([' ', '\t']) {
            out.push_str(&rest[..pos]);
            rest = &after[1..];
        } else {
            out.push_str(&rest[..pos + LINE_BREAK.len()]);
            rest = after;
        }
    }
    out.push_str(rest);
    out
}

/// Inverse of [`fold`]: unfolds and drops the final line break.
pub fn unfold_line(folded: &str) -> String {
    let mut line = unfold(folded);
    if line.ends_with(LINE_BREAK) {
        line.truncate(line.len() - LINE_BREAK.len());
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(folded: &str) -> Vec<&str> {
        let body = folded.strip_suffix(LINE_BREAK).expect("missing terminator");
        body.split(LINE_BREAK).collect()
    }

    fn assert_well_folded(folded: &str) {
        for (i, segment) in segments(folded).iter().enumerate() {
            assert!(
                segment.len() <= MAX_LINE_OCTETS,
                "segment {i} has {} octets: {segment:?}",
                segment.len()
            );
            if i > 0 {
                assert!(segment.starts_with(' '), "segment {i} lacks continuation space");
            }
        }
    }

    #[test]
    fn short_line_is_only_terminated() {
        assert_eq!(fold("BEGIN:VCALENDAR"), "BEGIN:VCALENDAR\r\n");
    }

    #[test]
    fn empty_line_is_only_terminated() {
        assert_eq!(fold(""), "\r\n");
    }

    #[test]
    fn exactly_75_octets_is_not_folded() {
        let line = "a".repeat(75);
        assert_eq!(fold(&line), format!("{line}\r\n"));
    }

    #[test]
    fn octet_76_starts_a_continuation() {
        let line = "a".repeat(76);
        assert_eq!(fold(&line), format!("{}\r\n a\r\n", "a".repeat(75)));
    }

    #[test]
    fn continuation_segments_hold_74_content_octets() {
        let line = "a".repeat(150);
        let expected = format!("{}\r\n {}\r\n a\r\n", "a".repeat(75), "a".repeat(74));
        assert_eq!(fold(&line), expected);
    }

    #[test]
    fn multibyte_sequence_moves_to_next_segment() {
        let line = format!("{}é", "a".repeat(74));
        assert_eq!(fold(&line), format!("{}\r\n é\r\n", "a".repeat(74)));

        let line = format!("{}€", "a".repeat(73));
        assert_eq!(fold(&line), format!("{}\r\n €\r\n", "a".repeat(73)));
    }

    #[test]
    fn multibyte_sequence_that_fits_stays() {
        let line = format!("{}é", "a".repeat(73));
        assert_eq!(fold(&line), format!("{line}\r\n"));
    }

    #[test]
    fn escaped_newline_is_never_split() {
        let line = format!("{}\\nb", "a".repeat(74));
        assert_eq!(fold(&line), format!("{}\r\n \\nb\r\n", "a".repeat(74)));
    }

    #[test]
    fn escaped_newline_before_octet_74_is_ordinary() {
        let line = format!("{}\\n", "a".repeat(73));
        assert_eq!(fold(&line), format!("{line}\r\n"));
    }

    #[test]
    fn escaped_newline_resets_counter_to_three() {
        // " \n" plus 72 octets fills the continuation segment exactly.
        let line = format!("{}\\n{}", "a".repeat(74), "b".repeat(73));
        let expected = format!(
            "{}\r\n \\n{}\r\n b\r\n",
            "a".repeat(74),
            "b".repeat(72)
        );
        assert_eq!(fold(&line), expected);
    }

    #[test]
    fn malformed_bytes_pass_through() {
        let line = [b'a', 0xFF, 0x80, b'b', 0xE2, 0x82];
        let mut expected = line.to_vec();
        expected.extend_from_slice(b"\r\n");
        assert_eq!(fold_bytes(&line), expected);
    }

    #[test]
    fn segments_respect_limit_and_code_points() {
        let pieces = ["a", "é", "€", "𝄞", "\\n", " ", "日本語"];
        for len in 60..200 {
            let line: String = (0..len).map(|i| pieces[(i * 7 + len) % pieces.len()]).collect();
            let folded = String::from_utf8(fold_bytes(line.as_bytes()))
                .expect("a code point was split across segments");
            assert_well_folded(&folded);
            assert_eq!(unfold_line(&folded), line);
        }
    }

    #[test]
    fn refolding_unfolded_output_is_identical() {
        let line = format!("DESCRIPTION:{}", "Reunión de equipo \\n ".repeat(12));
        let folded = fold(&line);
        assert_eq!(fold(&unfold_line(&folded)), folded);
    }

    #[test]
    fn unfold_accepts_tab_continuations() {
        assert_eq!(unfold("SUMMARY:Te\r\n\tam\r\nEND"), "SUMMARY:Team\r\nEND");
    }

    #[test]
    fn unfold_keeps_real_line_breaks() {
        assert_eq!(unfold("A:1\r\nB:2\r\n"), "A:1\r\nB:2\r\n");
    }
}
