//! Attribute input files.
//!
//! Attributes are given as TOML tables of `name = "value"` pairs. Numbers and
//! booleans are accepted and converted to their text form.

use std::path::Path;

use icskit_core::AttributeSet;
use toml::{Table, Value};

use crate::error::{CliError, CliResult};

/// Reads a TOML file into a table.
pub fn read_table(path: &Path) -> CliResult<Table> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::Input(format!("failed to read {}: {}", path.display(), e)))?;
    content
        .parse::<Table>()
        .map_err(|e| CliError::Input(format!("failed to parse {}: {}", path.display(), e)))
}

/// Converts a flat table into an attribute set.
pub fn attributes_from_table(table: &Table) -> CliResult<AttributeSet> {
    table
        .iter()
        .map(|(name, value)| {
            let text = match value {
                Value::String(text) => text.clone(),
                Value::Integer(number) => number.to_string(),
                Value::Float(number) => number.to_string(),
                Value::Boolean(flag) => flag.to_string(),
                other => {
                    return Err(CliError::Input(format!(
                        "attribute {name} must be a string, found {}",
                        other.type_str()
                    )));
                }
            };
            Ok((name.clone(), text))
        })
        .collect()
}

/// Returns the attribute set in the named sub-table of `table`.
pub fn section(table: &Table, name: &str) -> CliResult<AttributeSet> {
    match table.get(name) {
        Some(Value::Table(section)) => attributes_from_table(section),
        Some(other) => Err(CliError::Input(format!(
            "[{name}] must be a table, found {}",
            other.type_str()
        ))),
        None => Err(CliError::Input(format!("missing [{name}] table"))),
    }
}

/// Parses a `NAME=VALUE` command-line override.
pub fn parse_assignment(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got {arg:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_table_becomes_attributes() {
        let table: Table = r#"
            tzid = "America/Costa_Rica"
            offset_from = "-0600"
            year = 2000
        "#
        .parse()
        .unwrap();

        let attributes = attributes_from_table(&table).unwrap();
        assert_eq!(attributes.get("tzid"), Some("America/Costa_Rica"));
        assert_eq!(attributes.get("offset_from"), Some("-0600"));
        assert_eq!(attributes.get("year"), Some("2000"));
    }

    #[test]
    fn nested_values_are_rejected() {
        let table: Table = "tzid = [\"a\", \"b\"]".parse().unwrap();
        let err = attributes_from_table(&table).unwrap_err();
        assert!(err.to_string().contains("tzid"));
    }

    #[test]
    fn sections_must_be_tables() {
        let table: Table = r#"
            time_zone = "UTC"
            [subscription]
            prodid = "@example.com"
        "#
        .parse()
        .unwrap();

        assert_eq!(
            section(&table, "subscription").unwrap().get("prodid"),
            Some("@example.com")
        );
        assert!(section(&table, "time_zone").is_err());
        assert!(section(&table, "event").is_err());
    }

    #[test]
    fn assignments() {
        assert_eq!(
            parse_assignment("summary=Room = 4").unwrap(),
            ("summary".to_string(), "Room = 4".to_string())
        );
        assert_eq!(
            parse_assignment("cal_desc=").unwrap(),
            ("cal_desc".to_string(), String::new())
        );
        assert!(parse_assignment("=x").is_err());
        assert!(parse_assignment("summary").is_err());
    }

    #[test]
    fn missing_file_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_table(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, CliError::Input(_)));
    }
}
