//! Command implementations.
//!
//! Every command returns the text to print on stdout.

pub mod build;
pub mod config;
pub mod digest;
pub mod publish;

use icskit_core::AttributeSet;

use crate::error::{CliError, CliResult};

/// Renders attributes as `name: value` lines, or as a JSON object.
pub fn format_attributes(attributes: &AttributeSet, json: bool) -> CliResult<String> {
    if json {
        return to_json(attributes);
    }
    Ok(attributes
        .iter()
        .map(|(name, value)| format!("{name}: {value}\n"))
        .collect())
}

/// Pretty JSON terminated by a newline.
pub fn to_json<T: serde::Serialize>(value: &T) -> CliResult<String> {
    let mut text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Output(format!("failed to serialize JSON: {}", e)))?;
    text.push('\n');
    Ok(text)
}
