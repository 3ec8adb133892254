//! Configuration commands.

use std::path::Path;

use crate::config::IcskitConfig;
use crate::error::{CliError, CliResult};

/// Dumps the effective configuration as TOML.
pub fn dump(config: &IcskitConfig, path: Option<&Path>) -> CliResult<String> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| CliError::Config(format!("failed to serialize config: {}", e)))?;
    Ok(format!("# config.toml ({})\n{}", config_path(path).display(), toml_str))
}

/// Shows the configuration file path.
pub fn path(path: Option<&Path>) -> String {
    format!("config: {}\n", config_path(path).display())
}

fn config_path(path: Option<&Path>) -> std::path::PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(IcskitConfig::default_path)
}
