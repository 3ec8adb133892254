//! CLI configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/icskit/config.toml` by default.

use std::path::{Path, PathBuf};

use icskit_core::{BundledTemplates, DirectoryTemplates, TemplateSource};
use icskit_store::{DirectoryStore, StagingArea};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Configuration for the icskit CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IcskitConfig {
    /// Debug mode.
    pub debug: bool,

    /// Where published calendars are stored.
    pub storage: StorageSettings,

    /// Where calendar files are staged.
    pub staging: StagingSettings,

    /// Template overrides.
    pub templates: TemplateSettings,
}

/// A directory acting as the object store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory published files are copied to.
    pub root: Option<PathBuf>,

    /// URL prefix the directory is served under. Defaults to a `file://` URL.
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagingSettings {
    /// Staging directory. A fresh temporary directory is used when unset.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Directory with `VCalendar.txt`, `VTimeZone.txt` and `VEvent.txt`.
    pub dir: Option<PathBuf>,
}

impl IcskitConfig {
    /// Loads configuration from the default path, or defaults if it is absent.
    pub fn load() -> CliResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("failed to read config: {}", e)))?;
        let config = toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("failed to parse config: {}", e)))?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("icskit")
    }

    /// Opens the configured object store.
    pub fn open_store(&self) -> CliResult<DirectoryStore> {
        let root = self
            .storage
            .root
            .as_ref()
            .ok_or_else(|| CliError::Config("storage.root is not set".to_string()))?;
        let store = match &self.storage.base_url {
            Some(base_url) => DirectoryStore::with_base_url(root, base_url)?,
            None => DirectoryStore::new(root)?,
        };
        Ok(store)
    }

    /// Opens the configured staging area.
    pub fn open_staging(&self) -> CliResult<StagingArea> {
        let staging = match &self.staging.dir {
            Some(dir) => StagingArea::in_dir(dir)?,
            None => StagingArea::temporary()?,
        };
        Ok(staging)
    }

    /// Returns the configured template source.
    pub fn template_source(&self) -> Box<dyn TemplateSource> {
        match &self.templates.dir {
            Some(dir) => Box::new(DirectoryTemplates::new(dir)),
            None => Box::new(BundledTemplates),
        }
    }
}
