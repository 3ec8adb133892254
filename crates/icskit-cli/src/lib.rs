//! The `icskit` command-line interface: building, digesting and publishing
//! iCalendar files.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;

pub use cli::Cli;
pub use config::IcskitConfig;
pub use error::{CliError, CliResult};
