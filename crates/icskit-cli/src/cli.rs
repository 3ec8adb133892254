//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// icskit - build, read and publish iCalendar files
#[derive(Debug, Parser)]
#[command(name = "icskit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "ICSKIT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Calendar object kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ObjectKind {
    /// VCALENDAR envelope
    Subscription,
    /// VTIMEZONE component
    Timezone,
    /// VEVENT component
    Event,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a calendar object from a TOML table of attributes
    Build {
        #[arg(value_enum)]
        kind: ObjectKind,

        /// TOML file with one string value per attribute
        #[arg(long, short)]
        input: PathBuf,

        /// Override an attribute (can be repeated)
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = crate::input::parse_assignment)]
        overrides: Vec<(String, String)>,
    },

    /// Extract attribute values from calendar text
    Digest {
        /// Calendar file to read
        file: PathBuf,

        /// Object kind whose block and rules are used
        #[arg(long, short, value_enum, required_unless_present = "spec", conflicts_with = "spec")]
        kind: Option<ObjectKind>,

        /// TOML file declaring custom extraction rules
        #[arg(long, short)]
        spec: Option<PathBuf>,

        /// First line of the block to digest (with --spec)
        #[arg(long, requires = "spec", requires = "closing")]
        opening: Option<String>,

        /// Last line of the block to digest (with --spec)
        #[arg(long, requires = "spec", requires = "opening")]
        closing: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Publish a subscription with its time zone
    Publish {
        /// TOML file with [subscription] and [time_zone] tables
        #[arg(long, short)]
        input: PathBuf,
    },

    /// Read a published subscription back
    Fetch {
        /// Public URL returned by publish
        url: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Delete a published subscription
    Remove {
        /// Public URL returned by publish
        url: String,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_build_overrides() {
        let cli = Cli::parse_from([
            "icskit", "build", "timezone", "--input", "tz.toml", "--set", "tzid=UTC", "--set",
            "offset_to=+0000",
        ]);
        match cli.command {
            Command::Build {
                kind, overrides, ..
            } => {
                assert_eq!(kind, ObjectKind::Timezone);
                assert_eq!(
                    overrides,
                    [
                        ("tzid".to_string(), "UTC".to_string()),
                        ("offset_to".to_string(), "+0000".to_string())
                    ]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn digest_needs_kind_or_spec() {
        assert!(Cli::try_parse_from(["icskit", "digest", "cal.ics"]).is_err());
        assert!(
            Cli::try_parse_from(["icskit", "digest", "cal.ics", "--kind", "event", "--spec", "r.toml"])
                .is_err()
        );

        let cli = Cli::try_parse_from(["icskit", "digest", "cal.ics", "--spec", "r.toml"]).unwrap();
        assert!(matches!(cli.command, Command::Digest { spec: Some(_), kind: None, .. }));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["icskit", "remove", "https://cdn/x.ics", "--debug"]);
        assert!(cli.debug);
    }
}
