//! icskit CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use icskit_core::Builder;
use icskit_core::tracing::{TracingConfig, init_tracing};

use icskit_cli::cli::{Cli, Command, ConfigAction};
use icskit_cli::commands;
use icskit_cli::config::IcskitConfig;
use icskit_cli::error::CliResult;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => IcskitConfig::load_from(path),
        None => IcskitConfig::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let tracing_config = if cli.debug || config.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli, &config) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: &IcskitConfig) -> CliResult<String> {
    let templates = config.template_source();
    let builder = Builder::new(templates.as_ref());

    match cli.command {
        Command::Build {
            kind,
            input,
            overrides,
        } => commands::build::run(kind, &input, &overrides, &builder),
        Command::Digest {
            file,
            kind,
            spec,
            opening,
            closing,
            json,
        } => commands::digest::run(
            &file,
            kind,
            spec.as_deref(),
            opening.as_deref().zip(closing.as_deref()),
            json,
        ),
        Command::Publish { input } => commands::publish::publish(&input, config, &builder),
        Command::Fetch { url, json } => commands::publish::fetch(&url, json, config),
        Command::Remove { url } => commands::publish::remove(&url, config),
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(config, cli.config.as_deref()),
            ConfigAction::Path => Ok(commands::config::path(cli.config.as_deref())),
        },
    }
}
