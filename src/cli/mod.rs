//! Command-line interface for inspecting a deployment's environment.

pub mod commands;
pub mod output;
pub mod types;

use anyhow::{Context, Result};

use crate::domain::ConfigError;
use crate::infrastructure::config::{assemble, LoadOptions, RawEnvironment};
use crate::infrastructure::logging::{LogConfig, LoggerImpl};

pub use types::{Cli, Commands};

/// Raw environment plus the options it will be loaded with
#[derive(Debug, Clone)]
pub struct EnvironmentInput {
    pub raw: RawEnvironment,
    pub options: LoadOptions,
}

impl EnvironmentInput {
    /// Assemble the raw environment the way the global flags ask for
    ///
    /// # Errors
    /// Returns an error if an env file cannot be read or parsed
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let env_dir = (!cli.no_env_files).then_some(cli.env_dir.as_path());
        let raw = assemble(env_dir).context("Failed to read environment files")?;

        let options = LoadOptions::from_environment(&raw);
        let options = options.skip_validation(options.skip_validation || cli.skip_validation);

        Ok(Self { raw, options })
    }
}

/// Install the logger, or warn on stderr and carry on without one
pub fn init_logging(config: &LogConfig) -> Option<LoggerImpl> {
    match LoggerImpl::init(config) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("Warning: logging disabled: {err:#}");
            None
        }
    }
}

/// Dispatch the parsed command
///
/// # Errors
/// Propagates command failures, including validation errors
pub fn run(cli: &Cli, input: &EnvironmentInput) -> Result<()> {
    match &cli.command {
        Commands::Check(args) => commands::check::execute(args, input, cli.json),
        Commands::Client(args) => commands::client::execute(args, input, cli.json),
        Commands::Schema(args) => commands::schema::execute(args, cli.json),
    }
}

/// Print the error and exit with status 1
pub fn handle_error(err: &anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&error_json(err)).unwrap_or_default()
        );
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1)
}

fn error_json(err: &anyhow::Error) -> serde_json::Value {
    let issues: Vec<_> = err
        .downcast_ref::<ConfigError>()
        .map(ConfigError::issues)
        .unwrap_or_default()
        .iter()
        .map(|issue| {
            serde_json::json!({
                "key": issue.key,
                "reason": issue.reason.to_string(),
            })
        })
        .collect();

    serde_json::json!({
        "success": false,
        "error": format!("{err:#}"),
        "issues": issues,
    })
}
