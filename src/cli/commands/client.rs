//! Implementation of the `crm-env client` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::cli::EnvironmentInput;
use crate::domain::models::ClientConfig;
use crate::infrastructure::config::ConfigLoader;

#[derive(Args, Debug, Default)]
pub struct ClientArgs {
    /// Prefix each line with `export ` for shell sourcing
    #[arg(long)]
    pub export: bool,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ClientOutput {
    config: ClientConfig,
    #[serde(skip)]
    export: bool,
}

impl CommandOutput for ClientOutput {
    fn to_human(&self) -> String {
        self.config
            .to_public_env()
            .into_iter()
            .map(|(key, value)| {
                if self.export {
                    format!("export {key}={}", shell_quote(&value))
                } else {
                    format!("{key}={}", dotenv_quote(&value))
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Single-quote for POSIX `sh`; nothing inside single quotes is expanded.
/// An embedded `'` closes the quote, emits an escaped quote and reopens.
fn shell_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-.,/:@%+=".contains(c));
    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

/// Double-quote for dotenv files. `$` is escaped so it is not substituted.
fn dotenv_quote(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\'' | '$' | '\\' | '`'));
    if needs_quotes {
        let escaped = value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\'', "\\'")
            .replace('$', "\\$");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

pub fn execute(args: &ClientArgs, input: &EnvironmentInput, json_mode: bool) -> Result<()> {
    let result = run(args, input)?;
    output(&result, json_mode);
    Ok(())
}

/// # Errors
/// Returns the validation error when the environment is invalid
pub fn run(args: &ClientArgs, input: &EnvironmentInput) -> Result<ClientOutput> {
    let snapshot = ConfigLoader::load(&input.raw, &input.options)?;
    Ok(ClientOutput {
        config: snapshot.client().clone(),
        export: args.export,
    })
}
