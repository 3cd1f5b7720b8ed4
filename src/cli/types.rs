//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::commands::check::CheckArgs;
use crate::cli::commands::client::ClientArgs;
use crate::cli::commands::schema::SchemaArgs;

#[derive(Parser, Debug)]
#[command(name = "crm-env")]
#[command(about = "Validate and inspect the GWM CRM environment configuration", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Directory holding the .env files
    #[arg(long, global = true, env = "CRM_ENV_DIR", default_value = ".")]
    pub env_dir: PathBuf,

    /// Read the process environment only
    #[arg(long, global = true)]
    pub no_env_files: bool,

    /// Bypass validation (SKIP_ENV_VALIDATION is honored as well)
    #[arg(long, global = true)]
    pub skip_validation: bool,

    /// Also write JSON logs to a rotating file in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the environment and show every resolved key
    Check(CheckArgs),

    /// Print the client-exposed (NEXT_PUBLIC_*) values
    Client(ClientArgs),

    /// List the declared keys
    Schema(SchemaArgs),
}
