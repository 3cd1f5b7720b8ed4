//! Infrastructure layer module
//!
//! - Configuration loading from the environment and env files
//! - Logging infrastructure

pub mod config;
pub mod logging;
