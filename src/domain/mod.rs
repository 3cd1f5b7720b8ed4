//! Domain layer: the typed configuration snapshot and its errors.
//!
//! Nothing in here knows where values come from; see `infrastructure::config`.

pub mod errors;
pub mod models;

pub use errors::{ConfigError, IssueReason, ValidationIssue};
