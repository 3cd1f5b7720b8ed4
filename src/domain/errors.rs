//! Configuration errors.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single key was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueReason {
    /// Required value is absent (or empty)
    Missing,
    InvalidUrl,
    InvalidEmail,
    /// Not a base-10 integer, or out of range for the field
    InvalidInteger,
    NotOneOf { allowed: &'static [&'static str] },
}

impl fmt::Display for IssueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("required"),
            Self::InvalidUrl => f.write_str("invalid url"),
            Self::InvalidEmail => f.write_str("invalid email"),
            Self::InvalidInteger => f.write_str("expected a base-10 integer"),
            Self::NotOneOf { allowed } => {
                write!(f, "expected one of: {}", allowed.join(", "))
            }
        }
    }
}

/// A rejected key together with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub key: &'static str,
    pub reason: IssueReason,
}

impl ValidationIssue {
    pub const fn new(key: &'static str, reason: IssueReason) -> Self {
        Self { key, reason }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.reason)
    }
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("\n  {issue}"))
        .collect()
}

/// Errors raised while assembling or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variables:{}", format_issues(.issues))]
    Validation { issues: Vec<ValidationIssue> },

    #[error("Failed to read env file {}: {message}", .path.display())]
    EnvFile { path: PathBuf, message: String },
}

impl ConfigError {
    /// Validation issues, empty for non-validation errors
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Self::Validation { issues } => issues,
            Self::EnvFile { .. } => &[],
        }
    }

    /// Whether `key` is among the rejected keys
    pub fn rejects(&self, key: &str) -> bool {
        self.issues().iter().any(|issue| issue.key == key)
    }
}
