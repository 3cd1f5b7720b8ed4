//! Per-kind validation and coercion of raw string values.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use super::schema::ValueKind;
use crate::domain::IssueReason;

// Local part, then dot-separated domain labels ending in a 2+ letter TLD.
// Leading dots and ".." runs are rejected separately (no lookaround here).
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@(?:[A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
        .expect("email pattern compiles")
});

/// A coerced value, before it is mapped onto the typed snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Text(String),
    Flag(bool),
    Integer(u64),
}

impl ConfigValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub const fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(value) => Some(*value),
            _ => None,
        }
    }

    pub const fn as_integer(&self) -> Option<u64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }
}

impl std::fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Flag(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
        }
    }
}

/// Validate `value` against `kind`.
///
/// `platform_marker_set` reports whether a named platform variable is
/// present; only [`ValueKind::UrlUnlessPlatform`] consults it.
pub fn coerce(
    kind: ValueKind,
    value: &str,
    platform_marker_set: impl Fn(&str) -> bool,
) -> Result<ConfigValue, IssueReason> {
    match kind {
        ValueKind::Text => Ok(ConfigValue::Text(value.to_string())),
        ValueKind::Url => parse_url(value),
        ValueKind::UrlUnlessPlatform(marker) => {
            if platform_marker_set(marker) {
                Ok(ConfigValue::Text(value.to_string()))
            } else {
                parse_url(value)
            }
        }
        ValueKind::Email => {
            if is_email(value) {
                Ok(ConfigValue::Text(value.to_string()))
            } else {
                Err(IssueReason::InvalidEmail)
            }
        }
        ValueKind::Flag => Ok(ConfigValue::Flag(parse_flag(value))),
        ValueKind::Integer { max } => parse_integer(value, max).map(ConfigValue::Integer),
        ValueKind::OneOf(allowed) => {
            if allowed.contains(&value) {
                Ok(ConfigValue::Text(value.to_string()))
            } else {
                Err(IssueReason::NotOneOf { allowed })
            }
        }
    }
}

/// Only the literal `"true"` is true
pub fn parse_flag(value: &str) -> bool {
    value == "true"
}

/// Strict base-10 parse; no whitespace, no trailing garbage
pub fn parse_integer(value: &str, max: u64) -> Result<u64, IssueReason> {
    match value.parse::<u64>() {
        Ok(parsed) if parsed <= max => Ok(parsed),
        _ => Err(IssueReason::InvalidInteger),
    }
}

fn parse_url(value: &str) -> Result<ConfigValue, IssueReason> {
    Url::parse(value)
        .map(|_| ConfigValue::Text(value.to_string()))
        .map_err(|_| IssueReason::InvalidUrl)
}

/// Email shape check
pub fn is_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL_PATTERN.is_match(value)
}
