//! Declarative key table.
//!
//! Every environment variable the application reads is declared here, once,
//! with its shape, requirement and default. The loader walks these tables;
//! nothing else decides what a valid configuration looks like.

use std::fmt;

/// Prefix every client-exposed key must carry
pub const CLIENT_PREFIX: &str = "NEXT_PUBLIC_";

/// Process-level switch that bypasses validation (presence is the contract)
pub const SKIP_ENV_VALIDATION: &str = "SKIP_ENV_VALIDATION";

/// Set by the hosting platform on its deployments
pub const PLATFORM_MARKER: &str = "VERCEL";
/// Scheme-less deployment host provided by the hosting platform
pub const PLATFORM_URL: &str = "VERCEL_URL";

/// Declared key names
pub mod keys {
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const DATABASE_DIRECT_URL: &str = "DATABASE_DIRECT_URL";
    pub const NODE_ENV: &str = "NODE_ENV";
    pub const NEXTAUTH_SECRET: &str = "NEXTAUTH_SECRET";
    pub const NEXTAUTH_URL: &str = "NEXTAUTH_URL";
    pub const REDIS_URL: &str = "REDIS_URL";
    pub const S3_ENDPOINT: &str = "S3_ENDPOINT";
    pub const S3_ACCESS_KEY: &str = "S3_ACCESS_KEY";
    pub const S3_SECRET_KEY: &str = "S3_SECRET_KEY";
    pub const S3_BUCKET_NAME: &str = "S3_BUCKET_NAME";
    pub const S3_REGION: &str = "S3_REGION";
    pub const DEFAULT_TENANT_ID: &str = "DEFAULT_TENANT_ID";
    pub const ENABLE_MULTI_TENANT: &str = "ENABLE_MULTI_TENANT";
    pub const ENABLE_AI_FEATURES: &str = "ENABLE_AI_FEATURES";
    pub const ENABLE_EXTERNAL_API_SYNC: &str = "ENABLE_EXTERNAL_API_SYNC";
    pub const ENABLE_AUDIT_LOGGING: &str = "ENABLE_AUDIT_LOGGING";
    pub const INTERNAL_API_BASE_URL: &str = "INTERNAL_API_BASE_URL";
    pub const INTERNAL_API_KEY: &str = "INTERNAL_API_KEY";
    pub const POLLING_INTERVAL_MINUTES: &str = "POLLING_INTERVAL_MINUTES";
    pub const EMAIL_FROM: &str = "EMAIL_FROM";
    pub const SMTP_HOST: &str = "SMTP_HOST";
    pub const SMTP_PORT: &str = "SMTP_PORT";
    pub const SMTP_USER: &str = "SMTP_USER";
    pub const SMTP_PASSWORD: &str = "SMTP_PASSWORD";
    pub const ENABLE_METRICS: &str = "ENABLE_METRICS";
    pub const SENTRY_DSN: &str = "SENTRY_DSN";
    pub const APP_ENV: &str = "APP_ENV";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";

    pub const NEXT_PUBLIC_APP_NAME: &str = "NEXT_PUBLIC_APP_NAME";
    pub const NEXT_PUBLIC_APP_VERSION: &str = "NEXT_PUBLIC_APP_VERSION";
    pub const NEXT_PUBLIC_ENABLE_ANALYTICS: &str = "NEXT_PUBLIC_ENABLE_ANALYTICS";
}

/// Which side of the trust boundary a key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Server,
    Client,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server => f.write_str("server"),
            Self::Client => f.write_str("client"),
        }
    }
}

/// Shape a value must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Url,
    /// A URL, unless the named platform marker is set; then any text
    UrlUnlessPlatform(&'static str),
    Email,
    /// `"true"` is true, anything else false
    Flag,
    /// Base-10 unsigned integer no larger than `max`
    Integer { max: u64 },
    OneOf(&'static [&'static str]),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("string"),
            Self::Url => f.write_str("url"),
            Self::UrlUnlessPlatform(marker) => write!(f, "url (any string when {marker} is set)"),
            Self::Email => f.write_str("email"),
            Self::Flag => f.write_str("boolean"),
            Self::Integer { .. } => f.write_str("integer"),
            Self::OneOf(allowed) => write!(f, "one of {}", allowed.join("|")),
        }
    }
}

/// When a value has to be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Optional,
    Required,
    /// Required only when `NODE_ENV` is `production`
    RequiredInProduction,
    /// Raw value substituted when absent; goes through the same coercion
    Default(&'static str),
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Optional => f.write_str("optional"),
            Self::Required => f.write_str("required"),
            Self::RequiredInProduction => f.write_str("required in production"),
            Self::Default(_) => f.write_str("defaulted"),
        }
    }
}

/// Rewrite applied after empty-string normalization and before validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preprocess {
    /// Use the named variable when this key is unset
    FallbackTo(&'static str),
}

/// One declared key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySpec {
    pub key: &'static str,
    pub kind: ValueKind,
    pub requirement: Requirement,
    pub preprocess: Option<Preprocess>,
    /// Value is a credential and must never be echoed
    pub secret: bool,
}

impl KeySpec {
    const fn new(key: &'static str, kind: ValueKind, requirement: Requirement) -> Self {
        Self {
            key,
            kind,
            requirement,
            preprocess: None,
            secret: false,
        }
    }

    const fn optional(key: &'static str, kind: ValueKind) -> Self {
        Self::new(key, kind, Requirement::Optional)
    }

    const fn required(key: &'static str, kind: ValueKind) -> Self {
        Self::new(key, kind, Requirement::Required)
    }

    const fn defaulted(key: &'static str, kind: ValueKind, default: &'static str) -> Self {
        Self::new(key, kind, Requirement::Default(default))
    }

    const fn flag(key: &'static str, default: bool) -> Self {
        Self::defaulted(key, ValueKind::Flag, if default { "true" } else { "false" })
    }

    const fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    const fn fallback_to(mut self, other: &'static str) -> Self {
        self.preprocess = Some(Preprocess::FallbackTo(other));
        self
    }

    /// Declared default, if any
    pub const fn default_value(&self) -> Option<&'static str> {
        match self.requirement {
            Requirement::Default(value) => Some(value),
            _ => None,
        }
    }
}

const PORT_MAX: u64 = u16::MAX as u64;
const MINUTES_MAX: u64 = u32::MAX as u64;

const NODE_ENVS: &[&str] = crate::domain::models::NodeEnv::NAMES;
const APP_ENVS: &[&str] = crate::domain::models::AppEnv::NAMES;
const LOG_LEVELS: &[&str] = crate::domain::models::LogLevel::NAMES;

/// Server-only keys
pub const SERVER_KEYS: &[KeySpec] = &[
    KeySpec::required(keys::DATABASE_URL, ValueKind::Url),
    KeySpec::optional(keys::DATABASE_DIRECT_URL, ValueKind::Url),
    KeySpec::defaulted(keys::NODE_ENV, ValueKind::OneOf(NODE_ENVS), "development"),
    KeySpec::new(
        keys::NEXTAUTH_SECRET,
        ValueKind::Text,
        Requirement::RequiredInProduction,
    )
    .secret(),
    KeySpec::required(
        keys::NEXTAUTH_URL,
        ValueKind::UrlUnlessPlatform(PLATFORM_MARKER),
    )
    .fallback_to(PLATFORM_URL),
    // Cache
    KeySpec::optional(keys::REDIS_URL, ValueKind::Url),
    // Object storage
    KeySpec::optional(keys::S3_ENDPOINT, ValueKind::Url),
    KeySpec::optional(keys::S3_ACCESS_KEY, ValueKind::Text).secret(),
    KeySpec::optional(keys::S3_SECRET_KEY, ValueKind::Text).secret(),
    KeySpec::optional(keys::S3_BUCKET_NAME, ValueKind::Text),
    KeySpec::defaulted(keys::S3_REGION, ValueKind::Text, "us-east-1"),
    // Tenancy
    KeySpec::optional(keys::DEFAULT_TENANT_ID, ValueKind::Text),
    KeySpec::flag(keys::ENABLE_MULTI_TENANT, true),
    // Feature flags
    KeySpec::flag(keys::ENABLE_AI_FEATURES, false),
    KeySpec::flag(keys::ENABLE_EXTERNAL_API_SYNC, true),
    KeySpec::flag(keys::ENABLE_AUDIT_LOGGING, true),
    // Internal API
    KeySpec::optional(keys::INTERNAL_API_BASE_URL, ValueKind::Url),
    KeySpec::optional(keys::INTERNAL_API_KEY, ValueKind::Text).secret(),
    KeySpec::defaulted(
        keys::POLLING_INTERVAL_MINUTES,
        ValueKind::Integer { max: MINUTES_MAX },
        "60",
    ),
    // Email
    KeySpec::optional(keys::EMAIL_FROM, ValueKind::Email),
    KeySpec::optional(keys::SMTP_HOST, ValueKind::Text),
    KeySpec::optional(keys::SMTP_PORT, ValueKind::Integer { max: PORT_MAX }),
    KeySpec::optional(keys::SMTP_USER, ValueKind::Text),
    KeySpec::optional(keys::SMTP_PASSWORD, ValueKind::Text).secret(),
    // Observability
    KeySpec::flag(keys::ENABLE_METRICS, true),
    KeySpec::optional(keys::SENTRY_DSN, ValueKind::Text),
    // Application
    KeySpec::defaulted(keys::APP_ENV, ValueKind::OneOf(APP_ENVS), "development"),
    KeySpec::defaulted(keys::LOG_LEVEL, ValueKind::OneOf(LOG_LEVELS), "info"),
];

/// Keys that may be exposed to client-side code
pub const CLIENT_KEYS: &[KeySpec] = &[
    KeySpec::defaulted(keys::NEXT_PUBLIC_APP_NAME, ValueKind::Text, "GWM CRM"),
    KeySpec::defaulted(keys::NEXT_PUBLIC_APP_VERSION, ValueKind::Text, "0.1.0"),
    KeySpec::flag(keys::NEXT_PUBLIC_ENABLE_ANALYTICS, false),
];

/// A table of keys validated together
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub visibility: Visibility,
    pub keys: &'static [KeySpec],
}

impl Schema {
    pub const SERVER: Self = Self {
        visibility: Visibility::Server,
        keys: SERVER_KEYS,
    };

    pub const CLIENT: Self = Self {
        visibility: Visibility::Client,
        keys: CLIENT_KEYS,
    };

    pub fn get(&self, key: &str) -> Option<&'static KeySpec> {
        self.keys.iter().find(|spec| spec.key == key)
    }
}

/// Look up a key in either table
pub fn lookup(key: &str) -> Option<(Visibility, &'static KeySpec)> {
    [Schema::SERVER, Schema::CLIENT]
        .into_iter()
        .find_map(|schema| schema.get(key).map(|spec| (schema.visibility, spec)))
}

/// Whether the key holds a credential
pub fn is_secret_key(key: &str) -> bool {
    lookup(key).is_some_and(|(_, spec)| spec.secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_are_unique_across_tables() {
        let mut seen = HashSet::new();
        for spec in SERVER_KEYS.iter().chain(CLIENT_KEYS) {
            assert!(seen.insert(spec.key), "duplicate key {}", spec.key);
        }
    }

    #[test]
    fn test_prefix_separates_client_from_server() {
        assert!(CLIENT_KEYS.iter().all(|s| s.key.starts_with(CLIENT_PREFIX)));
        assert!(SERVER_KEYS.iter().all(|s| !s.key.starts_with(CLIENT_PREFIX)));
        assert!(CLIENT_KEYS.len() < SERVER_KEYS.len());
    }

    #[test]
    fn test_defaults_match_declared_table() {
        let default_of = |key| lookup(key).and_then(|(_, s)| s.default_value());

        assert_eq!(default_of(keys::S3_REGION), Some("us-east-1"));
        assert_eq!(default_of(keys::POLLING_INTERVAL_MINUTES), Some("60"));
        assert_eq!(default_of(keys::ENABLE_MULTI_TENANT), Some("true"));
        assert_eq!(default_of(keys::ENABLE_AI_FEATURES), Some("false"));
        assert_eq!(default_of(keys::NEXT_PUBLIC_APP_NAME), Some("GWM CRM"));
        assert_eq!(default_of(keys::DATABASE_URL), None);
    }

    #[test]
    fn test_credentials_are_marked_secret() {
        for key in [
            keys::NEXTAUTH_SECRET,
            keys::S3_ACCESS_KEY,
            keys::S3_SECRET_KEY,
            keys::INTERNAL_API_KEY,
            keys::SMTP_PASSWORD,
        ] {
            assert!(is_secret_key(key), "{key} should be secret");
        }
        assert!(!is_secret_key(keys::S3_BUCKET_NAME));
        assert!(!is_secret_key("UNKNOWN"));
    }

    #[test]
    fn test_lookup_reports_visibility() {
        assert_eq!(
            lookup(keys::NEXT_PUBLIC_APP_VERSION).map(|(v, _)| v),
            Some(Visibility::Client)
        );
        assert_eq!(lookup(keys::LOG_LEVEL).map(|(v, _)| v), Some(Visibility::Server));
        assert!(lookup("PATH").is_none());
    }
}
