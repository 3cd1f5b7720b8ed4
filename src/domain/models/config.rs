use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::runtime::{AppEnv, LogLevel, NodeEnv};
use super::secret::Secret;

/// Validated configuration for one process.
///
/// Built once by the loader and shared by reference afterwards. Server-only
/// values live in [`ServerConfig`]; code that runs on behalf of the browser
/// should only ever receive [`ClientConfig`] via [`ConfigSnapshot::client`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSnapshot {
    server: ServerConfig,
    client: ClientConfig,
    validation_skipped: bool,
}

impl ConfigSnapshot {
    pub(crate) const fn new(
        server: ServerConfig,
        client: ClientConfig,
        validation_skipped: bool,
    ) -> Self {
        Self {
            server,
            client,
            validation_skipped,
        }
    }

    pub const fn server(&self) -> &ServerConfig {
        &self.server
    }

    pub const fn client(&self) -> &ClientConfig {
        &self.client
    }

    /// True when the snapshot was built with validation bypassed, in which
    /// case required values may be missing.
    pub const fn validation_skipped(&self) -> bool {
        self.validation_skipped
    }
}

/// Server-only configuration.
///
/// Deliberately not `Serialize`: nothing in here may be shipped to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub runtime: RuntimeConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub cache: CacheConfig,
    pub storage: StorageConfig,
    pub tenancy: TenancyConfig,
    pub features: FeatureFlags,
    pub integration: IntegrationConfig,
    pub email: EmailConfig,
    pub observability: ObservabilityConfig,
}

/// Execution mode, deployment tier and log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub node_env: NodeEnv,
    pub app_env: AppEnv,
    pub log_level: LogLevel,
}

/// Database connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Pooled connection URL. Always set unless validation was skipped.
    pub url: Option<String>,
    /// Direct (non-pooled) connection URL, used for migrations
    pub direct_url: Option<String>,
}

/// Session/authentication settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Always set in production unless validation was skipped
    pub secret: Option<Secret>,
    /// Canonical site URL; falls back to the platform deployment URL
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub redis_url: Option<String>,
}

/// S3-compatible object storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub endpoint: Option<String>,
    pub access_key: Option<Secret>,
    pub secret_key: Option<Secret>,
    pub bucket_name: Option<String>,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenancyConfig {
    pub default_tenant_id: Option<String>,
    pub multi_tenant: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    pub ai_features: bool,
    pub external_api_sync: bool,
    pub audit_logging: bool,
}

/// Internal API used for periodic synchronization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationConfig {
    pub internal_api_base_url: Option<String>,
    pub internal_api_key: Option<Secret>,
    pub polling_interval_minutes: u32,
}

/// Outbound mail settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub from: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<Secret>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
    pub sentry_dsn: Option<String>,
}

/// Values that may cross into client-side code.
///
/// Serializes under the public variable names so it can be embedded in a
/// page or handed to a frontend build as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(rename = "NEXT_PUBLIC_APP_NAME")]
    pub app_name: String,
    #[serde(rename = "NEXT_PUBLIC_APP_VERSION")]
    pub app_version: String,
    #[serde(rename = "NEXT_PUBLIC_ENABLE_ANALYTICS")]
    pub analytics_enabled: bool,
}

impl ClientConfig {
    /// Public variables as `KEY -> value` strings
    pub fn to_public_env(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("NEXT_PUBLIC_APP_NAME", self.app_name.clone()),
            ("NEXT_PUBLIC_APP_VERSION", self.app_version.clone()),
            (
                "NEXT_PUBLIC_ENABLE_ANALYTICS",
                self.analytics_enabled.to_string(),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ClientConfig {
        ClientConfig {
            app_name: "GWM CRM".to_string(),
            app_version: "0.1.0".to_string(),
            analytics_enabled: false,
        }
    }

    #[test]
    fn test_client_serializes_under_public_names() {
        let json = serde_json::to_value(client()).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 3);
        assert_eq!(obj["NEXT_PUBLIC_APP_NAME"], "GWM CRM");
        assert_eq!(obj["NEXT_PUBLIC_APP_VERSION"], "0.1.0");
        assert_eq!(obj["NEXT_PUBLIC_ENABLE_ANALYTICS"], false);
    }

    #[test]
    fn test_public_env_matches_serialized_keys() {
        let env = client().to_public_env();
        let json = serde_json::to_value(client()).unwrap();

        let env_keys: Vec<_> = env.keys().copied().collect();
        let mut json_keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        json_keys.sort();
        assert_eq!(env_keys, json_keys);
        assert_eq!(env["NEXT_PUBLIC_ENABLE_ANALYTICS"], "false");
    }
}
