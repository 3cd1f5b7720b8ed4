pub mod config;
pub mod runtime;
pub mod secret;

pub use config::{
    AuthConfig, CacheConfig, ClientConfig, ConfigSnapshot, DatabaseConfig, EmailConfig,
    FeatureFlags, IntegrationConfig, ObservabilityConfig, RuntimeConfig, ServerConfig,
    StorageConfig, TenancyConfig,
};
pub use runtime::{AppEnv, LogLevel, NodeEnv};
pub use secret::{Secret, REDACTED};
