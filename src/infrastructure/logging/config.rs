use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::models::{AppEnv, LogLevel, RuntimeConfig};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    /// Default level; `RUST_LOG` directives take precedence
    #[serde(default)]
    pub level: LogLevel,

    /// Output format (json, pretty)
    #[serde(default = "default_format")]
    pub format: LogFormat,

    /// Directory for log files (optional, if None logs only to stderr)
    pub log_dir: Option<PathBuf>,

    /// Enable stderr logging
    #[serde(default = "default_true")]
    pub enable_stderr: bool,

    /// Log rotation policy
    #[serde(default)]
    pub rotation: RotationPolicy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: default_format(),
            log_dir: None,
            enable_stderr: true,
            rotation: RotationPolicy::default(),
        }
    }
}

impl LogConfig {
    /// Level from `LOG_LEVEL`; production deployments log JSON
    pub fn from_runtime(runtime: &RuntimeConfig) -> Self {
        Self {
            level: runtime.log_level,
            format: if runtime.app_env == AppEnv::Production {
                LogFormat::Json
            } else {
                LogFormat::Pretty
            },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_log_dir(mut self, log_dir: Option<PathBuf>) -> Self {
        self.log_dir = log_dir;
        self
    }
}

const fn default_format() -> LogFormat {
    LogFormat::Pretty
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::NodeEnv;

    #[test]
    fn test_from_runtime_production_uses_json() {
        let runtime = RuntimeConfig {
            node_env: NodeEnv::Production,
            app_env: AppEnv::Production,
            log_level: LogLevel::Warn,
        };

        let config = LogConfig::from_runtime(&runtime);
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.enable_stderr);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_from_runtime_staging_is_pretty() {
        let runtime = RuntimeConfig {
            node_env: NodeEnv::Production,
            app_env: AppEnv::Staging,
            log_level: LogLevel::Debug,
        };

        assert_eq!(LogConfig::from_runtime(&runtime).format, LogFormat::Pretty);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: LogConfig = serde_json::from_str(r#"{"level": "error"}"#).unwrap();
        assert_eq!(config.level, LogLevel::Error);
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.rotation, RotationPolicy::Daily);
    }
}
