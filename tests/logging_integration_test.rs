// Integration tests for logging functionality
// Note: this binary installs the global subscriber, so it holds a single test.

use crm_env::domain::models::LogLevel;
use crm_env::infrastructure::logging::{LogConfig, LogFormat, LoggerImpl, RotationPolicy};
use std::fs;
use tempfile::TempDir;
use tracing::{info, instrument, warn};

#[test]
fn test_file_logging_is_json_and_scrubbed() {
    let temp_dir = TempDir::new().unwrap();

    let config = LogConfig {
        level: LogLevel::Info,
        format: LogFormat::Json,
        log_dir: Some(temp_dir.path().to_path_buf()),
        enable_stderr: false,
        rotation: RotationPolicy::Never,
    };

    // RUST_LOG would override the configured level
    let logger = temp_env::with_var_unset("RUST_LOG", || LoggerImpl::init(&config)).unwrap();

    info!(key = "S3_REGION", "configuration loaded");
    warn!(url = "postgresql://crm:hunter2@db:5432/crm", "database unreachable");
    tracing::debug!("below the configured level");
    assert_eq!(instrumented_add(5, 7), 12);

    // Dropping the guard flushes the non-blocking writer
    drop(logger);

    let contents = fs::read_to_string(temp_dir.path().join("crm-env.log")).unwrap();
    let lines: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert!(lines
        .iter()
        .any(|line| line["fields"]["message"] == "configuration loaded"));
    assert!(lines
        .iter()
        .any(|line| line["fields"]["message"] == "adding numbers"));
    assert!(!contents.contains("below the configured level"));
    assert!(!contents.contains("hunter2"));
    assert!(contents.contains("[REDACTED]"));
}

#[instrument]
fn instrumented_add(a: i32, b: i32) -> i32 {
    info!("adding numbers");
    a + b
}
