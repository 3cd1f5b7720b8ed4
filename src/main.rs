//! crm-env CLI entry point.

use clap::Parser;

use crm_env::cli::{handle_error, init_logging, run, Cli, EnvironmentInput};
use crm_env::infrastructure::config::ConfigLoader;
use crm_env::infrastructure::logging::LogConfig;

fn main() {
    let cli = Cli::parse();

    let input = match EnvironmentInput::from_cli(&cli) {
        Ok(input) => input,
        Err(err) => handle_error(&err, cli.json),
    };

    // A lenient pass never fails, so the logger can be set up from whatever
    // LOG_LEVEL/APP_ENV hold before the real, validating load runs.
    let log_config = ConfigLoader::resolve(&input.raw, &input.options.skip_validation(true))
        .map(|resolved| LogConfig::from_runtime(&resolved.snapshot().server().runtime))
        .unwrap_or_default()
        .with_log_dir(cli.log_dir.clone());
    let logger = init_logging(&log_config);

    let result = run(&cli, &input);
    // Flush the file appender before exiting
    drop(logger);

    if let Err(err) = result {
        handle_error(&err, cli.json);
    }
}
