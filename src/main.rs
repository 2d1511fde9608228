//! MapTool startup configuration
//!
//! Entry point for the maptool-startup application.

use maptool_startup::config::{
    ConfigContext, ConfigError, ConsoleNotifier, SystemEnvironment, lossy_args,
};
use std::process::ExitCode;

mod app;

use app::{exit_code, print_config_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    // Resolve the configuration before anything can log
    let args = lossy_args(std::env::args_os().skip(1));
    let mut context = match ConfigContext::initialize(args, SystemEnvironment::new()) {
        Ok(context) => context,
        Err(e) => {
            setup_tracing(false);
            return report_fatal(&e);
        }
    };

    // Setup logging and flush what was collected so far
    setup_tracing(context.debug_flag());
    context.attach_logging(Box::new(ConsoleNotifier));

    let dirs = match context.initialize_main_dirs() {
        Ok(dirs) => dirs,
        Err(e) => return report_fatal(&e),
    };
    tracing::debug!("Data directory ready at {}", dirs.app_home().display());

    match context.snapshot() {
        Ok(settings) => {
            tracing::info!("{settings}");
            exit_code::SUCCESS
        }
        Err(e) => report_fatal(&e),
    }
}

/// Shows a fatal configuration error to the user.
fn report_fatal(error: &ConfigError) -> ExitCode {
    tracing::error!("Configuration error: {error}");
    eprintln!("Configuration error: {}", error.user_message());
    print_config_hint(error);
    exit_code::CONFIG_ERROR
}
