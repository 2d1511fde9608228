//! Layered startup configuration for MapTool.
//!
//! This module provides:
//! - Command-line parsing with error recovery ([`CommandLineSource`])
//! - The persistent startup properties file ([`StartupFileSource`])
//! - System properties ([`PropertySource`], [`SystemEnvironment`])
//! - Resolution of every named setting ([`PropertyRegistry`])
//! - The bootstrap and application-facing facade ([`ConfigContext`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Command line** - Options recognized by the parser
//! 2. **Startup file** - Only for keys on the allow-list ([`STARTUP_FILE_SETTINGS`])
//! 3. **System properties** - Environment and platform values
//! 4. **Built-in defaults** - Hardcoded default values
//!
//! The data directory is the exception: system properties are read first,
//! then the startup file (only when the startup file itself was named by an
//! absolute path), then the command line.
//!
//! For the campaign to load, `--campaign` wins over the deprecated `--file`.
//!
//! # Boolean Flag Semantics
//!
//! `fullscreen` and `server` use OR semantics:
//! - The key being present in the startup file enables it, whatever its value.
//! - The command-line switch enables it as well.
//! - Neither layer can disable what the other enabled.
//!
//! `skipAutoUpdate` is read from the startup file only.
//!
//! # Command-Line-Only Options
//!
//! `help`, `debug`, `reset`, `macros`, `version`, `monitor` and the window
//! geometry are not read from the startup file.
//!
//! # Paths
//!
//! A directory value without any path separator is relative: the data
//! directory is placed in the user home, the log directory in the data
//! directory. Every resolved path is made absolute and must not contain `!`.

mod app_dirs;
mod cli;
mod context;
pub mod defaults;
mod diagnostics;
mod error;
mod lookup;
mod properties;
mod registry;
mod setting;
mod startup;
mod system;

#[cfg(test)]
mod registry_tests;

pub use app_dirs::AppDirs;
pub use cli::{
    CommandLineSource, OPTIONS, OptionKind, OptionSpec, ParseFailure, ParseOutcome,
    ParsedCommandLine, lossy_args, parse_with_recovery,
};
pub use context::{ConfigContext, ResolvedSettings};
pub use diagnostics::{ConsoleNotifier, Diagnostic, Diagnostics, Notifier, Severity};
pub use error::{ConfigError, localized_text, message};
pub use lookup::Lookup;
pub use registry::{
    Layers, Locale, PropertyRegistry, StartupFileLocation, ensure_usable, looks_absolute,
    normalize_dir,
};
pub use setting::{AutosaveDecision, Descriptor, STARTUP_FILE_SETTINGS, Setting};
pub use startup::{LoadStatus, StartupFileSource};
pub use system::{OS_NAME, PropertySource, SystemEnvironment, USER_HOME, USER_LANGUAGE, USER_REGION};
