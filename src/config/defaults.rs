//! Default values for configuration options.
//!
//! Centralized constants to avoid magic strings scattered across the codebase.

/// Default name of the data directory, relative to the user home.
pub const DATA_DIR_NAME: &str = ".maptool";

/// Default name of the log directory, relative to the data directory.
pub const LOG_DIR_NAME: &str = "logs";

/// Subdirectory of the data directory holding configuration files.
pub const CONFIG_SUBDIR_NAME: &str = "config";

/// Subdirectory of the data directory holding temporary files.
pub const TMP_SUBDIR_NAME: &str = "tmp";

/// Default file name of the startup properties file.
pub const STARTUP_FILE_NAME: &str = "startup.properties";

/// Default autosave decision.
pub const LOAD_AUTOSAVE: &str = "ask";

/// Default delay in seconds before an auto-started server is brought up.
pub const LOAD_SERVER_DELAY: &str = "0";

/// Default language when neither the environment nor the startup file names one.
pub const LOCALE_LANGUAGE: &str = "en";

/// Default region when neither the environment nor the startup file names one.
pub const LOCALE_REGION: &str = "";

/// Placeholder for "not set" window geometry and monitor values.
pub const UNSET_INT: &str = "-1";

/// Integer used when a declared default cannot be parsed as a number.
pub const INT_FALLBACK: i32 = -1;
