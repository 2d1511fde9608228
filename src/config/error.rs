//! Error types for configuration resolution.

use std::path::PathBuf;

use thiserror::Error;

use super::setting::Setting;

/// Error type for configuration operations.
///
/// Lookups never fail; only directory resolution, directory creation and
/// explicit saves of the startup file produce these.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A resolved path contains a character the application cannot work with.
    #[error("Unusable path '{}': must not contain '!'", path.display())]
    UnusablePath {
        /// The offending path
        path: PathBuf,
    },

    /// A required directory could not be created.
    #[error("Failed to create directory '{}': {source}", path.display())]
    CreateDir {
        /// Directory that was requested
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A relative path could not be made absolute.
    #[error("Failed to make '{}' absolute: {source}", path.display())]
    Absolutize {
        /// The relative path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The user home directory is unknown, so relative data directories cannot be placed.
    #[error("Cannot determine the user home directory")]
    UnknownHome,

    /// Failed to write the startup properties file.
    #[error("Failed to write startup file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the startup file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A cached value was requested while it was being resolved.
    #[error("Re-entrant resolution of {setting}")]
    ReentrantResolution {
        /// The setting being resolved
        setting: Setting,
    },
}

/// Well-known message keys for user-facing error texts.
pub mod message {
    /// A data, log or startup-file path cannot be used.
    pub const UNUSABLE_DATA_DIR: &str = "msg.error.unusableDataDir";
    /// A required directory could not be created.
    pub const UNABLE_TO_CREATE_DATA_DIR: &str = "msg.error.unableToCreateDataDir";
    /// The user home is unknown.
    pub const UNKNOWN_HOME: &str = "msg.error.unknownHomeDir";
    /// Saving the startup file failed.
    pub const UNABLE_TO_STORE_STARTUP: &str = "msg.error.unableToStoreStartupProps";
    /// Internal ordering bug during startup.
    pub const INTERNAL: &str = "msg.error.internalConfiguration";
}

impl ConfigError {
    /// Returns the message key of the user-facing text for this error.
    #[must_use]
    pub const fn message_key(&self) -> &'static str {
        match self {
            Self::UnusablePath { .. } | Self::Absolutize { .. } => message::UNUSABLE_DATA_DIR,
            Self::CreateDir { .. } => message::UNABLE_TO_CREATE_DATA_DIR,
            Self::UnknownHome => message::UNKNOWN_HOME,
            Self::FileWrite { .. } => message::UNABLE_TO_STORE_STARTUP,
            Self::ReentrantResolution { .. } => message::INTERNAL,
        }
    }

    /// Renders the human-readable message shown to the user before the process exits.
    #[must_use]
    pub fn user_message(&self) -> String {
        let argument = match self {
            Self::UnusablePath { path }
            | Self::CreateDir { path, .. }
            | Self::Absolutize { path, .. }
            | Self::FileWrite { path, .. } => path.display().to_string(),
            Self::UnknownHome => String::new(),
            Self::ReentrantResolution { setting } => setting.to_string(),
        };

        localized_text(self.message_key()).replace("{0}", &argument)
    }
}

/// Looks up the text for a message key.
///
/// Unknown keys are returned as-is so a missing translation is still readable.
#[must_use]
pub fn localized_text(key: &str) -> &str {
    match key {
        message::UNUSABLE_DATA_DIR => {
            "The data directory '{0}' cannot be used. Paths must not contain the '!' character."
        }
        message::UNABLE_TO_CREATE_DATA_DIR => {
            "Unable to create the data directory '{0}'. Check that you have write permission."
        }
        message::UNKNOWN_HOME => {
            "Unable to determine your home directory. Set MAPTOOL_DATADIR to an absolute path."
        }
        message::UNABLE_TO_STORE_STARTUP => "Unable to save the startup properties to '{0}'.",
        message::INTERNAL => "Internal configuration error while resolving {0}.",
        other => other,
    }
}
