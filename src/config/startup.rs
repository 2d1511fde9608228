//! Startup properties file.
//!
//! A small key/value file that survives across launches. A missing file is
//! the normal first-run case and yields an empty map; other read failures
//! are kept and reported once logging is available. Saving is explicit and
//! its failures are returned to the caller.

use std::collections::BTreeMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::diagnostics::Diagnostic;
use super::error::ConfigError;
use super::lookup::Lookup;
use super::properties;
use super::setting::{STARTUP_FILE_SETTINGS, Setting};

const KEY_NOT_FOUND: &str = "<key not found>";

/// Outcome of reading the startup file.
///
/// Explicitly models all valid states:
/// - The file was read
/// - No file exists (first run)
/// - The file exists but could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// The file was read.
    Loaded,
    /// No file exists at the path.
    NotFound,
    /// Reading failed for another reason; the map is empty.
    Failed {
        /// Reason for the failure (for the log and the user).
        reason: String,
    },
}

/// The startup-file layer.
#[derive(Debug, Clone)]
pub struct StartupFileSource {
    path: PathBuf,
    properties: BTreeMap<String, String>,
    status: LoadStatus,
}

impl StartupFileSource {
    /// Reads the file at `path`.
    ///
    /// Never fails; see [`Self::status`] for what happened.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (properties, status) = match std::fs::read_to_string(&path) {
            Ok(content) => (properties::parse(&content), LoadStatus::Loaded),
            Err(e) if e.kind() == ErrorKind::NotFound => (BTreeMap::new(), LoadStatus::NotFound),
            Err(e) => (
                BTreeMap::new(),
                LoadStatus::Failed {
                    reason: e.to_string(),
                },
            ),
        };

        Self {
            path,
            properties,
            status,
        }
    }

    /// Path the file was read from and is saved to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// What happened when the file was read.
    #[must_use]
    pub const fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// All entries, ordered by key.
    #[must_use]
    pub const fn entries(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Stores a value in memory. Nothing is written until [`Self::store`].
    ///
    /// Booleans and integers are stored in their canonical text form
    /// (`true`, `42`).
    pub fn set(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        self.properties.insert(key.into(), value.to_string());
    }

    /// Stores a value for a setting under its key.
    ///
    /// Settings without a key are ignored.
    pub fn set_setting(&mut self, setting: Setting, value: impl fmt::Display) {
        if let Some(key) = setting.key() {
            self.set(key, value);
        }
    }

    /// Removes a key from memory.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.properties.remove(key)
    }

    /// Writes the whole in-memory map back to [`Self::path`], replacing the file.
    ///
    /// Missing parent directories are created. The content goes to a
    /// temporary sibling first and is then renamed over the target.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileWrite`] if any step fails.
    pub fn store(&self) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::FileWrite {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_error)?;
            }
        }

        // startup.properties -> startup.properties.tmp
        let temp_path = PathBuf::from(format!("{}.tmp", self.path.display()));
        std::fs::write(&temp_path, properties::serialize(&self.properties))
            .map_err(write_error)?;
        std::fs::rename(&temp_path, &self.path).map_err(write_error)?;

        for line in self.store_report() {
            tracing::info!("{line}");
        }

        Ok(())
    }

    /// The lines logged after a successful [`Self::store`]: a header, then
    /// one `Key: <key>, Value: <value>` line per allow-listed key present.
    #[must_use]
    pub fn store_report(&self) -> Vec<String> {
        let header = format!(
            "Startup properties stored in {} with following value pairs:",
            self.path.display()
        );
        let pairs = STARTUP_FILE_SETTINGS.iter().filter_map(|setting| {
            let key = setting.key()?;
            self.raw(key).map(|value| format!("Key: {key}, Value: {value}"))
        });
        std::iter::once(header).chain(pairs).collect()
    }

    /// Messages describing what was loaded, ready for the log.
    ///
    /// `original_name` is the startup-file name as configured and
    /// `name_was_absolute` tells whether it was given as a path; a data
    /// directory found in a file located relative to the data directory is
    /// ignored, which is reported as a warning.
    #[must_use]
    pub fn audit(&self, original_name: &str, name_was_absolute: bool) -> Vec<Diagnostic> {
        let mut diagnostics = vec![Diagnostic::info(format!(
            "Start up properties file: {}",
            self.path.display()
        ))];

        match &self.status {
            LoadStatus::Loaded => {}
            LoadStatus::NotFound => diagnostics.push(Diagnostic::info(format!(
                "{} not found. This can be ok, if it really does not exist.",
                self.path.display()
            ))),
            LoadStatus::Failed { reason } => diagnostics.push(
                Diagnostic::error(format!(
                    "Unexpected error during load of startup properties from {}: {reason}",
                    self.path.display()
                ))
                .notify_user(),
            ),
        }

        for setting in STARTUP_FILE_SETTINGS {
            let Some(key) = setting.key() else { continue };
            let value = self.raw(key);
            diagnostics.push(Diagnostic::info(format!(
                "Usable keys in startup properties: {key}, value found: {}",
                value.unwrap_or(KEY_NOT_FOUND)
            )));

            if setting == Setting::DataDir && value.is_some() && !name_was_absolute {
                diagnostics.push(Diagnostic::warn(format!(
                    "Start up properties file definition '{original_name}' was set relative to \
                     {key}, so redefinition of {key} will be ignored!"
                )));
            }
        }

        diagnostics
    }
}

impl Lookup for StartupFileSource {
    fn is_set(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    fn raw(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}
