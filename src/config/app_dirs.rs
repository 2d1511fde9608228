//! Creation of the data and log directories.

use std::path::{Path, PathBuf};

use super::error::ConfigError;

/// Handle to the created data directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    app_home: PathBuf,
    log_dir: PathBuf,
    config_subdir: &'static str,
    tmp_subdir: &'static str,
}

impl AppDirs {
    /// Creates the data and log directories if they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CreateDir`] if a directory cannot be created.
    pub fn create(
        app_home: PathBuf,
        log_dir: PathBuf,
        config_subdir: &'static str,
        tmp_subdir: &'static str,
    ) -> Result<Self, ConfigError> {
        create_dir(&app_home)?;
        create_dir(&log_dir)?;

        Ok(Self {
            app_home,
            log_dir,
            config_subdir,
            tmp_subdir,
        })
    }

    /// The data directory.
    #[must_use]
    pub fn app_home(&self) -> &Path {
        &self.app_home
    }

    /// The log directory.
    #[must_use]
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// A subdirectory of the data directory, created on demand.
    ///
    /// An empty name returns the data directory itself.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CreateDir`] if the directory cannot be created.
    pub fn subdir(&self, name: &str) -> Result<PathBuf, ConfigError> {
        if name.is_empty() {
            return Ok(self.app_home.clone());
        }

        let path = self.app_home.join(name);
        create_dir(&path)?;
        Ok(path)
    }

    /// The configuration subdirectory, created on demand.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CreateDir`] if the directory cannot be created.
    pub fn config_dir(&self) -> Result<PathBuf, ConfigError> {
        self.subdir(self.config_subdir)
    }

    /// The temporary-files subdirectory, created on demand.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CreateDir`] if the directory cannot be created.
    pub fn tmp_dir(&self) -> Result<PathBuf, ConfigError> {
        self.subdir(self.tmp_subdir)
    }
}

fn create_dir(path: &Path) -> Result<(), ConfigError> {
    if path.is_dir() {
        return Ok(());
    }

    std::fs::create_dir_all(path).map_err(|source| {
        tracing::info!("Unable to create directory {}: {source}", path.display());
        ConfigError::CreateDir {
            path: path.to_path_buf(),
            source,
        }
    })
}
