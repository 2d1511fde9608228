//! The single source of truth for every named setting.
//!
//! Values are resolved with the following priority (highest to lowest):
//!
//! 1. **Command line**
//! 2. **Startup file** (only for settings on the allow-list)
//! 3. **System properties**
//! 4. **Built-in defaults**
//!
//! Not every setting takes part in every layer; each accessor below uses
//! exactly the layers its setting is declared for.

use std::fmt;
use std::path::{MAIN_SEPARATOR, PathBuf};

use super::cli::CommandLineSource;
use super::error::ConfigError;
use super::lookup::Lookup;
use super::setting::{AutosaveDecision, Setting};
use super::startup::StartupFileSource;
use super::system::PropertySource;

/// The override layers consulted on top of system properties and defaults.
#[derive(Debug, Clone, Copy)]
pub struct Layers<'a> {
    /// Command-line layer.
    pub command_line: &'a CommandLineSource,
    /// Startup-file layer, `None` while its path is still being resolved.
    pub startup: Option<&'a StartupFileSource>,
}

impl<'a> Layers<'a> {
    /// Layers before the startup file is known.
    #[must_use]
    pub const fn command_line_only(command_line: &'a CommandLineSource) -> Self {
        Self {
            command_line,
            startup: None,
        }
    }

    /// All layers.
    #[must_use]
    pub const fn new(command_line: &'a CommandLineSource, startup: &'a StartupFileSource) -> Self {
        Self {
            command_line,
            startup: Some(startup),
        }
    }
}

/// Cache slot of an expensive, idempotent value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Cached<T> {
    #[default]
    Unset,
    Resolving,
    Resolved(T),
}

/// Where the startup file lives and how its name was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupFileLocation {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// The name as configured, before resolution.
    pub original: String,
    /// Whether the configured name was a path. If so, a data directory set
    /// inside the file is honored.
    pub absolute: bool,
}

/// Language and region of the default locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    /// Lower-case language code, e.g. `de`.
    pub language: String,
    /// Upper-case region code, possibly empty.
    pub region: String,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.region.is_empty() {
            f.write_str(&self.language)
        } else {
            write!(f, "{}_{}", self.language, self.region)
        }
    }
}

/// Returns true if the value contains any path separator, which is taken to
/// mean it is an absolute path.
#[must_use]
pub fn looks_absolute(value: &str) -> bool {
    value.contains(MAIN_SEPARATOR) || value.contains('/') || value.contains('\\')
}

/// Rejects paths the application cannot work with.
///
/// `!` separates archive and member in resource URLs.
///
/// # Errors
///
/// Returns [`ConfigError::UnusablePath`] if the path contains `!`.
pub fn ensure_usable(path: PathBuf) -> Result<PathBuf, ConfigError> {
    if path.to_string_lossy().contains('!') {
        return Err(ConfigError::UnusablePath { path });
    }
    Ok(path)
}

/// Places `value` under the directory returned by `parent` unless it already
/// looks absolute, makes the result absolute and checks it with
/// [`ensure_usable`]. `parent` is only called for relative values.
///
/// # Errors
///
/// Returns an error if `parent` fails, the path cannot be made absolute, or
/// it is unusable.
pub fn normalize_dir(
    value: &str,
    parent: impl FnOnce() -> Result<PathBuf, ConfigError>,
) -> Result<PathBuf, ConfigError> {
    let joined = if looks_absolute(value) {
        PathBuf::from(value)
    } else {
        parent()?.join(value)
    };

    let absolute = std::path::absolute(&joined).map_err(|source| ConfigError::Absolutize {
        path: joined.clone(),
        source,
    })?;
    ensure_usable(absolute)
}

/// Resolves settings from the layers and caches the directory values.
pub struct PropertyRegistry {
    system: Box<dyn PropertySource>,
    startup_file: Cached<StartupFileLocation>,
    data_dir: Cached<PathBuf>,
    log_dir: Cached<PathBuf>,
}

impl fmt::Debug for PropertyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRegistry")
            .field("startup_file", &self.startup_file)
            .field("data_dir", &self.data_dir)
            .field("log_dir", &self.log_dir)
            .finish_non_exhaustive()
    }
}

impl PropertyRegistry {
    /// Creates a registry reading system properties from `system`.
    pub fn new(system: impl PropertySource + 'static) -> Self {
        Self {
            system: Box::new(system),
            startup_file: Cached::Unset,
            data_dir: Cached::Unset,
            log_dir: Cached::Unset,
        }
    }

    /// Reads a system property by the setting's key, falling back to its default.
    fn system_or_default(&self, setting: Setting) -> Option<String> {
        setting
            .key()
            .and_then(|key| self.system.get(key))
            .or_else(|| setting.default_value().map(str::to_owned))
    }

    /// Startup file, system, default: everything below the command line.
    fn below_command_line(&self, setting: Setting, layers: &Layers<'_>) -> Option<String> {
        let value = self.system_or_default(setting);

        match (layers.startup, setting.key()) {
            (Some(startup), Some(key)) if setting.in_startup_file() => {
                startup.string_or(key, value)
            }
            _ => value,
        }
    }

    /// Full chain for a string setting: command line, startup file, system, default.
    fn string(&self, setting: Setting, layers: &Layers<'_>) -> Option<String> {
        let value = self.below_command_line(setting, layers);

        match setting.cli_long() {
            Some(long) => layers.command_line.string_or(long, value),
            None => value,
        }
    }

    /// Full chain for an integer setting. An unparseable value in one layer
    /// falls through to the layer below.
    fn int(&self, setting: Setting, layers: &Layers<'_>) -> i32 {
        let mut value = setting
            .key()
            .and_then(|key| self.system.get(key))
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or_else(|| setting.default_int());

        if setting.in_startup_file() {
            if let (Some(startup), Some(key)) = (layers.startup, setting.key()) {
                value = startup.int_or(key, value);
            }
        }

        match setting.cli_long() {
            Some(long) => layers.command_line.int_or(long, value),
            None => value,
        }
    }

    /// Switch given on the command line.
    fn cli_flag(setting: Setting, layers: &Layers<'_>) -> bool {
        setting
            .cli_long()
            .is_some_and(|long| layers.command_line.is_set(long))
    }

    /// Key present in the startup file, whatever its value.
    fn startup_flag(setting: Setting, layers: &Layers<'_>) -> bool {
        match (layers.startup, setting.key()) {
            (Some(startup), Some(key)) => startup.is_set(key),
            _ => false,
        }
    }

    /// Switch asserted by either the startup file or the command line.
    fn either_flag(setting: Setting, layers: &Layers<'_>) -> bool {
        Self::startup_flag(setting, layers) || Self::cli_flag(setting, layers)
    }

    /// Resolves the startup-file location (phase 1 of the bootstrap).
    ///
    /// The raw name comes from the command line, then system properties,
    /// then the default. A name containing a path separator is used as-is;
    /// otherwise the file lives in `<data dir>/config/`, with the data
    /// directory resolved *without* the startup file.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is unusable or the data directory fails.
    pub fn startup_file(
        &mut self,
        command_line: &CommandLineSource,
    ) -> Result<&StartupFileLocation, ConfigError> {
        if matches!(self.startup_file, Cached::Unset) {
            let location = self.resolve_startup_file(command_line)?;
            self.startup_file = Cached::Resolved(location);
        }

        match &self.startup_file {
            Cached::Resolved(location) => Ok(location),
            Cached::Unset | Cached::Resolving => Err(ConfigError::ReentrantResolution {
                setting: Setting::StartupFile,
            }),
        }
    }

    fn resolve_startup_file(
        &mut self,
        command_line: &CommandLineSource,
    ) -> Result<StartupFileLocation, ConfigError> {
        self.startup_file = Cached::Resolving;

        let layers = Layers::command_line_only(command_line);
        let original = self
            .string(Setting::StartupFile, &layers)
            .unwrap_or_default();
        let absolute = looks_absolute(&original);

        let joined = if absolute {
            PathBuf::from(&original)
        } else {
            let data_dir = self.data_dir(&layers);
            let data_dir = match data_dir {
                Ok(dir) => dir,
                Err(e) => {
                    self.startup_file = Cached::Unset;
                    return Err(e);
                }
            };
            data_dir.join(self.config_subdir_name()).join(&original)
        };

        let path = std::path::absolute(&joined)
            .map_err(|source| ConfigError::Absolutize {
                path: joined.clone(),
                source,
            })
            .and_then(ensure_usable)
            .inspect_err(|_| self.startup_file = Cached::Unset)?;

        Ok(StartupFileLocation {
            path,
            original,
            absolute,
        })
    }

    /// The cached startup-file location, if resolved.
    #[must_use]
    pub const fn startup_file_location(&self) -> Option<&StartupFileLocation> {
        match &self.startup_file {
            Cached::Resolved(location) => Some(location),
            Cached::Unset | Cached::Resolving => None,
        }
    }

    /// Absolute data directory (phase 2 of the bootstrap).
    ///
    /// System property, then the startup file (only when the startup file
    /// was named by an absolute path), then the command line, then the
    /// default `.maptool`. A value without separators is placed in the user
    /// home. Computed once and cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the home is unknown or the path is unusable.
    pub fn data_dir(&mut self, layers: &Layers<'_>) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Cached::Resolved(dir) => return Ok(dir.clone()),
            Cached::Resolving => {
                return Err(ConfigError::ReentrantResolution {
                    setting: Setting::DataDir,
                });
            }
            Cached::Unset => {}
        }

        self.data_dir = Cached::Resolving;
        match self.resolve_data_dir(layers) {
            Ok(dir) => {
                self.data_dir = Cached::Resolved(dir.clone());
                Ok(dir)
            }
            Err(e) => {
                self.data_dir = Cached::Unset;
                Err(e)
            }
        }
    }

    fn resolve_data_dir(&self, layers: &Layers<'_>) -> Result<PathBuf, ConfigError> {
        let setting = Setting::DataDir;
        let mut value = self.system_or_default(setting).unwrap_or_default();

        let file_may_relocate = self
            .startup_file_location()
            .is_some_and(|location| location.absolute);
        if file_may_relocate {
            if let (Some(startup), Some(key)) = (layers.startup, setting.key()) {
                value = startup.raw(key).map_or(value, str::to_owned);
            }
        }

        if let Some(long) = setting.cli_long() {
            value = layers.command_line.raw(long).map_or(value, str::to_owned);
        }

        normalize_dir(&value, || self.user_home().ok_or(ConfigError::UnknownHome))
    }

    /// Absolute log directory.
    ///
    /// System property, then the startup file, then the default `logs`. A
    /// value without separators is placed in the data directory. The result
    /// is published as a system property so externally configured logging
    /// can find it. Computed once and cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory fails or the path is unusable.
    pub fn log_dir(&mut self, layers: &Layers<'_>) -> Result<PathBuf, ConfigError> {
        match &self.log_dir {
            Cached::Resolved(dir) => return Ok(dir.clone()),
            Cached::Resolving => {
                return Err(ConfigError::ReentrantResolution {
                    setting: Setting::LogDir,
                });
            }
            Cached::Unset => {}
        }

        self.log_dir = Cached::Resolving;
        match self.resolve_log_dir(layers) {
            Ok(dir) => {
                if let Some(key) = Setting::LogDir.key() {
                    self.system.set(key, &dir.display().to_string());
                }
                self.log_dir = Cached::Resolved(dir.clone());
                Ok(dir)
            }
            Err(e) => {
                self.log_dir = Cached::Unset;
                Err(e)
            }
        }
    }

    fn resolve_log_dir(&mut self, layers: &Layers<'_>) -> Result<PathBuf, ConfigError> {
        let value = self
            .string(Setting::LogDir, layers)
            .unwrap_or_default();

        normalize_dir(&value, || self.data_dir(layers))
    }

    /// Forgets the cached data and log directories so they are computed again.
    #[deprecated(note = "only meant for tests; directories are fixed for a process run")]
    pub fn reset_cached_dirs(&mut self) {
        self.data_dir = Cached::Unset;
        self.log_dir = Cached::Unset;
    }

    /// Reads a system property, including values published by the registry.
    #[must_use]
    pub fn system_property(&self, key: &str) -> Option<String> {
        self.system.get(key)
    }

    /// Name of the configuration subdirectory.
    #[must_use]
    pub fn config_subdir_name(&self) -> &'static str {
        Setting::ConfigSubdir.default_value().unwrap_or_default()
    }

    /// Name of the temporary-files subdirectory.
    #[must_use]
    pub fn tmp_subdir_name(&self) -> &'static str {
        Setting::TmpSubdir.default_value().unwrap_or_default()
    }

    /// Operating-system name.
    #[must_use]
    pub fn os_name(&self) -> Option<String> {
        self.system_or_default(Setting::OsName)
    }

    /// Returns true on Windows.
    #[must_use]
    pub fn is_windows(&self) -> bool {
        self.os_name()
            .is_some_and(|name| name.to_lowercase().starts_with("windows"))
    }

    /// Returns true on macOS.
    #[must_use]
    pub fn is_mac(&self) -> bool {
        self.os_name().is_some_and(|name| {
            let name = name.to_lowercase();
            name.starts_with("mac os x") || name == "macos"
        })
    }

    /// Returns true on Linux and other Unix-like systems.
    #[must_use]
    pub fn is_unix(&self) -> bool {
        self.os_name().is_some_and(|name| {
            let name = name.to_lowercase();
            ["nix", "nux", "aix", "sunos", "bsd", "solaris", "illumos"]
                .iter()
                .any(|part| name.contains(part))
        })
    }

    /// User home directory.
    #[must_use]
    pub fn user_home(&self) -> Option<PathBuf> {
        self.system_or_default(Setting::UserHome)
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
    }

    /// `--debug`.
    #[must_use]
    pub fn debug_flag(&self, layers: &Layers<'_>) -> bool {
        Self::cli_flag(Setting::Debug, layers)
    }

    /// `--help`.
    #[must_use]
    pub fn help_flag(&self, layers: &Layers<'_>) -> bool {
        Self::cli_flag(Setting::Help, layers)
    }

    /// `--reset`.
    #[must_use]
    pub fn reset_flag(&self, layers: &Layers<'_>) -> bool {
        Self::cli_flag(Setting::Reset, layers)
    }

    /// `--macros`.
    #[must_use]
    pub fn list_macros_flag(&self, layers: &Layers<'_>) -> bool {
        Self::cli_flag(Setting::ListMacros, layers)
    }

    /// `--version`, overriding the reported version.
    #[must_use]
    pub fn version_override(&self, layers: &Layers<'_>) -> Option<String> {
        self.string(Setting::VersionOverride, layers)
    }

    /// Fullscreen, if either the startup file or the command line asks for it.
    #[must_use]
    pub fn fullscreen(&self, layers: &Layers<'_>) -> bool {
        Self::either_flag(Setting::Fullscreen, layers)
    }

    /// Monitor to open on, `-1` if unset.
    #[must_use]
    pub fn monitor(&self, layers: &Layers<'_>) -> i32 {
        self.int(Setting::Monitor, layers)
    }

    /// Window width, `-1` if unset.
    #[must_use]
    pub fn window_width(&self, layers: &Layers<'_>) -> i32 {
        self.int(Setting::WindowWidth, layers)
    }

    /// Window height, `-1` if unset.
    #[must_use]
    pub fn window_height(&self, layers: &Layers<'_>) -> i32 {
        self.int(Setting::WindowHeight, layers)
    }

    /// Window x coordinate, `-1` if unset.
    #[must_use]
    pub fn window_xpos(&self, layers: &Layers<'_>) -> i32 {
        self.int(Setting::WindowXpos, layers)
    }

    /// Window y coordinate, `-1` if unset.
    #[must_use]
    pub fn window_ypos(&self, layers: &Layers<'_>) -> i32 {
        self.int(Setting::WindowYpos, layers)
    }

    /// Campaign to load on startup.
    ///
    /// `--campaign` wins over the deprecated `--file`, which wins over the
    /// startup file and system properties.
    #[must_use]
    pub fn campaign(&self, layers: &Layers<'_>) -> Option<String> {
        let mut value = self.below_command_line(Setting::LoadCampaign, layers);

        for setting in [Setting::DeprecatedLoadCampaign, Setting::LoadCampaign] {
            if let Some(long) = setting.cli_long() {
                value = layers.command_line.string_or(long, value);
            }
        }
        value
    }

    /// Start the server on startup, if either the startup file or the command line asks for it.
    #[must_use]
    pub fn load_server(&self, layers: &Layers<'_>) -> bool {
        Self::either_flag(Setting::LoadServer, layers)
    }

    /// Seconds to wait before starting the server.
    #[must_use]
    pub fn load_server_delay(&self, layers: &Layers<'_>) -> i32 {
        self.int(Setting::LoadServerDelay, layers)
    }

    /// What to do with a newer autosave file.
    #[must_use]
    pub fn autosave_decision(&self, layers: &Layers<'_>) -> AutosaveDecision {
        self.string(Setting::LoadAutosave, layers)
            .map_or_else(AutosaveDecision::default, |v| AutosaveDecision::classify(&v))
    }

    /// Skip the update check, if the startup file contains the key.
    #[must_use]
    pub fn skip_auto_update(&self, layers: &Layers<'_>) -> bool {
        Self::startup_flag(Setting::SkipAutoUpdate, layers)
    }

    /// Default locale from the startup file, then system properties, then defaults.
    #[must_use]
    pub fn default_locale(&self, layers: &Layers<'_>) -> Locale {
        Locale {
            language: self
                .string(Setting::LocaleLanguage, layers)
                .unwrap_or_default(),
            region: self
                .string(Setting::LocaleRegion, layers)
                .unwrap_or_default(),
        }
    }
}
