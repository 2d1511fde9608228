//! The configuration context handed to the rest of the application.
//!
//! [`ConfigContext::initialize`] runs the two-phase bootstrap:
//!
//! 1. Resolve the startup-file location from the command line, system
//!    properties and defaults only. A relative name is placed under the data
//!    directory, which is then resolved without the startup file.
//! 2. Load the startup file and resolve the data directory, consulting the
//!    file only when its own location was given as an absolute path.
//!
//! After that every accessor is a plain read, except the lazily cached log
//! directory.

use std::fmt;
use std::path::{Path, PathBuf};

use super::app_dirs::AppDirs;
use super::cli::CommandLineSource;
use super::diagnostics::{Diagnostic, Diagnostics, Notifier};
use super::error::ConfigError;
use super::registry::{Layers, Locale, PropertyRegistry, StartupFileLocation};
use super::setting::AutosaveDecision;
use super::startup::StartupFileSource;
use super::system::PropertySource;

/// Owns the three configuration layers and the pending diagnostics.
///
/// Construct once at startup on a single thread, then pass by reference.
#[derive(Debug)]
pub struct ConfigContext {
    registry: PropertyRegistry,
    command_line: CommandLineSource,
    startup: StartupFileSource,
    startup_location: StartupFileLocation,
    diagnostics: Diagnostics,
}

impl ConfigContext {
    /// Parses `args` (without the program name) and runs the bootstrap.
    ///
    /// # Errors
    ///
    /// Returns an error if the startup file or the data directory resolve to
    /// an unusable path, or the user home is needed but unknown.
    pub fn initialize<I, T>(
        args: I,
        system: impl PropertySource + 'static,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let command_line = CommandLineSource::new(args);
        let mut registry = PropertyRegistry::new(system);
        let mut diagnostics = Diagnostics::new();
        diagnostics.extend(command_line.diagnostics());

        let startup_location = registry.startup_file(&command_line)?.clone();

        let startup = StartupFileSource::load(&startup_location.path);
        diagnostics.extend(startup.audit(&startup_location.original, startup_location.absolute));
        registry.data_dir(&Layers::new(&command_line, &startup))?;

        Ok(Self {
            registry,
            command_line,
            startup,
            startup_location,
            diagnostics,
        })
    }

    /// The layers, for callers that talk to the registry directly.
    #[must_use]
    pub const fn layers(&self) -> Layers<'_> {
        Layers::new(&self.command_line, &self.startup)
    }

    /// Flushes pending diagnostics to the log and `notifier`.
    ///
    /// If `--help` was given, the option table is shown and the process
    /// exits with code 0.
    pub fn attach_logging(&mut self, notifier: Box<dyn Notifier>) {
        self.diagnostics.attach(notifier);

        if self.help_flag() {
            if let Some(notifier) = self.diagnostics.notifier() {
                CommandLineSource::print_help(notifier);
            }
        }
    }

    /// Records a diagnostic, buffered until logging is attached.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// The diagnostics buffer.
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// The command-line layer.
    #[must_use]
    pub const fn command_line(&self) -> &CommandLineSource {
        &self.command_line
    }

    /// The startup-file layer.
    #[must_use]
    pub const fn startup(&self) -> &StartupFileSource {
        &self.startup
    }

    /// The startup-file layer, for changes that are later saved with [`Self::store_startup`].
    pub const fn startup_mut(&mut self) -> &mut StartupFileSource {
        &mut self.startup
    }

    /// Saves the startup file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileWrite`] if the file cannot be written.
    pub fn store_startup(&self) -> Result<(), ConfigError> {
        self.startup.store()
    }

    /// Absolute path of the startup file.
    #[must_use]
    pub fn startup_file_path(&self) -> &Path {
        &self.startup_location.path
    }

    /// The startup-file name as configured.
    #[must_use]
    pub fn startup_file_name_original(&self) -> &str {
        &self.startup_location.original
    }

    /// Whether the startup-file name was configured as a path.
    #[must_use]
    pub const fn is_startup_file_absolute(&self) -> bool {
        self.startup_location.absolute
    }

    /// Absolute data directory.
    ///
    /// # Errors
    ///
    /// Only fails if the cache was reset and resolution now fails.
    pub fn data_dir(&mut self) -> Result<PathBuf, ConfigError> {
        self.registry
            .data_dir(&Layers::new(&self.command_line, &self.startup))
    }

    /// Absolute log directory, resolved on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is unusable.
    pub fn log_dir(&mut self) -> Result<PathBuf, ConfigError> {
        self.registry
            .log_dir(&Layers::new(&self.command_line, &self.startup))
    }

    /// Forgets the cached directories.
    #[deprecated(note = "only meant for tests; directories are fixed for a process run")]
    pub fn reset_cached_dirs(&mut self) {
        #[allow(deprecated)]
        self.registry.reset_cached_dirs();
    }

    /// Creates the data and log directories.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be resolved or created.
    pub fn initialize_main_dirs(&mut self) -> Result<AppDirs, ConfigError> {
        let data_dir = self.data_dir()?;
        let log_dir = self.log_dir()?;
        AppDirs::create(
            data_dir,
            log_dir,
            self.registry.config_subdir_name(),
            self.registry.tmp_subdir_name(),
        )
    }

    /// The registry.
    #[must_use]
    pub const fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    /// Operating-system name.
    #[must_use]
    pub fn os_name(&self) -> Option<String> {
        self.registry.os_name()
    }

    /// User home directory.
    #[must_use]
    pub fn user_home(&self) -> Option<PathBuf> {
        self.registry.user_home()
    }

    /// `--debug`.
    #[must_use]
    pub fn debug_flag(&self) -> bool {
        self.registry.debug_flag(&self.layers())
    }

    /// `--help`.
    #[must_use]
    pub fn help_flag(&self) -> bool {
        self.registry.help_flag(&self.layers())
    }

    /// `--reset`.
    #[must_use]
    pub fn reset_flag(&self) -> bool {
        self.registry.reset_flag(&self.layers())
    }

    /// `--macros`.
    #[must_use]
    pub fn list_macros_flag(&self) -> bool {
        self.registry.list_macros_flag(&self.layers())
    }

    /// `--version`.
    #[must_use]
    pub fn version_override(&self) -> Option<String> {
        self.registry.version_override(&self.layers())
    }

    /// Fullscreen window.
    #[must_use]
    pub fn fullscreen(&self) -> bool {
        self.registry.fullscreen(&self.layers())
    }

    /// Monitor to use, `-1` if unset.
    #[must_use]
    pub fn monitor(&self) -> i32 {
        self.registry.monitor(&self.layers())
    }

    /// Window geometry as `(width, height, xpos, ypos)`, `-1` where unset.
    #[must_use]
    pub fn window_geometry(&self) -> (i32, i32, i32, i32) {
        let layers = self.layers();
        (
            self.registry.window_width(&layers),
            self.registry.window_height(&layers),
            self.registry.window_xpos(&layers),
            self.registry.window_ypos(&layers),
        )
    }

    /// Campaign to load on startup.
    #[must_use]
    pub fn campaign(&self) -> Option<String> {
        self.registry.campaign(&self.layers())
    }

    /// Start the server on startup.
    #[must_use]
    pub fn load_server(&self) -> bool {
        self.registry.load_server(&self.layers())
    }

    /// Delay before the server starts, in seconds.
    #[must_use]
    pub fn load_server_delay(&self) -> i32 {
        self.registry.load_server_delay(&self.layers())
    }

    /// What to do with a newer autosave.
    #[must_use]
    pub fn autosave_decision(&self) -> AutosaveDecision {
        self.registry.autosave_decision(&self.layers())
    }

    /// Skip the update check.
    #[must_use]
    pub fn skip_auto_update(&self) -> bool {
        self.registry.skip_auto_update(&self.layers())
    }

    /// Default locale.
    #[must_use]
    pub fn default_locale(&self) -> Locale {
        self.registry.default_locale(&self.layers())
    }

    /// Collects every resolved value.
    ///
    /// # Errors
    ///
    /// Returns an error if the log directory cannot be resolved.
    pub fn snapshot(&mut self) -> Result<ResolvedSettings, ConfigError> {
        let data_dir = self.data_dir()?;
        let log_dir = self.log_dir()?;
        let (width, height, xpos, ypos) = self.window_geometry();

        Ok(ResolvedSettings {
            data_dir,
            log_dir,
            startup_file: self.startup_location.path.clone(),
            os_name: self.os_name(),
            debug: self.debug_flag(),
            reset: self.reset_flag(),
            list_macros: self.list_macros_flag(),
            version_override: self.version_override(),
            fullscreen: self.fullscreen(),
            monitor: self.monitor(),
            width,
            height,
            xpos,
            ypos,
            campaign: self.campaign(),
            load_server: self.load_server(),
            load_server_delay: self.load_server_delay(),
            autosave: self.autosave_decision(),
            skip_auto_update: self.skip_auto_update(),
            locale: self.default_locale(),
        })
    }
}

/// Every resolved value at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ResolvedSettings {
    /// Absolute data directory
    pub data_dir: PathBuf,
    /// Absolute log directory
    pub log_dir: PathBuf,
    /// Absolute startup-file path
    pub startup_file: PathBuf,
    /// Operating-system name
    pub os_name: Option<String>,
    /// Debug output enabled
    pub debug: bool,
    /// Reset startup options
    pub reset: bool,
    /// List macro functions
    pub list_macros: bool,
    /// Version override
    pub version_override: Option<String>,
    /// Fullscreen window
    pub fullscreen: bool,
    /// Monitor to use
    pub monitor: i32,
    /// Window width
    pub width: i32,
    /// Window height
    pub height: i32,
    /// Window x coordinate
    pub xpos: i32,
    /// Window y coordinate
    pub ypos: i32,
    /// Campaign to load
    pub campaign: Option<String>,
    /// Start the server on startup
    pub load_server: bool,
    /// Server start delay in seconds
    pub load_server_delay: i32,
    /// Autosave decision
    pub autosave: AutosaveDecision,
    /// Skip the update check
    pub skip_auto_update: bool,
    /// Default locale
    pub locale: Locale,
}

impl fmt::Display for ResolvedSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ data_dir: {}, log_dir: {}, startup_file: {}, os: {}, locale: {}, \
             window: {}x{}@{},{} on {}, fullscreen: {}, campaign: {}, server: {} (+{}s), \
             autosave: {}, skip_update: {}, debug: {} }}",
            self.data_dir.display(),
            self.log_dir.display(),
            self.startup_file.display(),
            self.os_name.as_deref().unwrap_or("unknown"),
            self.locale,
            self.width,
            self.height,
            self.xpos,
            self.ypos,
            self.monitor,
            self.fullscreen,
            self.campaign.as_deref().unwrap_or("none"),
            self.load_server,
            self.load_server_delay,
            self.autosave,
            self.skip_auto_update,
            self.debug,
        )
    }
}
