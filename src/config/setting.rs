//! Static descriptors for every named setting.
//!
//! A [`Setting`] is the stable identifier callers use to ask for a value.
//! Its [`Descriptor`] tells the registry under which keys the value may
//! appear in each layer and what the hardcoded default is.

use std::fmt;

use super::defaults;

/// Identifier of one named, overridable setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Setting {
    /// Name of the running operating system.
    OsName,
    /// Home directory of the current user.
    UserHome,
    /// Directory holding all application data.
    DataDir,
    /// Directory holding log files.
    LogDir,
    /// Configuration subdirectory of the data directory.
    ConfigSubdir,
    /// Temporary-files subdirectory of the data directory.
    TmpSubdir,
    /// Print the option table and exit.
    Help,
    /// Enhanced debug output.
    Debug,
    /// Reset startup options to their defaults.
    Reset,
    /// Display the list of macro functions.
    ListMacros,
    /// Override of the reported application version.
    VersionOverride,
    /// Start with a maximized window.
    Fullscreen,
    /// Monitor (graphical device) to open the window on.
    Monitor,
    /// Initial window width.
    WindowWidth,
    /// Initial window height.
    WindowHeight,
    /// Initial window x coordinate.
    WindowXpos,
    /// Initial window y coordinate.
    WindowYpos,
    /// Start the server on startup.
    LoadServer,
    /// Seconds to wait before starting the server.
    LoadServerDelay,
    /// Campaign to load on startup.
    LoadCampaign,
    /// Campaign to load on startup, old spelling.
    DeprecatedLoadCampaign,
    /// Whether a newer autosave should replace the campaign to load.
    LoadAutosave,
    /// Name (and optionally path) of the startup properties file.
    StartupFile,
    /// Skip the automatic update check.
    SkipAutoUpdate,
    /// Language part of the default locale.
    LocaleLanguage,
    /// Region part of the default locale.
    LocaleRegion,
}

/// Where a setting may be overridden and what it falls back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    /// Key in the system-property layer (and the startup file).
    /// `Some("")` means "use the setting's identifier".
    pub system_key: Option<&'static str>,
    /// Long command-line option, `None` if not overridable from the command line.
    pub cli_long: Option<&'static str>,
    /// Textual default, `None` if the caller must cope with absence.
    pub default_value: Option<&'static str>,
}

impl Descriptor {
    const fn new(
        system_key: Option<&'static str>,
        cli_long: Option<&'static str>,
        default_value: Option<&'static str>,
    ) -> Self {
        Self {
            system_key,
            cli_long,
            default_value,
        }
    }
}

/// Settings that may be read from (and written to) the startup file.
pub const STARTUP_FILE_SETTINGS: [Setting; 10] = [
    Setting::DataDir,
    Setting::LogDir,
    Setting::LoadServer,
    Setting::LoadServerDelay,
    Setting::LoadCampaign,
    Setting::LoadAutosave,
    Setting::LocaleLanguage,
    Setting::LocaleRegion,
    Setting::Fullscreen,
    Setting::SkipAutoUpdate,
];

impl Setting {
    /// Every setting, in declaration order.
    pub const ALL: [Self; 26] = [
        Self::OsName,
        Self::UserHome,
        Self::DataDir,
        Self::LogDir,
        Self::ConfigSubdir,
        Self::TmpSubdir,
        Self::Help,
        Self::Debug,
        Self::Reset,
        Self::ListMacros,
        Self::VersionOverride,
        Self::Fullscreen,
        Self::Monitor,
        Self::WindowWidth,
        Self::WindowHeight,
        Self::WindowXpos,
        Self::WindowYpos,
        Self::LoadServer,
        Self::LoadServerDelay,
        Self::LoadCampaign,
        Self::DeprecatedLoadCampaign,
        Self::LoadAutosave,
        Self::StartupFile,
        Self::SkipAutoUpdate,
        Self::LocaleLanguage,
        Self::LocaleRegion,
    ];

    /// Stable identifier, also used as key when the descriptor declares an empty one.
    #[must_use]
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::OsName => "OS_NAME",
            Self::UserHome => "USER_HOME",
            Self::DataDir => "DATA_DIR_NAME",
            Self::LogDir => "LOG_DIR_NAME",
            Self::ConfigSubdir => "CONFIG_SUBDIR_NAME",
            Self::TmpSubdir => "TEMP_SUBDIR_NAME",
            Self::Help => "CMD_OPTIONS_HELP",
            Self::Debug => "DEBUG_FLAG",
            Self::Reset => "RESET_FLAG",
            Self::ListMacros => "LIST_MACROS_FLAG",
            Self::VersionOverride => "VERSION_OVERWRITE",
            Self::Fullscreen => "FULLSCREEN_FLAG",
            Self::Monitor => "MONITOR_TO_USE",
            Self::WindowWidth => "WINDOW_WIDTH",
            Self::WindowHeight => "WINDOW_HEIGHT",
            Self::WindowXpos => "WINDOW_XPOS",
            Self::WindowYpos => "WINDOW_YPOS",
            Self::LoadServer => "LOAD_SERVER_FLAG",
            Self::LoadServerDelay => "LOAD_SERVER_DELAY",
            Self::LoadCampaign => "LOAD_CAMPAIGN_NAME",
            Self::DeprecatedLoadCampaign => "DEPRECATED_LOAD_CAMPAIGN_NAME",
            Self::LoadAutosave => "LOAD_AUTOSAVE_FILE",
            Self::StartupFile => "STARTUP_PROPS_FILE_NAME",
            Self::SkipAutoUpdate => "SKIP_AUTO_UPDATE_FLAG",
            Self::LocaleLanguage => "LOCALE_LANGUAGE",
            Self::LocaleRegion => "LOCALE_REGION",
        }
    }

    /// The descriptor table.
    #[must_use]
    pub const fn descriptor(self) -> Descriptor {
        match self {
            Self::OsName => Descriptor::new(Some("os.name"), None, None),
            Self::UserHome => Descriptor::new(Some("user.home"), None, None),
            Self::DataDir => Descriptor::new(
                Some("MAPTOOL_DATADIR"),
                Some("datadir"),
                Some(defaults::DATA_DIR_NAME),
            ),
            Self::LogDir => {
                Descriptor::new(Some("MAPTOOL_LOGDIR"), None, Some(defaults::LOG_DIR_NAME))
            }
            Self::ConfigSubdir => Descriptor::new(None, None, Some(defaults::CONFIG_SUBDIR_NAME)),
            Self::TmpSubdir => Descriptor::new(None, None, Some(defaults::TMP_SUBDIR_NAME)),
            Self::Help => Descriptor::new(None, Some("help"), Some("false")),
            Self::Debug => Descriptor::new(None, Some("debug"), Some("false")),
            Self::Reset => Descriptor::new(None, Some("reset"), Some("false")),
            Self::ListMacros => Descriptor::new(None, Some("macros"), Some("false")),
            Self::VersionOverride => Descriptor::new(None, Some("version"), None),
            Self::Fullscreen => Descriptor::new(Some(""), Some("fullscreen"), Some("false")),
            Self::Monitor => Descriptor::new(None, Some("monitor"), Some(defaults::UNSET_INT)),
            Self::WindowWidth => Descriptor::new(None, Some("width"), Some(defaults::UNSET_INT)),
            Self::WindowHeight => Descriptor::new(None, Some("height"), Some(defaults::UNSET_INT)),
            Self::WindowXpos => Descriptor::new(None, Some("xpos"), Some(defaults::UNSET_INT)),
            Self::WindowYpos => Descriptor::new(None, Some("ypos"), Some(defaults::UNSET_INT)),
            Self::LoadServer => Descriptor::new(Some(""), Some("server"), Some("false")),
            Self::LoadServerDelay => Descriptor::new(
                Some(""),
                Some("server-delay"),
                Some(defaults::LOAD_SERVER_DELAY),
            ),
            Self::LoadCampaign => Descriptor::new(Some(""), Some("campaign"), None),
            Self::DeprecatedLoadCampaign => Descriptor::new(None, Some("file"), None),
            Self::LoadAutosave => {
                Descriptor::new(Some(""), Some("autosave"), Some(defaults::LOAD_AUTOSAVE))
            }
            Self::StartupFile => Descriptor::new(
                Some("MAPTOOL_STARTUP_FILE"),
                Some("props-file"),
                Some(defaults::STARTUP_FILE_NAME),
            ),
            Self::SkipAutoUpdate => Descriptor::new(Some(""), None, Some("false")),
            Self::LocaleLanguage => Descriptor::new(
                Some("user.language"),
                None,
                Some(defaults::LOCALE_LANGUAGE),
            ),
            Self::LocaleRegion => {
                Descriptor::new(Some("user.region"), None, Some(defaults::LOCALE_REGION))
            }
        }
    }

    /// Key in the system-property layer, with an empty declared key replaced by
    /// [`Self::identifier`].
    #[must_use]
    pub fn key(self) -> Option<&'static str> {
        match self.descriptor().system_key {
            Some("") => Some(self.identifier()),
            other => other,
        }
    }

    /// Long command-line option, if any.
    #[must_use]
    pub const fn cli_long(self) -> Option<&'static str> {
        self.descriptor().cli_long
    }

    /// Textual default, if any.
    #[must_use]
    pub const fn default_value(self) -> Option<&'static str> {
        self.descriptor().default_value
    }

    /// Default parsed as an integer, [`defaults::INT_FALLBACK`] when absent or unparseable.
    #[must_use]
    pub fn default_int(self) -> i32 {
        self.default_value()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults::INT_FALLBACK)
    }

    /// Default classified as an [`AutosaveDecision`].
    #[must_use]
    pub fn default_decision(self) -> AutosaveDecision {
        AutosaveDecision::classify(self.default_value().unwrap_or_default())
    }

    /// Returns true if the setting is on the startup-file allow-list.
    #[must_use]
    pub fn in_startup_file(self) -> bool {
        STARTUP_FILE_SETTINGS.contains(&self)
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Three-valued answer to "load the newer autosave file?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutosaveDecision {
    /// Load the autosave.
    Yes,
    /// Keep the requested campaign.
    No,
    /// Ask the user.
    #[default]
    Ask,
}

impl AutosaveDecision {
    /// Classifies a value by its first letter, case-insensitive.
    ///
    /// `y…` is [`Self::Yes`], `n…` is [`Self::No`], anything else (including
    /// the empty string) is [`Self::Ask`].
    #[must_use]
    pub fn classify(value: &str) -> Self {
        match value.trim_start().chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('y') => Self::Yes,
            Some('n') => Self::No,
            _ => Self::Ask,
        }
    }
}

impl fmt::Display for AutosaveDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes => write!(f, "yes"),
            Self::No => write!(f, "no"),
            Self::Ask => write!(f, "ask"),
        }
    }
}
