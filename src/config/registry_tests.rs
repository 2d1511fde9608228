//! Tests for setting resolution across layers.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::cli::CommandLineSource;
use super::error::ConfigError;
use super::registry::{Layers, Locale, PropertyRegistry};
use super::setting::AutosaveDecision;
use super::startup::StartupFileSource;
use super::system::mock::MockProperties;
use super::system::{OS_NAME, USER_HOME, USER_LANGUAGE, USER_REGION};

fn cli(values: &[&str]) -> CommandLineSource {
    CommandLineSource::new(values.iter().copied())
}

fn startup(dir: &TempDir, content: &str) -> StartupFileSource {
    let path = dir.path().join("startup.properties");
    fs::write(&path, content).unwrap();
    StartupFileSource::load(path)
}

fn no_startup(dir: &TempDir) -> StartupFileSource {
    StartupFileSource::load(dir.path().join("absent.properties"))
}

fn with_home(home: &Path) -> MockProperties {
    MockProperties::new().with(USER_HOME, home.to_str().unwrap())
}

fn path_value(path: &Path) -> &str {
    path.to_str().unwrap()
}

mod precedence {
    use super::*;

    #[test]
    fn default_when_no_layer_sets_a_value() {
        let dir = TempDir::new().unwrap();
        let (cli, startup) = (cli(&[]), no_startup(&dir));
        let registry = PropertyRegistry::new(MockProperties::new());
        let layers = Layers::new(&cli, &startup);

        assert_eq!(registry.load_server_delay(&layers), 0);
        assert_eq!(registry.window_width(&layers), -1);
        assert_eq!(registry.monitor(&layers), -1);
        assert_eq!(registry.campaign(&layers), None);
        assert_eq!(registry.version_override(&layers), None);
    }

    #[test]
    fn system_beats_default() {
        let dir = TempDir::new().unwrap();
        let (cli, startup) = (cli(&[]), no_startup(&dir));
        let registry = PropertyRegistry::new(MockProperties::new().with("LOAD_SERVER_DELAY", "3"));

        assert_eq!(registry.load_server_delay(&Layers::new(&cli, &startup)), 3);
    }

    #[test]
    fn startup_file_beats_system() {
        let dir = TempDir::new().unwrap();
        let (cli, startup) = (cli(&[]), startup(&dir, "LOAD_SERVER_DELAY=4\n"));
        let registry = PropertyRegistry::new(MockProperties::new().with("LOAD_SERVER_DELAY", "3"));

        assert_eq!(registry.load_server_delay(&Layers::new(&cli, &startup)), 4);
    }

    #[test]
    fn command_line_beats_startup_file() {
        let dir = TempDir::new().unwrap();
        let (cli, startup) = (
            cli(&["--server-delay", "5"]),
            startup(&dir, "LOAD_SERVER_DELAY=4\n"),
        );
        let registry = PropertyRegistry::new(MockProperties::new().with("LOAD_SERVER_DELAY", "3"));

        assert_eq!(registry.load_server_delay(&Layers::new(&cli, &startup)), 5);
    }

    #[test]
    fn unparseable_layer_falls_through() {
        let dir = TempDir::new().unwrap();
        let (cli, startup) = (
            cli(&["--server-delay", "soon"]),
            startup(&dir, "LOAD_SERVER_DELAY=4\n"),
        );
        let registry = PropertyRegistry::new(MockProperties::new());

        assert_eq!(registry.load_server_delay(&Layers::new(&cli, &startup)), 4);
    }

    #[test]
    fn command_line_only_settings_ignore_startup_file() {
        let dir = TempDir::new().unwrap();
        let (cli, startup) = (cli(&[]), startup(&dir, "WINDOW_WIDTH=800\n"));
        let registry = PropertyRegistry::new(MockProperties::new().with("WINDOW_WIDTH", "640"));

        assert_eq!(registry.window_width(&Layers::new(&cli, &startup)), -1);
    }

    #[test]
    fn window_geometry_from_command_line() {
        let dir = TempDir::new().unwrap();
        let (cli, startup) = (
            cli(&["-g", "1", "-w", "1024", "-h", "768", "-x", "-1920", "-y", "0"]),
            no_startup(&dir),
        );
        let registry = PropertyRegistry::new(MockProperties::new());
        let layers = Layers::new(&cli, &startup);

        assert_eq!(registry.monitor(&layers), 1);
        assert_eq!(registry.window_width(&layers), 1024);
        assert_eq!(registry.window_height(&layers), 768);
        assert_eq!(registry.window_xpos(&layers), -1920);
        assert_eq!(registry.window_ypos(&layers), 0);
    }
}

mod flags {
    use super::*;

    #[test]
    fn startup_key_enables_regardless_of_value() {
        let dir = TempDir::new().unwrap();
        let (cli, startup) = (
            cli(&[]),
            startup(&dir, "FULLSCREEN_FLAG=false\nLOAD_SERVER_FLAG=no\n"),
        );
        let registry = PropertyRegistry::new(MockProperties::new());
        let layers = Layers::new(&cli, &startup);

        assert!(registry.fullscreen(&layers));
        assert!(registry.load_server(&layers));
    }

    #[test]
    fn command_line_switch_enables() {
        let dir = TempDir::new().unwrap();
        let (cli, startup) = (cli(&["-f", "-S"]), no_startup(&dir));
        let registry = PropertyRegistry::new(MockProperties::new());
        let layers = Layers::new(&cli, &startup);

        assert!(registry.fullscreen(&layers));
        assert!(registry.load_server(&layers));
    }

    #[test]
    fn absent_everywhere_is_false() {
        let dir = TempDir::new().unwrap();
        let (cli, startup) = (cli(&[]), no_startup(&dir));
        let registry = PropertyRegistry::new(MockProperties::new().with("FULLSCREEN_FLAG", "true"));
        let layers = Layers::new(&cli, &startup);

        assert!(!registry.fullscreen(&layers));
        assert!(!registry.load_server(&layers));
        assert!(!registry.skip_auto_update(&layers));
    }

    #[test]
    fn skip_auto_update_from_startup_file_only() {
        let dir = TempDir::new().unwrap();
        let (cli, startup) = (cli(&[]), startup(&dir, "SKIP_AUTO_UPDATE_FLAG\n"));
        let registry = PropertyRegistry::new(MockProperties::new());

        assert!(registry.skip_auto_update(&Layers::new(&cli, &startup)));
    }

    #[test]
    fn command_line_only_switches() {
        let dir = TempDir::new().unwrap();
        let (cli, startup) = (cli(&["-d", "-r", "-m", "-?"]), no_startup(&dir));
        let registry = PropertyRegistry::new(MockProperties::new());
        let layers = Layers::new(&cli, &startup);

        assert!(registry.debug_flag(&layers));
        assert!(registry.reset_flag(&layers));
        assert!(registry.list_macros_flag(&layers));
        assert!(registry.help_flag(&layers));
    }
}

mod values {
    use super::*;

    #[test]
    fn autosave_is_classified_by_first_letter() {
        let dir = TempDir::new().unwrap();
        let startup = no_startup(&dir);
        let registry = PropertyRegistry::new(MockProperties::new());

        for (value, expected) in [
            ("yes", AutosaveDecision::Yes),
            ("Y", AutosaveDecision::Yes),
            ("No", AutosaveDecision::No),
            ("never", AutosaveDecision::No),
            ("maybe", AutosaveDecision::Ask),
        ] {
            let cli = cli(&["--autosave", value]);
            assert_eq!(
                registry.autosave_decision(&Layers::new(&cli, &startup)),
                expected,
                "{value:?}"
            );
        }
    }

    #[test]
    fn autosave_defaults_to_ask() {
        let dir = TempDir::new().unwrap();
        let (cli, startup) = (cli(&[]), no_startup(&dir));
        let registry = PropertyRegistry::new(MockProperties::new());

        assert_eq!(
            registry.autosave_decision(&Layers::new(&cli, &startup)),
            AutosaveDecision::Ask
        );
    }

    #[test]
    fn autosave_from_startup_file() {
        let dir = TempDir::new().unwrap();
        let (cli, startup) = (cli(&[]), startup(&dir, "LOAD_AUTOSAVE_FILE=yes\n"));
        let registry = PropertyRegistry::new(MockProperties::new());

        assert_eq!(
            registry.autosave_decision(&Layers::new(&cli, &startup)),
            AutosaveDecision::Yes
        );
    }

    #[test]
    fn version_override_from_command_line() {
        let dir = TempDir::new().unwrap();
        let (cli, startup) = (cli(&["-v", "1.13.2"]), no_startup(&dir));
        let registry = PropertyRegistry::new(MockProperties::new());

        assert_eq!(
            registry.version_override(&Layers::new(&cli, &startup)).as_deref(),
            Some("1.13.2")
        );
    }

    #[test]
    fn locale_from_system_properties() {
        let dir = TempDir::new().unwrap();
        let (cli, startup) = (cli(&[]), no_startup(&dir));
        let registry = PropertyRegistry::new(
            MockProperties::new()
                .with(USER_LANGUAGE, "de")
                .with(USER_REGION, "AT"),
        );

        let locale = registry.default_locale(&Layers::new(&cli, &startup));

        assert_eq!(
            locale,
            Locale {
                language: "de".to_string(),
                region: "AT".to_string()
            }
        );
        assert_eq!(locale.to_string(), "de_AT");
    }

    #[test]
    fn locale_from_startup_file_beats_system() {
        let dir = TempDir::new().unwrap();
        let (cli, startup) = (cli(&[]), startup(&dir, "user.language=fr\n"));
        let registry = PropertyRegistry::new(MockProperties::new().with(USER_LANGUAGE, "de"));

        let locale = registry.default_locale(&Layers::new(&cli, &startup));

        assert_eq!(locale.language, "fr");
        assert_eq!(locale.to_string(), "fr");
    }

    #[test]
    fn locale_defaults_to_english() {
        let dir = TempDir::new().unwrap();
        let (cli, startup) = (cli(&[]), no_startup(&dir));
        let registry = PropertyRegistry::new(MockProperties::new());

        assert_eq!(
            registry.default_locale(&Layers::new(&cli, &startup)).to_string(),
            "en"
        );
    }
}

mod campaign {
    use super::*;

    const STARTUP: &str = "LOAD_CAMPAIGN_NAME=/saved/startup.cmpgn\n";

    #[test]
    fn system_property_is_used() {
        let dir = TempDir::new().unwrap();
        let (cli, startup) = (cli(&[]), no_startup(&dir));
        let registry =
            PropertyRegistry::new(MockProperties::new().with("LOAD_CAMPAIGN_NAME", "sys.cmpgn"));

        assert_eq!(
            registry.campaign(&Layers::new(&cli, &startup)).as_deref(),
            Some("sys.cmpgn")
        );
    }

    #[test]
    fn startup_file_beats_system() {
        let dir = TempDir::new().unwrap();
        let (cli, startup) = (cli(&[]), startup(&dir, STARTUP));
        let registry =
            PropertyRegistry::new(MockProperties::new().with("LOAD_CAMPAIGN_NAME", "sys.cmpgn"));

        assert_eq!(
            registry.campaign(&Layers::new(&cli, &startup)).as_deref(),
            Some("/saved/startup.cmpgn")
        );
    }

    #[test]
    fn deprecated_option_beats_startup_file() {
        let dir = TempDir::new().unwrap();
        let (cli, startup) = (cli(&["-F", "old.cmpgn"]), startup(&dir, STARTUP));
        let registry = PropertyRegistry::new(MockProperties::new());

        assert_eq!(
            registry.campaign(&Layers::new(&cli, &startup)).as_deref(),
            Some("old.cmpgn")
        );
    }

    #[test]
    fn campaign_option_beats_deprecated_option() {
        let dir = TempDir::new().unwrap();
        for args in [
            ["-C", "new.cmpgn", "-F", "old.cmpgn"],
            ["-F", "old.cmpgn", "-C", "new.cmpgn"],
        ] {
            let (cli, startup) = (cli(&args), startup(&dir, STARTUP));
            let registry = PropertyRegistry::new(MockProperties::new());

            assert_eq!(
                registry.campaign(&Layers::new(&cli, &startup)).as_deref(),
                Some("new.cmpgn")
            );
        }
    }
}

mod directories {
    use super::*;

    #[test]
    fn default_data_dir_is_under_home() {
        let home = TempDir::new().unwrap();
        let cli = cli(&[]);
        let mut registry = PropertyRegistry::new(with_home(home.path()));

        let data_dir = registry.data_dir(&Layers::command_line_only(&cli)).unwrap();

        assert_eq!(data_dir, home.path().join(".maptool"));
    }

    #[test]
    fn relative_data_dir_is_under_home() {
        let home = TempDir::new().unwrap();
        let cli = cli(&[]);
        let mut registry =
            PropertyRegistry::new(with_home(home.path()).with("MAPTOOL_DATADIR", "mydata"));

        let data_dir = registry.data_dir(&Layers::command_line_only(&cli)).unwrap();

        assert_eq!(data_dir, home.path().join("mydata"));
    }

    #[cfg(unix)]
    #[test]
    fn relative_data_dir_joins_literal_home() {
        let cli = cli(&[]);
        let mut registry = PropertyRegistry::new(
            MockProperties::new()
                .with(USER_HOME, "/home/alice")
                .with("MAPTOOL_DATADIR", "mydata"),
        );

        assert_eq!(
            registry.data_dir(&Layers::command_line_only(&cli)).unwrap(),
            PathBuf::from("/home/alice/mydata")
        );
    }

    #[cfg(unix)]
    #[test]
    fn absolute_data_dir_is_kept() {
        let cli = cli(&[]);
        let mut registry = PropertyRegistry::new(
            MockProperties::new()
                .with(USER_HOME, "/home/alice")
                .with("MAPTOOL_DATADIR", "/srv/maptool-data"),
        );

        assert_eq!(
            registry.data_dir(&Layers::command_line_only(&cli)).unwrap(),
            PathBuf::from("/srv/maptool-data")
        );
    }

    #[test]
    fn command_line_data_dir_beats_system() {
        let home = TempDir::new().unwrap();
        let cli_dir = home.path().join("from-cli");
        let cli = cli(&["--datadir", path_value(&cli_dir)]);
        let mut registry =
            PropertyRegistry::new(with_home(home.path()).with("MAPTOOL_DATADIR", "mydata"));

        assert_eq!(
            registry.data_dir(&Layers::command_line_only(&cli)).unwrap(),
            cli_dir
        );
    }

    #[test]
    fn relative_data_dir_without_home_fails() {
        let cli = cli(&[]);
        let mut registry = PropertyRegistry::new(MockProperties::new());

        assert!(matches!(
            registry.data_dir(&Layers::command_line_only(&cli)),
            Err(ConfigError::UnknownHome)
        ));
    }

    #[test]
    fn exclamation_mark_is_rejected_and_not_cached() {
        let home = TempDir::new().unwrap();
        let bad = home.path().join("bad!dir");
        let props = with_home(home.path()).with("MAPTOOL_DATADIR", path_value(&bad));
        let counter = props.clone();
        let cli = cli(&[]);
        let mut registry = PropertyRegistry::new(props);

        for _ in 0..2 {
            assert!(matches!(
                registry.data_dir(&Layers::command_line_only(&cli)),
                Err(ConfigError::UnusablePath { .. })
            ));
        }
        assert_eq!(counter.reads_of("MAPTOOL_DATADIR"), 2);
    }

    #[test]
    fn data_dir_is_cached() {
        let home = TempDir::new().unwrap();
        let props = with_home(home.path());
        let counter = props.clone();
        let cli = cli(&[]);
        let mut registry = PropertyRegistry::new(props);

        let first = registry.data_dir(&Layers::command_line_only(&cli)).unwrap();
        let second = registry.data_dir(&Layers::command_line_only(&cli)).unwrap();

        assert_eq!(first, second);
        assert_eq!(counter.reads_of("MAPTOOL_DATADIR"), 1);
    }

    #[test]
    #[allow(deprecated)]
    fn reset_forces_recomputation() {
        let home = TempDir::new().unwrap();
        let props = with_home(home.path());
        let counter = props.clone();
        let cli = cli(&[]);
        let mut registry = PropertyRegistry::new(props);

        registry.data_dir(&Layers::command_line_only(&cli)).unwrap();
        registry.reset_cached_dirs();
        registry.data_dir(&Layers::command_line_only(&cli)).unwrap();

        assert_eq!(counter.reads_of("MAPTOOL_DATADIR"), 2);
    }

    #[test]
    fn default_log_dir_is_under_data_dir() {
        let home = TempDir::new().unwrap();
        let (cli, startup) = (cli(&[]), no_startup(&home));
        let mut registry = PropertyRegistry::new(with_home(home.path()));

        let log_dir = registry.log_dir(&Layers::new(&cli, &startup)).unwrap();

        assert_eq!(log_dir, home.path().join(".maptool").join("logs"));
    }

    #[test]
    fn relative_log_dir_from_startup_file() {
        let home = TempDir::new().unwrap();
        let (cli, startup) = (cli(&[]), startup(&home, "MAPTOOL_LOGDIR=journal\n"));
        let mut registry = PropertyRegistry::new(with_home(home.path()));

        let log_dir = registry.log_dir(&Layers::new(&cli, &startup)).unwrap();

        assert_eq!(log_dir, home.path().join(".maptool").join("journal"));
    }

    #[test]
    fn absolute_log_dir_is_kept() {
        let home = TempDir::new().unwrap();
        let logs = home.path().join("var").join("log");
        let (cli, startup) = (cli(&[]), no_startup(&home));
        let mut registry =
            PropertyRegistry::new(with_home(home.path()).with("MAPTOOL_LOGDIR", path_value(&logs)));

        assert_eq!(registry.log_dir(&Layers::new(&cli, &startup)).unwrap(), logs);
    }

    #[test]
    fn log_dir_is_cached_and_published() {
        let home = TempDir::new().unwrap();
        let props = with_home(home.path());
        let counter = props.clone();
        let (cli, startup) = (cli(&[]), no_startup(&home));
        let mut registry = PropertyRegistry::new(props);

        let first = registry.log_dir(&Layers::new(&cli, &startup)).unwrap();
        let second = registry.log_dir(&Layers::new(&cli, &startup)).unwrap();

        assert_eq!(first, second);
        assert_eq!(counter.reads_of("MAPTOOL_LOGDIR"), 1);
        assert_eq!(
            registry.system_property("MAPTOOL_LOGDIR"),
            Some(first.display().to_string())
        );
    }
}

mod startup_location {
    use super::*;

    #[test]
    fn default_name_is_placed_in_config_subdir() {
        let home = TempDir::new().unwrap();
        let props = with_home(home.path());
        let counter = props.clone();
        let cli = cli(&[]);
        let mut registry = PropertyRegistry::new(props);

        let location = registry.startup_file(&cli).unwrap().clone();

        assert_eq!(
            location.path,
            home.path()
                .join(".maptool")
                .join("config")
                .join("startup.properties")
        );
        assert_eq!(location.original, "startup.properties");
        assert!(!location.absolute);
        assert_eq!(counter.reads_of("MAPTOOL_DATADIR"), 1);
    }

    #[test]
    fn absolute_name_does_not_resolve_data_dir() {
        let home = TempDir::new().unwrap();
        let file = home.path().join("custom.properties");
        let props = with_home(home.path());
        let counter = props.clone();
        let cli = cli(&["-P", path_value(&file)]);
        let mut registry = PropertyRegistry::new(props);

        let location = registry.startup_file(&cli).unwrap().clone();

        assert_eq!(location.path, file);
        assert!(location.absolute);
        assert_eq!(counter.reads_of("MAPTOOL_DATADIR"), 0);
    }

    #[test]
    fn system_property_names_the_file() {
        let home = TempDir::new().unwrap();
        let mut registry = PropertyRegistry::new(
            with_home(home.path()).with("MAPTOOL_STARTUP_FILE", "alt.properties"),
        );

        let location = registry.startup_file(&cli(&[])).unwrap().clone();

        assert_eq!(
            location.path,
            home.path().join(".maptool").join("config").join("alt.properties")
        );
    }

    #[test]
    fn command_line_beats_system_property() {
        let home = TempDir::new().unwrap();
        let mut registry = PropertyRegistry::new(
            with_home(home.path()).with("MAPTOOL_STARTUP_FILE", "alt.properties"),
        );

        let location = registry
            .startup_file(&cli(&["--props-file=cli.properties"]))
            .unwrap()
            .clone();

        assert_eq!(location.original, "cli.properties");
    }

    #[test]
    fn unusable_name_is_rejected() {
        let home = TempDir::new().unwrap();
        let mut registry = PropertyRegistry::new(with_home(home.path()));

        assert!(matches!(
            registry.startup_file(&cli(&["-P", "start!.properties"])),
            Err(ConfigError::UnusablePath { .. })
        ));
        assert!(registry.startup_file_location().is_none());
    }

    #[test]
    fn absolute_startup_file_may_relocate_data_dir() {
        let home = TempDir::new().unwrap();
        let relocated = home.path().join("relocated");
        let file = home.path().join("custom.properties");
        fs::write(
            &file,
            format!("MAPTOOL_DATADIR={}\n", path_value(&relocated).replace('\\', "\\\\")),
        )
        .unwrap();

        let cli = cli(&["-P", path_value(&file)]);
        let mut registry =
            PropertyRegistry::new(with_home(home.path()).with("MAPTOOL_DATADIR", "from-system"));
        registry.startup_file(&cli).unwrap();
        let startup = StartupFileSource::load(&file);

        assert_eq!(
            registry.data_dir(&Layers::new(&cli, &startup)).unwrap(),
            relocated
        );
    }

    #[test]
    fn command_line_data_dir_beats_relocating_startup_file() {
        let home = TempDir::new().unwrap();
        let file = home.path().join("custom.properties");
        fs::write(&file, "MAPTOOL_DATADIR=from-file\n").unwrap();

        let cli = cli(&["-P", path_value(&file), "-D", "from-cli"]);
        let mut registry = PropertyRegistry::new(with_home(home.path()));
        registry.startup_file(&cli).unwrap();
        let startup = StartupFileSource::load(&file);

        assert_eq!(
            registry.data_dir(&Layers::new(&cli, &startup)).unwrap(),
            home.path().join("from-cli")
        );
    }
}

mod platform {
    use super::*;

    fn registry_on(os: &str) -> PropertyRegistry {
        PropertyRegistry::new(MockProperties::new().with(OS_NAME, os))
    }

    #[test]
    fn classifies_operating_systems() {
        assert!(registry_on("Windows 10").is_windows());
        assert!(registry_on("windows").is_windows());
        assert!(registry_on("Mac OS X").is_mac());
        assert!(registry_on("macos").is_mac());
        assert!(registry_on("Linux").is_unix());
        assert!(registry_on("FreeBSD").is_unix());

        assert!(!registry_on("Linux").is_windows());
        assert!(!registry_on("Windows 11").is_unix());
    }

    #[test]
    fn unknown_os_is_nothing() {
        let registry = PropertyRegistry::new(MockProperties::new());

        assert_eq!(registry.os_name(), None);
        assert!(!registry.is_windows());
        assert!(!registry.is_mac());
        assert!(!registry.is_unix());
    }

    #[test]
    fn user_home_from_system_property() {
        let registry = PropertyRegistry::new(MockProperties::new().with(USER_HOME, "/home/bob"));

        assert_eq!(registry.user_home(), Some(PathBuf::from("/home/bob")));
        assert_eq!(PropertyRegistry::new(MockProperties::new()).user_home(), None);
    }
}
