//! System-property layer.
//!
//! This module provides a [`PropertySource`] trait so the registry can be
//! driven by an in-memory map in tests while production code reads the
//! process environment.

use std::collections::HashMap;
use std::env;

use super::defaults;

/// Key of the operating-system name.
pub const OS_NAME: &str = "os.name";
/// Key of the user home directory.
pub const USER_HOME: &str = "user.home";
/// Key of the locale language.
pub const USER_LANGUAGE: &str = "user.language";
/// Key of the locale region.
pub const USER_REGION: &str = "user.region";

/// Abstraction over process-wide system properties.
///
/// Values written with [`PropertySource::set`] are visible to later reads
/// from the same source.
pub trait PropertySource: Send + Sync {
    /// Returns the value of a property.
    fn get(&self, key: &str) -> Option<String>;

    /// Publishes a property for later readers.
    fn set(&mut self, key: &str, value: &str);
}

/// Production property source backed by the process environment.
///
/// Well-known keys (`os.name`, `user.home`, `user.language`, `user.region`)
/// are derived from the platform; every other key is read as an environment
/// variable. Published values shadow both.
#[derive(Debug, Clone, Default)]
pub struct SystemEnvironment {
    published: HashMap<String, String>,
}

impl SystemEnvironment {
    /// Creates a source with nothing published yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn derived(key: &str) -> Option<String> {
        match key {
            OS_NAME => Some(env::consts::OS.to_string()),
            USER_HOME => dirs::home_dir().map(|p| p.display().to_string()),
            USER_LANGUAGE => locale_from_env().map(|(language, _)| language),
            USER_REGION => locale_from_env().map(|(_, region)| region),
            _ => env::var(key).ok(),
        }
    }
}

impl PropertySource for SystemEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        self.published
            .get(key)
            .cloned()
            .or_else(|| Self::derived(key))
    }

    fn set(&mut self, key: &str, value: &str) {
        self.published.insert(key.to_string(), value.to_string());
    }
}

/// Reads language and region from the POSIX locale variables.
fn locale_from_env() -> Option<(String, String)> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.is_empty())
        .and_then(|value| parse_posix_locale(&value))
}

/// Splits `ll_RR.encoding@modifier` into language and region.
///
/// `C` and `POSIX` carry no language and yield the defaults.
fn parse_posix_locale(value: &str) -> Option<(String, String)> {
    let base = value
        .split(['.', '@'])
        .next()
        .filter(|base| !base.is_empty())?;

    if base == "C" || base == "POSIX" {
        return Some((
            defaults::LOCALE_LANGUAGE.to_string(),
            defaults::LOCALE_REGION.to_string(),
        ));
    }

    let (language, region) = base.split_once(['_', '-']).unwrap_or((base, ""));
    Some((language.to_lowercase(), region.to_uppercase()))
}
