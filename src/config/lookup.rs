//! Typed lookups shared by the command-line and startup-file layers.

/// A layer that can answer "is this key present?" and "what is its raw value?".
///
/// The typed helpers treat a missing or unparseable value as absent and
/// substitute the caller's default; they never fail.
pub trait Lookup {
    /// Returns true if the key is present, regardless of its value.
    fn is_set(&self, key: &str) -> bool;

    /// Returns the raw textual value of the key, if it has one.
    fn raw(&self, key: &str) -> Option<&str>;

    /// Returns the value of the key, or `default` if absent.
    fn string_or(&self, key: &str, default: Option<String>) -> Option<String> {
        self.raw(key).map(str::to_owned).or(default)
    }

    /// Returns the value of the key as an integer, or `default` if absent or not a number.
    fn int_or(&self, key: &str, default: i32) -> i32 {
        self.raw(key)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(default)
    }
}
