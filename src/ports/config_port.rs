//! Configuration access port trait.

/// Typed lookups over `[section] key = value` configuration.
///
/// Only `get_string` is required; `get_int` parses it and falls back
/// to `default` when the key is absent or unparsable.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.get_string(section, key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}
