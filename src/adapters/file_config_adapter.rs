//! INI configuration adapter.

use std::path::{Path, PathBuf};

use configparser::ini::Ini;

use crate::domain::error::TradeLensError;
use crate::ports::config_port::ConfigPort;

/// `[section] key = value` settings backed by `configparser`.
///
/// Section and key names are case-insensitive; values are returned trimmed.
#[derive(Debug)]
pub struct FileConfigAdapter {
    ini: Ini,
    origin: Option<PathBuf>,
}

impl FileConfigAdapter {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TradeLensError> {
        let path = path.as_ref();
        let mut ini = Ini::new();
        ini.load(path).map_err(|reason| TradeLensError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self {
            ini,
            origin: Some(path.to_path_buf()),
        })
    }

    pub fn from_string(content: &str) -> Result<Self, TradeLensError> {
        let mut ini = Ini::new();
        ini.read(content.to_string())
            .map_err(|reason| TradeLensError::ConfigParse {
                file: "<inline>".to_string(),
                reason,
            })?;
        Ok(Self { ini, origin: None })
    }

    /// No sections at all; every lookup falls back to its default.
    pub fn empty() -> Self {
        Self {
            ini: Ini::new(),
            origin: None,
        }
    }

    /// File the settings were read from, if any.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.ini.get(section, key).map(|v| v.trim().to_string())
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        match self.ini.getint(section, key) {
            Ok(Some(value)) => value,
            _ => default,
        }
    }
}
