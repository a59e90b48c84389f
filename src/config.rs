/// Runtime configuration loaded from environment variables.

use chrono::FixedOffset;
use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

const DEFAULT_DB_NAME: &str = "hms4";

/// Settings shared by the record sources and the CLI.
#[derive(Debug, Clone)]
pub struct Config {
    /// Prefix of every collection name (`{db_name}_doctors`, ...)
    pub db_name: String,
    /// Offset of the providers' local calendar from UTC, in minutes
    pub utc_offset_minutes: i32,
    /// Snapshot file to load at startup
    pub snapshot_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_name: DEFAULT_DB_NAME.to_string(),
            utc_offset_minutes: 0,
            snapshot_path: None,
        }
    }
}

impl Config {
    /// Create a configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `HMS_DB_NAME` (optional, default: `hms4`): collection prefix
    /// - `HMS_UTC_OFFSET_MINUTES` (optional, default: 0): provider calendar offset
    /// - `HMS_SNAPSHOT` (optional): JSON snapshot file to load
    ///
    /// # Errors
    /// Returns an error if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_name = lookup("HMS_DB_NAME")
            .map(|name| name.trim().to_string())
            .unwrap_or_else(|| DEFAULT_DB_NAME.to_string());
        if db_name.is_empty() {
            return Err(Error::Config("HMS_DB_NAME cannot be empty".to_string()));
        }

        let utc_offset_minutes = match lookup("HMS_UTC_OFFSET_MINUTES") {
            Some(raw) => raw.trim().parse::<i32>().map_err(|_| {
                Error::Config(format!("HMS_UTC_OFFSET_MINUTES must be an integer, got '{}'", raw))
            })?,
            None => 0,
        };

        let config = Config {
            db_name,
            utc_offset_minutes,
            snapshot_path: lookup("HMS_SNAPSHOT")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
        };
        config.calendar_offset()?;

        Ok(config)
    }

    /// The providers' calendar as a fixed offset.
    pub fn calendar_offset(&self) -> Result<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                Error::Config(format!(
                    "UTC offset of {} minutes is out of range",
                    self.utc_offset_minutes
                ))
            })
    }

    pub fn collection(&self, kind: &str) -> String {
        format!("{}_{}", self.db_name, kind)
    }
}
