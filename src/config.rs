//! Run configuration loaded from a JSON file.
//!
//! A representative configuration is:
//!
//! ```json
//! {
//!   "crm": {
//!     "instance_url": "https://example.my.salesforce.com",
//!     "access_token": "00D...",
//!     "sandbox": true
//!   },
//!   "owner_name": "Sync Owner",
//!   "task_status": "Not Started",
//!   "events": ["Purchase Item"],
//!   "subject_keys": ["Report Name"],
//!   "window": { "from_days_ago": 1, "to_days_ago": 0 },
//!   "throttle_interval_ms": 50
//! }
//! ```

use crate::fs_utils;
use crate::sync::{
    adapters::salesforce::SalesforceConnection,
    domain::{DateWindow, TaskDomainError, TaskStatus},
    services::{EventSelection, SyncSettings},
};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{Days, NaiveDate};
use mockable::Clock;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or interpreting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The configuration is not valid JSON for [`SyncConfig`].
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The export window starts after it ends.
    #[error("export window from {from_days_ago} to {to_days_ago} days ago is empty")]
    InvalidWindow {
        /// Days before today the window starts.
        from_days_ago: u64,
        /// Days before today the window ends.
        to_days_ago: u64,
    },

    /// A configured value failed domain validation.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
}

/// Complete configuration for one sync run.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// CRM session details.
    pub crm: SalesforceConnection,
    /// Display name of the CRM user that owns created tasks.
    pub owner_name: String,
    /// Status assigned to created tasks.
    pub task_status: String,
    /// Event names to sync; empty syncs every event.
    #[serde(default)]
    pub events: Vec<String>,
    /// Property keys whose values extend the task subject.
    #[serde(default)]
    pub subject_keys: Vec<String>,
    /// Relative date window applied to the export.
    #[serde(default)]
    pub window: ExportWindow,
    /// Delay before each event's CRM calls, in milliseconds.
    #[serde(default = "default_throttle_interval_ms")]
    pub throttle_interval_ms: u64,
}

const fn default_throttle_interval_ms() -> u64 {
    50
}

impl SyncConfig {
    /// Parses configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not a valid
    /// configuration.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its contents are invalid.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = fs_utils::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Converts the configuration into engine settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Domain`] when the task status is blank.
    pub fn settings(&self) -> Result<SyncSettings, ConfigError> {
        Ok(SyncSettings {
            owner_name: self.owner_name.clone(),
            subject_keys: self.subject_keys.clone(),
            task_status: TaskStatus::new(self.task_status.as_str())?,
            throttle_interval: Duration::from_millis(self.throttle_interval_ms),
        })
    }

    /// Builds the export selection for today's date on `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWindow`] when the window is empty.
    pub fn selection(&self, clock: &impl Clock) -> Result<EventSelection, ConfigError> {
        let window = self.window.resolve(clock)?;
        Ok(EventSelection::new(self.events.iter().cloned(), Some(window)))
    }
}

/// Export window expressed in days before today (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ExportWindow {
    /// Days before today the window starts.
    #[serde(default = "default_from_days_ago")]
    pub from_days_ago: u64,
    /// Days before today the window ends.
    #[serde(default)]
    pub to_days_ago: u64,
}

const fn default_from_days_ago() -> u64 {
    1
}

impl Default for ExportWindow {
    fn default() -> Self {
        Self {
            from_days_ago: default_from_days_ago(),
            to_days_ago: 0,
        }
    }
}

impl ExportWindow {
    /// Resolves the window against today's UTC date on `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWindow`] when the window is empty.
    pub fn resolve(&self, clock: &impl Clock) -> Result<DateWindow, ConfigError> {
        self.resolve_from(clock.utc().date_naive())
    }

    /// Resolves the window relative to `today`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWindow`] when the window is empty.
    pub fn resolve_from(&self, today: NaiveDate) -> Result<DateWindow, ConfigError> {
        let invalid = || ConfigError::InvalidWindow {
            from_days_ago: self.from_days_ago,
            to_days_ago: self.to_days_ago,
        };
        let from = today
            .checked_sub_days(Days::new(self.from_days_ago))
            .ok_or_else(invalid)?;
        let to = today
            .checked_sub_days(Days::new(self.to_days_ago))
            .ok_or_else(invalid)?;
        DateWindow::new(from, to).ok_or_else(invalid)
    }
}
