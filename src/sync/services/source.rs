//! Reads exported events from JSON-lines text and selects those to sync.

use crate::fs_utils;
use crate::sync::domain::{DateWindow, NormalizedEvent};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashSet;
use std::io;
use thiserror::Error;
use tracing::debug;

/// Errors raised while reading an event export.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The export file could not be read.
    #[error("failed to read event export {path}: {source}")]
    Read {
        /// Path of the export file.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// One line of the export is not a JSON event object.
    #[error("export line {line} is not a JSON event: {source}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// Underlying decode failure.
        source: serde_json::Error,
    },
}

/// One entry of an export: a decoded event or the reason it was not decoded.
pub type SourcedEvent = Result<NormalizedEvent, SourceError>;

/// Event-name allow-list and optional date window applied to an export.
///
/// Events whose name or time cannot be read are always selected so the
/// engine can report them as malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSelection {
    allow_list: HashSet<String>,
    window: Option<DateWindow>,
}

impl EventSelection {
    /// Creates a selection. An empty allow-list admits every event name.
    #[must_use]
    pub fn new(names: impl IntoIterator<Item = String>, window: Option<DateWindow>) -> Self {
        Self {
            allow_list: names.into_iter().collect(),
            window,
        }
    }

    /// Returns the configured date window.
    #[must_use]
    pub const fn window(&self) -> Option<&DateWindow> {
        self.window.as_ref()
    }

    /// Returns whether the event passes the allow-list and window.
    #[must_use]
    pub fn selects(&self, event: &NormalizedEvent) -> bool {
        let name_allowed = event
            .name()
            .is_none_or(|name| self.allow_list.is_empty() || self.allow_list.contains(name));
        let in_window = match (self.window.as_ref(), event.occurred_at()) {
            (Some(window), Ok(instant)) => window.contains(instant),
            _ => true,
        };
        name_allowed && in_window
    }
}

/// Parses JSON-lines exports, one event object per line.
#[derive(Debug, Clone, Default)]
pub struct ExportReader {
    selection: EventSelection,
}

impl ExportReader {
    /// Creates a reader applying the given selection.
    #[must_use]
    pub const fn new(selection: EventSelection) -> Self {
        Self { selection }
    }

    /// Parses export text, skipping blank lines and unselected events.
    ///
    /// Lines that fail to decode are kept as [`SourceError::Parse`] entries.
    #[must_use]
    pub fn parse(&self, text: &str) -> Vec<SourcedEvent> {
        let mut events = Vec::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<NormalizedEvent>(line) {
                Ok(event) if self.selection.selects(&event) => events.push(Ok(event)),
                Ok(event) => {
                    debug!(event = event.name().unwrap_or_default(), "event not selected");
                }
                Err(source) => events.push(Err(SourceError::Parse {
                    line: index + 1,
                    source,
                })),
            }
        }
        events
    }

    /// Reads and parses an export file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Read`] when the file cannot be read.
    pub fn read(&self, path: &Utf8Path) -> Result<Vec<SourcedEvent>, SourceError> {
        let text = fs_utils::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.parse(&text))
    }
}
