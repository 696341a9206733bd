//! Normalized analytics events as delivered by the export source.

use super::MalformedEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Property mapping attached to an analytics event.
pub type EventProperties = serde_json::Map<String, Value>;

/// Property carrying the epoch-seconds timestamp of the event.
pub(crate) const TIME_PROPERTY: &str = "time";

/// Property carrying the actor's identifier, expected to be an email.
pub(crate) const DISTINCT_ID_PROPERTY: &str = "distinct_id";

/// One analytics event in export form: `{"event": ..., "properties": {...}}`.
///
/// Both members are optional at the type level so that structurally
/// defective events can still be received, reported and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NormalizedEvent {
    #[serde(rename = "event", default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<EventProperties>,
}

impl NormalizedEvent {
    /// Creates a complete event from a name and its properties.
    #[must_use]
    pub fn new(name: impl Into<String>, properties: EventProperties) -> Self {
        Self {
            name: Some(name.into()),
            properties: Some(properties),
        }
    }

    /// Creates an event from possibly absent parts.
    #[must_use]
    pub const fn from_parts(name: Option<String>, properties: Option<EventProperties>) -> Self {
        Self { name, properties }
    }

    /// Returns the event name, if present.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the property mapping, if present.
    #[must_use]
    pub const fn properties(&self) -> Option<&EventProperties> {
        self.properties.as_ref()
    }

    /// Returns the event name or the matching structural defect.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedEvent::MissingName`] when the event has no name.
    pub fn require_name(&self) -> Result<&str, MalformedEvent> {
        self.name().ok_or(MalformedEvent::MissingName)
    }

    /// Returns the property mapping or the matching structural defect.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedEvent::MissingProperties`] when the event has no
    /// properties.
    pub fn require_properties(&self) -> Result<&EventProperties, MalformedEvent> {
        self.properties().ok_or(MalformedEvent::MissingProperties)
    }

    /// Returns the instant the event occurred, read from `properties.time`.
    ///
    /// Integer epoch seconds and numeric strings are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedEvent::MissingProperties`],
    /// [`MalformedEvent::MissingTime`] or [`MalformedEvent::InvalidTime`].
    pub fn occurred_at(&self) -> Result<DateTime<Utc>, MalformedEvent> {
        let time = self
            .require_properties()?
            .get(TIME_PROPERTY)
            .ok_or(MalformedEvent::MissingTime)?;
        epoch_seconds(time)
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
            .ok_or_else(|| MalformedEvent::InvalidTime(time.to_string()))
    }

    /// Returns the raw actor identifier from `properties.distinct_id`.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedEvent::MissingProperties`] or
    /// [`MalformedEvent::MissingDistinctId`].
    pub fn distinct_id(&self) -> Result<&str, MalformedEvent> {
        self.require_properties()?
            .get(DISTINCT_ID_PROPERTY)
            .and_then(Value::as_str)
            .ok_or(MalformedEvent::MissingDistinctId)
    }

    /// Renders the event back to its JSON export form for diagnostics.
    #[must_use]
    pub fn to_raw_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

fn epoch_seconds(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| whole_seconds(&number.to_string())),
        Value::String(text) => whole_seconds(text.trim()),
        _ => None,
    }
}

/// Parses decimal epoch text, dropping any fractional part.
fn whole_seconds(text: &str) -> Option<i64> {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, "0"));
    if !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    whole.parse().ok()
}
