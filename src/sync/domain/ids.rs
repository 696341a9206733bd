//! Identifier and validated scalar types for the sync domain.

use super::{InvalidActor, TaskDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trims an identifier and rejects it when nothing remains.
fn non_empty(value: impl Into<String>, kind: &'static str) -> Result<String, TaskDomainError> {
    let raw = value.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyIdentifier(kind));
    }
    Ok(trimmed.to_owned())
}

/// CRM identifier of a contact that events are attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    /// Creates a contact identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyIdentifier`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        non_empty(value, "contact").map(Self)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// CRM identifier of the user every created task is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Creates an owner identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyIdentifier`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        non_empty(value, "owner").map(Self)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// CRM identifier assigned to a newly created record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a record identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyIdentifier`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        non_empty(value, "record").map(Self)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Structurally valid email address identifying an event's actor.
///
/// Only the shape is checked: one `@`, a non-empty local part, and a dotted
/// domain without empty labels or whitespace. Deliverability is the CRM's
/// concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address from a trimmed input.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidActor::MalformedEmail`] when the value does not have
    /// the structure of an email address.
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidActor> {
        let raw = value.into();
        let normalized = raw.trim();

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(InvalidActor::MalformedEmail(raw));
        };
        let domain_is_valid =
            domain.contains('.') && domain.split('.').all(|label| !label.is_empty());
        let is_valid = !local.is_empty()
            && !domain.contains('@')
            && domain_is_valid
            && !normalized.chars().any(char::is_whitespace);

        if !is_valid {
            return Err(InvalidActor::MalformedEmail(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
