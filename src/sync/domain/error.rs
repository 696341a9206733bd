//! Error types for sync domain validation.

use thiserror::Error;

/// Structural defects that prevent an event from becoming a task.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MalformedEvent {
    /// The event has no name.
    #[error("event is missing its name")]
    MissingName,

    /// The event has no properties mapping.
    #[error("event is missing its properties")]
    MissingProperties,

    /// The properties mapping has no `time` entry.
    #[error("event properties are missing `time`")]
    MissingTime,

    /// The `time` entry is not a representable epoch timestamp.
    #[error("event time '{0}' is not a valid epoch timestamp")]
    InvalidTime(String),

    /// The properties mapping has no string `distinct_id` entry.
    #[error("event properties are missing a string `distinct_id`")]
    MissingDistinctId,
}

/// Reasons an event's actor cannot be matched to a CRM contact.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidActor {
    /// The actor identifier is not structurally an email address.
    #[error("'{0}' is not a valid email address")]
    MalformedEmail(String),

    /// No CRM contact carries the email address.
    #[error("no contact with email '{0}'")]
    NotFound(String),
}

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// A CRM identifier is empty after trimming.
    #[error("{0} identifier must not be empty")]
    EmptyIdentifier(&'static str),

    /// The task status is empty after trimming.
    #[error("task status must not be empty")]
    EmptyTaskStatus,

    /// The task has not been attributed to a resolved contact.
    #[error("task '{0}' has no resolved actor")]
    MissingActor(String),
}
