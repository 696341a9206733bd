//! Service-level errors for synchronization runs.

use crate::sync::{
    domain::InvalidActor,
    ports::CrmGatewayError,
};
use thiserror::Error;

/// Service-level errors for synchronization operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The event's actor cannot be matched to a CRM contact.
    #[error(transparent)]
    InvalidActor(#[from] InvalidActor),

    /// A CRM call failed; the event is abandoned without retry.
    #[error(transparent)]
    Gateway(#[from] CrmGatewayError),

    /// No CRM user carries the configured owner name.
    #[error("no CRM user named '{0}' to assign tasks to")]
    OwnerNotFound(String),

    /// Several CRM users carry the configured owner name.
    #[error("{matches} CRM users are named '{name}'; the task owner must be unique")]
    AmbiguousOwner {
        /// The configured display name.
        name: String,
        /// Number of users found.
        matches: usize,
    },
}

/// Result type for synchronization service operations.
pub type SyncResult<T> = Result<T, SyncError>;
