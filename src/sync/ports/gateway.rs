//! CRM gateway port: parametrized record queries and single-record creates.

use crate::sync::domain::{CrmRecord, RecordId, schema};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for CRM gateway operations.
pub type CrmGatewayResult<T> = Result<T, CrmGatewayError>;

/// CRM object types the synchronization reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrmObject {
    /// People events are attributed to.
    Contact,
    /// CRM user accounts tasks are assigned to.
    User,
    /// Follow-up work items.
    Task,
}

impl CrmObject {
    /// Returns the CRM API name of the object.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contact => "Contact",
            Self::User => "User",
            Self::Task => "Task",
        }
    }
}

impl fmt::Display for CrmObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query selecting fields of the records whose `field` equals `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    object: CrmObject,
    fields: Vec<String>,
    filter_field: String,
    filter_value: String,
}

impl RecordQuery {
    /// Creates a query matching records of `object` by one field value.
    ///
    /// The selection starts with the record identifier only.
    #[must_use]
    pub fn new(
        object: CrmObject,
        filter_field: impl Into<String>,
        filter_value: impl Into<String>,
    ) -> Self {
        Self {
            object,
            fields: vec![schema::ID.to_owned()],
            filter_field: filter_field.into(),
            filter_value: filter_value.into(),
        }
    }

    /// Replaces the selected fields.
    #[must_use]
    pub fn select(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|field| (*field).to_owned()).collect();
        self
    }

    /// Returns the queried object type.
    #[must_use]
    pub const fn object(&self) -> CrmObject {
        self.object
    }

    /// Returns the selected fields, in order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns the field the query filters on.
    #[must_use]
    pub fn filter_field(&self) -> &str {
        &self.filter_field
    }

    /// Returns the value the filter field must equal.
    #[must_use]
    pub fn filter_value(&self) -> &str {
        &self.filter_value
    }
}

/// Access to a remote CRM store.
///
/// Sessions and credentials are established by the implementation; callers
/// only issue queries and creates.
#[async_trait]
pub trait CrmGateway: Send + Sync {
    /// Runs a query and returns the matching records in store order.
    ///
    /// # Errors
    ///
    /// Returns [`CrmGatewayError`] when the store cannot be reached or
    /// rejects the query.
    async fn query(&self, query: &RecordQuery) -> CrmGatewayResult<Vec<CrmRecord>>;

    /// Creates one record and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CrmGatewayError`] when the store cannot be reached or
    /// rejects the record. The record may still have been created when a
    /// transport error is returned.
    async fn create(&self, object: CrmObject, record: &CrmRecord) -> CrmGatewayResult<RecordId>;
}

/// Errors returned by CRM gateway implementations.
#[derive(Debug, Clone, Error)]
pub enum CrmGatewayError {
    /// The request did not complete.
    #[error("CRM transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The store answered with a failure status.
    #[error("CRM rejected the request with status {status}: {message}")]
    Rejected {
        /// HTTP-style status code.
        status: u16,
        /// Error detail returned by the store.
        message: String,
    },

    /// The response could not be interpreted.
    #[error("unexpected CRM response: {0}")]
    Decode(String),
}

impl CrmGatewayError {
    /// Wraps a transport error.
    #[must_use]
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
