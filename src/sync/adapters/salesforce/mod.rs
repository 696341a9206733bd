//! Salesforce REST adapter for the CRM gateway port.
//!
//! Authentication happens out of band: the adapter is handed an instance URL
//! and an access token for an established session.

mod gateway;
mod soql;

pub use gateway::{SalesforceConnection, SalesforceGateway};
