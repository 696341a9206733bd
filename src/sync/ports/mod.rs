//! Port contracts for event-to-task synchronization.
//!
//! Ports define infrastructure-agnostic interfaces used by sync services.

pub mod gateway;

pub use gateway::{CrmGateway, CrmGatewayError, CrmGatewayResult, CrmObject, RecordQuery};
