//! Adapter implementations for sync ports.

pub mod memory;
pub mod salesforce;
