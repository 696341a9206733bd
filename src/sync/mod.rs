//! Event-to-task synchronization.
//!
//! Mirrors analytics events into CRM follow-up tasks: each event's actor is
//! resolved to a CRM contact by email, previously created tasks are checked
//! to suppress duplicates, and the remaining events become new tasks. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
