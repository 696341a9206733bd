//! crm-sync: mirror analytics events into CRM follow-up tasks.
//!
//! Each exported event names an actor by email. The actor is matched to a
//! CRM contact, existing tasks for that contact are checked so an event is
//! never recorded twice, and the rest become new tasks assigned to one
//! configured owner.
//!
//! # Architecture
//!
//! crm-sync follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (Salesforce, in-memory)
//!
//! # Modules
//!
//! - [`sync`]: Event-to-task mapping, identity resolution and deduplication
//! - [`config`]: Run configuration
//! - [`observability`]: Logging initialisation

pub mod config;
mod fs_utils;
pub mod observability;
pub mod sync;
