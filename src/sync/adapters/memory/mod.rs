//! In-memory adapters for sync tests and dry runs.

mod gateway;

pub use gateway::InMemoryCrmGateway;
