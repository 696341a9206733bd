//! Shared world state for event-to-task sync scenarios.

use crm_sync::sync::{
    adapters::memory::InMemoryCrmGateway,
    domain::SyncOutcome,
    services::{SyncEngine, SyncError, SyncResult},
};
use rstest::fixture;
use std::sync::Arc;

/// Engine type used by the BDD world.
pub type TestSyncEngine = SyncEngine<InMemoryCrmGateway>;

/// Scenario world for sync behaviour tests.
pub struct SyncWorld {
    pub gateway: Arc<InMemoryCrmGateway>,
    pub engine: Option<TestSyncEngine>,
    pub start_error: Option<SyncError>,
    pub last_result: Option<SyncResult<SyncOutcome>>,
}

impl SyncWorld {
    /// Creates a world around an empty CRM store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gateway: Arc::new(InMemoryCrmGateway::new()),
            engine: None,
            start_error: None,
            last_result: None,
        }
    }
}

impl Default for SyncWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SyncWorld {
    SyncWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
