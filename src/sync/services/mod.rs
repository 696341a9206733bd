//! Application services for event-to-task synchronization.

mod builder;
mod duplicates;
mod engine;
mod error;
mod identity;
mod owner;
mod source;
mod throttle;

pub use builder::TaskBuilder;
pub use duplicates::DuplicateChecker;
pub use engine::{SyncEngine, SyncSettings};
pub use error::{SyncError, SyncResult};
pub use identity::IdentityResolver;
pub use owner::resolve_owner;
pub use source::{EventSelection, ExportReader, SourceError, SourcedEvent};
pub use throttle::{DEFAULT_THROTTLE_INTERVAL, RateLimiter};
