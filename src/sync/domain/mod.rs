//! Domain model for event-to-task synchronization.
//!
//! The sync domain models normalized analytics events, CRM identifiers,
//! candidate tasks and previously created task records while keeping all
//! infrastructure concerns outside of the domain boundary.

mod error;
mod event;
mod ids;
mod outcome;
mod record;
pub mod schema;
mod subject;
mod task;
mod window;

pub use error::{InvalidActor, MalformedEvent, TaskDomainError};
pub use event::{EventProperties, NormalizedEvent};
pub use ids::{ContactId, EmailAddress, OwnerId, RecordId};
pub use outcome::{SyncOutcome, SyncReport};
pub use record::CrmRecord;
pub use subject::{SubjectFallback, SubjectTemplate};
pub use task::{ActivityDate, CandidateTask, CandidateTaskParts, ExistingTaskRecord, TaskStatus};
pub use window::DateWindow;
