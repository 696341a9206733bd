//! Per-event outcomes and run summaries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal state of one event's synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    /// A new CRM task was created.
    Created,
    /// An equivalent task already exists for the actor.
    SkippedDuplicate,
    /// The actor could not be matched to a CRM contact.
    SkippedInvalidActor,
    /// The event is structurally defective.
    SkippedMalformed,
}

impl SyncOutcome {
    /// Returns the canonical log representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::SkippedDuplicate => "skipped_duplicate",
            Self::SkippedInvalidActor => "skipped_invalid_actor",
            Self::SkippedMalformed => "skipped_malformed",
        }
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Tasks created.
    pub created: usize,
    /// Events skipped as duplicates.
    pub skipped_duplicate: usize,
    /// Events skipped for an unresolvable actor.
    pub skipped_invalid_actor: usize,
    /// Events skipped as structurally defective.
    pub skipped_malformed: usize,
    /// Events abandoned after a CRM failure.
    pub failed: usize,
}

impl SyncReport {
    /// Counts one terminal outcome.
    pub const fn record(&mut self, outcome: SyncOutcome) {
        match outcome {
            SyncOutcome::Created => self.created += 1,
            SyncOutcome::SkippedDuplicate => self.skipped_duplicate += 1,
            SyncOutcome::SkippedInvalidActor => self.skipped_invalid_actor += 1,
            SyncOutcome::SkippedMalformed => self.skipped_malformed += 1,
        }
    }

    /// Counts one event abandoned after a CRM failure.
    pub const fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Returns the number of events seen.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.created
            + self.skipped_duplicate
            + self.skipped_invalid_actor
            + self.skipped_malformed
            + self.failed
    }
}
