//! Run orchestration: one event in, one outcome out.

use super::{
    DuplicateChecker, IdentityResolver, RateLimiter, SourcedEvent, SyncError, SyncResult,
    TaskBuilder, resolve_owner,
};
use crate::sync::{
    domain::{
        CandidateTask, ContactId, MalformedEvent, NormalizedEvent, OwnerId, SubjectTemplate,
        SyncOutcome, SyncReport, TaskDomainError, TaskStatus,
    },
    ports::{CrmGateway, CrmObject},
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Run-level settings for a [`SyncEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Display name of the CRM user that owns every created task.
    pub owner_name: String,
    /// Property keys whose values extend the task subject.
    pub subject_keys: Vec<String>,
    /// Status assigned to created tasks.
    pub task_status: TaskStatus,
    /// Delay before the remote phase of each event.
    pub throttle_interval: Duration,
}

/// Synchronizes events into CRM tasks for one run.
///
/// The engine owns the run's identity and task-record caches; dropping it
/// discards them.
pub struct SyncEngine<G>
where
    G: CrmGateway,
{
    gateway: Arc<G>,
    builder: TaskBuilder,
    identities: IdentityResolver<G>,
    duplicates: DuplicateChecker<G>,
    rate_limiter: RateLimiter,
}

impl<G> SyncEngine<G>
where
    G: CrmGateway,
{
    /// Resolves the task owner and prepares an engine for one run.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::OwnerNotFound`] or [`SyncError::AmbiguousOwner`]
    /// unless exactly one CRM user carries the owner name, and
    /// [`SyncError::Gateway`] when the owner lookup fails.
    pub async fn start(gateway: Arc<G>, settings: SyncSettings) -> SyncResult<Self> {
        let owner_id = resolve_owner(gateway.as_ref(), &settings.owner_name).await?;
        info!(owner = %owner_id, name = %settings.owner_name, "resolved task owner");
        Ok(Self::with_owner(gateway, settings, owner_id))
    }

    /// Prepares an engine with an already resolved owner.
    #[must_use]
    pub fn with_owner(gateway: Arc<G>, settings: SyncSettings, owner_id: OwnerId) -> Self {
        let SyncSettings {
            subject_keys,
            task_status,
            throttle_interval,
            ..
        } = settings;
        Self {
            builder: TaskBuilder::new(SubjectTemplate::new(subject_keys), task_status, owner_id),
            identities: IdentityResolver::new(Arc::clone(&gateway)),
            duplicates: DuplicateChecker::new(Arc::clone(&gateway)),
            rate_limiter: RateLimiter::new(throttle_interval),
            gateway,
        }
    }

    /// Returns the owner assigned to created tasks.
    #[must_use]
    pub const fn owner_id(&self) -> &OwnerId {
        self.builder.owner_id()
    }

    /// Processes one event to a terminal outcome.
    ///
    /// Each terminal state is logged once. Malformed events and invalid
    /// actors are outcomes, not errors.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Gateway`] when a CRM call fails. Nothing is
    /// created for the event and the actor is not flagged.
    pub async fn process_event(&mut self, event: &NormalizedEvent) -> SyncResult<SyncOutcome> {
        let (task, actor) = match self.builder.build(event).and_then(|task| {
            let actor = event.distinct_id()?;
            Ok((task, actor))
        }) {
            Ok(parts) => parts,
            Err(defect) => return Ok(skip_malformed(event, &defect)),
        };

        if self.identities.is_flagged_invalid(actor) {
            info!(
                event = task.task_type(),
                actor,
                outcome = %SyncOutcome::SkippedInvalidActor,
                "actor previously flagged invalid"
            );
            return Ok(SyncOutcome::SkippedInvalidActor);
        }

        self.rate_limiter.throttle().await;

        let actor_id = match self.identities.resolve(actor).await {
            Ok(actor_id) => actor_id,
            Err(SyncError::InvalidActor(reason)) => {
                self.identities.flag_invalid(actor);
                warn!(
                    event = task.task_type(),
                    actor,
                    reason = %reason,
                    outcome = %SyncOutcome::SkippedInvalidActor,
                    "actor flagged invalid"
                );
                return Ok(SyncOutcome::SkippedInvalidActor);
            }
            Err(other) => return Err(other),
        };

        self.submit(task.with_actor(actor_id)).await
    }

    async fn submit(&mut self, task: CandidateTask) -> SyncResult<SyncOutcome> {
        let actor_id = task
            .actor_id()
            .cloned()
            .ok_or_else(|| TaskDomainError::MissingActor(task.subject().to_owned()))?;

        if self.duplicates.is_duplicate(&actor_id, &task).await? {
            info!(
                actor = %actor_id,
                subject = task.subject(),
                date = %task.activity_date(),
                outcome = %SyncOutcome::SkippedDuplicate,
                "task already exists"
            );
            return Ok(SyncOutcome::SkippedDuplicate);
        }

        let record = task.to_record()?;
        let task_id = self.gateway.create(CrmObject::Task, &record).await?;
        self.duplicates.remember(&actor_id, &task);
        log_created(&actor_id, &task, &task_id.to_string());
        Ok(SyncOutcome::Created)
    }

    /// Processes a batch in order and tallies the outcomes.
    ///
    /// Unreadable source entries count as malformed. Gateway failures are
    /// logged and counted; the run always moves on to the next event.
    pub async fn run(&mut self, events: impl IntoIterator<Item = SourcedEvent>) -> SyncReport {
        let mut report = SyncReport::default();
        for sourced in events {
            match sourced {
                Ok(event) => match self.process_event(&event).await {
                    Ok(outcome) => report.record(outcome),
                    Err(err) => {
                        error!(
                            event = event.name().unwrap_or_default(),
                            error = %err,
                            "event abandoned after CRM failure"
                        );
                        report.record_failure();
                    }
                },
                Err(err) => {
                    warn!(
                        error = %err,
                        outcome = %SyncOutcome::SkippedMalformed,
                        "unreadable export entry"
                    );
                    report.record(SyncOutcome::SkippedMalformed);
                }
            }
        }
        info!(
            created = report.created,
            skipped_duplicate = report.skipped_duplicate,
            skipped_invalid_actor = report.skipped_invalid_actor,
            skipped_malformed = report.skipped_malformed,
            failed = report.failed,
            "sync run finished"
        );
        report
    }
}

fn skip_malformed(event: &NormalizedEvent, defect: &MalformedEvent) -> SyncOutcome {
    warn!(
        reason = %defect,
        raw = %event.to_raw_json(),
        outcome = %SyncOutcome::SkippedMalformed,
        "malformed event skipped"
    );
    SyncOutcome::SkippedMalformed
}

fn log_created(actor_id: &ContactId, task: &CandidateTask, task_id: &str) {
    info!(
        actor = %actor_id,
        task = task_id,
        subject = task.subject(),
        date = %task.activity_date(),
        outcome = %SyncOutcome::Created,
        "task created"
    );
}
