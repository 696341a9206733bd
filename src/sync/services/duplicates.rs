//! Duplicate detection against tasks already stored for an actor.

use crate::sync::{
    domain::{CandidateTask, ContactId, ExistingTaskRecord, schema},
    ports::{CrmGateway, CrmGatewayResult, CrmObject, RecordQuery},
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Per-actor cache of existing task records with a remote fallback.
///
/// Each actor's tasks are fetched once per run. The cached list is then
/// authoritative: it is extended with tasks the run creates but never
/// re-fetched.
pub struct DuplicateChecker<G>
where
    G: CrmGateway,
{
    gateway: Arc<G>,
    records: HashMap<ContactId, Vec<ExistingTaskRecord>>,
}

impl<G> DuplicateChecker<G>
where
    G: CrmGateway,
{
    /// Creates a checker with an empty cache.
    #[must_use]
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            records: HashMap::new(),
        }
    }

    /// Returns the cached task records for an actor, if fetched.
    #[must_use]
    pub fn cached_records(&self, actor_id: &ContactId) -> Option<&[ExistingTaskRecord]> {
        self.records.get(actor_id).map(Vec::as_slice)
    }

    /// Returns whether an equivalent task already exists for the actor.
    ///
    /// # Errors
    ///
    /// Returns the gateway error when the actor's tasks must be fetched and
    /// the lookup fails. Nothing is cached in that case.
    pub async fn is_duplicate(
        &mut self,
        actor_id: &ContactId,
        task: &CandidateTask,
    ) -> CrmGatewayResult<bool> {
        if !self.records.contains_key(actor_id) {
            let fetched = self.fetch(actor_id).await?;
            debug!(actor = %actor_id, count = fetched.len(), "cached existing tasks");
            self.records.insert(actor_id.clone(), fetched);
        }

        Ok(self
            .records
            .get(actor_id)
            .is_some_and(|existing| existing.iter().any(|record| record.matches(task))))
    }

    /// Adds a task created during this run to the actor's cached records.
    pub fn remember(&mut self, actor_id: &ContactId, task: &CandidateTask) {
        self.records
            .entry(actor_id.clone())
            .or_default()
            .push(ExistingTaskRecord::from_candidate(task));
    }

    async fn fetch(&self, actor_id: &ContactId) -> CrmGatewayResult<Vec<ExistingTaskRecord>> {
        let query = RecordQuery::new(CrmObject::Task, schema::TASK_WHO_ID, actor_id.as_str())
            .select(&[
                schema::TASK_WHO_ID,
                schema::TASK_ACTIVITY_DATE,
                schema::TASK_SUBJECT,
            ]);
        let records = self.gateway.query(&query).await?;
        Ok(records.iter().map(ExistingTaskRecord::from_record).collect())
    }
}
