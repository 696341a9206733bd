//! Maps normalized events to candidate CRM tasks.

use crate::sync::domain::{
    ActivityDate, CandidateTask, CandidateTaskParts, EventProperties, MalformedEvent,
    NormalizedEvent, OwnerId, SubjectTemplate, TaskStatus,
};
use serde_json::Value;
use tracing::info;

/// Builds unattributed tasks from events using run-level settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskBuilder {
    subject: SubjectTemplate,
    status: TaskStatus,
    owner_id: OwnerId,
}

impl TaskBuilder {
    /// Creates a builder for one run.
    #[must_use]
    pub const fn new(subject: SubjectTemplate, status: TaskStatus, owner_id: OwnerId) -> Self {
        Self {
            subject,
            status,
            owner_id,
        }
    }

    /// Returns the owner every built task is assigned to.
    #[must_use]
    pub const fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    /// Builds the candidate task for an event.
    ///
    /// A subject template that cannot be filled degrades to the bare event
    /// name and is logged; it never fails the build.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedEvent`] when the event lacks its name, its
    /// properties, or a valid `time` property.
    pub fn build(&self, event: &NormalizedEvent) -> Result<CandidateTask, MalformedEvent> {
        let name = event.require_name()?;
        let properties = event.require_properties()?;
        let activity_date = ActivityDate::from_instant(event.occurred_at()?);

        let subject = self
            .subject
            .render(name, properties)
            .unwrap_or_else(|fallback| {
                info!(
                    event = name,
                    missing_key = %fallback.missing_key,
                    "subject key absent; using bare event name"
                );
                fallback.subject
            });

        Ok(CandidateTask::new(CandidateTaskParts {
            activity_date,
            status: self.status.clone(),
            task_type: name.to_owned(),
            subject,
            description: describe(properties),
            owner_id: self.owner_id.clone(),
        }))
    }
}

/// Renders every property as a `key: value` line, keys in order.
fn describe(properties: &EventProperties) -> String {
    properties
        .iter()
        .map(|(key, value)| match value {
            Value::String(text) => format!("{key}: {text}"),
            other => format!("{key}: {other}"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
