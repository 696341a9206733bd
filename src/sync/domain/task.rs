//! Candidate tasks built from events and task records fetched from the CRM.

use super::{ContactId, CrmRecord, OwnerId, TaskDomainError, schema};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar date a task is filed under, rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityDate(NaiveDate);

impl ActivityDate {
    /// Wraps a calendar date.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Returns the UTC calendar date of an instant.
    #[must_use]
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self(instant.date_naive())
    }

    /// Returns the wrapped date.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for ActivityDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Status value every created task is filed with (e.g. `Not Started`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskStatus(String);

impl TaskStatus {
    /// Creates a validated task status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskStatus`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TaskDomainError::EmptyTaskStatus);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the status as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A CRM task about to be created from one event.
///
/// The actor is attached only after identity resolution succeeds; a task
/// without an actor cannot be turned into a CRM record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateTask {
    activity_date: ActivityDate,
    status: TaskStatus,
    task_type: String,
    subject: String,
    description: String,
    owner_id: OwnerId,
    actor_id: Option<ContactId>,
}

/// Parameter object for assembling a [`CandidateTask`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateTaskParts {
    /// Date the task is filed under.
    pub activity_date: ActivityDate,
    /// Status to file the task with.
    pub status: TaskStatus,
    /// Task type, the originating event name.
    pub task_type: String,
    /// Subject line.
    pub subject: String,
    /// Long-form description.
    pub description: String,
    /// Assignee.
    pub owner_id: OwnerId,
}

impl CandidateTask {
    /// Creates an unattributed task.
    #[must_use]
    pub fn new(parts: CandidateTaskParts) -> Self {
        Self {
            activity_date: parts.activity_date,
            status: parts.status,
            task_type: parts.task_type,
            subject: parts.subject,
            description: parts.description,
            owner_id: parts.owner_id,
            actor_id: None,
        }
    }

    /// Attributes the task to a resolved contact.
    #[must_use]
    pub fn with_actor(mut self, actor_id: ContactId) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    /// Returns the activity date.
    #[must_use]
    pub const fn activity_date(&self) -> ActivityDate {
        self.activity_date
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> &TaskStatus {
        &self.status
    }

    /// Returns the task type.
    #[must_use]
    pub fn task_type(&self) -> &str {
        &self.task_type
    }

    /// Returns the subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    /// Returns the attributed contact, if resolved.
    #[must_use]
    pub const fn actor_id(&self) -> Option<&ContactId> {
        self.actor_id.as_ref()
    }

    /// Renders the CRM fields for a create call.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingActor`] when no contact has been
    /// attached.
    pub fn to_record(&self) -> Result<CrmRecord, TaskDomainError> {
        let actor_id = self
            .actor_id
            .as_ref()
            .ok_or_else(|| TaskDomainError::MissingActor(self.subject.clone()))?;

        Ok(CrmRecord::new()
            .with_field(schema::TASK_ACTIVITY_DATE, self.activity_date.to_string())
            .with_field(schema::TASK_STATUS, self.status.as_str())
            .with_field(schema::TASK_TYPE, self.task_type.as_str())
            .with_field(schema::TASK_SUBJECT, self.subject.as_str())
            .with_field(schema::TASK_DESCRIPTION, self.description.as_str())
            .with_field(schema::TASK_OWNER_ID, self.owner_id.as_str())
            .with_field(schema::TASK_WHO_ID, actor_id.as_str()))
    }
}

/// Typed view of a task row already stored in the CRM.
///
/// Every field is optional: rows lacking a field simply never match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingTaskRecord {
    /// Contact the task is about.
    pub who_id: Option<String>,
    /// Activity date as stored (`YYYY-MM-DD`).
    pub activity_date: Option<String>,
    /// Subject line as stored.
    pub subject: Option<String>,
}

impl ExistingTaskRecord {
    /// Reads the task fields from a CRM record.
    #[must_use]
    pub fn from_record(record: &CrmRecord) -> Self {
        let field = |name: &str| record.get_str(name).map(str::to_owned);
        Self {
            who_id: field(schema::TASK_WHO_ID),
            activity_date: field(schema::TASK_ACTIVITY_DATE),
            subject: field(schema::TASK_SUBJECT),
        }
    }

    /// Captures a task this run created so later events can match it.
    #[must_use]
    pub fn from_candidate(task: &CandidateTask) -> Self {
        Self {
            who_id: task.actor_id().map(|id| id.as_str().to_owned()),
            activity_date: Some(task.activity_date().to_string()),
            subject: Some(task.subject().to_owned()),
        }
    }

    /// Returns whether this record describes the same task as `task`.
    ///
    /// Activity date and subject are compared with non-ASCII characters
    /// removed and surrounding whitespace trimmed.
    #[must_use]
    pub fn matches(&self, task: &CandidateTask) -> bool {
        let same_date = self
            .activity_date
            .as_deref()
            .is_some_and(|date| comparable(date) == comparable(&task.activity_date().to_string()));
        let same_subject = self
            .subject
            .as_deref()
            .is_some_and(|subject| comparable(subject) == comparable(task.subject()));
        same_date && same_subject
    }
}

fn comparable(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii)
        .collect::<String>()
        .trim()
        .to_owned()
}
