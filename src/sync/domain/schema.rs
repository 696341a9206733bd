//! CRM object and field names used by the synchronization queries.

/// Record identifier field present on every CRM object.
pub const ID: &str = "Id";

/// Contact email field.
pub const CONTACT_EMAIL: &str = "Email";

/// User display-name field.
pub const USER_NAME: &str = "Name";

/// Task field referencing the contact the task is about.
pub const TASK_WHO_ID: &str = "WhoId";
/// Task due/activity date field (`YYYY-MM-DD`).
pub const TASK_ACTIVITY_DATE: &str = "ActivityDate";
/// Task subject line.
pub const TASK_SUBJECT: &str = "Subject";
/// Task status picklist value.
pub const TASK_STATUS: &str = "Status";
/// Task type, filled with the event name.
pub const TASK_TYPE: &str = "Type";
/// Task long-form description.
pub const TASK_DESCRIPTION: &str = "Description";
/// Task assignee.
pub const TASK_OWNER_ID: &str = "OwnerId";
