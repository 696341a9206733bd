//! In-memory CRM store that records every call made against it.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::sync::{
    domain::{CrmRecord, RecordId, schema},
    ports::{CrmGateway, CrmGatewayError, CrmGatewayResult, CrmObject, RecordQuery},
};

/// Thread-safe in-memory CRM gateway.
///
/// Records are matched by exact string equality on the filter field and
/// returned in insertion order. Every query and create is logged so tests
/// can assert on the calls a run issued.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCrmGateway {
    state: Arc<RwLock<InMemoryCrmState>>,
}

#[derive(Debug, Default)]
struct InMemoryCrmState {
    records: HashMap<CrmObject, Vec<CrmRecord>>,
    queries: Vec<RecordQuery>,
    creates: Vec<(CrmObject, CrmRecord)>,
    unavailable: HashSet<CrmObject>,
    next_id: u64,
}

impl InMemoryCrmGateway {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, InMemoryCrmState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, InMemoryCrmState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores a record without logging it as a create call.
    pub fn insert_record(&self, object: CrmObject, record: CrmRecord) {
        self.write().records.entry(object).or_default().push(record);
    }

    /// Stores a contact with the given identifier and email.
    pub fn insert_contact(&self, id: &str, email: &str) {
        self.insert_record(
            CrmObject::Contact,
            CrmRecord::new()
                .with_field(schema::ID, id)
                .with_field(schema::CONTACT_EMAIL, email),
        );
    }

    /// Stores a user with the given identifier and display name.
    pub fn insert_user(&self, id: &str, name: &str) {
        self.insert_record(
            CrmObject::User,
            CrmRecord::new()
                .with_field(schema::ID, id)
                .with_field(schema::USER_NAME, name),
        );
    }

    /// Stores an existing task for a contact.
    pub fn insert_task(&self, who_id: &str, activity_date: &str, subject: &str) {
        let id = self.allocate_id(CrmObject::Task);
        self.insert_record(
            CrmObject::Task,
            CrmRecord::new()
                .with_field(schema::ID, id.as_str())
                .with_field(schema::TASK_WHO_ID, who_id)
                .with_field(schema::TASK_ACTIVITY_DATE, activity_date)
                .with_field(schema::TASK_SUBJECT, subject),
        );
    }

    /// Makes every later call against `object` fail with a transport error.
    pub fn set_unavailable(&self, object: CrmObject, unavailable: bool) {
        let mut state = self.write();
        if unavailable {
            state.unavailable.insert(object);
        } else {
            state.unavailable.remove(&object);
        }
    }

    /// Returns every query issued so far, in order.
    #[must_use]
    pub fn queries(&self) -> Vec<RecordQuery> {
        self.read().queries.clone()
    }

    /// Returns how many queries targeted `object`.
    #[must_use]
    pub fn query_count(&self, object: CrmObject) -> usize {
        self.read()
            .queries
            .iter()
            .filter(|query| query.object() == object)
            .count()
    }

    /// Returns the records passed to create calls for `object`, in order.
    #[must_use]
    pub fn created(&self, object: CrmObject) -> Vec<CrmRecord> {
        self.read()
            .creates
            .iter()
            .filter(|(created_object, _)| *created_object == object)
            .map(|(_, record)| record.clone())
            .collect()
    }

    /// Returns every stored record of `object`, seeded or created.
    #[must_use]
    pub fn records(&self, object: CrmObject) -> Vec<CrmRecord> {
        self.read().records.get(&object).cloned().unwrap_or_default()
    }

    fn allocate_id(&self, object: CrmObject) -> String {
        let mut state = self.write();
        state.next_id += 1;
        format!("{}-{:06}", object.as_str().to_ascii_lowercase(), state.next_id)
    }
}

#[async_trait]
impl CrmGateway for InMemoryCrmGateway {
    async fn query(&self, query: &RecordQuery) -> CrmGatewayResult<Vec<CrmRecord>> {
        let mut state = self.write();
        state.queries.push(query.clone());
        if state.unavailable.contains(&query.object()) {
            return Err(unavailable(query.object()));
        }

        let matches = state
            .records
            .get(&query.object())
            .map(|records| {
                records
                    .iter()
                    .filter(|record| {
                        record.get_str(query.filter_field()) == Some(query.filter_value())
                    })
                    .map(|record| record.project(query.fields()))
                    .collect()
            })
            .unwrap_or_default();
        Ok(matches)
    }

    async fn create(&self, object: CrmObject, record: &CrmRecord) -> CrmGatewayResult<RecordId> {
        if self.read().unavailable.contains(&object) {
            return Err(unavailable(object));
        }
        let id = self.allocate_id(object);
        let record_id = RecordId::new(id.as_str())
            .map_err(|err| CrmGatewayError::Decode(err.to_string()))?;

        let mut state = self.write();
        state.creates.push((object, record.clone()));
        state
            .records
            .entry(object)
            .or_default()
            .push(record.clone().with_field(schema::ID, id));
        Ok(record_id)
    }
}

fn unavailable(object: CrmObject) -> CrmGatewayError {
    CrmGatewayError::transport(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        format!("{object} store unavailable"),
    ))
}
