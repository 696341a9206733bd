//! Resolves event actors to CRM contacts, caching both outcomes per run.

use super::SyncResult;
use crate::sync::{
    domain::{ContactId, EmailAddress, InvalidActor, schema},
    ports::{CrmGateway, CrmObject, RecordQuery},
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Email-to-contact resolver with run-scoped positive and negative caches.
///
/// The resolver never flags an actor invalid on its own; the engine decides
/// which failures are terminal for an actor and calls
/// [`IdentityResolver::flag_invalid`].
pub struct IdentityResolver<G>
where
    G: CrmGateway,
{
    gateway: Arc<G>,
    resolved: HashMap<EmailAddress, ContactId>,
    invalid: HashSet<String>,
}

impl<G> IdentityResolver<G>
where
    G: CrmGateway,
{
    /// Creates a resolver with empty caches.
    #[must_use]
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            resolved: HashMap::new(),
            invalid: HashSet::new(),
        }
    }

    /// Returns whether the actor was flagged invalid earlier in the run.
    #[must_use]
    pub fn is_flagged_invalid(&self, actor: &str) -> bool {
        self.invalid.contains(actor.trim())
    }

    /// Flags an actor so later events skip resolution entirely.
    pub fn flag_invalid(&mut self, actor: &str) {
        self.invalid.insert(actor.trim().to_owned());
    }

    /// Resolves an actor's email to a CRM contact.
    ///
    /// When several contacts share the email the first one returned by the
    /// store is used and a warning is logged.
    ///
    /// # Errors
    ///
    /// Returns [`super::SyncError::InvalidActor`] when the email is malformed
    /// (without contacting the CRM) or unknown, and
    /// [`super::SyncError::Gateway`] when the lookup itself fails.
    pub async fn resolve(&mut self, actor: &str) -> SyncResult<ContactId> {
        let email = EmailAddress::new(actor)?;
        if let Some(contact_id) = self.resolved.get(&email) {
            debug!(actor = %email, contact = %contact_id, "actor resolved from cache");
            return Ok(contact_id.clone());
        }

        let query = RecordQuery::new(CrmObject::Contact, schema::CONTACT_EMAIL, email.as_str());
        let records = self.gateway.query(&query).await?;
        let mut ids = records
            .iter()
            .filter_map(|record| record.get_str(schema::ID))
            .filter_map(|id| ContactId::new(id).ok());

        let Some(contact_id) = ids.next() else {
            return Err(InvalidActor::NotFound(email.as_str().to_owned()).into());
        };
        if ids.next().is_some() {
            warn!(actor = %email, contact = %contact_id, "multiple contacts share this email; taking the first");
        }

        self.resolved.insert(email, contact_id.clone());
        Ok(contact_id)
    }
}
