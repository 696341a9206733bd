//! One-off resolution of the CRM user that owns every created task.

use super::{SyncError, SyncResult};
use crate::sync::{
    domain::{OwnerId, schema},
    ports::{CrmGateway, CrmObject, RecordQuery},
};

/// Looks up exactly one CRM user by display name.
///
/// # Errors
///
/// Returns [`SyncError::OwnerNotFound`] or [`SyncError::AmbiguousOwner`]
/// unless exactly one user matches, and [`SyncError::Gateway`] when the
/// lookup fails.
pub async fn resolve_owner<G>(gateway: &G, display_name: &str) -> SyncResult<OwnerId>
where
    G: CrmGateway + ?Sized,
{
    let query = RecordQuery::new(CrmObject::User, schema::USER_NAME, display_name);
    let records = gateway.query(&query).await?;

    let mut ids: Vec<OwnerId> = records
        .iter()
        .filter_map(|record| record.get_str(schema::ID))
        .filter_map(|id| OwnerId::new(id).ok())
        .collect();

    match ids.len() {
        0 => Err(SyncError::OwnerNotFound(display_name.to_owned())),
        1 => Ok(ids.remove(0)),
        matches => Err(SyncError::AmbiguousOwner {
            name: display_name.to_owned(),
            matches,
        }),
    }
}
