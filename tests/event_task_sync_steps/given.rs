//! Given steps for event-to-task sync scenarios.

use super::world::{SyncWorld, run_async};
use crm_sync::sync::{
    domain::TaskStatus,
    ports::CrmObject,
    services::{SyncEngine, SyncSettings},
};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use std::sync::Arc;
use std::time::Duration;

#[given(r#"a CRM user "{id}" named "{name}""#)]
fn crm_user(world: &mut SyncWorld, id: String, name: String) {
    world.gateway.insert_user(&id, &name);
}

#[given(r#"a CRM contact "{id}" with email "{email}""#)]
fn crm_contact(world: &mut SyncWorld, id: String, email: String) {
    world.gateway.insert_contact(&id, &email);
}

#[given(r#"an existing task "{subject}" dated "{date}" for contact "{contact}""#)]
fn existing_task(world: &mut SyncWorld, subject: String, date: String, contact: String) {
    world.gateway.insert_task(&contact, &date, &subject);
}

#[given("the CRM task store is unavailable")]
fn task_store_unavailable(world: &mut SyncWorld) {
    world.gateway.set_unavailable(CrmObject::Task, true);
}

#[given(r#"a sync engine owned by "{owner}" keyed on "{key}""#)]
fn sync_engine(world: &mut SyncWorld, owner: String, key: String) -> Result<(), eyre::Report> {
    let settings = SyncSettings {
        owner_name: owner,
        subject_keys: vec![key],
        task_status: TaskStatus::new("Not Started").wrap_err("build task status")?,
        throttle_interval: Duration::ZERO,
    };
    match run_async(SyncEngine::start(Arc::clone(&world.gateway), settings)) {
        Ok(engine) => world.engine = Some(engine),
        Err(err) => world.start_error = Some(err),
    }
    Ok(())
}
