//! Then steps for event-to-task sync scenarios.

use super::world::SyncWorld;
use crm_sync::sync::{domain::schema, ports::CrmObject, services::SyncError};
use rstest_bdd_macros::then;

#[then(r#"the outcome is "{expected}""#)]
fn outcome_is(world: &SyncWorld, expected: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no event was processed in scenario world"))?;
    let outcome = result
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected processing failure: {err}"))?;

    if outcome.as_str() != expected {
        return Err(eyre::eyre!("expected outcome {expected}, found {outcome}"));
    }
    Ok(())
}

#[then(r#"a task "{subject}" dated "{date}" was created for contact "{contact}""#)]
fn task_was_created(
    world: &SyncWorld,
    subject: String,
    date: String,
    contact: String,
) -> Result<(), eyre::Report> {
    let created = world.gateway.created(CrmObject::Task);
    let found = created.iter().any(|record| {
        record.get_str(schema::TASK_SUBJECT) == Some(subject.as_str())
            && record.get_str(schema::TASK_ACTIVITY_DATE) == Some(date.as_str())
            && record.get_str(schema::TASK_WHO_ID) == Some(contact.as_str())
    });
    if !found {
        return Err(eyre::eyre!(
            "no created task matches {subject} on {date} for {contact}: {created:?}"
        ));
    }
    Ok(())
}

#[then("the CRM holds {count:usize} created tasks")]
fn created_task_count(world: &SyncWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = world.gateway.created(CrmObject::Task).len();
    if actual != count {
        return Err(eyre::eyre!("expected {count} created tasks, found {actual}"));
    }
    Ok(())
}

#[then("the CRM received {count:usize} task queries")]
fn task_query_count(world: &SyncWorld, count: usize) -> Result<(), eyre::Report> {
    expect_query_count(world, CrmObject::Task, count)
}

#[then("the CRM received {count:usize} contact queries")]
fn contact_query_count(world: &SyncWorld, count: usize) -> Result<(), eyre::Report> {
    expect_query_count(world, CrmObject::Contact, count)
}

fn expect_query_count(
    world: &SyncWorld,
    object: CrmObject,
    count: usize,
) -> Result<(), eyre::Report> {
    let actual = world.gateway.query_count(object);
    if actual != count {
        return Err(eyre::eyre!("expected {count} {object} queries, found {actual}"));
    }
    Ok(())
}

#[then("the event fails with a CRM error")]
fn event_fails_with_crm_error(world: &SyncWorld) -> Result<(), eyre::Report> {
    match world.last_result.as_ref() {
        Some(Err(SyncError::Gateway(_))) => Ok(()),
        other => Err(eyre::eyre!("expected a CRM failure, found {other:?}")),
    }
}

#[then(r#"the run is aborted because no owner is named "{name}""#)]
fn run_aborted_without_owner(world: &SyncWorld, name: String) -> Result<(), eyre::Report> {
    if world.engine.is_some() {
        return Err(eyre::eyre!("engine started despite a missing owner"));
    }
    match world.start_error.as_ref() {
        Some(SyncError::OwnerNotFound(missing)) if *missing == name => Ok(()),
        other => Err(eyre::eyre!("expected missing owner {name}, found {other:?}")),
    }
}
