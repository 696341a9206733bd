//! When steps for event-to-task sync scenarios.

use super::world::{SyncWorld, run_async};
use crm_sync::sync::domain::NormalizedEvent;
use rstest_bdd_macros::when;
use serde_json::{Map, Value, json};

fn process(world: &mut SyncWorld, event: &NormalizedEvent) -> Result<(), eyre::Report> {
    let engine = world
        .engine
        .as_mut()
        .ok_or_else(|| eyre::eyre!("sync engine was not started in scenario world"))?;
    world.last_result = Some(run_async(engine.process_event(event)));
    Ok(())
}

fn properties(value: Value) -> Result<Map<String, Value>, eyre::Report> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(eyre::eyre!("expected event properties object, found {other}")),
    }
}

#[when(
    r#"the "{name}" event for "{actor}" with "{key}" "{value}" at {time:i64} is processed"#
)]
#[expect(
    clippy::too_many_arguments,
    reason = "Step definition captures every event field from a single step"
)]
fn event_is_processed(
    world: &mut SyncWorld,
    name: String,
    actor: String,
    key: String,
    value: String,
    time: i64,
) -> Result<(), eyre::Report> {
    let mut props = properties(json!({ "time": time, "distinct_id": actor }))?;
    props.insert(key, Value::String(value));
    process(world, &NormalizedEvent::new(name, props))
}

#[when(r#"an untimed "{name}" event for "{actor}" is processed"#)]
fn untimed_event_is_processed(
    world: &mut SyncWorld,
    name: String,
    actor: String,
) -> Result<(), eyre::Report> {
    let props = properties(json!({ "distinct_id": actor }))?;
    process(world, &NormalizedEvent::new(name, props))
}
