//! Unit tests for the sync module.

use super::{
    domain::{CrmRecord, EventProperties, NormalizedEvent, RecordId},
    ports::{CrmGateway, CrmGatewayResult, CrmObject, RecordQuery},
};
use async_trait::async_trait;
use serde_json::Value;

mod engine_tests;

mockall::mock! {
    pub Gateway {}

    #[async_trait]
    impl CrmGateway for Gateway {
        async fn query(&self, query: &RecordQuery) -> CrmGatewayResult<Vec<CrmRecord>>;
        async fn create(&self, object: CrmObject, record: &CrmRecord) -> CrmGatewayResult<RecordId>;
    }
}

/// Builds an event from a JSON object literal.
fn event(name: &str, properties: Value) -> NormalizedEvent {
    NormalizedEvent::new(name, object(properties))
}

fn object(value: Value) -> EventProperties {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
