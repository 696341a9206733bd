//! Sync engine orchestration tests.

use super::{MockGateway, event};
use crate::sync::{
    adapters::memory::InMemoryCrmGateway,
    domain::{CrmRecord, NormalizedEvent, RecordId, SyncOutcome, TaskStatus, schema},
    ports::{CrmGatewayError, CrmObject},
    services::{ExportReader, SyncEngine, SyncError, SyncSettings},
};
use rstest::{fixture, rstest};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

type TestEngine = SyncEngine<InMemoryCrmGateway>;

#[fixture]
fn settings() -> SyncSettings {
    SyncSettings {
        owner_name: "Sync Owner".to_owned(),
        subject_keys: vec!["Report Name".to_owned()],
        task_status: TaskStatus::new("Not Started").expect("valid status"),
        throttle_interval: Duration::ZERO,
    }
}

#[fixture]
fn gateway() -> Arc<InMemoryCrmGateway> {
    let gateway = InMemoryCrmGateway::new();
    gateway.insert_user("005-owner", "Sync Owner");
    gateway.insert_contact("003-ann", "ann@example.com");
    Arc::new(gateway)
}

fn purchase(actor: &str, report: &str) -> NormalizedEvent {
    event(
        "Purchase Item",
        json!({
            "Report Name": report,
            "time": 1_426_700_933,
            "distinct_id": actor,
        }),
    )
}

async fn engine(gateway: &Arc<InMemoryCrmGateway>, settings: SyncSettings) -> TestEngine {
    SyncEngine::start(Arc::clone(gateway), settings)
        .await
        .expect("engine should start")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unseen_event_creates_one_task(gateway: Arc<InMemoryCrmGateway>, settings: SyncSettings) {
    let mut engine = engine(&gateway, settings).await;

    let outcome = engine
        .process_event(&purchase("ann@example.com", "X"))
        .await
        .expect("processing should succeed");

    assert_eq!(outcome, SyncOutcome::Created);
    assert_eq!(engine.owner_id().as_str(), "005-owner");
    let created = gateway.created(CrmObject::Task);
    assert_eq!(created.len(), 1);
    let record = created.first().expect("one created task");
    assert_eq!(record.get_str(schema::TASK_WHO_ID), Some("003-ann"));
    assert_eq!(record.get_str(schema::TASK_SUBJECT), Some("Purchase Item: X"));
    assert_eq!(record.get_str(schema::TASK_ACTIVITY_DATE), Some("2015-03-18"));
    assert_eq!(record.get_str(schema::TASK_OWNER_ID), Some("005-owner"));
    assert_eq!(record.get_str(schema::TASK_STATUS), Some("Not Started"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stored_task_skips_as_duplicate(gateway: Arc<InMemoryCrmGateway>, settings: SyncSettings) {
    gateway.insert_task("003-ann", "2015-03-18", "Purchase Item: X");
    let mut engine = engine(&gateway, settings).await;

    let outcome = engine
        .process_event(&purchase("ann@example.com", "X"))
        .await
        .expect("processing should succeed");

    assert_eq!(outcome, SyncOutcome::SkippedDuplicate);
    assert!(gateway.created(CrmObject::Task).is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replayed_event_is_detected_from_cache(
    gateway: Arc<InMemoryCrmGateway>,
    settings: SyncSettings,
) {
    let mut engine = engine(&gateway, settings).await;
    let replayed = purchase("ann@example.com", "X");

    let first = engine.process_event(&replayed).await.expect("first pass");
    let second = engine.process_event(&replayed).await.expect("second pass");

    assert_eq!(first, SyncOutcome::Created);
    assert_eq!(second, SyncOutcome::SkippedDuplicate);
    assert_eq!(gateway.created(CrmObject::Task).len(), 1);
    assert_eq!(gateway.query_count(CrmObject::Task), 1);
    assert_eq!(gateway.query_count(CrmObject::Contact), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_actor_is_flagged_and_never_requeried(
    gateway: Arc<InMemoryCrmGateway>,
    settings: SyncSettings,
) {
    let mut engine = engine(&gateway, settings).await;

    let unknown = engine
        .process_event(&purchase("bob@example.com", "X"))
        .await
        .expect("first pass");
    let again = engine
        .process_event(&purchase("bob@example.com", "Y"))
        .await
        .expect("second pass");
    let malformed = engine
        .process_event(&purchase("not-an-email", "X"))
        .await
        .expect("malformed email");

    assert_eq!(unknown, SyncOutcome::SkippedInvalidActor);
    assert_eq!(again, SyncOutcome::SkippedInvalidActor);
    assert_eq!(malformed, SyncOutcome::SkippedInvalidActor);
    assert_eq!(gateway.query_count(CrmObject::Contact), 1);
    assert!(gateway.created(CrmObject::Task).is_empty());
}

#[rstest]
#[case::missing_time(event("Purchase Item", json!({ "distinct_id": "ann@example.com" })))]
#[case::missing_actor(event("Purchase Item", json!({ "time": 1_426_700_933 })))]
#[case::missing_properties(NormalizedEvent::from_parts(Some("Purchase Item".to_owned()), None))]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_event_makes_no_crm_call(
    gateway: Arc<InMemoryCrmGateway>,
    settings: SyncSettings,
    #[case] malformed: NormalizedEvent,
) {
    let mut engine = engine(&gateway, settings).await;
    let queries_after_start = gateway.queries().len();

    let outcome = engine
        .process_event(&malformed)
        .await
        .expect("processing should succeed");

    assert_eq!(outcome, SyncOutcome::SkippedMalformed);
    assert_eq!(gateway.queries().len(), queries_after_start);
    assert!(gateway.created(CrmObject::Task).is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_fails_without_owner(settings: SyncSettings) {
    let gateway = Arc::new(InMemoryCrmGateway::new());

    let result = SyncEngine::start(gateway, settings).await;

    assert!(matches!(result, Err(SyncError::OwnerNotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_fails_with_ambiguous_owner(
    gateway: Arc<InMemoryCrmGateway>,
    settings: SyncSettings,
) {
    gateway.insert_user("005-twin", "Sync Owner");

    let result = SyncEngine::start(gateway, settings).await;

    assert!(matches!(
        result,
        Err(SyncError::AmbiguousOwner { matches: 2, .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transient_failure_abandons_event_without_flagging(
    gateway: Arc<InMemoryCrmGateway>,
    settings: SyncSettings,
) {
    let mut engine = engine(&gateway, settings).await;
    gateway.set_unavailable(CrmObject::Contact, true);

    let failed = engine.process_event(&purchase("ann@example.com", "X")).await;
    gateway.set_unavailable(CrmObject::Contact, false);
    let retried = engine
        .process_event(&purchase("ann@example.com", "X"))
        .await
        .expect("store is reachable again");

    assert!(matches!(failed, Err(SyncError::Gateway(_))));
    assert_eq!(retried, SyncOutcome::Created);
    assert_eq!(gateway.created(CrmObject::Task).len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_create_is_not_remembered(settings: SyncSettings) {
    let mut mock = MockGateway::new();
    mock.expect_query().returning(|query| {
        let record = match query.object() {
            CrmObject::User => CrmRecord::new().with_field(schema::ID, "005-owner"),
            CrmObject::Contact => CrmRecord::new().with_field(schema::ID, "003-ann"),
            CrmObject::Task => return Ok(Vec::new()),
        };
        Ok(vec![record])
    });
    let mut attempts = 0;
    mock.expect_create().times(2).returning(move |_, _| {
        attempts += 1;
        if attempts == 1 {
            Err(CrmGatewayError::Rejected {
                status: 400,
                message: "REQUIRED_FIELD_MISSING".to_owned(),
            })
        } else {
            Ok(RecordId::new("00T-1").expect("valid record id"))
        }
    });
    let mut engine = SyncEngine::start(Arc::new(mock), settings)
        .await
        .expect("engine should start");

    let rejected = engine.process_event(&purchase("ann@example.com", "X")).await;
    let accepted = engine
        .process_event(&purchase("ann@example.com", "X"))
        .await
        .expect("second create should succeed");

    assert!(matches!(
        rejected,
        Err(SyncError::Gateway(CrmGatewayError::Rejected { status: 400, .. }))
    ));
    assert_eq!(accepted, SyncOutcome::Created);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn run_tallies_every_terminal_state(
    gateway: Arc<InMemoryCrmGateway>,
    settings: SyncSettings,
) {
    gateway.insert_task("003-ann", "2015-03-18", "Purchase Item: Old");
    let export = [
        r#"{"event":"Purchase Item","properties":{"time":1426700933,"distinct_id":"ann@example.com","Report Name":"X"}}"#,
        r#"{"event":"Purchase Item","properties":{"time":1426700933,"distinct_id":"ann@example.com","Report Name":"X"}}"#,
        r#"{"event":"Purchase Item","properties":{"time":1426700933,"distinct_id":"ann@example.com","Report Name":"Old"}}"#,
        r#"{"event":"Purchase Item","properties":{"time":1426700933,"distinct_id":"bob@example.com"}}"#,
        r#"{"event":"Purchase Item","properties":{"distinct_id":"ann@example.com"}}"#,
        "{broken",
    ]
    .join("\n");
    let mut engine = engine(&gateway, settings).await;

    let report = engine.run(ExportReader::default().parse(&export)).await;

    assert_eq!(report.created, 1);
    assert_eq!(report.skipped_duplicate, 2);
    assert_eq!(report.skipped_invalid_actor, 1);
    assert_eq!(report.skipped_malformed, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(report.total(), 6);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn run_counts_failures_and_continues(
    gateway: Arc<InMemoryCrmGateway>,
    settings: SyncSettings,
) {
    let mut engine = engine(&gateway, settings).await;
    gateway.set_unavailable(CrmObject::Task, true);

    let report = engine
        .run([
            Ok(purchase("ann@example.com", "X")),
            Ok(purchase("bob@example.com", "X")),
        ])
        .await;

    assert_eq!(report.failed, 1);
    assert_eq!(report.skipped_invalid_actor, 1);
    assert_eq!(report.total(), 2);
}
