//! Contract Test: Outcome Classification
//!
//! Every user-facing operation ends in exactly one disposition, and only a
//! success touches the store.
//!
//! Constraints verified:
//! - Server rejections surface the server's message verbatim
//! - Unreachable servers yield ConnectionFailure for every operation
//! - Malformed responses yield Unknown and never panic
//! - Invalid local records never reach the network
//!
//! If this test fails, failures leak into the store or past the controller.

mod common;

use account_core::{Disposition, OperationState, SyncController};
use common::*;
use serde_json::json;

fn controller_for(api: &MockAccountApi) -> SyncController {
    SyncController::new(Box::new(MockAccountApi::sharing_counters_with(api)))
}

#[tokio::test]
async fn rejected_create_leaves_store_unchanged() {
    let api = MockAccountApi::new();
    api.push_ok("", Some(json!([record("AAA", 510)])))
        .push_rejected("duplicate orgno");

    let mut controller = controller_for(&api);
    controller.initial_load().await;
    let before = controller.store().get(510).cloned();

    let disposition = controller.submit_create(&record("Other", 510)).await;

    assert_eq!(
        disposition,
        Disposition::Rejected {
            message: "duplicate orgno".to_string()
        }
    );
    assert_eq!(controller.last_state(), OperationState::Rejected);
    assert_eq!(controller.store().len(), 1);
    assert_eq!(controller.store().get(510).cloned(), before);
    assert_eq!(api.calls(), vec!["fetch_many 0", "create 510"]);
}

#[tokio::test]
async fn unreachable_server_fails_every_operation() {
    let api = MockAccountApi::unreachable();
    let mut controller = controller_for(&api);

    let dispositions = vec![
        controller.check_connection().await,
        controller.initial_load().await,
        controller.refresh().await,
        controller.refresh_limited(5).await,
        controller.submit_create(&record("AAA", 510)).await,
        controller.submit_edit(510, &record("AAA", 510)).await,
        controller.submit_delete(510).await,
    ];

    for disposition in dispositions {
        match disposition {
            Disposition::ConnectionFailure { message } => {
                assert_eq!(message, "Could not connect to server 127.0.0.1:8080");
            }
            other => panic!("Expected connection failure, got {:?}", other),
        }
    }
    assert!(controller.store().is_empty());
    assert_eq!(controller.last_state(), OperationState::Failed);
    assert_eq!(api.call_count(), 7, "Every operation makes exactly one attempt");
}

#[tokio::test]
async fn unreachable_server_keeps_existing_accounts() {
    let api = MockAccountApi::new();
    api.push_ok("", Some(json!([record("AAA", 510)])))
        .push(Reply::Refused)
        .push(Reply::Refused);

    let mut controller = controller_for(&api);
    controller.initial_load().await;

    let refresh = controller.refresh().await;
    let delete = controller.submit_delete(510).await;

    assert!(matches!(refresh, Disposition::ConnectionFailure { .. }));
    assert!(matches!(delete, Disposition::ConnectionFailure { .. }));
    assert!(controller.store().contains(510));
}

#[tokio::test]
async fn malformed_response_is_unknown() {
    let api = MockAccountApi::new();
    api.push(Reply::Garbage);

    let mut controller = controller_for(&api);
    let disposition = controller.refresh().await;

    assert_eq!(
        disposition,
        Disposition::Unknown {
            message: "Unknown error".to_string()
        }
    );
    assert_eq!(controller.last_state(), OperationState::Failed);
    assert!(controller.store().is_empty());
}

#[tokio::test]
async fn non_list_payload_is_unknown() {
    let api = MockAccountApi::new();
    api.push_ok("", Some(json!({"accounts": []})));

    let mut controller = controller_for(&api);
    let disposition = controller.refresh().await;

    assert!(matches!(disposition, Disposition::Unknown { .. }));
}

#[tokio::test]
async fn invalid_local_record_never_reaches_network() {
    let api = MockAccountApi::new();
    let mut controller = controller_for(&api);

    let mut bad = record("AAA", 510);
    bad["orgno"] = json!("510");

    let create = controller.submit_create(&bad).await;
    let edit = controller.submit_edit(510, &bad).await;

    for disposition in [create, edit] {
        match disposition {
            Disposition::Rejected { message } => assert_eq!(message, "Field orgno is not an int"),
            other => panic!("Expected rejection, got {:?}", other),
        }
    }
    assert_eq!(api.call_count(), 0);
    assert_eq!(controller.last_state(), OperationState::Rejected);
}

#[tokio::test]
async fn rejected_list_fetch_reports_message() {
    let api = MockAccountApi::new();
    api.push_rejected("database unavailable");

    let mut controller = controller_for(&api);
    let disposition = controller.initial_load().await;

    assert_eq!(disposition.message(), "database unavailable");
    assert!(matches!(disposition, Disposition::Rejected { .. }));
    assert!(controller.store().is_empty());
}

#[tokio::test]
async fn check_connection_returns_body() {
    let api = MockAccountApi::new();
    api.push_ok("Hello from the account service", None);

    let mut controller = controller_for(&api);
    assert_eq!(controller.last_state(), OperationState::Idle);

    let disposition = controller.check_connection().await;

    assert_eq!(disposition.message(), "Hello from the account service");
    assert_eq!(controller.last_state(), OperationState::Succeeded);
}
