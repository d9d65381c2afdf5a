//! Received-amount ledgers on vendors, parties and batches.

use axum::http::StatusCode;
use quarry_ledger_integration_tests::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_batch_payment_recomputes_remaining() {
    let app = TestApp::new();
    let created = app
        .post(
            "/api/blocks",
            &json!({
                "hydra_cost": 50,
                "truck_cost": 30,
                "depreciation": 10,
                "partyAdvancePayment": 100,
                "groups": [
                    { "measures": [{ "l": 2, "b": 1, "h": 0.5, "rate": 100 }] },
                    { "measures": [{ "l": 2, "b": 1, "h": 0.5, "rate": 100 }] }
                ]
            }),
        )
        .await;
    assert_eq!(created.body["partyRemainingPayment"], 152);
    let uri = format!(
        "/api/blocks/{}/received-amounts",
        created.body["id"].as_str().unwrap_or_default()
    );

    let first = app
        .post(&uri, &json!({ "amount": 50, "date": "2024-02-01", "description": "cash" }))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["partyRemainingPayment"], 102);

    let second = app.post(&uri, &json!({ "amount": "202" })).await;
    assert_eq!(second.body["partyRemainingPayment"], -100);
    assert_eq!(second.body["receivedAmounts"].as_array().map(Vec::len), Some(2));
    assert_eq!(second.body["receivedAmounts"][0]["description"], "cash");
}

#[tokio::test]
async fn test_vendor_balance() {
    let app = TestApp::new();
    let vendor = app
        .post("/api/vendors", &json!({ "name": "Choudhary Earthmovers" }))
        .await;
    let uri = format!(
        "/api/vendors/{}/received-amounts",
        vendor.body["id"].as_str().unwrap_or_default()
    );

    app.post(&uri, &json!({ "amount": 1000, "date": "2024-03-01" })).await;
    let response = app.post(&uri, &json!({ "amount": 500.5, "date": "2024-03-08" })).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["balance"], 1500.5);
    assert_eq!(response.body["receivedAmounts"][1]["date"], "2024-03-08");
}

#[tokio::test]
async fn test_payments_refused_for_collections_without_ledger() {
    let app = TestApp::new();
    let mine = app.post("/api/mines", &json!({ "name": "South pit" })).await;
    let uri = format!(
        "/api/mines/{}/received-amounts",
        mine.body["id"].as_str().unwrap_or_default()
    );

    let response = app.post(&uri, &json!({ "amount": 10 })).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_payment_to_missing_document() {
    let app = TestApp::new();
    let response = app
        .post(
            "/api/parties/6f1c2a8e-0d3b-4b7a-9a51-3c1d2e4f5a6b/received-amounts",
            &json!({ "amount": 10 }),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_are_not_lost() {
    let app = TestApp::new();
    let party = app.post("/api/parties", &json!({ "name": "Shree Granites" })).await;
    let uri = format!(
        "/api/parties/{}/received-amounts",
        party.body["id"].as_str().unwrap_or_default()
    );

    let tasks: Vec<_> = (0..25)
        .map(|n| {
            let app = app.clone();
            let uri = uri.clone();
            tokio::spawn(async move {
                app.post(&uri, &json!({ "amount": 10, "description": format!("instalment {n}") }))
                    .await
                    .status
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.ok(), Some(StatusCode::OK));
    }

    let id = party.body["id"].as_str().unwrap_or_default();
    let stored = app.get(&format!("/api/parties/{id}")).await;
    assert_eq!(stored.body["receivedAmounts"].as_array().map(Vec::len), Some(25));
    assert_eq!(stored.body["balance"], 250);
}

#[tokio::test]
async fn test_overflowing_ledger_is_rejected() {
    let app = TestApp::new();
    let vendor = app.post("/api/vendors", &json!({ "name": "Rathore Logistics" })).await;
    let id = vendor.body["id"].as_str().unwrap_or_default().to_string();
    let uri = format!("/api/vendors/{id}/received-amounts");
    let huge = json!({ "amount": "79228162514264337593543950335" });

    let first = app.post(&uri, &huge).await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app.post(&uri, &huge).await;
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert_eq!(second.body["field"], "receivedAmounts");

    let stored = app.get(&format!("/api/vendors/{id}")).await;
    assert_eq!(stored.body["receivedAmounts"].as_array().map(Vec::len), Some(1));
}
