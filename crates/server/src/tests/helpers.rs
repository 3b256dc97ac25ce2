// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use roms_api::WorkflowSettings;
use roms_persistence::Persistence;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::AppState;
use crate::routes::build_router;

/// Helper to create a router over a fresh in-memory database.
pub fn create_test_app() -> Router {
    create_test_app_with(WorkflowSettings::default())
}

pub fn create_test_app_with(settings: WorkflowSettings) -> Router {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    build_router(AppState::new(persistence, settings))
}

/// Sends one request and decodes the JSON body (`Null` when empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-actor-id", "officer-7")
        .header("x-request-id", "test-request");
    let request: Request<Body> = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

/// Posts and asserts the expected status, returning the body.
pub async fn post_ok(app: &Router, uri: &str, body: Value, expected: StatusCode) -> Value {
    let (status, value) = post(app, uri, body).await;
    assert_eq!(status, expected, "POST {uri} returned {value}");
    value
}

pub fn id_of(value: &Value) -> i64 {
    value["id"].as_i64().unwrap()
}

pub async fn register(app: &Router, reference_number: &str) -> i64 {
    let candidate: Value = post_ok(
        app,
        "/candidates",
        json!({ "referenceNumber": reference_number, "fullName": "Amina Wanjiru" }),
        StatusCode::CREATED,
    )
    .await;
    id_of(&candidate)
}

pub async fn upload(app: &Router, candidate_id: i64, document_type: &str, expiry: Option<&str>) {
    post_ok(
        app,
        &format!("/candidates/{candidate_id}/documents"),
        json!({ "documentType": document_type, "verified": true, "expiryDate": expiry }),
        StatusCode::CREATED,
    )
    .await;
}

pub async fn transition(app: &Router, candidate_id: i64, status: &str) -> (StatusCode, Value) {
    post(
        app,
        &format!("/candidates/{candidate_id}/transition"),
        json!({ "status": status }),
    )
    .await
}

pub async fn pay(
    app: &Router,
    kind: &str,
    agreement_id: i64,
    amount: i64,
) -> (StatusCode, Value) {
    post(
        app,
        &format!("/payments/{kind}"),
        json!({
            "agreementId": agreement_id,
            "amount": amount,
            "paymentMethod": "M-PESA",
            "mpesaRef": format!("MP{amount}"),
        }),
    )
    .await
}

pub async fn statement(app: &Router, candidate_id: i64) -> Value {
    let (status, value) = get(app, &format!("/payments/candidate/{candidate_id}/statement")).await;
    assert_eq!(status, StatusCode::OK, "statement returned {value}");
    value
}

/// Ids of a candidate at `MEDICAL_PASSED` holding an unpaid 200,000 / 50,000 agreement.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    pub candidate_id: i64,
    pub assignment_id: i64,
    pub agreement_id: i64,
}

pub async fn create_medical_passed_pipeline(app: &Router) -> Pipeline {
    let candidate_id: i64 = register(app, "RC-0001").await;
    upload(app, candidate_id, "PASSPORT", Some("2035-01-01")).await;
    upload(app, candidate_id, "CV", None).await;
    upload(app, candidate_id, "EDUCATIONAL_CERTIFICATE", None).await;

    let job_order: Value = post_ok(
        app,
        "/job-orders",
        json!({
            "reference": "JO-2026-01",
            "title": "Care assistant",
            "employerName": "Gulf Health Group",
            "headcountRequired": 3,
            "interviewPolicy": "NOT_REQUIRED",
        }),
        StatusCode::CREATED,
    )
    .await;
    let assignment: Value = post_ok(
        app,
        "/assignments",
        json!({ "candidateId": candidate_id, "jobOrderId": id_of(&job_order) }),
        StatusCode::CREATED,
    )
    .await;
    let agreement: Value = post_ok(
        app,
        "/agreements",
        json!({
            "candidateId": candidate_id,
            "assignmentId": id_of(&assignment),
            "totalCommissionAmount": 200_000,
            "requiredDownpaymentAmount": 50_000,
        }),
        StatusCode::CREATED,
    )
    .await;

    assert_eq!(transition(app, candidate_id, "UNDER_REVIEW").await.0, StatusCode::OK);
    post_ok(
        app,
        &format!("/candidates/{candidate_id}/review-documents"),
        json!({}),
        StatusCode::OK,
    )
    .await;
    assert_eq!(transition(app, candidate_id, "MEDICAL_PENDING").await.0, StatusCode::OK);
    post_ok(
        app,
        &format!("/candidates/{candidate_id}/medical"),
        json!({ "result": "PASSED" }),
        StatusCode::OK,
    )
    .await;
    assert_eq!(transition(app, candidate_id, "MEDICAL_PASSED").await.0, StatusCode::OK);

    Pipeline {
        candidate_id,
        assignment_id: id_of(&assignment),
        agreement_id: id_of(&agreement),
    }
}
