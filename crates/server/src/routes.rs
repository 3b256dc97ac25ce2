// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP handlers and the router.
//!
//! Each handler locks the persistence layer, delegates to one `roms_api`
//! operation, and renders the result. Domain decisions never happen here.

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use roms_api::{
    AddDocumentRequest, AgreementResponse, AssignmentResponse, AuditEventResponse,
    CancelAgreementRequest, CancelAssignmentRequest, CandidateResponse, CreateAgreementRequest,
    CreateAssignmentRequest, CreateJobOrderRequest, DocumentResponse, JobOrderResponse,
    MedicalResultRequest, PaymentRequest, PaymentTransactionResponse, RegisterCandidateRequest,
    ReversePaymentRequest, ReviewDocumentsResponse, ScheduleInterviewRequest,
    SignAgreementRequest, StatementResponse, TransitionRequest, WorkflowViewResponse,
};
use roms_domain::{CandidateStatus, TransactionType};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::AppState;
use crate::error::HttpError;
use crate::origin::RequestOrigin;

type Created<T> = (StatusCode, Json<T>);

/// Query parameters for the candidate statement.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementQuery {
    /// Statement for this agreement instead of the current one.
    pub agreement_id: Option<i64>,
}

/// Health check body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` while the server is serving.
    pub status: String,
}

/// Builds the application router with all endpoints.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/candidates", post(handle_register_candidate))
        .route("/candidates/{id}", get(handle_get_candidate))
        .route("/candidates/{id}/transition", post(handle_transition))
        .route(
            "/candidates/{id}/allowed-transitions",
            get(handle_allowed_transitions),
        )
        .route(
            "/candidates/{id}/review-documents",
            post(handle_review_documents),
        )
        .route("/candidates/{id}/documents", post(handle_add_document))
        .route("/candidates/{id}/medical", post(handle_medical_result))
        .route("/candidates/{id}/interview", post(handle_schedule_interview))
        .route("/candidates/{id}/workflow", get(handle_workflow_view))
        .route("/candidates/{id}/audit", get(handle_audit_trail))
        .route("/documents/{id}/verify", post(handle_verify_document))
        .route("/job-orders", post(handle_create_job_order))
        .route("/job-orders/{id}", get(handle_get_job_order))
        .route("/assignments", post(handle_create_assignment))
        .route("/assignments/{id}", get(handle_get_assignment))
        .route("/assignments/{id}/cancel", post(handle_cancel_assignment))
        .route("/assignments/{id}/offer", post(handle_issue_offer))
        .route("/assignments/{id}/placement", post(handle_confirm_placement))
        .route("/agreements", post(handle_create_agreement))
        .route("/agreements/{id}", get(handle_get_agreement))
        .route("/agreements/{id}/sign", post(handle_sign_agreement))
        .route("/agreements/{id}/cancel", post(handle_cancel_agreement))
        .route("/payments/downpayment", post(handle_record_downpayment))
        .route("/payments/installment", post(handle_record_installment))
        .route("/payments/balance", post(handle_record_balance))
        .route("/payments/{id}/reverse", post(handle_reverse_payment))
        .route(
            "/payments/assignment/{id}/downpayment-status",
            get(handle_downpayment_status),
        )
        .route(
            "/payments/assignment/{id}/fullpayment-status",
            get(handle_full_payment_status),
        )
        .route(
            "/payments/candidate/{id}/statement",
            get(handle_candidate_statement),
        )
        .with_state(app_state)
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

// ============================================================================
// Candidates
// ============================================================================

/// Handler for POST `/candidates`.
async fn handle_register_candidate(
    AxumState(app_state): AxumState<AppState>,
    RequestOrigin(context): RequestOrigin,
    payload: Result<Json<RegisterCandidateRequest>, JsonRejection>,
) -> Result<Created<CandidateResponse>, HttpError> {
    let Json(request) = payload?;
    info!(
        reference_number = %request.reference_number,
        actor_id = %context.actor.id,
        "Handling register_candidate request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let candidate: CandidateResponse =
        roms_api::register_candidate(&mut persistence, request, context)?;
    Ok((StatusCode::CREATED, Json(candidate)))
}

/// Handler for GET `/candidates/{id}`.
async fn handle_get_candidate(
    AxumState(app_state): AxumState<AppState>,
    Path(candidate_id): Path<i64>,
) -> Result<Json<CandidateResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(roms_api::get_candidate(&mut persistence, candidate_id)?))
}

/// Handler for POST `/candidates/{id}/transition`.
///
/// Every gate is evaluated by the core; rejections come back as 4xx with
/// the specific unmet condition.
async fn handle_transition(
    AxumState(app_state): AxumState<AppState>,
    RequestOrigin(context): RequestOrigin,
    Path(candidate_id): Path<i64>,
    payload: Result<Json<TransitionRequest>, JsonRejection>,
) -> Result<Json<CandidateResponse>, HttpError> {
    let Json(request) = payload?;
    info!(
        candidate_id,
        target = %request.status,
        actor_id = %context.actor.id,
        "Handling transition request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let candidate: CandidateResponse = roms_api::transition_candidate(
        &mut persistence,
        &app_state.settings,
        candidate_id,
        &request,
        context,
    )?;
    Ok(Json(candidate))
}

/// Handler for GET `/candidates/{id}/allowed-transitions`.
async fn handle_allowed_transitions(
    AxumState(app_state): AxumState<AppState>,
    RequestOrigin(context): RequestOrigin,
    Path(candidate_id): Path<i64>,
) -> Result<Json<Vec<CandidateStatus>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let allowed: Vec<CandidateStatus> = roms_api::allowed_transitions(
        &mut persistence,
        &app_state.settings,
        candidate_id,
        context.now.date(),
    )?;
    Ok(Json(allowed))
}

/// Handler for POST `/candidates/{id}/review-documents`.
async fn handle_review_documents(
    AxumState(app_state): AxumState<AppState>,
    RequestOrigin(context): RequestOrigin,
    Path(candidate_id): Path<i64>,
) -> Result<Json<ReviewDocumentsResponse>, HttpError> {
    info!(candidate_id, "Handling review_documents request");

    let mut persistence = app_state.persistence.lock().await;
    let review: ReviewDocumentsResponse = roms_api::review_documents(
        &mut persistence,
        &app_state.settings,
        candidate_id,
        context,
    )?;
    Ok(Json(review))
}

/// Handler for POST `/candidates/{id}/documents`.
async fn handle_add_document(
    AxumState(app_state): AxumState<AppState>,
    RequestOrigin(context): RequestOrigin,
    Path(candidate_id): Path<i64>,
    payload: Result<Json<AddDocumentRequest>, JsonRejection>,
) -> Result<Created<DocumentResponse>, HttpError> {
    let Json(request) = payload?;
    info!(
        candidate_id,
        document_type = %request.document_type,
        "Handling add_document request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let document: DocumentResponse = roms_api::add_document(
        &mut persistence,
        &app_state.settings,
        candidate_id,
        request,
        context,
    )?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// Handler for POST `/documents/{id}/verify`.
async fn handle_verify_document(
    AxumState(app_state): AxumState<AppState>,
    RequestOrigin(context): RequestOrigin,
    Path(document_id): Path<i64>,
) -> Result<Json<DocumentResponse>, HttpError> {
    info!(document_id, "Handling verify_document request");

    let mut persistence = app_state.persistence.lock().await;
    let document: DocumentResponse = roms_api::verify_document(
        &mut persistence,
        &app_state.settings,
        document_id,
        context,
    )?;
    Ok(Json(document))
}

/// Handler for POST `/candidates/{id}/medical`.
async fn handle_medical_result(
    AxumState(app_state): AxumState<AppState>,
    RequestOrigin(context): RequestOrigin,
    Path(candidate_id): Path<i64>,
    payload: Result<Json<MedicalResultRequest>, JsonRejection>,
) -> Result<Json<CandidateResponse>, HttpError> {
    let Json(request) = payload?;
    info!(candidate_id, result = %request.result, "Handling medical result");

    let mut persistence = app_state.persistence.lock().await;
    let candidate: CandidateResponse = roms_api::record_medical_result(
        &mut persistence,
        &app_state.settings,
        candidate_id,
        &request,
        context,
    )?;
    Ok(Json(candidate))
}

/// Handler for POST `/candidates/{id}/interview`.
async fn handle_schedule_interview(
    AxumState(app_state): AxumState<AppState>,
    RequestOrigin(context): RequestOrigin,
    Path(candidate_id): Path<i64>,
    payload: Result<Json<ScheduleInterviewRequest>, JsonRejection>,
) -> Result<Json<CandidateResponse>, HttpError> {
    let Json(request) = payload?;
    info!(candidate_id, interview_date = %request.interview_date, "Handling interview date");

    let mut persistence = app_state.persistence.lock().await;
    let candidate: CandidateResponse = roms_api::schedule_interview(
        &mut persistence,
        &app_state.settings,
        candidate_id,
        &request,
        context,
    )?;
    Ok(Json(candidate))
}

/// Handler for GET `/candidates/{id}/workflow`.
async fn handle_workflow_view(
    AxumState(app_state): AxumState<AppState>,
    RequestOrigin(context): RequestOrigin,
    Path(candidate_id): Path<i64>,
) -> Result<Json<WorkflowViewResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let view: WorkflowViewResponse = roms_api::workflow_view(
        &mut persistence,
        &app_state.settings,
        candidate_id,
        context.now.date(),
    )?;
    Ok(Json(view))
}

/// Handler for GET `/candidates/{id}/audit`.
async fn handle_audit_trail(
    AxumState(app_state): AxumState<AppState>,
    Path(candidate_id): Path<i64>,
) -> Result<Json<Vec<AuditEventResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(roms_api::candidate_audit_trail(
        &mut persistence,
        candidate_id,
    )?))
}

// ============================================================================
// Job orders and assignments
// ============================================================================

/// Handler for POST `/job-orders`.
async fn handle_create_job_order(
    AxumState(app_state): AxumState<AppState>,
    RequestOrigin(context): RequestOrigin,
    payload: Result<Json<CreateJobOrderRequest>, JsonRejection>,
) -> Result<Created<JobOrderResponse>, HttpError> {
    let Json(request) = payload?;
    info!(reference = %request.reference, "Handling create_job_order request");

    let mut persistence = app_state.persistence.lock().await;
    let job_order: JobOrderResponse =
        roms_api::create_job_order(&mut persistence, request, context)?;
    Ok((StatusCode::CREATED, Json(job_order)))
}

/// Handler for GET `/job-orders/{id}`.
async fn handle_get_job_order(
    AxumState(app_state): AxumState<AppState>,
    Path(job_order_id): Path<i64>,
) -> Result<Json<JobOrderResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(roms_api::get_job_order(&mut persistence, job_order_id)?))
}

/// Handler for POST `/assignments`.
async fn handle_create_assignment(
    AxumState(app_state): AxumState<AppState>,
    RequestOrigin(context): RequestOrigin,
    payload: Result<Json<CreateAssignmentRequest>, JsonRejection>,
) -> Result<Created<AssignmentResponse>, HttpError> {
    let Json(request) = payload?;
    info!(
        candidate_id = request.candidate_id,
        job_order_id = request.job_order_id,
        "Handling create_assignment request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let assignment: AssignmentResponse =
        roms_api::create_assignment(&mut persistence, request, context)?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Handler for GET `/assignments/{id}`.
async fn handle_get_assignment(
    AxumState(app_state): AxumState<AppState>,
    Path(assignment_id): Path<i64>,
) -> Result<Json<AssignmentResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(roms_api::get_assignment(&mut persistence, assignment_id)?))
}

/// Handler for POST `/assignments/{id}/cancel`. The body is optional.
async fn handle_cancel_assignment(
    AxumState(app_state): AxumState<AppState>,
    RequestOrigin(context): RequestOrigin,
    Path(assignment_id): Path<i64>,
    payload: Option<Json<CancelAssignmentRequest>>,
) -> Result<Json<AssignmentResponse>, HttpError> {
    let request: CancelAssignmentRequest =
        payload.map(|Json(request)| request).unwrap_or_default();
    info!(assignment_id, "Handling cancel_assignment request");

    let mut persistence = app_state.persistence.lock().await;
    let assignment: AssignmentResponse =
        roms_api::cancel_assignment(&mut persistence, assignment_id, request, context)?;
    Ok(Json(assignment))
}

/// Handler for POST `/assignments/{id}/offer`.
async fn handle_issue_offer(
    AxumState(app_state): AxumState<AppState>,
    RequestOrigin(context): RequestOrigin,
    Path(assignment_id): Path<i64>,
) -> Result<Json<AssignmentResponse>, HttpError> {
    info!(assignment_id, "Handling issue_offer request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(roms_api::issue_offer(
        &mut persistence,
        assignment_id,
        context,
    )?))
}

/// Handler for POST `/assignments/{id}/placement`.
async fn handle_confirm_placement(
    AxumState(app_state): AxumState<AppState>,
    RequestOrigin(context): RequestOrigin,
    Path(assignment_id): Path<i64>,
) -> Result<Json<AssignmentResponse>, HttpError> {
    info!(assignment_id, "Handling confirm_placement request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(roms_api::confirm_placement(
        &mut persistence,
        assignment_id,
        context,
    )?))
}

// ============================================================================
// Agreements
// ============================================================================

/// Handler for POST `/agreements`.
async fn handle_create_agreement(
    AxumState(app_state): AxumState<AppState>,
    RequestOrigin(context): RequestOrigin,
    payload: Result<Json<CreateAgreementRequest>, JsonRejection>,
) -> Result<Created<AgreementResponse>, HttpError> {
    let Json(request) = payload?;
    info!(
        candidate_id = request.candidate_id,
        assignment_id = request.assignment_id,
        total = %request.total_commission_amount,
        downpayment = %request.required_downpayment_amount,
        "Handling create_agreement request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let agreement: AgreementResponse =
        roms_api::create_agreement(&mut persistence, request, context)?;
    Ok((StatusCode::CREATED, Json(agreement)))
}

/// Handler for GET `/agreements/{id}`.
async fn handle_get_agreement(
    AxumState(app_state): AxumState<AppState>,
    Path(agreement_id): Path<i64>,
) -> Result<Json<AgreementResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(roms_api::get_agreement(&mut persistence, agreement_id)?))
}

/// Handler for POST `/agreements/{id}/sign`. The body is optional.
async fn handle_sign_agreement(
    AxumState(app_state): AxumState<AppState>,
    RequestOrigin(context): RequestOrigin,
    Path(agreement_id): Path<i64>,
    payload: Option<Json<SignAgreementRequest>>,
) -> Result<Json<AgreementResponse>, HttpError> {
    let request: SignAgreementRequest = payload.map(|Json(request)| request).unwrap_or_default();
    info!(agreement_id, "Handling sign_agreement request");

    let mut persistence = app_state.persistence.lock().await;
    let agreement: AgreementResponse =
        roms_api::sign_agreement(&mut persistence, agreement_id, request, context)?;
    Ok(Json(agreement))
}

/// Handler for POST `/agreements/{id}/cancel`.
async fn handle_cancel_agreement(
    AxumState(app_state): AxumState<AppState>,
    RequestOrigin(context): RequestOrigin,
    Path(agreement_id): Path<i64>,
    payload: Result<Json<CancelAgreementRequest>, JsonRejection>,
) -> Result<Json<AgreementResponse>, HttpError> {
    let Json(request) = payload?;
    info!(agreement_id, "Handling cancel_agreement request");

    let mut persistence = app_state.persistence.lock().await;
    let agreement: AgreementResponse =
        roms_api::cancel_agreement(&mut persistence, agreement_id, request, context)?;
    Ok(Json(agreement))
}

// ============================================================================
// Payments
// ============================================================================

async fn record_payment(
    app_state: &AppState,
    transaction_type: TransactionType,
    context: roms_api::RequestContext,
    request: PaymentRequest,
) -> Result<Created<PaymentTransactionResponse>, HttpError> {
    info!(
        agreement_id = request.agreement_id,
        amount = %request.amount,
        transaction_type = %transaction_type,
        actor_id = %context.actor.id,
        "Handling record_payment request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let transaction: PaymentTransactionResponse =
        roms_api::record_payment(&mut persistence, transaction_type, request, context)?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// Handler for POST `/payments/downpayment`.
async fn handle_record_downpayment(
    AxumState(app_state): AxumState<AppState>,
    RequestOrigin(context): RequestOrigin,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<Created<PaymentTransactionResponse>, HttpError> {
    let Json(request) = payload?;
    record_payment(&app_state, TransactionType::Downpayment, context, request).await
}

/// Handler for POST `/payments/installment`.
async fn handle_record_installment(
    AxumState(app_state): AxumState<AppState>,
    RequestOrigin(context): RequestOrigin,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<Created<PaymentTransactionResponse>, HttpError> {
    let Json(request) = payload?;
    record_payment(&app_state, TransactionType::Installment, context, request).await
}

/// Handler for POST `/payments/balance`.
async fn handle_record_balance(
    AxumState(app_state): AxumState<AppState>,
    RequestOrigin(context): RequestOrigin,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<Created<PaymentTransactionResponse>, HttpError> {
    let Json(request) = payload?;
    record_payment(&app_state, TransactionType::Balance, context, request).await
}

/// Handler for POST `/payments/{id}/reverse`.
async fn handle_reverse_payment(
    AxumState(app_state): AxumState<AppState>,
    RequestOrigin(context): RequestOrigin,
    Path(transaction_id): Path<i64>,
    payload: Result<Json<ReversePaymentRequest>, JsonRejection>,
) -> Result<Created<PaymentTransactionResponse>, HttpError> {
    let Json(request) = payload?;
    info!(
        transaction_id,
        actor_id = %context.actor.id,
        "Handling reverse_payment request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let reversal: PaymentTransactionResponse =
        roms_api::reverse_payment(&mut persistence, transaction_id, request, context)?;
    Ok((StatusCode::CREATED, Json(reversal)))
}

/// Handler for GET `/payments/assignment/{id}/downpayment-status`.
async fn handle_downpayment_status(
    AxumState(app_state): AxumState<AppState>,
    Path(assignment_id): Path<i64>,
) -> Result<Json<bool>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(roms_api::downpayment_status(
        &mut persistence,
        assignment_id,
    )?))
}

/// Handler for GET `/payments/assignment/{id}/fullpayment-status`.
async fn handle_full_payment_status(
    AxumState(app_state): AxumState<AppState>,
    Path(assignment_id): Path<i64>,
) -> Result<Json<bool>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(roms_api::full_payment_status(
        &mut persistence,
        assignment_id,
    )?))
}

/// Handler for GET `/payments/candidate/{id}/statement`.
async fn handle_candidate_statement(
    AxumState(app_state): AxumState<AppState>,
    Path(candidate_id): Path<i64>,
    Query(query): Query<StatementQuery>,
) -> Result<Json<StatementResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let statement: StatementResponse =
        roms_api::candidate_statement(&mut persistence, candidate_id, query.agreement_id)?;
    Ok(Json(statement))
}
