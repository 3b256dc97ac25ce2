// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use roms_audit::{Actor, Cause};
use roms_domain::{Amount, TransactionType};
use roms_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    AddDocumentRequest, ApiError, CandidateResponse, CreateAgreementRequest,
    CreateAssignmentRequest, CreateJobOrderRequest, MedicalResultRequest, PaymentRequest,
    PaymentTransactionResponse, RegisterCandidateRequest, RequestContext, TransitionRequest,
    WorkflowSettings, add_document, create_agreement, create_assignment, create_job_order,
    record_medical_result, record_payment, register_candidate, review_documents,
    transition_candidate,
};

pub const NOW: OffsetDateTime = datetime!(2026-03-01 09:00 UTC);

pub fn create_test_context() -> RequestContext {
    RequestContext::new(
        Actor::new(String::from("officer-7"), String::from("operator")),
        Cause::new(String::from("api-req-456"), String::from("API request")),
        NOW,
    )
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub fn register(persistence: &mut Persistence, reference_number: &str) -> i64 {
    register_candidate(
        persistence,
        RegisterCandidateRequest {
            reference_number: reference_number.to_string(),
            full_name: String::from("Amina Wanjiru"),
            job_order_id: None,
        },
        create_test_context(),
    )
    .unwrap()
    .id
}

pub fn upload(
    persistence: &mut Persistence,
    candidate_id: i64,
    document_type: &str,
    expiry_date: Option<&str>,
) -> i64 {
    add_document(
        persistence,
        &WorkflowSettings::default(),
        candidate_id,
        AddDocumentRequest {
            document_type: document_type.to_string(),
            verified: true,
            expiry_date: expiry_date.map(str::to_string),
            file_reference: Some(format!("uploads/{candidate_id}/{document_type}.pdf")),
        },
        create_test_context(),
    )
    .unwrap()
    .id
}

pub fn upload_required_documents(persistence: &mut Persistence, candidate_id: i64) {
    upload(persistence, candidate_id, "PASSPORT", Some("2030-01-01"));
    upload(persistence, candidate_id, "CV", None);
    upload(persistence, candidate_id, "EDUCATIONAL_CERTIFICATE", None);
}

pub fn transition(
    persistence: &mut Persistence,
    candidate_id: i64,
    status: &str,
) -> Result<CandidateResponse, ApiError> {
    transition_candidate(
        persistence,
        &WorkflowSettings::default(),
        candidate_id,
        &TransitionRequest {
            status: status.to_string(),
        },
        create_test_context(),
    )
}

pub fn open_job_order(
    persistence: &mut Persistence,
    reference: &str,
    headcount: u32,
    interview_policy: &str,
) -> i64 {
    create_job_order(
        persistence,
        CreateJobOrderRequest {
            reference: reference.to_string(),
            title: String::from("Care assistant"),
            employer_name: String::from("Gulf Health Group"),
            headcount_required: headcount,
            status: None,
            interview_policy: interview_policy.to_string(),
        },
        create_test_context(),
    )
    .unwrap()
    .id
}

pub fn assign(
    persistence: &mut Persistence,
    candidate_id: i64,
    job_order_id: i64,
) -> Result<i64, ApiError> {
    create_assignment(
        persistence,
        CreateAssignmentRequest {
            candidate_id,
            job_order_id,
            notes: None,
        },
        create_test_context(),
    )
    .map(|assignment| assignment.id)
}

pub fn agree(
    persistence: &mut Persistence,
    candidate_id: i64,
    assignment_id: i64,
    total: i64,
    downpayment: i64,
) -> Result<i64, ApiError> {
    create_agreement(
        persistence,
        CreateAgreementRequest {
            candidate_id,
            assignment_id,
            total_commission_amount: Amount::from_units(total),
            required_downpayment_amount: Amount::from_units(downpayment),
            currency: None,
            notes: None,
        },
        create_test_context(),
    )
    .map(|agreement| agreement.id)
}

pub fn pay(
    persistence: &mut Persistence,
    transaction_type: TransactionType,
    agreement_id: i64,
    amount: i64,
) -> Result<PaymentTransactionResponse, ApiError> {
    pay_exact(
        persistence,
        transaction_type,
        agreement_id,
        Amount::from_units(amount),
    )
}

pub fn pay_exact(
    persistence: &mut Persistence,
    transaction_type: TransactionType,
    agreement_id: i64,
    amount: Amount,
) -> Result<PaymentTransactionResponse, ApiError> {
    record_payment(
        persistence,
        transaction_type,
        PaymentRequest {
            agreement_id,
            amount,
            payment_method: Some(String::from("M-PESA")),
            reference: Some(format!("MP{}", amount.minor_units())),
            description: None,
        },
        create_test_context(),
    )
}

/// Ids of a candidate placed on a job order with a 200,000 / 50,000 agreement.
#[derive(Debug, Clone, Copy)]
pub struct PipelineFixture {
    pub candidate_id: i64,
    pub job_order_id: i64,
    pub assignment_id: i64,
    pub agreement_id: i64,
}

/// Builds a candidate at `MEDICAL_PASSED` with an unpaid agreement.
pub fn create_medical_passed_candidate(persistence: &mut Persistence) -> PipelineFixture {
    let candidate_id: i64 = register(persistence, "RC-0001");
    upload_required_documents(persistence, candidate_id);
    let job_order_id: i64 = open_job_order(persistence, "JO-2026-01", 3, "NOT_REQUIRED");
    let assignment_id: i64 = assign(persistence, candidate_id, job_order_id).unwrap();
    let agreement_id: i64 =
        agree(persistence, candidate_id, assignment_id, 200_000, 50_000).unwrap();

    transition(persistence, candidate_id, "UNDER_REVIEW").unwrap();
    review_documents(
        persistence,
        &WorkflowSettings::default(),
        candidate_id,
        create_test_context(),
    )
    .unwrap();
    transition(persistence, candidate_id, "MEDICAL_PENDING").unwrap();
    record_medical_result(
        persistence,
        &WorkflowSettings::default(),
        candidate_id,
        &MedicalResultRequest {
            result: String::from("PASSED"),
        },
        create_test_context(),
    )
    .unwrap();
    transition(persistence, candidate_id, "MEDICAL_PASSED").unwrap();

    PipelineFixture {
        candidate_id,
        job_order_id,
        assignment_id,
        agreement_id,
    }
}
