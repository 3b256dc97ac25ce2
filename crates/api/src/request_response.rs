// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Field names are camelCase on the wire. Timestamps are RFC 3339 strings,
//! dates are `YYYY-MM-DD`, and amounts are decimal numbers with at most two
//! decimal places.

use roms::WorkflowView;
use roms_domain::{
    AgreementStatus, Amount, Assignment, AssignmentStatus, Candidate, CandidateDocument,
    CandidateStatus, CommissionAgreement, DeficiencyReason, DocumentEvaluation, DocumentType,
    EntryDirection, ExpiryFlag, InterviewPolicy, JobOrder, JobOrderStatus, LedgerEntry,
    MedicalStatus, Statement, TransactionType,
};
use roms_persistence::AuditRecord;
use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::error::ApiError;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

fn timestamp(value: OffsetDateTime) -> Result<String, ApiError> {
    value.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}

fn optional_timestamp(value: Option<OffsetDateTime>) -> Result<Option<String>, ApiError> {
    value.map(timestamp).transpose()
}

fn date(value: Date) -> Result<String, ApiError> {
    value.format(DATE_FORMAT).map_err(|e| ApiError::Internal {
        message: format!("Failed to format date: {e}"),
    })
}

/// Parses a `YYYY-MM-DD` date supplied in a request.
///
/// # Errors
///
/// Returns a validation error naming `field` if the value is not a date.
pub fn parse_request_date(field: &str, value: &str) -> Result<Date, ApiError> {
    Date::parse(value.trim(), DATE_FORMAT).map_err(|e| {
        ApiError::validation(field, format!("'{value}' is not a YYYY-MM-DD date: {e}"))
    })
}

// ============================================================================
// Candidates
// ============================================================================

/// API request to register a new candidate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCandidateRequest {
    /// Agency reference number, unique across candidates.
    pub reference_number: String,
    /// The candidate's full name.
    pub full_name: String,
    /// Open job order to assign the new candidate to.
    #[serde(default)]
    pub job_order_id: Option<i64>,
}

/// API request to move a candidate to a new status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    /// The requested status (e.g. `VISA_PROCESSING`).
    pub status: String,
}

/// API request to record a medical examination result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalResultRequest {
    /// `PASSED`, `FAILED` or `WAIVED`.
    pub result: String,
}

/// API request to set or move a candidate's employer interview.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInterviewRequest {
    /// `YYYY-MM-DD`.
    pub interview_date: String,
}

/// A candidate as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResponse {
    pub id: i64,
    pub reference_number: String,
    pub full_name: String,
    pub current_status: CandidateStatus,
    pub medical_status: MedicalStatus,
    pub interview_date: Option<String>,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl CandidateResponse {
    pub(crate) fn from_domain(candidate: &Candidate) -> Result<Self, ApiError> {
        Ok(Self {
            id: candidate.id,
            reference_number: candidate.reference_number.clone(),
            full_name: candidate.full_name.clone(),
            current_status: candidate.status,
            medical_status: candidate.medical_status,
            interview_date: candidate.interview_date.map(date).transpose()?,
            version: candidate.version,
            created_at: timestamp(candidate.created_at)?,
            updated_at: timestamp(candidate.updated_at)?,
        })
    }
}

/// A required document type that is not satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeficiencyInfo {
    pub document_type: DocumentType,
    pub reason: DeficiencyReason,
}

/// The outcome of a document review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDocumentsResponse {
    /// The candidate after the review.
    pub candidate: CandidateResponse,
    /// The status the evaluation selected.
    pub next_status: CandidateStatus,
    /// Required types with no document on file.
    pub missing_types: Vec<DocumentType>,
    /// Every unsatisfied required type with its reason.
    pub deficiencies: Vec<DeficiencyInfo>,
}

impl ReviewDocumentsResponse {
    pub(crate) fn new(candidate: CandidateResponse, evaluation: DocumentEvaluation) -> Self {
        Self {
            candidate,
            next_status: evaluation.next_status,
            missing_types: evaluation.missing_types,
            deficiencies: evaluation
                .deficiencies
                .into_iter()
                .map(|deficiency| DeficiencyInfo {
                    document_type: deficiency.document_type,
                    reason: deficiency.reason,
                })
                .collect(),
        }
    }
}

// ============================================================================
// Documents
// ============================================================================

/// API request to attach a document to a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDocumentRequest {
    pub document_type: String,
    #[serde(default)]
    pub verified: bool,
    /// `YYYY-MM-DD`.
    pub expiry_date: Option<String>,
    pub file_reference: Option<String>,
}

/// A candidate document as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: i64,
    pub candidate_id: i64,
    pub document_type: DocumentType,
    pub display_name: &'static str,
    pub verified: bool,
    pub expiry_date: Option<String>,
    pub file_reference: Option<String>,
    pub uploaded_at: String,
}

impl DocumentResponse {
    pub(crate) fn from_domain(document: &CandidateDocument) -> Result<Self, ApiError> {
        Ok(Self {
            id: document.id,
            candidate_id: document.candidate_id,
            document_type: document.document_type,
            display_name: document.document_type.display_name(),
            verified: document.verified,
            expiry_date: document.expiry_date.map(date).transpose()?,
            file_reference: document.file_reference.clone(),
            uploaded_at: timestamp(document.uploaded_at)?,
        })
    }
}

// ============================================================================
// Workflow view and audit
// ============================================================================

/// Where a candidate stands in the workflow and what blocks them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowViewResponse {
    pub candidate_id: i64,
    pub current_status: CandidateStatus,
    pub medical_status: MedicalStatus,
    pub stage_title: &'static str,
    pub stage_description: &'static str,
    pub allowed_transitions: Vec<CandidateStatus>,
    pub blocked: bool,
    pub blocked_reason: Option<String>,
    pub missing_types: Vec<DocumentType>,
    pub expiry_flag: ExpiryFlag,
    /// Payment summary of the current agreement, without history.
    pub payment_summary: Option<PaymentSummary>,
}

impl WorkflowViewResponse {
    pub(crate) fn from_view(view: WorkflowView) -> Self {
        Self {
            candidate_id: view.candidate_id,
            current_status: view.status,
            medical_status: view.medical_status,
            stage_title: view.stage_title,
            stage_description: view.stage_description,
            allowed_transitions: view.allowed_transitions,
            blocked: view.blocked,
            blocked_reason: view.blocked_reason,
            missing_types: view.missing_types,
            expiry_flag: view.expiry_flag,
            payment_summary: view.statement.as_ref().map(PaymentSummary::from_statement),
        }
    }
}

/// Commission totals for a workflow view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub agreement_id: i64,
    pub currency: String,
    pub total_commission_amount: Amount,
    pub required_downpayment_amount: Amount,
    pub total_paid: Amount,
    pub outstanding_balance: Amount,
    pub downpayment_complete: bool,
    pub full_payment_complete: bool,
}

impl PaymentSummary {
    fn from_statement(statement: &Statement) -> Self {
        Self {
            agreement_id: statement.agreement_id,
            currency: statement.currency.clone(),
            total_commission_amount: statement.total_commission,
            required_downpayment_amount: statement.required_downpayment,
            total_paid: statement.total_paid,
            outstanding_balance: statement.outstanding_balance,
            downpayment_complete: statement.downpayment_complete,
            full_payment_complete: statement.full_payment_complete,
        }
    }
}

/// One entry of a candidate's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEventResponse {
    pub event_id: i64,
    pub recorded_at: String,
    pub actor_id: String,
    pub actor_type: String,
    pub cause_id: String,
    pub cause_description: String,
    pub action: String,
    pub details: Option<String>,
    pub before: String,
    pub after: String,
    pub assignment_id: Option<i64>,
    pub agreement_id: Option<i64>,
}

impl AuditEventResponse {
    pub(crate) fn from_record(record: AuditRecord) -> Result<Self, ApiError> {
        let event = record.event;
        Ok(Self {
            event_id: record.event_id,
            recorded_at: timestamp(record.recorded_at)?,
            actor_id: event.actor.id,
            actor_type: event.actor.actor_type,
            cause_id: event.cause.id,
            cause_description: event.cause.description,
            action: event.action.name,
            details: event.action.details,
            before: event.before.data,
            after: event.after.data,
            assignment_id: event.scope.assignment_id,
            agreement_id: event.scope.agreement_id,
        })
    }
}

// ============================================================================
// Job orders and assignments
// ============================================================================

/// API request to create a job order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobOrderRequest {
    pub reference: String,
    pub title: String,
    pub employer_name: String,
    pub headcount_required: u32,
    /// Defaults to `OPEN`.
    pub status: Option<String>,
    /// `REQUIRED` or `NOT_REQUIRED`. There is no default.
    pub interview_policy: String,
}

/// A job order as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOrderResponse {
    pub id: i64,
    pub reference: String,
    pub title: String,
    pub employer_name: String,
    pub headcount_required: u32,
    pub headcount_filled: u32,
    pub status: JobOrderStatus,
    pub interview_policy: InterviewPolicy,
}

impl From<&JobOrder> for JobOrderResponse {
    fn from(job_order: &JobOrder) -> Self {
        Self {
            id: job_order.id,
            reference: job_order.reference.clone(),
            title: job_order.title.clone(),
            employer_name: job_order.employer_name.clone(),
            headcount_required: job_order.headcount_required,
            headcount_filled: job_order.headcount_filled,
            status: job_order.status,
            interview_policy: job_order.interview_policy,
        }
    }
}

/// API request to assign a candidate to a job order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub candidate_id: i64,
    pub job_order_id: i64,
    pub notes: Option<String>,
}

/// API request to cancel an assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelAssignmentRequest {
    pub reason: Option<String>,
}

/// An assignment as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub id: i64,
    pub candidate_id: i64,
    pub job_order_id: i64,
    pub status: AssignmentStatus,
    pub is_active: bool,
    pub assigned_at: String,
    pub offer_issued_at: Option<String>,
    pub placement_confirmed_at: Option<String>,
    pub cancelled_at: Option<String>,
    pub notes: Option<String>,
}

impl AssignmentResponse {
    pub(crate) fn from_domain(assignment: &Assignment) -> Result<Self, ApiError> {
        Ok(Self {
            id: assignment.id,
            candidate_id: assignment.candidate_id,
            job_order_id: assignment.job_order_id,
            status: assignment.status,
            is_active: assignment.is_active,
            assigned_at: timestamp(assignment.assigned_at)?,
            offer_issued_at: optional_timestamp(assignment.offer_issued_at)?,
            placement_confirmed_at: optional_timestamp(assignment.placement_confirmed_at)?,
            cancelled_at: optional_timestamp(assignment.cancelled_at)?,
            notes: assignment.notes.clone(),
        })
    }
}

// ============================================================================
// Commission agreements
// ============================================================================

/// API request to create a commission agreement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgreementRequest {
    pub candidate_id: i64,
    pub assignment_id: i64,
    pub total_commission_amount: Amount,
    pub required_downpayment_amount: Amount,
    /// Defaults to KES.
    pub currency: Option<String>,
    pub notes: Option<String>,
}

/// API request to sign a commission agreement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignAgreementRequest {
    pub document_url: Option<String>,
}

/// API request to cancel a commission agreement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelAgreementRequest {
    pub reason: String,
}

/// A commission agreement as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementResponse {
    pub id: i64,
    pub candidate_id: i64,
    pub assignment_id: i64,
    pub total_commission_amount: Amount,
    pub required_downpayment_amount: Amount,
    pub currency: String,
    pub signed: bool,
    pub signed_at: Option<String>,
    pub document_url: Option<String>,
    pub status: AgreementStatus,
    pub notes: Option<String>,
    pub created_at: String,
}

impl AgreementResponse {
    pub(crate) fn from_domain(agreement: &CommissionAgreement) -> Result<Self, ApiError> {
        Ok(Self {
            id: agreement.id,
            candidate_id: agreement.candidate_id,
            assignment_id: agreement.assignment_id,
            total_commission_amount: agreement.total_commission,
            required_downpayment_amount: agreement.required_downpayment,
            currency: agreement.currency.clone(),
            signed: agreement.signed,
            signed_at: optional_timestamp(agreement.signed_at)?,
            document_url: agreement.document_url.clone(),
            status: agreement.status,
            notes: agreement.notes.clone(),
            created_at: timestamp(agreement.created_at)?,
        })
    }
}

// ============================================================================
// Payments
// ============================================================================

/// API request to record a downpayment, installment or balance payment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub agreement_id: i64,
    pub amount: Amount,
    pub payment_method: Option<String>,
    /// External receipt reference, such as an M-PESA code.
    #[serde(alias = "mpesaRef")]
    pub reference: Option<String>,
    pub description: Option<String>,
}

/// API request to reverse a payment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReversePaymentRequest {
    pub reason: String,
}

/// A payment transaction as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTransactionResponse {
    pub id: i64,
    pub agreement_id: i64,
    pub amount: Amount,
    pub direction: EntryDirection,
    pub transaction_type: TransactionType,
    pub payment_method: Option<String>,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub reverses_transaction_id: Option<i64>,
    pub reason: Option<String>,
    pub recorded_at: String,
}

impl PaymentTransactionResponse {
    pub(crate) fn from_domain(entry: &LedgerEntry) -> Result<Self, ApiError> {
        Ok(Self {
            id: entry.id,
            agreement_id: entry.agreement_id,
            amount: entry.amount,
            direction: entry.direction,
            transaction_type: entry.transaction_type,
            payment_method: entry.payment_method.clone(),
            reference: entry.reference.clone(),
            description: entry.description.clone(),
            reverses_transaction_id: entry.reverses_entry_id,
            reason: entry.reason.clone(),
            recorded_at: timestamp(entry.recorded_at)?,
        })
    }
}

/// The commission statement of one agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementResponse {
    pub candidate_id: i64,
    pub candidate_name: String,
    pub agreement_id: i64,
    pub assignment_id: i64,
    pub currency: String,
    pub total_commission_amount: Amount,
    pub required_downpayment_amount: Amount,
    pub total_paid: Amount,
    pub downpayment_paid: Amount,
    pub outstanding_balance: Amount,
    pub downpayment_complete: bool,
    pub full_payment_complete: bool,
    pub payment_history: Vec<PaymentTransactionResponse>,
}

impl StatementResponse {
    pub(crate) fn new(candidate: &Candidate, statement: &Statement) -> Result<Self, ApiError> {
        let payment_history: Vec<PaymentTransactionResponse> = statement
            .history
            .iter()
            .map(PaymentTransactionResponse::from_domain)
            .collect::<Result<_, _>>()?;
        Ok(Self {
            candidate_id: candidate.id,
            candidate_name: candidate.full_name.clone(),
            agreement_id: statement.agreement_id,
            assignment_id: statement.assignment_id,
            currency: statement.currency.clone(),
            total_commission_amount: statement.total_commission,
            required_downpayment_amount: statement.required_downpayment,
            total_paid: statement.total_paid,
            downpayment_paid: statement.downpayment_paid,
            outstanding_balance: statement.outstanding_balance,
            downpayment_complete: statement.downpayment_complete,
            full_payment_complete: statement.full_payment_complete,
            payment_history,
        })
    }
}
