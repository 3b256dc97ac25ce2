// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transport-agnostic operations of the recruitment workflow.
//!
//! Each operation loads the facts it needs, lets the core decide, and
//! persists the outcome in one transaction. Errors are translated into the
//! [`ApiError`] taxonomy so callers can render a specific message.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

use roms_audit::{Actor, Cause};
use roms_domain::DocumentPolicy;
use time::OffsetDateTime;

pub use error::{ApiError, translate_core_error, translate_domain_error};
pub use handlers::{
    add_document, allowed_transitions, cancel_agreement, cancel_assignment,
    candidate_audit_trail, candidate_statement, confirm_placement, create_agreement,
    create_assignment, create_job_order, downpayment_status, full_payment_status, get_agreement,
    get_assignment, get_candidate, get_job_order, issue_offer, record_medical_result,
    record_payment, register_candidate, reverse_payment, review_documents, schedule_interview,
    sign_agreement, transition_candidate, verify_document, workflow_view,
};
pub use request_response::{
    AddDocumentRequest, AgreementResponse, AssignmentResponse, AuditEventResponse,
    CancelAgreementRequest, CancelAssignmentRequest, CandidateResponse, CreateAgreementRequest,
    CreateAssignmentRequest, CreateJobOrderRequest, DeficiencyInfo, DocumentResponse,
    JobOrderResponse, MedicalResultRequest, PaymentRequest, PaymentSummary,
    PaymentTransactionResponse, RegisterCandidateRequest, ReversePaymentRequest,
    ReviewDocumentsResponse, ScheduleInterviewRequest, SignAgreementRequest, StatementResponse,
    TransitionRequest, WorkflowViewResponse, parse_request_date,
};

/// Default window, in days, before a document expiry is flagged.
pub const DEFAULT_EXPIRY_WARNING_DAYS: u32 = 90;

/// Operator-configurable workflow settings.
///
/// Payment gates are not configurable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSettings {
    /// Required document types and passport validity window.
    pub document_policy: DocumentPolicy,
    /// Days before expiry at which documents are flagged `EXPIRING_SOON`.
    pub expiry_warning_days: u32,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            document_policy: DocumentPolicy::default(),
            expiry_warning_days: DEFAULT_EXPIRY_WARNING_DAYS,
        }
    }
}

/// Who is making a request, why, and at what instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// The actor recorded on the audit event.
    pub actor: Actor,
    /// The cause recorded on the audit event.
    pub cause: Cause,
    /// The instant the request is evaluated at.
    pub now: OffsetDateTime,
}

impl RequestContext {
    /// Creates a new request context.
    #[must_use]
    pub const fn new(actor: Actor, cause: Cause, now: OffsetDateTime) -> Self {
        Self { actor, cause, now }
    }
}
