// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;
use time::macros::{date, datetime};

use crate::{AgreementContext, AssignmentContext, CandidateContext, LedgerContext};
use roms_audit::{Actor, Cause};
use roms_domain::{
    AgreementStatus, Amount, Assignment, AssignmentStatus, Candidate, CandidateDocument,
    CandidateStatus, CommissionAgreement, DocumentType, EntryDirection, InterviewPolicy, JobOrder,
    JobOrderStatus, LedgerEntry, MedicalStatus, TransactionType,
};

pub const NOW: OffsetDateTime = datetime!(2026-03-01 09:00 UTC);

pub const CANDIDATE_ID: i64 = 1;
pub const JOB_ORDER_ID: i64 = 3;
pub const ASSIGNMENT_ID: i64 = 5;
pub const AGREEMENT_ID: i64 = 10;

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("officer-7"), String::from("operator"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Operator request"))
}

pub fn create_test_candidate(status: CandidateStatus) -> Candidate {
    Candidate {
        id: CANDIDATE_ID,
        reference_number: String::from("CAND-0001"),
        full_name: String::from("Amina Wanjiru"),
        status,
        medical_status: MedicalStatus::Pending,
        interview_date: None,
        version: 4,
        created_at: NOW,
        updated_at: NOW,
    }
}

pub fn create_test_document(
    id: i64,
    document_type: DocumentType,
    verified: bool,
) -> CandidateDocument {
    CandidateDocument {
        id,
        candidate_id: CANDIDATE_ID,
        document_type,
        verified,
        expiry_date: (document_type == DocumentType::Passport).then_some(date!(2030 - 01 - 01)),
        file_reference: None,
        uploaded_at: NOW,
    }
}

/// A verified passport, CV and certificate; satisfies the default policy.
pub fn create_complete_documents() -> Vec<CandidateDocument> {
    vec![
        create_test_document(1, DocumentType::Passport, true),
        create_test_document(2, DocumentType::Cv, true),
        create_test_document(3, DocumentType::EducationalCertificate, true),
    ]
}

pub fn create_test_job_order(interview_policy: InterviewPolicy) -> JobOrder {
    JobOrder {
        id: JOB_ORDER_ID,
        reference: String::from("JO-2026-001"),
        title: String::from("Care Assistant"),
        employer_name: String::from("Gulf Care LLC"),
        headcount_required: 2,
        headcount_filled: 1,
        status: JobOrderStatus::Open,
        interview_policy,
    }
}

pub fn create_test_assignment() -> Assignment {
    Assignment {
        id: ASSIGNMENT_ID,
        candidate_id: CANDIDATE_ID,
        job_order_id: JOB_ORDER_ID,
        status: AssignmentStatus::Assigned,
        is_active: true,
        assigned_at: NOW,
        offer_issued_at: None,
        placement_confirmed_at: None,
        cancelled_at: None,
        notes: None,
    }
}

pub fn create_test_agreement(total: i64, downpayment: i64) -> CommissionAgreement {
    CommissionAgreement {
        id: AGREEMENT_ID,
        candidate_id: CANDIDATE_ID,
        assignment_id: ASSIGNMENT_ID,
        total_commission: Amount::from_units(total),
        required_downpayment: Amount::from_units(downpayment),
        currency: String::from("KES"),
        signed: true,
        signed_at: Some(NOW),
        document_url: None,
        status: AgreementStatus::Active,
        notes: None,
        created_at: NOW,
    }
}

pub fn create_test_payment(id: i64, amount: i64, transaction_type: TransactionType) -> LedgerEntry {
    LedgerEntry {
        id,
        agreement_id: AGREEMENT_ID,
        amount: Amount::from_units(amount),
        direction: EntryDirection::Debit,
        transaction_type,
        payment_method: Some(String::from("M-PESA")),
        reference: Some(format!("RCPT-{id}")),
        description: None,
        reverses_entry_id: None,
        reason: None,
        recorded_at: NOW + time::Duration::minutes(id),
    }
}

pub fn create_test_reversal(id: i64, original: &LedgerEntry) -> LedgerEntry {
    LedgerEntry {
        id,
        agreement_id: original.agreement_id,
        amount: original.amount,
        direction: EntryDirection::Credit,
        transaction_type: TransactionType::Reversal,
        payment_method: None,
        reference: None,
        description: None,
        reverses_entry_id: Some(original.id),
        reason: Some(String::from("bounced")),
        recorded_at: original.recorded_at + time::Duration::hours(1),
    }
}

/// A candidate at `status` with complete documents and no assignment.
pub fn create_candidate_context(status: CandidateStatus) -> CandidateContext {
    CandidateContext::new(create_test_candidate(status), create_complete_documents())
}

/// A candidate at `status`, medically cleared, holding the test assignment
/// with a 200,000 / 50,000 agreement and the given ledger.
pub fn create_commission_context(
    status: CandidateStatus,
    ledger: Vec<LedgerEntry>,
) -> CandidateContext {
    let mut candidate: Candidate = create_test_candidate(status);
    candidate.medical_status = MedicalStatus::Passed;
    CandidateContext {
        candidate,
        documents: create_complete_documents(),
        active_assignment: Some(create_test_assignment()),
        job_order: Some(create_test_job_order(InterviewPolicy::Required)),
        agreement: Some(create_test_agreement(200_000, 50_000)),
        ledger,
    }
}

pub fn create_assignment_context(target: Option<Assignment>) -> AssignmentContext {
    AssignmentContext {
        candidate: create_test_candidate(CandidateStatus::DocumentsApproved),
        job_order: create_test_job_order(InterviewPolicy::NotRequired),
        active_assignment: target.clone().filter(|assignment| assignment.is_active),
        target,
        active_on_job_order: 1,
        agreement: None,
        ledger: Vec::new(),
    }
}

pub fn create_agreement_context(agreements: Vec<CommissionAgreement>) -> AgreementContext {
    AgreementContext {
        assignment: create_test_assignment(),
        agreements,
    }
}

pub fn create_ledger_context(entries: Vec<LedgerEntry>) -> LedgerContext {
    LedgerContext {
        agreement: create_test_agreement(200_000, 50_000),
        entries,
    }
}
