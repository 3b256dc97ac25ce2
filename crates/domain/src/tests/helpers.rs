// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::macros::{date, datetime};
use time::{Date, OffsetDateTime};

use crate::{
    AgreementStatus, Amount, Candidate, CandidateDocument, CandidateStatus, CommissionAgreement,
    DocumentType, EntryDirection, LedgerEntry, MedicalStatus, TransactionType,
};

pub const AS_OF: Date = date!(2026 - 03 - 01);
pub const NOW: OffsetDateTime = datetime!(2026-03-01 09:00 UTC);

pub fn create_test_candidate(status: CandidateStatus) -> Candidate {
    Candidate {
        id: 1,
        reference_number: String::from("CAND-0001"),
        full_name: String::from("Amina Wanjiru"),
        status,
        medical_status: MedicalStatus::Pending,
        interview_date: None,
        version: 1,
        created_at: NOW,
        updated_at: NOW,
    }
}

pub fn create_test_document(
    id: i64,
    document_type: DocumentType,
    verified: bool,
    expiry_date: Option<Date>,
) -> CandidateDocument {
    CandidateDocument {
        id,
        candidate_id: 1,
        document_type,
        verified,
        expiry_date,
        file_reference: None,
        uploaded_at: NOW,
    }
}

/// A verified passport, CV and certificate; satisfies the default policy.
pub fn create_complete_documents() -> Vec<CandidateDocument> {
    vec![
        create_test_document(1, DocumentType::Passport, true, Some(date!(2030 - 01 - 01))),
        create_test_document(2, DocumentType::Cv, true, None),
        create_test_document(3, DocumentType::EducationalCertificate, true, None),
    ]
}

pub fn create_test_agreement(total: i64, downpayment: i64) -> CommissionAgreement {
    CommissionAgreement {
        id: 10,
        candidate_id: 1,
        assignment_id: 5,
        total_commission: Amount::from_units(total),
        required_downpayment: Amount::from_units(downpayment),
        currency: String::from("KES"),
        signed: false,
        signed_at: None,
        document_url: None,
        status: AgreementStatus::Active,
        notes: None,
        created_at: NOW,
    }
}

pub fn create_test_payment(
    id: i64,
    amount: i64,
    transaction_type: TransactionType,
    recorded_at: OffsetDateTime,
) -> LedgerEntry {
    LedgerEntry {
        id,
        agreement_id: 10,
        amount: Amount::from_units(amount),
        direction: EntryDirection::Debit,
        transaction_type,
        payment_method: None,
        reference: None,
        description: None,
        reverses_entry_id: None,
        reason: None,
        recorded_at,
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
