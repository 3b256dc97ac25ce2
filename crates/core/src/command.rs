// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roms_domain::{
    Amount, CandidateStatus, DocumentType, EntryDirection, MedicalStatus, NewJobOrder,
    TransactionType,
};
use time::Date;

/// Commands that create new top-level records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationCommand {
    /// Register a new candidate in `APPLICATION_SUBMITTED`.
    RegisterCandidate {
        /// Agency reference number, unique across candidates.
        reference_number: String,
        /// The candidate's full name.
        full_name: String,
    },
    /// Create a job order.
    CreateJobOrder(NewJobOrder),
}

/// Commands against a single candidate.
///
/// Commands are the only way to request state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateCommand {
    /// Move the candidate to a new status through the Workflow Guard.
    Transition {
        /// The requested status.
        target: CandidateStatus,
    },
    /// Evaluate documents and move to `DOCUMENTS_APPROVED` or `DOCUMENTS_INSUFFICIENT`.
    ReviewDocuments,
    /// Record the outcome of the medical examination.
    RecordMedicalResult {
        /// The result.
        result: MedicalStatus,
    },
    /// Attach a document to the candidate.
    AddDocument {
        /// The kind of document.
        document_type: DocumentType,
        /// Whether it has already been checked by an officer.
        verified: bool,
        /// Expiry date, if the document expires.
        expiry_date: Option<Date>,
        /// Location of the uploaded file.
        file_reference: Option<String>,
    },
    /// Mark a document as verified.
    VerifyDocument {
        /// The document.
        document_id: i64,
    },
    /// Record or move the date of the employer interview.
    SetInterviewDate {
        /// The interview date.
        interview_date: Date,
    },
}

/// Commands against an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentCommand {
    /// Assign the candidate to the job order.
    Create {
        /// Free text notes.
        notes: Option<String>,
    },
    /// Cancel an active assignment.
    Cancel {
        /// The assignment.
        assignment_id: i64,
        /// Why it was cancelled.
        reason: Option<String>,
    },
    /// Record that the employer issued an offer.
    IssueOffer {
        /// The assignment.
        assignment_id: i64,
    },
    /// Record that the placement was confirmed.
    ConfirmPlacement {
        /// The assignment.
        assignment_id: i64,
    },
}

/// Commands against commission agreements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgreementCommand {
    /// Create the agreement for an assignment.
    Create {
        /// The candidate the agreement binds.
        candidate_id: i64,
        /// Total commission owed.
        total_commission: Amount,
        /// Portion due before visa processing.
        required_downpayment: Amount,
        /// ISO currency code, defaults to KES.
        currency: Option<String>,
        /// Free text notes.
        notes: Option<String>,
    },
    /// Mark the agreement signed.
    Sign {
        /// The agreement.
        agreement_id: i64,
        /// Location of the signed document.
        document_url: Option<String>,
    },
    /// Cancel an active agreement.
    Cancel {
        /// The agreement.
        agreement_id: i64,
        /// Why it was cancelled.
        reason: String,
    },
}

/// Commands against an agreement's payment ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCommand {
    /// Record a payment received from the candidate.
    RecordPayment {
        /// The payment category.
        transaction_type: TransactionType,
        /// Payments are debits; credits only arise from reversals.
        direction: EntryDirection,
        /// Amount received.
        amount: Amount,
        /// How the payment was made (e.g. "M-PESA").
        payment_method: Option<String>,
        /// External receipt reference.
        reference: Option<String>,
        /// Free text description.
        description: Option<String>,
    },
    /// Reverse an earlier payment with a compensating credit.
    Reverse {
        /// The entry to reverse.
        entry_id: i64,
        /// Why it is being reversed.
        reason: String,
    },
}
