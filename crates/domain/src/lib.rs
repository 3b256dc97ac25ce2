// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod assignment;
mod candidate;
mod commission;
mod documents;
mod error;
mod ledger;
mod money;
mod workflow;

#[cfg(test)]
mod tests;

pub use assignment::{
    Assignment, AssignmentStatus, InterviewPolicy, JobOrder, JobOrderStatus, NewAssignment,
    NewJobOrder,
};
pub use candidate::{Candidate, CandidateStatus, MedicalStatus, NewCandidate};
pub use commission::{
    AgreementStatus, CommissionAgreement, DEFAULT_CURRENCY, NewAgreement,
    validate_agreement_terms,
};
pub use documents::{
    CandidateDocument, DeficiencyReason, DocumentDeficiency, DocumentEvaluation, DocumentPolicy,
    DocumentType, ExpiryFlag, NewCandidateDocument, add_months, evaluate_documents, expiry_flag,
    missing_required_types,
};
pub use error::DomainError;
pub use ledger::{
    EntryDirection, LedgerEntry, NewLedgerEntry, PaymentGate, PaymentGateFailure, Statement,
    TransactionType, compute_statement, find_reversal,
};
pub use money::Amount;
pub use workflow::{
    WorkflowFacts, allowed_transitions, blocked_transitions, can_transition, validate_transition,
};
