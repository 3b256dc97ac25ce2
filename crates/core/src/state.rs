// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roms_audit::AuditEvent;
use roms_domain::{
    Assignment, Candidate, CandidateDocument, CommissionAgreement, DocumentEvaluation,
    DocumentPolicy, DomainError, InterviewPolicy, JobOrder, LedgerEntry, NewAgreement,
    NewAssignment, NewCandidate, NewCandidateDocument, NewJobOrder, NewLedgerEntry, PaymentGate,
    PaymentGateFailure, Statement, WorkflowFacts, compute_statement,
};
use time::Date;

/// Everything needed to decide a candidate command.
///
/// The context is loaded in one transaction and never mutated; apply
/// functions return the changes to persist instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateContext {
    /// The candidate.
    pub candidate: Candidate,
    /// All documents on file for the candidate.
    pub documents: Vec<CandidateDocument>,
    /// The candidate's active assignment, if any.
    pub active_assignment: Option<Assignment>,
    /// The job order of the active assignment.
    pub job_order: Option<JobOrder>,
    /// The current (ACTIVE or COMPLETED) agreement of the active assignment.
    pub agreement: Option<CommissionAgreement>,
    /// Ledger entries of that agreement.
    pub ledger: Vec<LedgerEntry>,
}

impl CandidateContext {
    /// A context for a candidate with no assignment history.
    #[must_use]
    pub const fn new(candidate: Candidate, documents: Vec<CandidateDocument>) -> Self {
        Self {
            candidate,
            documents,
            active_assignment: None,
            job_order: None,
            agreement: None,
            ledger: Vec::new(),
        }
    }

    /// The interview policy that applies right now.
    ///
    /// Unknown when the candidate has no active assignment.
    #[must_use]
    pub fn interview_policy(&self) -> Option<InterviewPolicy> {
        self.active_assignment
            .as_ref()
            .and(self.job_order.as_ref())
            .map(|job_order| job_order.interview_policy)
    }

    /// The guard facts for this candidate.
    #[must_use]
    pub fn facts<'a>(&'a self, policy: &'a DocumentPolicy, as_of: Date) -> WorkflowFacts<'a> {
        WorkflowFacts {
            documents: &self.documents,
            policy,
            interview_policy: self.interview_policy(),
            as_of,
        }
    }

    /// The statement of the current agreement, if there is one.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be reconciled.
    pub fn statement(&self) -> Result<Option<Statement>, DomainError> {
        self.agreement
            .as_ref()
            .map(|agreement| compute_statement(agreement, &self.ledger))
            .transpose()
    }

    /// Checks a payment gate against this candidate's commission state.
    ///
    /// Returns the unmet condition, or `None` when the gate is open.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger is inconsistent.
    pub fn gate_failure(
        &self,
        gate: PaymentGate,
    ) -> Result<Option<PaymentGateFailure>, DomainError> {
        if self.active_assignment.is_none() {
            return Ok(Some(PaymentGateFailure::NoActiveAssignment));
        }
        let statement: Option<Statement> = self.statement()?;
        Ok(gate.check(statement.as_ref()).err())
    }
}

/// Everything needed to decide an assignment command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentContext {
    /// The candidate.
    pub candidate: Candidate,
    /// The job order.
    pub job_order: JobOrder,
    /// The candidate's active assignment, if any.
    pub active_assignment: Option<Assignment>,
    /// The assignment a command targets, if it names one.
    pub target: Option<Assignment>,
    /// Number of active assignments currently on the job order.
    pub active_on_job_order: u32,
    /// The current agreement of the target assignment.
    pub agreement: Option<CommissionAgreement>,
    /// Ledger entries of that agreement.
    pub ledger: Vec<LedgerEntry>,
}

/// Everything needed to decide an agreement command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgreementContext {
    /// The assignment the agreement belongs to.
    pub assignment: Assignment,
    /// Every agreement ever created for the assignment.
    pub agreements: Vec<CommissionAgreement>,
}

/// Everything needed to decide a ledger command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerContext {
    /// The agreement.
    pub agreement: CommissionAgreement,
    /// All entries recorded against it.
    pub entries: Vec<LedgerEntry>,
}

/// A single row-level change produced by applying a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Insert a candidate.
    CandidateCreated(NewCandidate),
    /// Update a candidate, guarded by its version.
    CandidateUpdated {
        /// The new candidate row, with the version already incremented.
        candidate: Candidate,
        /// The version the decision was based on.
        expected_version: i64,
    },
    /// Insert a document.
    DocumentAdded(NewCandidateDocument),
    /// Mark a document verified.
    DocumentVerified {
        /// The document.
        document_id: i64,
    },
    /// Insert a job order.
    JobOrderCreated(NewJobOrder),
    /// Update a job order.
    JobOrderUpdated(JobOrder),
    /// Insert an assignment.
    AssignmentCreated(NewAssignment),
    /// Update an assignment.
    AssignmentUpdated(Assignment),
    /// Insert an agreement.
    AgreementCreated(NewAgreement),
    /// Update an agreement.
    AgreementUpdated(CommissionAgreement),
    /// Append a ledger entry.
    LedgerEntryAppended(NewLedgerEntry),
}

/// The result of applying a command.
///
/// Changes are applied in order and atomically with the audit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The changes to persist, in order.
    pub changes: Vec<Change>,
    /// The audit event describing the mutation.
    pub audit_event: AuditEvent,
    /// The document evaluation, when the command performed one.
    pub evaluation: Option<DocumentEvaluation>,
}

impl TransitionResult {
    pub(crate) const fn new(changes: Vec<Change>, audit_event: AuditEvent) -> Self {
        Self {
            changes,
            audit_event,
            evaluation: None,
        }
    }
}
