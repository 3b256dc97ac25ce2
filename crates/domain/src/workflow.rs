// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The Workflow Guard.
//!
//! Pure decision functions over a candidate and the facts supplied with it.
//! The guard never performs I/O and never picks between two legal targets;
//! the caller always names the target explicitly.
//!
//! Payment gates are not part of the guard. They are checked by the
//! candidate state machine before the guard is consulted.

use crate::assignment::InterviewPolicy;
use crate::candidate::{Candidate, CandidateStatus};
use crate::documents::{
    CandidateDocument, DocumentEvaluation, DocumentPolicy, DocumentType, evaluate_documents,
    missing_required_types,
};
use crate::error::DomainError;
use time::Date;

/// Supporting facts the guard evaluates a transition against.
#[derive(Debug, Clone, Copy)]
pub struct WorkflowFacts<'a> {
    /// Every document on file for the candidate.
    pub documents: &'a [CandidateDocument],
    /// Required document set and passport validity window.
    pub policy: &'a DocumentPolicy,
    /// Interview policy of the active assignment's job order.
    ///
    /// `None` when the candidate has no active assignment; neither branch
    /// out of `DocumentsApproved` is then available.
    pub interview_policy: Option<InterviewPolicy>,
    /// Date used for expiry checks.
    pub as_of: Date,
}

/// Structural edges of the pipeline, before target-specific guards.
const fn successors(status: CandidateStatus) -> &'static [CandidateStatus] {
    use CandidateStatus::{
        ApplicationSubmitted, DeploymentPending, DocumentsApproved, DocumentsInsufficient,
        InterviewPassed, InterviewScheduled, MedicalPassed, MedicalPending, OfferAccepted,
        OfferIssued, Placed, Rejected, UnderReview, VisaProcessing, Withdrawn,
    };

    match status {
        ApplicationSubmitted => &[UnderReview, Rejected, Withdrawn],
        UnderReview => &[DocumentsInsufficient, DocumentsApproved, Rejected, Withdrawn],
        DocumentsInsufficient => &[UnderReview, DocumentsApproved, Rejected, Withdrawn],
        DocumentsApproved => &[InterviewScheduled, MedicalPending, Rejected, Withdrawn],
        InterviewScheduled => &[InterviewPassed, Rejected, Withdrawn],
        InterviewPassed => &[MedicalPending, Rejected, Withdrawn],
        MedicalPending => &[MedicalPassed, Rejected, Withdrawn],
        MedicalPassed => &[VisaProcessing, Rejected, Withdrawn],
        VisaProcessing => &[OfferIssued, Rejected, Withdrawn],
        OfferIssued => &[OfferAccepted, Rejected, Withdrawn],
        OfferAccepted => &[DeploymentPending, Rejected, Withdrawn],
        DeploymentPending => &[Placed, Rejected, Withdrawn],
        Placed | Rejected | Withdrawn => &[],
    }
}

fn format_types(types: &[DocumentType]) -> String {
    types
        .iter()
        .map(DocumentType::display_name)
        .collect::<Vec<&str>>()
        .join(", ")
}

/// Checks the target-specific guard for an edge that exists structurally.
///
/// Returns the reason the guard fails, or `None` if it passes.
fn guard_failure(
    candidate: &Candidate,
    target: CandidateStatus,
    facts: &WorkflowFacts<'_>,
) -> Result<Option<String>, DomainError> {
    let from: CandidateStatus = candidate.status;
    let reason: Option<String> = match target {
        CandidateStatus::UnderReview => {
            let missing: Vec<DocumentType> = missing_required_types(facts.documents, facts.policy);
            (!missing.is_empty())
                .then(|| format!("required documents missing: {}", format_types(&missing)))
        }
        CandidateStatus::DocumentsApproved => {
            let evaluation: DocumentEvaluation =
                evaluate_documents(facts.documents, facts.policy, facts.as_of)?;
            (!evaluation.is_approved()).then(|| {
                format!(
                    "documents not approved: {}",
                    format_types(&evaluation.missing_types)
                )
            })
        }
        CandidateStatus::InterviewScheduled => match facts.interview_policy {
            Some(InterviewPolicy::Required) => candidate
                .interview_date
                .is_none()
                .then(|| String::from("interview date is required")),
            Some(InterviewPolicy::NotRequired) => {
                Some(String::from("job order does not require an interview"))
            }
            None => Some(String::from(
                "interview policy unknown: candidate has no active assignment",
            )),
        },
        CandidateStatus::MedicalPending if from == CandidateStatus::DocumentsApproved => {
            match facts.interview_policy {
                Some(InterviewPolicy::NotRequired) => None,
                Some(InterviewPolicy::Required) => Some(String::from(
                    "job order requires an interview before medical",
                )),
                None => Some(String::from(
                    "interview policy unknown: candidate has no active assignment",
                )),
            }
        }
        CandidateStatus::MedicalPassed
        | CandidateStatus::VisaProcessing
        | CandidateStatus::OfferIssued => (!candidate.medical_status.is_cleared())
            .then(|| format!("medical status is {}", candidate.medical_status)),
        CandidateStatus::ApplicationSubmitted
        | CandidateStatus::DocumentsInsufficient
        | CandidateStatus::InterviewPassed
        | CandidateStatus::MedicalPending
        | CandidateStatus::OfferAccepted
        | CandidateStatus::DeploymentPending
        | CandidateStatus::Placed
        | CandidateStatus::Rejected
        | CandidateStatus::Withdrawn => None,
    };
    Ok(reason)
}

/// Validates a proposed transition.
///
/// # Errors
///
/// Returns `DomainError::IllegalTransition` with the specific reason if the
/// target is not a successor of the current status or its guard fails.
pub fn validate_transition(
    candidate: &Candidate,
    target: CandidateStatus,
    facts: &WorkflowFacts<'_>,
) -> Result<(), DomainError> {
    let from: CandidateStatus = candidate.status;
    let illegal = |reason: String| DomainError::IllegalTransition {
        from,
        to: target,
        reason,
    };

    if from.is_terminal() {
        return Err(illegal(String::from("candidate is in a terminal state")));
    }
    if !successors(from).contains(&target) {
        return Err(illegal(String::from(
            "transition not defined by the placement pipeline",
        )));
    }
    match guard_failure(candidate, target, facts)? {
        Some(reason) => Err(illegal(reason)),
        None => Ok(()),
    }
}

/// Returns true iff `target` is a legal next status for the candidate.
///
/// Equivalent to `validate_transition(..).is_ok()`.
#[must_use]
pub fn can_transition(
    candidate: &Candidate,
    target: CandidateStatus,
    facts: &WorkflowFacts<'_>,
) -> bool {
    validate_transition(candidate, target, facts).is_ok()
}

/// Returns every legal next status, in pipeline order.
///
/// When several targets are legal the caller must choose one explicitly.
#[must_use]
pub fn allowed_transitions(
    candidate: &Candidate,
    facts: &WorkflowFacts<'_>,
) -> Vec<CandidateStatus> {
    successors(candidate.status)
        .iter()
        .copied()
        .filter(|target| can_transition(candidate, *target, facts))
        .collect()
}

/// Returns the forward successors whose guards currently fail, with the
/// reason for each, in pipeline order.
///
/// REJECTED and WITHDRAWN are never blocked and are not reported.
///
/// # Errors
///
/// Returns an error if document evaluation fails.
pub fn blocked_transitions(
    candidate: &Candidate,
    facts: &WorkflowFacts<'_>,
) -> Result<Vec<(CandidateStatus, String)>, DomainError> {
    let mut blocked: Vec<(CandidateStatus, String)> = Vec::new();
    for target in successors(candidate.status) {
        if matches!(target, CandidateStatus::Rejected | CandidateStatus::Withdrawn) {
            continue;
        }
        if let Some(reason) = guard_failure(candidate, *target, facts)? {
            blocked.push((*target, reason));
        }
    }
    Ok(blocked)
}
