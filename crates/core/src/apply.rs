// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{CandidateCommand, RegistrationCommand};
use crate::error::CoreError;
use crate::state::{CandidateContext, Change, TransitionResult};
use roms_audit::{Action, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};
use roms_domain::{
    AgreementStatus, Candidate, CandidateDocument, CandidateStatus, DocumentEvaluation,
    DocumentPolicy, JobOrder, MedicalStatus, NewCandidate, NewCandidateDocument, PaymentGate,
    Statement, evaluate_documents, validate_transition,
};
use time::{Date, OffsetDateTime};

/// Applies a registration command.
///
/// Registration commands create top-level records and have no prior state
/// to consult. Uniqueness of reference numbers is enforced by the caller.
///
/// # Arguments
///
/// * `command` - The registration command to apply
/// * `now` - The time of the request
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if the submitted fields are invalid.
pub fn apply_registration(
    command: RegistrationCommand,
    now: OffsetDateTime,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    match command {
        RegistrationCommand::RegisterCandidate {
            reference_number,
            full_name,
        } => {
            let candidate: NewCandidate = NewCandidate::new(&reference_number, &full_name, now)?;

            let action: Action = Action::new(
                String::from("RegisterCandidate"),
                Some(format!(
                    "Registered candidate {} ({})",
                    candidate.reference_number, candidate.full_name
                )),
            );
            let after: StateSnapshot = StateSnapshot::new(format!(
                "reference={},status={},medical={},version=0",
                candidate.reference_number,
                CandidateStatus::ApplicationSubmitted,
                MedicalStatus::Pending.as_str()
            ));
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                StateSnapshot::new(String::from("none")),
                after,
                AuditScope::default(),
            );

            Ok(TransitionResult::new(
                vec![Change::CandidateCreated(candidate)],
                audit_event,
            ))
        }
        RegistrationCommand::CreateJobOrder(job_order) => {
            job_order.validate()?;

            let action: Action = Action::new(
                String::from("CreateJobOrder"),
                Some(format!(
                    "Created job order {} '{}' for {}",
                    job_order.reference, job_order.title, job_order.employer_name
                )),
            );
            let after: StateSnapshot = StateSnapshot::new(format!(
                "reference={},status={},headcount=0/{},interview={}",
                job_order.reference,
                job_order.status,
                job_order.headcount_required,
                job_order.interview_policy.as_str()
            ));
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                StateSnapshot::new(String::from("none")),
                after,
                AuditScope::default(),
            );

            Ok(TransitionResult::new(
                vec![Change::JobOrderCreated(job_order)],
                audit_event,
            ))
        }
    }
}

/// Applies a command to a single candidate.
///
/// This function is pure: it never mutates the context and never performs
/// I/O. The caller persists the returned changes together with the audit
/// event in one transaction.
///
/// # Arguments
///
/// * `context` - The candidate and its related records (immutable)
/// * `policy` - The active document policy
/// * `command` - The command to apply
/// * `now` - The time of the request; its date is the guard's `as_of`
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - A payment gate blocks the target status
/// - The Workflow Guard rejects the transition
/// - The command is not valid for the candidate's current state
pub fn apply_candidate(
    context: &CandidateContext,
    policy: &DocumentPolicy,
    command: CandidateCommand,
    now: OffsetDateTime,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    match command {
        CandidateCommand::Transition { target } => {
            transition(context, policy, target, now, actor, cause)
        }
        CandidateCommand::ReviewDocuments => review_documents(context, policy, now, actor, cause),
        CandidateCommand::RecordMedicalResult { result } => {
            record_medical_result(context, result, now, actor, cause)
        }
        CandidateCommand::SetInterviewDate { interview_date } => {
            set_interview_date(context, interview_date, now, actor, cause)
        }
        CandidateCommand::AddDocument {
            document_type,
            verified,
            expiry_date,
            file_reference,
        } => {
            let candidate: &Candidate = &context.candidate;
            let document: NewCandidateDocument = NewCandidateDocument {
                candidate_id: candidate.id,
                document_type,
                verified,
                expiry_date,
                file_reference: file_reference.filter(|reference| !reference.trim().is_empty()),
                uploaded_at: now,
            };

            let action: Action = Action::new(
                String::from("AddDocument"),
                Some(format!("Added {}", document_type.display_name())),
            );
            let before: StateSnapshot = StateSnapshot::new(format!(
                "documents={}",
                context.documents.len()
            ));
            let after: StateSnapshot = StateSnapshot::new(format!(
                "documents={},added={},verified={verified}",
                context.documents.len() + 1,
                document_type.as_str()
            ));
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                before,
                after,
                candidate_scope(context),
            );

            Ok(TransitionResult::new(
                vec![Change::DocumentAdded(document)],
                audit_event,
            ))
        }
        CandidateCommand::VerifyDocument { document_id } => {
            let document: &CandidateDocument = context
                .documents
                .iter()
                .find(|document| document.id == document_id)
                .ok_or_else(|| CoreError::not_found("document", document_id))?;
            if document.verified {
                return Err(CoreError::conflict(
                    "document",
                    format!("document {document_id} is already verified"),
                ));
            }

            let action: Action = Action::new(
                String::from("VerifyDocument"),
                Some(format!(
                    "Verified {} {document_id}",
                    document.document_type.display_name()
                )),
            );
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                StateSnapshot::new(format!("document={document_id},verified=false")),
                StateSnapshot::new(format!("document={document_id},verified=true")),
                candidate_scope(context),
            );

            Ok(TransitionResult::new(
                vec![Change::DocumentVerified { document_id }],
                audit_event,
            ))
        }
    }
}

/// Runs a status change through the gates, the guard and the side effects.
///
/// Payment gates are evaluated first so that a blocked move reports the
/// commission condition rather than a generic guard failure.
fn transition(
    context: &CandidateContext,
    policy: &DocumentPolicy,
    target: CandidateStatus,
    now: OffsetDateTime,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let candidate: &Candidate = &context.candidate;

    if let Some(gate) = PaymentGate::for_target(target)
        && let Some(failure) = context.gate_failure(gate)?
    {
        return Err(CoreError::PaymentGate { target, failure });
    }

    validate_transition(candidate, target, &context.facts(policy, now.date()))?;

    let mut updated: Candidate = candidate.clone();
    updated.status = target;
    updated.version += 1;
    updated.updated_at = now;
    if target == CandidateStatus::MedicalPending {
        updated.medical_status = MedicalStatus::Pending;
    }

    let mut changes: Vec<Change> = vec![Change::CandidateUpdated {
        candidate: updated.clone(),
        expected_version: candidate.version,
    }];
    changes.extend(side_effects(context, target, now)?);

    let action: Action = Action::new(
        String::from("TransitionCandidate"),
        Some(format!("{} -> {target}", candidate.status)),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        candidate_snapshot(candidate),
        candidate_snapshot(&updated),
        candidate_scope(context),
    );

    Ok(TransitionResult::new(changes, audit_event))
}

/// Changes to related records implied by entering `target`.
fn side_effects(
    context: &CandidateContext,
    target: CandidateStatus,
    now: OffsetDateTime,
) -> Result<Vec<Change>, CoreError> {
    let Some(assignment) = &context.active_assignment else {
        return Ok(Vec::new());
    };

    let mut changes: Vec<Change> = Vec::new();
    match target {
        CandidateStatus::OfferIssued if assignment.offer_issued_at.is_none() => {
            changes.push(Change::AssignmentUpdated(assignment.offered(now)));
        }
        CandidateStatus::Placed => {
            changes.push(Change::AssignmentUpdated(assignment.placed(now)));

            if let Some(agreement) = &context.agreement
                && agreement.status == AgreementStatus::Active
            {
                let statement: Option<Statement> = context.statement()?;
                if statement.is_some_and(|statement| statement.full_payment_complete) {
                    let mut completed = agreement.clone();
                    completed.status = AgreementStatus::Completed;
                    changes.push(Change::AgreementUpdated(completed));
                }
            }
        }
        CandidateStatus::Rejected | CandidateStatus::Withdrawn => {
            changes.push(Change::AssignmentUpdated(assignment.cancelled(now)));

            if let Some(job_order) = &context.job_order {
                let mut released: JobOrder = job_order.clone();
                released.headcount_filled = released.headcount_filled.saturating_sub(1);
                changes.push(Change::JobOrderUpdated(released));
            }
        }
        _ => {}
    }
    Ok(changes)
}

/// Evaluates documents and moves the candidate to the resulting status.
///
/// Re-reviewing a candidate whose evaluation is unchanged only records the
/// review; the status and version are left alone.
fn review_documents(
    context: &CandidateContext,
    policy: &DocumentPolicy,
    now: OffsetDateTime,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let candidate: &Candidate = &context.candidate;
    if !matches!(
        candidate.status,
        CandidateStatus::UnderReview | CandidateStatus::DocumentsInsufficient
    ) {
        return Err(CoreError::conflict(
            "candidate",
            format!(
                "documents are reviewed only in UNDER_REVIEW or DOCUMENTS_INSUFFICIENT, not {}",
                candidate.status
            ),
        ));
    }

    let evaluation: DocumentEvaluation =
        evaluate_documents(&context.documents, policy, now.date())?;

    let mut result: TransitionResult = if evaluation.next_status == candidate.status {
        let action: Action = Action::new(
            String::from("ReviewDocuments"),
            Some(format!(
                "Documents still insufficient: {}",
                missing_list(&evaluation)
            )),
        );
        let audit_event: AuditEvent = AuditEvent::new(
            actor,
            cause,
            action,
            candidate_snapshot(candidate),
            candidate_snapshot(candidate),
            candidate_scope(context),
        );
        TransitionResult::new(Vec::new(), audit_event)
    } else {
        let mut result: TransitionResult =
            transition(context, policy, evaluation.next_status, now, actor, cause)?;
        result.audit_event.action = Action::new(
            String::from("ReviewDocuments"),
            Some(format!("{} -> {}", candidate.status, evaluation.next_status)),
        );
        result
    };

    result.evaluation = Some(evaluation);
    Ok(result)
}

fn record_medical_result(
    context: &CandidateContext,
    result: MedicalStatus,
    now: OffsetDateTime,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let candidate: &Candidate = &context.candidate;
    if result == MedicalStatus::Pending {
        return Err(CoreError::validation(
            "result",
            "a medical result must be PASSED, FAILED or WAIVED",
        ));
    }
    if candidate.status != CandidateStatus::MedicalPending {
        return Err(CoreError::conflict(
            "candidate",
            format!(
                "medical results can only be recorded while MEDICAL_PENDING, candidate is {}",
                candidate.status
            ),
        ));
    }

    let mut updated: Candidate = candidate.clone();
    updated.medical_status = result;
    updated.version += 1;
    updated.updated_at = now;

    let action: Action = Action::new(
        String::from("RecordMedicalResult"),
        Some(format!("Medical result {}", result.as_str())),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        candidate_snapshot(candidate),
        candidate_snapshot(&updated),
        candidate_scope(context),
    );

    Ok(TransitionResult::new(
        vec![Change::CandidateUpdated {
            candidate: updated,
            expected_version: candidate.version,
        }],
        audit_event,
    ))
}

/// Interview dates can be set until the interview has taken place.
fn set_interview_date(
    context: &CandidateContext,
    interview_date: Date,
    now: OffsetDateTime,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let candidate: &Candidate = &context.candidate;
    if !matches!(
        candidate.status,
        CandidateStatus::ApplicationSubmitted
            | CandidateStatus::UnderReview
            | CandidateStatus::DocumentsInsufficient
            | CandidateStatus::DocumentsApproved
            | CandidateStatus::InterviewScheduled
    ) {
        return Err(CoreError::conflict(
            "candidate",
            format!(
                "interview date cannot be changed once the candidate is {}",
                candidate.status
            ),
        ));
    }

    let mut updated: Candidate = candidate.clone();
    updated.interview_date = Some(interview_date);
    updated.version += 1;
    updated.updated_at = now;

    let action: Action = Action::new(
        String::from("SetInterviewDate"),
        Some(match candidate.interview_date {
            Some(previous) => format!("Interview moved from {previous} to {interview_date}"),
            None => format!("Interview set for {interview_date}"),
        }),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        candidate_snapshot(candidate),
        candidate_snapshot(&updated),
        candidate_scope(context),
    );

    Ok(TransitionResult::new(
        vec![Change::CandidateUpdated {
            candidate: updated,
            expected_version: candidate.version,
        }],
        audit_event,
    ))
}

fn missing_list(evaluation: &DocumentEvaluation) -> String {
    evaluation
        .missing_types
        .iter()
        .map(|document_type| document_type.display_name())
        .collect::<Vec<&str>>()
        .join(", ")
}

fn candidate_snapshot(candidate: &Candidate) -> StateSnapshot {
    StateSnapshot::new(format!(
        "status={},medical={},version={}",
        candidate.status,
        candidate.medical_status.as_str(),
        candidate.version
    ))
}

fn candidate_scope(context: &CandidateContext) -> AuditScope {
    let mut scope: AuditScope = AuditScope::candidate(context.candidate.id);
    if let Some(assignment) = &context.active_assignment {
        scope = scope.with_assignment(assignment.id);
    }
    if let Some(agreement) = &context.agreement {
        scope = scope.with_agreement(agreement.id);
    }
    scope
}
