// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::AssignmentCommand;
use crate::error::CoreError;
use crate::state::{AssignmentContext, Change, TransitionResult};
use roms_audit::{Action, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};
use roms_domain::{
    Assignment, CandidateStatus, JobOrder, NewAssignment, PaymentGate, Statement,
    compute_statement,
};
use time::OffsetDateTime;

/// Applies an assignment command.
///
/// A candidate holds at most one active assignment. Each active assignment
/// occupies one position of its job order's headcount.
///
/// # Arguments
///
/// * `context` - The candidate, job order and assignments involved
/// * `command` - The command to apply
/// * `now` - The time of the request
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - The candidate already has an active assignment, or is terminal
/// - The job order is not open or has no capacity
/// - The targeted assignment is inactive or already at the requested stage
/// - A placed assignment is cancelled
/// - Placement is confirmed before full payment
pub fn apply_assignment(
    context: &AssignmentContext,
    command: AssignmentCommand,
    now: OffsetDateTime,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    match command {
        AssignmentCommand::Create { notes } => create(context, notes, now, actor, cause),
        AssignmentCommand::Cancel {
            assignment_id,
            reason,
        } => {
            let assignment: &Assignment = active_target(context, assignment_id)?;
            if assignment.placement_confirmed_at.is_some() {
                return Err(CoreError::conflict(
                    "assignment",
                    format!("assignment {assignment_id} is placed and cannot be cancelled"),
                ));
            }

            let mut cancelled: Assignment = assignment.cancelled(now);
            if let Some(reason) = reason.filter(|reason| !reason.trim().is_empty()) {
                cancelled.notes = Some(append_note(
                    assignment.notes.as_deref(),
                    &format!("CANCELLED: {}", reason.trim()),
                ));
            }

            let mut job_order: JobOrder = context.job_order.clone();
            job_order.headcount_filled = context.active_on_job_order.saturating_sub(1);

            let action: Action = Action::new(
                String::from("CancelAssignment"),
                Some(format!(
                    "Cancelled assignment {assignment_id} to job order {}",
                    job_order.reference
                )),
            );
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                assignment_snapshot(assignment, &context.job_order),
                assignment_snapshot(&cancelled, &job_order),
                scope(assignment),
            );

            Ok(TransitionResult::new(
                vec![
                    Change::AssignmentUpdated(cancelled),
                    Change::JobOrderUpdated(job_order),
                ],
                audit_event,
            ))
        }
        AssignmentCommand::IssueOffer { assignment_id } => {
            let assignment: &Assignment = active_target(context, assignment_id)?;
            if assignment.offer_issued_at.is_some() {
                return Err(CoreError::conflict(
                    "assignment",
                    format!("offer for assignment {assignment_id} already issued"),
                ));
            }

            let offered: Assignment = assignment.offered(now);
            let action: Action = Action::new(
                String::from("IssueOffer"),
                Some(format!("Offer issued for assignment {assignment_id}")),
            );
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                assignment_snapshot(assignment, &context.job_order),
                assignment_snapshot(&offered, &context.job_order),
                scope(assignment),
            );

            Ok(TransitionResult::new(
                vec![Change::AssignmentUpdated(offered)],
                audit_event,
            ))
        }
        AssignmentCommand::ConfirmPlacement { assignment_id } => {
            let assignment: &Assignment = active_target(context, assignment_id)?;
            if assignment.offer_issued_at.is_none() {
                return Err(CoreError::conflict(
                    "assignment",
                    format!("assignment {assignment_id} has no issued offer"),
                ));
            }
            if assignment.placement_confirmed_at.is_some() {
                return Err(CoreError::conflict(
                    "assignment",
                    format!("placement for assignment {assignment_id} already confirmed"),
                ));
            }

            let statement: Option<Statement> = context
                .agreement
                .as_ref()
                .map(|agreement| compute_statement(agreement, &context.ledger))
                .transpose()?;
            PaymentGate::FullPayment
                .check(statement.as_ref())
                .map_err(|failure| CoreError::PaymentGate {
                    target: CandidateStatus::Placed,
                    failure,
                })?;

            let placed: Assignment = assignment.placed(now);
            let action: Action = Action::new(
                String::from("ConfirmPlacement"),
                Some(format!("Placement confirmed for assignment {assignment_id}")),
            );
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                assignment_snapshot(assignment, &context.job_order),
                assignment_snapshot(&placed, &context.job_order),
                context.agreement.as_ref().map_or_else(
                    || scope(assignment),
                    |agreement| scope(assignment).with_agreement(agreement.id),
                ),
            );

            Ok(TransitionResult::new(
                vec![Change::AssignmentUpdated(placed)],
                audit_event,
            ))
        }
    }
}

fn create(
    context: &AssignmentContext,
    notes: Option<String>,
    now: OffsetDateTime,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let job_order: &JobOrder = &context.job_order;
    let candidate_id: i64 = context.candidate.id;

    if context.candidate.status.is_terminal() {
        return Err(CoreError::conflict(
            "candidate",
            format!(
                "candidate {candidate_id} is {} and cannot be assigned",
                context.candidate.status
            ),
        ));
    }
    if let Some(active) = &context.active_assignment {
        return Err(CoreError::conflict(
            "assignment",
            format!(
                "candidate {candidate_id} already has active assignment {} to job order {}",
                active.id, active.job_order_id
            ),
        ));
    }
    if !job_order.status.accepts_assignments() {
        return Err(CoreError::conflict(
            "job order",
            format!(
                "job order {} is {} and does not accept assignments",
                job_order.reference, job_order.status
            ),
        ));
    }
    if !job_order.has_capacity() {
        return Err(CoreError::Capacity {
            job_order_id: job_order.id,
            filled: job_order.headcount_filled,
            required: job_order.headcount_required,
        });
    }

    let assignment: NewAssignment = NewAssignment {
        candidate_id,
        job_order_id: job_order.id,
        assigned_at: now,
        notes: notes.filter(|notes| !notes.trim().is_empty()),
    };
    let mut updated: JobOrder = job_order.clone();
    updated.headcount_filled += 1;

    let action: Action = Action::new(
        String::from("CreateAssignment"),
        Some(format!(
            "Assigned candidate {} to job order {}",
            context.candidate.reference_number, job_order.reference
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        StateSnapshot::new(format!(
            "active=none,filled={}/{}",
            job_order.headcount_filled, job_order.headcount_required
        )),
        StateSnapshot::new(format!(
            "active=ASSIGNED,filled={}/{}",
            updated.headcount_filled, updated.headcount_required
        )),
        AuditScope::candidate(candidate_id),
    );

    Ok(TransitionResult::new(
        vec![
            Change::AssignmentCreated(assignment),
            Change::JobOrderUpdated(updated),
        ],
        audit_event,
    ))
}

fn active_target(
    context: &AssignmentContext,
    assignment_id: i64,
) -> Result<&Assignment, CoreError> {
    let assignment: &Assignment = context
        .target
        .as_ref()
        .filter(|assignment| assignment.id == assignment_id)
        .ok_or_else(|| CoreError::not_found("assignment", assignment_id))?;
    if !assignment.is_active {
        return Err(CoreError::conflict(
            "assignment",
            format!(
                "assignment {assignment_id} is {} and no longer active",
                assignment.status
            ),
        ));
    }
    Ok(assignment)
}

pub(crate) fn append_note(existing: Option<&str>, note: &str) -> String {
    match existing.map(str::trim).filter(|existing| !existing.is_empty()) {
        Some(existing) => format!("{existing}\n{note}"),
        None => note.to_string(),
    }
}

fn assignment_snapshot(assignment: &Assignment, job_order: &JobOrder) -> StateSnapshot {
    StateSnapshot::new(format!(
        "status={},active={},filled={}/{}",
        assignment.status,
        assignment.is_active,
        job_order.headcount_filled,
        job_order.headcount_required
    ))
}

const fn scope(assignment: &Assignment) -> AuditScope {
    AuditScope::candidate(assignment.candidate_id).with_assignment(assignment.id)
}
