// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::assignment::append_note;
use crate::command::AgreementCommand;
use crate::error::CoreError;
use crate::state::{AgreementContext, Change, TransitionResult};
use roms_audit::{Action, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};
use roms_domain::{
    AgreementStatus, Assignment, CommissionAgreement, NewAgreement, validate_agreement_terms,
};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Applies a commission agreement command.
///
/// An assignment has at most one current agreement. A cancelled agreement
/// stays on record and a new one may be created in its place.
///
/// # Errors
///
/// Returns an error if:
/// - The assignment belongs to another candidate or is no longer active
/// - A current agreement already exists
/// - The terms are invalid
/// - The agreement is already signed, cancelled or completed
pub fn apply_agreement(
    context: &AgreementContext,
    command: AgreementCommand,
    now: OffsetDateTime,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let assignment: &Assignment = &context.assignment;

    match command {
        AgreementCommand::Create {
            candidate_id,
            total_commission,
            required_downpayment,
            currency,
            notes,
        } => {
            if assignment.candidate_id != candidate_id {
                return Err(CoreError::validation(
                    "candidateId",
                    format!(
                        "assignment {} does not belong to candidate {candidate_id}",
                        assignment.id
                    ),
                ));
            }
            if !assignment.is_active {
                return Err(CoreError::conflict(
                    "assignment",
                    format!("assignment {} is no longer active", assignment.id),
                ));
            }
            if let Some(current) = context.agreements.iter().find(|a| a.is_current()) {
                return Err(CoreError::conflict(
                    "agreement",
                    format!(
                        "assignment {} already has {} agreement {}",
                        assignment.id, current.status, current.id
                    ),
                ));
            }

            let currency: String = validate_agreement_terms(
                total_commission,
                required_downpayment,
                currency.as_deref(),
            )?;
            let agreement: NewAgreement = NewAgreement {
                candidate_id,
                assignment_id: assignment.id,
                total_commission,
                required_downpayment,
                currency,
                notes: notes.filter(|notes| !notes.trim().is_empty()),
                created_at: now,
            };

            let action: Action = Action::new(
                String::from("CreateAgreement"),
                Some(format!(
                    "Agreement for assignment {}: total {} {}, downpayment {}",
                    assignment.id,
                    agreement.currency,
                    agreement.total_commission,
                    agreement.required_downpayment
                )),
            );
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                StateSnapshot::new(String::from("agreement=none")),
                StateSnapshot::new(format!(
                    "status={},signed=false,total={},downpayment={}",
                    AgreementStatus::Active,
                    agreement.total_commission,
                    agreement.required_downpayment
                )),
                AuditScope::candidate(candidate_id).with_assignment(assignment.id),
            );

            Ok(TransitionResult::new(
                vec![Change::AgreementCreated(agreement)],
                audit_event,
            ))
        }
        AgreementCommand::Sign {
            agreement_id,
            document_url,
        } => {
            let agreement: &CommissionAgreement = find(context, agreement_id)?;
            if agreement.status == AgreementStatus::Cancelled {
                return Err(CoreError::validation(
                    "agreementId",
                    format!("agreement {agreement_id} is CANCELLED and cannot be signed"),
                ));
            }
            if agreement.signed {
                return Err(CoreError::AlreadySigned { agreement_id });
            }

            let mut signed: CommissionAgreement = agreement.clone();
            signed.signed = true;
            signed.signed_at = Some(now);
            signed.document_url = document_url
                .filter(|url| !url.trim().is_empty())
                .or_else(|| agreement.document_url.clone());

            let action: Action = Action::new(
                String::from("SignAgreement"),
                Some(format!("Agreement {agreement_id} signed")),
            );
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                agreement_snapshot(agreement),
                agreement_snapshot(&signed),
                scope(agreement),
            );

            Ok(TransitionResult::new(
                vec![Change::AgreementUpdated(signed)],
                audit_event,
            ))
        }
        AgreementCommand::Cancel {
            agreement_id,
            reason,
        } => {
            let agreement: &CommissionAgreement = find(context, agreement_id)?;
            if reason.trim().is_empty() {
                return Err(CoreError::validation(
                    "reason",
                    "a cancellation reason is required",
                ));
            }
            if agreement.status != AgreementStatus::Active {
                return Err(CoreError::conflict(
                    "agreement",
                    format!(
                        "agreement {agreement_id} is {} and cannot be cancelled",
                        agreement.status
                    ),
                ));
            }

            let stamp: String = now
                .format(&Rfc3339)
                .unwrap_or_else(|_| now.date().to_string());
            let mut cancelled: CommissionAgreement = agreement.clone();
            cancelled.status = AgreementStatus::Cancelled;
            cancelled.notes = Some(append_note(
                agreement.notes.as_deref(),
                &format!("CANCELLED: {} at {stamp}", reason.trim()),
            ));

            let action: Action = Action::new(
                String::from("CancelAgreement"),
                Some(format!("Agreement {agreement_id} cancelled: {}", reason.trim())),
            );
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                agreement_snapshot(agreement),
                agreement_snapshot(&cancelled),
                scope(agreement),
            );

            Ok(TransitionResult::new(
                vec![Change::AgreementUpdated(cancelled)],
                audit_event,
            ))
        }
    }
}

fn find(
    context: &AgreementContext,
    agreement_id: i64,
) -> Result<&CommissionAgreement, CoreError> {
    context
        .agreements
        .iter()
        .find(|agreement| agreement.id == agreement_id)
        .ok_or_else(|| CoreError::not_found("agreement", agreement_id))
}

fn agreement_snapshot(agreement: &CommissionAgreement) -> StateSnapshot {
    StateSnapshot::new(format!(
        "status={},signed={}",
        agreement.status, agreement.signed
    ))
}

const fn scope(agreement: &CommissionAgreement) -> AuditScope {
    AuditScope::candidate(agreement.candidate_id)
        .with_assignment(agreement.assignment_id)
        .with_agreement(agreement.id)
}
