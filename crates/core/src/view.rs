// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read models derived from a candidate context.

use crate::error::CoreError;
use crate::state::CandidateContext;
use roms_domain::{
    CandidateStatus, DocumentPolicy, DocumentType, ExpiryFlag, MedicalStatus, PaymentGate,
    Statement, WorkflowFacts, allowed_transitions, blocked_transitions, expiry_flag,
    missing_required_types,
};
use time::Date;

/// The workflow state of a candidate as presented to operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowView {
    pub candidate_id: i64,
    pub status: CandidateStatus,
    pub medical_status: MedicalStatus,
    pub stage_title: &'static str,
    pub stage_description: &'static str,
    /// Statuses a transition request would currently succeed for.
    pub allowed_transitions: Vec<CandidateStatus>,
    /// True when the candidate cannot move forward (REJECTED and WITHDRAWN
    /// are always possible and do not count).
    pub blocked: bool,
    pub blocked_reason: Option<String>,
    pub missing_types: Vec<DocumentType>,
    pub expiry_flag: ExpiryFlag,
    pub statement: Option<Statement>,
}

/// Returns the statuses a transition request would currently succeed for.
///
/// This is the Workflow Guard's answer with payment-gated targets removed
/// while their gate is closed.
///
/// # Errors
///
/// Returns an error if the documents or the ledger cannot be evaluated.
pub fn allowed_next_statuses(
    context: &CandidateContext,
    policy: &DocumentPolicy,
    as_of: Date,
) -> Result<Vec<CandidateStatus>, CoreError> {
    Ok(partition(context, &context.facts(policy, as_of))?.0)
}

/// Builds the workflow view for a candidate.
///
/// # Errors
///
/// Returns an error if the documents or the ledger cannot be evaluated.
pub fn workflow_view(
    context: &CandidateContext,
    policy: &DocumentPolicy,
    as_of: Date,
    expiry_warning_days: u32,
) -> Result<WorkflowView, CoreError> {
    let candidate = &context.candidate;
    let facts: WorkflowFacts<'_> = context.facts(policy, as_of);
    let (allowed, mut reasons) = partition(context, &facts)?;

    for (target, reason) in blocked_transitions(candidate, &facts)? {
        reasons.push(format!("{target}: {reason}"));
    }

    let can_advance: bool = allowed.iter().any(|target| {
        !matches!(
            target,
            CandidateStatus::Rejected | CandidateStatus::Withdrawn
        )
    });
    let blocked: bool = !candidate.status.is_terminal() && !can_advance;

    Ok(WorkflowView {
        candidate_id: candidate.id,
        status: candidate.status,
        medical_status: candidate.medical_status,
        stage_title: candidate.status.stage_title(),
        stage_description: candidate.status.stage_description(),
        allowed_transitions: allowed,
        blocked,
        blocked_reason: if blocked {
            reasons.into_iter().next()
        } else {
            None
        },
        missing_types: missing_required_types(&context.documents, policy),
        expiry_flag: expiry_flag(&context.documents, as_of, expiry_warning_days)?,
        statement: context.statement()?,
    })
}

/// Splits guard-legal targets into those whose payment gate is open and
/// descriptions of those whose gate is closed.
fn partition(
    context: &CandidateContext,
    facts: &WorkflowFacts<'_>,
) -> Result<(Vec<CandidateStatus>, Vec<String>), CoreError> {
    let mut allowed: Vec<CandidateStatus> = Vec::new();
    let mut gated: Vec<String> = Vec::new();

    for target in allowed_transitions(&context.candidate, facts) {
        if let Some(gate) = PaymentGate::for_target(target)
            && let Some(failure) = context.gate_failure(gate)?
        {
            gated.push(format!("{target}: {failure}"));
            continue;
        }
        allowed.push(target);
    }
    Ok((allowed, gated))
}
