// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Loading the facts a command is decided on.
//!
//! Each loader reads everything the matching `apply_*` function needs in
//! one pass. Callers run loaders and the subsequent write inside the same
//! immediate transaction so the facts cannot go stale in between.

use diesel::SqliteConnection;
use roms::{AgreementContext, AssignmentContext, CandidateContext, LedgerContext};
use roms_domain::{
    Assignment, Candidate, CandidateDocument, CommissionAgreement, JobOrder, LedgerEntry,
};

use super::assignments::{
    count_active_on_job_order, find_active_assignment, get_assignment, get_job_order,
};
use super::candidates::{get_candidate, list_documents};
use super::commission::{
    find_current_agreement, get_agreement, get_ledger_entry, list_agreements_for_assignment,
    list_ledger_entries,
};
use crate::error::PersistenceError;

/// Reads the current agreement of an assignment together with its ledger.
fn load_commission(
    conn: &mut SqliteConnection,
    assignment_id: i64,
) -> Result<(Option<CommissionAgreement>, Vec<LedgerEntry>), PersistenceError> {
    let Some(agreement) = find_current_agreement(conn, assignment_id)? else {
        return Ok((None, Vec::new()));
    };
    let ledger: Vec<LedgerEntry> = list_ledger_entries(conn, agreement.id)?;
    Ok((Some(agreement), ledger))
}

/// Loads a candidate with documents, active assignment and commission state.
///
/// # Errors
///
/// Returns `NotFound` if the candidate does not exist.
pub fn load_candidate_context(
    conn: &mut SqliteConnection,
    candidate_id: i64,
) -> Result<CandidateContext, PersistenceError> {
    let candidate: Candidate = get_candidate(conn, candidate_id)?;
    let documents: Vec<CandidateDocument> = list_documents(conn, candidate_id)?;
    let mut context: CandidateContext = CandidateContext::new(candidate, documents);

    if let Some(assignment) = find_active_assignment(conn, candidate_id)? {
        let job_order: JobOrder = get_job_order(conn, assignment.job_order_id)?;
        let (agreement, ledger) = load_commission(conn, assignment.id)?;
        context.job_order = Some(job_order);
        context.agreement = agreement;
        context.ledger = ledger;
        context.active_assignment = Some(assignment);
    }

    Ok(context)
}

/// Loads the facts for assigning a candidate to a job order.
///
/// # Errors
///
/// Returns `NotFound` if the candidate or job order does not exist.
pub fn load_new_assignment_context(
    conn: &mut SqliteConnection,
    candidate_id: i64,
    job_order_id: i64,
) -> Result<AssignmentContext, PersistenceError> {
    let candidate: Candidate = get_candidate(conn, candidate_id)?;
    let job_order: JobOrder = get_job_order(conn, job_order_id)?;
    let active_assignment: Option<Assignment> = find_active_assignment(conn, candidate_id)?;
    let active_on_job_order: u32 = count_active_on_job_order(conn, job_order_id)?;

    Ok(AssignmentContext {
        candidate,
        job_order,
        active_assignment,
        target: None,
        active_on_job_order,
        agreement: None,
        ledger: Vec::new(),
    })
}

/// Loads the facts for a command on an existing assignment.
///
/// # Errors
///
/// Returns `NotFound` if the assignment does not exist.
pub fn load_assignment_context(
    conn: &mut SqliteConnection,
    assignment_id: i64,
) -> Result<AssignmentContext, PersistenceError> {
    let target: Assignment = get_assignment(conn, assignment_id)?;
    let candidate: Candidate = get_candidate(conn, target.candidate_id)?;
    let job_order: JobOrder = get_job_order(conn, target.job_order_id)?;
    let active_assignment: Option<Assignment> = find_active_assignment(conn, candidate.id)?;
    let active_on_job_order: u32 = count_active_on_job_order(conn, job_order.id)?;
    let (agreement, ledger) = load_commission(conn, target.id)?;

    Ok(AssignmentContext {
        candidate,
        job_order,
        active_assignment,
        target: Some(target),
        active_on_job_order,
        agreement,
        ledger,
    })
}

/// Loads an assignment and every agreement created for it.
///
/// # Errors
///
/// Returns `NotFound` if the assignment does not exist.
pub fn load_agreement_context(
    conn: &mut SqliteConnection,
    assignment_id: i64,
) -> Result<AgreementContext, PersistenceError> {
    let assignment: Assignment = get_assignment(conn, assignment_id)?;
    let agreements: Vec<CommissionAgreement> =
        list_agreements_for_assignment(conn, assignment_id)?;
    Ok(AgreementContext {
        assignment,
        agreements,
    })
}

/// Loads the agreement context that owns `agreement_id`.
///
/// # Errors
///
/// Returns `NotFound` if the agreement does not exist.
pub fn load_agreement_context_for(
    conn: &mut SqliteConnection,
    agreement_id: i64,
) -> Result<AgreementContext, PersistenceError> {
    let agreement: CommissionAgreement = get_agreement(conn, agreement_id)?;
    load_agreement_context(conn, agreement.assignment_id)
}

/// Loads an agreement with its full ledger.
///
/// # Errors
///
/// Returns `NotFound` if the agreement does not exist.
pub fn load_ledger_context(
    conn: &mut SqliteConnection,
    agreement_id: i64,
) -> Result<LedgerContext, PersistenceError> {
    let agreement: CommissionAgreement = get_agreement(conn, agreement_id)?;
    let entries: Vec<LedgerEntry> = list_ledger_entries(conn, agreement_id)?;
    Ok(LedgerContext { agreement, entries })
}

/// Loads the ledger context that owns the entry `entry_id`.
///
/// # Errors
///
/// Returns `NotFound` if the entry does not exist.
pub fn load_ledger_context_for_entry(
    conn: &mut SqliteConnection,
    entry_id: i64,
) -> Result<LedgerContext, PersistenceError> {
    let entry: LedgerEntry = get_ledger_entry(conn, entry_id)?;
    load_ledger_context(conn, entry.agreement_id)
}
