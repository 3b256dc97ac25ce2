// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Writing a `TransitionResult`.

use diesel::SqliteConnection;
use roms::{Change, TransitionResult};
use roms_audit::{AuditEvent, AuditScope};
use time::OffsetDateTime;
use tracing::{debug, info};

use super::assignments::{insert_assignment, insert_job_order, update_assignment, update_job_order};
use super::audit::persist_audit_event;
use super::candidates::{
    insert_candidate, insert_document, mark_document_verified, update_candidate,
};
use super::commission::{append_ledger_entry, insert_agreement, update_agreement};
use crate::error::PersistenceError;

/// Identifiers produced by persisting a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistTransitionResult {
    /// The id of the audit event.
    pub event_id: i64,
    /// The id of the row the transition inserted, if it inserted one.
    pub created_id: Option<i64>,
}

/// Applies one change and returns the id of any row it inserted.
fn apply_change(
    conn: &mut SqliteConnection,
    change: &Change,
    scope: &mut AuditScope,
) -> Result<Option<i64>, PersistenceError> {
    match change {
        Change::CandidateCreated(candidate) => {
            let id: i64 = insert_candidate(conn, candidate)?;
            scope.candidate_id.get_or_insert(id);
            Ok(Some(id))
        }
        Change::CandidateUpdated {
            candidate,
            expected_version,
        } => {
            update_candidate(conn, candidate, *expected_version)?;
            Ok(None)
        }
        Change::DocumentAdded(document) => insert_document(conn, document).map(Some),
        Change::DocumentVerified { document_id } => {
            mark_document_verified(conn, *document_id)?;
            Ok(None)
        }
        Change::JobOrderCreated(job_order) => insert_job_order(conn, job_order).map(Some),
        Change::JobOrderUpdated(job_order) => {
            update_job_order(conn, job_order)?;
            Ok(None)
        }
        Change::AssignmentCreated(assignment) => {
            let id: i64 = insert_assignment(conn, assignment)?;
            scope.assignment_id.get_or_insert(id);
            Ok(Some(id))
        }
        Change::AssignmentUpdated(assignment) => {
            update_assignment(conn, assignment)?;
            Ok(None)
        }
        Change::AgreementCreated(agreement) => {
            let id: i64 = insert_agreement(conn, agreement)?;
            scope.agreement_id.get_or_insert(id);
            Ok(Some(id))
        }
        Change::AgreementUpdated(agreement) => {
            update_agreement(conn, agreement)?;
            Ok(None)
        }
        Change::LedgerEntryAppended(entry) => append_ledger_entry(conn, entry).map(Some),
    }
}

/// Persists every change of a transition followed by its audit event.
///
/// Must run inside a transaction: a failure part way through leaves the
/// earlier changes written until the caller rolls back.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `result` - The transition result to persist
/// * `recorded_at` - The time stamped on the audit event
///
/// # Errors
///
/// Returns an error if any write fails, including a stale candidate version.
pub fn persist_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
    recorded_at: OffsetDateTime,
) -> Result<PersistTransitionResult, PersistenceError> {
    let mut scope: AuditScope = result.audit_event.scope;
    let mut created_id: Option<i64> = None;

    for change in &result.changes {
        if let Some(id) = apply_change(conn, change, &mut scope)? {
            created_id.get_or_insert(id);
        }
    }
    debug!(
        changes = result.changes.len(),
        ?created_id,
        "Applied transition changes"
    );

    let event: AuditEvent = AuditEvent {
        scope,
        ..result.audit_event.clone()
    };
    let event_id: i64 = persist_audit_event(conn, &event, recorded_at)?;

    info!(
        event_id,
        action = %event.action.name,
        candidate_id = ?scope.candidate_id,
        "Persisted transition"
    );

    Ok(PersistTransitionResult {
        event_id,
        created_id,
    })
}
