// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit trail queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use roms_audit::{Action, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};
use time::OffsetDateTime;

use crate::data_models::{
    ActionData, ActorData, AuditEventRow, CauseData, StateSnapshotData, parse_timestamp,
};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// A persisted audit event with its storage identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub event_id: i64,
    pub recorded_at: OffsetDateTime,
    pub event: AuditEvent,
}

fn into_record(row: AuditEventRow) -> Result<AuditRecord, PersistenceError> {
    let actor_data: ActorData = serde_json::from_str(&row.actor_json)?;
    let cause_data: CauseData = serde_json::from_str(&row.cause_json)?;
    let action_data: ActionData = serde_json::from_str(&row.action_json)?;
    let before_data: StateSnapshotData = serde_json::from_str(&row.before_snapshot_json)?;
    let after_data: StateSnapshotData = serde_json::from_str(&row.after_snapshot_json)?;

    let scope: AuditScope = AuditScope {
        candidate_id: row.candidate_id,
        assignment_id: row.assignment_id,
        agreement_id: row.agreement_id,
    };

    Ok(AuditRecord {
        event_id: row.event_id,
        recorded_at: parse_timestamp(&row.recorded_at)?,
        event: AuditEvent::new(
            Actor::new(actor_data.id, actor_data.actor_type),
            Cause::new(cause_data.id, cause_data.description),
            Action::new(action_data.name, action_data.details),
            StateSnapshot::new(before_data.data),
            StateSnapshot::new(after_data.data),
            scope,
        ),
    })
}

/// Retrieves an audit event by id.
///
/// # Errors
///
/// Returns `NotFound` if the event does not exist, or an error if it
/// cannot be deserialized.
pub fn get_audit_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<AuditRecord, PersistenceError> {
    let row: AuditEventRow = audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .select(AuditEventRow::as_select())
        .first::<AuditEventRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("audit event", event_id))?;
    into_record(row)
}

/// Lists the audit events scoped to a candidate, in the order they were written.
///
/// # Errors
///
/// Returns an error if the query fails or an event cannot be deserialized.
pub fn list_candidate_audit_events(
    conn: &mut SqliteConnection,
    candidate_id: i64,
) -> Result<Vec<AuditRecord>, PersistenceError> {
    audit_events::table
        .filter(audit_events::candidate_id.eq(candidate_id))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load::<AuditEventRow>(conn)?
        .into_iter()
        .map(into_record)
        .collect()
}
