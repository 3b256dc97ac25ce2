// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Job order and assignment mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use roms_domain::{Assignment, AssignmentStatus, JobOrder, NewAssignment, NewJobOrder};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{format_optional_timestamp, format_timestamp, headcount_to_db};
use crate::diesel_schema::{assignments, job_orders};
use crate::error::PersistenceError;

/// Inserts a job order with nothing filled.
///
/// # Errors
///
/// Returns `UniqueViolation` if the reference is taken.
pub fn insert_job_order(
    conn: &mut SqliteConnection,
    job_order: &NewJobOrder,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(job_orders::table)
        .values((
            job_orders::reference.eq(&job_order.reference),
            job_orders::title.eq(&job_order.title),
            job_orders::employer_name.eq(&job_order.employer_name),
            job_orders::headcount_required.eq(headcount_to_db(job_order.headcount_required)?),
            job_orders::headcount_filled.eq(0),
            job_orders::status.eq(job_order.status.as_str()),
            job_orders::interview_policy.eq(job_order.interview_policy.as_str()),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Writes a job order's headcount and status.
///
/// # Errors
///
/// Returns `NotFound` if the job order does not exist.
pub fn update_job_order(
    conn: &mut SqliteConnection,
    job_order: &JobOrder,
) -> Result<(), PersistenceError> {
    let rows: usize =
        diesel::update(job_orders::table.filter(job_orders::job_order_id.eq(job_order.id)))
            .set((
                job_orders::headcount_filled.eq(headcount_to_db(job_order.headcount_filled)?),
                job_orders::status.eq(job_order.status.as_str()),
            ))
            .execute(conn)?;

    if rows == 0 {
        return Err(PersistenceError::not_found("job order", job_order.id));
    }
    Ok(())
}

/// Inserts an active assignment.
///
/// # Errors
///
/// Returns `UniqueViolation` if the candidate already has an active assignment.
pub fn insert_assignment(
    conn: &mut SqliteConnection,
    assignment: &NewAssignment,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(assignments::table)
        .values((
            assignments::candidate_id.eq(assignment.candidate_id),
            assignments::job_order_id.eq(assignment.job_order_id),
            assignments::status.eq(AssignmentStatus::Assigned.as_str()),
            assignments::is_active.eq(true),
            assignments::assigned_at.eq(format_timestamp(assignment.assigned_at)?),
            assignments::notes.eq(&assignment.notes),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Writes an assignment's lifecycle fields.
///
/// # Errors
///
/// Returns `NotFound` if the assignment does not exist.
pub fn update_assignment(
    conn: &mut SqliteConnection,
    assignment: &Assignment,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(
        assignments::table.filter(assignments::assignment_id.eq(assignment.id)),
    )
    .set((
        assignments::status.eq(assignment.status.as_str()),
        assignments::is_active.eq(assignment.is_active),
        assignments::offer_issued_at.eq(format_optional_timestamp(assignment.offer_issued_at)?),
        assignments::placement_confirmed_at
            .eq(format_optional_timestamp(assignment.placement_confirmed_at)?),
        assignments::cancelled_at.eq(format_optional_timestamp(assignment.cancelled_at)?),
        assignments::notes.eq(&assignment.notes),
    ))
    .execute(conn)?;

    if rows == 0 {
        return Err(PersistenceError::not_found("assignment", assignment.id));
    }
    Ok(())
}
