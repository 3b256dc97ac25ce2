// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Job order and assignment queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use num_traits::ToPrimitive;
use roms_domain::{Assignment, JobOrder};

use crate::data_models::{AssignmentRow, JobOrderRow};
use crate::diesel_schema::{assignments, job_orders};
use crate::error::PersistenceError;

/// Retrieves a job order by id.
///
/// # Errors
///
/// Returns `NotFound` if no such job order exists.
pub fn get_job_order(
    conn: &mut SqliteConnection,
    job_order_id: i64,
) -> Result<JobOrder, PersistenceError> {
    job_orders::table
        .filter(job_orders::job_order_id.eq(job_order_id))
        .select(JobOrderRow::as_select())
        .first::<JobOrderRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("job order", job_order_id))?
        .into_domain()
}

/// Returns true if a job order already uses `reference`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn job_order_reference_exists(
    conn: &mut SqliteConnection,
    reference: &str,
) -> Result<bool, PersistenceError> {
    let count: i64 = job_orders::table
        .filter(job_orders::reference.eq(reference))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Retrieves an assignment by id.
///
/// # Errors
///
/// Returns `NotFound` if no such assignment exists.
pub fn get_assignment(
    conn: &mut SqliteConnection,
    assignment_id: i64,
) -> Result<Assignment, PersistenceError> {
    assignments::table
        .filter(assignments::assignment_id.eq(assignment_id))
        .select(AssignmentRow::as_select())
        .first::<AssignmentRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("assignment", assignment_id))?
        .into_domain()
}

/// Finds the candidate's active assignment, if there is one.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_active_assignment(
    conn: &mut SqliteConnection,
    candidate_id: i64,
) -> Result<Option<Assignment>, PersistenceError> {
    assignments::table
        .filter(assignments::candidate_id.eq(candidate_id))
        .filter(assignments::is_active.eq(true))
        .select(AssignmentRow::as_select())
        .first::<AssignmentRow>(conn)
        .optional()?
        .map(AssignmentRow::into_domain)
        .transpose()
}

/// Counts the active assignments on a job order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_active_on_job_order(
    conn: &mut SqliteConnection,
    job_order_id: i64,
) -> Result<u32, PersistenceError> {
    let count: i64 = assignments::table
        .filter(assignments::job_order_id.eq(job_order_id))
        .filter(assignments::is_active.eq(true))
        .count()
        .get_result(conn)?;
    count.to_u32().ok_or_else(|| {
        PersistenceError::ReconstructionError(format!("assignment count {count} out of range"))
    })
}
