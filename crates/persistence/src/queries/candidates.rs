// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Candidate and document queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use roms_domain::{Candidate, CandidateDocument};

use crate::data_models::{CandidateRow, DocumentRow};
use crate::diesel_schema::{candidate_documents, candidates};
use crate::error::PersistenceError;

/// Retrieves a candidate by id.
///
/// # Errors
///
/// Returns `NotFound` if no such candidate exists.
pub fn get_candidate(
    conn: &mut SqliteConnection,
    candidate_id: i64,
) -> Result<Candidate, PersistenceError> {
    candidates::table
        .filter(candidates::candidate_id.eq(candidate_id))
        .select(CandidateRow::as_select())
        .first::<CandidateRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("candidate", candidate_id))?
        .into_domain()
}

/// Returns true if a candidate already uses `reference_number`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn candidate_reference_exists(
    conn: &mut SqliteConnection,
    reference_number: &str,
) -> Result<bool, PersistenceError> {
    let count: i64 = candidates::table
        .filter(candidates::reference_number.eq(reference_number))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Lists every document on file for a candidate, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_documents(
    conn: &mut SqliteConnection,
    candidate_id: i64,
) -> Result<Vec<CandidateDocument>, PersistenceError> {
    candidate_documents::table
        .filter(candidate_documents::candidate_id.eq(candidate_id))
        .order(candidate_documents::document_id.asc())
        .select(DocumentRow::as_select())
        .load::<DocumentRow>(conn)?
        .into_iter()
        .map(DocumentRow::into_domain)
        .collect()
}

/// Retrieves a document by id.
///
/// # Errors
///
/// Returns `NotFound` if no such document exists.
pub fn get_document(
    conn: &mut SqliteConnection,
    document_id: i64,
) -> Result<CandidateDocument, PersistenceError> {
    candidate_documents::table
        .filter(candidate_documents::document_id.eq(document_id))
        .select(DocumentRow::as_select())
        .first::<DocumentRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("document", document_id))?
        .into_domain()
}
