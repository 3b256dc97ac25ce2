// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Candidate and document mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use roms_domain::{Candidate, CandidateStatus, MedicalStatus, NewCandidate, NewCandidateDocument};
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{format_date, format_timestamp};
use crate::diesel_schema::{candidate_documents, candidates};
use crate::error::PersistenceError;

/// Inserts a newly registered candidate at version 0.
///
/// # Errors
///
/// Returns `UniqueViolation` if the reference number is taken.
pub fn insert_candidate(
    conn: &mut SqliteConnection,
    candidate: &NewCandidate,
) -> Result<i64, PersistenceError> {
    let created_at: String = format_timestamp(candidate.created_at)?;

    diesel::insert_into(candidates::table)
        .values((
            candidates::reference_number.eq(&candidate.reference_number),
            candidates::full_name.eq(&candidate.full_name),
            candidates::current_status.eq(CandidateStatus::ApplicationSubmitted.as_str()),
            candidates::medical_status.eq(MedicalStatus::Pending.as_str()),
            candidates::version.eq(0_i64),
            candidates::created_at.eq(&created_at),
            candidates::updated_at.eq(&created_at),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Writes a candidate's status, medical status, interview date and version.
///
/// The row is only updated while its stored version still equals
/// `expected_version`.
///
/// # Errors
///
/// Returns `VersionConflict` if another writer got there first.
pub fn update_candidate(
    conn: &mut SqliteConnection,
    candidate: &Candidate,
    expected_version: i64,
) -> Result<(), PersistenceError> {
    let updated_at: String = format_timestamp(candidate.updated_at)?;
    let interview_date: Option<String> = candidate.interview_date.map(format_date).transpose()?;

    let rows: usize = diesel::update(
        candidates::table
            .filter(candidates::candidate_id.eq(candidate.id))
            .filter(candidates::version.eq(expected_version)),
    )
    .set((
        candidates::current_status.eq(candidate.status.as_str()),
        candidates::medical_status.eq(candidate.medical_status.as_str()),
        candidates::interview_date.eq(interview_date),
        candidates::version.eq(candidate.version),
        candidates::updated_at.eq(updated_at),
    ))
    .execute(conn)?;

    if rows == 0 {
        debug!(
            candidate_id = candidate.id,
            expected_version, "Candidate version check failed"
        );
        return Err(PersistenceError::VersionConflict {
            candidate_id: candidate.id,
            expected_version,
        });
    }
    Ok(())
}

/// Inserts a document record.
///
/// # Errors
///
/// Returns an error if the candidate does not exist or the insert fails.
pub fn insert_document(
    conn: &mut SqliteConnection,
    document: &NewCandidateDocument,
) -> Result<i64, PersistenceError> {
    let expiry_date: Option<String> = document.expiry_date.map(format_date).transpose()?;

    diesel::insert_into(candidate_documents::table)
        .values((
            candidate_documents::candidate_id.eq(document.candidate_id),
            candidate_documents::document_type.eq(document.document_type.as_str()),
            candidate_documents::verified.eq(document.verified),
            candidate_documents::expiry_date.eq(expiry_date),
            candidate_documents::file_reference.eq(&document.file_reference),
            candidate_documents::uploaded_at.eq(format_timestamp(document.uploaded_at)?),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Marks a document verified.
///
/// # Errors
///
/// Returns `NotFound` if the document does not exist.
pub fn mark_document_verified(
    conn: &mut SqliteConnection,
    document_id: i64,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(
        candidate_documents::table.filter(candidate_documents::document_id.eq(document_id)),
    )
    .set(candidate_documents::verified.eq(true))
    .execute(conn)?;

    if rows == 0 {
        return Err(PersistenceError::not_found("document", document_id));
    }
    Ok(())
}
