// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the recruitment operations management system.
//!
//! Candidates, documents, job orders, assignments, commission agreements,
//! the payment ledger and the audit trail are stored in `SQLite` through
//! Diesel. Migrations are embedded and applied on startup.
//!
//! ## Serialization
//!
//! Every mutating operation runs inside [`Persistence::transaction`], which
//! opens a `BEGIN IMMEDIATE` transaction. The write lock is taken before the
//! facts are read, so two requests can never both decide on the same stale
//! balance or status. Candidate writes are additionally guarded by the
//! `version` column.
//!
//! ## Ledger immutability
//!
//! Ledger rows cannot be updated or deleted; triggers in the schema abort
//! any attempt. A debit can be reversed at most once, enforced by a unique
//! index on the reversed entry id.
//!
//! ## Testing
//!
//! [`Persistence::new_in_memory`] gives every caller its own uniquely named
//! shared-cache in-memory database.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::{Connection, SqliteConnection};
use roms::{AgreementContext, AssignmentContext, CandidateContext, LedgerContext, TransitionResult};
use roms_domain::{
    Assignment, Candidate, CandidateDocument, CommissionAgreement, JobOrder, LedgerEntry,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;
use tracing::warn;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use mutations::PersistTransitionResult;
pub use queries::AuditRecord;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Carries either a database failure or the caller's own error out of a
/// Diesel transaction closure.
enum TxFailure<E> {
    Database(diesel::result::Error),
    Operation(E),
}

impl<E> From<diesel::result::Error> for TxFailure<E> {
    fn from(err: diesel::result::Error) -> Self {
        Self::Database(err)
    }
}

impl<E: From<PersistenceError>> TxFailure<E> {
    fn into_error(self) -> E {
        match self {
            Self::Operation(err) => err,
            Self::Database(err) => E::from(PersistenceError::from(err)),
        }
    }
}

/// Owner of the database connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:roms_memdb_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError(String::from("Invalid database path"))
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Runs `operation` inside a `BEGIN IMMEDIATE` transaction.
    ///
    /// The transaction commits when `operation` returns `Ok` and rolls back
    /// otherwise, so a failed command leaves no partial writes.
    ///
    /// # Errors
    ///
    /// Returns the operation's error, or a persistence error converted into
    /// `E` if the transaction itself fails.
    pub fn transaction<T, E, F>(&mut self, operation: F) -> Result<T, E>
    where
        F: FnOnce(&mut Store<'_>) -> Result<T, E>,
        E: From<PersistenceError>,
    {
        self.conn
            .immediate_transaction(|conn| {
                let mut store: Store<'_> = Store { conn };
                operation(&mut store).map_err(TxFailure::Operation)
            })
            .map_err(|failure: TxFailure<E>| {
                if let TxFailure::Database(err) = &failure {
                    warn!(error = %err, "Transaction failed");
                }
                failure.into_error()
            })
    }

    /// Runs read-only `operation` inside a deferred transaction.
    ///
    /// # Errors
    ///
    /// Returns the operation's error, or a persistence error converted into
    /// `E` if the transaction itself fails.
    pub fn read<T, E, F>(&mut self, operation: F) -> Result<T, E>
    where
        F: FnOnce(&mut Store<'_>) -> Result<T, E>,
        E: From<PersistenceError>,
    {
        self.conn
            .transaction(|conn| {
                let mut store: Store<'_> = Store { conn };
                operation(&mut store).map_err(TxFailure::Operation)
            })
            .map_err(TxFailure::into_error)
    }
}

/// A connection borrowed for the duration of one transaction.
pub struct Store<'a> {
    conn: &'a mut SqliteConnection,
}

impl Store<'_> {
    // ========================================================================
    // Fact loading
    // ========================================================================

    /// Loads everything a candidate command is decided on.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the candidate does not exist.
    pub fn candidate_context(
        &mut self,
        candidate_id: i64,
    ) -> Result<CandidateContext, PersistenceError> {
        queries::context::load_candidate_context(self.conn, candidate_id)
    }

    /// Loads the facts for assigning a candidate to a job order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the candidate or job order does not exist.
    pub fn new_assignment_context(
        &mut self,
        candidate_id: i64,
        job_order_id: i64,
    ) -> Result<AssignmentContext, PersistenceError> {
        queries::context::load_new_assignment_context(self.conn, candidate_id, job_order_id)
    }

    /// Loads the facts for a command on an existing assignment.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the assignment does not exist.
    pub fn assignment_context(
        &mut self,
        assignment_id: i64,
    ) -> Result<AssignmentContext, PersistenceError> {
        queries::context::load_assignment_context(self.conn, assignment_id)
    }

    /// Loads an assignment with all of its agreements.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the assignment does not exist.
    pub fn agreement_context(
        &mut self,
        assignment_id: i64,
    ) -> Result<AgreementContext, PersistenceError> {
        queries::context::load_agreement_context(self.conn, assignment_id)
    }

    /// Loads the agreement context owning `agreement_id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the agreement does not exist.
    pub fn agreement_context_for(
        &mut self,
        agreement_id: i64,
    ) -> Result<AgreementContext, PersistenceError> {
        queries::context::load_agreement_context_for(self.conn, agreement_id)
    }

    /// Loads an agreement with its ledger.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the agreement does not exist.
    pub fn ledger_context(&mut self, agreement_id: i64) -> Result<LedgerContext, PersistenceError> {
        queries::context::load_ledger_context(self.conn, agreement_id)
    }

    /// Loads the ledger context owning the entry `entry_id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entry does not exist.
    pub fn ledger_context_for_entry(
        &mut self,
        entry_id: i64,
    ) -> Result<LedgerContext, PersistenceError> {
        queries::context::load_ledger_context_for_entry(self.conn, entry_id)
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Retrieves a candidate.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the candidate does not exist.
    pub fn candidate(&mut self, candidate_id: i64) -> Result<Candidate, PersistenceError> {
        queries::candidates::get_candidate(self.conn, candidate_id)
    }

    /// Returns true if a candidate already uses `reference_number`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn candidate_reference_exists(
        &mut self,
        reference_number: &str,
    ) -> Result<bool, PersistenceError> {
        queries::candidates::candidate_reference_exists(self.conn, reference_number)
    }

    /// Lists a candidate's documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn documents(
        &mut self,
        candidate_id: i64,
    ) -> Result<Vec<CandidateDocument>, PersistenceError> {
        queries::candidates::list_documents(self.conn, candidate_id)
    }

    /// Retrieves a document.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the document does not exist.
    pub fn document(&mut self, document_id: i64) -> Result<CandidateDocument, PersistenceError> {
        queries::candidates::get_document(self.conn, document_id)
    }

    /// Retrieves a job order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the job order does not exist.
    pub fn job_order(&mut self, job_order_id: i64) -> Result<JobOrder, PersistenceError> {
        queries::assignments::get_job_order(self.conn, job_order_id)
    }

    /// Returns true if a job order already uses `reference`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn job_order_reference_exists(
        &mut self,
        reference: &str,
    ) -> Result<bool, PersistenceError> {
        queries::assignments::job_order_reference_exists(self.conn, reference)
    }

    /// Retrieves an assignment.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the assignment does not exist.
    pub fn assignment(&mut self, assignment_id: i64) -> Result<Assignment, PersistenceError> {
        queries::assignments::get_assignment(self.conn, assignment_id)
    }

    /// Finds the candidate's active assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn active_assignment(
        &mut self,
        candidate_id: i64,
    ) -> Result<Option<Assignment>, PersistenceError> {
        queries::assignments::find_active_assignment(self.conn, candidate_id)
    }

    /// Retrieves an agreement.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the agreement does not exist.
    pub fn agreement(
        &mut self,
        agreement_id: i64,
    ) -> Result<CommissionAgreement, PersistenceError> {
        queries::commission::get_agreement(self.conn, agreement_id)
    }

    /// Finds the current agreement of an assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn current_agreement(
        &mut self,
        assignment_id: i64,
    ) -> Result<Option<CommissionAgreement>, PersistenceError> {
        queries::commission::find_current_agreement(self.conn, assignment_id)
    }

    /// Lists an agreement's ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn ledger_entries(
        &mut self,
        agreement_id: i64,
    ) -> Result<Vec<LedgerEntry>, PersistenceError> {
        queries::commission::list_ledger_entries(self.conn, agreement_id)
    }

    /// Retrieves a ledger entry.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entry does not exist.
    pub fn ledger_entry(&mut self, entry_id: i64) -> Result<LedgerEntry, PersistenceError> {
        queries::commission::get_ledger_entry(self.conn, entry_id)
    }

    /// Retrieves an audit event.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the event does not exist.
    pub fn audit_event(&mut self, event_id: i64) -> Result<AuditRecord, PersistenceError> {
        queries::audit::get_audit_event(self.conn, event_id)
    }

    /// Lists the audit events scoped to a candidate.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn candidate_audit_events(
        &mut self,
        candidate_id: i64,
    ) -> Result<Vec<AuditRecord>, PersistenceError> {
        queries::audit::list_candidate_audit_events(self.conn, candidate_id)
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Persists a transition's changes and its audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails. The enclosing transaction then
    /// rolls back every change of the transition.
    pub fn persist_transition(
        &mut self,
        result: &TransitionResult,
    ) -> Result<PersistTransitionResult, PersistenceError> {
        mutations::persist_transition(self.conn, result, OffsetDateTime::now_utc())
    }
}
