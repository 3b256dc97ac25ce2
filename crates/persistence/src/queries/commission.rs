// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Commission agreement and ledger queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use roms_domain::{AgreementStatus, CommissionAgreement, LedgerEntry};

use crate::data_models::{AgreementRow, LedgerRow};
use crate::diesel_schema::{commission_agreements, payment_transactions};
use crate::error::PersistenceError;

/// Retrieves an agreement by id.
///
/// # Errors
///
/// Returns `NotFound` if no such agreement exists.
pub fn get_agreement(
    conn: &mut SqliteConnection,
    agreement_id: i64,
) -> Result<CommissionAgreement, PersistenceError> {
    commission_agreements::table
        .filter(commission_agreements::agreement_id.eq(agreement_id))
        .select(AgreementRow::as_select())
        .first::<AgreementRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("agreement", agreement_id))?
        .into_domain()
}

/// Lists every agreement ever created for an assignment, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_agreements_for_assignment(
    conn: &mut SqliteConnection,
    assignment_id: i64,
) -> Result<Vec<CommissionAgreement>, PersistenceError> {
    commission_agreements::table
        .filter(commission_agreements::assignment_id.eq(assignment_id))
        .order(commission_agreements::agreement_id.asc())
        .select(AgreementRow::as_select())
        .load::<AgreementRow>(conn)?
        .into_iter()
        .map(AgreementRow::into_domain)
        .collect()
}

/// Finds the current (active or completed) agreement of an assignment.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_current_agreement(
    conn: &mut SqliteConnection,
    assignment_id: i64,
) -> Result<Option<CommissionAgreement>, PersistenceError> {
    commission_agreements::table
        .filter(commission_agreements::assignment_id.eq(assignment_id))
        .filter(commission_agreements::status.ne(AgreementStatus::Cancelled.as_str()))
        .select(AgreementRow::as_select())
        .first::<AgreementRow>(conn)
        .optional()?
        .map(AgreementRow::into_domain)
        .transpose()
}

/// Lists the ledger of an agreement in insertion order.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_ledger_entries(
    conn: &mut SqliteConnection,
    agreement_id: i64,
) -> Result<Vec<LedgerEntry>, PersistenceError> {
    payment_transactions::table
        .filter(payment_transactions::agreement_id.eq(agreement_id))
        .order(payment_transactions::transaction_id.asc())
        .select(LedgerRow::as_select())
        .load::<LedgerRow>(conn)?
        .into_iter()
        .map(LedgerRow::into_domain)
        .collect()
}

/// Retrieves a ledger entry by id.
///
/// # Errors
///
/// Returns `NotFound` if no such entry exists.
pub fn get_ledger_entry(
    conn: &mut SqliteConnection,
    entry_id: i64,
) -> Result<LedgerEntry, PersistenceError> {
    payment_transactions::table
        .filter(payment_transactions::transaction_id.eq(entry_id))
        .select(LedgerRow::as_select())
        .first::<LedgerRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("payment transaction", entry_id))?
        .into_domain()
}
