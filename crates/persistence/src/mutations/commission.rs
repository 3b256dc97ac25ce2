// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Agreement and ledger mutations.
//!
//! Ledger rows are append-only; the schema rejects updates and deletes.

use diesel::prelude::*;
use diesel::SqliteConnection;
use roms_domain::{AgreementStatus, CommissionAgreement, NewAgreement, NewLedgerEntry};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{format_optional_timestamp, format_timestamp};
use crate::diesel_schema::{commission_agreements, payment_transactions};
use crate::error::PersistenceError;

/// Inserts an unsigned, active agreement.
///
/// # Errors
///
/// Returns `UniqueViolation` if the assignment already has a current agreement.
pub fn insert_agreement(
    conn: &mut SqliteConnection,
    agreement: &NewAgreement,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(commission_agreements::table)
        .values((
            commission_agreements::candidate_id.eq(agreement.candidate_id),
            commission_agreements::assignment_id.eq(agreement.assignment_id),
            commission_agreements::total_commission.eq(agreement.total_commission.minor_units()),
            commission_agreements::required_downpayment
                .eq(agreement.required_downpayment.minor_units()),
            commission_agreements::currency.eq(&agreement.currency),
            commission_agreements::signed.eq(false),
            commission_agreements::status.eq(AgreementStatus::Active.as_str()),
            commission_agreements::notes.eq(&agreement.notes),
            commission_agreements::created_at.eq(format_timestamp(agreement.created_at)?),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Writes an agreement's signature, status and notes.
///
/// # Errors
///
/// Returns `NotFound` if the agreement does not exist.
pub fn update_agreement(
    conn: &mut SqliteConnection,
    agreement: &CommissionAgreement,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(
        commission_agreements::table
            .filter(commission_agreements::agreement_id.eq(agreement.id)),
    )
    .set((
        commission_agreements::signed.eq(agreement.signed),
        commission_agreements::signed_at.eq(format_optional_timestamp(agreement.signed_at)?),
        commission_agreements::document_url.eq(&agreement.document_url),
        commission_agreements::status.eq(agreement.status.as_str()),
        commission_agreements::notes.eq(&agreement.notes),
    ))
    .execute(conn)?;

    if rows == 0 {
        return Err(PersistenceError::not_found("agreement", agreement.id));
    }
    Ok(())
}

/// Appends a ledger entry.
///
/// # Errors
///
/// Returns `UniqueViolation` if the entry reverses a debit that is already
/// reversed.
pub fn append_ledger_entry(
    conn: &mut SqliteConnection,
    entry: &NewLedgerEntry,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(payment_transactions::table)
        .values((
            payment_transactions::agreement_id.eq(entry.agreement_id),
            payment_transactions::amount.eq(entry.amount.minor_units()),
            payment_transactions::direction.eq(entry.direction.as_str()),
            payment_transactions::transaction_type.eq(entry.transaction_type.as_str()),
            payment_transactions::payment_method.eq(&entry.payment_method),
            payment_transactions::reference.eq(&entry.reference),
            payment_transactions::description.eq(&entry.description),
            payment_transactions::reverses_transaction_id.eq(entry.reverses_entry_id),
            payment_transactions::reason.eq(&entry.reason),
            payment_transactions::recorded_at.eq(format_timestamp(entry.recorded_at)?),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}
