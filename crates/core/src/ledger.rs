// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::LedgerCommand;
use crate::error::CoreError;
use crate::state::{Change, LedgerContext, TransitionResult};
use roms_audit::{Action, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};
use roms_domain::{
    AgreementStatus, Amount, CommissionAgreement, EntryDirection, LedgerEntry, NewLedgerEntry,
    Statement, TransactionType, compute_statement, find_reversal,
};
use time::OffsetDateTime;

/// Applies a ledger command.
///
/// The ledger is append-only. Payments are debits; a reversal appends a
/// credit pointing at the debit it cancels. Each payment is checked against
/// the agreement's statement as of the moment it is recorded.
///
/// # Arguments
///
/// * `context` - The agreement and all of its entries
/// * `command` - The command to apply
/// * `now` - The time of the request, used as the entry timestamp
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - The agreement is not active
/// - The amount is not positive or would overpay the agreement
/// - A downpayment exceeds what remains of the required downpayment
/// - An installment or balance is recorded before any downpayment
/// - A balance payment does not settle the agreement exactly
/// - The entry to reverse is missing, a credit, or already reversed
pub fn apply_ledger(
    context: &LedgerContext,
    command: LedgerCommand,
    now: OffsetDateTime,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    match command {
        LedgerCommand::RecordPayment {
            transaction_type,
            direction,
            amount,
            payment_method,
            reference,
            description,
        } => {
            let agreement: &CommissionAgreement = &context.agreement;
            let statement: Statement = compute_statement(agreement, &context.entries)?;
            check_payment(agreement, &statement, transaction_type, direction, amount)?;

            let entry: NewLedgerEntry = NewLedgerEntry {
                agreement_id: agreement.id,
                amount,
                direction: EntryDirection::Debit,
                transaction_type,
                payment_method: non_blank(payment_method),
                reference: non_blank(reference),
                description: non_blank(description),
                reverses_entry_id: None,
                reason: None,
                recorded_at: now,
            };
            let paid_after: Amount = statement.total_paid.checked_add(amount)?;

            let mut changes: Vec<Change> = vec![Change::LedgerEntryAppended(entry)];
            let mut status_after: AgreementStatus = agreement.status;
            if paid_after == agreement.total_commission {
                let mut completed: CommissionAgreement = agreement.clone();
                completed.status = AgreementStatus::Completed;
                status_after = completed.status;
                changes.push(Change::AgreementUpdated(completed));
            }

            let action: Action = Action::new(
                String::from("RecordPayment"),
                Some(format!(
                    "{} {} {amount}",
                    transaction_type.as_str(),
                    agreement.currency
                )),
            );
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                ledger_snapshot(statement.total_paid, agreement.status),
                ledger_snapshot(paid_after, status_after),
                scope(agreement),
            );

            Ok(TransitionResult::new(changes, audit_event))
        }
        LedgerCommand::Reverse { entry_id, reason } => {
            reverse(context, entry_id, &reason, now, actor, cause)
        }
    }
}

fn check_payment(
    agreement: &CommissionAgreement,
    statement: &Statement,
    transaction_type: TransactionType,
    direction: EntryDirection,
    amount: Amount,
) -> Result<(), CoreError> {
    if direction == EntryDirection::Credit {
        return Err(CoreError::validation(
            "direction",
            "credits can only be recorded by reversing a payment",
        ));
    }
    if transaction_type == TransactionType::Reversal {
        return Err(CoreError::validation(
            "transactionType",
            "reversals are recorded through the reversal operation",
        ));
    }
    if !amount.is_positive() {
        return Err(CoreError::validation(
            "amount",
            format!("must be greater than zero, got {amount}"),
        ));
    }
    if agreement.status != AgreementStatus::Active {
        return Err(CoreError::validation(
            "agreementId",
            format!(
                "agreement {} is {} and does not accept payments",
                agreement.id, agreement.status
            ),
        ));
    }
    if amount > statement.outstanding_balance {
        return Err(CoreError::validation(
            "amount",
            format!(
                "payment of {amount} exceeds outstanding balance of {}",
                statement.outstanding_balance
            ),
        ));
    }

    match transaction_type {
        TransactionType::Downpayment => {
            let remaining: Amount = agreement
                .required_downpayment
                .checked_sub(statement.downpayment_paid)?;
            if amount > remaining {
                return Err(CoreError::validation(
                    "amount",
                    format!("downpayment exceeds remaining requirement: {amount} of {remaining}"),
                ));
            }
        }
        TransactionType::Installment | TransactionType::Balance
            if !statement.downpayment_paid.is_positive() =>
        {
            return Err(CoreError::validation(
                "transactionType",
                "a downpayment must be recorded before installments or balance payments",
            ));
        }
        TransactionType::Balance if amount != statement.outstanding_balance => {
            return Err(CoreError::validation(
                "amount",
                format!(
                    "balance payment must equal the outstanding balance of {}",
                    statement.outstanding_balance
                ),
            ));
        }
        TransactionType::Installment | TransactionType::Balance | TransactionType::Reversal => {}
    }
    Ok(())
}

fn reverse(
    context: &LedgerContext,
    entry_id: i64,
    reason: &str,
    now: OffsetDateTime,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let agreement: &CommissionAgreement = &context.agreement;
    let original: &LedgerEntry = context
        .entries
        .iter()
        .find(|entry| entry.id == entry_id)
        .ok_or_else(|| CoreError::not_found("ledger entry", entry_id))?;

    if original.direction == EntryDirection::Credit
        || original.transaction_type == TransactionType::Reversal
    {
        return Err(CoreError::validation(
            "entryId",
            format!("entry {entry_id} is itself a reversal and cannot be reversed"),
        ));
    }
    if let Some(existing) = find_reversal(&context.entries, entry_id) {
        return Err(CoreError::AlreadyReversed {
            entry_id,
            reversal_id: existing.id,
        });
    }
    if agreement.status != AgreementStatus::Active {
        return Err(CoreError::validation(
            "agreementId",
            format!(
                "agreement {} is {} and its ledger is closed",
                agreement.id, agreement.status
            ),
        ));
    }
    if reason.trim().is_empty() {
        return Err(CoreError::validation(
            "reason",
            "a reversal reason is required",
        ));
    }

    let statement: Statement = compute_statement(agreement, &context.entries)?;
    let paid_after: Amount = statement.total_paid.checked_sub(original.amount)?;

    let credit: NewLedgerEntry = NewLedgerEntry {
        agreement_id: agreement.id,
        amount: original.amount,
        direction: EntryDirection::Credit,
        transaction_type: TransactionType::Reversal,
        payment_method: original.payment_method.clone(),
        reference: original.reference.clone(),
        description: Some(format!("Reversal of entry {entry_id}")),
        reverses_entry_id: Some(entry_id),
        reason: Some(reason.trim().to_string()),
        recorded_at: now,
    };

    let action: Action = Action::new(
        String::from("ReversePayment"),
        Some(format!(
            "Reversed {} {} {} (entry {entry_id}): {}",
            original.transaction_type.as_str(),
            agreement.currency,
            original.amount,
            reason.trim()
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        ledger_snapshot(statement.total_paid, agreement.status),
        ledger_snapshot(paid_after, agreement.status),
        scope(agreement),
    );

    Ok(TransitionResult::new(
        vec![Change::LedgerEntryAppended(credit)],
        audit_event,
    ))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn ledger_snapshot(total_paid: Amount, status: AgreementStatus) -> StateSnapshot {
    StateSnapshot::new(format!("total_paid={total_paid},status={status}"))
}

const fn scope(agreement: &CommissionAgreement) -> AuditScope {
    AuditScope::candidate(agreement.candidate_id)
        .with_assignment(agreement.assignment_id)
        .with_agreement(agreement.id)
}
