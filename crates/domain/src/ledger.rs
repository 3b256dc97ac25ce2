// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Commission payment ledger arithmetic and payment gates.
//!
//! The ledger is append-only. A payment is a DEBIT; a reversal is a CREDIT
//! of equal magnitude linked to the DEBIT it cancels. Nothing is ever
//! updated or deleted, so every balance is recomputed from history.

use crate::candidate::CandidateStatus;
use crate::commission::CommissionAgreement;
use crate::error::DomainError;
use crate::money::Amount;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use time::OffsetDateTime;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryDirection {
    /// Payment received.
    Debit,
    /// Reversal of a payment.
    Credit,
}

impl EntryDirection {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "DEBIT",
            Self::Credit => "CREDIT",
        }
    }
}

impl FromStr for EntryDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEBIT" => Ok(Self::Debit),
            "CREDIT" => Ok(Self::Credit),
            _ => Err(DomainError::InvalidEnumValue {
                kind: "entry direction",
                value: s.to_string(),
            }),
        }
    }
}

/// Business classification of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Downpayment,
    Installment,
    Balance,
    Reversal,
}

impl TransactionType {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Downpayment => "DOWNPAYMENT",
            Self::Installment => "INSTALLMENT",
            Self::Balance => "BALANCE",
            Self::Reversal => "REVERSAL",
        }
    }
}

impl FromStr for TransactionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DOWNPAYMENT" => Ok(Self::Downpayment),
            "INSTALLMENT" => Ok(Self::Installment),
            "BALANCE" => Ok(Self::Balance),
            "REVERSAL" => Ok(Self::Reversal),
            _ => Err(DomainError::InvalidEnumValue {
                kind: "transaction type",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub id: i64,
    pub agreement_id: i64,
    /// Always positive; the direction carries the sign.
    pub amount: Amount,
    pub direction: EntryDirection,
    pub transaction_type: TransactionType,
    pub payment_method: Option<String>,
    pub reference: Option<String>,
    pub description: Option<String>,
    /// Set on CREDIT entries: the DEBIT being reversed.
    pub reverses_entry_id: Option<i64>,
    pub reason: Option<String>,
    pub recorded_at: OffsetDateTime,
}

/// A ledger entry that has not yet been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLedgerEntry {
    pub agreement_id: i64,
    pub amount: Amount,
    pub direction: EntryDirection,
    pub transaction_type: TransactionType,
    pub payment_method: Option<String>,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub reverses_entry_id: Option<i64>,
    pub reason: Option<String>,
    pub recorded_at: OffsetDateTime,
}

/// Aggregated payment position of one agreement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub agreement_id: i64,
    pub candidate_id: i64,
    pub assignment_id: i64,
    pub currency: String,
    pub total_commission: Amount,
    pub required_downpayment: Amount,
    /// Sum of DEBITs minus sum of CREDITs.
    pub total_paid: Amount,
    /// Net amount paid through DOWNPAYMENT entries.
    pub downpayment_paid: Amount,
    pub outstanding_balance: Amount,
    pub downpayment_complete: bool,
    pub full_payment_complete: bool,
    /// Ordered by timestamp ascending, then id.
    pub history: Vec<LedgerEntry>,
}

/// Returns the CREDIT entry reversing `entry_id`, if any.
#[must_use]
pub fn find_reversal(entries: &[LedgerEntry], entry_id: i64) -> Option<&LedgerEntry> {
    entries
        .iter()
        .find(|entry| entry.reverses_entry_id == Some(entry_id))
}

/// Computes the statement of an agreement from its ledger entries.
///
/// Entries belonging to other agreements are ignored.
///
/// # Errors
///
/// Returns an error if the arithmetic overflows, a CREDIT does not reference
/// a DEBIT of the same agreement, or the net paid amount is negative.
pub fn compute_statement(
    agreement: &CommissionAgreement,
    entries: &[LedgerEntry],
) -> Result<Statement, DomainError> {
    let mut history: Vec<LedgerEntry> = entries
        .iter()
        .filter(|entry| entry.agreement_id == agreement.id)
        .cloned()
        .collect();
    history.sort_by(|a, b| a.recorded_at.cmp(&b.recorded_at).then(a.id.cmp(&b.id)));

    let types_by_id: HashMap<i64, TransactionType> = history
        .iter()
        .map(|entry| (entry.id, entry.transaction_type))
        .collect();

    let mut total_paid: Amount = Amount::ZERO;
    let mut downpayment_paid: Amount = Amount::ZERO;
    for entry in &history {
        match entry.direction {
            EntryDirection::Debit => {
                total_paid = total_paid.checked_add(entry.amount)?;
                if entry.transaction_type == TransactionType::Downpayment {
                    downpayment_paid = downpayment_paid.checked_add(entry.amount)?;
                }
            }
            EntryDirection::Credit => {
                let reversed_type: TransactionType = entry
                    .reverses_entry_id
                    .and_then(|id| types_by_id.get(&id).copied())
                    .ok_or_else(|| DomainError::LedgerInconsistent {
                        agreement_id: agreement.id,
                        reason: format!("credit entry {} has no matching debit", entry.id),
                    })?;
                total_paid = total_paid.checked_sub(entry.amount)?;
                if reversed_type == TransactionType::Downpayment {
                    downpayment_paid = downpayment_paid.checked_sub(entry.amount)?;
                }
            }
        }
    }

    if total_paid < Amount::ZERO {
        return Err(DomainError::LedgerInconsistent {
            agreement_id: agreement.id,
            reason: format!("net paid amount is negative ({total_paid})"),
        });
    }

    Ok(Statement {
        agreement_id: agreement.id,
        candidate_id: agreement.candidate_id,
        assignment_id: agreement.assignment_id,
        currency: agreement.currency.clone(),
        total_commission: agreement.total_commission,
        required_downpayment: agreement.required_downpayment,
        total_paid,
        downpayment_paid,
        outstanding_balance: agreement.total_commission.checked_sub(total_paid)?,
        downpayment_complete: total_paid >= agreement.required_downpayment,
        full_payment_complete: total_paid >= agreement.total_commission,
        history,
    })
}

/// A commission condition guarding a workflow transition.
///
/// These gates are fixed policy and not configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentGate {
    /// Downpayment must be complete.
    Downpayment,
    /// Total commission must be paid.
    FullPayment,
}

impl PaymentGate {
    /// Returns the gate guarding entry into `target`, if any.
    #[must_use]
    pub const fn for_target(target: CandidateStatus) -> Option<Self> {
        match target {
            CandidateStatus::VisaProcessing => Some(Self::Downpayment),
            CandidateStatus::Placed => Some(Self::FullPayment),
            CandidateStatus::ApplicationSubmitted
            | CandidateStatus::UnderReview
            | CandidateStatus::DocumentsInsufficient
            | CandidateStatus::DocumentsApproved
            | CandidateStatus::InterviewScheduled
            | CandidateStatus::InterviewPassed
            | CandidateStatus::MedicalPending
            | CandidateStatus::MedicalPassed
            | CandidateStatus::OfferIssued
            | CandidateStatus::OfferAccepted
            | CandidateStatus::DeploymentPending
            | CandidateStatus::Rejected
            | CandidateStatus::Withdrawn => None,
        }
    }

    /// Checks the gate against a statement.
    ///
    /// A missing statement means no agreement exists, which never passes.
    ///
    /// # Errors
    ///
    /// Returns the unmet condition.
    pub fn check(self, statement: Option<&Statement>) -> Result<(), PaymentGateFailure> {
        let Some(statement) = statement else {
            return Err(PaymentGateFailure::NoAgreement);
        };
        match self {
            Self::Downpayment if !statement.downpayment_complete => {
                Err(PaymentGateFailure::DownpaymentIncomplete {
                    paid: statement.total_paid,
                    required: statement.required_downpayment,
                })
            }
            Self::FullPayment if !statement.full_payment_complete => {
                Err(PaymentGateFailure::FullPaymentIncomplete {
                    paid: statement.total_paid,
                    total: statement.total_commission,
                })
            }
            Self::Downpayment | Self::FullPayment => Ok(()),
        }
    }
}

/// The specific unmet commission condition behind a blocked transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentGateFailure {
    /// The candidate has no active assignment.
    NoActiveAssignment,
    /// The assignment has no current commission agreement.
    NoAgreement,
    /// Downpayment not yet complete.
    DownpaymentIncomplete {
        /// Net amount paid so far.
        paid: Amount,
        /// Required downpayment.
        required: Amount,
    },
    /// Commission not fully paid.
    FullPaymentIncomplete {
        /// Net amount paid so far.
        paid: Amount,
        /// Total commission.
        total: Amount,
    },
}

impl std::fmt::Display for PaymentGateFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoActiveAssignment => write!(f, "no active assignment"),
            Self::NoAgreement => write!(f, "no commission agreement"),
            Self::DownpaymentIncomplete { paid, required } => {
                write!(f, "downpayment incomplete: {paid} of {required} paid")
            }
            Self::FullPaymentIncomplete { paid, total } => {
                write!(f, "full payment incomplete: {paid} of {total} paid")
            }
        }
    }
}
