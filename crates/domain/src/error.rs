// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::candidate::CandidateStatus;
use crate::money::Amount;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A stored or submitted enumeration value is not recognised.
    InvalidEnumValue {
        /// The enumeration being parsed (e.g. "candidate status").
        kind: &'static str,
        /// The offending value.
        value: String,
    },
    /// The Workflow Guard rejected a status change.
    IllegalTransition {
        /// The current status.
        from: CandidateStatus,
        /// The requested status.
        to: CandidateStatus,
        /// Why the move is not permitted.
        reason: String,
    },
    /// Candidate reference number is empty or malformed.
    InvalidReferenceNumber(String),
    /// A required name or title is empty.
    InvalidName(String),
    /// A monetary amount is out of range.
    InvalidAmount {
        /// The field carrying the amount.
        field: &'static str,
        /// Description of the problem.
        reason: String,
    },
    /// The required downpayment is larger than the total commission.
    DownpaymentExceedsTotal {
        /// The requested downpayment.
        downpayment: Amount,
        /// The total commission.
        total: Amount,
    },
    /// Currency code is not a three letter ISO code.
    InvalidCurrency(String),
    /// Job order headcount must be at least one.
    InvalidHeadcount {
        /// The requested headcount.
        required: u32,
    },
    /// Ledger arithmetic overflowed.
    AmountOverflow,
    /// The ledger contains entries that cannot be reconciled.
    LedgerInconsistent {
        /// The agreement whose ledger is inconsistent.
        agreement_id: i64,
        /// Description of the inconsistency.
        reason: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEnumValue { kind, value } => {
                write!(f, "Invalid {kind}: '{value}'")
            }
            Self::IllegalTransition { from, to, reason } => {
                write!(f, "Illegal transition from {from} to {to}: {reason}")
            }
            Self::InvalidReferenceNumber(msg) => write!(f, "Invalid reference number: {msg}"),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidAmount { field, reason } => {
                write!(f, "Invalid amount for '{field}': {reason}")
            }
            Self::DownpaymentExceedsTotal { downpayment, total } => write!(
                f,
                "Required downpayment {downpayment} exceeds total commission {total}"
            ),
            Self::InvalidCurrency(code) => {
                write!(f, "Invalid currency code '{code}': expected three letters")
            }
            Self::InvalidHeadcount { required } => {
                write!(f, "Invalid headcount {required}: must be at least 1")
            }
            Self::AmountOverflow => write!(f, "Amount arithmetic overflow"),
            Self::LedgerInconsistent {
                agreement_id,
                reason,
            } => write!(f, "Ledger for agreement {agreement_id} is inconsistent: {reason}"),
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
