// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Commission agreements between the agency and a candidate.

use crate::error::DomainError;
use crate::money::Amount;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Currency used when an agreement does not name one.
pub const DEFAULT_CURRENCY: &str = "KES";

/// Agreement lifecycle states.
///
/// `Active` moves to `Completed` when the outstanding balance reaches zero,
/// or to `Cancelled` on explicit cancellation. Both are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgreementStatus {
    Active,
    Completed,
    Cancelled,
}

impl AgreementStatus {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Returns true if the status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl FromStr for AgreementStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidEnumValue {
                kind: "agreement status",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A commission contract tied to one assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommissionAgreement {
    pub id: i64,
    pub candidate_id: i64,
    pub assignment_id: i64,
    pub total_commission: Amount,
    /// Never exceeds `total_commission`.
    pub required_downpayment: Amount,
    pub currency: String,
    pub signed: bool,
    pub signed_at: Option<OffsetDateTime>,
    pub document_url: Option<String>,
    pub status: AgreementStatus,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

impl CommissionAgreement {
    /// Returns true if this agreement counts as the assignment's current one.
    ///
    /// Cancelled agreements are history; active and completed ones are current.
    #[must_use]
    pub const fn is_current(&self) -> bool {
        matches!(
            self.status,
            AgreementStatus::Active | AgreementStatus::Completed
        )
    }
}

/// An agreement that has not yet been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAgreement {
    pub candidate_id: i64,
    pub assignment_id: i64,
    pub total_commission: Amount,
    pub required_downpayment: Amount,
    pub currency: String,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Validates agreement amounts and normalises the currency code.
///
/// # Arguments
///
/// * `total` - The total commission
/// * `downpayment` - The downpayment required before visa processing
/// * `currency` - Optional ISO currency code; defaults to `KES`
///
/// # Returns
///
/// The upper-cased currency code to store.
///
/// # Errors
///
/// Returns an error if either amount is not positive, the downpayment exceeds
/// the total, or the currency code is not three ASCII letters.
pub fn validate_agreement_terms(
    total: Amount,
    downpayment: Amount,
    currency: Option<&str>,
) -> Result<String, DomainError> {
    if !total.is_positive() {
        return Err(DomainError::InvalidAmount {
            field: "totalCommissionAmount",
            reason: format!("must be greater than zero, got {total}"),
        });
    }
    if !downpayment.is_positive() {
        return Err(DomainError::InvalidAmount {
            field: "requiredDownpaymentAmount",
            reason: format!("must be greater than zero, got {downpayment}"),
        });
    }
    if downpayment > total {
        return Err(DomainError::DownpaymentExceedsTotal { downpayment, total });
    }

    let code: String = currency
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .unwrap_or(DEFAULT_CURRENCY)
        .to_ascii_uppercase();
    if code.len() != 3 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(DomainError::InvalidCurrency(code));
    }

    Ok(code)
}
