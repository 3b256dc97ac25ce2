// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use roms::CoreError;
use roms_domain::DomainError;
use roms_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Malformed or out-of-range input.
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },
    /// The Workflow Guard rejected the requested status change.
    IllegalTransition {
        /// The candidate's current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the move is not permitted.
        reason: String,
    },
    /// An unmet commission requirement blocks the request.
    PaymentGate {
        /// The status the candidate was moving to.
        target: String,
        /// The specific unmet condition.
        message: String,
    },
    /// Uniqueness or active-state violation.
    Conflict {
        /// The resource in conflict.
        resource: String,
        /// A description of the conflict.
        message: String,
    },
    /// The job order has no headcount left.
    Capacity {
        /// The job order.
        job_order_id: i64,
        /// Positions already filled.
        filled: u32,
        /// Positions required.
        required: u32,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A description of what was not found.
        message: String,
    },
    /// The payment has already been reversed.
    AlreadyReversed {
        /// The payment that was targeted.
        transaction_id: i64,
        /// The existing reversal.
        reversal_id: i64,
    },
    /// The agreement has already been signed.
    AlreadySigned {
        /// The agreement.
        agreement_id: i64,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the error.
        message: String,
    },
}

impl ApiError {
    /// A stable machine-readable name for the error category.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION",
            Self::IllegalTransition { .. } => "ILLEGAL_TRANSITION",
            Self::PaymentGate { .. } => "PAYMENT_GATE",
            Self::Conflict { .. } => "CONFLICT",
            Self::Capacity { .. } => "CAPACITY",
            Self::ResourceNotFound { .. } => "NOT_FOUND",
            Self::AlreadyReversed { .. } => "ALREADY_REVERSED",
            Self::AlreadySigned { .. } => "ALREADY_SIGNED",
            Self::Internal { .. } => "INTERNAL",
        }
    }

    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn not_found(resource_type: &str, message: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::IllegalTransition { from, to, reason } => {
                write!(f, "Cannot move from {from} to {to}: {reason}")
            }
            Self::PaymentGate { target, message } => {
                write!(f, "Payment required before {target}: {message}")
            }
            Self::Conflict { resource, message } => {
                write!(f, "Conflict on {resource}: {message}")
            }
            Self::Capacity {
                job_order_id,
                filled,
                required,
            } => write!(
                f,
                "Job order {job_order_id} is at capacity ({filled} of {required} filled)"
            ),
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::AlreadyReversed {
                transaction_id,
                reversal_id,
            } => write!(
                f,
                "Payment {transaction_id} has already been reversed by payment {reversal_id}"
            ),
            Self::AlreadySigned { agreement_id } => {
                write!(f, "Agreement {agreement_id} is already signed")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound { resource, id } => {
                Self::not_found(resource, format!("{resource} {id} does not exist"))
            }
            PersistenceError::UniqueViolation(message) => Self::Conflict {
                resource: String::from("record"),
                message,
            },
            PersistenceError::VersionConflict {
                candidate_id,
                expected_version,
            } => Self::Conflict {
                resource: String::from("candidate"),
                message: format!(
                    "Candidate {candidate_id} changed since version {expected_version} was read"
                ),
            },
            other => Self::Internal {
                message: other.to_string(),
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidEnumValue { kind, value } => {
            ApiError::validation(kind, format!("'{value}' is not a recognised {kind}"))
        }
        DomainError::IllegalTransition { from, to, reason } => ApiError::IllegalTransition {
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
            reason,
        },
        DomainError::InvalidReferenceNumber(msg) => ApiError::validation("referenceNumber", msg),
        DomainError::InvalidName(msg) => ApiError::validation("name", msg),
        DomainError::InvalidAmount { field, reason } => ApiError::validation(field, reason),
        DomainError::DownpaymentExceedsTotal { downpayment, total } => ApiError::validation(
            "requiredDownpaymentAmount",
            format!("Required downpayment {downpayment} exceeds total commission {total}"),
        ),
        DomainError::InvalidCurrency(currency) => ApiError::validation(
            "currency",
            format!("'{currency}' is not a three letter currency code"),
        ),
        DomainError::InvalidHeadcount { required } => ApiError::validation(
            "headcountRequired",
            format!("Headcount must be at least 1, got {required}"),
        ),
        DomainError::AmountOverflow => {
            ApiError::validation("amount", "Amount is too large to record")
        }
        DomainError::LedgerInconsistent {
            agreement_id,
            reason,
        } => ApiError::Internal {
            message: format!("Ledger of agreement {agreement_id} is inconsistent: {reason}"),
        },
        DomainError::DateArithmeticOverflow { operation } => ApiError::validation(
            "date",
            format!("Date arithmetic overflow while {operation}"),
        ),
        DomainError::DateParseError { date_string, error } => ApiError::validation(
            "date",
            format!("Failed to parse date '{date_string}': {error}"),
        ),
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::PaymentGate { target, failure } => ApiError::PaymentGate {
            target: target.as_str().to_string(),
            message: failure.to_string(),
        },
        CoreError::Validation { field, message } => ApiError::Validation { field, message },
        CoreError::Conflict { resource, message } => ApiError::Conflict { resource, message },
        CoreError::Capacity {
            job_order_id,
            filled,
            required,
        } => ApiError::Capacity {
            job_order_id,
            filled,
            required,
        },
        CoreError::NotFound { resource, id } => ApiError::ResourceNotFound {
            message: format!("{resource} {id} does not exist"),
            resource_type: resource,
        },
        CoreError::AlreadyReversed {
            entry_id,
            reversal_id,
        } => ApiError::AlreadyReversed {
            transaction_id: entry_id,
            reversal_id,
        },
        CoreError::AlreadySigned { agreement_id } => ApiError::AlreadySigned { agreement_id },
    }
}
