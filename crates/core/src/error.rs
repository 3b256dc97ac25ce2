// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roms_domain::{CandidateStatus, DomainError, PaymentGateFailure};

/// Errors that can occur during state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// A commission condition blocks entry into the target status.
    PaymentGate {
        /// The status the candidate was moving to.
        target: CandidateStatus,
        /// The unmet condition.
        failure: PaymentGateFailure,
    },
    /// The request itself is malformed or not permitted by the current state.
    Validation {
        /// The offending field.
        field: String,
        /// Description of the problem.
        message: String,
    },
    /// The operation conflicts with the current state of a resource.
    Conflict {
        /// The resource in conflict (e.g. "assignment").
        resource: String,
        /// Description of the conflict.
        message: String,
    },
    /// The job order has no open headcount left.
    Capacity {
        /// The job order.
        job_order_id: i64,
        /// Positions already filled.
        filled: u32,
        /// Positions required.
        required: u32,
    },
    /// A referenced resource does not exist in the loaded state.
    NotFound {
        /// The resource type.
        resource: String,
        /// The identifier that was looked up.
        id: i64,
    },
    /// The ledger entry has already been reversed.
    AlreadyReversed {
        /// The entry that was targeted.
        entry_id: i64,
        /// The existing reversal.
        reversal_id: i64,
    },
    /// The commission agreement is already signed.
    AlreadySigned {
        /// The agreement.
        agreement_id: i64,
    },
}

impl CoreError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn conflict(resource: &str, message: impl Into<String>) -> Self {
        Self::Conflict {
            resource: resource.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn not_found(resource: &str, id: i64) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id,
        }
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::PaymentGate { target, failure } => {
                write!(f, "Payment gate blocks {target}: {failure}")
            }
            Self::Validation { field, message } => {
                write!(f, "Invalid '{field}': {message}")
            }
            Self::Conflict { resource, message } => write!(f, "Conflict on {resource}: {message}"),
            Self::Capacity {
                job_order_id,
                filled,
                required,
            } => write!(
                f,
                "Job order {job_order_id} is at capacity ({filled} of {required} filled)"
            ),
            Self::NotFound { resource, id } => write!(f, "{resource} {id} not found"),
            Self::AlreadyReversed {
                entry_id,
                reversal_id,
            } => write!(
                f,
                "Ledger entry {entry_id} has already been reversed by entry {reversal_id}"
            ),
            Self::AlreadySigned { agreement_id } => {
                write!(f, "Commission agreement {agreement_id} is already signed")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
