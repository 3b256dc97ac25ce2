// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Job orders and candidate assignments.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Whether a job order requires an employer interview.
///
/// This decides the branch out of `DocumentsApproved`: `Required` leads to
/// `InterviewScheduled`, `NotRequired` leads straight to `MedicalPending`.
/// Every job order states its policy; there is no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterviewPolicy {
    Required,
    NotRequired,
}

impl InterviewPolicy {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "REQUIRED",
            Self::NotRequired => "NOT_REQUIRED",
        }
    }
}

impl FromStr for InterviewPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REQUIRED" => Ok(Self::Required),
            "NOT_REQUIRED" => Ok(Self::NotRequired),
            _ => Err(DomainError::InvalidEnumValue {
                kind: "interview policy",
                value: s.to_string(),
            }),
        }
    }
}

/// Job order lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobOrderStatus {
    PendingApproval,
    Open,
    InProgress,
    Filled,
    Closed,
    Cancelled,
    OnHold,
}

impl JobOrderStatus {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PendingApproval => "PENDING_APPROVAL",
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Filled => "FILLED",
            Self::Closed => "CLOSED",
            Self::Cancelled => "CANCELLED",
            Self::OnHold => "ON_HOLD",
        }
    }

    /// Only open job orders accept new assignments.
    #[must_use]
    pub const fn accepts_assignments(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl FromStr for JobOrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING_APPROVAL" => Ok(Self::PendingApproval),
            "OPEN" => Ok(Self::Open),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "FILLED" => Ok(Self::Filled),
            "CLOSED" => Ok(Self::Closed),
            "CANCELLED" => Ok(Self::Cancelled),
            "ON_HOLD" => Ok(Self::OnHold),
            _ => Err(DomainError::InvalidEnumValue {
                kind: "job order status",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for JobOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An employer's request for a number of workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOrder {
    pub id: i64,
    pub reference: String,
    pub title: String,
    pub employer_name: String,
    pub headcount_required: u32,
    pub headcount_filled: u32,
    pub status: JobOrderStatus,
    pub interview_policy: InterviewPolicy,
}

impl JobOrder {
    /// Returns true if another assignment fits within the headcount.
    #[must_use]
    pub const fn has_capacity(&self) -> bool {
        self.headcount_filled < self.headcount_required
    }
}

/// A job order that has not yet been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobOrder {
    pub reference: String,
    pub title: String,
    pub employer_name: String,
    pub headcount_required: u32,
    pub status: JobOrderStatus,
    pub interview_policy: InterviewPolicy,
}

impl NewJobOrder {
    /// Validates the job order fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference or title is blank or the headcount is zero.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.reference.trim().is_empty() {
            return Err(DomainError::InvalidReferenceNumber(String::from(
                "job order reference cannot be empty",
            )));
        }
        if self.title.trim().is_empty() {
            return Err(DomainError::InvalidName(String::from(
                "job order title cannot be empty",
            )));
        }
        if self.headcount_required == 0 {
            return Err(DomainError::InvalidHeadcount {
                required: self.headcount_required,
            });
        }
        Ok(())
    }
}

/// Assignment lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    Assigned,
    Offered,
    Placed,
    Cancelled,
}

impl AssignmentStatus {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned => "ASSIGNED",
            Self::Offered => "OFFERED",
            Self::Placed => "PLACED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for AssignmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASSIGNED" => Ok(Self::Assigned),
            "OFFERED" => Ok(Self::Offered),
            "PLACED" => Ok(Self::Placed),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidEnumValue {
                kind: "assignment status",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Binding of one candidate to one job order.
///
/// A candidate has at most one active assignment at any time. Each
/// lifecycle timestamp is written once and never cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub id: i64,
    pub candidate_id: i64,
    pub job_order_id: i64,
    pub status: AssignmentStatus,
    pub is_active: bool,
    pub assigned_at: OffsetDateTime,
    pub offer_issued_at: Option<OffsetDateTime>,
    pub placement_confirmed_at: Option<OffsetDateTime>,
    pub cancelled_at: Option<OffsetDateTime>,
    pub notes: Option<String>,
}

impl Assignment {
    /// Returns a copy marked as cancelled at `now`.
    #[must_use]
    pub fn cancelled(&self, now: OffsetDateTime) -> Self {
        Self {
            status: AssignmentStatus::Cancelled,
            is_active: false,
            cancelled_at: self.cancelled_at.or(Some(now)),
            ..self.clone()
        }
    }

    /// Returns a copy with the offer issued at `now`, keeping an existing timestamp.
    #[must_use]
    pub fn offered(&self, now: OffsetDateTime) -> Self {
        Self {
            status: AssignmentStatus::Offered,
            offer_issued_at: self.offer_issued_at.or(Some(now)),
            ..self.clone()
        }
    }

    /// Returns a copy with placement confirmed at `now`, keeping an existing timestamp.
    #[must_use]
    pub fn placed(&self, now: OffsetDateTime) -> Self {
        Self {
            status: AssignmentStatus::Placed,
            placement_confirmed_at: self.placement_confirmed_at.or(Some(now)),
            ..self.clone()
        }
    }
}

/// An assignment that has not yet been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
    pub candidate_id: i64,
    pub job_order_id: i64,
    pub assigned_at: OffsetDateTime,
    pub notes: Option<String>,
}
