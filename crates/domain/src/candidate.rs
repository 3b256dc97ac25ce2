// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Candidate workflow states and the candidate aggregate.
//!
//! The workflow status only changes through the candidate state machine.
//! The medical status is an independent sub-state that gates transitions
//! into and past the medical stage without moving the workflow itself.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, OffsetDateTime};

/// Placement pipeline states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandidateStatus {
    /// Application received; initial state.
    ApplicationSubmitted,
    /// Documents are being reviewed.
    UnderReview,
    /// Review found missing or invalid documents.
    DocumentsInsufficient,
    /// All required documents present, verified and valid.
    DocumentsApproved,
    /// Interview booked with the employer.
    InterviewScheduled,
    /// Interview passed.
    InterviewPassed,
    /// Awaiting medical examination result.
    MedicalPending,
    /// Medical cleared.
    MedicalPassed,
    /// Visa application in progress.
    VisaProcessing,
    /// Offer issued to the candidate.
    OfferIssued,
    /// Candidate accepted the offer.
    OfferAccepted,
    /// Awaiting deployment.
    DeploymentPending,
    /// Placement confirmed.
    Placed,
    /// Rejected by the agency or employer.
    Rejected,
    /// Candidate withdrew.
    Withdrawn,
}

impl CandidateStatus {
    /// Every status in pipeline order.
    pub const ALL: [Self; 15] = [
        Self::ApplicationSubmitted,
        Self::UnderReview,
        Self::DocumentsInsufficient,
        Self::DocumentsApproved,
        Self::InterviewScheduled,
        Self::InterviewPassed,
        Self::MedicalPending,
        Self::MedicalPassed,
        Self::VisaProcessing,
        Self::OfferIssued,
        Self::OfferAccepted,
        Self::DeploymentPending,
        Self::Placed,
        Self::Rejected,
        Self::Withdrawn,
    ];

    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ApplicationSubmitted => "APPLICATION_SUBMITTED",
            Self::UnderReview => "UNDER_REVIEW",
            Self::DocumentsInsufficient => "DOCUMENTS_INSUFFICIENT",
            Self::DocumentsApproved => "DOCUMENTS_APPROVED",
            Self::InterviewScheduled => "INTERVIEW_SCHEDULED",
            Self::InterviewPassed => "INTERVIEW_PASSED",
            Self::MedicalPending => "MEDICAL_PENDING",
            Self::MedicalPassed => "MEDICAL_PASSED",
            Self::VisaProcessing => "VISA_PROCESSING",
            Self::OfferIssued => "OFFER_ISSUED",
            Self::OfferAccepted => "OFFER_ACCEPTED",
            Self::DeploymentPending => "DEPLOYMENT_PENDING",
            Self::Placed => "PLACED",
            Self::Rejected => "REJECTED",
            Self::Withdrawn => "WITHDRAWN",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::InvalidEnumValue {
                kind: "candidate status",
                value: s.to_string(),
            })
    }

    /// Returns true if no further transitions are defined from this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Placed | Self::Rejected | Self::Withdrawn)
    }

    /// Human readable stage title.
    #[must_use]
    pub const fn stage_title(&self) -> &'static str {
        match self {
            Self::ApplicationSubmitted => "Application Submitted",
            Self::UnderReview => "Under Review",
            Self::DocumentsInsufficient => "Documents Insufficient",
            Self::DocumentsApproved => "Documents Approved",
            Self::InterviewScheduled => "Interview Scheduled",
            Self::InterviewPassed => "Interview Passed",
            Self::MedicalPending => "Medical Pending",
            Self::MedicalPassed => "Medical Passed",
            Self::VisaProcessing => "Visa Processing",
            Self::OfferIssued => "Offer Issued",
            Self::OfferAccepted => "Offer Accepted",
            Self::DeploymentPending => "Deployment Pending",
            Self::Placed => "Placed",
            Self::Rejected => "Rejected",
            Self::Withdrawn => "Withdrawn",
        }
    }

    /// Short description of what happens at this stage.
    #[must_use]
    pub const fn stage_description(&self) -> &'static str {
        match self {
            Self::ApplicationSubmitted => "Application received and awaiting document upload.",
            Self::UnderReview => "Documents are being checked against the required set.",
            Self::DocumentsInsufficient => {
                "Required documents are missing, unverified or expired."
            }
            Self::DocumentsApproved => "Documents approved; ready for interview or medical.",
            Self::InterviewScheduled => "Interview scheduled with the employer.",
            Self::InterviewPassed => "Interview passed; medical examination next.",
            Self::MedicalPending => "Awaiting medical examination result.",
            Self::MedicalPassed => "Medical cleared; visa processing requires the downpayment.",
            Self::VisaProcessing => "Visa application lodged.",
            Self::OfferIssued => "Offer issued to the candidate.",
            Self::OfferAccepted => "Offer accepted by the candidate.",
            Self::DeploymentPending => "Awaiting deployment; placement requires full payment.",
            Self::Placed => "Candidate placed with the employer.",
            Self::Rejected => "Candidate rejected.",
            Self::Withdrawn => "Candidate withdrew from the process.",
        }
    }
}

impl FromStr for CandidateStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Medical examination sub-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MedicalStatus {
    /// No result recorded.
    #[default]
    Pending,
    /// Examination passed.
    Passed,
    /// Examination failed.
    Failed,
    /// Examination waived by the employer.
    Waived,
}

impl MedicalStatus {
    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::Waived => "WAIVED",
        }
    }

    /// Returns true if the medical result permits progression.
    #[must_use]
    pub const fn is_cleared(&self) -> bool {
        matches!(self, Self::Passed | Self::Waived)
    }
}

impl FromStr for MedicalStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PASSED" => Ok(Self::Passed),
            "FAILED" => Ok(Self::Failed),
            "WAIVED" => Ok(Self::Waived),
            _ => Err(DomainError::InvalidEnumValue {
                kind: "medical status",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for MedicalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A candidate in the placement pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: i64,
    /// Agency reference number; unique and immutable.
    pub reference_number: String,
    pub full_name: String,
    pub status: CandidateStatus,
    pub medical_status: MedicalStatus,
    /// Date of the employer interview, once arranged.
    pub interview_date: Option<Date>,
    /// Incremented on every write; used to detect stale reads.
    pub version: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A candidate that has not yet been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCandidate {
    pub reference_number: String,
    pub full_name: String,
    pub created_at: OffsetDateTime,
}

impl NewCandidate {
    /// Creates and validates a new candidate registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference number or name is blank, or if the
    /// reference number contains whitespace.
    pub fn new(
        reference_number: &str,
        full_name: &str,
        created_at: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        let reference_number: &str = reference_number.trim();
        if reference_number.is_empty() {
            return Err(DomainError::InvalidReferenceNumber(String::from(
                "reference number cannot be empty",
            )));
        }
        if reference_number.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidReferenceNumber(format!(
                "'{reference_number}' must not contain whitespace"
            )));
        }

        let full_name: &str = full_name.trim();
        if full_name.is_empty() {
            return Err(DomainError::InvalidName(String::from(
                "candidate name cannot be empty",
            )));
        }

        Ok(Self {
            reference_number: reference_number.to_string(),
            full_name: full_name.to_string(),
            created_at,
        })
    }
}
