// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Candidate documents and document evaluation.
//!
//! Evaluation is deterministic: given the same documents, policy and
//! evaluation date it always produces the same outcome. Document content
//! is never inspected; only type, verification flag and expiry date count.

use crate::candidate::CandidateStatus;
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, Duration, Month, OffsetDateTime};

/// Closed set of document types a candidate can upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Passport,
    NationalId,
    BirthCertificate,
    EducationalCertificate,
    MedicalReport,
    PoliceClearance,
    Photo,
    Cv,
    OfferLetter,
    Contract,
    Visa,
    Other,
}

impl DocumentType {
    /// Every document type.
    pub const ALL: [Self; 12] = [
        Self::Passport,
        Self::NationalId,
        Self::BirthCertificate,
        Self::EducationalCertificate,
        Self::MedicalReport,
        Self::PoliceClearance,
        Self::Photo,
        Self::Cv,
        Self::OfferLetter,
        Self::Contract,
        Self::Visa,
        Self::Other,
    ];

    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Passport => "PASSPORT",
            Self::NationalId => "NATIONAL_ID",
            Self::BirthCertificate => "BIRTH_CERTIFICATE",
            Self::EducationalCertificate => "EDUCATIONAL_CERTIFICATE",
            Self::MedicalReport => "MEDICAL_REPORT",
            Self::PoliceClearance => "POLICE_CLEARANCE",
            Self::Photo => "PHOTO",
            Self::Cv => "CV",
            Self::OfferLetter => "OFFER_LETTER",
            Self::Contract => "CONTRACT",
            Self::Visa => "VISA",
            Self::Other => "OTHER",
        }
    }

    /// Name shown to operators.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Passport => "Passport",
            Self::NationalId => "National ID",
            Self::BirthCertificate => "Birth Certificate",
            Self::EducationalCertificate => "Educational Certificate",
            Self::MedicalReport => "Medical Report",
            Self::PoliceClearance => "Police Clearance",
            Self::Photo => "Photo",
            Self::Cv => "CV / Resume",
            Self::OfferLetter => "Offer Letter",
            Self::Contract => "Contract",
            Self::Visa => "Visa",
            Self::Other => "Other",
        }
    }
}

impl FromStr for DocumentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s.trim().to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|doc_type| doc_type.as_str() == normalized)
            .ok_or_else(|| DomainError::InvalidEnumValue {
                kind: "document type",
                value: s.to_string(),
            })
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A document on file for a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateDocument {
    pub id: i64,
    pub candidate_id: i64,
    pub document_type: DocumentType,
    pub verified: bool,
    pub expiry_date: Option<Date>,
    /// Opaque pointer into external document storage.
    pub file_reference: Option<String>,
    pub uploaded_at: OffsetDateTime,
}

impl CandidateDocument {
    /// Returns true if the document has an expiry date before `as_of`.
    #[must_use]
    pub fn is_expired(&self, as_of: Date) -> bool {
        self.expiry_date.is_some_and(|expiry| expiry < as_of)
    }
}

/// A document that has not yet been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCandidateDocument {
    pub candidate_id: i64,
    pub document_type: DocumentType,
    pub verified: bool,
    pub expiry_date: Option<Date>,
    pub file_reference: Option<String>,
    pub uploaded_at: OffsetDateTime,
}

/// Which documents are required and how long a passport must remain valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPolicy {
    /// Types that must each be satisfied by at least one document.
    pub required_types: Vec<DocumentType>,
    /// Passport expiry must fall after the evaluation date plus this many months.
    pub passport_min_validity_months: u8,
}

impl Default for DocumentPolicy {
    fn default() -> Self {
        Self {
            required_types: vec![
                DocumentType::Passport,
                DocumentType::Cv,
                DocumentType::EducationalCertificate,
            ],
            passport_min_validity_months: 6,
        }
    }
}

/// Why a required document type is not satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeficiencyReason {
    /// No document of this type is on file.
    Missing,
    /// Documents exist but none are verified.
    Unverified,
    /// Every verified document of this type has expired.
    Expired,
    /// The passport expires inside the minimum validity window.
    ExpiresTooSoon,
    /// The passport has no expiry date recorded.
    MissingExpiryDate,
}

impl DeficiencyReason {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "MISSING",
            Self::Unverified => "UNVERIFIED",
            Self::Expired => "EXPIRED",
            Self::ExpiresTooSoon => "EXPIRES_TOO_SOON",
            Self::MissingExpiryDate => "MISSING_EXPIRY_DATE",
        }
    }
}

/// A required document type together with the reason it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentDeficiency {
    pub document_type: DocumentType,
    pub reason: DeficiencyReason,
}

/// Outcome of evaluating a candidate's documents against a policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEvaluation {
    /// `DocumentsApproved` when every required type is satisfied,
    /// otherwise `DocumentsInsufficient`.
    pub next_status: CandidateStatus,
    /// Required types that are missing or invalid, in policy order.
    pub missing_types: Vec<DocumentType>,
    /// Per-type detail for every entry in `missing_types`.
    pub deficiencies: Vec<DocumentDeficiency>,
}

impl DocumentEvaluation {
    /// Returns true if the evaluation approves the documents.
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.next_status == CandidateStatus::DocumentsApproved
    }
}

/// Adds calendar months to a date, clamping the day to the target month's length.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` if the result is out of range.
pub fn add_months(date: Date, months: u8) -> Result<Date, DomainError> {
    let overflow = || DomainError::DateArithmeticOverflow {
        operation: format!("adding {months} months to {date}"),
    };

    let zero_based: i32 = i32::from(u8::from(date.month())) - 1 + i32::from(months);
    let year: i32 = date.year() + zero_based / 12;
    let month_number: u8 = u8::try_from(zero_based % 12 + 1).map_err(|_| overflow())?;
    let month: Month = Month::try_from(month_number).map_err(|_| overflow())?;

    let mut day: u8 = date.day();
    loop {
        if let Ok(result) = Date::from_calendar_date(year, month, day) {
            return Ok(result);
        }
        if day <= 28 {
            return Err(overflow());
        }
        day -= 1;
    }
}

/// Lists required types with no document of that type on file at all.
///
/// This is the presence check used before a candidate may enter review.
#[must_use]
pub fn missing_required_types(
    documents: &[CandidateDocument],
    policy: &DocumentPolicy,
) -> Vec<DocumentType> {
    policy
        .required_types
        .iter()
        .copied()
        .filter(|required| !documents.iter().any(|doc| doc.document_type == *required))
        .collect()
}

/// Evaluates documents against the policy as of a given date.
///
/// A required type is satisfied when at least one document of that type is
/// verified and unexpired. Passports must additionally remain valid beyond
/// `as_of` plus the policy's minimum validity window.
///
/// # Errors
///
/// Returns an error only if the passport validity cut-off cannot be computed.
pub fn evaluate_documents(
    documents: &[CandidateDocument],
    policy: &DocumentPolicy,
    as_of: Date,
) -> Result<DocumentEvaluation, DomainError> {
    let passport_cutoff: Date = add_months(as_of, policy.passport_min_validity_months)?;

    let mut deficiencies: Vec<DocumentDeficiency> = Vec::new();
    for required in &policy.required_types {
        let Some(reason) = deficiency_for(*required, documents, as_of, passport_cutoff) else {
            continue;
        };
        if deficiencies.iter().any(|d| d.document_type == *required) {
            continue;
        }
        deficiencies.push(DocumentDeficiency {
            document_type: *required,
            reason,
        });
    }

    let missing_types: Vec<DocumentType> =
        deficiencies.iter().map(|d| d.document_type).collect();
    let next_status: CandidateStatus = if deficiencies.is_empty() {
        CandidateStatus::DocumentsApproved
    } else {
        CandidateStatus::DocumentsInsufficient
    };

    Ok(DocumentEvaluation {
        next_status,
        missing_types,
        deficiencies,
    })
}

fn deficiency_for(
    required: DocumentType,
    documents: &[CandidateDocument],
    as_of: Date,
    passport_cutoff: Date,
) -> Option<DeficiencyReason> {
    let candidates: Vec<&CandidateDocument> = documents
        .iter()
        .filter(|doc| doc.document_type == required)
        .collect();

    if candidates.is_empty() {
        return Some(DeficiencyReason::Missing);
    }

    let verified: Vec<&CandidateDocument> =
        candidates.into_iter().filter(|doc| doc.verified).collect();
    if verified.is_empty() {
        return Some(DeficiencyReason::Unverified);
    }

    let current: Vec<&CandidateDocument> = verified
        .into_iter()
        .filter(|doc| !doc.is_expired(as_of))
        .collect();
    if current.is_empty() {
        return Some(DeficiencyReason::Expired);
    }

    if required != DocumentType::Passport {
        return None;
    }

    // Passports need a recorded expiry beyond the validity window.
    if current
        .iter()
        .any(|doc| doc.expiry_date.is_some_and(|expiry| expiry > passport_cutoff))
    {
        None
    } else if current.iter().all(|doc| doc.expiry_date.is_none()) {
        Some(DeficiencyReason::MissingExpiryDate)
    } else {
        Some(DeficiencyReason::ExpiresTooSoon)
    }
}

/// Document-derived expiry indicator, computed at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpiryFlag {
    Valid,
    ExpiringSoon,
    Expired,
}

impl ExpiryFlag {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::ExpiringSoon => "EXPIRING_SOON",
            Self::Expired => "EXPIRED",
        }
    }
}

/// Derives the expiry flag from the latest passport and medical report expiry dates.
///
/// `Expired` if either date is before `today`; `ExpiringSoon` if either is
/// before `today + warning_days`; otherwise `Valid`. Absent dates are ignored.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` if the warning window overflows.
pub fn expiry_flag(
    documents: &[CandidateDocument],
    today: Date,
    warning_days: u32,
) -> Result<ExpiryFlag, DomainError> {
    let warning_limit: Date = today
        .checked_add(Duration::days(i64::from(warning_days)))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("adding {warning_days} days to {today}"),
        })?;

    let latest = |doc_type: DocumentType| -> Option<Date> {
        documents
            .iter()
            .filter(|doc| doc.document_type == doc_type)
            .filter_map(|doc| doc.expiry_date)
            .max()
    };

    let dates: Vec<Date> = [
        latest(DocumentType::Passport),
        latest(DocumentType::MedicalReport),
    ]
    .into_iter()
    .flatten()
    .collect();

    if dates.iter().any(|date| *date < today) {
        Ok(ExpiryFlag::Expired)
    } else if dates.iter().any(|date| *date < warning_limit) {
        Ok(ExpiryFlag::ExpiringSoon)
    } else {
        Ok(ExpiryFlag::Valid)
    }
}
