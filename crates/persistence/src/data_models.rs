// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversions to and from domain values.
//!
//! Timestamps are stored as RFC 3339 text and dates as `YYYY-MM-DD`.
//! Enumerations are stored by their canonical upper-case names.

use diesel::prelude::*;
use num_traits::ToPrimitive;
use roms_domain::{
    AgreementStatus, Amount, Assignment, AssignmentStatus, Candidate, CandidateDocument,
    CandidateStatus, CommissionAgreement, DocumentType, EntryDirection, InterviewPolicy, JobOrder,
    JobOrderStatus, LedgerEntry, MedicalStatus, TransactionType,
};
use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::diesel_schema::{
    assignments, audit_events, candidate_documents, candidates, commission_agreements,
    job_orders, payment_transactions,
};
use crate::error::PersistenceError;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

pub fn format_optional_timestamp(
    value: Option<OffsetDateTime>,
) -> Result<Option<String>, PersistenceError> {
    value.map(format_timestamp).transpose()
}

pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| {
        PersistenceError::ReconstructionError(format!("invalid timestamp '{value}': {e}"))
    })
}

fn parse_optional_timestamp(
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(parse_timestamp).transpose()
}

pub fn format_date(value: Date) -> Result<String, PersistenceError> {
    value
        .format(DATE_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

fn parse_date(value: &str) -> Result<Date, PersistenceError> {
    Date::parse(value, DATE_FORMAT).map_err(|e| {
        PersistenceError::ReconstructionError(format!("invalid date '{value}': {e}"))
    })
}

/// Converts a headcount to its column representation.
pub fn headcount_to_db(value: u32) -> Result<i32, PersistenceError> {
    value.to_i32().ok_or_else(|| {
        PersistenceError::SerializationError(format!("headcount {value} is out of range"))
    })
}

fn headcount_from_db(value: i32) -> Result<u32, PersistenceError> {
    value.to_u32().ok_or_else(|| {
        PersistenceError::ReconstructionError(format!("headcount {value} is negative"))
    })
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = candidates)]
pub struct CandidateRow {
    pub candidate_id: i64,
    pub reference_number: String,
    pub full_name: String,
    pub current_status: String,
    pub medical_status: String,
    pub interview_date: Option<String>,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl CandidateRow {
    pub fn into_domain(self) -> Result<Candidate, PersistenceError> {
        Ok(Candidate {
            id: self.candidate_id,
            reference_number: self.reference_number,
            full_name: self.full_name,
            status: self.current_status.parse::<CandidateStatus>()?,
            medical_status: self.medical_status.parse::<MedicalStatus>()?,
            interview_date: self.interview_date.as_deref().map(parse_date).transpose()?,
            version: self.version,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = candidate_documents)]
pub struct DocumentRow {
    pub document_id: i64,
    pub candidate_id: i64,
    pub document_type: String,
    pub verified: bool,
    pub expiry_date: Option<String>,
    pub file_reference: Option<String>,
    pub uploaded_at: String,
}

impl DocumentRow {
    pub fn into_domain(self) -> Result<CandidateDocument, PersistenceError> {
        Ok(CandidateDocument {
            id: self.document_id,
            candidate_id: self.candidate_id,
            document_type: self.document_type.parse::<DocumentType>()?,
            verified: self.verified,
            expiry_date: self.expiry_date.as_deref().map(parse_date).transpose()?,
            file_reference: self.file_reference,
            uploaded_at: parse_timestamp(&self.uploaded_at)?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = job_orders)]
pub struct JobOrderRow {
    pub job_order_id: i64,
    pub reference: String,
    pub title: String,
    pub employer_name: String,
    pub headcount_required: i32,
    pub headcount_filled: i32,
    pub status: String,
    pub interview_policy: String,
}

impl JobOrderRow {
    pub fn into_domain(self) -> Result<JobOrder, PersistenceError> {
        Ok(JobOrder {
            id: self.job_order_id,
            reference: self.reference,
            title: self.title,
            employer_name: self.employer_name,
            headcount_required: headcount_from_db(self.headcount_required)?,
            headcount_filled: headcount_from_db(self.headcount_filled)?,
            status: self.status.parse::<JobOrderStatus>()?,
            interview_policy: self.interview_policy.parse::<InterviewPolicy>()?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = assignments)]
pub struct AssignmentRow {
    pub assignment_id: i64,
    pub candidate_id: i64,
    pub job_order_id: i64,
    pub status: String,
    pub is_active: bool,
    pub assigned_at: String,
    pub offer_issued_at: Option<String>,
    pub placement_confirmed_at: Option<String>,
    pub cancelled_at: Option<String>,
    pub notes: Option<String>,
}

impl AssignmentRow {
    pub fn into_domain(self) -> Result<Assignment, PersistenceError> {
        Ok(Assignment {
            id: self.assignment_id,
            candidate_id: self.candidate_id,
            job_order_id: self.job_order_id,
            status: self.status.parse::<AssignmentStatus>()?,
            is_active: self.is_active,
            assigned_at: parse_timestamp(&self.assigned_at)?,
            offer_issued_at: parse_optional_timestamp(self.offer_issued_at.as_deref())?,
            placement_confirmed_at: parse_optional_timestamp(
                self.placement_confirmed_at.as_deref(),
            )?,
            cancelled_at: parse_optional_timestamp(self.cancelled_at.as_deref())?,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = commission_agreements)]
pub struct AgreementRow {
    pub agreement_id: i64,
    pub candidate_id: i64,
    pub assignment_id: i64,
    pub total_commission: i64,
    pub required_downpayment: i64,
    pub currency: String,
    pub signed: bool,
    pub signed_at: Option<String>,
    pub document_url: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: String,
}

impl AgreementRow {
    pub fn into_domain(self) -> Result<CommissionAgreement, PersistenceError> {
        Ok(CommissionAgreement {
            id: self.agreement_id,
            candidate_id: self.candidate_id,
            assignment_id: self.assignment_id,
            total_commission: Amount::from_minor_units(self.total_commission),
            required_downpayment: Amount::from_minor_units(self.required_downpayment),
            currency: self.currency,
            signed: self.signed,
            signed_at: parse_optional_timestamp(self.signed_at.as_deref())?,
            document_url: self.document_url,
            status: self.status.parse::<AgreementStatus>()?,
            notes: self.notes,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = payment_transactions)]
pub struct LedgerRow {
    pub transaction_id: i64,
    pub agreement_id: i64,
    pub amount: i64,
    pub direction: String,
    pub transaction_type: String,
    pub payment_method: Option<String>,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub reverses_transaction_id: Option<i64>,
    pub reason: Option<String>,
    pub recorded_at: String,
}

impl LedgerRow {
    pub fn into_domain(self) -> Result<LedgerEntry, PersistenceError> {
        Ok(LedgerEntry {
            id: self.transaction_id,
            agreement_id: self.agreement_id,
            amount: Amount::from_minor_units(self.amount),
            direction: self.direction.parse::<EntryDirection>()?,
            transaction_type: self.transaction_type.parse::<TransactionType>()?,
            payment_method: self.payment_method,
            reference: self.reference,
            description: self.description,
            reverses_entry_id: self.reverses_transaction_id,
            reason: self.reason,
            recorded_at: parse_timestamp(&self.recorded_at)?,
        })
    }
}

/// Diesel Queryable struct for audit event rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = audit_events)]
pub struct AuditEventRow {
    pub event_id: i64,
    pub candidate_id: Option<i64>,
    pub assignment_id: Option<i64>,
    pub agreement_id: Option<i64>,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
    pub recorded_at: String,
}
