// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roms::{
    AgreementCommand, AssignmentCommand, CandidateCommand, LedgerCommand, RegistrationCommand,
    TransitionResult, apply_agreement, apply_assignment, apply_candidate, apply_ledger,
    apply_registration,
};
use roms_audit::{Actor, Cause};
use roms_domain::{
    Amount, DocumentPolicy, DocumentType, EntryDirection, InterviewPolicy, JobOrderStatus,
    NewJobOrder, TransactionType,
};
use time::OffsetDateTime;
use time::macros::{date, datetime};

use crate::{PersistTransitionResult, Persistence, PersistenceError};

pub const NOW: OffsetDateTime = datetime!(2026-03-01 09:00 UTC);

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("officer-7"), String::from("operator"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Operator request"))
}

pub fn persist(
    persistence: &mut Persistence,
    result: &TransitionResult,
) -> Result<PersistTransitionResult, PersistenceError> {
    persistence.transaction(|store| store.persist_transition(result))
}

pub fn register_candidate(persistence: &mut Persistence, reference_number: &str) -> i64 {
    let result: TransitionResult = apply_registration(
        RegistrationCommand::RegisterCandidate {
            reference_number: reference_number.to_string(),
            full_name: String::from("Amina Wanjiru"),
        },
        NOW,
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    persist(persistence, &result).unwrap().created_id.unwrap()
}

pub fn create_job_order(persistence: &mut Persistence, reference: &str, headcount: u32) -> i64 {
    let result: TransitionResult = apply_registration(
        RegistrationCommand::CreateJobOrder(NewJobOrder {
            reference: reference.to_string(),
            title: String::from("Care assistant"),
            employer_name: String::from("Gulf Health Group"),
            headcount_required: headcount,
            status: JobOrderStatus::Open,
            interview_policy: InterviewPolicy::NotRequired,
        }),
        NOW,
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    persist(persistence, &result).unwrap().created_id.unwrap()
}

pub fn add_document(
    persistence: &mut Persistence,
    candidate_id: i64,
    document_type: DocumentType,
) -> i64 {
    let context = persistence
        .read(|store| store.candidate_context(candidate_id))
        .unwrap();
    let expiry_date = (document_type == DocumentType::Passport).then_some(date!(2030 - 01 - 01));
    let result: TransitionResult = apply_candidate(
        &context,
        &DocumentPolicy::default(),
        CandidateCommand::AddDocument {
            document_type,
            verified: true,
            expiry_date,
            file_reference: Some(format!("docs/{candidate_id}/{document_type}")),
        },
        NOW,
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    persist(persistence, &result).unwrap().created_id.unwrap()
}

pub fn assign(persistence: &mut Persistence, candidate_id: i64, job_order_id: i64) -> i64 {
    let context = persistence
        .read(|store| store.new_assignment_context(candidate_id, job_order_id))
        .unwrap();
    let result: TransitionResult = apply_assignment(
        &context,
        AssignmentCommand::Create { notes: None },
        NOW,
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    persist(persistence, &result).unwrap().created_id.unwrap()
}

pub fn create_agreement(
    persistence: &mut Persistence,
    candidate_id: i64,
    assignment_id: i64,
    total: i64,
    downpayment: i64,
) -> i64 {
    let context = persistence
        .read(|store| store.agreement_context(assignment_id))
        .unwrap();
    let result: TransitionResult = apply_agreement(
        &context,
        AgreementCommand::Create {
            candidate_id,
            total_commission: Amount::from_units(total),
            required_downpayment: Amount::from_units(downpayment),
            currency: None,
            notes: None,
        },
        NOW,
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    persist(persistence, &result).unwrap().created_id.unwrap()
}

pub fn record_payment(
    persistence: &mut Persistence,
    agreement_id: i64,
    transaction_type: TransactionType,
    amount: i64,
) -> i64 {
    record_exact_payment(
        persistence,
        agreement_id,
        transaction_type,
        Amount::from_units(amount),
    )
}

pub fn record_exact_payment(
    persistence: &mut Persistence,
    agreement_id: i64,
    transaction_type: TransactionType,
    amount: Amount,
) -> i64 {
    let context = persistence
        .read(|store| store.ledger_context(agreement_id))
        .unwrap();
    let result: TransitionResult = apply_ledger(
        &context,
        LedgerCommand::RecordPayment {
            transaction_type,
            direction: EntryDirection::Debit,
            amount,
            payment_method: Some(String::from("BANK_TRANSFER")),
            reference: None,
            description: None,
        },
        NOW,
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    persist(persistence, &result).unwrap().created_id.unwrap()
}

/// A candidate assigned to a job order with a 200,000 / 50,000 agreement.
pub struct CommissionFixture {
    pub candidate_id: i64,
    pub job_order_id: i64,
    pub assignment_id: i64,
    pub agreement_id: i64,
}

pub fn create_commission_fixture(persistence: &mut Persistence) -> CommissionFixture {
    let candidate_id: i64 = register_candidate(persistence, "RC-0001");
    let job_order_id: i64 = create_job_order(persistence, "JO-2026-01", 3);
    let assignment_id: i64 = assign(persistence, candidate_id, job_order_id);
    let agreement_id: i64 =
        create_agreement(persistence, candidate_id, assignment_id, 200_000, 50_000);
    CommissionFixture {
        candidate_id,
        job_order_id,
        assignment_id,
        agreement_id,
    }
}
