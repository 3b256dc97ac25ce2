// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roms_domain::{
    AgreementStatus, Amount, AssignmentStatus, CandidateStatus, EntryDirection, TransactionType,
};
use roms_persistence::Persistence;

use super::helpers::{
    PipelineFixture, agree, assign, create_medical_passed_candidate, create_test_context,
    create_test_persistence, open_job_order, pay, pay_exact, register, transition,
};
use crate::{
    AgreementResponse, ApiError, AssignmentResponse, CancelAgreementRequest, PaymentRequest,
    PaymentTransactionResponse, ReversePaymentRequest, SignAgreementRequest, StatementResponse,
    cancel_agreement, candidate_statement, downpayment_status, full_payment_status,
    get_agreement, get_assignment, record_payment, reverse_payment, sign_agreement,
};

fn reverse(
    persistence: &mut Persistence,
    transaction_id: i64,
) -> Result<PaymentTransactionResponse, ApiError> {
    reverse_payment(
        persistence,
        transaction_id,
        ReversePaymentRequest {
            reason: String::from("cheque bounced"),
        },
        create_test_context(),
    )
}

fn statement_of(
    persistence: &mut Persistence,
    fixture: &PipelineFixture,
) -> StatementResponse {
    candidate_statement(persistence, fixture.candidate_id, Some(fixture.agreement_id)).unwrap()
}

// ============================================================================
// Payment gates
// ============================================================================

#[test]
fn test_visa_processing_blocked_without_downpayment() {
    let mut persistence = create_test_persistence();
    let fixture = create_medical_passed_candidate(&mut persistence);

    let err: ApiError =
        transition(&mut persistence, fixture.candidate_id, "VISA_PROCESSING").unwrap_err();

    assert_eq!(
        err,
        ApiError::PaymentGate {
            target: String::from("VISA_PROCESSING"),
            message: String::from("downpayment incomplete: 0 of 50,000 paid"),
        }
    );
    assert!(!downpayment_status(&mut persistence, fixture.assignment_id).unwrap());
}

#[test]
fn test_partial_downpayment_names_amounts() {
    let mut persistence = create_test_persistence();
    let fixture = create_medical_passed_candidate(&mut persistence);
    pay(
        &mut persistence,
        TransactionType::Downpayment,
        fixture.agreement_id,
        30_000,
    )
    .unwrap();

    let err: ApiError =
        transition(&mut persistence, fixture.candidate_id, "VISA_PROCESSING").unwrap_err();

    assert!(
        err.to_string()
            .contains("downpayment incomplete: 30,000 of 50,000 paid")
    );
}

#[test]
fn test_visa_processing_after_downpayment() {
    let mut persistence = create_test_persistence();
    let fixture = create_medical_passed_candidate(&mut persistence);

    pay(
        &mut persistence,
        TransactionType::Downpayment,
        fixture.agreement_id,
        50_000,
    )
    .unwrap();

    assert!(downpayment_status(&mut persistence, fixture.assignment_id).unwrap());
    assert!(!full_payment_status(&mut persistence, fixture.assignment_id).unwrap());
    let candidate = transition(&mut persistence, fixture.candidate_id, "VISA_PROCESSING").unwrap();
    assert_eq!(candidate.current_status, CandidateStatus::VisaProcessing);
}

#[test]
fn test_placement_after_full_payment() {
    let mut persistence = create_test_persistence();
    let fixture = create_medical_passed_candidate(&mut persistence);
    pay(
        &mut persistence,
        TransactionType::Downpayment,
        fixture.agreement_id,
        50_000,
    )
    .unwrap();
    for status in [
        "VISA_PROCESSING",
        "OFFER_ISSUED",
        "OFFER_ACCEPTED",
        "DEPLOYMENT_PENDING",
    ] {
        transition(&mut persistence, fixture.candidate_id, status).unwrap();
    }

    let err: ApiError = transition(&mut persistence, fixture.candidate_id, "PLACED").unwrap_err();
    assert!(err.to_string().contains("full payment incomplete: 50,000 of 200,000 paid"));

    pay(
        &mut persistence,
        TransactionType::Balance,
        fixture.agreement_id,
        150_000,
    )
    .unwrap();
    assert!(full_payment_status(&mut persistence, fixture.assignment_id).unwrap());

    let candidate = transition(&mut persistence, fixture.candidate_id, "PLACED").unwrap();
    assert_eq!(candidate.current_status, CandidateStatus::Placed);

    let agreement: AgreementResponse =
        get_agreement(&mut persistence, fixture.agreement_id).unwrap();
    assert_eq!(agreement.status, AgreementStatus::Completed);
    let assignment: AssignmentResponse =
        get_assignment(&mut persistence, fixture.assignment_id).unwrap();
    assert_eq!(assignment.status, AssignmentStatus::Placed);
    assert!(assignment.offer_issued_at.is_some());
    assert!(assignment.placement_confirmed_at.is_some());
}

// ============================================================================
// Ledger
// ============================================================================

#[test]
fn test_overpayment_leaves_ledger_unchanged() {
    let mut persistence = create_test_persistence();
    let fixture = create_medical_passed_candidate(&mut persistence);
    pay(
        &mut persistence,
        TransactionType::Downpayment,
        fixture.agreement_id,
        50_000,
    )
    .unwrap();
    pay(
        &mut persistence,
        TransactionType::Installment,
        fixture.agreement_id,
        100_000,
    )
    .unwrap();

    let err: ApiError = pay(
        &mut persistence,
        TransactionType::Installment,
        fixture.agreement_id,
        60_000,
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "amount"));
    let statement: StatementResponse = statement_of(&mut persistence, &fixture);
    assert_eq!(statement.total_paid, Amount::from_units(150_000));
    assert_eq!(statement.outstanding_balance, Amount::from_units(50_000));
    assert_eq!(statement.payment_history.len(), 2);
}

#[test]
fn test_fractional_payments_settle_to_the_cent() {
    let mut persistence = create_test_persistence();
    let fixture = create_medical_passed_candidate(&mut persistence);
    let request: PaymentRequest = serde_json::from_str(&format!(
        r#"{{"agreementId":{},"amount":1500.50,"mpesaRef":"QK71XZ"}}"#,
        fixture.agreement_id
    ))
    .unwrap();

    let payment: PaymentTransactionResponse = record_payment(
        &mut persistence,
        TransactionType::Downpayment,
        request,
        create_test_context(),
    )
    .unwrap();
    assert_eq!(payment.amount, Amount::from_minor_units(150_050));
    assert_eq!(serde_json::to_value(&payment).unwrap()["amount"], 1500.5);

    let cents = |value: &str| value.parse::<Amount>().unwrap();
    pay_exact(
        &mut persistence,
        TransactionType::Downpayment,
        fixture.agreement_id,
        cents("48499.50"),
    )
    .unwrap();
    pay_exact(
        &mut persistence,
        TransactionType::Installment,
        fixture.agreement_id,
        cents("149999.99"),
    )
    .unwrap();

    let err: ApiError = pay_exact(
        &mut persistence,
        TransactionType::Installment,
        fixture.agreement_id,
        cents("0.02"),
    )
    .unwrap_err();
    assert!(err.to_string().contains("payment of 0.02 exceeds outstanding balance of 0.01"));

    pay_exact(
        &mut persistence,
        TransactionType::Balance,
        fixture.agreement_id,
        cents("0.01"),
    )
    .unwrap();
    let statement: StatementResponse = statement_of(&mut persistence, &fixture);
    assert_eq!(statement.total_paid, Amount::from_units(200_000));
    assert_eq!(statement.downpayment_paid, Amount::from_units(50_000));
    assert!(statement.full_payment_complete);
}

#[test]
fn test_amount_with_more_than_two_decimals_is_rejected() {
    let err = serde_json::from_str::<PaymentRequest>(r#"{"agreementId":1,"amount":10.005}"#)
        .unwrap_err();

    assert!(err.to_string().contains("more than two decimal places"));
}

#[test]
fn test_total_paid_never_exceeds_commission() {
    let mut persistence = create_test_persistence();
    let fixture = create_medical_passed_candidate(&mut persistence);
    let attempts: [(TransactionType, i64); 6] = [
        (TransactionType::Downpayment, 60_000),
        (TransactionType::Downpayment, 50_000),
        (TransactionType::Installment, 100_000),
        (TransactionType::Installment, 100_000),
        (TransactionType::Balance, 40_000),
        (TransactionType::Balance, 50_000),
    ];

    for (transaction_type, amount) in attempts {
        let _ = pay(
            &mut persistence,
            transaction_type,
            fixture.agreement_id,
            amount,
        );
        let statement: StatementResponse = statement_of(&mut persistence, &fixture);
        assert!(statement.total_paid <= statement.total_commission_amount);
    }

    let statement: StatementResponse = statement_of(&mut persistence, &fixture);
    assert_eq!(statement.total_paid, Amount::from_units(200_000));
    assert!(statement.full_payment_complete);
    assert_eq!(statement.payment_history.len(), 3);
}

#[test]
fn test_reversal_is_idempotent() {
    let mut persistence = create_test_persistence();
    let fixture = create_medical_passed_candidate(&mut persistence);
    let payment: PaymentTransactionResponse = pay(
        &mut persistence,
        TransactionType::Downpayment,
        fixture.agreement_id,
        50_000,
    )
    .unwrap();

    let reversal: PaymentTransactionResponse = reverse(&mut persistence, payment.id).unwrap();
    assert_eq!(reversal.direction, EntryDirection::Credit);
    assert_eq!(reversal.transaction_type, TransactionType::Reversal);
    assert_eq!(reversal.reverses_transaction_id, Some(payment.id));
    assert_eq!(reversal.reason.as_deref(), Some("cheque bounced"));
    assert_eq!(statement_of(&mut persistence, &fixture).payment_history.len(), 2);

    let err: ApiError = reverse(&mut persistence, payment.id).unwrap_err();
    assert_eq!(
        err,
        ApiError::AlreadyReversed {
            transaction_id: payment.id,
            reversal_id: reversal.id,
        }
    );

    let statement: StatementResponse = statement_of(&mut persistence, &fixture);
    assert_eq!(statement.payment_history.len(), 2);
    assert_eq!(statement.total_paid, Amount::ZERO);
    assert!(!statement.downpayment_complete);
}

#[test]
fn test_reversing_a_reversal_or_unknown_payment() {
    let mut persistence = create_test_persistence();
    let fixture = create_medical_passed_candidate(&mut persistence);
    let payment: PaymentTransactionResponse = pay(
        &mut persistence,
        TransactionType::Downpayment,
        fixture.agreement_id,
        20_000,
    )
    .unwrap();
    let reversal: PaymentTransactionResponse = reverse(&mut persistence, payment.id).unwrap();

    let err: ApiError = reverse(&mut persistence, reversal.id).unwrap_err();
    assert_eq!(err.kind(), "VALIDATION");

    let err: ApiError = reverse(&mut persistence, 9_999).unwrap_err();
    assert_eq!(err.kind(), "NOT_FOUND");
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_statement_defaults_to_current_agreement() {
    let mut persistence = create_test_persistence();
    let fixture = create_medical_passed_candidate(&mut persistence);
    pay(
        &mut persistence,
        TransactionType::Downpayment,
        fixture.agreement_id,
        50_000,
    )
    .unwrap();

    let statement: StatementResponse =
        candidate_statement(&mut persistence, fixture.candidate_id, None).unwrap();

    assert_eq!(statement.agreement_id, fixture.agreement_id);
    assert_eq!(statement.candidate_name, "Amina Wanjiru");
    assert_eq!(statement.currency, "KES");
    assert_eq!(statement.downpayment_paid, Amount::from_units(50_000));
    assert!(statement.downpayment_complete);
    assert_eq!(statement.payment_history[0].reference.as_deref(), Some("MP5000000"));
}

#[test]
fn test_statement_rejects_another_candidates_agreement() {
    let mut persistence = create_test_persistence();
    let fixture = create_medical_passed_candidate(&mut persistence);
    let other_candidate: i64 = register(&mut persistence, "RC-0002");

    let err: ApiError =
        candidate_statement(&mut persistence, other_candidate, Some(fixture.agreement_id))
            .unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));

    let err: ApiError = candidate_statement(&mut persistence, other_candidate, None).unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[test]
fn test_payment_status_without_agreement_is_false() {
    let mut persistence = create_test_persistence();
    let fixture = create_medical_passed_candidate(&mut persistence);
    let other_candidate: i64 = register(&mut persistence, "RC-0002");
    let assignment_id: i64 =
        assign(&mut persistence, other_candidate, fixture.job_order_id).unwrap();

    assert!(!downpayment_status(&mut persistence, assignment_id).unwrap());
    assert!(!full_payment_status(&mut persistence, assignment_id).unwrap());
}

// ============================================================================
// Agreements
// ============================================================================

#[test]
fn test_agreement_is_signed_once() {
    let mut persistence = create_test_persistence();
    let fixture = create_medical_passed_candidate(&mut persistence);
    let sign = |persistence: &mut Persistence| {
        sign_agreement(
            persistence,
            fixture.agreement_id,
            SignAgreementRequest {
                document_url: Some(String::from("https://files.example/agreements/1.pdf")),
            },
            create_test_context(),
        )
    };

    let signed: AgreementResponse = sign(&mut persistence).unwrap();
    assert!(signed.signed);
    assert!(signed.signed_at.is_some());

    let err: ApiError = sign(&mut persistence).unwrap_err();
    assert_eq!(
        err,
        ApiError::AlreadySigned {
            agreement_id: fixture.agreement_id
        }
    );
}

#[test]
fn test_second_agreement_conflicts_until_cancelled() {
    let mut persistence = create_test_persistence();
    let fixture = create_medical_passed_candidate(&mut persistence);

    let err: ApiError = agree(
        &mut persistence,
        fixture.candidate_id,
        fixture.assignment_id,
        150_000,
        30_000,
    )
    .unwrap_err();
    assert_eq!(err.kind(), "CONFLICT");

    let cancelled: AgreementResponse = cancel_agreement(
        &mut persistence,
        fixture.agreement_id,
        CancelAgreementRequest {
            reason: String::from("terms renegotiated"),
        },
        create_test_context(),
    )
    .unwrap();
    assert_eq!(cancelled.status, AgreementStatus::Cancelled);
    assert!(
        cancelled
            .notes
            .unwrap()
            .starts_with("CANCELLED: terms renegotiated")
    );

    let replacement: i64 = agree(
        &mut persistence,
        fixture.candidate_id,
        fixture.assignment_id,
        150_000,
        30_000,
    )
    .unwrap();
    let statement: StatementResponse =
        candidate_statement(&mut persistence, fixture.candidate_id, None).unwrap();
    assert_eq!(statement.agreement_id, replacement);
    assert_eq!(statement.total_commission_amount, Amount::from_units(150_000));
}

#[test]
fn test_agreement_terms_are_validated() {
    let mut persistence = create_test_persistence();
    let candidate_id: i64 = register(&mut persistence, "RC-0001");
    let job_order_id: i64 = open_job_order(&mut persistence, "JO-2026-01", 1, "NOT_REQUIRED");
    let assignment_id: i64 = assign(&mut persistence, candidate_id, job_order_id).unwrap();

    let err: ApiError =
        agree(&mut persistence, candidate_id, assignment_id, 40_000, 50_000).unwrap_err();

    assert!(matches!(
        err,
        ApiError::Validation { ref field, .. } if field == "requiredDownpaymentAmount"
    ));
}
