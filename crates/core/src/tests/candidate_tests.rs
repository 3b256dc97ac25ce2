// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roms_audit::AuditScope;
use roms_domain::{
    AgreementStatus, Amount, AssignmentStatus, CandidateStatus, DocumentPolicy, DocumentType,
    DomainError, InterviewPolicy, JobOrderStatus, MedicalStatus, NewJobOrder, PaymentGateFailure,
    TransactionType,
};
use time::macros::date;

use super::helpers::{
    NOW, create_candidate_context, create_commission_context, create_test_actor,
    create_test_cause, create_test_document, create_test_payment,
};
use crate::{
    CandidateCommand, CandidateContext, Change, CoreError, RegistrationCommand, TransitionResult,
    apply_candidate, apply_registration,
};

fn transition(
    context: &CandidateContext,
    target: CandidateStatus,
) -> Result<TransitionResult, CoreError> {
    apply_candidate(
        context,
        &DocumentPolicy::default(),
        CandidateCommand::Transition { target },
        NOW,
        create_test_actor(),
        create_test_cause(),
    )
}

fn run(
    context: &CandidateContext,
    command: CandidateCommand,
) -> Result<TransitionResult, CoreError> {
    apply_candidate(
        context,
        &DocumentPolicy::default(),
        command,
        NOW,
        create_test_actor(),
        create_test_cause(),
    )
}

fn updated_status(result: &TransitionResult) -> CandidateStatus {
    match &result.changes[0] {
        Change::CandidateUpdated { candidate, .. } => candidate.status,
        other => panic!("expected a candidate update, got {other:?}"),
    }
}

// ============================================================================
// Payment gates
// ============================================================================

#[test]
fn test_visa_processing_blocked_without_downpayment() {
    let context: CandidateContext =
        create_commission_context(CandidateStatus::MedicalPassed, vec![]);

    let err: CoreError = transition(&context, CandidateStatus::VisaProcessing).unwrap_err();

    assert_eq!(
        err,
        CoreError::PaymentGate {
            target: CandidateStatus::VisaProcessing,
            failure: PaymentGateFailure::DownpaymentIncomplete {
                paid: Amount::ZERO,
                required: Amount::from_units(50_000),
            },
        }
    );
}

#[test]
fn test_partial_downpayment_names_amounts() {
    let context: CandidateContext = create_commission_context(
        CandidateStatus::MedicalPassed,
        vec![create_test_payment(1, 30_000, TransactionType::Downpayment)],
    );

    let err: CoreError = transition(&context, CandidateStatus::VisaProcessing).unwrap_err();

    assert!(
        err.to_string()
            .contains("downpayment incomplete: 30,000 of 50,000 paid")
    );
}

#[test]
fn test_visa_processing_allowed_after_downpayment() {
    let context: CandidateContext = create_commission_context(
        CandidateStatus::MedicalPassed,
        vec![create_test_payment(1, 50_000, TransactionType::Downpayment)],
    );

    let result: TransitionResult = transition(&context, CandidateStatus::VisaProcessing).unwrap();

    assert_eq!(result.changes.len(), 1);
    match &result.changes[0] {
        Change::CandidateUpdated {
            candidate,
            expected_version,
        } => {
            assert_eq!(candidate.status, CandidateStatus::VisaProcessing);
            assert_eq!(candidate.version, 5);
            assert_eq!(*expected_version, 4);
        }
        other => panic!("unexpected change {other:?}"),
    }
}

#[test]
fn test_gate_without_active_assignment() {
    let mut context: CandidateContext = create_candidate_context(CandidateStatus::MedicalPassed);
    context.candidate.medical_status = MedicalStatus::Passed;

    let err: CoreError = transition(&context, CandidateStatus::VisaProcessing).unwrap_err();

    assert!(matches!(
        err,
        CoreError::PaymentGate {
            failure: PaymentGateFailure::NoActiveAssignment,
            ..
        }
    ));
}

#[test]
fn test_gate_without_agreement() {
    let mut context: CandidateContext =
        create_commission_context(CandidateStatus::MedicalPassed, vec![]);
    context.agreement = None;

    let err: CoreError = transition(&context, CandidateStatus::VisaProcessing).unwrap_err();

    assert!(matches!(
        err,
        CoreError::PaymentGate {
            failure: PaymentGateFailure::NoAgreement,
            ..
        }
    ));
}

#[test]
fn test_payment_gate_is_checked_before_guard() {
    let mut context: CandidateContext =
        create_commission_context(CandidateStatus::MedicalPassed, vec![]);
    context.candidate.medical_status = MedicalStatus::Pending;

    let err: CoreError = transition(&context, CandidateStatus::VisaProcessing).unwrap_err();

    assert!(matches!(err, CoreError::PaymentGate { .. }));
}

#[test]
fn test_placement_requires_full_payment() {
    let context: CandidateContext = create_commission_context(
        CandidateStatus::DeploymentPending,
        vec![create_test_payment(1, 50_000, TransactionType::Downpayment)],
    );

    let err: CoreError = transition(&context, CandidateStatus::Placed).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Payment gate blocks PLACED: full payment incomplete: 50,000 of 200,000 paid"
    );
}

// ============================================================================
// Side effects
// ============================================================================

#[test]
fn test_placement_marks_assignment_and_completes_agreement() {
    let context: CandidateContext = create_commission_context(
        CandidateStatus::DeploymentPending,
        vec![
            create_test_payment(1, 50_000, TransactionType::Downpayment),
            create_test_payment(2, 150_000, TransactionType::Balance),
        ],
    );

    let result: TransitionResult = transition(&context, CandidateStatus::Placed).unwrap();

    assert_eq!(updated_status(&result), CandidateStatus::Placed);
    assert_eq!(result.changes.len(), 3);
    match &result.changes[1] {
        Change::AssignmentUpdated(assignment) => {
            assert_eq!(assignment.status, AssignmentStatus::Placed);
            assert_eq!(assignment.placement_confirmed_at, Some(NOW));
            assert!(assignment.is_active);
        }
        other => panic!("unexpected change {other:?}"),
    }
    match &result.changes[2] {
        Change::AgreementUpdated(agreement) => {
            assert_eq!(agreement.status, AgreementStatus::Completed);
        }
        other => panic!("unexpected change {other:?}"),
    }
}

#[test]
fn test_placement_with_completed_agreement_leaves_it_alone() {
    let mut context: CandidateContext = create_commission_context(
        CandidateStatus::DeploymentPending,
        vec![
            create_test_payment(1, 50_000, TransactionType::Downpayment),
            create_test_payment(2, 150_000, TransactionType::Balance),
        ],
    );
    if let Some(agreement) = context.agreement.as_mut() {
        agreement.status = AgreementStatus::Completed;
    }

    let result: TransitionResult = transition(&context, CandidateStatus::Placed).unwrap();

    assert_eq!(result.changes.len(), 2);
    assert!(
        !result
            .changes
            .iter()
            .any(|change| matches!(change, Change::AgreementUpdated(_)))
    );
}

#[test]
fn test_rejection_cancels_active_assignment_and_releases_headcount() {
    let context: CandidateContext =
        create_commission_context(CandidateStatus::OfferIssued, vec![]);

    let result: TransitionResult = transition(&context, CandidateStatus::Rejected).unwrap();

    assert_eq!(updated_status(&result), CandidateStatus::Rejected);
    match &result.changes[1] {
        Change::AssignmentUpdated(assignment) => {
            assert!(!assignment.is_active);
            assert_eq!(assignment.status, AssignmentStatus::Cancelled);
            assert_eq!(assignment.cancelled_at, Some(NOW));
        }
        other => panic!("unexpected change {other:?}"),
    }
    match &result.changes[2] {
        Change::JobOrderUpdated(job_order) => assert_eq!(job_order.headcount_filled, 0),
        other => panic!("unexpected change {other:?}"),
    }
}

#[test]
fn test_withdrawal_without_assignment_only_updates_candidate() {
    let context: CandidateContext = create_candidate_context(CandidateStatus::UnderReview);

    let result: TransitionResult = transition(&context, CandidateStatus::Withdrawn).unwrap();

    assert_eq!(result.changes.len(), 1);
    assert_eq!(updated_status(&result), CandidateStatus::Withdrawn);
}

#[test]
fn test_offer_issued_marks_assignment_offered() {
    let context: CandidateContext = create_commission_context(
        CandidateStatus::VisaProcessing,
        vec![create_test_payment(1, 50_000, TransactionType::Downpayment)],
    );

    let result: TransitionResult = transition(&context, CandidateStatus::OfferIssued).unwrap();

    match &result.changes[1] {
        Change::AssignmentUpdated(assignment) => {
            assert_eq!(assignment.status, AssignmentStatus::Offered);
            assert_eq!(assignment.offer_issued_at, Some(NOW));
        }
        other => panic!("unexpected change {other:?}"),
    }
}

#[test]
fn test_entering_medical_pending_resets_medical_status() {
    let context: CandidateContext =
        create_commission_context(CandidateStatus::InterviewPassed, vec![]);
    assert_eq!(context.candidate.medical_status, MedicalStatus::Passed);

    let result: TransitionResult = transition(&context, CandidateStatus::MedicalPending).unwrap();

    match &result.changes[0] {
        Change::CandidateUpdated { candidate, .. } => {
            assert_eq!(candidate.medical_status, MedicalStatus::Pending);
        }
        other => panic!("unexpected change {other:?}"),
    }
}

// ============================================================================
// Guard and audit
// ============================================================================

#[test]
fn test_skipping_a_stage_is_illegal() {
    let context: CandidateContext = create_candidate_context(CandidateStatus::ApplicationSubmitted);

    let err: CoreError = transition(&context, CandidateStatus::DocumentsApproved).unwrap_err();

    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::IllegalTransition { .. })
    ));
}

#[test]
fn test_interview_branch_follows_job_order() {
    let mut context: CandidateContext =
        create_commission_context(CandidateStatus::DocumentsApproved, vec![]);
    assert!(transition(&context, CandidateStatus::InterviewScheduled).is_err());

    context.candidate.interview_date = Some(date!(2026 - 04 - 15));
    assert!(transition(&context, CandidateStatus::InterviewScheduled).is_ok());
    assert!(transition(&context, CandidateStatus::MedicalPending).is_err());

    if let Some(job_order) = context.job_order.as_mut() {
        job_order.interview_policy = InterviewPolicy::NotRequired;
    }
    assert!(transition(&context, CandidateStatus::InterviewScheduled).is_err());
    assert!(transition(&context, CandidateStatus::MedicalPending).is_ok());
}

#[test]
fn test_set_interview_date_until_interview_passes() {
    let context: CandidateContext = create_candidate_context(CandidateStatus::DocumentsApproved);

    let result: TransitionResult = run(
        &context,
        CandidateCommand::SetInterviewDate {
            interview_date: date!(2026 - 04 - 15),
        },
    )
    .unwrap();
    match &result.changes[..] {
        [
            Change::CandidateUpdated {
                candidate,
                expected_version,
            },
        ] => {
            assert_eq!(candidate.interview_date, Some(date!(2026 - 04 - 15)));
            assert_eq!(candidate.status, CandidateStatus::DocumentsApproved);
            assert_eq!(candidate.version, 5);
            assert_eq!(*expected_version, 4);
        }
        other => panic!("unexpected changes {other:?}"),
    }
    assert_eq!(result.audit_event.action.name, "SetInterviewDate");

    let passed: CandidateContext = create_candidate_context(CandidateStatus::InterviewPassed);
    let err: CoreError = run(
        &passed,
        CandidateCommand::SetInterviewDate {
            interview_date: date!(2026 - 04 - 15),
        },
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::Conflict { ref resource, .. } if resource == "candidate"));
}

#[test]
fn test_transition_audit_event() {
    let context: CandidateContext = create_commission_context(
        CandidateStatus::MedicalPassed,
        vec![create_test_payment(1, 50_000, TransactionType::Downpayment)],
    );

    let result: TransitionResult = transition(&context, CandidateStatus::VisaProcessing).unwrap();

    let event = &result.audit_event;
    assert_eq!(event.action.name, "TransitionCandidate");
    assert_eq!(
        event.action.details.as_deref(),
        Some("MEDICAL_PASSED -> VISA_PROCESSING")
    );
    assert_eq!(event.before.data, "status=MEDICAL_PASSED,medical=PASSED,version=4");
    assert_eq!(event.after.data, "status=VISA_PROCESSING,medical=PASSED,version=5");
    assert_eq!(
        event.scope,
        AuditScope::candidate(1).with_assignment(5).with_agreement(10)
    );
    assert_eq!(event.actor.id, "officer-7");
}

// ============================================================================
// Document review
// ============================================================================

#[test]
fn test_review_after_supplying_missing_document_approves() {
    let context: CandidateContext =
        create_candidate_context(CandidateStatus::DocumentsInsufficient);

    let result: TransitionResult = run(&context, CandidateCommand::ReviewDocuments).unwrap();

    assert_eq!(updated_status(&result), CandidateStatus::DocumentsApproved);
    let evaluation = result.evaluation.unwrap();
    assert!(evaluation.missing_types.is_empty());
    assert_eq!(result.audit_event.action.name, "ReviewDocuments");
}

#[test]
fn test_review_with_missing_document_marks_insufficient() {
    let mut context: CandidateContext = create_candidate_context(CandidateStatus::UnderReview);
    context
        .documents
        .retain(|document| document.document_type != DocumentType::EducationalCertificate);

    let result: TransitionResult = run(&context, CandidateCommand::ReviewDocuments).unwrap();

    assert_eq!(updated_status(&result), CandidateStatus::DocumentsInsufficient);
    assert_eq!(
        result.evaluation.unwrap().missing_types,
        vec![DocumentType::EducationalCertificate]
    );
}

#[test]
fn test_repeat_review_while_insufficient_records_only_audit() {
    let mut context: CandidateContext =
        create_candidate_context(CandidateStatus::DocumentsInsufficient);
    context.documents[1].verified = false;

    let result: TransitionResult = run(&context, CandidateCommand::ReviewDocuments).unwrap();

    assert!(result.changes.is_empty());
    assert_eq!(
        result.audit_event.action.details.as_deref(),
        Some("Documents still insufficient: CV / Resume")
    );
}

#[test]
fn test_review_outside_review_stages_is_rejected() {
    let context: CandidateContext = create_candidate_context(CandidateStatus::ApplicationSubmitted);

    let err: CoreError = run(&context, CandidateCommand::ReviewDocuments).unwrap_err();

    assert!(matches!(err, CoreError::Conflict { .. }));
}

// ============================================================================
// Medical results and documents
// ============================================================================

#[test]
fn test_failed_medical_keeps_status() {
    let context: CandidateContext = create_candidate_context(CandidateStatus::MedicalPending);

    let result: TransitionResult = run(
        &context,
        CandidateCommand::RecordMedicalResult {
            result: MedicalStatus::Failed,
        },
    )
    .unwrap();

    match &result.changes[0] {
        Change::CandidateUpdated { candidate, .. } => {
            assert_eq!(candidate.status, CandidateStatus::MedicalPending);
            assert_eq!(candidate.medical_status, MedicalStatus::Failed);
            assert_eq!(candidate.version, 5);
        }
        other => panic!("unexpected change {other:?}"),
    }
}

#[test]
fn test_medical_result_requires_medical_pending() {
    let context: CandidateContext = create_candidate_context(CandidateStatus::UnderReview);

    let err: CoreError = run(
        &context,
        CandidateCommand::RecordMedicalResult {
            result: MedicalStatus::Passed,
        },
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::Conflict { .. }));

    let pending: CandidateContext = create_candidate_context(CandidateStatus::MedicalPending);
    let err: CoreError = run(
        &pending,
        CandidateCommand::RecordMedicalResult {
            result: MedicalStatus::Pending,
        },
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));
}

#[test]
fn test_add_document() {
    let context: CandidateContext = create_candidate_context(CandidateStatus::UnderReview);

    let result: TransitionResult = run(
        &context,
        CandidateCommand::AddDocument {
            document_type: DocumentType::PoliceClearance,
            verified: false,
            expiry_date: None,
            file_reference: Some(String::from("  ")),
        },
    )
    .unwrap();

    match &result.changes[0] {
        Change::DocumentAdded(document) => {
            assert_eq!(document.candidate_id, 1);
            assert_eq!(document.document_type, DocumentType::PoliceClearance);
            assert_eq!(document.file_reference, None);
            assert_eq!(document.uploaded_at, NOW);
        }
        other => panic!("unexpected change {other:?}"),
    }
}

#[test]
fn test_verify_document() {
    let mut context: CandidateContext = create_candidate_context(CandidateStatus::UnderReview);
    context
        .documents
        .push(create_test_document(4, DocumentType::Photo, false));

    let result: TransitionResult =
        run(&context, CandidateCommand::VerifyDocument { document_id: 4 }).unwrap();
    assert_eq!(
        result.changes,
        vec![Change::DocumentVerified { document_id: 4 }]
    );

    let err: CoreError =
        run(&context, CandidateCommand::VerifyDocument { document_id: 1 }).unwrap_err();
    assert!(matches!(err, CoreError::Conflict { .. }));

    let err: CoreError =
        run(&context, CandidateCommand::VerifyDocument { document_id: 99 }).unwrap_err();
    assert!(matches!(err, CoreError::NotFound { id: 99, .. }));
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn test_register_candidate() {
    let result: TransitionResult = apply_registration(
        RegistrationCommand::RegisterCandidate {
            reference_number: String::from(" CAND-0042 "),
            full_name: String::from("Peter Otieno"),
        },
        NOW,
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    match &result.changes[0] {
        Change::CandidateCreated(candidate) => {
            assert_eq!(candidate.reference_number, "CAND-0042");
        }
        other => panic!("unexpected change {other:?}"),
    }
    assert_eq!(result.audit_event.scope, AuditScope::default());
}

#[test]
fn test_register_candidate_rejects_blank_reference() {
    let err: CoreError = apply_registration(
        RegistrationCommand::RegisterCandidate {
            reference_number: String::from("  "),
            full_name: String::from("Peter Otieno"),
        },
        NOW,
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::InvalidReferenceNumber(_))
    ));
}

#[test]
fn test_create_job_order_requires_headcount() {
    let job_order: NewJobOrder = NewJobOrder {
        reference: String::from("JO-9"),
        title: String::from("Driver"),
        employer_name: String::from("Doha Logistics"),
        headcount_required: 0,
        status: JobOrderStatus::Open,
        interview_policy: InterviewPolicy::Required,
    };

    let err: CoreError = apply_registration(
        RegistrationCommand::CreateJobOrder(job_order),
        NOW,
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::InvalidHeadcount { required: 0 })
    );
}
