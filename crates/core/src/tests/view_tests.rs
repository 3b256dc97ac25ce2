// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roms_domain::{
    Amount, CandidateStatus, DocumentPolicy, DocumentType, ExpiryFlag, TransactionType,
};

use super::helpers::{
    NOW, create_candidate_context, create_commission_context, create_test_payment,
};
use crate::{CandidateContext, WorkflowView, allowed_next_statuses, workflow_view};

#[test]
fn test_closed_gate_removes_target_and_blocks() {
    let context: CandidateContext =
        create_commission_context(CandidateStatus::MedicalPassed, vec![]);

    let view: WorkflowView =
        workflow_view(&context, &DocumentPolicy::default(), NOW.date(), 90).unwrap();

    assert_eq!(
        view.allowed_transitions,
        vec![CandidateStatus::Rejected, CandidateStatus::Withdrawn]
    );
    assert!(view.blocked);
    assert_eq!(
        view.blocked_reason.as_deref(),
        Some("VISA_PROCESSING: downpayment incomplete: 0 of 50,000 paid")
    );
    let statement = view.statement.unwrap();
    assert_eq!(statement.outstanding_balance, Amount::from_units(200_000));
}

#[test]
fn test_open_gate_allows_target() {
    let context: CandidateContext = create_commission_context(
        CandidateStatus::MedicalPassed,
        vec![create_test_payment(1, 50_000, TransactionType::Downpayment)],
    );

    let allowed: Vec<CandidateStatus> =
        allowed_next_statuses(&context, &DocumentPolicy::default(), NOW.date()).unwrap();

    assert_eq!(
        allowed,
        vec![
            CandidateStatus::VisaProcessing,
            CandidateStatus::Rejected,
            CandidateStatus::Withdrawn,
        ]
    );
}

#[test]
fn test_missing_documents_block_review() {
    let mut context: CandidateContext =
        create_candidate_context(CandidateStatus::ApplicationSubmitted);
    context
        .documents
        .retain(|document| document.document_type == DocumentType::Passport);

    let view: WorkflowView =
        workflow_view(&context, &DocumentPolicy::default(), NOW.date(), 90).unwrap();

    assert_eq!(view.stage_title, CandidateStatus::ApplicationSubmitted.stage_title());
    assert!(view.blocked);
    assert_eq!(
        view.missing_types,
        vec![DocumentType::Cv, DocumentType::EducationalCertificate]
    );
    assert!(
        view.blocked_reason
            .unwrap()
            .starts_with("UNDER_REVIEW: required documents missing")
    );
    assert_eq!(view.expiry_flag, ExpiryFlag::Valid);
    assert!(view.statement.is_none());
}

#[test]
fn test_terminal_candidate_is_not_blocked() {
    let context: CandidateContext = create_candidate_context(CandidateStatus::Placed);

    let view: WorkflowView =
        workflow_view(&context, &DocumentPolicy::default(), NOW.date(), 90).unwrap();

    assert!(view.allowed_transitions.is_empty());
    assert!(!view.blocked);
    assert_eq!(view.blocked_reason, None);
}
