// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every handler runs in a single database transaction: the facts are loaded,
//! the core decides, and the resulting changes are persisted together with
//! their audit event. Any error rolls the whole transaction back.

use std::str::FromStr;

use roms::{
    AgreementCommand, AssignmentCommand, CandidateCommand, LedgerCommand, RegistrationCommand,
    TransitionResult, WorkflowView, allowed_next_statuses, apply_agreement, apply_assignment,
    apply_candidate, apply_ledger, apply_registration, workflow_view as build_workflow_view,
};
use roms_domain::{
    CandidateStatus, CommissionAgreement, DocumentEvaluation, DocumentType, DomainError,
    EntryDirection, InterviewPolicy, JobOrderStatus, MedicalStatus, NewJobOrder, Statement,
    TransactionType, compute_statement,
};
use roms_persistence::{PersistTransitionResult, Persistence, Store};
use time::Date;
use tracing::{debug, info};

use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::request_response::{
    AddDocumentRequest, AgreementResponse, AssignmentResponse, AuditEventResponse,
    CancelAgreementRequest, CancelAssignmentRequest, CandidateResponse, CreateAgreementRequest,
    CreateAssignmentRequest, CreateJobOrderRequest, DocumentResponse, JobOrderResponse,
    MedicalResultRequest, PaymentRequest, PaymentTransactionResponse, RegisterCandidateRequest,
    ReversePaymentRequest, ReviewDocumentsResponse, ScheduleInterviewRequest,
    SignAgreementRequest, StatementResponse, TransitionRequest, WorkflowViewResponse,
    parse_request_date,
};
use crate::{RequestContext, WorkflowSettings};

fn parse_field<T>(value: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = DomainError>,
{
    value.parse::<T>().map_err(translate_domain_error)
}

fn created_id(result: PersistTransitionResult, resource: &str) -> Result<i64, ApiError> {
    result.created_id.ok_or_else(|| ApiError::Internal {
        message: format!("Persisting the new {resource} did not return an id"),
    })
}

/// Applies a candidate command and persists the outcome.
fn run_candidate_command(
    store: &mut Store<'_>,
    settings: &WorkflowSettings,
    candidate_id: i64,
    command: CandidateCommand,
    caller: RequestContext,
) -> Result<(TransitionResult, PersistTransitionResult), ApiError> {
    let context = store.candidate_context(candidate_id)?;
    let result: TransitionResult = apply_candidate(
        &context,
        &settings.document_policy,
        command,
        caller.now,
        caller.actor,
        caller.cause,
    )
    .map_err(translate_core_error)?;
    let persisted: PersistTransitionResult = store.persist_transition(&result)?;
    Ok((result, persisted))
}

// ============================================================================
// Candidates
// ============================================================================

/// Registers a new candidate in `APPLICATION_SUBMITTED`.
///
/// When the request names a job order the candidate is assigned to it in the
/// same transaction, under the same rules as `create_assignment`. If the
/// assignment is refused the candidate is not registered either.
///
/// # Errors
///
/// Returns an error if:
/// - The reference number is already registered
/// - The reference number or name is empty
/// - The job order does not exist, is not open, or is full
/// - The database write fails
pub fn register_candidate(
    persistence: &mut Persistence,
    request: RegisterCandidateRequest,
    context: RequestContext,
) -> Result<CandidateResponse, ApiError> {
    persistence.transaction(move |store| {
        let reference_number: String = request.reference_number.trim().to_string();
        if store.candidate_reference_exists(&reference_number)? {
            return Err(ApiError::Conflict {
                resource: String::from("candidate"),
                message: format!("Reference number '{reference_number}' is already registered"),
            });
        }

        let result: TransitionResult = apply_registration(
            RegistrationCommand::RegisterCandidate {
                reference_number,
                full_name: request.full_name,
            },
            context.now,
            context.actor.clone(),
            context.cause.clone(),
        )
        .map_err(translate_core_error)?;
        let candidate_id: i64 = created_id(store.persist_transition(&result)?, "candidate")?;
        info!(candidate_id, "Registered candidate");

        if let Some(job_order_id) = request.job_order_id {
            let assignment_context = store.new_assignment_context(candidate_id, job_order_id)?;
            let result: TransitionResult = apply_assignment(
                &assignment_context,
                AssignmentCommand::Create { notes: None },
                context.now,
                context.actor,
                context.cause,
            )
            .map_err(translate_core_error)?;
            let assignment_id: i64 =
                created_id(store.persist_transition(&result)?, "assignment")?;
            info!(
                assignment_id,
                candidate_id,
                job_order_id,
                "Assigned candidate at registration"
            );
        }

        CandidateResponse::from_domain(&store.candidate(candidate_id)?)
    })
}

/// Returns a candidate.
///
/// # Errors
///
/// Returns an error if the candidate does not exist.
pub fn get_candidate(
    persistence: &mut Persistence,
    candidate_id: i64,
) -> Result<CandidateResponse, ApiError> {
    persistence.read(|store| CandidateResponse::from_domain(&store.candidate(candidate_id)?))
}

/// Moves a candidate to a new status through the Workflow Guard.
///
/// The payment gates are checked here as well: `VISA_PROCESSING` needs the
/// downpayment and `PLACED` needs the full commission.
///
/// # Errors
///
/// Returns an error if:
/// - The status string is not recognised
/// - The guard rejects the move (`IllegalTransition`)
/// - A commission condition is unmet (`PaymentGate`)
/// - The candidate changed concurrently (`Conflict`)
pub fn transition_candidate(
    persistence: &mut Persistence,
    settings: &WorkflowSettings,
    candidate_id: i64,
    request: &TransitionRequest,
    context: RequestContext,
) -> Result<CandidateResponse, ApiError> {
    let target: CandidateStatus = parse_field(&request.status)?;

    persistence.transaction(move |store| {
        run_candidate_command(
            store,
            settings,
            candidate_id,
            CandidateCommand::Transition { target },
            context,
        )?;

        info!(candidate_id, status = %target, "Candidate transitioned");
        CandidateResponse::from_domain(&store.candidate(candidate_id)?)
    })
}

/// Returns the statuses a transition request would currently succeed for.
///
/// # Errors
///
/// Returns an error if the candidate does not exist or its ledger is inconsistent.
pub fn allowed_transitions(
    persistence: &mut Persistence,
    settings: &WorkflowSettings,
    candidate_id: i64,
    today: Date,
) -> Result<Vec<CandidateStatus>, ApiError> {
    persistence.read(|store| {
        let context = store.candidate_context(candidate_id)?;
        allowed_next_statuses(&context, &settings.document_policy, today)
            .map_err(translate_core_error)
    })
}

/// Evaluates a candidate's documents and records the outcome.
///
/// # Errors
///
/// Returns an error if the candidate is not awaiting a document review.
pub fn review_documents(
    persistence: &mut Persistence,
    settings: &WorkflowSettings,
    candidate_id: i64,
    context: RequestContext,
) -> Result<ReviewDocumentsResponse, ApiError> {
    persistence.transaction(move |store| {
        let (result, _) = run_candidate_command(
            store,
            settings,
            candidate_id,
            CandidateCommand::ReviewDocuments,
            context,
        )?;
        let evaluation: DocumentEvaluation =
            result.evaluation.ok_or_else(|| ApiError::Internal {
                message: String::from("Document review produced no evaluation"),
            })?;

        info!(
            candidate_id,
            next_status = %evaluation.next_status,
            missing = evaluation.missing_types.len(),
            "Reviewed candidate documents"
        );
        let candidate: CandidateResponse =
            CandidateResponse::from_domain(&store.candidate(candidate_id)?)?;
        Ok(ReviewDocumentsResponse::new(candidate, evaluation))
    })
}

/// Records the outcome of a candidate's medical examination.
///
/// # Errors
///
/// Returns an error if the result is not recognised or the candidate is not
/// `MEDICAL_PENDING`.
pub fn record_medical_result(
    persistence: &mut Persistence,
    settings: &WorkflowSettings,
    candidate_id: i64,
    request: &MedicalResultRequest,
    context: RequestContext,
) -> Result<CandidateResponse, ApiError> {
    let result: MedicalStatus = parse_field(&request.result)?;

    persistence.transaction(move |store| {
        run_candidate_command(
            store,
            settings,
            candidate_id,
            CandidateCommand::RecordMedicalResult { result },
            context,
        )?;

        info!(candidate_id, medical_status = %result, "Recorded medical result");
        CandidateResponse::from_domain(&store.candidate(candidate_id)?)
    })
}

/// Sets or moves the date of a candidate's employer interview.
///
/// The date is what allows `INTERVIEW_SCHEDULED` when the job order requires
/// an interview.
///
/// # Errors
///
/// Returns an error if the date is malformed or the candidate is past the
/// interview stage.
pub fn schedule_interview(
    persistence: &mut Persistence,
    settings: &WorkflowSettings,
    candidate_id: i64,
    request: &ScheduleInterviewRequest,
    context: RequestContext,
) -> Result<CandidateResponse, ApiError> {
    let interview_date: Date = parse_request_date("interviewDate", &request.interview_date)?;

    persistence.transaction(move |store| {
        run_candidate_command(
            store,
            settings,
            candidate_id,
            CandidateCommand::SetInterviewDate { interview_date },
            context,
        )?;

        info!(candidate_id, %interview_date, "Scheduled interview");
        CandidateResponse::from_domain(&store.candidate(candidate_id)?)
    })
}

/// Builds the workflow view for a candidate.
///
/// # Errors
///
/// Returns an error if the candidate does not exist or its ledger is inconsistent.
pub fn workflow_view(
    persistence: &mut Persistence,
    settings: &WorkflowSettings,
    candidate_id: i64,
    today: Date,
) -> Result<WorkflowViewResponse, ApiError> {
    persistence.read(|store| {
        let context = store.candidate_context(candidate_id)?;
        let view: WorkflowView = build_workflow_view(
            &context,
            &settings.document_policy,
            today,
            settings.expiry_warning_days,
        )
        .map_err(translate_core_error)?;
        Ok(WorkflowViewResponse::from_view(view))
    })
}

/// Lists the audit trail of a candidate, oldest first.
///
/// # Errors
///
/// Returns an error if the candidate does not exist.
pub fn candidate_audit_trail(
    persistence: &mut Persistence,
    candidate_id: i64,
) -> Result<Vec<AuditEventResponse>, ApiError> {
    persistence.read(|store| {
        store.candidate(candidate_id)?;
        store
            .candidate_audit_events(candidate_id)?
            .into_iter()
            .map(AuditEventResponse::from_record)
            .collect()
    })
}

// ============================================================================
// Documents
// ============================================================================

/// Attaches a document to a candidate.
///
/// # Errors
///
/// Returns an error if the document type or expiry date is malformed.
pub fn add_document(
    persistence: &mut Persistence,
    settings: &WorkflowSettings,
    candidate_id: i64,
    request: AddDocumentRequest,
    context: RequestContext,
) -> Result<DocumentResponse, ApiError> {
    let document_type: DocumentType = parse_field(&request.document_type)?;
    let expiry_date: Option<Date> = request
        .expiry_date
        .as_deref()
        .map(|value| parse_request_date("expiryDate", value))
        .transpose()?;

    persistence.transaction(move |store| {
        let (_, persisted) = run_candidate_command(
            store,
            settings,
            candidate_id,
            CandidateCommand::AddDocument {
                document_type,
                verified: request.verified,
                expiry_date,
                file_reference: request.file_reference,
            },
            context,
        )?;
        let document_id: i64 = created_id(persisted, "document")?;

        debug!(candidate_id, document_id, %document_type, "Added document");
        DocumentResponse::from_domain(&store.document(document_id)?)
    })
}

/// Marks a document as verified.
///
/// # Errors
///
/// Returns an error if the document does not exist or is already verified.
pub fn verify_document(
    persistence: &mut Persistence,
    settings: &WorkflowSettings,
    document_id: i64,
    context: RequestContext,
) -> Result<DocumentResponse, ApiError> {
    persistence.transaction(move |store| {
        let candidate_id: i64 = store.document(document_id)?.candidate_id;
        run_candidate_command(
            store,
            settings,
            candidate_id,
            CandidateCommand::VerifyDocument { document_id },
            context,
        )?;

        debug!(candidate_id, document_id, "Verified document");
        DocumentResponse::from_domain(&store.document(document_id)?)
    })
}

// ============================================================================
// Job orders and assignments
// ============================================================================

/// Creates a job order.
///
/// # Errors
///
/// Returns an error if the reference is taken or a field is invalid.
pub fn create_job_order(
    persistence: &mut Persistence,
    request: CreateJobOrderRequest,
    context: RequestContext,
) -> Result<JobOrderResponse, ApiError> {
    let interview_policy: InterviewPolicy = parse_field(&request.interview_policy)?;
    let status: JobOrderStatus = match request.status.as_deref() {
        Some(status) => parse_field(status)?,
        None => JobOrderStatus::Open,
    };

    persistence.transaction(move |store| {
        let reference: String = request.reference.trim().to_string();
        if store.job_order_reference_exists(&reference)? {
            return Err(ApiError::Conflict {
                resource: String::from("job order"),
                message: format!("Job order reference '{reference}' already exists"),
            });
        }

        let result: TransitionResult = apply_registration(
            RegistrationCommand::CreateJobOrder(NewJobOrder {
                reference,
                title: request.title,
                employer_name: request.employer_name,
                headcount_required: request.headcount_required,
                status,
                interview_policy,
            }),
            context.now,
            context.actor,
            context.cause,
        )
        .map_err(translate_core_error)?;
        let job_order_id: i64 = created_id(store.persist_transition(&result)?, "job order")?;

        info!(job_order_id, "Created job order");
        Ok(JobOrderResponse::from(&store.job_order(job_order_id)?))
    })
}

/// Returns a job order.
///
/// # Errors
///
/// Returns an error if the job order does not exist.
pub fn get_job_order(
    persistence: &mut Persistence,
    job_order_id: i64,
) -> Result<JobOrderResponse, ApiError> {
    persistence.read(|store| Ok(JobOrderResponse::from(&store.job_order(job_order_id)?)))
}

/// Assigns a candidate to a job order.
///
/// # Errors
///
/// Returns an error if:
/// - The candidate already has an active assignment (`Conflict`)
/// - The job order is not open or has no headcount left
/// - The candidate is in a terminal status
pub fn create_assignment(
    persistence: &mut Persistence,
    request: CreateAssignmentRequest,
    context: RequestContext,
) -> Result<AssignmentResponse, ApiError> {
    persistence.transaction(move |store| {
        let assignment_context =
            store.new_assignment_context(request.candidate_id, request.job_order_id)?;
        let result: TransitionResult = apply_assignment(
            &assignment_context,
            AssignmentCommand::Create {
                notes: request.notes,
            },
            context.now,
            context.actor,
            context.cause,
        )
        .map_err(translate_core_error)?;
        let assignment_id: i64 = created_id(store.persist_transition(&result)?, "assignment")?;

        info!(
            assignment_id,
            candidate_id = request.candidate_id,
            job_order_id = request.job_order_id,
            "Created assignment"
        );
        AssignmentResponse::from_domain(&store.assignment(assignment_id)?)
    })
}

/// Returns an assignment.
///
/// # Errors
///
/// Returns an error if the assignment does not exist.
pub fn get_assignment(
    persistence: &mut Persistence,
    assignment_id: i64,
) -> Result<AssignmentResponse, ApiError> {
    persistence.read(|store| AssignmentResponse::from_domain(&store.assignment(assignment_id)?))
}

fn run_assignment_command(
    persistence: &mut Persistence,
    assignment_id: i64,
    command: AssignmentCommand,
    context: RequestContext,
) -> Result<AssignmentResponse, ApiError> {
    persistence.transaction(move |store| {
        let assignment_context = store.assignment_context(assignment_id)?;
        let result: TransitionResult = apply_assignment(
            &assignment_context,
            command,
            context.now,
            context.actor,
            context.cause,
        )
        .map_err(translate_core_error)?;
        store.persist_transition(&result)?;

        info!(assignment_id, action = %result.audit_event.action.name, "Updated assignment");
        AssignmentResponse::from_domain(&store.assignment(assignment_id)?)
    })
}

/// Cancels an active assignment and releases its headcount.
///
/// # Errors
///
/// Returns an error if the assignment does not exist or is no longer active.
pub fn cancel_assignment(
    persistence: &mut Persistence,
    assignment_id: i64,
    request: CancelAssignmentRequest,
    context: RequestContext,
) -> Result<AssignmentResponse, ApiError> {
    run_assignment_command(
        persistence,
        assignment_id,
        AssignmentCommand::Cancel {
            assignment_id,
            reason: request.reason,
        },
        context,
    )
}

/// Records that the employer issued an offer.
///
/// # Errors
///
/// Returns an error if the offer was already issued.
pub fn issue_offer(
    persistence: &mut Persistence,
    assignment_id: i64,
    context: RequestContext,
) -> Result<AssignmentResponse, ApiError> {
    run_assignment_command(
        persistence,
        assignment_id,
        AssignmentCommand::IssueOffer { assignment_id },
        context,
    )
}

/// Records that the placement was confirmed.
///
/// # Errors
///
/// Returns an error if no offer was issued, the placement was already
/// confirmed, or the commission is not fully paid.
pub fn confirm_placement(
    persistence: &mut Persistence,
    assignment_id: i64,
    context: RequestContext,
) -> Result<AssignmentResponse, ApiError> {
    run_assignment_command(
        persistence,
        assignment_id,
        AssignmentCommand::ConfirmPlacement { assignment_id },
        context,
    )
}

// ============================================================================
// Commission agreements
// ============================================================================

/// Creates the commission agreement for an assignment.
///
/// # Errors
///
/// Returns an error if:
/// - The assignment already has an active or completed agreement (`Conflict`)
/// - The assignment belongs to a different candidate
/// - The amounts or currency are invalid
pub fn create_agreement(
    persistence: &mut Persistence,
    request: CreateAgreementRequest,
    context: RequestContext,
) -> Result<AgreementResponse, ApiError> {
    persistence.transaction(move |store| {
        let agreement_context = store.agreement_context(request.assignment_id)?;
        let result: TransitionResult = apply_agreement(
            &agreement_context,
            AgreementCommand::Create {
                candidate_id: request.candidate_id,
                total_commission: request.total_commission_amount,
                required_downpayment: request.required_downpayment_amount,
                currency: request.currency,
                notes: request.notes,
            },
            context.now,
            context.actor,
            context.cause,
        )
        .map_err(translate_core_error)?;
        let agreement_id: i64 = created_id(store.persist_transition(&result)?, "agreement")?;

        info!(
            agreement_id,
            assignment_id = request.assignment_id,
            "Created commission agreement"
        );
        AgreementResponse::from_domain(&store.agreement(agreement_id)?)
    })
}

/// Returns a commission agreement.
///
/// # Errors
///
/// Returns an error if the agreement does not exist.
pub fn get_agreement(
    persistence: &mut Persistence,
    agreement_id: i64,
) -> Result<AgreementResponse, ApiError> {
    persistence.read(|store| AgreementResponse::from_domain(&store.agreement(agreement_id)?))
}

fn run_agreement_command(
    persistence: &mut Persistence,
    agreement_id: i64,
    command: AgreementCommand,
    context: RequestContext,
) -> Result<AgreementResponse, ApiError> {
    persistence.transaction(move |store| {
        let agreement_context = store.agreement_context_for(agreement_id)?;
        let result: TransitionResult = apply_agreement(
            &agreement_context,
            command,
            context.now,
            context.actor,
            context.cause,
        )
        .map_err(translate_core_error)?;
        store.persist_transition(&result)?;

        info!(agreement_id, action = %result.audit_event.action.name, "Updated agreement");
        AgreementResponse::from_domain(&store.agreement(agreement_id)?)
    })
}

/// Marks a commission agreement as signed.
///
/// # Errors
///
/// Returns `AlreadySigned` if the agreement was signed before.
pub fn sign_agreement(
    persistence: &mut Persistence,
    agreement_id: i64,
    request: SignAgreementRequest,
    context: RequestContext,
) -> Result<AgreementResponse, ApiError> {
    run_agreement_command(
        persistence,
        agreement_id,
        AgreementCommand::Sign {
            agreement_id,
            document_url: request.document_url,
        },
        context,
    )
}

/// Cancels an active commission agreement.
///
/// # Errors
///
/// Returns an error if the agreement is not active or the reason is empty.
pub fn cancel_agreement(
    persistence: &mut Persistence,
    agreement_id: i64,
    request: CancelAgreementRequest,
    context: RequestContext,
) -> Result<AgreementResponse, ApiError> {
    run_agreement_command(
        persistence,
        agreement_id,
        AgreementCommand::Cancel {
            agreement_id,
            reason: request.reason,
        },
        context,
    )
}

// ============================================================================
// Payments
// ============================================================================

/// Records a downpayment, installment or balance payment.
///
/// # Errors
///
/// Returns a validation error if the payment would overpay the agreement,
/// exceed the required downpayment, or otherwise break a ledger rule. The
/// ledger is unchanged on error.
pub fn record_payment(
    persistence: &mut Persistence,
    transaction_type: TransactionType,
    request: PaymentRequest,
    context: RequestContext,
) -> Result<PaymentTransactionResponse, ApiError> {
    persistence.transaction(move |store| {
        let ledger_context = store.ledger_context(request.agreement_id)?;
        let result: TransitionResult = apply_ledger(
            &ledger_context,
            LedgerCommand::RecordPayment {
                transaction_type,
                direction: EntryDirection::Debit,
                amount: request.amount,
                payment_method: request.payment_method,
                reference: request.reference,
                description: request.description,
            },
            context.now,
            context.actor,
            context.cause,
        )
        .map_err(translate_core_error)?;
        let transaction_id: i64 = created_id(store.persist_transition(&result)?, "payment")?;

        info!(
            transaction_id,
            agreement_id = request.agreement_id,
            %transaction_type,
            amount = %request.amount,
            "Recorded payment"
        );
        PaymentTransactionResponse::from_domain(&store.ledger_entry(transaction_id)?)
    })
}

/// Reverses a payment with a compensating credit.
///
/// # Errors
///
/// Returns `AlreadyReversed` if the payment was reversed before.
pub fn reverse_payment(
    persistence: &mut Persistence,
    transaction_id: i64,
    request: ReversePaymentRequest,
    context: RequestContext,
) -> Result<PaymentTransactionResponse, ApiError> {
    persistence.transaction(move |store| {
        let ledger_context = store.ledger_context_for_entry(transaction_id)?;
        let result: TransitionResult = apply_ledger(
            &ledger_context,
            LedgerCommand::Reverse {
                entry_id: transaction_id,
                reason: request.reason,
            },
            context.now,
            context.actor,
            context.cause,
        )
        .map_err(translate_core_error)?;
        let reversal_id: i64 = created_id(store.persist_transition(&result)?, "reversal")?;

        info!(transaction_id, reversal_id, "Reversed payment");
        PaymentTransactionResponse::from_domain(&store.ledger_entry(reversal_id)?)
    })
}

fn current_statement(
    store: &mut Store<'_>,
    assignment_id: i64,
) -> Result<Option<Statement>, ApiError> {
    let Some(agreement) = store.current_agreement(assignment_id)? else {
        return Ok(None);
    };
    let entries = store.ledger_entries(agreement.id)?;
    compute_statement(&agreement, &entries)
        .map(Some)
        .map_err(translate_domain_error)
}

/// Whether the downpayment of the assignment's current agreement is complete.
///
/// Returns `false` when the assignment has no current agreement.
///
/// # Errors
///
/// Returns an error if the ledger cannot be read.
pub fn downpayment_status(
    persistence: &mut Persistence,
    assignment_id: i64,
) -> Result<bool, ApiError> {
    persistence.read(|store| {
        Ok(current_statement(store, assignment_id)?
            .is_some_and(|statement| statement.downpayment_complete))
    })
}

/// Whether the assignment's current agreement is fully paid.
///
/// Returns `false` when the assignment has no current agreement.
///
/// # Errors
///
/// Returns an error if the ledger cannot be read.
pub fn full_payment_status(
    persistence: &mut Persistence,
    assignment_id: i64,
) -> Result<bool, ApiError> {
    persistence.read(|store| {
        Ok(current_statement(store, assignment_id)?
            .is_some_and(|statement| statement.full_payment_complete))
    })
}

/// Returns a candidate's commission statement.
///
/// Without an agreement id the current agreement of the candidate's active
/// assignment is used.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the candidate or agreement does not exist,
/// or if the agreement belongs to a different candidate.
pub fn candidate_statement(
    persistence: &mut Persistence,
    candidate_id: i64,
    agreement_id: Option<i64>,
) -> Result<StatementResponse, ApiError> {
    persistence.read(|store| {
        let candidate = store.candidate(candidate_id)?;
        let agreement: CommissionAgreement = match agreement_id {
            Some(agreement_id) => {
                let agreement: CommissionAgreement = store.agreement(agreement_id)?;
                if agreement.candidate_id != candidate_id {
                    return Err(ApiError::not_found(
                        "agreement",
                        format!(
                            "agreement {agreement_id} does not belong to candidate {candidate_id}"
                        ),
                    ));
                }
                agreement
            }
            None => {
                let no_agreement = || {
                    ApiError::not_found(
                        "agreement",
                        format!("candidate {candidate_id} has no current agreement"),
                    )
                };
                let assignment = store
                    .active_assignment(candidate_id)?
                    .ok_or_else(no_agreement)?;
                store
                    .current_agreement(assignment.id)?
                    .ok_or_else(no_agreement)?
            }
        };

        let entries = store.ledger_entries(agreement.id)?;
        let statement: Statement =
            compute_statement(&agreement, &entries).map_err(translate_domain_error)?;
        StatementResponse::new(&candidate, &statement)
    })
}
