// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

/// Represents the entity performing an action.
///
/// An actor is whoever initiated a state change: an operator identified by
/// the authentication layer, or the system itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "operator", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// The actor used when no identity was supplied.
    #[must_use]
    pub fn system() -> Self {
        Self::new(String::from("system"), String::from("system"))
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`TransitionCandidate`", "`RecordPayment`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A compact textual snapshot of the touched aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// `key=value` pairs describing the relevant state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    ///
    /// # Arguments
    ///
    /// * `data` - A string representation of the state
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// The aggregates an audit event concerns.
///
/// Any identifier may be absent, for example when the event records the
/// creation of the aggregate itself and the identifier is not yet assigned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditScope {
    /// The candidate concerned, if any.
    pub candidate_id: Option<i64>,
    /// The assignment concerned, if any.
    pub assignment_id: Option<i64>,
    /// The commission agreement concerned, if any.
    pub agreement_id: Option<i64>,
}

impl AuditScope {
    /// A scope naming only a candidate.
    #[must_use]
    pub const fn candidate(candidate_id: i64) -> Self {
        Self {
            candidate_id: Some(candidate_id),
            assignment_id: None,
            agreement_id: None,
        }
    }

    /// Returns this scope with the assignment set.
    #[must_use]
    pub const fn with_assignment(mut self, assignment_id: i64) -> Self {
        self.assignment_id = Some(assignment_id);
        self
    }

    /// Returns this scope with the agreement set.
    #[must_use]
    pub const fn with_agreement(mut self, agreement_id: i64) -> Self {
        self.agreement_id = Some(agreement_id);
        self
    }
}

/// An immutable audit event representing a state transition.
///
/// Every successful mutation produces exactly one audit event, written in
/// the same transaction as the mutation. It captures:
/// - Who performed the action (actor)
/// - Why it was performed (cause)
/// - What action was performed (action)
/// - The state before and after the transition
/// - Which aggregates were touched (scope)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
    /// The aggregates concerned.
    pub scope: AuditScope,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    /// * `scope` - The aggregates concerned
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        scope: AuditScope,
    ) -> Self {
        Self {
            actor,
            cause,
            action,
            before,
            after,
            scope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_event(scope: AuditScope) -> AuditEvent {
        AuditEvent::new(
            Actor::new(String::from("officer-7"), String::from("operator")),
            Cause::new(String::from("req-456"), String::from("Operator request")),
            Action::new(String::from("TransitionCandidate"), None),
            StateSnapshot::new(String::from("status=MEDICAL_PASSED")),
            StateSnapshot::new(String::from("status=VISA_PROCESSING")),
            scope,
        )
    }

    #[test]
    fn test_actor_creation_requires_all_fields() {
        let actor: Actor = Actor::new(String::from("officer-7"), String::from("operator"));

        assert_eq!(actor.id, "officer-7");
        assert_eq!(actor.actor_type, "operator");
    }

    #[test]
    fn test_system_actor() {
        let actor: Actor = Actor::system();

        assert_eq!(actor.id, "system");
        assert_eq!(actor.actor_type, "system");
    }

    #[test]
    fn test_action_creation_with_details() {
        let action: Action = Action::new(
            String::from("RecordPayment"),
            Some(String::from("DOWNPAYMENT 50,000")),
        );

        assert_eq!(action.name, "RecordPayment");
        assert_eq!(action.details, Some(String::from("DOWNPAYMENT 50,000")));
    }

    #[test]
    fn test_scope_builders() {
        let scope: AuditScope = AuditScope::candidate(3)
            .with_assignment(4)
            .with_agreement(5);

        assert_eq!(scope.candidate_id, Some(3));
        assert_eq!(scope.assignment_id, Some(4));
        assert_eq!(scope.agreement_id, Some(5));
        assert_eq!(AuditScope::default().candidate_id, None);
    }

    #[test]
    fn test_audit_event_equality() {
        let event1: AuditEvent = create_test_event(AuditScope::candidate(1));
        let event2: AuditEvent = create_test_event(AuditScope::candidate(1));
        let event3: AuditEvent = create_test_event(AuditScope::candidate(2));

        assert_eq!(event1, event2);
        assert_ne!(event1, event3);
    }

    #[test]
    fn test_audit_event_carries_snapshots() {
        let event: AuditEvent = create_test_event(AuditScope::candidate(1));

        assert_eq!(event.action.name, "TransitionCandidate");
        assert_eq!(event.before.data, "status=MEDICAL_PASSED");
        assert_eq!(event.after.data, "status=VISA_PROCESSING");
    }
}
