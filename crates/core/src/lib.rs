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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod agreement;
mod apply;
mod assignment;
mod command;
mod error;
mod ledger;
mod state;
mod view;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use agreement::apply_agreement;
pub use apply::{apply_candidate, apply_registration};
pub use assignment::apply_assignment;
pub use command::{
    AgreementCommand, AssignmentCommand, CandidateCommand, LedgerCommand, RegistrationCommand,
};
pub use error::CoreError;
pub use ledger::apply_ledger;
pub use state::{
    AgreementContext, AssignmentContext, CandidateContext, Change, LedgerContext,
    TransitionResult,
};
pub use view::{WorkflowView, allowed_next_statuses, workflow_view};
