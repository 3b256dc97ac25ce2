// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! - `candidates`: candidates and documents
//! - `assignments`: job orders and assignments
//! - `commission`: agreements and the append-only ledger
//! - `audit`: audit events
//! - `transition`: writes a whole `TransitionResult`
//!
//! `get_last_insert_rowid()` is the only backend helper used here.

pub mod assignments;
pub mod audit;
pub mod candidates;
pub mod commission;
pub mod transition;

pub use transition::{PersistTransitionResult, persist_transition};
