// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `candidates`: candidates and documents
//! - `assignments`: job orders and assignments
//! - `commission`: agreements and ledger entries
//! - `audit`: the audit trail
//! - `context`: command fact loaders built from the above

pub mod assignments;
pub mod audit;
pub mod candidates;
pub mod commission;
pub mod context;

pub use audit::AuditRecord;
