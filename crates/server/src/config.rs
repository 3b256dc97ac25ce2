// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Command-line and environment configuration for the server.

use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use roms_api::{DEFAULT_EXPIRY_WARNING_DAYS, WorkflowSettings};
use roms_domain::{DocumentPolicy, DocumentType};
use thiserror::Error;

/// ROMS Server - HTTP server for recruitment operations
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "ROMS_DATABASE")]
    pub database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, env = "ROMS_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Address to bind the server to
    #[arg(long, env = "ROMS_BIND", default_value = "127.0.0.1")]
    pub bind: String,

    /// Months a passport must remain valid beyond the review date
    #[arg(long, env = "ROMS_PASSPORT_MIN_VALIDITY_MONTHS", default_value_t = 6)]
    pub passport_min_validity_months: u8,

    /// Days before expiry at which documents are flagged as expiring soon
    #[arg(long, env = "ROMS_EXPIRY_WARNING_DAYS", default_value_t = DEFAULT_EXPIRY_WARNING_DAYS)]
    pub expiry_warning_days: u32,

    /// Comma separated document types required before review
    #[arg(
        long,
        env = "ROMS_REQUIRED_DOCUMENTS",
        default_value = "passport,cv,educational_certificate"
    )]
    pub required_documents: String,
}

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The bind address is not an IP address.
    #[error("invalid bind address '{value}': {reason}")]
    InvalidBindAddress {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A required document entry is not a known document type.
    #[error("invalid required document '{value}': {reason}")]
    InvalidDocumentType {
        /// The rejected entry.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
    /// The same document type was listed more than once.
    #[error("required document '{document_type}' listed more than once")]
    DuplicateDocumentType {
        /// The repeated type.
        document_type: DocumentType,
    },
}

impl Args {
    /// Resolves the socket address from `--bind` and `--port`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bind address does not parse.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .bind
            .trim()
            .parse()
            .map_err(|err: std::net::AddrParseError| ConfigError::InvalidBindAddress {
                value: self.bind.clone(),
                reason: err.to_string(),
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Builds the workflow settings the API layer evaluates against.
    ///
    /// # Errors
    ///
    /// Returns an error if a required document entry is unknown or repeated.
    pub fn workflow_settings(&self) -> Result<WorkflowSettings, ConfigError> {
        Ok(WorkflowSettings {
            document_policy: DocumentPolicy {
                required_types: parse_required_documents(&self.required_documents)?,
                passport_min_validity_months: self.passport_min_validity_months,
            },
            expiry_warning_days: self.expiry_warning_days,
        })
    }
}

/// Parses a comma separated list of document types. Blank entries are skipped.
///
/// # Errors
///
/// Returns an error for an unknown or repeated type.
pub fn parse_required_documents(list: &str) -> Result<Vec<DocumentType>, ConfigError> {
    let mut required: Vec<DocumentType> = Vec::new();
    for entry in list.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let document_type: DocumentType =
            entry
                .parse()
                .map_err(|err: roms_domain::DomainError| ConfigError::InvalidDocumentType {
                    value: entry.to_string(),
                    reason: err.to_string(),
                })?;
        if required.contains(&document_type) {
            return Err(ConfigError::DuplicateDocumentType { document_type });
        }
        required.push(document_type);
    }
    Ok(required)
}
