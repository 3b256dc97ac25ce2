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
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod config;
mod error;
mod origin;
mod routes;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use clap::Parser;
use roms_api::WorkflowSettings;
use roms_persistence::Persistence;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::Args;
use crate::routes::build_router;

/// Application state shared across handlers.
///
/// Persistence sits behind a Mutex; every operation additionally runs in its
/// own immediate SQLite transaction.
#[derive(Clone)]
pub struct AppState {
    /// The persistence layer.
    pub persistence: Arc<Mutex<Persistence>>,
    /// Document policy and expiry window applied to every request.
    pub settings: Arc<WorkflowSettings>,
}

impl AppState {
    /// Wraps an opened persistence layer.
    #[must_use]
    pub fn new(persistence: Persistence, settings: WorkflowSettings) -> Self {
        Self {
            persistence: Arc::new(Mutex::new(persistence)),
            settings: Arc::new(settings),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing ROMS Server");

    let settings: WorkflowSettings = args.workflow_settings()?;
    let addr: SocketAddr = args.socket_addr()?;
    info!(
        required_documents = ?settings.document_policy.required_types,
        passport_min_validity_months = settings.document_policy.passport_min_validity_months,
        expiry_warning_days = settings.expiry_warning_days,
        "Loaded workflow settings"
    );

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app: Router = build_router(AppState::new(persistence, settings));

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
