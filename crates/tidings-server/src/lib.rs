//! HTTP surface for Tidings.
//!
//! Exposes an axum [`Router`] over a [`NotificationService`] backed by any
//! store/registry pair. Session handling is upstream: every request names
//! its recipient in the `x-tidings-user` header and this layer trusts it.

pub mod error;
pub mod handlers;
pub mod identity;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, patch, post},
};
use serde::Deserialize;
use tidings_core::{store::NotificationStore, target::TargetRegistry};
use tidings_service::NotificationService;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: NotificationStore, R: TargetRegistry> {
  pub service: Arc<NotificationService<S, R>>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the notification API.
pub fn router<S, R>(state: AppState<S, R>) -> Router
where
  S: NotificationStore + Clone + Send + Sync + 'static,
  R: TargetRegistry + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/notifications",          get(handlers::index::<S, R>))
    .route("/notifications/{id}",     patch(handlers::update::<S, R>))
    .route("/notifications/read_all", post(handlers::read_all::<S, R>))
    .route("/notifications/counts",   get(handlers::counts::<S, R>))
    .layer(tower_http::trace::TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────
