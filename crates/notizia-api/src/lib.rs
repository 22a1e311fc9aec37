//! JSON request/response bridge for Notizia.
//!
//! Exposes an axum [`Router`] backed by any
//! [`notizia_core::store::RecordStore`], one route per store operation.
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", notizia_api::api_router(store.clone()))
//! ```

pub mod cases;
pub mod clients;
pub mod error;
pub mod sessions;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use notizia_core::store::RecordStore;
use serde::{Deserialize, Serialize};

pub use error::ApiError;

/// Response body of every `POST` that inserts a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
  pub id: i64,
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    // Clients
    .route("/clients", get(clients::list::<S>).post(clients::create::<S>))
    .route(
      "/clients/{id}",
      put(clients::update::<S>).delete(clients::delete::<S>),
    )
    .route("/clients/{id}/cases", get(clients::cases::<S>))
    // Cases
    .route("/cases", post(cases::create::<S>))
    .route("/cases/{id}/outcome", put(cases::update_outcome::<S>))
    .route("/cases/{id}/sessions", get(cases::sessions::<S>))
    // Sessions
    .route("/sessions", post(sessions::create::<S>))
    .route("/sessions/{id}", delete(sessions::delete::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
