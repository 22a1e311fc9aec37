//! Handlers for `/sessions` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/sessions` | Body: [`NewSession`]; returns 201 + `{"id":n}` |
//! | `DELETE` | `/sessions/{id}` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use notizia_core::{SessionId, session::NewSession, store::RecordStore};

use crate::{Created, error::ApiError};

/// `POST /sessions`
pub async fn create<S: RecordStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewSession>,
) -> Result<impl IntoResponse, ApiError> {
  let id = store.add_session(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(Created { id })))
}

/// `DELETE /sessions/{id}`
pub async fn delete<S: RecordStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<SessionId>,
) -> Result<StatusCode, ApiError> {
  store.delete_session(id).await.map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
