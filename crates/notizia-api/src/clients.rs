//! Handlers for `/clients` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/clients` | Newest first |
//! | `POST`   | `/clients` | Body: `{"name":"...","note":"..."}`; returns 201 + `{"id":n}` |
//! | `PUT`    | `/clients/{id}` | Same body; 404 if the client does not exist |
//! | `DELETE` | `/clients/{id}` | Cascades to cases and sessions |
//! | `GET`    | `/clients/{id}/cases` | Latest started first |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use notizia_core::{
  ClientId,
  case::Case,
  client::{Client, ClientFields},
  store::RecordStore,
};

use crate::{Created, error::ApiError};

/// `GET /clients`
pub async fn list<S: RecordStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Client>>, ApiError> {
  let clients = store.list_clients().await.map_err(ApiError::from_store)?;
  Ok(Json(clients))
}

/// `POST /clients`
pub async fn create<S: RecordStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<ClientFields>,
) -> Result<impl IntoResponse, ApiError> {
  let id = store.add_client(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(Created { id })))
}

/// `PUT /clients/{id}`
pub async fn update<S: RecordStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<ClientId>,
  Json(body): Json<ClientFields>,
) -> Result<StatusCode, ApiError> {
  store
    .update_client(id, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /clients/{id}`
pub async fn delete<S: RecordStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<ClientId>,
) -> Result<StatusCode, ApiError> {
  store.delete_client(id).await.map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /clients/{id}/cases`
pub async fn cases<S: RecordStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<ClientId>,
) -> Result<Json<Vec<Case>>, ApiError> {
  let cases = store.list_cases(id).await.map_err(ApiError::from_store)?;
  Ok(Json(cases))
}
