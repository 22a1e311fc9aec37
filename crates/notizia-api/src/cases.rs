//! Handlers for `/cases` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/cases` | Body: [`NewCase`]; `status` defaults to `open`; returns 201 + `{"id":n}` |
//! | `PUT`  | `/cases/{id}/outcome` | Body: [`OutcomeBody`]; full replace of the outcome fields |
//! | `GET`  | `/cases/{id}/sessions` | Latest started first |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use notizia_core::{
  CaseId,
  case::{CaseOutcome, CaseStatus, NewCase},
  session::{Method, Session},
  store::RecordStore,
};
use serde::{Deserialize, Serialize};

use crate::{Created, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /cases`
pub async fn create<S: RecordStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewCase>,
) -> Result<impl IntoResponse, ApiError> {
  let id = store.add_case(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(Created { id })))
}

// ─── Outcome ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `PUT /cases/{id}/outcome`: a [`CaseOutcome`]
/// without the id, which comes from the path. Omitted fields become null.
#[derive(Debug, Serialize, Deserialize)]
pub struct OutcomeBody {
  pub status:             CaseStatus,
  #[serde(default)]
  pub resolved_at:        Option<DateTime<Utc>>,
  #[serde(default)]
  pub resolved_by_method: Option<Method>,
  #[serde(default)]
  pub sessions_total:     Option<i64>,
  #[serde(default)]
  pub pc_self:            Option<i64>,
  #[serde(default)]
  pub pc_relationships:   Option<i64>,
  #[serde(default)]
  pub pc_world:           Option<i64>,
  #[serde(default)]
  pub symptom_change_pct: Option<i64>,
  #[serde(default)]
  pub outcome_notes:      Option<String>,
}

impl OutcomeBody {
  pub fn into_outcome(self, id: CaseId) -> CaseOutcome {
    CaseOutcome {
      id,
      status:             self.status,
      resolved_at:        self.resolved_at,
      resolved_by_method: self.resolved_by_method,
      sessions_total:     self.sessions_total,
      pc_self:            self.pc_self,
      pc_relationships:   self.pc_relationships,
      pc_world:           self.pc_world,
      symptom_change_pct: self.symptom_change_pct,
      outcome_notes:      self.outcome_notes,
    }
  }
}

/// `PUT /cases/{id}/outcome`
pub async fn update_outcome<S: RecordStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<CaseId>,
  Json(body): Json<OutcomeBody>,
) -> Result<StatusCode, ApiError> {
  store
    .update_case_outcome(body.into_outcome(id))
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Sessions of a case ───────────────────────────────────────────────────────

/// `GET /cases/{id}/sessions`
pub async fn sessions<S: RecordStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<CaseId>,
) -> Result<Json<Vec<Session>>, ApiError> {
  let sessions = store.list_sessions(id).await.map_err(ApiError::from_store)?;
  Ok(Json(sessions))
}
