//! Async HTTP client wrapping the Notizia JSON bridge.
//!
//! [`ApiClient`] implements [`RecordStore`], so the UI can run against a
//! remote server exactly as it runs against an in-process store.

use std::time::Duration;

use notizia_core::{
  CaseId, ClientId, ErrorKind, SessionId, StoreError,
  case::{Case, CaseOutcome, NewCase},
  client::{Client, ClientFields},
  session::{NewSession, Session},
  store::RecordStore,
};
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;

/// Connection settings for the Notizia API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  /// The server answered with a non-success status.
  #[error("{message} ({status})")]
  Status { status: StatusCode, message: String },
}

impl StoreError for ClientError {
  fn kind(&self) -> ErrorKind {
    match self {
      ClientError::Status { status, .. } if *status == StatusCode::NOT_FOUND => {
        ErrorKind::NotFound
      }
      ClientError::Status { status, .. }
        if *status == StatusCode::UNPROCESSABLE_ENTITY =>
      {
        ErrorKind::Constraint
      }
      _ => ErrorKind::Other,
    }
  }
}

type Result<T, E = ClientError> = std::result::Result<T, E>;

#[derive(Deserialize)]
struct Created {
  id: i64,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

/// Async HTTP client for the Notizia JSON API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: HttpClient,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
    let client = HttpClient::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  /// Turn a non-success response into [`ClientError::Status`], using the
  /// server's `{"error": "..."}` message when there is one.
  async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = match resp.json::<ErrorBody>().await {
      Ok(body) => body.error,
      Err(_) => status.canonical_reason().unwrap_or("request failed").to_owned(),
    };
    Err(ClientError::Status { status, message })
  }

  async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
    let resp = Self::check(req.send().await?).await?;
    Ok(resp.json().await?)
  }

  async fn execute(&self, req: RequestBuilder) -> Result<()> {
    Self::check(req.send().await?).await?;
    Ok(())
  }

  async fn create(&self, req: RequestBuilder) -> Result<i64> {
    let created: Created = self.fetch(req).await?;
    Ok(created.id)
  }
}

impl RecordStore for ApiClient {
  type Error = ClientError;

  // ── Clients ───────────────────────────────────────────────────────────────

  /// `GET /api/clients`
  async fn list_clients(&self) -> Result<Vec<Client>> {
    self.fetch(self.client.get(self.url("/clients"))).await
  }

  /// `POST /api/clients`
  async fn add_client(&self, fields: ClientFields) -> Result<ClientId> {
    self
      .create(self.client.post(self.url("/clients")).json(&fields))
      .await
  }

  /// `PUT /api/clients/{id}`
  async fn update_client(&self, id: ClientId, fields: ClientFields) -> Result<()> {
    self
      .execute(self.client.put(self.url(&format!("/clients/{id}"))).json(&fields))
      .await
  }

  /// `DELETE /api/clients/{id}`
  async fn delete_client(&self, id: ClientId) -> Result<()> {
    self
      .execute(self.client.delete(self.url(&format!("/clients/{id}"))))
      .await
  }

  // ── Cases ─────────────────────────────────────────────────────────────────

  /// `GET /api/clients/{id}/cases`
  async fn list_cases(&self, client_id: ClientId) -> Result<Vec<Case>> {
    self
      .fetch(self.client.get(self.url(&format!("/clients/{client_id}/cases"))))
      .await
  }

  /// `POST /api/cases`
  async fn add_case(&self, input: NewCase) -> Result<CaseId> {
    self
      .create(self.client.post(self.url("/cases")).json(&input))
      .await
  }

  /// `PUT /api/cases/{id}/outcome`. The server takes the id from the path
  /// and ignores it in the body.
  async fn update_case_outcome(&self, outcome: CaseOutcome) -> Result<()> {
    let url = self.url(&format!("/cases/{}/outcome", outcome.id));
    self.execute(self.client.put(url).json(&outcome)).await
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  /// `GET /api/cases/{id}/sessions`
  async fn list_sessions(&self, case_id: CaseId) -> Result<Vec<Session>> {
    self
      .fetch(self.client.get(self.url(&format!("/cases/{case_id}/sessions"))))
      .await
  }

  /// `POST /api/sessions`
  async fn add_session(&self, input: NewSession) -> Result<SessionId> {
    self
      .create(self.client.post(self.url("/sessions")).json(&input))
      .await
  }

  /// `DELETE /api/sessions/{id}`
  async fn delete_session(&self, id: SessionId) -> Result<()> {
    self
      .execute(self.client.delete(self.url(&format!("/sessions/{id}"))))
      .await
  }
}
