//! The `RecordStore` trait: the typed request/response bridge between the UI
//! and storage, one method per operation.
//!
//! Implemented by storage backends (`notizia-store-sqlite`) and by remote
//! clients that forward calls over HTTP (`notizia-cli`). Higher layers
//! (`notizia-api`, the terminal UI) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  CaseId, ClientId, SessionId, StoreError,
  case::{Case, CaseOutcome, NewCase},
  client::{Client, ClientFields},
  session::{NewSession, Session},
};

/// Abstraction over a Notizia record store.
///
/// Every write is a single atomic statement. Errors are propagated as-is;
/// there is no retry.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: StoreError;

  // ── Clients ───────────────────────────────────────────────────────────

  /// All clients, newest (highest id) first.
  fn list_clients(
    &self,
  ) -> impl Future<Output = Result<Vec<Client>, Self::Error>> + Send + '_;

  /// Insert a client; the name is trimmed and a blank note is stored as null.
  /// Returns the assigned id.
  fn add_client(
    &self,
    fields: ClientFields,
  ) -> impl Future<Output = Result<ClientId, Self::Error>> + Send + '_;

  /// Overwrite name and note of an existing client.
  ///
  /// Fails with a [`NotFound`](crate::ErrorKind::NotFound) error if `id`
  /// does not exist.
  fn update_client(
    &self,
    id: ClientId,
    fields: ClientFields,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete a client together with all its cases and their sessions.
  /// Deleting an absent id is a no-op.
  fn delete_client(
    &self,
    id: ClientId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Cases ─────────────────────────────────────────────────────────────

  /// All cases of a client, most recently started first.
  fn list_cases(
    &self,
    client_id: ClientId,
  ) -> impl Future<Output = Result<Vec<Case>, Self::Error>> + Send + '_;

  /// Insert a case; status defaults to `open`. Returns the assigned id.
  fn add_case(
    &self,
    input: NewCase,
  ) -> impl Future<Output = Result<CaseId, Self::Error>> + Send + '_;

  /// Replace status and every outcome field of a case in one statement.
  /// Fields left `None` become null.
  fn update_case_outcome(
    &self,
    outcome: CaseOutcome,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  /// All sessions of a case, most recently started first.
  fn list_sessions(
    &self,
    case_id: CaseId,
  ) -> impl Future<Output = Result<Vec<Session>, Self::Error>> + Send + '_;

  /// Insert a session. Returns the assigned id.
  fn add_session(
    &self,
    input: NewSession,
  ) -> impl Future<Output = Result<SessionId, Self::Error>> + Send + '_;

  /// Delete one session. Deleting an absent id is a no-op.
  fn delete_session(
    &self,
    id: SessionId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
