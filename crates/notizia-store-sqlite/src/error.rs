//! Error type for `notizia-store-sqlite`.

use notizia_core::{CaseId, ClientId, ErrorKind, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] notizia_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("client not found: {0}")]
  ClientNotFound(ClientId),

  #[error("case not found: {0}")]
  CaseNotFound(CaseId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl StoreError for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::ClientNotFound(_) | Error::CaseNotFound(_) => ErrorKind::NotFound,
      Error::Database(tokio_rusqlite::Error::Rusqlite(
        rusqlite::Error::SqliteFailure(e, _),
      )) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
        ErrorKind::Constraint
      }
      _ => ErrorKind::Other,
    }
  }
}
