//! Error types for `notizia-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown case status: {0:?}")]
  UnknownStatus(String),

  #[error("unknown problem category: {0:?}")]
  UnknownCategory(String),

  #[error("unknown method: {0:?}")]
  UnknownMethod(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Store error classification ──────────────────────────────────────────────

/// Coarse classification of a storage failure, used by callers that need to
/// react differently (e.g. mapping to an HTTP status) without knowing the
/// backend's concrete error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// The addressed row does not exist.
  NotFound,
  /// The store rejected the write (CHECK, NOT NULL or foreign key).
  Constraint,
  Other,
}

/// Implemented by every [`crate::store::RecordStore`] error type.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> ErrorKind;
}
