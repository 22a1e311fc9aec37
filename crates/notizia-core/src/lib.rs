//! Domain types, input validation, list helpers and the [`store::RecordStore`]
//! trait for Notizia. No HTTP or database code lives here.

// Implementors write `async fn`; the trait spells out the `Send` bounds.
#![allow(async_fn_in_trait)]

pub mod case;
pub mod client;
pub mod error;
pub mod session;
pub mod store;
pub mod validate;

pub use error::{Error, ErrorKind, Result, StoreError};

/// Row id of a client.
pub type ClientId = i64;
/// Row id of a case.
pub type CaseId = i64;
/// Row id of a session.
pub type SessionId = i64;
