//! [`SqliteStore`], the SQLite implementation of [`RecordStore`].

use std::path::Path;

use notizia_core::{
  CaseId, ClientId, SessionId,
  case::{Case, CaseOutcome, NewCase},
  client::{Client, ClientFields, sanitize_note},
  session::{NewSession, Session},
  store::RecordStore,
};

use crate::{
  Error, Result,
  encode::{
    CASE_COLUMNS, CLIENT_COLUMNS, RawCase, RawSession, SESSION_COLUMNS,
    client_from_row, encode_dt,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Notizia record store backed by a single SQLite file.
///
/// Holds exactly one connection for its whole lifetime. Cloning is cheap;
/// the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "opened record store");
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  // ── Clients ───────────────────────────────────────────────────────────────

  async fn list_clients(&self) -> Result<Vec<Client>> {
    let clients = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY id DESC"
        ))?;
        let rows = stmt
          .query_map([], client_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(clients)
  }

  async fn add_client(&self, fields: ClientFields) -> Result<ClientId> {
    let name = fields.name.trim().to_owned();
    let note = fields.note.as_deref().and_then(sanitize_note);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO clients (name, note) VALUES (?1, ?2)",
          rusqlite::params![name, note],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }

  async fn update_client(&self, id: ClientId, fields: ClientFields) -> Result<()> {
    let name = fields.name.trim().to_owned();
    let note = fields.note.as_deref().and_then(sanitize_note);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE clients SET name = ?1, note = ?2 WHERE id = ?3",
          rusqlite::params![name, note, id],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::ClientNotFound(id));
    }
    Ok(())
  }

  async fn delete_client(&self, id: ClientId) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM clients WHERE id = ?1", rusqlite::params![id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Cases ─────────────────────────────────────────────────────────────────

  async fn list_cases(&self, client_id: ClientId) -> Result<Vec<Case>> {
    let raws: Vec<RawCase> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CASE_COLUMNS} FROM cases
           WHERE client_id = ?1
           ORDER BY started_at DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![client_id], RawCase::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCase::into_case).collect()
  }

  async fn add_case(&self, input: NewCase) -> Result<CaseId> {
    let category   = input.problem_category.as_str();
    let started_at = encode_dt(input.started_at);
    let status     = input.status.unwrap_or_default().as_str();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO cases (client_id, problem_category, problem_text, started_at, status)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            input.client_id,
            category,
            input.problem_text,
            started_at,
            status,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }

  async fn update_case_outcome(&self, outcome: CaseOutcome) -> Result<()> {
    let id          = outcome.id;
    let status      = outcome.status.as_str();
    let resolved_at = outcome.resolved_at.map(encode_dt);
    let method      = outcome.resolved_by_method.map(|m| m.as_str());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE cases
           SET status = ?1, resolved_at = ?2, resolved_by_method = ?3,
               sessions_total = ?4, pc_self = ?5, pc_relationships = ?6,
               pc_world = ?7, symptom_change_pct = ?8, outcome_notes = ?9
           WHERE id = ?10",
          rusqlite::params![
            status,
            resolved_at,
            method,
            outcome.sessions_total,
            outcome.pc_self,
            outcome.pc_relationships,
            outcome.pc_world,
            outcome.symptom_change_pct,
            outcome.outcome_notes,
            id,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::CaseNotFound(id));
    }
    Ok(())
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn list_sessions(&self, case_id: CaseId) -> Result<Vec<Session>> {
    let raws: Vec<RawSession> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SESSION_COLUMNS} FROM sessions
           WHERE case_id = ?1
           ORDER BY started_at DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![case_id], RawSession::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSession::into_session).collect()
  }

  async fn add_session(&self, input: NewSession) -> Result<SessionId> {
    let started_at = encode_dt(input.started_at);
    let method     = input.method.as_str();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (
             case_id, started_at, duration_min, method, ease_hypnosis,
             sud_before, sud_after, emotional_release, insights, notes
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            input.case_id,
            started_at,
            input.duration_min,
            method,
            input.ease_hypnosis,
            input.sud_before,
            input.sud_after,
            input.emotional_release,
            input.insights,
            input.notes,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }

  async fn delete_session(&self, id: SessionId) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM sessions WHERE id = ?1", rusqlite::params![id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
