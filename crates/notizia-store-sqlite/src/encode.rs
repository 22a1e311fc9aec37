//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with millisecond precision
//! and a `Z` suffix, so every value has the same width and `ORDER BY` on the
//! text column sorts chronologically. Enumerations are stored as their
//! `snake_case` names.

use chrono::{DateTime, SecondsFormat, Utc};
use notizia_core::{
  case::{Case, CaseStatus, ProblemCategory},
  client::Client,
  session::{Method, Session},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every `SELECT` over `clients`; order matches
/// [`client_from_row`].
pub const CLIENT_COLUMNS: &str = "id, name, note";

pub fn client_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Client> {
  Ok(Client { id: row.get(0)?, name: row.get(1)?, note: row.get(2)? })
}

/// Column list shared by every `SELECT` over `cases`; order matches
/// [`RawCase::from_row`].
pub const CASE_COLUMNS: &str = "id, client_id, problem_category, problem_text, \
   started_at, status, resolved_at, resolved_by_method, sessions_total, \
   pc_self, pc_relationships, pc_world, symptom_change_pct, outcome_notes";

/// Raw values read directly from a `cases` row.
pub struct RawCase {
  pub id:                 i64,
  pub client_id:          i64,
  pub problem_category:   String,
  pub problem_text:       String,
  pub started_at:         String,
  pub status:             String,
  pub resolved_at:        Option<String>,
  pub resolved_by_method: Option<String>,
  pub sessions_total:     Option<i64>,
  pub pc_self:            Option<i64>,
  pub pc_relationships:   Option<i64>,
  pub pc_world:           Option<i64>,
  pub symptom_change_pct: Option<i64>,
  pub outcome_notes:      Option<String>,
}

impl RawCase {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                 row.get(0)?,
      client_id:          row.get(1)?,
      problem_category:   row.get(2)?,
      problem_text:       row.get(3)?,
      started_at:         row.get(4)?,
      status:             row.get(5)?,
      resolved_at:        row.get(6)?,
      resolved_by_method: row.get(7)?,
      sessions_total:     row.get(8)?,
      pc_self:            row.get(9)?,
      pc_relationships:   row.get(10)?,
      pc_world:           row.get(11)?,
      symptom_change_pct: row.get(12)?,
      outcome_notes:      row.get(13)?,
    })
  }

  pub fn into_case(self) -> Result<Case> {
    Ok(Case {
      id:                 self.id,
      client_id:          self.client_id,
      problem_category:   ProblemCategory::parse(&self.problem_category)?,
      problem_text:       self.problem_text,
      started_at:         decode_dt(&self.started_at)?,
      status:             CaseStatus::parse(&self.status)?,
      resolved_at:        self.resolved_at.as_deref().map(decode_dt).transpose()?,
      resolved_by_method: self
        .resolved_by_method
        .as_deref()
        .map(Method::parse)
        .transpose()?,
      sessions_total:     self.sessions_total,
      pc_self:            self.pc_self,
      pc_relationships:   self.pc_relationships,
      pc_world:           self.pc_world,
      symptom_change_pct: self.symptom_change_pct,
      outcome_notes:      self.outcome_notes,
    })
  }
}

pub const SESSION_COLUMNS: &str = "id, case_id, started_at, duration_min, method, \
   ease_hypnosis, sud_before, sud_after, emotional_release, insights, notes";

/// Raw values read directly from a `sessions` row.
pub struct RawSession {
  pub id:                i64,
  pub case_id:           i64,
  pub started_at:        String,
  pub duration_min:      Option<i64>,
  pub method:            String,
  pub ease_hypnosis:     Option<i64>,
  pub sud_before:        Option<i64>,
  pub sud_after:         Option<i64>,
  pub emotional_release: Option<String>,
  pub insights:          Option<String>,
  pub notes:             Option<String>,
}

impl RawSession {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      case_id:           row.get(1)?,
      started_at:        row.get(2)?,
      duration_min:      row.get(3)?,
      method:            row.get(4)?,
      ease_hypnosis:     row.get(5)?,
      sud_before:        row.get(6)?,
      sud_after:         row.get(7)?,
      emotional_release: row.get(8)?,
      insights:          row.get(9)?,
      notes:             row.get(10)?,
    })
  }

  pub fn into_session(self) -> Result<Session> {
    Ok(Session {
      id:                self.id,
      case_id:           self.case_id,
      started_at:        decode_dt(&self.started_at)?,
      duration_min:      self.duration_min,
      method:            Method::parse(&self.method)?,
      ease_hypnosis:     self.ease_hypnosis,
      sud_before:        self.sud_before,
      sud_after:         self.sud_after,
      emotional_release: self.emotional_release,
      insights:          self.insights,
      notes:             self.notes,
    })
  }
}
