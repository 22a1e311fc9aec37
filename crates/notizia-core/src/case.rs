//! Cases: tracked problems of a client with an open/resolved/dropped
//! lifecycle and optional outcome metrics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

use crate::{CaseId, ClientId, Error, Result, session::Method};

// ─── Enumerations ────────────────────────────────────────────────────────────

/// Lifecycle status of a case. Stored values are constrained by a `CHECK`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
  VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CaseStatus {
  #[default]
  Open,
  Resolved,
  Dropped,
}

impl CaseStatus {
  pub fn as_str(&self) -> &'static str { self.into() }

  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownStatus(s.to_owned()))
  }
}

/// What the client came in with.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
  VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProblemCategory {
  Overweight,
  SocialAnxiety,
  Panic,
  Depression,
  Sleep,
  Pain,
  SelfWorth,
  Relationship,
  #[default]
  Other,
}

impl ProblemCategory {
  pub fn as_str(&self) -> &'static str { self.into() }

  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownCategory(s.to_owned()))
  }
}

// ─── Case ────────────────────────────────────────────────────────────────────

/// A stored case row. Outcome fields are null until the case is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
  pub id:                 CaseId,
  pub client_id:          ClientId,
  pub problem_category:   ProblemCategory,
  pub problem_text:       String,
  pub started_at:         DateTime<Utc>,
  pub status:             CaseStatus,
  pub resolved_at:        Option<DateTime<Utc>>,
  pub resolved_by_method: Option<Method>,
  pub sessions_total:     Option<i64>,
  /// Perceived change in relation to self, intended -2..=2.
  pub pc_self:            Option<i64>,
  pub pc_relationships:   Option<i64>,
  pub pc_world:           Option<i64>,
  /// Intended 0..=100.
  pub symptom_change_pct: Option<i64>,
  pub outcome_notes:      Option<String>,
}

impl Case {
  /// The case's current status and outcome fields as an update payload.
  ///
  /// Outcome updates replace every field, so editors start from this.
  pub fn outcome(&self) -> CaseOutcome {
    CaseOutcome {
      id:                 self.id,
      status:             self.status,
      resolved_at:        self.resolved_at,
      resolved_by_method: self.resolved_by_method,
      sessions_total:     self.sessions_total,
      pc_self:            self.pc_self,
      pc_relationships:   self.pc_relationships,
      pc_world:           self.pc_world,
      symptom_change_pct: self.symptom_change_pct,
      outcome_notes:      self.outcome_notes.clone(),
    }
  }
}

/// Input to [`crate::store::RecordStore::add_case`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCase {
  pub client_id:        ClientId,
  pub problem_category: ProblemCategory,
  pub problem_text:     String,
  pub started_at:       DateTime<Utc>,
  /// Defaults to [`CaseStatus::Open`] when absent.
  #[serde(default)]
  pub status:           Option<CaseStatus>,
}

/// Input to [`crate::store::RecordStore::update_case_outcome`].
///
/// This is a full replacement: any field left `None` is written as null,
/// not left at its previous value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseOutcome {
  pub id:                 CaseId,
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

impl CaseOutcome {
  /// A payload that sets only the status and clears every outcome field.
  pub fn status_only(id: CaseId, status: CaseStatus) -> Self {
    Self {
      id,
      status,
      resolved_at: None,
      resolved_by_method: None,
      sessions_total: None,
      pc_self: None,
      pc_relationships: None,
      pc_world: None,
      symptom_change_pct: None,
      outcome_notes: None,
    }
  }
}
