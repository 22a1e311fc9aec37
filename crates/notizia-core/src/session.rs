//! Sessions: single treatment encounters belonging to a case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

use crate::{CaseId, Error, Result, SessionId};

/// The method applied in a session, or the one credited for resolving a case.
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
pub enum Method {
  #[default]
  AufloesendeHypnose,
  KlassischeHypnose,
  Coaching,
  Other,
}

impl Method {
  /// The string stored in the `method` and `resolved_by_method` columns.
  pub fn as_str(&self) -> &'static str { self.into() }

  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownMethod(s.to_owned()))
  }
}

/// A stored session row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub id:                SessionId,
  pub case_id:           CaseId,
  pub started_at:        DateTime<Utc>,
  pub duration_min:      Option<i64>,
  pub method:            Method,
  /// Intended range 1..=5; not enforced by the store.
  pub ease_hypnosis:     Option<i64>,
  /// Subjective Units of Distress before the session, intended 0..=10.
  pub sud_before:        Option<i64>,
  pub sud_after:         Option<i64>,
  pub emotional_release: Option<String>,
  pub insights:          Option<String>,
  pub notes:             Option<String>,
}

/// Input to [`crate::store::RecordStore::add_session`]: every session field
/// except the id. Absent nullable fields are stored as null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSession {
  pub case_id:           CaseId,
  pub started_at:        DateTime<Utc>,
  #[serde(default)]
  pub duration_min:      Option<i64>,
  pub method:            Method,
  #[serde(default)]
  pub ease_hypnosis:     Option<i64>,
  #[serde(default)]
  pub sud_before:        Option<i64>,
  #[serde(default)]
  pub sud_after:         Option<i64>,
  #[serde(default)]
  pub emotional_release: Option<String>,
  #[serde(default)]
  pub insights:          Option<String>,
  #[serde(default)]
  pub notes:             Option<String>,
}

impl NewSession {
  /// Convenience constructor with all nullable fields unset.
  pub fn new(case_id: CaseId, started_at: DateTime<Utc>, method: Method) -> Self {
    Self {
      case_id,
      started_at,
      duration_min: None,
      method,
      ease_hypnosis: None,
      sud_before: None,
      sud_after: None,
      emotional_release: None,
      insights: None,
      notes: None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn method_strings_are_snake_case() {
    assert_eq!(Method::AufloesendeHypnose.as_str(), "aufloesende_hypnose");
    assert_eq!(Method::parse("klassische_hypnose").unwrap(), Method::KlassischeHypnose);
    assert_eq!(
      Method::VARIANTS,
      &["aufloesende_hypnose", "klassische_hypnose", "coaching", "other"]
    );
  }

  #[test]
  fn unknown_method_is_an_error() {
    assert!(matches!(Method::parse("reiki"), Err(Error::UnknownMethod(m)) if m == "reiki"));
  }

  #[test]
  fn new_session_deserialises_with_only_required_fields() {
    let s: NewSession = serde_json::from_str(
      r#"{"case_id":3,"started_at":"2024-05-01T09:30:00.000Z","method":"coaching"}"#,
    )
    .unwrap();
    assert_eq!(s.case_id, 3);
    assert_eq!(s.method, Method::Coaching);
    assert_eq!(s.sud_before, None);
    assert_eq!(s.notes, None);
  }
}
