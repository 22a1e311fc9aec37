//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, Duration, TimeZone, Utc};
use notizia_core::{
  ErrorKind, StoreError,
  case::{CaseOutcome, CaseStatus, NewCase, ProblemCategory},
  client::ClientFields,
  session::{Method, NewSession},
  store::RecordStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn t0() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap() }

fn new_case(client_id: i64, started_at: DateTime<Utc>) -> NewCase {
  NewCase {
    client_id,
    problem_category: ProblemCategory::Sleep,
    problem_text: "wakes at 3am".into(),
    started_at,
    status: None,
  }
}

// ─── Clients ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_client_with_empty_note_stores_null() {
  let s = store().await;
  s.add_client(ClientFields::new("Ana", Some(""))).await.unwrap();

  let clients = s.list_clients().await.unwrap();
  assert_eq!(clients.len(), 1);
  assert_eq!(clients[0].name, "Ana");
  assert_eq!(clients[0].note, None);
}

#[tokio::test]
async fn add_client_trims_name_and_note() {
  let s = store().await;
  let id = s
    .add_client(ClientFields::new("  Berta  ", Some("  first visit \n")))
    .await
    .unwrap();

  let clients = s.list_clients().await.unwrap();
  assert_eq!(clients[0].id, id);
  assert_eq!(clients[0].name, "Berta");
  assert_eq!(clients[0].note.as_deref(), Some("first visit"));
}

#[tokio::test]
async fn whitespace_only_note_becomes_null() {
  let s = store().await;
  s.add_client(ClientFields::new("Carlos", Some("   \t"))).await.unwrap();
  s.add_client(ClientFields::new("Dora", None)).await.unwrap();

  let clients = s.list_clients().await.unwrap();
  assert!(clients.iter().all(|c| c.note.is_none()));
}

#[tokio::test]
async fn list_clients_is_newest_first() {
  let s = store().await;
  let a = s.add_client(ClientFields::new("Ana", None)).await.unwrap();
  let b = s.add_client(ClientFields::new("Berta", None)).await.unwrap();
  let c = s.add_client(ClientFields::new("Carlos", None)).await.unwrap();

  let ids: Vec<_> = s.list_clients().await.unwrap().iter().map(|c| c.id).collect();
  assert_eq!(ids, vec![c, b, a]);
}

#[tokio::test]
async fn short_name_violates_check_constraint() {
  let s = store().await;
  // Trimmed to a single character before insert.
  let err = s.add_client(ClientFields::new(" A ", None)).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Constraint);
  assert!(s.list_clients().await.unwrap().is_empty());
}

#[tokio::test]
async fn long_note_is_not_store_enforced() {
  let s = store().await;
  let note = "x".repeat(500);
  s.add_client(ClientFields::new("Ana", Some(note.as_str()))).await.unwrap();
  assert_eq!(s.list_clients().await.unwrap()[0].note.as_deref(), Some(note.as_str()));
}

#[tokio::test]
async fn update_client_overwrites_name_and_note() {
  let s = store().await;
  let id = s.add_client(ClientFields::new("Ana", Some("old"))).await.unwrap();

  s.update_client(id, ClientFields::new(" Anna ", None)).await.unwrap();

  let c = &s.list_clients().await.unwrap()[0];
  assert_eq!(c.name, "Anna");
  assert_eq!(c.note, None);
}

#[tokio::test]
async fn update_missing_client_is_not_found() {
  let s = store().await;
  let err = s
    .update_client(42, ClientFields::new("Ana", None))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ClientNotFound(42)));
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn delete_missing_client_is_a_no_op() {
  let s = store().await;
  s.delete_client(42).await.unwrap();
}

// ─── Cases ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_case_defaults_status_to_open() {
  let s = store().await;
  let client = s.add_client(ClientFields::new("Ana", None)).await.unwrap();
  s.add_case(new_case(client, t0())).await.unwrap();

  let cases = s.list_cases(client).await.unwrap();
  assert_eq!(cases.len(), 1);
  assert_eq!(cases[0].status, CaseStatus::Open);
  assert_eq!(cases[0].problem_category, ProblemCategory::Sleep);
  assert_eq!(cases[0].started_at, t0());
  assert_eq!(cases[0].resolved_at, None);
}

#[tokio::test]
async fn add_case_keeps_explicit_status() {
  let s = store().await;
  let client = s.add_client(ClientFields::new("Ana", None)).await.unwrap();
  let mut input = new_case(client, t0());
  input.status = Some(CaseStatus::Dropped);
  s.add_case(input).await.unwrap();

  assert_eq!(s.list_cases(client).await.unwrap()[0].status, CaseStatus::Dropped);
}

#[tokio::test]
async fn add_case_for_missing_client_violates_foreign_key() {
  let s = store().await;
  let err = s.add_case(new_case(99, t0())).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Constraint);
}

#[tokio::test]
async fn list_cases_is_scoped_and_latest_started_first() {
  let s = store().await;
  let ana = s.add_client(ClientFields::new("Ana", None)).await.unwrap();
  let ben = s.add_client(ClientFields::new("Ben", None)).await.unwrap();

  let older = s.add_case(new_case(ana, t0())).await.unwrap();
  let newer = s
    .add_case(new_case(ana, t0() + Duration::days(3)))
    .await
    .unwrap();
  // Inserted last but started earliest.
  let oldest = s
    .add_case(new_case(ana, t0() - Duration::milliseconds(1)))
    .await
    .unwrap();
  s.add_case(new_case(ben, t0())).await.unwrap();

  let ids: Vec<_> = s.list_cases(ana).await.unwrap().iter().map(|c| c.id).collect();
  assert_eq!(ids, vec![newer, older, oldest]);
}

#[tokio::test]
async fn update_case_outcome_sets_every_field() {
  let s = store().await;
  let client = s.add_client(ClientFields::new("Ana", None)).await.unwrap();
  let case_id = s.add_case(new_case(client, t0())).await.unwrap();

  let resolved_at = t0() + Duration::days(30);
  s.update_case_outcome(CaseOutcome {
    id:                 case_id,
    status:             CaseStatus::Resolved,
    resolved_at:        Some(resolved_at),
    resolved_by_method: Some(Method::AufloesendeHypnose),
    sessions_total:     Some(4),
    pc_self:            Some(2),
    pc_relationships:   Some(1),
    pc_world:           Some(-1),
    symptom_change_pct: Some(90),
    outcome_notes:      Some("sleeps through".into()),
  })
  .await
  .unwrap();

  let c = &s.list_cases(client).await.unwrap()[0];
  assert_eq!(c.status, CaseStatus::Resolved);
  assert_eq!(c.resolved_at, Some(resolved_at));
  assert_eq!(c.resolved_by_method, Some(Method::AufloesendeHypnose));
  assert_eq!(c.sessions_total, Some(4));
  assert_eq!(c.pc_world, Some(-1));
  assert_eq!(c.symptom_change_pct, Some(90));
  assert_eq!(c.outcome_notes.as_deref(), Some("sleeps through"));
}

/// Outcome updates are a full replacement: omitted fields are nulled, not
/// left at their previous values.
#[tokio::test]
async fn update_case_outcome_with_status_only_clears_outcome_fields() {
  let s = store().await;
  let client = s.add_client(ClientFields::new("Ana", None)).await.unwrap();
  let case_id = s.add_case(new_case(client, t0())).await.unwrap();

  let mut full = CaseOutcome::status_only(case_id, CaseStatus::Resolved);
  full.resolved_at = Some(t0());
  full.resolved_by_method = Some(Method::Coaching);
  full.sessions_total = Some(3);
  full.pc_self = Some(1);
  full.pc_relationships = Some(1);
  full.pc_world = Some(0);
  full.symptom_change_pct = Some(50);
  full.outcome_notes = Some("partial".into());
  s.update_case_outcome(full).await.unwrap();

  s.update_case_outcome(CaseOutcome::status_only(case_id, CaseStatus::Open))
    .await
    .unwrap();

  let c = &s.list_cases(client).await.unwrap()[0];
  assert_eq!(c.status, CaseStatus::Open);
  assert_eq!(c.outcome(), CaseOutcome::status_only(case_id, CaseStatus::Open));
}

#[tokio::test]
async fn update_outcome_of_missing_case_is_not_found() {
  let s = store().await;
  let err = s
    .update_case_outcome(CaseOutcome::status_only(7, CaseStatus::Dropped))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::CaseNotFound(7)));
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn session_values_are_stored_without_clamping() {
  let s = store().await;
  let client = s.add_client(ClientFields::new("Ana", None)).await.unwrap();
  let case_id = s.add_case(new_case(client, t0())).await.unwrap();

  let mut input = NewSession::new(case_id, t0(), Method::KlassischeHypnose);
  input.sud_before = Some(8);
  input.sud_after = Some(3);
  input.ease_hypnosis = Some(9);
  input.duration_min = Some(75);
  input.insights = Some("childhood memory".into());
  let id = s.add_session(input).await.unwrap();

  let sessions = s.list_sessions(case_id).await.unwrap();
  assert_eq!(sessions.len(), 1);
  let got = &sessions[0];
  assert_eq!(got.id, id);
  assert_eq!(got.sud_before, Some(8));
  assert_eq!(got.sud_after, Some(3));
  assert_eq!(got.ease_hypnosis, Some(9));
  assert_eq!(got.duration_min, Some(75));
  assert_eq!(got.method, Method::KlassischeHypnose);
  assert_eq!(got.insights.as_deref(), Some("childhood memory"));
  assert_eq!(got.notes, None);
  assert_eq!(got.emotional_release, None);
}

#[tokio::test]
async fn list_sessions_is_latest_started_first() {
  let s = store().await;
  let client = s.add_client(ClientFields::new("Ana", None)).await.unwrap();
  let case_id = s.add_case(new_case(client, t0())).await.unwrap();

  let first = s
    .add_session(NewSession::new(case_id, t0(), Method::Coaching))
    .await
    .unwrap();
  let second = s
    .add_session(NewSession::new(case_id, t0() + Duration::days(7), Method::Coaching))
    .await
    .unwrap();

  let ids: Vec<_> = s.list_sessions(case_id).await.unwrap().iter().map(|x| x.id).collect();
  assert_eq!(ids, vec![second, first]);
}

#[tokio::test]
async fn delete_session_removes_only_that_row() {
  let s = store().await;
  let client = s.add_client(ClientFields::new("Ana", None)).await.unwrap();
  let case_id = s.add_case(new_case(client, t0())).await.unwrap();

  let keep = s
    .add_session(NewSession::new(case_id, t0(), Method::Other))
    .await
    .unwrap();
  let gone = s
    .add_session(NewSession::new(case_id, t0(), Method::Other))
    .await
    .unwrap();

  s.delete_session(gone).await.unwrap();

  let left = s.list_sessions(case_id).await.unwrap();
  assert_eq!(left.len(), 1);
  assert_eq!(left[0].id, keep);
  assert_eq!(s.list_cases(client).await.unwrap().len(), 1);
}

// ─── Cascade ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn deleting_a_client_cascades_to_cases_and_sessions() {
  let s = store().await;
  let doomed = s.add_client(ClientFields::new("Ana", None)).await.unwrap();
  let other = s.add_client(ClientFields::new("Ben", None)).await.unwrap();

  let mut case_ids = Vec::new();
  for day in 0..2 {
    let case_id = s
      .add_case(new_case(doomed, t0() + Duration::days(day)))
      .await
      .unwrap();
    for n in 0..3 {
      s.add_session(NewSession::new(
        case_id,
        t0() + Duration::hours(n),
        Method::AufloesendeHypnose,
      ))
      .await
      .unwrap();
    }
    case_ids.push(case_id);
  }
  let kept_case = s.add_case(new_case(other, t0())).await.unwrap();
  s.add_session(NewSession::new(kept_case, t0(), Method::Coaching))
    .await
    .unwrap();

  s.delete_client(doomed).await.unwrap();

  assert!(s.list_cases(doomed).await.unwrap().is_empty());
  for case_id in case_ids {
    assert!(s.list_sessions(case_id).await.unwrap().is_empty());
  }
  let clients = s.list_clients().await.unwrap();
  assert_eq!(clients.len(), 1);
  assert_eq!(clients[0].id, other);
  assert_eq!(s.list_sessions(kept_case).await.unwrap().len(), 1);
}

#[tokio::test]
async fn reopening_a_file_store_keeps_data() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("reopen.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.add_client(ClientFields::new("Ana", None)).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  let clients = s.list_clients().await.unwrap();
  assert_eq!(clients.len(), 1);
  assert_eq!(clients[0].name, "Ana");
}
