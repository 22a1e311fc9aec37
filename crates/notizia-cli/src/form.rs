//! Input forms for the dialogs: field model, key editing, and parsing into
//! typed store requests.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use notizia_core::{
  CaseId, ClientId,
  case::{Case, CaseOutcome, CaseStatus, NewCase, ProblemCategory},
  client::{Client, ClientFields},
  session::{Method, NewSession},
  validate::validate_client_input,
};
use strum::VariantNames;

/// Choice shown for an unset optional enum.
const NONE_CHOICE: &str = "none";

// ─── Fields ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
  Text,
  /// Integer input; blank means null. The range is inclusive.
  Number(Option<(i64, i64)>),
  /// One of a fixed list; `Left`/`Right` cycle through it.
  Choice(Vec<&'static str>),
}

#[derive(Debug, Clone)]
pub struct Field {
  pub label: &'static str,
  pub value: String,
  pub kind:  FieldKind,
  pub error: Option<String>,
}

impl Field {
  fn text(label: &'static str, value: Option<&str>) -> Self {
    Self {
      label,
      value: value.unwrap_or_default().to_owned(),
      kind: FieldKind::Text,
      error: None,
    }
  }

  fn number(label: &'static str, range: Option<(i64, i64)>, value: Option<i64>) -> Self {
    Self {
      label,
      value: value.map(|n| n.to_string()).unwrap_or_default(),
      kind: FieldKind::Number(range),
      error: None,
    }
  }

  fn choice(label: &'static str, options: Vec<&'static str>, selected: &str) -> Self {
    let value = options
      .iter()
      .find(|o| **o == selected)
      .or_else(|| options.first())
      .copied()
      .unwrap_or_default()
      .to_owned();
    Self { label, value, kind: FieldKind::Choice(options), error: None }
  }

  pub fn is_choice(&self) -> bool { matches!(self.kind, FieldKind::Choice(_)) }

  /// Trimmed text, `None` when blank.
  fn optional_text(&self) -> Option<String> {
    let t = self.value.trim();
    (!t.is_empty()).then(|| t.to_owned())
  }

  /// Parse a number field. Returns `Err(())` after recording the message on
  /// the field.
  fn parse_number(&mut self) -> Result<Option<i64>, ()> {
    let t = self.value.trim();
    if t.is_empty() {
      return Ok(None);
    }
    let Ok(n) = t.parse::<i64>() else {
      self.error = Some("must be a whole number".into());
      return Err(());
    };
    if let FieldKind::Number(Some((min, max))) = self.kind
      && !(min..=max).contains(&n)
    {
      self.error = Some(if max == i64::MAX {
        format!("must be at least {min}")
      } else {
        format!("must be between {min} and {max}")
      });
      return Err(());
    }
    Ok(Some(n))
  }

  fn cycle(&mut self, forward: bool) {
    let FieldKind::Choice(options) = &self.kind else {
      return;
    };
    if options.is_empty() {
      return;
    }
    let pos = options.iter().position(|o| *o == self.value).unwrap_or(0);
    let next = if forward {
      (pos + 1) % options.len()
    } else {
      (pos + options.len() - 1) % options.len()
    };
    self.value = options[next].to_owned();
  }
}

// ─── Form ────────────────────────────────────────────────────────────────────

/// What a form creates or edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
  NewClient,
  EditClient(ClientId),
  NewCase(ClientId),
  NewSession(CaseId),
  Outcome(CaseId),
}

/// A parsed, valid form ready to be sent to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
  Client { id: Option<ClientId>, fields: ClientFields },
  Case(NewCase),
  Session(NewSession),
  Outcome(CaseOutcome),
}

#[derive(Debug, Clone)]
pub struct Form {
  pub kind:   FormKind,
  pub title:  String,
  pub fields: Vec<Field>,
  pub focus:  usize,
}

impl Form {
  fn new(kind: FormKind, title: impl Into<String>, fields: Vec<Field>) -> Self {
    Self { kind, title: title.into(), fields, focus: 0 }
  }

  pub fn new_client() -> Self {
    Self::new(
      FormKind::NewClient,
      "New client",
      vec![Field::text("Name", None), Field::text("Note", None)],
    )
  }

  pub fn edit_client(client: &Client) -> Self {
    Self::new(
      FormKind::EditClient(client.id),
      format!("Edit client #{}", client.id),
      vec![
        Field::text("Name", Some(&client.name)),
        Field::text("Note", client.note.as_deref()),
      ],
    )
  }

  pub fn new_case(client_id: ClientId) -> Self {
    Self::new(
      FormKind::NewCase(client_id),
      "New case",
      vec![
        Field::text("Description", None),
        Field::choice(
          "Category",
          ProblemCategory::VARIANTS.to_vec(),
          ProblemCategory::default().as_str(),
        ),
      ],
    )
  }

  pub fn new_session(case_id: CaseId) -> Self {
    Self::new(
      FormKind::NewSession(case_id),
      "New session",
      vec![
        Field::choice("Method", Method::VARIANTS.to_vec(), Method::default().as_str()),
        Field::number("Duration (min)", Some((0, i64::MAX)), None),
        Field::number("SUD before", Some((0, 10)), None),
        Field::number("SUD after", Some((0, 10)), None),
        Field::number("Ease", Some((1, 5)), None),
        Field::text("Emotional release", None),
        Field::text("Insights", None),
        Field::text("Notes", None),
      ],
    )
  }

  /// Outcome form prefilled from `case`; saving replaces every outcome field.
  pub fn outcome(case: &Case) -> Self {
    let mut methods = vec![NONE_CHOICE];
    methods.extend_from_slice(Method::VARIANTS);
    Self::new(
      FormKind::Outcome(case.id),
      format!("Outcome of case #{}", case.id),
      vec![
        Field::choice("Status", CaseStatus::VARIANTS.to_vec(), case.status.as_str()),
        Field::text(
          "Resolved at",
          case
            .resolved_at
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
            .as_deref(),
        ),
        Field::choice(
          "Resolved by",
          methods,
          case.resolved_by_method.map_or(NONE_CHOICE, |m| m.as_str()),
        ),
        Field::number("Sessions total", Some((0, i64::MAX)), case.sessions_total),
        Field::number("PC self", Some((-2, 2)), case.pc_self),
        Field::number("PC relationships", Some((-2, 2)), case.pc_relationships),
        Field::number("PC world", Some((-2, 2)), case.pc_world),
        Field::number("Symptom change %", Some((0, 100)), case.symptom_change_pct),
        Field::text("Notes", case.outcome_notes.as_deref()),
      ],
    )
  }

  // ── Editing ───────────────────────────────────────────────────────────────

  pub fn focus_next(&mut self) {
    if !self.fields.is_empty() {
      self.focus = (self.focus + 1) % self.fields.len();
    }
  }

  pub fn focus_prev(&mut self) {
    if !self.fields.is_empty() {
      self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }
  }

  pub fn input_char(&mut self, c: char) {
    if let Some(field) = self.fields.get_mut(self.focus)
      && !field.is_choice()
    {
      field.value.push(c);
      field.error = None;
    }
  }

  pub fn backspace(&mut self) {
    if let Some(field) = self.fields.get_mut(self.focus)
      && !field.is_choice()
    {
      field.value.pop();
      field.error = None;
    }
  }

  pub fn cycle(&mut self, forward: bool) {
    if let Some(field) = self.fields.get_mut(self.focus) {
      field.cycle(forward);
    }
  }

  pub fn value_of(&self, label: &str) -> &str {
    self
      .fields
      .iter()
      .find(|f| f.label == label)
      .map(|f| f.value.as_str())
      .unwrap_or_default()
  }

  fn field_mut(&mut self, label: &str) -> Option<&mut Field> {
    self.fields.iter_mut().find(|f| f.label == label)
  }

  fn set_error(&mut self, label: &str, message: impl Into<String>) {
    if let Some(field) = self.field_mut(label) {
      field.error = Some(message.into());
    }
  }

  // ── Parsing ───────────────────────────────────────────────────────────────

  /// Validate and parse the form. On failure the offending fields carry an
  /// error message and `None` is returned. `now` stamps new cases and
  /// sessions.
  pub fn submit(&mut self, now: DateTime<Utc>) -> Option<Submission> {
    for field in &mut self.fields {
      field.error = None;
    }
    match self.kind {
      FormKind::NewClient => self.submit_client(None),
      FormKind::EditClient(id) => self.submit_client(Some(id)),
      FormKind::NewCase(client_id) => self.submit_case(client_id, now),
      FormKind::NewSession(case_id) => self.submit_session(case_id, now),
      FormKind::Outcome(case_id) => self.submit_outcome(case_id, now),
    }
  }

  fn submit_client(&mut self, id: Option<ClientId>) -> Option<Submission> {
    let checked = validate_client_input(self.value_of("Name"), self.value_of("Note"));
    if let Some(msg) = checked.errors.name {
      self.set_error("Name", msg);
    }
    if let Some(msg) = checked.errors.note {
      self.set_error("Note", msg);
    }
    checked
      .is_ok()
      .then_some(Submission::Client { id, fields: checked.value })
  }

  fn submit_case(&mut self, client_id: ClientId, now: DateTime<Utc>) -> Option<Submission> {
    let text = self.value_of("Description").trim().to_owned();
    if text.is_empty() {
      self.set_error("Description", "description is required");
      return None;
    }
    let category = ProblemCategory::parse(self.value_of("Category")).unwrap_or_default();
    Some(Submission::Case(NewCase {
      client_id,
      problem_category: category,
      problem_text: text,
      started_at: now,
      status: None,
    }))
  }

  fn submit_session(&mut self, case_id: CaseId, now: DateTime<Utc>) -> Option<Submission> {
    let method = Method::parse(self.value_of("Method")).unwrap_or_default();
    let mut session = NewSession::new(case_id, now, method);

    let mut numbers = [None; 4];
    let mut failed = false;
    for (slot, label) in numbers
      .iter_mut()
      .zip(["Duration (min)", "SUD before", "SUD after", "Ease"])
    {
      match self.field_mut(label).map(Field::parse_number) {
        Some(Ok(n)) => *slot = n,
        Some(Err(())) => failed = true,
        None => {}
      }
    }
    if failed {
      return None;
    }
    [session.duration_min, session.sud_before, session.sud_after, session.ease_hypnosis] =
      numbers;

    session.emotional_release = self.text_of("Emotional release");
    session.insights = self.text_of("Insights");
    session.notes = self.text_of("Notes");
    Some(Submission::Session(session))
  }

  fn submit_outcome(&mut self, case_id: CaseId, now: DateTime<Utc>) -> Option<Submission> {
    let status = CaseStatus::parse(self.value_of("Status")).unwrap_or_default();
    let mut outcome = CaseOutcome::status_only(case_id, status);
    let mut failed = false;

    match parse_date(self.value_of("Resolved at")) {
      Ok(Some(t)) => outcome.resolved_at = Some(t),
      Ok(None) if status == CaseStatus::Resolved => outcome.resolved_at = Some(now),
      Ok(None) => {}
      Err(msg) => {
        self.set_error("Resolved at", msg);
        failed = true;
      }
    }

    outcome.resolved_by_method = match self.value_of("Resolved by") {
      NONE_CHOICE => None,
      s => Method::parse(s).ok(),
    };

    let mut numbers = [None; 5];
    for (slot, label) in numbers.iter_mut().zip([
      "Sessions total",
      "PC self",
      "PC relationships",
      "PC world",
      "Symptom change %",
    ]) {
      match self.field_mut(label).map(Field::parse_number) {
        Some(Ok(n)) => *slot = n,
        Some(Err(())) => failed = true,
        None => {}
      }
    }
    if failed {
      return None;
    }
    [
      outcome.sessions_total,
      outcome.pc_self,
      outcome.pc_relationships,
      outcome.pc_world,
      outcome.symptom_change_pct,
    ] = numbers;

    outcome.outcome_notes = self.text_of("Notes");
    Some(Submission::Outcome(outcome))
  }

  fn text_of(&self, label: &str) -> Option<String> {
    self
      .fields
      .iter()
      .find(|f| f.label == label)
      .and_then(Field::optional_text)
  }
}

/// Accepts `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp. Blank is
/// `None`.
fn parse_date(s: &str) -> Result<Option<DateTime<Utc>>, &'static str> {
  let s = s.trim();
  if s.is_empty() {
    return Ok(None);
  }
  if let Ok(t) = DateTime::parse_from_rfc3339(s) {
    return Ok(Some(t.with_timezone(&Utc)));
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .map(|t| Some(t.and_utc()))
    .ok_or("expected YYYY-MM-DD")
}
