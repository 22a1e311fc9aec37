//! Application state machine and event dispatcher.

use std::sync::Arc;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use notizia_core::{
  CaseId, ClientId, SessionId, StoreError,
  case::Case,
  client::{
    Client, client_label_for_delete, filter_and_sort_clients, find_client_by_id,
    remove_client_by_id,
  },
  session::Session,
  store::RecordStore,
};

use crate::form::{Form, Submission};

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// Focus on the client list; right pane shows the selected client, if any.
  ClientList,
  /// Focus on the cases of the selected client.
  Cases,
  /// Focus on the sessions of the open case.
  Sessions,
}

// ─── Overlays ─────────────────────────────────────────────────────────────────

/// A destructive action waiting for `y`/`n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirm {
  DeleteClient { id: ClientId, label: String },
  DeleteSession { id: SessionId },
}

/// Modal dialog drawn over the panes. While one is open it receives every key.
#[derive(Debug, Clone)]
pub enum Overlay {
  Form(Form),
  /// Cleaned client input shown before saving; `Esc` goes back to `form`.
  Review { submission: Submission, form: Form },
  Confirm(Confirm),
  /// Blocking error message.
  Alert(String),
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<S> {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  pub overlay: Option<Overlay>,

  /// All clients as last fetched from the store.
  pub clients: Vec<Client>,

  /// Current search query (only edited while `query_active`).
  pub query: String,

  /// Whether the user is typing a search query.
  pub query_active: bool,

  /// Cursor position within the *filtered* client list.
  pub list_cursor: usize,

  /// Client whose cases are shown in the right pane.
  pub selected_client: Option<ClientId>,

  pub cases:       Vec<Case>,
  pub case_cursor: usize,

  /// Case whose sessions are shown.
  pub open_case:      Option<CaseId>,
  pub sessions:       Vec<Session>,
  pub session_cursor: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  pub store: Arc<S>,
}

impl<S> App<S> {
  pub fn new(store: S) -> Self {
    Self {
      screen: Screen::ClientList,
      overlay: None,
      clients: Vec::new(),
      query: String::new(),
      query_active: false,
      list_cursor: 0,
      selected_client: None,
      cases: Vec::new(),
      case_cursor: 0,
      open_case: None,
      sessions: Vec::new(),
      session_cursor: 0,
      status_msg: String::new(),
      store: Arc::new(store),
    }
  }

  // ── Selection helpers ─────────────────────────────────────────────────────

  /// Clients matching the current query, newest first.
  pub fn visible_clients(&self) -> Vec<&Client> {
    filter_and_sort_clients(&self.clients, &self.query)
  }

  pub fn cursor_client(&self) -> Option<&Client> {
    self.visible_clients().get(self.list_cursor).copied()
  }

  pub fn selected_client_record(&self) -> Option<&Client> {
    self
      .selected_client
      .and_then(|id| find_client_by_id(&self.clients, id))
  }

  pub fn cursor_case(&self) -> Option<&Case> { self.cases.get(self.case_cursor) }

  pub fn open_case_record(&self) -> Option<&Case> {
    self
      .open_case
      .and_then(|id| self.cases.iter().find(|c| c.id == id))
  }

  pub fn cursor_session(&self) -> Option<&Session> {
    self.sessions.get(self.session_cursor)
  }
}

impl<S: RecordStore> App<S> {
  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch all clients and keep the cursor in range.
  pub async fn load_clients(&mut self) -> Result<(), S::Error> {
    self.clients = self.store.list_clients().await?;
    self.list_cursor = clamp(self.list_cursor, self.visible_clients().len());
    Ok(())
  }

  async fn load_cases(&mut self, client_id: ClientId) -> Result<(), S::Error> {
    self.cases = self.store.list_cases(client_id).await?;
    self.case_cursor = clamp(self.case_cursor, self.cases.len());
    Ok(())
  }

  async fn load_sessions(&mut self, case_id: CaseId) -> Result<(), S::Error> {
    self.sessions = self.store.list_sessions(case_id).await?;
    self.session_cursor = clamp(self.session_cursor, self.sessions.len());
    Ok(())
  }

  /// Log a failed store call and show it in a blocking alert.
  fn fail(&mut self, action: &str, err: S::Error) {
    tracing::warn!(error = %err, kind = ?err.kind(), "{action} failed");
    self.overlay = Some(Overlay::Alert(format!("{action} failed: {err}")));
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    if let Some(overlay) = self.overlay.take() {
      self.handle_overlay_key(overlay, key).await;
      return true;
    }
    self.status_msg.clear();

    if self.query_active {
      self.handle_query_key(key);
      return true;
    }

    match self.screen {
      Screen::ClientList => self.handle_list_key(key).await,
      Screen::Cases => self.handle_cases_key(key).await,
      Screen::Sessions => self.handle_sessions_key(key).await,
    }
  }

  async fn handle_overlay_key(&mut self, overlay: Overlay, key: KeyEvent) {
    match overlay {
      Overlay::Form(mut form) => match key.code {
        KeyCode::Esc => {}
        KeyCode::Tab | KeyCode::Down => {
          form.focus_next();
          self.overlay = Some(Overlay::Form(form));
        }
        KeyCode::BackTab | KeyCode::Up => {
          form.focus_prev();
          self.overlay = Some(Overlay::Form(form));
        }
        KeyCode::Left | KeyCode::Right => {
          form.cycle(key.code == KeyCode::Right);
          self.overlay = Some(Overlay::Form(form));
        }
        KeyCode::Backspace => {
          form.backspace();
          self.overlay = Some(Overlay::Form(form));
        }
        KeyCode::Char(c) => {
          form.input_char(c);
          self.overlay = Some(Overlay::Form(form));
        }
        KeyCode::Enter => match form.submit(Utc::now()) {
          None => self.overlay = Some(Overlay::Form(form)),
          Some(submission @ Submission::Client { .. }) => {
            self.overlay = Some(Overlay::Review { submission, form });
          }
          Some(submission) => self.save(submission).await,
        },
        _ => self.overlay = Some(Overlay::Form(form)),
      },

      Overlay::Review { submission, form } => match key.code {
        KeyCode::Enter => self.save(submission).await,
        KeyCode::Esc => self.overlay = Some(Overlay::Form(form)),
        _ => self.overlay = Some(Overlay::Review { submission, form }),
      },

      Overlay::Confirm(confirm) => match key.code {
        KeyCode::Char('y') | KeyCode::Enter => self.confirm(confirm).await,
        KeyCode::Char('n') | KeyCode::Esc => {}
        _ => self.overlay = Some(Overlay::Confirm(confirm)),
      },

      Overlay::Alert(msg) => {
        if !matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
          self.overlay = Some(Overlay::Alert(msg));
        }
      }
    }
  }

  fn handle_query_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.query_active = false;
        self.query.clear();
      }
      KeyCode::Enter => self.query_active = false,
      KeyCode::Backspace => {
        self.query.pop();
      }
      KeyCode::Char(c) => self.query.push(c),
      _ => return,
    }
    self.list_cursor = 0;
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Down | KeyCode::Char('j') => {
        if self.list_cursor + 1 < self.visible_clients().len() {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      KeyCode::Char('/') => {
        self.query_active = true;
        self.query.clear();
        self.list_cursor = 0;
      }

      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_client().map(|c| c.id) {
          self.open_client(id).await;
        }
      }

      KeyCode::Char('a') => self.overlay = Some(Overlay::Form(Form::new_client())),
      KeyCode::Char('e') => {
        if let Some(form) = self.cursor_client().map(Form::edit_client) {
          self.overlay = Some(Overlay::Form(form));
        }
      }
      KeyCode::Char('d') => {
        if let Some(id) = self.cursor_client().map(|c| c.id) {
          let label = client_label_for_delete(&self.clients, id);
          self.overlay = Some(Overlay::Confirm(Confirm::DeleteClient { id, label }));
        }
      }

      _ => {}
    }
    true
  }

  async fn handle_cases_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = Screen::ClientList;
        self.selected_client = None;
        self.cases.clear();
      }

      KeyCode::Down | KeyCode::Char('j') => {
        if self.case_cursor + 1 < self.cases.len() {
          self.case_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.case_cursor = self.case_cursor.saturating_sub(1);
      }

      KeyCode::Char('a') => {
        if let Some(id) = self.selected_client {
          self.overlay = Some(Overlay::Form(Form::new_case(id)));
        }
      }
      KeyCode::Char('o') => {
        if let Some(form) = self.cursor_case().map(Form::outcome) {
          self.overlay = Some(Overlay::Form(form));
        }
      }

      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_case().map(|c| c.id) {
          self.open_sessions(id).await;
        }
      }

      _ => {}
    }
    true
  }

  async fn handle_sessions_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = Screen::Cases;
        self.open_case = None;
        self.sessions.clear();
      }

      KeyCode::Down | KeyCode::Char('j') => {
        if self.session_cursor + 1 < self.sessions.len() {
          self.session_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.session_cursor = self.session_cursor.saturating_sub(1);
      }

      KeyCode::Char('a') => {
        if let Some(id) = self.open_case {
          self.overlay = Some(Overlay::Form(Form::new_session(id)));
        }
      }
      KeyCode::Char('d') => {
        if let Some(id) = self.cursor_session().map(|s| s.id) {
          self.overlay = Some(Overlay::Confirm(Confirm::DeleteSession { id }));
        }
      }

      _ => {}
    }
    true
  }

  // ── Transitions ───────────────────────────────────────────────────────────

  /// Transition to `Cases` for `client_id`.
  async fn open_client(&mut self, client_id: ClientId) {
    self.case_cursor = 0;
    match self.load_cases(client_id).await {
      Ok(()) => {
        self.selected_client = Some(client_id);
        self.screen = Screen::Cases;
      }
      Err(e) => self.fail("Loading cases", e),
    }
  }

  /// Transition to `Sessions` for `case_id`.
  async fn open_sessions(&mut self, case_id: CaseId) {
    self.session_cursor = 0;
    match self.load_sessions(case_id).await {
      Ok(()) => {
        self.open_case = Some(case_id);
        self.screen = Screen::Sessions;
      }
      Err(e) => self.fail("Loading sessions", e),
    }
  }

  /// Send a parsed form to the store and refresh the affected list.
  async fn save(&mut self, submission: Submission) {
    let result = match submission {
      Submission::Client { id: None, fields } => match self.store.add_client(fields).await {
        Ok(id) => {
          self.query.clear();
          self.list_cursor = 0;
          self.status_msg = format!("Client #{id} added");
          self.load_clients().await
        }
        Err(e) => Err(e),
      },
      Submission::Client { id: Some(id), fields } => {
        match self.store.update_client(id, fields).await {
          Ok(()) => {
            self.status_msg = format!("Client #{id} updated");
            self.load_clients().await
          }
          Err(e) => Err(e),
        }
      }
      Submission::Case(input) => {
        let client_id = input.client_id;
        match self.store.add_case(input).await {
          Ok(id) => {
            self.case_cursor = 0;
            self.status_msg = format!("Case #{id} opened");
            self.load_cases(client_id).await
          }
          Err(e) => Err(e),
        }
      }
      Submission::Outcome(outcome) => {
        let case_id = outcome.id;
        match self.store.update_case_outcome(outcome).await {
          Ok(()) => {
            self.status_msg = format!("Case #{case_id} updated");
            match self.selected_client {
              Some(client_id) => self.load_cases(client_id).await,
              None => Ok(()),
            }
          }
          Err(e) => Err(e),
        }
      }
      Submission::Session(input) => {
        let case_id = input.case_id;
        match self.store.add_session(input).await {
          Ok(id) => {
            self.session_cursor = 0;
            self.status_msg = format!("Session #{id} recorded");
            self.load_sessions(case_id).await
          }
          Err(e) => Err(e),
        }
      }
    };
    if let Err(e) = result {
      self.fail("Saving", e);
    }
  }

  async fn confirm(&mut self, confirm: Confirm) {
    match confirm {
      Confirm::DeleteClient { id, label } => match self.store.delete_client(id).await {
        Ok(()) => {
          remove_client_by_id(&mut self.clients, id);
          self.list_cursor = clamp(self.list_cursor, self.visible_clients().len());
          if self.selected_client == Some(id) {
            self.selected_client = None;
            self.cases.clear();
          }
          self.status_msg = format!("Deleted {label}");
        }
        Err(e) => self.fail("Deleting client", e),
      },
      Confirm::DeleteSession { id } => match self.store.delete_session(id).await {
        Ok(()) => {
          self.status_msg = format!("Session #{id} deleted");
          if let Some(case_id) = self.open_case
            && let Err(e) = self.load_sessions(case_id).await
          {
            self.fail("Loading sessions", e);
          }
        }
        Err(e) => self.fail("Deleting session", e),
      },
    }
  }
}

/// Keep a cursor inside a list of `len` rows.
fn clamp(cursor: usize, len: usize) -> usize { cursor.min(len.saturating_sub(1)) }

#[cfg(test)]
mod tests {
  use notizia_core::{
    case::{CaseStatus, NewCase, ProblemCategory},
    client::ClientFields,
  };
  use notizia_store_sqlite::SqliteStore;

  use super::*;

  async fn app() -> App<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let mut app = App::new(store);
    app.load_clients().await.unwrap();
    app
  }

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  async fn press(app: &mut App<SqliteStore>, code: KeyCode) -> bool {
    app.handle_key(key(code)).await
  }

  async fn type_text(app: &mut App<SqliteStore>, text: &str) {
    for c in text.chars() {
      press(app, KeyCode::Char(c)).await;
    }
  }

  async fn seed_client(app: &mut App<SqliteStore>, name: &str) -> ClientId {
    let id = app
      .store
      .add_client(ClientFields::new(name, None))
      .await
      .unwrap();
    app.load_clients().await.unwrap();
    id
  }

  #[tokio::test]
  async fn quit_keys() {
    let mut app = app().await;
    assert!(!press(&mut app, KeyCode::Char('q')).await);
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert!(!app.handle_key(ctrl_c).await);
  }

  #[tokio::test]
  async fn add_client_goes_through_review() {
    let mut app = app().await;
    press(&mut app, KeyCode::Char('a')).await;
    type_text(&mut app, "  Anna ").await;
    press(&mut app, KeyCode::Tab).await;
    type_text(&mut app, "Rückenschmerzen").await;
    press(&mut app, KeyCode::Enter).await;

    match &app.overlay {
      Some(Overlay::Review { submission: Submission::Client { fields, .. }, .. }) => {
        assert_eq!(fields.name, "Anna");
      }
      other => panic!("expected review, got {other:?}"),
    }
    assert!(app.clients.is_empty());

    press(&mut app, KeyCode::Enter).await;
    assert!(app.overlay.is_none());
    assert_eq!(app.clients.len(), 1);
    assert_eq!(app.clients[0].name, "Anna");
    assert_eq!(app.clients[0].note.as_deref(), Some("Rückenschmerzen"));
  }

  #[tokio::test]
  async fn short_name_stays_in_form_with_error() {
    let mut app = app().await;
    press(&mut app, KeyCode::Char('a')).await;
    type_text(&mut app, "A").await;
    press(&mut app, KeyCode::Enter).await;

    match &app.overlay {
      Some(Overlay::Form(form)) => {
        assert_eq!(form.fields[0].error.as_deref(), Some("at least 2 characters"));
      }
      other => panic!("expected form, got {other:?}"),
    }
    assert!(app.store.list_clients().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn esc_in_review_returns_to_form() {
    let mut app = app().await;
    press(&mut app, KeyCode::Char('a')).await;
    type_text(&mut app, "Bernd").await;
    press(&mut app, KeyCode::Enter).await;
    press(&mut app, KeyCode::Esc).await;

    match &app.overlay {
      Some(Overlay::Form(form)) => assert_eq!(form.value_of("Name"), "Bernd"),
      other => panic!("expected form, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn edit_client_updates_name() {
    let mut app = app().await;
    let id = seed_client(&mut app, "Carla").await;
    press(&mut app, KeyCode::Char('e')).await;
    type_text(&mut app, " M.").await;
    press(&mut app, KeyCode::Enter).await;
    press(&mut app, KeyCode::Enter).await;

    assert_eq!(app.clients[0].id, id);
    assert_eq!(app.clients[0].name, "Carla M.");
  }

  #[tokio::test]
  async fn delete_client_asks_first() {
    let mut app = app().await;
    let keep = seed_client(&mut app, "Dora").await;
    let gone = seed_client(&mut app, "Emil").await;

    press(&mut app, KeyCode::Char('d')).await;
    assert!(matches!(
      &app.overlay,
      Some(Overlay::Confirm(Confirm::DeleteClient { id, label }))
        if *id == gone && label == &format!("Emil (#{gone})")
    ));

    press(&mut app, KeyCode::Char('n')).await;
    assert_eq!(app.clients.len(), 2);

    press(&mut app, KeyCode::Char('d')).await;
    press(&mut app, KeyCode::Char('y')).await;
    assert_eq!(app.clients.len(), 1);
    assert_eq!(app.clients[0].id, keep);
    assert_eq!(app.store.list_clients().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn search_filters_and_esc_clears() {
    let mut app = app().await;
    seed_client(&mut app, "Frieda").await;
    seed_client(&mut app, "Gustav").await;
    assert_eq!(app.visible_clients().len(), 2);

    press(&mut app, KeyCode::Char('/')).await;
    type_text(&mut app, "FRI").await;
    assert_eq!(app.visible_clients().len(), 1);
    assert_eq!(app.cursor_client().map(|c| c.name.as_str()), Some("Frieda"));

    press(&mut app, KeyCode::Enter).await;
    assert!(!app.query_active);
    assert_eq!(app.visible_clients().len(), 1);

    press(&mut app, KeyCode::Char('/')).await;
    press(&mut app, KeyCode::Esc).await;
    assert_eq!(app.visible_clients().len(), 2);
  }

  #[tokio::test]
  async fn new_case_defaults_to_open() {
    let mut app = app().await;
    let client = seed_client(&mut app, "Hanna").await;

    press(&mut app, KeyCode::Enter).await;
    assert_eq!(app.screen, Screen::Cases);
    assert_eq!(app.selected_client, Some(client));

    press(&mut app, KeyCode::Char('a')).await;
    type_text(&mut app, "Prüfungsangst").await;
    press(&mut app, KeyCode::Enter).await;

    assert!(app.overlay.is_none());
    assert_eq!(app.cases.len(), 1);
    assert_eq!(app.cases[0].status, CaseStatus::Open);
    assert_eq!(app.cases[0].problem_category, ProblemCategory::Other);
  }

  #[tokio::test]
  async fn session_records_sud_values() {
    let mut app = app().await;
    let client = seed_client(&mut app, "Ida").await;
    app
      .store
      .add_case(NewCase {
        client_id:        client,
        problem_category: ProblemCategory::Panic,
        problem_text:     "Panik im Aufzug".into(),
        started_at:       Utc::now(),
        status:           None,
      })
      .await
      .unwrap();

    press(&mut app, KeyCode::Enter).await;
    press(&mut app, KeyCode::Enter).await;
    assert_eq!(app.screen, Screen::Sessions);

    press(&mut app, KeyCode::Char('a')).await;
    press(&mut app, KeyCode::Tab).await;
    press(&mut app, KeyCode::Tab).await;
    type_text(&mut app, "8").await;
    press(&mut app, KeyCode::Tab).await;
    type_text(&mut app, "3").await;
    press(&mut app, KeyCode::Enter).await;

    assert_eq!(app.sessions.len(), 1);
    assert_eq!(app.sessions[0].sud_before, Some(8));
    assert_eq!(app.sessions[0].sud_after, Some(3));

    press(&mut app, KeyCode::Char('d')).await;
    press(&mut app, KeyCode::Enter).await;
    assert!(app.sessions.is_empty());
  }

  #[tokio::test]
  async fn store_errors_open_an_alert() {
    let mut app = app().await;
    let id = seed_client(&mut app, "Jonas").await;
    app.store.delete_client(id).await.unwrap();

    press(&mut app, KeyCode::Char('e')).await;
    press(&mut app, KeyCode::Enter).await;
    press(&mut app, KeyCode::Enter).await;
    assert!(matches!(&app.overlay, Some(Overlay::Alert(msg)) if msg.starts_with("Saving failed")));

    press(&mut app, KeyCode::Char('x')).await;
    assert!(app.overlay.is_some());
    press(&mut app, KeyCode::Esc).await;
    assert!(app.overlay.is_none());
  }
}
