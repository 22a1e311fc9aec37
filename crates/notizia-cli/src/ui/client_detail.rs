//! Client detail pane (right panel): the client's cases and, once a case is
//! opened, its outcome and sessions.

use chrono::{DateTime, Local, Utc};
use notizia_core::{
  case::{Case, CaseStatus},
  session::Session,
};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::{App, Screen};

// ─── Public entry ─────────────────────────────────────────────────────────────

/// Render the detail pane into `area`.
pub fn draw<S>(f: &mut Frame, area: Rect, app: &App<S>) {
  let title = app
    .selected_client_record()
    .map(|c| format!(" {} (#{}) ", c.name, c.id))
    .unwrap_or_else(|| " (unknown) ".into());

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let note = app
    .selected_client_record()
    .and_then(|c| c.note.as_deref())
    .unwrap_or("");

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints(if app.screen == Screen::Sessions {
      [
        Constraint::Length(2),
        Constraint::Percentage(35),
        Constraint::Percentage(65),
      ]
    } else {
      [Constraint::Length(2), Constraint::Min(0), Constraint::Length(0)]
    })
    .split(inner);

  f.render_widget(
    Paragraph::new(Line::from(Span::styled(
      note.to_owned(),
      Style::default().fg(Color::Gray),
    )))
    .wrap(Wrap { trim: true }),
    rows[0],
  );

  draw_cases(f, rows[1], app);
  if app.screen == Screen::Sessions {
    draw_sessions(f, rows[2], app);
  }
}

// ─── Cases ────────────────────────────────────────────────────────────────────

fn draw_cases<S>(f: &mut Frame, area: Rect, app: &App<S>) {
  let focused = app.screen == Screen::Cases;
  let block = Block::default()
    .title(format!(" Cases ({}) ", app.cases.len()))
    .borders(Borders::TOP)
    .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }));
  let inner = block.inner(area);
  f.render_widget(block, area);

  if app.cases.is_empty() {
    f.render_widget(
      Paragraph::new("No cases. Press a to open one.").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let items: Vec<ListItem> = app.cases.iter().map(case_item).collect();
  let mut state = ListState::default();
  state.select(Some(app.case_cursor));
  f.render_stateful_widget(
    List::new(items).highlight_style(highlight(focused)),
    inner,
    &mut state,
  );
}

fn case_item(case: &Case) -> ListItem<'static> {
  let mut spans = vec![
    Span::styled(format!("{:<11}", format_date(&case.started_at)), Style::default().fg(Color::DarkGray)),
    Span::styled(format!("{:<9}", case.status.as_str()), status_style(case.status)),
    Span::styled(
      format!("{:<15}", case.problem_category.as_str()),
      Style::default().fg(Color::Cyan),
    ),
    Span::raw(case.problem_text.clone()),
  ];
  if let Some(pct) = case.symptom_change_pct {
    spans.push(Span::styled(format!("  {pct}%"), Style::default().fg(Color::Green)));
  }
  ListItem::new(Line::from(spans))
}

fn status_style(status: CaseStatus) -> Style {
  match status {
    CaseStatus::Open => Style::default().fg(Color::Yellow),
    CaseStatus::Resolved => Style::default().fg(Color::Green),
    CaseStatus::Dropped => Style::default().fg(Color::DarkGray),
  }
}

// ─── Sessions ─────────────────────────────────────────────────────────────────

fn draw_sessions<S>(f: &mut Frame, area: Rect, app: &App<S>) {
  let title = app
    .open_case_record()
    .map(|c| format!(" Sessions of case #{} ({}) ", c.id, app.sessions.len()))
    .unwrap_or_else(|| " Sessions ".into());
  let block = Block::default()
    .title(title)
    .borders(Borders::TOP)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
    .split(inner);

  if app.sessions.is_empty() {
    f.render_widget(
      Paragraph::new("No sessions. Press a to record one.")
        .style(Style::default().fg(Color::DarkGray)),
      cols[0],
    );
  } else {
    let items: Vec<ListItem> = app.sessions.iter().map(session_item).collect();
    let mut state = ListState::default();
    state.select(Some(app.session_cursor));
    f.render_stateful_widget(
      List::new(items).highlight_style(highlight(true)),
      cols[0],
      &mut state,
    );
  }

  let lines = match app.cursor_session() {
    Some(session) => session_lines(session),
    None => app.open_case_record().map(outcome_lines).unwrap_or_default(),
  };
  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), cols[1]);
}

fn session_item(session: &Session) -> ListItem<'static> {
  let sud = match (session.sud_before, session.sud_after) {
    (Some(b), Some(a)) => format!("SUD {b}→{a}"),
    (Some(b), None) => format!("SUD {b}→?"),
    _ => String::new(),
  };
  ListItem::new(Line::from(vec![
    Span::styled(
      format!("{:<17}", format_datetime(&session.started_at)),
      Style::default().fg(Color::DarkGray),
    ),
    Span::styled(format!("{:<20}", session.method.as_str()), Style::default().fg(Color::Cyan)),
    Span::raw(sud),
  ]))
}

fn session_lines(session: &Session) -> Vec<Line<'static>> {
  let mut lines = vec![
    labelled("Started", Some(format_datetime(&session.started_at))),
    labelled("Method", Some(session.method.as_str().to_owned())),
    labelled("Duration", session.duration_min.map(|m| format!("{m} min"))),
    labelled("SUD before", session.sud_before.map(|n| n.to_string())),
    labelled("SUD after", session.sud_after.map(|n| n.to_string())),
    labelled("Ease", session.ease_hypnosis.map(|n| format!("{n}/5"))),
  ];
  for (label, text) in [
    ("Release", &session.emotional_release),
    ("Insights", &session.insights),
    ("Notes", &session.notes),
  ] {
    if text.is_some() {
      lines.push(labelled(label, text.clone()));
    }
  }
  lines
}

fn outcome_lines(case: &Case) -> Vec<Line<'static>> {
  vec![
    labelled("Status", Some(case.status.as_str().to_owned())),
    labelled("Resolved at", case.resolved_at.as_ref().map(format_date)),
    labelled(
      "Resolved by",
      case.resolved_by_method.map(|m| m.as_str().to_owned()),
    ),
    labelled("Sessions", case.sessions_total.map(|n| n.to_string())),
    labelled(
      "PC s/r/w",
      match (case.pc_self, case.pc_relationships, case.pc_world) {
        (None, None, None) => None,
        (s, r, w) => Some(format!("{} / {} / {}", signed(s), signed(r), signed(w))),
      },
    ),
    labelled("Symptoms", case.symptom_change_pct.map(|n| format!("{n}%"))),
    labelled("Notes", case.outcome_notes.clone()),
  ]
}

// ─── Formatting helpers ───────────────────────────────────────────────────────

fn labelled(label: &'static str, value: Option<String>) -> Line<'static> {
  Line::from(vec![
    Span::styled(
      format!("{label:<13}"),
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    match value {
      Some(v) => Span::raw(v),
      None => Span::styled("—", Style::default().fg(Color::DarkGray)),
    },
  ])
}

fn signed(n: Option<i64>) -> String { n.map_or_else(|| "?".into(), |n| format!("{n:+}")) }

fn format_date(t: &DateTime<Utc>) -> String {
  t.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

fn format_datetime(t: &DateTime<Utc>) -> String {
  t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn highlight(focused: bool) -> Style {
  if focused {
    Style::default()
      .bg(Color::Blue)
      .fg(Color::White)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default().add_modifier(Modifier::REVERSED)
  }
}
