//! TUI rendering: orchestrates all panes.

pub mod client_detail;
pub mod client_list;
pub mod dialog;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, Overlay, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S>(f: &mut Frame, app: &App<S>) {
  let area = f.area();

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0]);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);

  if let Some(overlay) = &app.overlay {
    dialog::draw(f, area, overlay);
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " notizia  [/] search  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body<S>(f: &mut Frame, area: Rect, app: &App<S>) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
    .split(area);

  client_list::draw(f, cols[0], app);

  if app.selected_client.is_some() {
    client_detail::draw(f, cols[1], app);
  } else {
    draw_empty_detail(f, cols[1]);
  }
}

fn draw_empty_detail(f: &mut Frame, area: Rect) {
  let block = Block::default()
    .title(" Cases ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new(Line::from(Span::styled(
      "Select a client and press Enter.",
      Style::default().fg(Color::DarkGray),
    ))),
    inner,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

/// Mode label and key hints for the current focus.
fn mode<S>(app: &App<S>) -> (&'static str, &'static str) {
  match (&app.overlay, app.screen) {
    (Some(Overlay::Form(_)), _) => (
      "FORM",
      "Tab/↑↓ field  ←→ choose  Enter submit  Esc cancel",
    ),
    (Some(Overlay::Review { .. }), _) => ("REVIEW", "Enter save  Esc back to form"),
    (Some(Overlay::Confirm(_)), _) => ("CONFIRM", "y confirm  n cancel"),
    (Some(Overlay::Alert(_)), _) => ("ERROR", "Enter/Esc dismiss"),
    (None, Screen::ClientList) if app.query_active => (
      "SEARCH",
      "Type to filter  Esc clear  Enter keep",
    ),
    (None, Screen::ClientList) => (
      "CLIENTS",
      "jk move  / search  a add  e edit  d delete  Enter cases  q quit",
    ),
    (None, Screen::Cases) => (
      "CASES",
      "jk move  a add  o outcome  Enter sessions  Esc back",
    ),
    (None, Screen::Sessions) => ("SESSIONS", "jk move  a add  d delete  Esc back"),
  }
}

fn draw_status<S>(f: &mut Frame, area: Rect, app: &App<S>) {
  let (mode_label, hints) = mode(app);

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), Style::default().fg(Color::Gray));

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}
