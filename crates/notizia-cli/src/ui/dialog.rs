//! Modal dialogs: forms, the review step, confirmations and alerts.

use ratatui::{
  Frame,
  layout::{Constraint, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::{
  app::{Confirm, Overlay},
  form::{Field, FieldKind, Form, Submission},
};

/// Render `overlay` centred over `area`.
pub fn draw(f: &mut Frame, area: Rect, overlay: &Overlay) {
  match overlay {
    Overlay::Form(form) => draw_form(f, area, form),
    Overlay::Review { submission, .. } => draw_review(f, area, submission),
    Overlay::Confirm(confirm) => draw_confirm(f, area, confirm),
    Overlay::Alert(msg) => draw_message(
      f,
      area,
      " Error ",
      Color::Red,
      vec![Line::from(msg.clone()), Line::from(""), hint("Enter/Esc dismiss")],
    ),
  }
}

/// A `width` × `height` rectangle centred in `area`, clipped to it.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
    .flex(Flex::Center)
    .areas(area);
  let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
    .flex(Flex::Center)
    .areas(row);
  rect
}

fn frame<'a>(title: &'a str, color: Color) -> Block<'a> {
  Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(color))
}

fn hint(text: &'static str) -> Line<'static> {
  Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

// ─── Form ─────────────────────────────────────────────────────────────────────

fn draw_form(f: &mut Frame, area: Rect, form: &Form) {
  let mut lines = Vec::with_capacity(form.fields.len() * 2 + 2);
  for (i, field) in form.fields.iter().enumerate() {
    lines.push(field_line(field, i == form.focus));
    if let Some(err) = &field.error {
      lines.push(Line::from(Span::styled(
        format!("{:<20}{err}", ""),
        Style::default().fg(Color::Red),
      )));
    }
  }
  lines.push(Line::from(""));
  lines.push(hint("Tab next  ←→ choose  Enter submit  Esc cancel"));

  let rect = centered(area, 72, lines.len() as u16 + 2);
  f.render_widget(Clear, rect);
  let title = format!(" {} ", form.title);
  f.render_widget(Paragraph::new(lines).block(frame(&title, Color::Cyan)), rect);
}

fn field_line(field: &Field, focused: bool) -> Line<'static> {
  let label_style = if focused {
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Gray)
  };
  let value = match &field.kind {
    FieldKind::Choice(_) => format!("‹ {} ›", field.value),
    FieldKind::Text | FieldKind::Number(_) if focused => format!("{}_", field.value),
    FieldKind::Text | FieldKind::Number(_) => field.value.clone(),
  };
  let value_style = if focused {
    Style::default().add_modifier(Modifier::UNDERLINED)
  } else {
    Style::default()
  };
  Line::from(vec![
    Span::styled(format!("{:<20}", field.label), label_style),
    Span::styled(value, value_style),
  ])
}

// ─── Review ───────────────────────────────────────────────────────────────────

fn draw_review(f: &mut Frame, area: Rect, submission: &Submission) {
  let mut lines = Vec::new();
  if let Submission::Client { id, fields } = submission {
    let heading = match id {
      Some(id) => format!("Save changes to client #{id}?"),
      None => "Add this client?".to_owned(),
    };
    lines.push(Line::from(Span::styled(heading, Style::default().add_modifier(Modifier::BOLD))));
    lines.push(Line::from(""));
    lines.push(Line::from(format!("Name  {}", fields.name)));
    lines.push(Line::from(format!(
      "Note  {}",
      fields.note.as_deref().unwrap_or("(none)")
    )));
  }
  lines.push(Line::from(""));
  lines.push(hint("Enter save  Esc back"));
  draw_message(f, area, " Review ", Color::Cyan, lines);
}

// ─── Confirm / alert ──────────────────────────────────────────────────────────

fn draw_confirm(f: &mut Frame, area: Rect, confirm: &Confirm) {
  let question = match confirm {
    Confirm::DeleteClient { label, .. } => {
      format!("Delete {label} with all cases and sessions?")
    }
    Confirm::DeleteSession { id } => format!("Delete session #{id}?"),
  };
  draw_message(
    f,
    area,
    " Confirm ",
    Color::Yellow,
    vec![Line::from(question), Line::from(""), hint("y delete  n cancel")],
  );
}

fn draw_message(f: &mut Frame, area: Rect, title: &str, color: Color, lines: Vec<Line>) {
  let height = lines.len() as u16 + 4;
  let rect = centered(area, 60, height);
  f.render_widget(Clear, rect);
  f.render_widget(
    Paragraph::new(lines)
      .wrap(Wrap { trim: false })
      .block(frame(title, color)),
    rect,
  );
}
