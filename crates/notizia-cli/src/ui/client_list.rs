//! Client list pane (left panel).

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::{App, Screen};

/// Render the client list into `area`.
pub fn draw<S>(f: &mut Frame, area: Rect, app: &App<S>) {
  let visible = app.visible_clients();
  let total = app.clients.len();
  let searching = app.query_active || !app.query.is_empty();

  let title = if searching {
    format!(" Clients ({}/{}) ", visible.len(), total)
  } else {
    format!(" Clients ({total}) ")
  };

  let focused = app.screen == Screen::ClientList;
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }));

  let items: Vec<ListItem> = visible
    .iter()
    .map(|client| {
      let mut spans = vec![
        Span::styled(format!("#{:<4} ", client.id), Style::default().fg(Color::DarkGray)),
        Span::raw(client.name.clone()),
      ];
      if app.selected_client == Some(client.id) {
        spans.push(Span::styled(" ●", Style::default().fg(Color::Cyan)));
      }
      ListItem::new(Line::from(spans))
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Search bar on the last inner row.
  if searching && inner_area.height > 2 {
    let query_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let text = if app.query_active {
      format!("/{}_", app.query)
    } else {
      format!("/{}", app.query)
    };
    f.render_widget(
      Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
      query_area,
    );
  }

  if visible.is_empty() {
    let hint = if searching { "No matches." } else { "No clients yet. Press a to add one." };
    f.render_widget(
      Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
      inner_area,
    );
    return;
  }

  let mut state = ListState::default();
  state.select(Some(app.list_cursor));

  let highlight = if focused {
    Style::default()
      .bg(Color::Blue)
      .fg(Color::White)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default().add_modifier(Modifier::REVERSED)
  };

  f.render_stateful_widget(
    List::new(items).highlight_style(highlight),
    inner_area,
    &mut state,
  );
}
