use crate::ui::view::Shortcut;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar with title, data source, view context and shortcuts
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  title: &str,
  source: &str,
  context: Option<&str>,
  shortcuts: &[Shortcut],
) {
  let mut spans = vec![
    Span::styled(format!(" {} ", title), Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", source), Style::default().fg(Color::White)),
  ];

  if let Some(context) = context {
    spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
    spans.push(Span::styled(
      format!(" {} ", context),
      Style::default().fg(Color::Yellow).bold(),
    ));
  }

  spans.push(Span::raw(" "));
  spans.extend(shortcut_spans(shortcuts));

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}

/// Keys and brackets highlighted, descriptions dimmed
fn shortcut_spans(shortcuts: &[Shortcut]) -> Vec<Span<'static>> {
  shortcuts
    .iter()
    .flat_map(|s| {
      [
        Span::raw("  "),
        Span::styled(format!("<{}>", s.key), Style::default().fg(Color::Cyan)),
        Span::styled(format!(" {}", s.label), Style::default().fg(Color::DarkGray)),
      ]
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_shortcut_spans() {
    let spans = shortcut_spans(&[Shortcut::new("f", "filter"), Shortcut::new("q", "quit")]);
    let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
    assert_eq!(text, "  <f> filter  <q> quit");
  }
}
