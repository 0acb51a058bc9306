use crate::feed::Transaction;
use crate::ui::renderfns::{approval_color, format_amount};
use crate::ui::view::{View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Read-only view of one transaction
pub struct TransactionDetailView {
  transaction: Transaction,
  approved: bool,
}

impl TransactionDetailView {
  pub fn new(transaction: Transaction, approved: bool) -> Self {
    Self {
      transaction,
      approved,
    }
  }

  fn field<'a>(label: &'a str, value: Span<'a>) -> Line<'a> {
    Line::from(vec![
      Span::styled(format!("{:<10}", label), Style::default().fg(Color::DarkGray)),
      value,
    ])
  }
}

impl View for TransactionDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => ViewAction::Pop,
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let t = &self.transaction;

    let block = Block::default()
      .title(format!(" {} ", t.merchant))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let lines = vec![
      Self::field("Id", Span::raw(t.id.as_str())),
      Self::field(
        "Amount",
        Span::styled(format_amount(t.amount), Style::default().fg(Color::White).bold()),
      ),
      Self::field("Merchant", Span::styled(t.merchant.as_str(), Style::default().fg(Color::Cyan))),
      Self::field(
        "Employee",
        Span::raw(format!("{} ({})", t.employee.display_name(), t.employee.id)),
      ),
      Self::field("Date", Span::raw(t.date.format("%A, %B %-d %Y").to_string())),
      Self::field(
        "Approved",
        Span::styled(
          if self.approved { "yes" } else { "no" },
          Style::default().fg(approval_color(self.approved)),
        ),
      ),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
  }

  fn breadcrumb_label(&self) -> String {
    self.transaction.id.clone()
  }
}
