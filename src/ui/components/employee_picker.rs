use super::KeyResult;
use crate::feed::{Employee, Selection, NO_FILTER_ID};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

const ALL_EMPLOYEES: &str = "All employees";

/// Overlay for choosing the employee filter.
///
/// The first entry is always "All employees", followed by the directory.
/// Choosing an entry yields its employee id, [`NO_FILTER_ID`] for the first.
#[derive(Debug, Clone, Default)]
pub struct EmployeePicker {
  active: bool,
  employees: Vec<Employee>,
  selected: usize,
}

impl EmployeePicker {
  pub fn new() -> Self {
    Self::default()
  }

  /// Show the picker with the cursor on the current selection
  pub fn show(&mut self, employees: &[Employee], current: &Selection) {
    self.active = true;
    self.employees = employees.to_vec();
    self.selected = current
      .employee_id()
      .and_then(|id| self.employees.iter().position(|e| e.id == id))
      .map(|i| i + 1)
      .unwrap_or(0);
  }

  pub fn hide(&mut self) {
    self.active = false;
    self.employees.clear();
    self.selected = 0;
  }

  fn len(&self) -> usize {
    self.employees.len() + 1
  }

  fn employee_id_at(&self, index: usize) -> Option<String> {
    match index {
      0 => Some(NO_FILTER_ID.to_string()),
      i => self.employees.get(i - 1).map(|e| e.id.clone()),
    }
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<String> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc | KeyCode::Char('q') => {
        self.hide();
        KeyResult::Handled
      }
      KeyCode::Enter => {
        let employee_id = self.employee_id_at(self.selected);
        self.hide();
        match employee_id {
          Some(employee_id) => KeyResult::Event(employee_id),
          None => KeyResult::Handled,
        }
      }
      KeyCode::Char('j') | KeyCode::Down => {
        self.selected = (self.selected + 1) % self.len();
        KeyResult::Handled
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.selected = if self.selected == 0 {
          self.len() - 1
        } else {
          self.selected - 1
        };
        KeyResult::Handled
      }
      _ => KeyResult::Handled,
    }
  }

  /// Render the picker overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let labels: Vec<String> = std::iter::once(ALL_EMPLOYEES.to_string())
      .chain(self.employees.iter().map(Employee::display_name))
      .collect();

    let max_len = labels.iter().map(|l| l.len()).max().unwrap_or(10) as u16;
    let width = (max_len + 6).min(area.width.saturating_sub(4)).max(20);
    let height = (labels.len() as u16 + 2)
      .min(area.height.saturating_sub(4))
      .max(3);

    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let overlay_area = Rect::new(x, y, width, height).intersection(area);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Filter by employee ");

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let items: Vec<ListItem> = labels
      .into_iter()
      .enumerate()
      .map(|(i, label)| {
        let color = if i == 0 { Color::Yellow } else { Color::Cyan };
        ListItem::new(Line::from(Span::styled(label, Style::default().fg(color))))
      })
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(self.selected));

    frame.render_stateful_widget(list, inner, &mut state);
  }
}
