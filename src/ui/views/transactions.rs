use crate::api::Backend;
use crate::feed::{
  Employee, FetchError, LoadingFlags, Selection, SelectionCoordinator, Transaction,
};
use crate::operation::{Operation, OperationStatus};
use crate::ui::components::{EmployeePicker, KeyResult};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{approval_color, format_amount, truncate};
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::views::TransactionDetailView;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use std::collections::HashMap;
use tracing::{debug, error, warn};

/// What the operator asked the coordinator to do
#[derive(Debug, Clone, PartialEq, Eq)]
enum Request {
  /// Reload everything from the first page
  All,
  /// Filter by an employee id as the picker reports it
  Employee(String),
  LoadMore,
}

impl Request {
  fn reload(selection: &Selection) -> Self {
    match selection {
      Selection::Unfiltered => Request::All,
      Selection::ByEmployee(employee_id) => Request::Employee(employee_id.clone()),
    }
  }
}

/// A coordinator coming home from a background operation
type Landed = (SelectionCoordinator, Request, Result<(), FetchError>);

type ApprovalLanded = (String, bool, Result<(), FetchError>);

/// Copy of the coordinator's observable state, rendered while it is away.
#[derive(Debug, Default)]
struct Snapshot {
  records: Option<Vec<Transaction>>,
  has_more: bool,
  selection: Selection,
  label: String,
  directory: Vec<Employee>,
}

impl Snapshot {
  fn capture(coordinator: &SelectionCoordinator) -> Self {
    Self {
      records: coordinator.current_view().map(<[Transaction]>::to_vec),
      has_more: coordinator.has_more(),
      selection: coordinator.selection().clone(),
      label: coordinator.selection_label(),
      directory: coordinator.directory().map(<[Employee]>::to_vec).unwrap_or_default(),
    }
  }
}

/// Root view: the transaction list with employee filter and paging
pub struct TransactionsView {
  backend: Backend,
  /// `None` while an operation has it
  coordinator: Option<SelectionCoordinator>,
  operation: Operation<Landed>,
  pending: Option<Request>,
  loading: LoadingFlags,
  snapshot: Snapshot,
  /// Approval flags toggled this session, by transaction id
  approvals: HashMap<String, bool>,
  approval_op: Operation<ApprovalLanded>,
  list_state: ListState,
  picker: EmployeePicker,
  error: Option<String>,
}

impl TransactionsView {
  /// Create the view and start loading the first page.
  pub fn new(backend: Backend) -> Self {
    let coordinator = backend.coordinator();
    let loading = coordinator.loading_flags();
    let snapshot = Snapshot::capture(&coordinator);

    let mut view = Self {
      backend,
      coordinator: Some(coordinator),
      operation: Operation::idle(),
      pending: None,
      loading,
      snapshot,
      approvals: HashMap::new(),
      approval_op: Operation::idle(),
      list_state: ListState::default(),
      picker: EmployeePicker::new(),
      error: None,
    };
    view.dispatch(Request::All);
    view
  }

  /// Hand the coordinator to a background task. Ignored while one is in flight.
  fn dispatch(&mut self, request: Request) -> bool {
    let Some(mut coordinator) = self.coordinator.take() else {
      debug!(?request, "operation in flight, ignoring request");
      return false;
    };

    self.pending = Some(request.clone());
    self.operation = Operation::spawn(async move {
      let result = match &request {
        Request::All => coordinator.select_all().await,
        Request::Employee(employee_id) => coordinator.select_employee(employee_id).await,
        Request::LoadMore => coordinator.select_load_more().await,
      };
      (coordinator, request, result)
    });
    true
  }

  fn land(&mut self, coordinator: SelectionCoordinator, request: Request, result: Result<(), FetchError>) {
    self.error = result.err().map(|e| e.message().to_string());
    self.snapshot = Snapshot::capture(&coordinator);
    self.coordinator = Some(coordinator);

    if request != Request::LoadMore {
      self.list_state.select(None);
      self.settle_approvals();
    }
  }

  /// Drop overrides the reloaded records already agree with.
  ///
  /// A reload may have read a record before its approval was written, so an
  /// override that still differs from the fresh record is kept.
  fn settle_approvals(&mut self) {
    let records = self.snapshot.records.as_deref().unwrap_or(&[]);
    let fresh: HashMap<&str, bool> = records
      .iter()
      .map(|t| (t.id.as_str(), t.approved))
      .collect();
    self
      .approvals
      .retain(|id, value| fresh.get(id.as_str()).is_some_and(|approved| *approved != *value));
  }

  /// Replace a coordinator lost to a panicked task with a fresh one.
  fn recover(&mut self) {
    error!("coordinator operation aborted, starting over");
    let coordinator = self.backend.coordinator();
    self.loading = coordinator.loading_flags();
    self.snapshot = Snapshot::capture(&coordinator);
    self.coordinator = Some(coordinator);
    self.error = Some("Operation aborted; press 'r' to reload".to_string());
  }

  fn records(&self) -> &[Transaction] {
    self.snapshot.records.as_deref().unwrap_or(&[])
  }

  fn is_busy(&self) -> bool {
    self.operation.is_in_flight() || self.loading.any()
  }

  fn is_approved(&self, transaction: &Transaction) -> bool {
    self
      .approvals
      .get(&transaction.id)
      .copied()
      .unwrap_or(transaction.approved)
  }

  fn selected_record(&self) -> Option<&Transaction> {
    self.list_state.selected().and_then(|i| self.records().get(i))
  }

  fn toggle_approval(&mut self) {
    if self.approval_op.is_in_flight() {
      return;
    }
    let Some(record) = self.selected_record() else {
      return;
    };

    let id = record.id.clone();
    let value = !self.is_approved(record);
    self.approvals.insert(id.clone(), value);

    let approvals = self.backend.approvals();
    self.approval_op = Operation::spawn(async move {
      let result = approvals.set_approval(&id, value).await;
      (id, value, result)
    });
  }

  fn poll_approval(&mut self) {
    match self.approval_op.poll() {
      OperationStatus::Ready((id, value, Err(e))) => {
        warn!(transaction_id = %id, error = %e, "approval failed");
        self.approvals.insert(id, !value);
        self.error = Some(e.message().to_string());
      }
      OperationStatus::Ready((_, _, Ok(()))) => {}
      OperationStatus::Lost => {
        self.error = Some("Approval aborted".to_string());
      }
      OperationStatus::Idle | OperationStatus::Pending => {}
    }
  }

  fn loading_label(&self) -> Option<&'static str> {
    if self.loading.directory.is_loading() {
      Some("loading employees...")
    } else if self.loading.employee_feed.is_loading() {
      Some("loading employee transactions...")
    } else if self.loading.feed.is_loading() || self.operation.is_in_flight() {
      Some("loading transactions...")
    } else {
      None
    }
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.records().len();
    ensure_valid_selection(&mut self.list_state, len);

    let title = match (self.loading_label(), &self.snapshot.records) {
      (Some(loading), _) => format!(" Transactions [{}] ({}) ", self.snapshot.label, loading),
      (None, Some(records)) => format!(
        " Transactions [{}] ({}) ",
        self.snapshot.label,
        records.len()
      ),
      (None, None) => format!(" Transactions [{}] ", self.snapshot.label),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if self.records().is_empty() {
      let content = match (&self.snapshot.records, self.is_busy(), &self.error) {
        (_, true, _) => "Loading transactions...",
        (None, false, Some(_)) => "Failed to load transactions. Press 'r' to retry.",
        (None, false, None) => "No transactions loaded.",
        (Some(_), false, _) => "No transactions found.",
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = self
      .records()
      .iter()
      .map(|t| {
        let approved = self.is_approved(t);
        let line = Line::from(vec![
          Span::styled(
            t.date.format("%Y-%m-%d").to_string(),
            Style::default().fg(Color::DarkGray),
          ),
          Span::raw("  "),
          Span::styled(
            format!("{:<24}", truncate(&t.merchant, 24)),
            Style::default().fg(Color::Cyan),
          ),
          Span::raw(" "),
          Span::raw(format!("{:<20}", truncate(&t.employee.display_name(), 20))),
          Span::raw(" "),
          Span::raw(format!("{:>12}", format_amount(t.amount))),
          Span::raw("  "),
          Span::styled(
            if approved { "[x]" } else { "[ ]" },
            Style::default().fg(approval_color(approved)),
          ),
        ]);
        ListItem::new(line)
      })
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }

  fn render_more(&self, frame: &mut Frame, area: Rect) {
    if !self.snapshot.selection.is_unfiltered() || self.snapshot.records.is_none() {
      return;
    }

    let line = if self.pending == Some(Request::LoadMore) && self.operation.is_in_flight() {
      let elapsed = self
        .operation
        .elapsed()
        .map(|d| format!(" ({:.1}s)", d.as_secs_f32()))
        .unwrap_or_default();
      Line::from(Span::styled(
        format!(" Loading more...{}", elapsed),
        Style::default().fg(Color::Yellow),
      ))
    } else if self.snapshot.has_more {
      Line::from(vec![
        Span::styled(" <m>", Style::default().fg(Color::Cyan)),
        Span::styled(" View more", Style::default().fg(Color::White)),
      ])
    } else {
      Line::from(Span::styled(
        " End of transactions",
        Style::default().fg(Color::DarkGray),
      ))
    };

    frame.render_widget(Paragraph::new(line), area);
  }
}

impl View for TransactionsView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match self.picker.handle_key(key) {
      KeyResult::Event(employee_id) => {
        self.dispatch(Request::Employee(employee_id));
        return ViewAction::None;
      }
      KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.list_state.select_next();
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.list_state.select_previous();
      }
      KeyCode::Char('f') => {
        self
          .picker
          .show(&self.snapshot.directory, &self.snapshot.selection);
      }
      KeyCode::Char('m') => {
        if self.snapshot.has_more {
          self.dispatch(Request::LoadMore);
        }
      }
      KeyCode::Char('r') => {
        self.dispatch(Request::reload(&self.snapshot.selection));
      }
      KeyCode::Char(' ') => self.toggle_approval(),
      KeyCode::Enter => {
        if let Some(record) = self.selected_record() {
          let approved = self.is_approved(record);
          return ViewAction::Push(Box::new(TransactionDetailView::new(
            record.clone(),
            approved,
          )));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Min(3), Constraint::Length(1)])
      .split(area);

    self.render_list(frame, chunks[0]);
    self.render_more(frame, chunks[1]);
    self.picker.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    "Transactions".to_string()
  }

  fn context(&self) -> Option<String> {
    Some(self.snapshot.label.clone())
  }

  fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  fn tick(&mut self) {
    match self.operation.poll() {
      OperationStatus::Ready((coordinator, request, result)) => {
        self.pending = None;
        self.land(coordinator, request, result);
      }
      OperationStatus::Lost => {
        self.pending = None;
        self.recover();
      }
      OperationStatus::Idle | OperationStatus::Pending => {}
    }
    self.poll_approval();
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    let mut shortcuts = vec![Shortcut::new("f", "filter")];
    if self.snapshot.has_more {
      shortcuts.push(Shortcut::new("m", "more"));
    }
    shortcuts.extend([
      Shortcut::new("r", "reload"),
      Shortcut::new("space", "approve"),
      Shortcut::new("enter", "details"),
      Shortcut::new("q", "quit"),
    ]);
    shortcuts
  }
}
