use crate::api::Backend;
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::ui::renderfns::{draw_footer, draw_header};
use crate::ui::view::{View, ViewAction};
use crate::ui::views::TransactionsView;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tracing::info;

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<Box<dyn View>>,
  title: String,
  source: String,
  tick_rate: Duration,
  should_quit: bool,
}

impl App {
  pub fn new(config: &Config, backend: Backend) -> Self {
    let source = backend.description().to_string();
    let root = TransactionsView::new(backend);

    Self {
      view_stack: vec![Box::new(root)],
      title: config
        .title
        .clone()
        .unwrap_or_else(|| "spendview".to_string()),
      source,
      tick_rate: Duration::from_millis(config.tick_rate_ms.max(10)),
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let result = self.event_loop().await;

    // Restore the terminal even if the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(&mut self) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let mut events = EventHandler::new(self.tick_rate);
    info!("started");

    while !self.should_quit {
      terminal.draw(|frame| self.draw(frame))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Tick) => self.tick(),
        Some(Event::Resize) => {}
        None => break,
      }
    }

    info!("quitting");
    Ok(())
  }

  fn tick(&mut self) {
    // Keep the root polling even when a detail view is on top
    for view in self.view_stack.iter_mut() {
      view.tick();
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let Some(view) = self.view_stack.last_mut() else {
      self.should_quit = true;
      return;
    };

    match view.handle_key(key) {
      ViewAction::None => {}
      ViewAction::Push(next) => self.view_stack.push(next),
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
    }
  }

  fn draw(&mut self, frame: &mut Frame) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Header
        Constraint::Min(1),    // Current view
        Constraint::Length(1), // Footer
      ])
      .split(frame.area());

    let breadcrumb = self.breadcrumb();
    let error = self.view_stack.first().and_then(|root| root.error().map(String::from));

    let Some(view) = self.view_stack.last_mut() else {
      return;
    };

    let context = view.context();
    draw_header(
      frame,
      chunks[0],
      &self.title,
      &self.source,
      context.as_deref(),
      &view.shortcuts(),
    );
    view.render(frame, chunks[1]);
    draw_footer(frame, chunks[2], &breadcrumb, error.as_deref());
  }

  fn breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|v| v.breadcrumb_label())
      .collect()
  }
}
