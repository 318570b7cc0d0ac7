//! Terminal abstraction using ratatui + crossterm backend.

use std::io::{
  self,
  Stdout,
};

use crossterm::{
  cursor::{
    Hide,
    Show,
  },
  execute,
  terminal::{
    EnterAlternateScreen,
    LeaveAlternateScreen,
    disable_raw_mode,
    enable_raw_mode,
  },
};
use eyre::Result;
use ratatui::{
  Terminal as RatatuiTerminal,
  backend::CrosstermBackend,
  layout::Size,
};

pub struct Terminal {
  terminal: RatatuiTerminal<CrosstermBackend<Stdout>>,
}

impl Terminal {
  pub fn new() -> Result<Self> {
    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let terminal = RatatuiTerminal::new(backend)?;
    Ok(Self { terminal })
  }

  pub fn enter_raw_mode(&mut self) -> Result<()> {
    enable_raw_mode()?;
    execute!(self.terminal.backend_mut(), EnterAlternateScreen, Hide)?;
    self.terminal.clear()?;
    Ok(())
  }

  pub fn leave_raw_mode(&mut self) -> Result<()> {
    execute!(self.terminal.backend_mut(), Show, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
  }

  pub fn draw<F>(&mut self, f: F) -> Result<()>
  where
    F: for<'a> FnOnce(&mut ratatui::Frame<'a>),
  {
    self.terminal.draw(f)?;
    Ok(())
  }

  pub fn size(&self) -> Result<Size> {
    Ok(self.terminal.size()?)
  }
}

/// Restores the terminal if the grid loop bails out early.
pub struct RawModeGuard<'a>(pub &'a mut Terminal);

impl Drop for RawModeGuard<'_> {
  fn drop(&mut self) {
    if let Err(err) = self.0.leave_raw_mode() {
      log::warn!("failed to restore terminal: {err}");
    }
  }
}
