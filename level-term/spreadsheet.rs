//! Full-screen grid session over the terminal.

use std::time::Duration;

use crossterm::event::{
  self,
  Event,
};
use eyre::Result;
use level_lib::{
  Session,
  grid::{
    self,
    Grid,
    GridKey,
  },
  grid_layout,
};

use crate::{
  input,
  render::{
    self,
    CHROME_ROWS,
  },
  terminal::{
    RawModeGuard,
    Terminal,
  },
};

fn resize_key(width: u16, height: u16) -> GridKey {
  GridKey::Resize {
    rows: height.saturating_sub(CHROME_ROWS) as usize,
    width,
  }
}

/// Runs the grid until it exits and returns the final notice, if any.
pub fn run(session: &mut Session) -> Result<Option<String>> {
  let mut terminal = Terminal::new()?;
  terminal.enter_raw_mode()?;
  let guard = RawModeGuard(&mut terminal);

  let size = guard.0.size()?;
  let mut grid = grid::step(Grid::default(), resize_key(size.width, size.height), session);
  let mut needs_render = true;
  log::debug!("grid opened with {} levels", session.store().len());

  loop {
    if grid.is_exited() {
      break;
    }

    if needs_render {
      let plan = grid_layout::plan(&grid, session.store());
      let title = match session.path() {
        Some(path) => format!("Level Configuration Editor - {}", path.display()),
        None => "Level Configuration Editor".to_string(),
      };
      guard.0.draw(|frame| render::draw(frame, &plan, &title))?;
      needs_render = false;
    }

    if !event::poll(Duration::from_millis(100))? {
      continue;
    }
    let key = match event::read()? {
      Event::Key(key) => input::to_grid_key(key),
      Event::Resize(width, height) => Some(resize_key(width, height)),
      _ => None,
    };
    if let Some(key) = key {
      let mode = grid.mode.as_str();
      grid = grid::step(grid, key, session);
      if grid.mode.as_str() != mode {
        log::debug!("grid mode {mode} -> {}", grid.mode.as_str());
      }
      needs_render = true;
    }
  }

  drop(guard);
  Ok(grid.notice.map(|notice| notice.text))
}
