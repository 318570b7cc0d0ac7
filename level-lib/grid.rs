//! Spreadsheet-style navigation and in-place editing over a level store.
//!
//! The whole editing state lives in one [`Grid`] value. Each key press is fed
//! through [`step`], which consumes the current state and returns the next
//! one; the store is only touched through the [`GridHost`] it is given.
//!
//! ```text
//!            Enter (editable column)           Enter (value coerces)
//! Navigate ---------------------------> Editing ---------------------> Navigate
//!    |  ^                                  |  ^ Enter (bad value): stay
//!    |  +----------- Esc ------------------+  |
//!    |
//!    +-- q (unsaved) --> ConfirmQuit --y/n--> Exited
//!    +-- q (saved) ----------------------> Exited
//! ```

use std::fmt;

use crate::{
  field::{
    Field,
    FieldKind,
  },
  model::LevelConfig,
  session::{
    Session,
    SessionError,
  },
  store::LevelStore,
};

pub const DEFAULT_VISIBLE_ROWS: usize = 20;
pub const DEFAULT_VISIBLE_WIDTH: u16 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnTarget {
  /// The level number itself; shown but never edited.
  LevelNumber,
  Field(Field),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
  pub title:  &'static str,
  pub width:  u16,
  pub target: ColumnTarget,
}

impl Column {
  pub fn kind(&self) -> FieldKind {
    match self.target {
      ColumnTarget::LevelNumber => FieldKind::Int,
      ColumnTarget::Field(field) => field.kind(),
    }
  }

  pub fn field(&self) -> Option<Field> {
    match self.target {
      ColumnTarget::LevelNumber => None,
      ColumnTarget::Field(field) => Some(field),
    }
  }

  pub fn is_editable(&self) -> bool {
    self.field().is_some()
  }

  pub fn cell(&self, level: i64, config: &LevelConfig) -> String {
    match self.target {
      ColumnTarget::LevelNumber => level.to_string(),
      ColumnTarget::Field(field) => field.display(config),
    }
  }
}

const fn column(title: &'static str, width: u16, field: Field) -> Column {
  Column {
    title,
    width,
    target: ColumnTarget::Field(field),
  }
}

pub const COLUMNS: &[Column] = &[
  Column {
    title:  "Level",
    width:  8,
    target: ColumnTarget::LevelNumber,
  },
  column("Name", 12, Field::Name),
  column("Enemy Types", 20, Field::EnemyTypes),
  column("Max Enemies", 12, Field::MaxEnemies),
  column("Spawn Time", 12, Field::SpawnTimeWindow),
  column("Collision Sep", 14, Field::CollisionSeparation),
  column("Wrap Buffer", 12, Field::WrapBuffer),
  column("Speed Mult", 12, Field::SpeedMultiplier),
  column("Eccentricity", 14, Field::EccentricityMultiplier),
  column("Score Bonus", 12, Field::ScoreBonus),
];

/// Platform-independent key press understood by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKey {
  Up,
  Down,
  Left,
  Right,
  PageUp,
  PageDown,
  Home,
  End,
  Enter,
  Escape,
  Backspace,
  Char(char),
  /// The drawable area changed: number of data rows and total width.
  Resize { rows: usize, width: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridMode {
  Navigate,
  Editing { buffer: String },
  ConfirmQuit,
  Exited,
}

impl GridMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      GridMode::Navigate => "NAVIGATE",
      GridMode::Editing { .. } => "EDITING",
      GridMode::ConfirmQuit => "QUIT?",
      GridMode::Exited => "EXITED",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
  Info,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub level: NoticeLevel,
  pub text:  String,
}

impl Notice {
  pub fn info(text: impl Into<String>) -> Self {
    Self {
      level: NoticeLevel::Info,
      text:  text.into(),
    }
  }

  pub fn error(text: impl Into<String>) -> Self {
    Self {
      level: NoticeLevel::Error,
      text:  text.into(),
    }
  }
}

/// What the grid needs from its surroundings.
pub trait GridHost {
  type Error: fmt::Display;

  fn store(&self) -> &LevelStore;
  fn store_mut(&mut self) -> &mut LevelStore;
  /// Persists the store and describes where it went.
  fn save(&mut self) -> Result<String, Self::Error>;
}

impl GridHost for Session {
  type Error = SessionError;

  fn store(&self) -> &LevelStore {
    Session::store(self)
  }

  fn store_mut(&mut self) -> &mut LevelStore {
    Session::store_mut(self)
  }

  fn save(&mut self) -> Result<String, SessionError> {
    let (path, count) = self.save_file(None)?;
    Ok(format!("Saved {count} levels to {}", path.display()))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
  pub cursor_row:    usize,
  pub cursor_col:    usize,
  pub scroll_top:    usize,
  pub scroll_left:   usize,
  pub visible_rows:  usize,
  pub visible_width: u16,
  pub mode:          GridMode,
  pub notice:        Option<Notice>,
}

impl Default for Grid {
  fn default() -> Self {
    Self::new(DEFAULT_VISIBLE_ROWS, DEFAULT_VISIBLE_WIDTH)
  }
}

impl Grid {
  pub fn new(visible_rows: usize, visible_width: u16) -> Self {
    Self {
      cursor_row:    0,
      cursor_col:    0,
      scroll_top:    0,
      scroll_left:   0,
      visible_rows:  visible_rows.max(1),
      visible_width: visible_width.max(1),
      mode:          GridMode::Navigate,
      notice:        None,
    }
  }

  pub fn column(&self) -> &'static Column {
    &COLUMNS[self.cursor_col]
  }

  pub fn is_exited(&self) -> bool {
    self.mode == GridMode::Exited
  }

  pub fn edit_buffer(&self) -> Option<&str> {
    match &self.mode {
      GridMode::Editing { buffer } => Some(buffer),
      _ => None,
    }
  }

  /// Keeps the cursor row inside the vertical window.
  fn scroll_rows(&mut self, rows: usize) {
    self.cursor_row = self.cursor_row.min(rows.saturating_sub(1));
    if self.cursor_row < self.scroll_top {
      self.scroll_top = self.cursor_row;
    } else if self.cursor_row > self.scroll_top + self.visible_rows - 1 {
      self.scroll_top = self.cursor_row + 1 - self.visible_rows;
    }
  }

  /// Keeps the cursor column inside the horizontal window.
  fn scroll_columns(&mut self) {
    if self.cursor_col < self.scroll_left {
      self.scroll_left = self.cursor_col;
    }
    while self.scroll_left < self.cursor_col
      && span_width(self.scroll_left, self.cursor_col) > self.visible_width as usize
    {
      self.scroll_left += 1;
    }
  }
}

/// Width of columns `first..=last` including one separator after each.
pub fn span_width(first: usize, last: usize) -> usize {
  COLUMNS[first..=last]
    .iter()
    .map(|column| column.width as usize + 1)
    .sum()
}

/// Advances the grid by one key press.
pub fn step<H: GridHost>(mut grid: Grid, key: GridKey, host: &mut H) -> Grid {
  let rows = host.store().len();

  if let GridKey::Resize { rows: height, width } = key {
    grid.visible_rows = height.max(1);
    grid.visible_width = width.max(1);
    grid.scroll_rows(rows);
    grid.scroll_columns();
    return grid;
  }

  grid.notice = None;
  match std::mem::replace(&mut grid.mode, GridMode::Navigate) {
    GridMode::Navigate => navigate(grid, key, rows, host),
    GridMode::Editing { buffer } => edit(grid, buffer, key, host),
    GridMode::ConfirmQuit => confirm_quit(grid, key, host),
    GridMode::Exited => {
      grid.mode = GridMode::Exited;
      grid
    },
  }
}

fn navigate<H: GridHost>(mut grid: Grid, key: GridKey, rows: usize, host: &mut H) -> Grid {
  let last_row = rows.saturating_sub(1);
  match key {
    GridKey::Up | GridKey::Char('k') => grid.cursor_row = grid.cursor_row.saturating_sub(1),
    GridKey::Down | GridKey::Char('j') if grid.cursor_row < last_row => grid.cursor_row += 1,
    GridKey::Left | GridKey::Char('h') => grid.cursor_col = grid.cursor_col.saturating_sub(1),
    GridKey::Right | GridKey::Char('l') if grid.cursor_col + 1 < COLUMNS.len() => {
      grid.cursor_col += 1
    },
    GridKey::PageUp => grid.cursor_row = grid.cursor_row.saturating_sub(grid.visible_rows),
    GridKey::PageDown => grid.cursor_row = (grid.cursor_row + grid.visible_rows).min(last_row),
    GridKey::Home => grid.cursor_row = 0,
    GridKey::End => grid.cursor_row = last_row,
    GridKey::Enter => return begin_edit(grid, host.store()),
    GridKey::Char('s') => match host.save() {
      Ok(message) => grid.notice = Some(Notice::info(message)),
      Err(err) => {
        log::warn!("grid save failed: {err}");
        grid.notice = Some(Notice::error(format!("Error: {err}")));
      },
    },
    GridKey::Char('q') => {
      grid.mode = if host.store().is_modified() {
        GridMode::ConfirmQuit
      } else {
        GridMode::Exited
      };
    },
    _ => {},
  }

  grid.scroll_rows(rows);
  grid.scroll_columns();
  grid
}

fn current_cell(grid: &Grid, store: &LevelStore) -> Option<(i64, String)> {
  let (level, config) = store.levels().nth(grid.cursor_row)?;
  Some((level, grid.column().cell(level, config)))
}

fn begin_edit(mut grid: Grid, store: &LevelStore) -> Grid {
  if !grid.column().is_editable() {
    return grid;
  }
  if let Some((_, value)) = current_cell(&grid, store) {
    grid.mode = GridMode::Editing { buffer: value };
  }
  grid
}

fn edit<H: GridHost>(mut grid: Grid, mut buffer: String, key: GridKey, host: &mut H) -> Grid {
  match key {
    GridKey::Escape => return grid,
    GridKey::Backspace => {
      buffer.pop();
    },
    GridKey::Char(ch) if !ch.is_control() => buffer.push(ch),
    GridKey::Enter => {
      let level = host.store().levels().nth(grid.cursor_row).map(|(level, _)| level);
      if let (Some(level), Some(field)) = (level, grid.column().field()) {
        match host.store_mut().set_field(level, field, &buffer) {
          Ok(()) => {
            grid.notice = Some(Notice::info(format!("Updated level {level} {field}")));
            return grid;
          },
          Err(err) => grid.notice = Some(Notice::error(err.to_string())),
        }
      }
    },
    _ => {},
  }

  grid.mode = GridMode::Editing { buffer };
  grid
}

fn confirm_quit<H: GridHost>(mut grid: Grid, key: GridKey, host: &mut H) -> Grid {
  match key {
    GridKey::Char('y' | 'Y') => match host.save() {
      Ok(message) => {
        grid.notice = Some(Notice::info(message));
        grid.mode = GridMode::Exited;
      },
      Err(err) => grid.notice = Some(Notice::error(format!("Error: {err}"))),
    },
    GridKey::Char('n' | 'N') => grid.mode = GridMode::Exited,
    GridKey::Escape => {},
    _ => grid.mode = GridMode::ConfirmQuit,
  }
  grid
}
