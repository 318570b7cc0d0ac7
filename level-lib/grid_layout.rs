//! What the grid looks like for a given state, independent of any terminal.
//!
//! [`plan`] decides which rows and columns are visible, what text each cell
//! holds (already fitted to its column), which cell is selected and what the
//! status line says. Frontends only paint the result.

use unicode_width::{
  UnicodeWidthChar,
  UnicodeWidthStr,
};

use crate::{
  grid::{
    COLUMNS,
    Grid,
    GridMode,
    Notice,
  },
  store::LevelStore,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanCell {
  pub text:     String,
  pub width:    u16,
  pub selected: bool,
  pub editing:  bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRow {
  pub level:   i64,
  pub current: bool,
  pub cells:   Vec<PlanCell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPlan {
  pub header:   Vec<PlanCell>,
  pub rows:     Vec<PlanRow>,
  pub status:   String,
  pub message:  Option<Notice>,
  pub modified: bool,
}

/// Indices of the columns that fit in `width`, starting at `scroll_left`.
/// The first one is always included.
pub fn visible_columns(scroll_left: usize, width: u16) -> std::ops::Range<usize> {
  let first = scroll_left.min(COLUMNS.len() - 1);
  let mut used = 0usize;
  let mut end = first;
  for column in &COLUMNS[first..] {
    used += column.width as usize + 1;
    if used > width as usize && end > first {
      break;
    }
    end += 1;
  }
  first..end
}

pub fn plan(grid: &Grid, store: &LevelStore) -> GridPlan {
  let columns = visible_columns(grid.scroll_left, grid.visible_width);
  let buffer = grid.edit_buffer();

  let header = COLUMNS[columns.clone()]
    .iter()
    .map(|column| PlanCell {
      text:     fit(column.title, column.width, false),
      width:    column.width,
      selected: false,
      editing:  false,
    })
    .collect();

  let rows = store
    .levels()
    .enumerate()
    .skip(grid.scroll_top)
    .take(grid.visible_rows)
    .map(|(index, (level, config))| {
      let current = index == grid.cursor_row;
      let cells = columns
        .clone()
        .map(|col| {
          let column = &COLUMNS[col];
          let selected = current && col == grid.cursor_col;
          let (text, editing) = match buffer {
            Some(buffer) if selected => (fit(buffer, column.width, true), true),
            _ => (fit(&column.cell(level, config), column.width, false), false),
          };
          PlanCell {
            text,
            width: column.width,
            selected,
            editing,
          }
        })
        .collect();
      PlanRow {
        level,
        current,
        cells,
      }
    })
    .collect();

  let message = match grid.mode {
    GridMode::ConfirmQuit => Some(Notice::info(
      "Unsaved changes. Save before quitting? (y: save, n: discard, Esc: stay)",
    )),
    _ => grid.notice.clone(),
  };

  GridPlan {
    header,
    rows,
    status: status_line(grid, store),
    message,
    modified: store.is_modified(),
  }
}

fn status_line(grid: &Grid, store: &LevelStore) -> String {
  let position = if store.is_empty() {
    "Level 0/0".to_string()
  } else {
    format!("Level {}/{}", grid.cursor_row + 1, store.len())
  };
  let help = match grid.mode {
    GridMode::Editing { .. } => "Enter: commit  Esc: cancel",
    GridMode::ConfirmQuit => "y/n: quit  Esc: back",
    _ => "Arrows: move  Enter: edit  s: save  q: quit",
  };
  format!(
    "{position} | Col: {} | {} | {help}",
    grid.column().title,
    grid.mode.as_str()
  )
}

/// Cuts `text` to at most `width` display cells. With `keep_tail` the end of
/// the text is kept instead of the start, so typing stays visible.
pub fn fit(text: &str, width: u16, keep_tail: bool) -> String {
  let width = width as usize;
  if text.width() <= width {
    return text.to_string();
  }

  let mut used = 0;
  let take = |ch: &char| {
    used += ch.width().unwrap_or(0);
    used <= width
  };
  if keep_tail {
    let mut kept: Vec<char> = text.chars().rev().take_while(take).collect();
    kept.reverse();
    kept.into_iter().collect()
  } else {
    text.chars().take_while(take).collect()
  }
}

impl PlanCell {
  /// The text padded with spaces to exactly the column width.
  pub fn padded(&self) -> String {
    let fill = (self.width as usize).saturating_sub(self.text.width());
    format!("{}{}", self.text, " ".repeat(fill))
  }
}
