//! Bordered text tables for the console `view` command.

use unicode_width::UnicodeWidthStr;

use crate::{
  field::{
    Field,
    FieldKind,
  },
  grid::{
    COLUMNS,
    Column,
  },
  model::LevelConfig,
  store::LevelStore,
};

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Cell text for the summary table. Floats are rounded for reading; the grid
/// and the file keep full precision.
fn summary_cell(column: &Column, level: i64, config: &LevelConfig) -> String {
  let global = &config.global;
  match column.field() {
    Some(Field::SpawnTimeWindow) => format!("{:.1}", global.spawn_time_window),
    Some(Field::CollisionSeparation) => format!("{:.1}", global.collision_separation),
    Some(Field::SpeedMultiplier) => format!("{:.2}", global.speed_multiplier),
    Some(Field::EccentricityMultiplier) => format!("{:.2}", global.eccentricity_multiplier),
    _ => column.cell(level, config),
  }
}

/// Renders up to `page_size` levels starting at `start`, or at the first
/// level when `start` is absent or not a level.
pub fn render_page(store: &LevelStore, start: Option<i64>, page_size: usize) -> String {
  let numbers = store.level_numbers();
  if numbers.is_empty() {
    return "No levels loaded. Use 'load <filename>' to load a configuration file.".into();
  }

  let first = start
    .and_then(|start| numbers.iter().position(|level| *level == start))
    .unwrap_or(0);
  let end = (first + page_size.max(1)).min(numbers.len());
  let shown = &numbers[first..end];

  let rows: Vec<Vec<String>> = store
    .levels()
    .skip(first)
    .take(shown.len())
    .map(|(level, config)| {
      COLUMNS
        .iter()
        .map(|column| summary_cell(column, level, config))
        .collect()
    })
    .collect();

  let mut out = format!(
    "\nLevel Configuration (Showing levels {}-{} of {} total)\n{}\n",
    shown[0],
    shown[shown.len() - 1],
    numbers.len(),
    "=".repeat(120)
  );
  out.push_str(&render(&rows));

  if end < numbers.len() {
    out.push_str(&format!(
      "\n\n... and {} more levels. Use 'view {}' to see more.",
      numbers.len() - end,
      numbers[end]
    ));
  }
  out
}

/// Draws `rows` under the grid column titles, one bordered box per cell.
/// Numeric columns are right-aligned.
pub fn render(rows: &[Vec<String>]) -> String {
  let widths: Vec<usize> = COLUMNS
    .iter()
    .enumerate()
    .map(|(index, column)| {
      rows
        .iter()
        .map(|row| row[index].width())
        .chain([column.title.width()])
        .max()
        .unwrap_or(0)
    })
    .collect();

  let rule = |fill: char| {
    let mut line = String::from("+");
    for width in &widths {
      line.push_str(&fill.to_string().repeat(width + 2));
      line.push('+');
    }
    line
  };
  let mut lines = vec![
    rule('-'),
    line(COLUMNS.iter().map(|column| column.title), &widths, false),
    rule('='),
  ];
  for row in rows {
    lines.push(line(row.iter().map(String::as_str), &widths, true));
    lines.push(rule('-'));
  }
  if rows.is_empty() {
    lines.pop();
    lines.push(rule('-'));
  }
  lines.join("\n")
}

fn line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize], align_numbers: bool) -> String {
  let mut line = String::from("|");
  for ((cell, width), column) in cells.zip(widths).zip(COLUMNS) {
    let pad = " ".repeat(width.saturating_sub(cell.width()));
    let numeric = align_numbers && matches!(column.kind(), FieldKind::Int | FieldKind::Float);
    if numeric {
      line.push_str(&format!(" {pad}{cell} |"));
    } else {
      line.push_str(&format!(" {cell}{pad} |"));
    }
  }
  line
}
