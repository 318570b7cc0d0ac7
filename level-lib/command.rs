//! Line commands for the console.
//!
//! # Parsing
//!
//! A line is split once into a verb and the rest ([`split`]). The verb is
//! matched case-insensitively against [`COMMANDS`], each of which declares how
//! many whitespace-separated arguments it takes. `edit` takes its last
//! argument raw: everything after the field name, with one pair of
//! surrounding quotes removed, so names may contain spaces.
//!
//! # Execution
//!
//! [`execute`] runs a parsed [`Command`] against a [`Session`] and returns the
//! text to print together with what the console should do next. Failures are
//! reported in that text; nothing here is fatal.

use std::path::PathBuf;

use thiserror::Error;

use crate::{
  field::FIELDS,
  session::Session,
  table,
};

const SEPARATOR_PATTERN: [char; 2] = [' ', '\t'];

/// Splits a line into the verb and the (untrimmed) rest.
pub fn split(line: &str) -> (&str, &str) {
  let line = line.trim_start();
  line.split_once(SEPARATOR_PATTERN).unwrap_or((line, ""))
}

#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
  pub name:    &'static str,
  pub aliases: &'static [&'static str],
  pub usage:   &'static str,
  pub doc:     &'static str,
}

pub const COMMANDS: &[CommandSpec] = &[
  CommandSpec {
    name:    "load",
    aliases: &[],
    usage:   "load <filename>",
    doc:     "Load level configuration from JavaScript file",
  },
  CommandSpec {
    name:    "save",
    aliases: &[],
    usage:   "save [filename]",
    doc:     "Save configuration (to current file or new file)",
  },
  CommandSpec {
    name:    "view",
    aliases: &["show", "display"],
    usage:   "view [start_level]",
    doc:     "Display spreadsheet view of levels",
  },
  CommandSpec {
    name:    "list",
    aliases: &[],
    usage:   "list",
    doc:     "List all available level numbers",
  },
  CommandSpec {
    name:    "spreadsheet",
    aliases: &["grid", "excel"],
    usage:   "spreadsheet",
    doc:     "Launch interactive spreadsheet mode with arrow keys",
  },
  CommandSpec {
    name:    "edit",
    aliases: &[],
    usage:   "edit <level_num> <field> <value>",
    doc:     "Edit a specific field of a level",
  },
  CommandSpec {
    name:    "add",
    aliases: &[],
    usage:   "add <level_num>",
    doc:     "Add a new level with default values",
  },
  CommandSpec {
    name:    "copy",
    aliases: &[],
    usage:   "copy <source_level> <dest_level>",
    doc:     "Copy a level to a new level number",
  },
  CommandSpec {
    name:    "delete",
    aliases: &["del"],
    usage:   "delete <level_num>",
    doc:     "Delete a level",
  },
  CommandSpec {
    name:    "help",
    aliases: &[],
    usage:   "help",
    doc:     "Show this help",
  },
  CommandSpec {
    name:    "quit",
    aliases: &["exit", "q"],
    usage:   "quit",
    doc:     "Exit the editor",
  },
];

fn lookup(verb: &str) -> Option<&'static CommandSpec> {
  let verb = verb.to_lowercase();
  COMMANDS
    .iter()
    .find(|spec| spec.name == verb || spec.aliases.contains(&verb.as_str()))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
  #[error("Usage: {0}")]
  Usage(&'static str),
  #[error("invalid level number '{0}'")]
  InvalidLevel(String),
  #[error("Unknown command: {0}. Type 'help' for available commands.")]
  Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  Load(PathBuf),
  Save(Option<PathBuf>),
  View(Option<i64>),
  List,
  Grid,
  Edit {
    level: i64,
    field: String,
    value: String,
  },
  Add(i64),
  Copy {
    source: i64,
    dest:   i64,
  },
  Delete(i64),
  Help,
  Quit,
}

impl Command {
  /// Parses one console line. Blank lines yield `None`.
  pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
    let (verb, rest) = split(line.trim_end());
    if verb.is_empty() {
      return Ok(None);
    }
    let spec = lookup(verb).ok_or_else(|| CommandError::Unknown(verb.to_lowercase()))?;
    let usage = || CommandError::Usage(spec.usage);
    let mut args = rest.split_whitespace();

    let command = match spec.name {
      "load" => Command::Load(args.next().ok_or_else(usage)?.into()),
      "save" => Command::Save(args.next().map(PathBuf::from)),
      "view" => Command::View(args.next().map(level_number).transpose()?),
      "list" => Command::List,
      "spreadsheet" => Command::Grid,
      "edit" => {
        let (level, rest) = split(rest);
        let (field, value) = split(rest);
        let value = value.trim();
        if level.is_empty() || field.is_empty() || value.is_empty() {
          return Err(usage());
        }
        Command::Edit {
          level: level_number(level)?,
          field: field.to_string(),
          value: unquote(value).to_string(),
        }
      },
      "add" => Command::Add(level_number(args.next().ok_or_else(usage)?)?),
      "copy" => {
        let (Some(source), Some(dest)) = (args.next(), args.next()) else {
          return Err(usage());
        };
        Command::Copy {
          source: level_number(source)?,
          dest:   level_number(dest)?,
        }
      },
      "delete" => Command::Delete(level_number(args.next().ok_or_else(usage)?)?),
      "help" => Command::Help,
      _ => Command::Quit,
    };
    Ok(Some(command))
  }
}

fn level_number(raw: &str) -> Result<i64, CommandError> {
  raw
    .parse()
    .map_err(|_| CommandError::InvalidLevel(raw.to_string()))
}

/// Removes one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
  for quote in ['"', '\''] {
    if let Some(inner) = value
      .strip_prefix(quote)
      .and_then(|rest| rest.strip_suffix(quote))
    {
      return inner;
    }
  }
  value
}

/// What the console does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Continue,
  EnterGrid,
  Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
  pub output: String,
  pub action: Action,
}

impl Outcome {
  fn print(output: impl Into<String>) -> Self {
    Self {
      output: output.into(),
      action: Action::Continue,
    }
  }

  fn error(err: impl std::fmt::Display) -> Self {
    Self::print(format!("Error: {err}"))
  }
}

pub fn execute(command: Command, session: &mut Session, page_size: usize) -> Outcome {
  log::debug!("executing {command:?}");
  match command {
    Command::Load(path) => match session.load_file(&path) {
      Ok(count) => Outcome::print(format!(
        "Successfully loaded {count} levels from {}",
        path.display()
      )),
      Err(err) => Outcome::error(err),
    },
    Command::Save(path) => match session.save_file(path.as_deref()) {
      Ok((path, count)) => Outcome::print(format!(
        "Successfully saved {count} levels to {}",
        path.display()
      )),
      Err(err) => Outcome::error(err),
    },
    Command::View(start) => Outcome::print(table::render_page(session.store(), start, page_size)),
    Command::List => {
      let store = session.store();
      if store.is_empty() {
        return Outcome::print("No levels loaded");
      }
      let levels: Vec<String> = store
        .level_numbers()
        .iter()
        .map(i64::to_string)
        .collect();
      Outcome::print(format!("Available levels: {}", levels.join(", ")))
    },
    Command::Grid => {
      if session.store().is_empty() {
        Outcome::print("No levels loaded. Load a file first.")
      } else {
        Outcome {
          output: "Launching spreadsheet mode...".into(),
          action: Action::EnterGrid,
        }
      }
    },
    Command::Edit {
      level,
      field,
      value,
    } => match session.store_mut().set(level, &field, &value) {
      Ok(()) => Outcome::print(format!("Updated level {level} {field} to {value}")),
      Err(err) => Outcome::error(err),
    },
    Command::Add(level) => match session.store_mut().add(level) {
      Ok(_) => Outcome::print(format!("Added new level {level}")),
      Err(err) => Outcome::error(err),
    },
    Command::Copy { source, dest } => match session.store_mut().copy(source, dest) {
      Ok(_) => Outcome::print(format!("Copied level {source} to level {dest}")),
      Err(err) => Outcome::error(err),
    },
    Command::Delete(level) => match session.store_mut().delete(level) {
      Ok(_) => Outcome::print(format!("Deleted level {level}")),
      Err(err) => Outcome::error(err),
    },
    Command::Help => Outcome::print(help_text()),
    Command::Quit => Outcome {
      output: String::new(),
      action: Action::Quit,
    },
  }
}

pub fn help_text() -> String {
  let mut out = String::from("Available Commands:\n==================\n\n");
  for spec in COMMANDS {
    let names = std::iter::once(spec.name)
      .chain(spec.aliases.iter().copied())
      .collect::<Vec<_>>()
      .join(", ");
    let usage = if spec.aliases.is_empty() {
      spec.usage.to_string()
    } else {
      spec.usage.replacen(spec.name, &names, 1)
    };
    out.push_str(&format!("  {usage:<34} - {}\n", spec.doc));
  }

  out.push_str("\nAvailable Fields for Editing:\n");
  for field in FIELDS {
    let names = if field.short == field.key {
      field.key.to_string()
    } else {
      format!("{} | {}", field.short, field.key)
    };
    out.push_str(&format!("  {names:<34} - {}\n", field.summary));
  }

  out.push_str(
    "
Examples:
  load level_config.js
  view 5                             - View levels starting from level 5
  edit 1 name \"1 Alpha Advanced\"
  edit 3 maxEnemies 45
  edit 2 enemyTypes 1,2,3,4
  copy 1 15                          - Copy level 1 to level 15
  add 20                             - Add new level 20

Spreadsheet Mode Controls:
  Arrow Keys                         - Navigate between cells
  PageUp/PageDown, Home/End          - Jump by page, to first/last level
  Enter                              - Edit current cell, commit edit
  Esc                                - Cancel editing
  s                                  - Save changes
  q                                  - Quit to console mode
",
  );
  out
}
