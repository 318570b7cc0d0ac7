//! The line-command console.

use std::io::{
  self,
  BufRead,
  IsTerminal,
  Write,
};

use crossterm::{
  event::{
    self,
    Event,
    KeyCode,
    KeyEventKind,
    KeyModifiers,
  },
  terminal::{
    disable_raw_mode,
    enable_raw_mode,
  },
};
use eyre::Result;
use level_lib::{
  Session,
  command::{
    Action,
    Command,
    execute,
  },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
  Text(String),
  /// Ctrl-C while reading.
  Interrupted,
  Eof,
}

pub trait LineSource {
  fn read_line(&mut self, prompt: &str) -> Result<Line>;
}

/// Reads from stdin. On a terminal the line is edited in raw mode so Ctrl-C
/// can be reported instead of killing the process.
pub struct Stdin;

impl LineSource for Stdin {
  fn read_line(&mut self, prompt: &str) -> Result<Line> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    if !io::stdin().is_terminal() {
      let mut line = String::new();
      if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(Line::Eof);
      }
      return Ok(Line::Text(line.trim_end_matches(['\r', '\n']).to_string()));
    }

    enable_raw_mode()?;
    let line = read_raw_line(&mut stdout);
    disable_raw_mode()?;
    write!(stdout, "\r\n")?;
    stdout.flush()?;
    line
  }
}

fn read_raw_line(stdout: &mut io::Stdout) -> Result<Line> {
  let mut line = String::new();
  loop {
    let Event::Key(key) = event::read()? else {
      continue;
    };
    if key.kind == KeyEventKind::Release {
      continue;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
      match key.code {
        KeyCode::Char('c') => return Ok(Line::Interrupted),
        KeyCode::Char('d') if line.is_empty() => return Ok(Line::Eof),
        _ => continue,
      }
    }
    match key.code {
      KeyCode::Enter => return Ok(Line::Text(line)),
      KeyCode::Backspace => {
        if line.pop().is_some() {
          write!(stdout, "\u{8} \u{8}")?;
        }
      },
      KeyCode::Char(ch) => {
        line.push(ch);
        write!(stdout, "{ch}")?;
      },
      _ => {},
    }
    stdout.flush()?;
  }
}

pub fn prompt(session: &Session) -> &'static str {
  if session.store().is_modified() {
    "[MODIFIED] > "
  } else {
    "> "
  }
}

/// Hooks the console calls out to; the grid needs the real terminal.
pub trait Frontend {
  fn run_grid(&mut self, session: &mut Session) -> Result<()>;
}

pub struct Console<'a, S, W> {
  pub source:    S,
  pub out:       W,
  pub page_size: usize,
  pub frontend:  &'a mut dyn Frontend,
}

impl<S: LineSource, W: Write> Console<'_, S, W> {
  pub fn run(&mut self, session: &mut Session) -> Result<()> {
    writeln!(self.out, "Level Configuration Editor")?;
    writeln!(self.out, "Type 'help' for available commands")?;

    loop {
      let line = match self.source.read_line(prompt(session))? {
        Line::Text(line) => line,
        Line::Interrupted => {
          writeln!(self.out, "\nUse 'quit' to exit")?;
          continue;
        },
        Line::Eof => break,
      };

      let command = match Command::parse(&line) {
        Ok(Some(command)) => command,
        Ok(None) => continue,
        Err(err) => {
          writeln!(self.out, "{err}")?;
          continue;
        },
      };

      let outcome = execute(command, session, self.page_size);
      if !outcome.output.is_empty() {
        writeln!(self.out, "{}", outcome.output)?;
      }
      match outcome.action {
        Action::Continue => {},
        Action::EnterGrid => {
          if let Err(err) = self.frontend.run_grid(session) {
            log::warn!("spreadsheet mode failed: {err}");
            writeln!(self.out, "Error: {err}")?;
          }
          writeln!(self.out, "Returned from spreadsheet mode.")?;
        },
        Action::Quit => {
          if self.confirm_quit(session)? {
            break;
          }
        },
      }
    }
    Ok(())
  }

  /// Offers to save unsaved changes. Returns false when a requested save
  /// failed, so the console keeps running.
  fn confirm_quit(&mut self, session: &mut Session) -> Result<bool> {
    if !session.store().is_modified() {
      return Ok(true);
    }

    let answer = match self
      .source
      .read_line("You have unsaved changes. Save before quitting? (y/n): ")?
    {
      Line::Text(answer) => answer,
      Line::Interrupted => return Ok(false),
      Line::Eof => return Ok(true),
    };
    if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
      return Ok(true);
    }

    let line = match session.path() {
      Some(_) => "save".to_string(),
      None => match self.source.read_line("Enter filename to save: ")? {
        Line::Text(name) if !name.trim().is_empty() => format!("save {}", name.trim()),
        _ => "save".to_string(),
      },
    };
    let Ok(Some(command)) = Command::parse(&line) else {
      return Ok(false);
    };
    let outcome = execute(command, session, self.page_size);
    writeln!(self.out, "{}", outcome.output)?;
    Ok(!session.store().is_modified())
  }
}

#[cfg(test)]
mod tests {
  use std::{
    collections::VecDeque,
    fs,
  };

  use tempfile::tempdir;

  use super::*;

  struct Script {
    lines:   VecDeque<Line>,
    prompts: Vec<String>,
  }

  impl Script {
    fn new(lines: &[&str]) -> Self {
      Self {
        lines:   lines.iter().map(|line| Line::Text(line.to_string())).collect(),
        prompts: Vec::new(),
      }
    }
  }

  impl LineSource for Script {
    fn read_line(&mut self, prompt: &str) -> Result<Line> {
      self.prompts.push(prompt.to_string());
      Ok(self.lines.pop_front().unwrap_or(Line::Eof))
    }
  }

  #[derive(Default)]
  struct CountingFrontend {
    grids: usize,
  }

  impl Frontend for CountingFrontend {
    fn run_grid(&mut self, _session: &mut Session) -> Result<()> {
      self.grids += 1;
      Ok(())
    }
  }

  struct BrokenFrontend;

  impl Frontend for BrokenFrontend {
    fn run_grid(&mut self, _session: &mut Session) -> Result<()> {
      Err(eyre::eyre!("not a terminal"))
    }
  }

  #[test]
  fn grid_failure_returns_to_console() {
    let mut session = Session::default();
    let mut frontend = BrokenFrontend;
    let mut console = Console {
      source:    Script::new(&["add 1", "grid", "list", "quit", "n"]),
      out:       Vec::new(),
      page_size: 20,
      frontend:  &mut frontend,
    };
    console.run(&mut session).unwrap();

    let output = String::from_utf8(console.out).unwrap();
    assert!(output.contains("Error: not a terminal"));
    assert!(output.contains("Available levels: 1"));
    assert!(console.source.prompts.iter().any(|prompt| prompt.contains("Save before quitting")));
    assert!(session.store().contains(1));
  }

  fn run(session: &mut Session, lines: &[&str]) -> (String, Vec<String>, usize) {
    let mut frontend = CountingFrontend::default();
    let mut console = Console {
      source:    Script::new(lines),
      out:       Vec::new(),
      page_size: 20,
      frontend:  &mut frontend,
    };
    console.run(session).unwrap();
    let output = String::from_utf8(console.out).unwrap();
    let prompts = console.source.prompts;
    (output, prompts, frontend.grids)
  }

  #[test]
  fn prompt_tracks_modified_flag() {
    let mut session = Session::default();
    let (_, prompts, _) = run(&mut session, &["add 1", "list"]);
    assert_eq!(prompts, vec!["> ", "[MODIFIED] > ", "[MODIFIED] > "]);
  }

  #[test]
  fn errors_do_not_stop_the_loop() {
    let mut session = Session::default();
    let (output, ..) = run(&mut session, &["bogus", "add x", "", "delete 4", "add 4"]);
    assert!(output.contains("Unknown command: bogus"));
    assert!(output.contains("invalid level number 'x'"));
    assert!(output.contains("Error: level 4 does not exist"));
    assert!(output.contains("Added new level 4"));
  }

  #[test]
  fn grid_command_hands_over_to_frontend() {
    let mut session = Session::default();
    let (output, _, grids) = run(&mut session, &["grid", "add 1", "spreadsheet"]);
    assert_eq!(grids, 1);
    assert!(output.contains("No levels loaded. Load a file first."));
    assert!(output.contains("Returned from spreadsheet mode."));
  }

  #[test]
  fn quit_when_clean_needs_no_answer() {
    let mut session = Session::default();
    let (_, prompts, _) = run(&mut session, &["quit", "add 1"]);
    assert_eq!(prompts.len(), 1);
    assert!(session.store().is_empty());
  }

  #[test]
  fn quit_declining_save_discards() {
    let mut session = Session::default();
    let (_, prompts, _) = run(&mut session, &["add 1", "q", "n", "add 2"]);
    assert_eq!(prompts.len(), 3);
    assert!(!session.store().contains(2));
  }

  #[test]
  fn quit_asks_for_filename_without_current_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("saved.js");
    let target = path.display().to_string();

    let mut session = Session::default();
    let (output, prompts, _) = run(&mut session, &["add 7", "exit", "yes", &target]);
    assert_eq!(prompts[3], "Enter filename to save: ");
    assert!(output.contains("Successfully saved 1 levels"));
    assert!(fs::read_to_string(&path).unwrap().contains("7:"));
    assert!(!session.store().is_modified());
  }

  #[test]
  fn failed_quit_save_keeps_console_open() {
    let mut session = Session::default();
    let (output, prompts, _) = run(&mut session, &["add 1", "quit", "y", "", "list"]);
    assert!(output.contains("Error: no filename specified"));
    assert!(output.contains("Available levels: 1"));
    assert_eq!(prompts.len(), 6);
  }
}
