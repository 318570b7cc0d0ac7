//! Terminal front end for editing level configuration files.
//!
//! Starts by loading the default level file. When that works the grid opens
//! first; leaving it drops into the line console.

mod config;
mod console;
mod input;
mod logging;
mod render;
mod spreadsheet;
mod terminal;

use std::{
  io,
  path::PathBuf,
};

use clap::{
  ArgAction,
  Parser,
};
use eyre::Result;
use level_lib::{
  LevelStore,
  Session,
};

use crate::{
  config::Config,
  console::{
    Console,
    Frontend,
    Stdin,
  },
};

#[derive(Debug, Parser)]
#[command(name = "level-editor")]
#[command(about = "Edit level configuration files in a console or a spreadsheet grid")]
struct Cli {
  /// Increase logging verbosity (repeat for more detail)
  #[arg(short = 'v', action = ArgAction::Count)]
  verbosity: u8,

  /// Save logs to a specific file
  #[arg(long = "log", value_name = "FILE")]
  log_file: Option<PathBuf>,

  /// Load configuration from a specific file
  #[arg(short = 'c', long = "config", value_name = "FILE")]
  config_file: Option<PathBuf>,

  /// Start in the console even when the level file loads
  #[arg(long)]
  no_grid: bool,

  /// Level file to load on start
  file: Option<PathBuf>,
}

struct TerminalFrontend;

impl Frontend for TerminalFrontend {
  fn run_grid(&mut self, session: &mut Session) -> Result<()> {
    if let Some(notice) = spreadsheet::run(session)? {
      println!("{notice}");
    }
    Ok(())
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let log_file = cli.log_file.clone().unwrap_or_else(logging::default_log_file);
  logging::setup(cli.verbosity, &log_file)?;

  let config = Config::load(cli.config_file.as_deref())?;
  let level_file = cli.file.clone().unwrap_or_else(|| config.level_file());

  let mut session = Session::new(LevelStore::with_identifier(config.identifier.as_str()));
  let mut frontend = TerminalFrontend;

  println!("Attempting to load: {}", level_file.display());
  match session.load_file(&level_file) {
    Ok(count) => {
      println!("Loaded {count} levels.");
      if config.start_in_grid && !cli.no_grid {
        println!("Launching spreadsheet mode... (use 'q' to quit to console mode)");
        if let Err(err) = frontend.run_grid(&mut session) {
          log::warn!("spreadsheet mode failed: {err}");
          println!("Error: {err}");
        }
      }
    },
    Err(err) => {
      log::warn!("initial load failed: {err}");
      println!("Error: {err}");
      println!("You can still use the editor to create new levels.");
    },
  }

  let mut console = Console {
    source:    Stdin,
    out:       io::stdout(),
    page_size: config.page_size,
    frontend:  &mut frontend,
  };
  console.run(&mut session)
}
