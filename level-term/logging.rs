use std::path::{
  Path,
  PathBuf,
};

use eyre::{
  Context,
  Result,
};
use log::LevelFilter;

pub fn default_log_file() -> PathBuf {
  std::env::temp_dir().join("level-editor.log")
}

pub fn level_for(verbosity: u8) -> LevelFilter {
  match verbosity {
    0 => LevelFilter::Warn,
    1 => LevelFilter::Info,
    2 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  }
}

/// Routes `log` records to `file`. The terminal belongs to the UI, so
/// nothing is written to stdout or stderr.
pub fn setup(verbosity: u8, file: &Path) -> Result<()> {
  let log_file =
    fern::log_file(file).wrap_err_with(|| format!("failed to open log file {}", file.display()))?;

  fern::Dispatch::new()
    .format(|out, message, record| {
      out.finish(format_args!(
        "{} {} [{}] {}",
        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
        record.target(),
        record.level(),
        message
      ))
    })
    .level(level_for(verbosity))
    .chain(log_file)
    .apply()
    .context("logger already installed")?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn verbosity_raises_level() {
    assert_eq!(level_for(0), LevelFilter::Warn);
    assert_eq!(level_for(1), LevelFilter::Info);
    assert_eq!(level_for(2), LevelFilter::Debug);
    assert_eq!(level_for(9), LevelFilter::Trace);
  }
}
