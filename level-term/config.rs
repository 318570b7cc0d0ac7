//! Editor settings read from `level-editor.toml`.

use std::{
  fs,
  io,
  path::{
    Path,
    PathBuf,
  },
};

use eyre::{
  Context,
  Result,
};
use level_lib::{
  notation::DEFAULT_IDENTIFIER,
  table::DEFAULT_PAGE_SIZE,
};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "level-editor.toml";
pub const DEFAULT_LEVEL_FILE: &str = "level_config.js";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
  /// File loaded on start. Defaults to `level_config.js` next to the binary.
  pub default_file:  Option<PathBuf>,
  pub identifier:    String,
  pub page_size:     usize,
  pub start_in_grid: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      default_file:  None,
      identifier:    DEFAULT_IDENTIFIER.to_string(),
      page_size:     DEFAULT_PAGE_SIZE,
      start_in_grid: true,
    }
  }
}

impl Config {
  pub fn parse(text: &str) -> Result<Self> {
    toml::from_str(text).context("invalid configuration")
  }

  /// Reads `explicit` when given (it must exist), otherwise `level-editor.toml`
  /// in the working directory when present, otherwise the defaults.
  pub fn load(explicit: Option<&Path>) -> Result<Self> {
    let (path, required) = match explicit {
      Some(path) => (path, true),
      None => (Path::new(CONFIG_FILE), false),
    };

    let text = match fs::read_to_string(path) {
      Ok(text) => text,
      Err(err) if !required && err.kind() == io::ErrorKind::NotFound => {
        return Ok(Self::default());
      },
      Err(err) => {
        return Err(err).wrap_err_with(|| format!("failed to read {}", path.display()));
      },
    };

    let config =
      Self::parse(&text).wrap_err_with(|| format!("failed to load {}", path.display()))?;
    log::info!("loaded configuration from {}", path.display());
    Ok(config)
  }

  /// The file to auto-load: the configured one, or `level_config.js` in the
  /// executable's directory.
  pub fn level_file(&self) -> PathBuf {
    if let Some(path) = &self.default_file {
      return path.clone();
    }
    std::env::current_exe()
      .ok()
      .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_LEVEL_FILE)))
      .unwrap_or_else(|| PathBuf::from(DEFAULT_LEVEL_FILE))
  }
}

#[cfg(test)]
mod tests {
  use tempfile::tempdir;

  use super::*;

  #[test]
  fn empty_file_gives_defaults() {
    assert_eq!(Config::parse("").unwrap(), Config::default());
  }

  #[test]
  fn keys_are_kebab_case() {
    let config = Config::parse(
      r#"
default-file = "levels/stage.js"
identifier = "stageConfigs"
page-size = 5
start-in-grid = false
"#,
    )
    .unwrap();
    assert_eq!(config.default_file, Some(PathBuf::from("levels/stage.js")));
    assert_eq!(config.identifier, "stageConfigs");
    assert_eq!(config.page_size, 5);
    assert!(!config.start_in_grid);
    assert_eq!(config.level_file(), PathBuf::from("levels/stage.js"));
  }

  #[test]
  fn unknown_keys_are_rejected() {
    assert!(Config::parse("page_size = 5").is_err());
    assert!(Config::parse("colour = true").is_err());
  }

  #[test]
  fn explicit_file_must_exist() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("none.toml");
    assert!(Config::load(Some(missing.as_path())).is_err());

    let present = dir.path().join("editor.toml");
    fs::write(&present, "page-size = 3\n").unwrap();
    assert_eq!(Config::load(Some(present.as_path())).unwrap().page_size, 3);
  }

  #[test]
  fn default_level_file_sits_next_to_binary() {
    let file = Config::default().level_file();
    assert_eq!(file.file_name().unwrap(), DEFAULT_LEVEL_FILE);
  }
}
