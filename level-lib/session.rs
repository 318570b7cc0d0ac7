//! A level store bound to the file it was loaded from.

use std::{
  fs,
  io::{
    self,
    Write,
  },
  path::{
    Path,
    PathBuf,
  },
};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::store::{
  LevelStore,
  StoreError,
};

#[derive(Debug, Error)]
pub enum SessionError {
  #[error("file {} not found", .0.display())]
  NotFound(PathBuf),
  #[error("error reading file {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },
  #[error("error saving file {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },
  #[error("no filename specified")]
  NoFileName,
  #[error(transparent)]
  Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Default)]
pub struct Session {
  store: LevelStore,
  path:  Option<PathBuf>,
}

impl Session {
  pub fn new(store: LevelStore) -> Self {
    Self { store, path: None }
  }

  pub fn store(&self) -> &LevelStore {
    &self.store
  }

  pub fn store_mut(&mut self) -> &mut LevelStore {
    &mut self.store
  }

  /// The file the last successful load or save used.
  pub fn path(&self) -> Option<&Path> {
    self.path.as_deref()
  }

  /// Loads `path`, replacing the store. Nothing changes on failure.
  pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| {
      if source.kind() == io::ErrorKind::NotFound {
        SessionError::NotFound(path.to_path_buf())
      } else {
        SessionError::Read {
          path: path.to_path_buf(),
          source,
        }
      }
    })?;

    let count = self.store.load(&text)?;
    self.path = Some(path.to_path_buf());
    log::info!("loaded {count} levels from {}", path.display());
    Ok(count)
  }

  /// Writes the store to `path`, or to the current file when `path` is
  /// `None`. The file is replaced as a whole: the text goes to a sibling
  /// temporary file which is then renamed over the target.
  pub fn save_file(&mut self, path: Option<&Path>) -> Result<(PathBuf, usize)> {
    let target = path
      .or(self.path.as_deref())
      .map(Path::to_path_buf)
      .ok_or(SessionError::NoFileName)?;

    let text = self.store.render();
    write_atomic(&target, &text).map_err(|source| SessionError::Write {
      path: target.clone(),
      source,
    })?;

    self.store.mark_saved();
    self.path = Some(target.clone());
    log::info!("saved {} levels to {}", self.store.len(), target.display());
    Ok((target, self.store.len()))
  }
}

fn write_atomic(target: &Path, text: &str) -> io::Result<()> {
  let dir = match target.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };
  let mut file = NamedTempFile::new_in(dir)?;
  file.write_all(text.as_bytes())?;
  file.as_file().sync_all()?;
  file.persist(target).map_err(|err| err.error)?;
  Ok(())
}
