//! The in-memory set of levels being edited.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::{
  field::{
    Field,
    ValidationError,
  },
  model::LevelConfig,
  notation::{
    self,
    DEFAULT_IDENTIFIER,
    FormatError,
  },
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
  #[error("level {0} does not exist")]
  LevelMissing(i64),
  #[error("level {0} already exists")]
  LevelExists(i64),
  #[error("source level {0} does not exist")]
  SourceMissing(i64),
  #[error("destination level {0} already exists")]
  DestinationExists(i64),
  #[error(transparent)]
  Validation(#[from] ValidationError),
  #[error(transparent)]
  Format(#[from] FormatError),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Levels keyed by level number, always iterated in ascending order.
///
/// Every successful mutation marks the store modified; `load` and `save`
/// clear the mark. Failed operations change nothing.
#[derive(Debug, Clone)]
pub struct LevelStore {
  levels:     BTreeMap<i64, LevelConfig>,
  modified:   bool,
  identifier: String,
}

impl Default for LevelStore {
  fn default() -> Self {
    Self::new()
  }
}

impl LevelStore {
  pub fn new() -> Self {
    Self::with_identifier(DEFAULT_IDENTIFIER)
  }

  /// A store reading and writing the object bound to `identifier`.
  pub fn with_identifier(identifier: impl Into<String>) -> Self {
    Self {
      levels:     BTreeMap::new(),
      modified:   false,
      identifier: identifier.into(),
    }
  }

  pub fn identifier(&self) -> &str {
    &self.identifier
  }

  pub fn is_modified(&self) -> bool {
    self.modified
  }

  pub fn len(&self) -> usize {
    self.levels.len()
  }

  pub fn is_empty(&self) -> bool {
    self.levels.is_empty()
  }

  pub fn get(&self, level: i64) -> Option<&LevelConfig> {
    self.levels.get(&level)
  }

  pub fn contains(&self, level: i64) -> bool {
    self.levels.contains_key(&level)
  }

  pub fn levels(&self) -> impl Iterator<Item = (i64, &LevelConfig)> {
    self.levels.iter().map(|(level, config)| (*level, config))
  }

  pub fn level_numbers(&self) -> Vec<i64> {
    self.levels.keys().copied().collect()
  }

  /// Replaces the whole store with the levels parsed from `text`. On error
  /// the current contents are kept.
  pub fn load(&mut self, text: &str) -> Result<usize> {
    let levels = notation::parse(text, &self.identifier)?;
    self.levels = levels;
    self.modified = false;
    Ok(self.levels.len())
  }

  pub fn save(&mut self) -> String {
    let text = self.render();
    self.modified = false;
    text
  }

  /// Serialized form without touching the modified mark.
  pub fn render(&self) -> String {
    notation::serialize(&self.levels, &self.identifier)
  }

  pub fn mark_saved(&mut self) {
    self.modified = false;
  }

  pub fn add(&mut self, level: i64) -> Result<&LevelConfig> {
    if self.levels.contains_key(&level) {
      return Err(StoreError::LevelExists(level));
    }
    log::debug!("adding level {level}");
    self.modified = true;
    Ok(
      &*self
        .levels
        .entry(level)
        .or_insert_with(|| LevelConfig::with_defaults(level)),
    )
  }

  pub fn delete(&mut self, level: i64) -> Result<LevelConfig> {
    let removed = self
      .levels
      .remove(&level)
      .ok_or(StoreError::LevelMissing(level))?;
    log::debug!("deleted level {level}");
    self.modified = true;
    Ok(removed)
  }

  /// Clones `source` into the free slot `dest`, suffixing the name.
  pub fn copy(&mut self, source: i64, dest: i64) -> Result<&LevelConfig> {
    let Some(original) = self.levels.get(&source) else {
      return Err(StoreError::SourceMissing(source));
    };
    if self.levels.contains_key(&dest) {
      return Err(StoreError::DestinationExists(dest));
    }

    let mut copy = original.clone();
    copy.name.push_str(" Copy");
    log::debug!("copied level {source} to {dest}");
    self.modified = true;
    Ok(&*self.levels.entry(dest).or_insert(copy))
  }

  /// Sets a field addressed by name or alias.
  pub fn set(&mut self, level: i64, field: &str, value: &str) -> Result<()> {
    if !self.levels.contains_key(&level) {
      return Err(StoreError::LevelMissing(level));
    }
    let field = Field::from_name(field)?;
    self.set_field(level, field, value)
  }

  pub fn set_field(&mut self, level: i64, field: Field, value: &str) -> Result<()> {
    let config = self
      .levels
      .get_mut(&level)
      .ok_or(StoreError::LevelMissing(level))?;
    field.assign(config, value)?;
    log::debug!("level {level}: {field} = {value:?}");
    self.modified = true;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    field::FieldKind,
    model::GlobalConfig,
  };

  fn store_with(levels: &[i64]) -> LevelStore {
    let mut store = LevelStore::new();
    for level in levels {
      store.add(*level).unwrap();
    }
    store.mark_saved();
    store
  }

  #[test]
  fn add_inserts_defaults_and_marks_modified() {
    let mut store = LevelStore::new();
    store.add(7).unwrap();
    assert!(store.is_modified());

    let level = store.get(7).unwrap();
    assert_eq!(level.name, "7 New");
    assert_eq!(level.allowed_enemy_types, vec![1, 2]);
    assert_eq!(level.global, GlobalConfig::default());
    assert_eq!(level.global.max_enemies, 30);
    assert_eq!(level.global.spawn_time_window, 45.0);
  }

  #[test]
  fn add_existing_fails() {
    let mut store = store_with(&[1]);
    assert_eq!(store.add(1).unwrap_err(), StoreError::LevelExists(1));
    assert!(!store.is_modified());
  }

  #[test]
  fn iteration_is_ascending() {
    let store = store_with(&[10, -2, 3]);
    assert_eq!(store.level_numbers(), vec![-2, 3, 10]);
    let keys: Vec<_> = store.levels().map(|(level, _)| level).collect();
    assert_eq!(keys, vec![-2, 3, 10]);
  }

  #[test]
  fn delete_absent_changes_nothing() {
    let mut store = store_with(&[1, 2]);
    assert_eq!(store.delete(5).unwrap_err(), StoreError::LevelMissing(5));
    assert_eq!(store.len(), 2);
    assert!(!store.is_modified());

    store.delete(1).unwrap();
    assert!(store.is_modified());
    assert!(!store.contains(1));
  }

  #[test]
  fn copy_is_deep() {
    let mut store = store_with(&[1]);
    store.copy(1, 15).unwrap();
    assert!(store.is_modified());
    assert_eq!(store.get(15).unwrap().name, "1 New Copy");

    store.set(15, "enemyTypes", "4,5,6").unwrap();
    store.set(15, "maxEnemies", "99").unwrap();
    assert_eq!(store.get(1).unwrap().allowed_enemy_types, vec![1, 2]);
    assert_eq!(store.get(1).unwrap().global.max_enemies, 30);
    assert_eq!(store.get(15).unwrap().allowed_enemy_types, vec![4, 5, 6]);
  }

  #[test]
  fn copy_checks_both_ends() {
    let mut store = store_with(&[1, 2]);
    assert_eq!(store.copy(3, 4).unwrap_err(), StoreError::SourceMissing(3));
    assert_eq!(store.copy(1, 2).unwrap_err(), StoreError::DestinationExists(2));
    assert!(!store.is_modified());
  }

  #[test]
  fn set_rejects_bad_values_without_change() {
    let mut store = store_with(&[1]);
    let err = store.set(1, "maxEnemies", "abc").unwrap_err();
    assert_eq!(
      err,
      StoreError::Validation(ValidationError::InvalidValue {
        field: "maxEnemies",
        value: "abc".into(),
        kind:  FieldKind::Int,
      })
    );
    assert_eq!(store.get(1).unwrap().global.max_enemies, 30);
    assert!(!store.is_modified());
  }

  #[test]
  fn set_rejects_unknown_field_and_level() {
    let mut store = store_with(&[1]);
    assert!(matches!(
      store.set(1, "bogus", "1"),
      Err(StoreError::Validation(ValidationError::UnknownField(_)))
    ));
    assert_eq!(
      store.set(2, "name", "x").unwrap_err(),
      StoreError::LevelMissing(2)
    );
    assert!(!store.is_modified());
  }

  #[test]
  fn set_through_alias() {
    let mut store = store_with(&[1]);
    store.set(1, "spawnTime", "12.5").unwrap();
    store.set(1, "collisionSeparation", "3").unwrap();
    let global = &store.get(1).unwrap().global;
    assert_eq!(global.spawn_time_window, 12.5);
    assert_eq!(global.collision_separation, 3.0);
    assert!(store.is_modified());
  }

  #[test]
  fn failed_load_keeps_previous_contents() {
    let mut store = store_with(&[1, 2]);
    store.set(1, "name", "Kept").unwrap();

    let err = store.load("const levelConfigs = { 1: { name: 'x' } };").unwrap_err();
    assert!(matches!(err, StoreError::Format(FormatError::MissingKey { .. })));
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(1).unwrap().name, "Kept");
    assert!(store.is_modified());
  }

  #[test]
  fn save_then_load_restores_store() {
    let mut store = store_with(&[3, 1]);
    store.set(3, "scoreBonus", "150").unwrap();
    store.set(1, "speedMult", "1.21").unwrap();

    let text = store.save();
    assert!(!store.is_modified());

    let mut reloaded = LevelStore::new();
    assert_eq!(reloaded.load(&text).unwrap(), 2);
    assert!(!reloaded.is_modified());
    assert_eq!(
      reloaded.levels().collect::<Vec<_>>(),
      store.levels().collect::<Vec<_>>()
    );
  }

  #[test]
  fn custom_identifier() {
    let mut store = LevelStore::with_identifier("stages");
    store.add(1).unwrap();
    let text = store.save();
    assert!(text.contains("const stages = {"));
    assert!(LevelStore::new().load(&text).is_err());
    assert_eq!(LevelStore::with_identifier("stages").load(&text), Ok(1));
  }
}
