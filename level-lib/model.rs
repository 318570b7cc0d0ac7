//! Level records as stored in the level configuration file.

/// Tuning parameters shared by every enemy spawned in a level.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalConfig {
  pub max_enemies:             i64,
  /// Seconds over which all enemies of the level are spawned.
  pub spawn_time_window:       f64,
  pub collision_separation:    f64,
  /// Distance from the top of the screen before enemies wrap around.
  pub wrap_buffer:             i64,
  pub speed_multiplier:        f64,
  pub eccentricity_multiplier: f64,
  pub score_bonus:             i64,
}

impl Default for GlobalConfig {
  fn default() -> Self {
    Self {
      max_enemies:             30,
      spawn_time_window:       45.0,
      collision_separation:    2.0,
      wrap_buffer:             50,
      speed_multiplier:        1.0,
      eccentricity_multiplier: 1.0,
      score_bonus:             0,
    }
  }
}

/// One numbered level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelConfig {
  pub name:                String,
  pub allowed_enemy_types: Vec<i64>,
  pub global:              GlobalConfig,
}

impl LevelConfig {
  /// The record `add` inserts for a fresh level number.
  pub fn with_defaults(level: i64) -> Self {
    Self {
      name:                format!("{level} New"),
      allowed_enemy_types: vec![1, 2],
      global:              GlobalConfig::default(),
    }
  }

  /// Enemy types as shown in tables and seeded into the grid edit buffer.
  pub fn enemy_types_label(&self) -> String {
    join_enemy_types(&self.allowed_enemy_types)
  }
}

pub fn join_enemy_types(types: &[i64]) -> String {
  types
    .iter()
    .map(i64::to_string)
    .collect::<Vec<_>>()
    .join(",")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_follow_level_number() {
    let level = LevelConfig::with_defaults(12);
    assert_eq!(level.name, "12 New");
    assert_eq!(level.allowed_enemy_types, vec![1, 2]);
    assert_eq!(level.global, GlobalConfig {
      max_enemies:             30,
      spawn_time_window:       45.0,
      collision_separation:    2.0,
      wrap_buffer:             50,
      speed_multiplier:        1.0,
      eccentricity_multiplier: 1.0,
      score_bonus:             0,
    });
  }

  #[test]
  fn enemy_types_label_is_comma_joined() {
    let mut level = LevelConfig::with_defaults(1);
    level.allowed_enemy_types = vec![3, 1, 3];
    assert_eq!(level.enemy_types_label(), "3,1,3");
    level.allowed_enemy_types.clear();
    assert_eq!(level.enemy_types_label(), "");
  }
}
