//! Editable level fields.
//!
//! Every field a user can address (by name on the command line or by column
//! in the grid) is one variant of [`Field`]. Each variant is bound to its
//! accessor and mutator here, so callers never look fields up by string at
//! runtime beyond [`Field::from_name`].

use std::fmt;

use thiserror::Error;

use crate::model::{
  LevelConfig,
  join_enemy_types,
};

/// The declared type a raw edit value is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  Int,
  Float,
  Text,
  IntList,
}

impl FieldKind {
  pub fn describe(self) -> &'static str {
    match self {
      Self::Int => "an integer",
      Self::Float => "a number",
      Self::Text => "text",
      Self::IntList => "a comma-separated list of integers",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("unknown field '{}' (available fields: {})", .0, field_names())]
  UnknownField(String),
  #[error("invalid value '{}' for field '{}': expected {}", .value, .field, .kind.describe())]
  InvalidValue {
    field: &'static str,
    value: String,
    kind:  FieldKind,
  },
}

pub type Result<T> = std::result::Result<T, ValidationError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
  Name,
  EnemyTypes,
  MaxEnemies,
  SpawnTimeWindow,
  CollisionSeparation,
  WrapBuffer,
  SpeedMultiplier,
  EccentricityMultiplier,
  ScoreBonus,
}

pub struct FieldSpec {
  pub field:   Field,
  /// Name used in the source file.
  pub key:     &'static str,
  /// Short name accepted by `edit` and listed in help.
  pub short:   &'static str,
  pub kind:    FieldKind,
  pub summary: &'static str,
}

pub const FIELDS: &[FieldSpec] = &[
  FieldSpec {
    field:   Field::Name,
    key:     "name",
    short:   "name",
    kind:    FieldKind::Text,
    summary: "Level name (string)",
  },
  FieldSpec {
    field:   Field::EnemyTypes,
    key:     "allowedEnemyTypes",
    short:   "enemyTypes",
    kind:    FieldKind::IntList,
    summary: "Allowed enemy types (comma-separated: 1,2,3)",
  },
  FieldSpec {
    field:   Field::MaxEnemies,
    key:     "maxEnemies",
    short:   "maxEnemies",
    kind:    FieldKind::Int,
    summary: "Maximum enemies in level (integer)",
  },
  FieldSpec {
    field:   Field::SpawnTimeWindow,
    key:     "spawnTimeWindow",
    short:   "spawnTime",
    kind:    FieldKind::Float,
    summary: "Time window to spawn enemies (float seconds)",
  },
  FieldSpec {
    field:   Field::CollisionSeparation,
    key:     "collisionSeparation",
    short:   "collisionSep",
    kind:    FieldKind::Float,
    summary: "Collision separation force (float)",
  },
  FieldSpec {
    field:   Field::WrapBuffer,
    key:     "wrapBuffer",
    short:   "wrapBuffer",
    kind:    FieldKind::Int,
    summary: "Wrap buffer distance (integer)",
  },
  FieldSpec {
    field:   Field::SpeedMultiplier,
    key:     "speedMultiplier",
    short:   "speedMult",
    kind:    FieldKind::Float,
    summary: "Speed multiplier (float)",
  },
  FieldSpec {
    field:   Field::EccentricityMultiplier,
    key:     "eccentricityMultiplier",
    short:   "eccentricity",
    kind:    FieldKind::Float,
    summary: "Eccentricity multiplier (float)",
  },
  FieldSpec {
    field:   Field::ScoreBonus,
    key:     "scoreBonus",
    short:   "scoreBonus",
    kind:    FieldKind::Int,
    summary: "Score bonus (integer)",
  },
];

fn field_names() -> String {
  FIELDS
    .iter()
    .map(|spec| spec.short)
    .collect::<Vec<_>>()
    .join(", ")
}

impl Field {
  pub const ALL: [Field; 9] = [
    Field::Name,
    Field::EnemyTypes,
    Field::MaxEnemies,
    Field::SpawnTimeWindow,
    Field::CollisionSeparation,
    Field::WrapBuffer,
    Field::SpeedMultiplier,
    Field::EccentricityMultiplier,
    Field::ScoreBonus,
  ];

  /// Resolves a field by its file key or its short alias. Matching is exact.
  pub fn from_name(name: &str) -> Result<Self> {
    FIELDS
      .iter()
      .find(|spec| spec.key == name || spec.short == name)
      .map(|spec| spec.field)
      .ok_or_else(|| ValidationError::UnknownField(name.to_string()))
  }

  pub fn spec(self) -> &'static FieldSpec {
    // FIELDS is laid out in declaration order.
    &FIELDS[self as usize]
  }

  pub fn key(self) -> &'static str {
    self.spec().key
  }

  pub fn kind(self) -> FieldKind {
    self.spec().kind
  }

  /// The value as the user edits it: plain numbers, comma-joined lists.
  pub fn display(self, level: &LevelConfig) -> String {
    let global = &level.global;
    match self {
      Field::Name => level.name.clone(),
      Field::EnemyTypes => join_enemy_types(&level.allowed_enemy_types),
      Field::MaxEnemies => global.max_enemies.to_string(),
      Field::SpawnTimeWindow => format_float(global.spawn_time_window),
      Field::CollisionSeparation => format_float(global.collision_separation),
      Field::WrapBuffer => global.wrap_buffer.to_string(),
      Field::SpeedMultiplier => format_float(global.speed_multiplier),
      Field::EccentricityMultiplier => format_float(global.eccentricity_multiplier),
      Field::ScoreBonus => global.score_bonus.to_string(),
    }
  }

  /// Coerces `raw` to this field's kind and stores it. On error the level is
  /// left as it was.
  pub fn assign(self, level: &mut LevelConfig, raw: &str) -> Result<()> {
    let global = &mut level.global;
    match self {
      Field::Name => level.name = raw.to_string(),
      Field::EnemyTypes => level.allowed_enemy_types = self.coerce_list(raw)?,
      Field::MaxEnemies => global.max_enemies = self.coerce_int(raw)?,
      Field::SpawnTimeWindow => global.spawn_time_window = self.coerce_float(raw)?,
      Field::CollisionSeparation => global.collision_separation = self.coerce_float(raw)?,
      Field::WrapBuffer => global.wrap_buffer = self.coerce_int(raw)?,
      Field::SpeedMultiplier => global.speed_multiplier = self.coerce_float(raw)?,
      Field::EccentricityMultiplier => global.eccentricity_multiplier = self.coerce_float(raw)?,
      Field::ScoreBonus => global.score_bonus = self.coerce_int(raw)?,
    }
    Ok(())
  }

  fn invalid(self, raw: &str) -> ValidationError {
    ValidationError::InvalidValue {
      field: self.key(),
      value: raw.to_string(),
      kind:  self.kind(),
    }
  }

  fn coerce_int(self, raw: &str) -> Result<i64> {
    raw.trim().parse().map_err(|_| self.invalid(raw))
  }

  fn coerce_float(self, raw: &str) -> Result<f64> {
    raw
      .trim()
      .parse::<f64>()
      .ok()
      .filter(|value| value.is_finite())
      .ok_or_else(|| self.invalid(raw))
  }

  fn coerce_list(self, raw: &str) -> Result<Vec<i64>> {
    let trimmed = raw.trim();
    let inner = trimmed
      .strip_prefix('[')
      .and_then(|rest| rest.strip_suffix(']'))
      .unwrap_or(trimmed);

    inner
      .split(',')
      .map(str::trim)
      .filter(|element| !element.is_empty())
      .map(|element| element.parse().map_err(|_| self.invalid(raw)))
      .collect()
  }
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.key())
  }
}

/// Shortest decimal form that parses back to the same value, keeping a `.0`
/// on integral values so floats stay recognizable in the file.
pub fn format_float(value: f64) -> String {
  if value.is_finite() && value.fract() == 0.0 {
    format!("{value:.1}")
  } else {
    value.to_string()
  }
}
