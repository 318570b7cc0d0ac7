//! Conversion between the level configuration file and [`LevelConfig`]s.
//!
//! The file is a JavaScript module holding one object literal:
//!
//! ```text
//! const levelConfigs = {
//!     1: { name: '1 Alfa', allowedEnemyTypes: [1,2], global: { ... } },
//! };
//! ```
//!
//! # Parsing Pipeline
//!
//! Reading proceeds in named stages, each a plain `&str -> String` function
//! that can be exercised on its own:
//!
//! 1. [`locate`]: find the literal bound to the expected identifier.
//! 2. [`strip_comments`]: drop `//` line and `/* */` block comments.
//! 3. [`normalize_quotes`]: single-quoted strings become double-quoted and
//!    bare keys get quoted.
//! 4. [`normalize_numbers`]: `.5` becomes `0.5`.
//! 5. [`strip_trailing_commas`]: `[1, 2,]` becomes `[1, 2]`.
//! 6. [`decode`]: strict JSON decoding.
//! 7. [`build`]: typed extraction into level records.
//!
//! All rewriting stages share one scanner that splits the text into code,
//! quoted strings and comments, so a rewrite never reaches inside a string.
//!
//! Writing ([`serialize`]) always produces the canonical layout: comments and
//! the original formatting are never carried over.

use std::{
  collections::BTreeMap,
  fmt,
  ops::Range,
  sync::LazyLock,
};

use regex::Regex;
use serde_json::{
  Map,
  Value,
};
use thiserror::Error;

use crate::{
  field::format_float,
  model::{
    GlobalConfig,
    LevelConfig,
  },
};

pub const DEFAULT_IDENTIFIER: &str = "levelConfigs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  Locate,
  StripComments,
  NormalizeQuotes,
  NormalizeNumbers,
  StripTrailingCommas,
  Decode,
  Build,
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Locate => "locate",
      Self::StripComments => "strip-comments",
      Self::NormalizeQuotes => "normalize-quotes",
      Self::NormalizeNumbers => "normalize-numeric-literals",
      Self::StripTrailingCommas => "strip-trailing-commas",
      Self::Decode => "strict-decode",
      Self::Build => "build",
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
  #[error("could not find {identifier} object")]
  ObjectNotFound { identifier: String },
  #[error("{stage}: unterminated string literal at byte {offset}")]
  UnterminatedString { stage: Stage, offset: usize },
  #[error("invalid object literal at line {line} column {column}: {message}")]
  Decode {
    line:    usize,
    column:  usize,
    message: String,
  },
  #[error("top-level value is not an object")]
  NotAnObject,
  #[error("level key '{0}' is not a number")]
  InvalidLevelNumber(String),
  #[error("level {0} is defined more than once")]
  DuplicateLevel(i64),
  #[error("level {level}: missing required key '{key}'")]
  MissingKey { level: i64, key: &'static str },
  #[error("level {level}: '{key}' must be {expected}")]
  InvalidValue {
    level:    i64,
    key:      &'static str,
    expected: &'static str,
  },
}

impl FormatError {
  /// The pipeline stage that rejected the input.
  pub fn stage(&self) -> Stage {
    match self {
      Self::ObjectNotFound { .. } => Stage::Locate,
      Self::UnterminatedString { stage, .. } => *stage,
      Self::Decode { .. } => Stage::Decode,
      Self::NotAnObject
      | Self::InvalidLevelNumber(_)
      | Self::DuplicateLevel(_)
      | Self::MissingKey { .. }
      | Self::InvalidValue { .. } => Stage::Build,
    }
  }
}

pub type Result<T> = std::result::Result<T, FormatError>;

/// Parses a whole configuration file.
pub fn parse(text: &str, identifier: &str) -> Result<BTreeMap<i64, LevelConfig>> {
  let body = locate(text, identifier)?;
  parse_object(body)
}

/// Parses a bare object literal, without the surrounding declaration.
pub fn parse_object(body: &str) -> Result<BTreeMap<i64, LevelConfig>> {
  let text = strip_comments(body)?;
  let text = normalize_quotes(&text)?;
  let text = normalize_numbers(&text)?;
  let text = strip_trailing_commas(&text)?;
  let levels = build(decode(&text)?)?;
  log::debug!("parsed {} levels", levels.len());
  Ok(levels)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentKind {
  Code,
  Quoted(char),
  Comment,
}

/// A run of source text. Quoted ranges include both quote characters.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
  kind:  SegmentKind,
  range: Range<usize>,
}

fn flush_code(segments: &mut Vec<Segment>, start: usize, end: usize) {
  if start < end {
    segments.push(Segment {
      kind:  SegmentKind::Code,
      range: start..end,
    });
  }
}

fn scan(text: &str, stage: Stage) -> Result<Vec<Segment>> {
  let bytes = text.as_bytes();
  let mut segments = Vec::new();
  let mut code_start = 0;
  let mut pos = 0;

  // Every delimiter is ASCII, so byte offsets always land on char boundaries.
  while pos < bytes.len() {
    match bytes[pos] {
      quote @ (b'"' | b'\'') => {
        flush_code(&mut segments, code_start, pos);
        let start = pos;
        pos += 1;
        loop {
          match bytes.get(pos) {
            None => return Err(FormatError::UnterminatedString { stage, offset: start }),
            Some(b'\\') => pos += 2,
            Some(&byte) if byte == quote => {
              pos += 1;
              break;
            },
            Some(_) => pos += 1,
          }
        }
        let end = pos.min(bytes.len());
        segments.push(Segment {
          kind:  SegmentKind::Quoted(quote as char),
          range: start..end,
        });
        code_start = end;
      },
      b'/' if bytes.get(pos + 1) == Some(&b'/') => {
        flush_code(&mut segments, code_start, pos);
        let start = pos;
        pos = text[start..]
          .find('\n')
          .map_or(bytes.len(), |offset| start + offset);
        segments.push(Segment {
          kind:  SegmentKind::Comment,
          range: start..pos,
        });
        code_start = pos;
      },
      b'/' if bytes.get(pos + 1) == Some(&b'*') => {
        flush_code(&mut segments, code_start, pos);
        let start = pos;
        pos = text[start + 2..]
          .find("*/")
          .map_or(bytes.len(), |offset| start + 2 + offset + 2);
        segments.push(Segment {
          kind:  SegmentKind::Comment,
          range: start..pos,
        });
        code_start = pos;
      },
      _ => pos += 1,
    }
  }
  flush_code(&mut segments, code_start, bytes.len());

  Ok(segments)
}

/// Rebuilds `text`, passing code runs through `rewrite` and keeping strings
/// and comments as they are.
fn rewrite_code(text: &str, stage: Stage, rewrite: impl Fn(&str) -> String) -> Result<String> {
  let mut out = String::with_capacity(text.len());
  for segment in scan(text, stage)? {
    let slice = &text[segment.range];
    match segment.kind {
      SegmentKind::Code => out.push_str(&rewrite(slice)),
      SegmentKind::Quoted(_) | SegmentKind::Comment => out.push_str(slice),
    }
  }
  Ok(out)
}

static DECLARATION: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\b(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*\{").unwrap());

/// Returns the object literal (braces included) bound to `identifier`.
///
/// Declarations inside strings and comments are skipped. The literal ends at
/// the brace matching its opening one; braces inside strings and comments do
/// not count.
pub fn locate<'a>(text: &'a str, identifier: &str) -> Result<&'a str> {
  let not_found = || FormatError::ObjectNotFound {
    identifier: identifier.to_string(),
  };

  let start = scan(text, Stage::Locate)?
    .into_iter()
    .filter(|segment| segment.kind == SegmentKind::Code)
    .find_map(|segment| {
      DECLARATION
        .captures_iter(&text[segment.range.clone()])
        .find(|captures| &captures[1] == identifier)
        .and_then(|captures| captures.get(0))
        .map(|declaration| segment.range.start + declaration.end() - 1)
    })
    .ok_or_else(not_found)?;

  let rest = &text[start..];
  let mut depth = 0usize;
  for segment in scan(rest, Stage::Locate)? {
    if segment.kind != SegmentKind::Code {
      continue;
    }
    for (offset, byte) in rest.as_bytes()[segment.range.clone()].iter().enumerate() {
      match byte {
        b'{' => depth += 1,
        b'}' => {
          depth = depth.saturating_sub(1);
          if depth == 0 {
            let end = segment.range.start + offset + 1;
            return Ok(&rest[..end]);
          }
        },
        _ => {},
      }
    }
  }

  Err(not_found())
}

/// Removes `//` line comments and `/* */` block comments. Line breaks that
/// ended a line comment are kept.
pub fn strip_comments(text: &str) -> Result<String> {
  let mut out = String::with_capacity(text.len());
  for segment in scan(text, Stage::StripComments)? {
    if segment.kind != SegmentKind::Comment {
      out.push_str(&text[segment.range]);
    }
  }
  Ok(out)
}

static BARE_KEY: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?P<pre>[{,]\s*)(?P<key>[A-Za-z_$][\w$]*|-?\d+)(?P<post>\s*:)").unwrap()
});

/// Turns single-quoted strings into double-quoted ones and quotes bare
/// identifier or integer keys.
pub fn normalize_quotes(text: &str) -> Result<String> {
  let mut out = String::with_capacity(text.len() + text.len() / 4);
  for segment in scan(text, Stage::NormalizeQuotes)? {
    let slice = &text[segment.range];
    match segment.kind {
      SegmentKind::Quoted('\'') => requote(&slice[1..slice.len() - 1], &mut out),
      SegmentKind::Code => out.push_str(&BARE_KEY.replace_all(slice, "${pre}\"${key}\"${post}")),
      SegmentKind::Quoted(_) | SegmentKind::Comment => out.push_str(slice),
    }
  }
  Ok(out)
}

fn requote(body: &str, out: &mut String) {
  out.push('"');
  let mut chars = body.chars();
  while let Some(ch) = chars.next() {
    match ch {
      '\\' => match chars.next() {
        Some('\'') => out.push('\''),
        Some(escaped) => {
          out.push('\\');
          out.push(escaped);
        },
        None => out.push('\\'),
      },
      '"' => out.push_str("\\\""),
      _ => out.push(ch),
    }
  }
  out.push('"');
}

static SHORT_DECIMAL: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?P<pre>[\s:\[,]-?)\.(?P<digit>\d)").unwrap());

/// Adds the leading zero JSON requires to decimals written as `.5`.
pub fn normalize_numbers(text: &str) -> Result<String> {
  rewrite_code(text, Stage::NormalizeNumbers, |code| {
    SHORT_DECIMAL
      .replace_all(code, "${pre}0.${digit}")
      .into_owned()
  })
}

static TRAILING_COMMA: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r",(?P<close>\s*[}\]])").unwrap());

pub fn strip_trailing_commas(text: &str) -> Result<String> {
  rewrite_code(text, Stage::StripTrailingCommas, |code| {
    TRAILING_COMMA.replace_all(code, "${close}").into_owned()
  })
}

pub fn decode(text: &str) -> Result<Value> {
  serde_json::from_str(text).map_err(|err| FormatError::Decode {
    line:    err.line(),
    column:  err.column(),
    message: err.to_string(),
  })
}

/// Extracts typed level records from a decoded object.
pub fn build(value: Value) -> Result<BTreeMap<i64, LevelConfig>> {
  let Value::Object(entries) = value else {
    return Err(FormatError::NotAnObject);
  };

  let mut levels = BTreeMap::new();
  for (key, entry) in &entries {
    let level: i64 = key
      .trim()
      .parse()
      .map_err(|_| FormatError::InvalidLevelNumber(key.clone()))?;
    if levels.contains_key(&level) {
      return Err(FormatError::DuplicateLevel(level));
    }
    levels.insert(level, build_level(level, entry)?);
  }
  Ok(levels)
}

fn build_level(level: i64, entry: &Value) -> Result<LevelConfig> {
  let entry = entry.as_object().ok_or(FormatError::InvalidValue {
    level,
    key: "level",
    expected: "an object",
  })?;

  let name = require(entry, level, "name")?
    .as_str()
    .ok_or(FormatError::InvalidValue {
      level,
      key: "name",
      expected: "a string",
    })?
    .to_string();

  let allowed_enemy_types = require(entry, level, "allowedEnemyTypes")?
    .as_array()
    .ok_or(FormatError::InvalidValue {
      level,
      key: "allowedEnemyTypes",
      expected: "a list of integers",
    })?
    .iter()
    .map(|value| int(value, level, "allowedEnemyTypes"))
    .collect::<Result<Vec<_>>>()?;

  let global = require(entry, level, "global")?
    .as_object()
    .ok_or(FormatError::InvalidValue {
      level,
      key: "global",
      expected: "an object",
    })?;

  let score_bonus = match global.get("scoreBonus") {
    Some(value) => int(value, level, "scoreBonus")?,
    None => 0,
  };

  Ok(LevelConfig {
    name,
    allowed_enemy_types,
    global: GlobalConfig {
      max_enemies: int(require(global, level, "maxEnemies")?, level, "maxEnemies")?,
      spawn_time_window: float(
        require(global, level, "spawnTimeWindow")?,
        level,
        "spawnTimeWindow",
      )?,
      collision_separation: float(
        require(global, level, "collisionSeparation")?,
        level,
        "collisionSeparation",
      )?,
      wrap_buffer: int(require(global, level, "wrapBuffer")?, level, "wrapBuffer")?,
      speed_multiplier: float(
        require(global, level, "speedMultiplier")?,
        level,
        "speedMultiplier",
      )?,
      eccentricity_multiplier: float(
        require(global, level, "eccentricityMultiplier")?,
        level,
        "eccentricityMultiplier",
      )?,
      score_bonus,
    },
  })
}

fn require<'a>(object: &'a Map<String, Value>, level: i64, key: &'static str) -> Result<&'a Value> {
  object.get(key).ok_or(FormatError::MissingKey { level, key })
}

/// Integers may also be written as integral floats (`20.0`).
fn int(value: &Value, level: i64, key: &'static str) -> Result<i64> {
  value
    .as_i64()
    .or_else(|| {
      value
        .as_f64()
        .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
        .map(|v| v as i64)
    })
    .ok_or(FormatError::InvalidValue {
      level,
      key,
      expected: "an integer",
    })
}

fn float(value: &Value, level: i64, key: &'static str) -> Result<f64> {
  value.as_f64().ok_or(FormatError::InvalidValue {
    level,
    key,
    expected: "a number",
  })
}

const HEADER: &str = r#"/**
 * Level configuration object that defines the behavior and parameters for each game level.
 * Each level has a unique configuration for different enemy types and global settings.
 *
 * Structure:
 * {
 *   [levelNumber]: {
 *     name: string,              // Display name of the level (e.g. "1 Alpha")
 *     allowedEnemyTypes: number[], // Array of allowed enemy types (1, 2, 3)
 *     global: {                  // Global level settings
 *       maxEnemies: number,      // Maximum number of enemies allowed in the level
 *       spawnTimeWindow: number, // Time window in seconds to spawn all enemies
 *       collisionSeparation: number, // Force applied to separate colliding enemies
 *       wrapBuffer: number,      // Distance from top before enemies wrap around
 *       speedMultiplier: number, // Multiplier applied to all enemy speeds
 *       eccentricityMultiplier: number, // Multiplier for enemy direction change probability
 *       scoreBonus: number       // Optional bonus points for clearing the level
 *     }
 *   }
 * }
 */
"#;

/// Renders levels in canonical file form, ascending by level number.
pub fn serialize<'a>(
  levels: impl IntoIterator<Item = (&'a i64, &'a LevelConfig)>,
  identifier: &str,
) -> String {
  let blocks: Vec<String> = levels
    .into_iter()
    .map(|(level, config)| serialize_level(*level, config))
    .collect();

  let mut out = String::from(HEADER);
  out.push_str(&format!("const {identifier} = {{\n"));
  out.push_str(&blocks.join(",\n"));
  if !blocks.is_empty() {
    out.push('\n');
  }
  out.push_str("};\n");
  out
}

fn serialize_level(level: i64, config: &LevelConfig) -> String {
  let global = &config.global;
  let key = if level < 0 {
    format!("\"{level}\"")
  } else {
    level.to_string()
  };
  let enemy_types = config
    .allowed_enemy_types
    .iter()
    .map(i64::to_string)
    .collect::<Vec<_>>()
    .join(", ");

  let mut global_lines = vec![
    format!("maxEnemies: {}", global.max_enemies),
    format!("spawnTimeWindow: {}", format_float(global.spawn_time_window)),
    format!("collisionSeparation: {}", format_float(global.collision_separation)),
    format!("wrapBuffer: {}", global.wrap_buffer),
    format!("speedMultiplier: {}", format_float(global.speed_multiplier)),
    format!(
      "eccentricityMultiplier: {}",
      format_float(global.eccentricity_multiplier)
    ),
  ];
  if global.score_bonus > 0 {
    global_lines.push(format!("scoreBonus: {}", global.score_bonus));
  }

  let mut out = String::new();
  out.push_str(&format!("    {key}: {{\n"));
  out.push_str(&format!(
    "        name: {},\n",
    Value::String(config.name.clone())
  ));
  out.push_str(&format!("        allowedEnemyTypes: [{enemy_types}],\n"));
  out.push_str("        global: {\n");
  out.push_str(&format!("            {}\n", global_lines.join(",\n            ")));
  out.push_str("        }\n");
  out.push_str("    }");
  out
}

#[cfg(test)]
mod tests {
  use quickcheck::{
    Arbitrary,
    Gen,
  };

  use super::*;

  const SAMPLE: &str = r#"
// leading comment with a brace }; in it
const levelConfigs = {
    1: {
        name: "1 Alfa",
        allowedEnemyTypes: [1,2],
        global: {
            maxEnemies: 20,
            spawnTimeWindow: 45.0,  // 30 seconds to spawn all enemies
            collisionSeparation: 2.0,
            wrapBuffer: 50,
            speedMultiplier: 1.1,
            eccentricityMultiplier: .6  // Base eccentricity
        }
    },
    3: {
        name: 'Don\'t "panic" // not a comment',
        allowedEnemyTypes: [1, 2, 3,],
        global: {
            maxEnemies: 32,
            spawnTimeWindow: 48.7,
            collisionSeparation: 2.5,
            wrapBuffer: 70,
            speedMultiplier: 1.33,
            eccentricityMultiplier: 1.11,
            scoreBonus: 500,
        },
    },
};

export default levelConfigs;
"#;

  #[test]
  fn parses_sample_file() {
    let levels = parse(SAMPLE, DEFAULT_IDENTIFIER).unwrap();
    assert_eq!(levels.keys().copied().collect::<Vec<_>>(), vec![1, 3]);

    let first = &levels[&1];
    assert_eq!(first.name, "1 Alfa");
    assert_eq!(first.global.eccentricity_multiplier, 0.6);
    assert_eq!(first.global.score_bonus, 0);

    let third = &levels[&3];
    assert_eq!(third.name, r#"Don't "panic" // not a comment"#);
    assert_eq!(third.allowed_enemy_types, vec![1, 2, 3]);
    assert_eq!(third.global.score_bonus, 500);
  }

  #[test]
  fn parses_bare_body_with_shorthand_and_trailing_commas() {
    let body = "{ 1: { name: 'A', allowedEnemyTypes: [1,2], global: { maxEnemies: 10, \
                spawnTimeWindow: .5, collisionSeparation: 1, wrapBuffer: 5, speedMultiplier: \
                1, eccentricityMultiplier: 1 }, }, }";
    let levels = parse_object(body).unwrap();
    assert_eq!(levels.len(), 1);
    let level = &levels[&1];
    assert_eq!(level.name, "A");
    assert_eq!(level.global.spawn_time_window, 0.5);
    assert_eq!(level.global.collision_separation, 1.0);
    assert_eq!(level.global.score_bonus, 0);
  }

  #[test]
  fn missing_object_is_reported() {
    let err = parse("const other = { 1: {} };", DEFAULT_IDENTIFIER).unwrap_err();
    assert_eq!(err, FormatError::ObjectNotFound {
      identifier: DEFAULT_IDENTIFIER.into(),
    });
    assert_eq!(err.stage(), Stage::Locate);
  }

  #[test]
  fn locate_matches_balanced_braces() {
    let text = "let levelConfigs = { a: { b: '}' } /* } */ };\nconst x = {};";
    assert_eq!(
      locate(text, DEFAULT_IDENTIFIER).unwrap(),
      "{ a: { b: '}' } /* } */ }"
    );
  }

  #[test]
  fn locate_skips_commented_declarations() {
    let text = "// const levelConfigs = { old\n/* let levelConfigs = { */\nconst name = 'var \
                levelConfigs = {';\nconst levelConfigs = { 1: {} };";
    assert_eq!(locate(text, DEFAULT_IDENTIFIER).unwrap(), "{ 1: {} }");
  }

  #[test]
  fn strip_comments_keeps_strings() {
    let text = "a: 'x // y', // gone\nb: 1 /* gone */";
    assert_eq!(strip_comments(text).unwrap(), "a: 'x // y', \nb: 1 ");
  }

  #[test]
  fn comment_apostrophe_does_not_open_a_string() {
    let text = "{ a: 1, // don't\n b: 'ok' }";
    let stripped = strip_comments(text).unwrap();
    assert_eq!(normalize_quotes(&stripped).unwrap(), "{ \"a\": 1, \n \"b\": \"ok\" }");
  }

  #[test]
  fn unterminated_string_names_its_stage() {
    let err = normalize_quotes("{ a: 'open }").unwrap_err();
    assert_eq!(err, FormatError::UnterminatedString {
      stage:  Stage::NormalizeQuotes,
      offset: 5,
    });
  }

  #[test]
  fn normalize_quotes_escapes_inner_double_quotes() {
    assert_eq!(
      normalize_quotes(r#"{ name: 'say "hi"', 'k': 1 }"#).unwrap(),
      r#"{ "name": "say \"hi\"", "k": 1 }"#
    );
  }

  #[test]
  fn normalize_numbers_cases() {
    assert_eq!(normalize_numbers("{a: .6, b:.25}").unwrap(), "{a: 0.6, b:0.25}");
    assert_eq!(normalize_numbers("[.5,.75]").unwrap(), "[0.5,0.75]");
    assert_eq!(normalize_numbers("x: -.5").unwrap(), "x: -0.5");
    assert_eq!(normalize_numbers("x: 10.5, y: 0.5").unwrap(), "x: 10.5, y: 0.5");
    assert_eq!(normalize_numbers("x: ' .5'").unwrap(), "x: ' .5'");
  }

  #[test]
  fn strip_trailing_commas_cases() {
    assert_eq!(strip_trailing_commas("[1, 2, ]").unwrap(), "[1, 2 ]");
    assert_eq!(strip_trailing_commas("{ a: 1,\n}").unwrap(), "{ a: 1\n}");
    assert_eq!(strip_trailing_commas("'a,}'").unwrap(), "'a,}'");
  }

  #[test]
  fn decode_errors_carry_position() {
    let err = decode("{\n  \"a\": ,\n}").unwrap_err();
    match err {
      FormatError::Decode { line, .. } => assert_eq!(line, 2),
      other => panic!("unexpected error {other:?}"),
    }
  }

  #[test]
  fn missing_key_names_level_and_key() {
    let body = "{ 4: { name: 'x', allowedEnemyTypes: [], global: { maxEnemies: 1, \
                spawnTimeWindow: 1, collisionSeparation: 1, wrapBuffer: 1, speedMultiplier: 1 } } }";
    let err = parse_object(body).unwrap_err();
    assert_eq!(err, FormatError::MissingKey {
      level: 4,
      key:   "eccentricityMultiplier",
    });
    assert_eq!(err.to_string(), "level 4: missing required key 'eccentricityMultiplier'");
  }

  #[test]
  fn non_numeric_level_key_is_rejected() {
    let err = parse_object("{ alpha: {} }").unwrap_err();
    assert_eq!(err, FormatError::InvalidLevelNumber("alpha".into()));
  }

  #[test]
  fn equal_level_numbers_are_rejected() {
    let level = "{ name: 'A', allowedEnemyTypes: [1], global: { maxEnemies: 1, spawnTimeWindow: \
                 1, collisionSeparation: 1, wrapBuffer: 1, speedMultiplier: 1, \
                 eccentricityMultiplier: 1 } }";
    let body = format!("{{ 1: {level}, '01': {level} }}");
    let err = parse_object(&body).unwrap_err();
    assert_eq!(err, FormatError::DuplicateLevel(1));
    assert_eq!(err.stage(), Stage::Build);
    assert_eq!(err.to_string(), "level 1 is defined more than once");
  }

  #[test]
  fn wrong_value_type_is_rejected() {
    let body = "{ 1: { name: 2, allowedEnemyTypes: [], global: {} } }";
    assert_eq!(parse_object(body).unwrap_err(), FormatError::InvalidValue {
      level:    1,
      key:      "name",
      expected: "a string",
    });
  }

  fn sample_level(name: &str, bonus: i64) -> LevelConfig {
    let mut level = LevelConfig::with_defaults(1);
    level.name = name.into();
    level.allowed_enemy_types = vec![3, 1, 3];
    level.global.spawn_time_window = 46.8;
    level.global.score_bonus = bonus;
    level
  }

  #[test]
  fn serialize_layout() {
    let mut levels = BTreeMap::new();
    levels.insert(2, sample_level("Two", 0));
    levels.insert(1, sample_level("One", 250));

    let text = serialize(&levels, DEFAULT_IDENTIFIER);
    assert!(text.starts_with("/**"));
    let body = &text[text.find("const levelConfigs").unwrap()..];
    assert_eq!(
      body,
      "const levelConfigs = {
    1: {
        name: \"One\",
        allowedEnemyTypes: [3, 1, 3],
        global: {
            maxEnemies: 30,
            spawnTimeWindow: 46.8,
            collisionSeparation: 2.0,
            wrapBuffer: 50,
            speedMultiplier: 1.0,
            eccentricityMultiplier: 1.0,
            scoreBonus: 250
        }
    },
    2: {
        name: \"Two\",
        allowedEnemyTypes: [3, 1, 3],
        global: {
            maxEnemies: 30,
            spawnTimeWindow: 46.8,
            collisionSeparation: 2.0,
            wrapBuffer: 50,
            speedMultiplier: 1.0,
            eccentricityMultiplier: 1.0
        }
    }
};
"
    );
  }

  #[test]
  fn serialize_empty_store_is_parseable() {
    let levels = BTreeMap::new();
    let text = serialize(&levels, DEFAULT_IDENTIFIER);
    assert!(parse(&text, DEFAULT_IDENTIFIER).unwrap().is_empty());
  }

  #[test]
  fn negative_level_numbers_are_quoted() {
    let mut levels = BTreeMap::new();
    levels.insert(-3, sample_level("Below", 0));
    let text = serialize(&levels, DEFAULT_IDENTIFIER);
    assert!(text.contains("    \"-3\": {"));
    assert_eq!(parse(&text, DEFAULT_IDENTIFIER).unwrap(), levels);
  }

  #[derive(Debug, Clone)]
  struct Levels(BTreeMap<i64, LevelConfig>);

  fn finite(g: &mut Gen) -> f64 {
    let value = f64::arbitrary(g);
    if value.is_finite() { value } else { 0.0 }
  }

  impl Arbitrary for Levels {
    fn arbitrary(g: &mut Gen) -> Self {
      let count = usize::arbitrary(g) % 6;
      let mut levels = BTreeMap::new();
      for _ in 0..count {
        levels.insert(i64::arbitrary(g), LevelConfig {
          name:                String::arbitrary(g),
          allowed_enemy_types: Vec::arbitrary(g),
          global:              GlobalConfig {
            max_enemies:             i64::arbitrary(g),
            spawn_time_window:       finite(g),
            collision_separation:    finite(g),
            wrap_buffer:             i64::arbitrary(g),
            speed_multiplier:        finite(g),
            eccentricity_multiplier: finite(g),
            score_bonus:             i64::arbitrary(g).checked_abs().unwrap_or(0),
          },
        });
      }
      Levels(levels)
    }
  }

  quickcheck::quickcheck! {
      fn round_trip(levels: Levels) -> bool {
          let text = serialize(&levels.0, DEFAULT_IDENTIFIER);
          parse(&text, DEFAULT_IDENTIFIER).as_ref() == Ok(&levels.0)
      }
  }
}
