//! Tolerant field access over a tracking response.
//!
//! The tracking service encodes the first entry of a batch with native JSON
//! numbers and every later entry with the same fields re-encoded as strings:
//!
//! ```json
//! { "entries": [ { "lat": 60.45, ... }, { "lat": "60.45", ... } ] }
//! ```
//!
//! Both encodings must read the same. Each target type implements
//! [`FieldType`] as a closed table over the source [`Value`] kind, so every
//! conversion is explicit.

use serde_json::Value;

/// Name of the array holding per-vessel entries.
pub const ENTRIES: &str = "entries";

// ─── Coercion table ──────────────────────────────────────────────────────────

/// A type a JSON field can be coerced into.
pub trait FieldType: Sized {
  /// Returned by entry reads when the field is absent or unparsable.
  const DEFAULT: Self;

  /// Convert `value`, whatever its native kind. `None` if it cannot be.
  fn coerce(value: &Value) -> Option<Self>;
}

/// | source         | result                                   |
/// |----------------|------------------------------------------|
/// | integer number | as is                                    |
/// | float number   | truncated toward zero                    |
/// | string         | parsed as integer, else as float and truncated |
/// | anything else  | `None`                                   |
impl FieldType for i64 {
  const DEFAULT: Self = 0;

  fn coerce(value: &Value) -> Option<Self> {
    match value {
      Value::Number(n) => n
        .as_i64()
        .or_else(|| n.as_u64().and_then(|u| i64::try_from(u).ok()))
        .or_else(|| n.as_f64().and_then(truncate)),
      Value::String(s) => parse_int(s),
      _ => None,
    }
  }
}

/// Same as `i64`, then narrowed; out-of-range values do not resolve.
impl FieldType for i32 {
  const DEFAULT: Self = 0;

  fn coerce(value: &Value) -> Option<Self> {
    i64::coerce(value).and_then(|v| i32::try_from(v).ok())
  }
}

/// | source        | result                   |
/// |---------------|--------------------------|
/// | number        | as `f64`                 |
/// | string        | parsed as a finite float |
/// | anything else | `None`                   |
impl FieldType for f64 {
  const DEFAULT: Self = 0.0;

  fn coerce(value: &Value) -> Option<Self> {
    match value {
      Value::Number(n) => n.as_f64(),
      Value::String(s) => parse_float(s),
      _ => None,
    }
  }
}

/// | source        | result              |
/// |---------------|---------------------|
/// | string        | verbatim            |
/// | number        | its JSON rendering  |
/// | anything else | `None`              |
impl FieldType for String {
  const DEFAULT: Self = String::new();

  fn coerce(value: &Value) -> Option<Self> {
    match value {
      Value::String(s) => Some(s.clone()),
      Value::Number(n) => Some(n.to_string()),
      _ => None,
    }
  }
}

/// First character of the `String` coercion. Empty strings do not resolve.
impl FieldType for char {
  const DEFAULT: Self = '0';

  fn coerce(value: &Value) -> Option<Self> {
    String::coerce(value).and_then(|s| s.chars().next())
  }
}

// Rust's float and integer parsers are locale-independent.

fn parse_int(s: &str) -> Option<i64> {
  let s = s.trim();
  s.parse::<i64>().ok().or_else(|| parse_float(s).and_then(truncate))
}

fn parse_float(s: &str) -> Option<f64> {
  s.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

fn truncate(f: f64) -> Option<i64> {
  (f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64)
    .then(|| f.trunc() as i64)
}

// ─── Reader ──────────────────────────────────────────────────────────────────

/// A parsed response document with typed, tolerant field access.
///
/// A malformed document (or one whose root is not an object) is not an error
/// here: every read on it simply resolves to "not found".
#[derive(Debug, Clone)]
pub struct FieldReader {
  root: Option<Value>,
}

impl FieldReader {
  pub fn parse(document: &str) -> Self {
    let root = serde_json::from_str::<Value>(document)
      .ok()
      .filter(Value::is_object);
    Self { root }
  }

  /// `false` if the document did not parse as a JSON object.
  pub fn is_valid(&self) -> bool { self.root.is_some() }

  /// Read a top-level field. `None` means "not found".
  pub fn scalar<T: FieldType>(&self, field: &str) -> Option<T> {
    self.root.as_ref()?.get(field).and_then(T::coerce)
  }

  /// Read `field` of the entry at `index`, falling back to
  /// [`FieldType::DEFAULT`] when it cannot be resolved.
  pub fn entry<T: FieldType>(&self, index: usize, field: &str) -> T {
    self
      .entry_value(index, field)
      .and_then(T::coerce)
      .unwrap_or(T::DEFAULT)
  }

  /// Length of the `entries` array, or `None` if there is no such array.
  pub fn entries_len(&self) -> Option<usize> {
    Some(self.root.as_ref()?.get(ENTRIES)?.as_array()?.len())
  }

  fn entry_value(&self, index: usize, field: &str) -> Option<&Value> {
    self
      .root
      .as_ref()?
      .get(ENTRIES)?
      .as_array()?
      .get(index)?
      .get(field)
  }
}
