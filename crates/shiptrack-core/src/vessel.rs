//! Vessel records: the current state of a ship and its observed positions.
//!
//! A [`Vessel`] is keyed by MMSI and overwritten on every report. Positions
//! are grouped by IMO and kept as a bounded, append-only history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::route::Route;

// ─── Current state ───────────────────────────────────────────────────────────

/// Current attributes of a vessel as last reported by the tracking source.
///
/// The IMO number is not stable upstream; the store keys updates on `mmsi`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
  pub mmsi:             i64,
  pub imo:              i64,
  pub name:             String,
  /// Free-text comment; usually the destination or a `DEP-DEST` route.
  pub comment:          String,
  /// Heading in whole degrees.
  pub heading:          i32,
  /// Course over ground in degrees.
  pub course:           f64,
  /// Speed in km/h as reported upstream.
  pub speed:            f64,
  pub length:           f64,
  pub width:            f64,
  pub draught:          f64,
  pub ref_front:        i32,
  pub ref_left:         i32,
  /// Packet path the report travelled through.
  pub path:             String,
  /// Target class discriminator (`a` for APRS, `i` for AIS, ...).
  pub class:            char,
  /// Target type discriminator (`a` for AIS, `l` for APRS, ...).
  pub kind:             char,
  pub source_call:      String,
  pub destination_call: String,
  pub vessel_class:     i32,
  pub nav_status:       i32,
}

impl Vessel {
  /// A vessel known only by its MMSI, with every other attribute zeroed.
  pub fn new(mmsi: i64) -> Self {
    Self {
      mmsi,
      imo:              0,
      name:             String::new(),
      comment:          String::new(),
      heading:          0,
      course:           0.0,
      speed:            0.0,
      length:           0.0,
      width:            0.0,
      draught:          0.0,
      ref_front:        0,
      ref_left:         0,
      path:             String::new(),
      class:            '0',
      kind:             '0',
      source_call:      String::new(),
      destination_call: String::new(),
      vessel_class:     0,
      nav_status:       0,
    }
  }
}

// ─── Positions ───────────────────────────────────────────────────────────────

/// A single observed fix, before it is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
  /// Decimal degrees, north positive.
  pub latitude:   f64,
  /// Decimal degrees, east positive.
  pub longitude:  f64,
  /// When the target was first seen at this position.
  pub first_seen: DateTime<Utc>,
  /// When the target was last seen at this position.
  pub last_seen:  DateTime<Utc>,
}

/// A persisted fix. `log_id` increases with insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
  pub log_id: i64,
  pub imo:    i64,
  #[serde(flatten)]
  pub fix:    PositionFix,
}

// ─── Decoded report ──────────────────────────────────────────────────────────

/// One decoded entry of a tracking response.
///
/// Lives only for the duration of a single ingestion item.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipReport {
  pub vessel: Vessel,
  pub fix:    PositionFix,
  /// Route parsed from `vessel.comment`, if it has one.
  pub route:  Option<Route>,
}
