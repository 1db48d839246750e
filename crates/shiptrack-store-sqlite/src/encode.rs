//! Encoding and decoding helpers between domain types and the plain column
//! representations stored in SQLite.
//!
//! Timestamps are stored as RFC 3339 strings. Single-character discriminators
//! are stored as one-character TEXT.

use chrono::{DateTime, Utc};
use shiptrack_core::{PositionFix, PositionSample, Vessel};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── char ────────────────────────────────────────────────────────────────────

pub fn encode_char(c: char) -> String { c.to_string() }

/// Empty columns decode to `'0'`, the same fallback the decoder uses.
pub fn decode_char(s: &str) -> char { s.chars().next().unwrap_or('0') }

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A `ships` row as read from SQLite, before char decoding.
pub struct RawVessel {
  pub mmsi:             i64,
  pub imo:              i64,
  pub name:             String,
  pub comment:          String,
  pub heading:          i32,
  pub course:           f64,
  pub speed:            f64,
  pub length:           f64,
  pub width:            f64,
  pub draught:          f64,
  pub ref_front:        i32,
  pub ref_left:         i32,
  pub path:             String,
  pub class:            String,
  pub kind:             String,
  pub source_call:      String,
  pub destination_call: String,
  pub vessel_class:     i32,
  pub nav_status:       i32,
}

impl RawVessel {
  pub const COLUMNS: &'static str = "mmsi, imo, name, comment, heading, course, speed, \
     length, width, draught, ref_front, ref_left, path, class, kind, \
     source_call, destination_call, vessel_class, nav_status";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      mmsi:             row.get(0)?,
      imo:              row.get(1)?,
      name:             row.get(2)?,
      comment:          row.get(3)?,
      heading:          row.get(4)?,
      course:           row.get(5)?,
      speed:            row.get(6)?,
      length:           row.get(7)?,
      width:            row.get(8)?,
      draught:          row.get(9)?,
      ref_front:        row.get(10)?,
      ref_left:         row.get(11)?,
      path:             row.get(12)?,
      class:            row.get(13)?,
      kind:             row.get(14)?,
      source_call:      row.get(15)?,
      destination_call: row.get(16)?,
      vessel_class:     row.get(17)?,
      nav_status:       row.get(18)?,
    })
  }

  pub fn into_vessel(self) -> Vessel {
    Vessel {
      mmsi:             self.mmsi,
      imo:              self.imo,
      name:             self.name,
      comment:          self.comment,
      heading:          self.heading,
      course:           self.course,
      speed:            self.speed,
      length:           self.length,
      width:            self.width,
      draught:          self.draught,
      ref_front:        self.ref_front,
      ref_left:         self.ref_left,
      path:             self.path,
      class:            decode_char(&self.class),
      kind:             decode_char(&self.kind),
      source_call:      self.source_call,
      destination_call: self.destination_call,
      vessel_class:     self.vessel_class,
      nav_status:       self.nav_status,
    }
  }
}

/// A `gps` row as read from SQLite, before timestamp decoding.
pub struct RawSample {
  pub log_id:     i64,
  pub imo:        i64,
  pub north:      f64,
  pub east:       f64,
  pub first_seen: String,
  pub last_seen:  String,
}

impl RawSample {
  pub fn into_sample(self) -> Result<PositionSample> {
    Ok(PositionSample {
      log_id: self.log_id,
      imo:    self.imo,
      fix:    PositionFix {
        latitude:   self.north,
        longitude:  self.east,
        first_seen: decode_dt(&self.first_seen)?,
        last_seen:  decode_dt(&self.last_seen)?,
      },
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn dt_round_trips() {
    let dt = Utc.timestamp_opt(1479212440, 0).unwrap();
    assert_eq!(decode_dt(&encode_dt(dt)).unwrap(), dt);
  }

  #[test]
  fn bad_dt_is_an_error() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }

  #[test]
  fn empty_char_column_decodes_to_zero() {
    assert_eq!(decode_char(""), '0');
    assert_eq!(decode_char("i"), 'i');
  }
}
