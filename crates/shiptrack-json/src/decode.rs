//! Envelope validation and per-entry decoding.

use chrono::{DateTime, Utc};
use shiptrack_core::{PositionFix, Route, ShipReport, Vessel};

use crate::{
  Error, Result,
  field::FieldReader,
};

/// Validate the response envelope and return the advertised entry count.
///
/// A `result` other than `ok` (compared case-insensitively) is a rejection;
/// its `description`, if any, is carried on the error.
pub fn check_envelope(reader: &FieldReader) -> Result<usize> {
  if !reader.is_valid() {
    return Err(Error::InvalidDocument);
  }

  let result: String = reader.scalar("result").ok_or(Error::MissingResult)?;
  if !result.eq_ignore_ascii_case("ok") {
    return Err(Error::Rejected { description: reader.scalar("description") });
  }

  let found: i64 = reader.scalar("found").ok_or(Error::MissingFound)?;
  Ok(usize::try_from(found).unwrap_or(0))
}

/// Decode the entry at `index`. Unresolvable fields take their zero value.
pub fn decode_entry(reader: &FieldReader, index: usize) -> ShipReport {
  let field = |name: &str| -> String { reader.entry(index, name) };

  let vessel = Vessel {
    mmsi:             reader.entry(index, "mmsi"),
    imo:              reader.entry(index, "imo"),
    name:             field("name"),
    comment:          field("comment"),
    heading:          reader.entry(index, "heading"),
    course:           reader.entry(index, "course"),
    speed:            reader.entry(index, "speed"),
    length:           reader.entry(index, "length"),
    width:            reader.entry(index, "width"),
    draught:          reader.entry(index, "draught"),
    ref_front:        reader.entry(index, "ref_front"),
    ref_left:         reader.entry(index, "ref_left"),
    path:             field("path"),
    class:            reader.entry(index, "class"),
    kind:             reader.entry(index, "type"),
    source_call:      field("srccall"),
    destination_call: field("dstcall"),
    vessel_class:     reader.entry(index, "vesselclass"),
    nav_status:       reader.entry(index, "navstat"),
  };

  let fix = PositionFix {
    latitude:   reader.entry(index, "lat"),
    longitude:  reader.entry(index, "lng"),
    first_seen: epoch_seconds(reader.entry(index, "time")),
    last_seen:  epoch_seconds(reader.entry(index, "lasttime")),
  };

  let route = Some(Route::parse(&vessel.comment)).filter(Route::is_found);

  ShipReport { vessel, fix, route }
}

/// Out-of-range timestamps fall back to the Unix epoch.
fn epoch_seconds(secs: i64) -> DateTime<Utc> {
  DateTime::from_timestamp(secs, 0).unwrap_or_default()
}
