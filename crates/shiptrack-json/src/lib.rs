//! Decoder for tracking-service location responses.
//!
//! Converts a raw JSON response into [`shiptrack_core`] reports. Pure
//! synchronous; no HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use shiptrack_json::Batch;
//!
//! let body = r#"{"result":"ok","found":1,"entries":[{"mmsi":"230636000"}]}"#;
//! let batch = Batch::parse(body).unwrap();
//! for report in batch.reports() {
//!   println!("{} at {:?}", report.vessel.mmsi, report.fix);
//! }
//! ```

mod decode;
pub mod error;
pub mod field;

pub use decode::{check_envelope, decode_entry};
pub use error::{Error, Result};
pub use field::{FieldReader, FieldType};
use shiptrack_core::ShipReport;

// ─── Field shortcuts ─────────────────────────────────────────────────────────

/// Read a top-level field of `document`. `None` means "not found".
pub fn read_scalar<T: FieldType>(document: &str, field: &str) -> Option<T> {
  FieldReader::parse(document).scalar(field)
}

/// Read `field` of entry `index` of `document`, defaulting when unresolved.
///
/// Parses the document on every call; use [`FieldReader`] for repeated reads.
pub fn read_entry_field<T: FieldType>(document: &str, field: &str, index: usize) -> T {
  FieldReader::parse(document).entry(index, field)
}

// ─── Batch ───────────────────────────────────────────────────────────────────

/// A validated response: the envelope said `ok` and advertised a count.
#[derive(Debug, Clone)]
pub struct Batch {
  reader: FieldReader,
  found:  usize,
}

impl Batch {
  /// Parse and validate a response body.
  pub fn parse(document: &str) -> Result<Self> {
    let reader = FieldReader::parse(document);
    let found = check_envelope(&reader)?;
    Ok(Self { reader, found })
  }

  /// The entry count advertised by the `found` field.
  pub fn found(&self) -> usize { self.found }

  /// Number of entries that will actually be decoded.
  ///
  /// Never more than the length of the `entries` array, so a miscounted
  /// `found` cannot produce phantom all-default reports.
  pub fn len(&self) -> usize {
    self.found.min(self.reader.entries_len().unwrap_or(0))
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }

  /// Decode the entry at `index`.
  pub fn report(&self, index: usize) -> ShipReport { decode_entry(&self.reader, index) }

  /// Decode every entry, in response order.
  pub fn reports(&self) -> impl Iterator<Item = ShipReport> + '_ {
    (0..self.len()).map(|index| self.report(index))
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;

  /// Two vessels as the service returns them: the first entry with native
  /// numbers, the second with everything re-encoded as strings.
  const TWO_SHIPS: &str = r#"{
    "command": "get", "result": "ok", "what": "loc", "found": 2,
    "entries": [
      {
        "class": "i", "name": "WASA EXPRESS", "mmsi": 230636000, "type": "a",
        "time": 1479212440, "lasttime": 1479212440,
        "lat": 63.0855466666667, "lng": 21.5493666666667,
        "course": 284, "speed": 2.5928, "srccall": "OJQB", "dstcall": "ais",
        "comment": "VAASA-UMEA-VAASA (ETA 20161115123000)", "imo": 8000226,
        "vesselclass": 106, "navstat": 0, "heading": 218, "length": 141,
        "width": 23, "draught": 4.6, "ref_front": 23, "ref_left": 10,
        "path": "OH6AA"
      },
      {
        "class": "i", "name": "COLOMBO EXPRESS", "mmsi": "211433000", "type": "a",
        "time": "1479124931", "lasttime": "1479124931",
        "lat": "39.043765", "lng": "-74.001985",
        "course": "202.3", "speed": "13.1492", "srccall": "DIHC", "dstcall": "ais",
        "comment": "UKSOU > USNYC (ETA Nov05 09:00)", "imo": "295244",
        "vesselclass": "0", "navstat": "0", "heading": "204", "length": "336",
        "width": "42", "draught": "0.0", "ref_front": "0", "ref_left": "0",
        "path": "Spleen"
      }
    ]
  }"#;

  #[test]
  fn decodes_both_encodings() {
    let batch = Batch::parse(TWO_SHIPS).unwrap();
    assert_eq!(batch.found(), 2);
    assert_eq!(batch.len(), 2);

    let reports: Vec<_> = batch.reports().collect();

    let wasa = &reports[0];
    assert_eq!(wasa.vessel.mmsi, 230636000);
    assert_eq!(wasa.vessel.imo, 8000226);
    assert_eq!(wasa.vessel.name, "WASA EXPRESS");
    assert_eq!(wasa.vessel.heading, 218);
    assert_eq!(wasa.vessel.course, 284.0);
    assert_eq!(wasa.vessel.speed, 2.5928);
    assert_eq!(wasa.vessel.draught, 4.6);
    assert_eq!(wasa.vessel.class, 'i');
    assert_eq!(wasa.vessel.kind, 'a');
    assert_eq!(wasa.vessel.vessel_class, 106);
    assert_eq!(wasa.fix.latitude, 63.0855466666667);
    assert_eq!(wasa.fix.first_seen, Utc.timestamp_opt(1479212440, 0).unwrap());

    let colombo = &reports[1];
    assert_eq!(colombo.vessel.mmsi, 211433000);
    assert_eq!(colombo.vessel.imo, 295244);
    assert_eq!(colombo.vessel.course, 202.3);
    assert_eq!(colombo.vessel.speed, 13.1492);
    assert_eq!(colombo.vessel.length, 336.0);
    assert_eq!(colombo.vessel.path, "Spleen");
    assert_eq!(colombo.fix.latitude, 39.043765);
    assert_eq!(colombo.fix.longitude, -74.001985);
    assert_eq!(colombo.fix.last_seen, Utc.timestamp_opt(1479124931, 0).unwrap());
  }

  #[test]
  fn route_is_parsed_from_comment() {
    let batch = Batch::parse(TWO_SHIPS).unwrap();

    let wasa = batch.report(0);
    let route = wasa.route.expect("wasa has a route");
    assert_eq!(route.departure.as_deref(), Some("VAASA%"));
    assert_eq!(route.destination.as_deref(), Some("UMEA%"));

    assert_eq!(batch.report(1).route, None);
  }

  #[test]
  fn rejected_response_carries_description() {
    let err = Batch::parse(r#"{"result":"fail","description":"invalid API key"}"#)
      .unwrap_err();
    match err {
      Error::Rejected { description } => {
        assert_eq!(description.as_deref(), Some("invalid API key"));
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn result_is_case_insensitive() {
    let batch = Batch::parse(r#"{"result":"OK","found":0,"entries":[]}"#).unwrap();
    assert!(batch.is_empty());
  }

  #[test]
  fn missing_found_is_an_error() {
    let err = Batch::parse(r#"{"result":"ok","entries":[]}"#).unwrap_err();
    assert!(matches!(err, Error::MissingFound));
  }

  #[test]
  fn missing_result_is_an_error() {
    let err = Batch::parse(r#"{"found":1}"#).unwrap_err();
    assert!(matches!(err, Error::MissingResult));
  }

  #[test]
  fn malformed_body_is_an_error() {
    let err = Batch::parse("<html>502 Bad Gateway</html>").unwrap_err();
    assert!(matches!(err, Error::InvalidDocument));
  }

  #[test]
  fn found_larger_than_entries_is_clamped() {
    let batch =
      Batch::parse(r#"{"result":"ok","found":3,"entries":[{"mmsi":1}]}"#).unwrap();
    assert_eq!(batch.found(), 3);
    assert_eq!(batch.len(), 1);
    assert_eq!(batch.reports().count(), 1);
  }

  #[test]
  fn shortcut_readers() {
    assert_eq!(read_scalar::<i64>(TWO_SHIPS, "found"), Some(2));
    assert_eq!(read_scalar::<i64>(TWO_SHIPS, "missing"), None);
    assert_eq!(read_entry_field::<f64>(TWO_SHIPS, "lng", 1), -74.001985);
    assert_eq!(read_entry_field::<char>(TWO_SHIPS, "missing", 1), '0');
  }
}
