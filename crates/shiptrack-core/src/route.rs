//! Route extraction from the free-text comment of a report.
//!
//! Ferries and liners commonly broadcast their route as `DEPARTURE-DESTINATION`
//! (sometimes followed by more legs or an ETA). Only the first two tokens are
//! used. Each token carries a trailing [`WILDCARD`] so it can be used as-is in
//! a prefix `LIKE` lookup against port names.

use serde::{Deserialize, Serialize};

/// Separates route legs in the comment field.
pub const SEPARATOR: char = '-';

/// Appended to every extracted token.
pub const WILDCARD: char = '%';

/// Departure and destination tokens parsed from a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
  pub departure:   Option<String>,
  pub destination: Option<String>,
}

impl Route {
  /// Parse `text` scanning for the first two separators.
  ///
  /// The departure is everything before the first separator. The destination
  /// runs from there up to the second separator, or to the end of the text if
  /// there is none. Empty spans produce no token.
  pub fn parse(text: &str) -> Self {
    let mut separators = text.match_indices(SEPARATOR).map(|(at, _)| at);

    let Some(first) = separators.next() else {
      return Self::default();
    };
    let second = separators.next().unwrap_or(text.len());

    Self {
      departure:   token(text, 0, first),
      destination: token(text, first + SEPARATOR.len_utf8(), second),
    }
  }

  /// `true` once a departure token was found. The destination is best-effort.
  pub fn is_found(&self) -> bool { self.departure.is_some() }
}

/// Cut `text[start..end]` and format it for prefix lookup.
///
/// Spans reaching past the end of the input yield `None`.
fn token(text: &str, start: usize, end: usize) -> Option<String> {
  let span = text.get(start..end)?;
  if span.is_empty() {
    return None;
  }
  let mut token = String::with_capacity(span.len() + WILDCARD.len_utf8());
  token.push_str(span);
  token.push(WILDCARD);
  Some(token)
}
