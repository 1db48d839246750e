//! HTTP tracking source backed by the aprs.fi location API.
//!
//! [`AprsClient`] implements [`shiptrack_core::source::TrackingSource`] and
//! returns the raw response body; decoding lives in `shiptrack-json`.

mod client;
pub mod error;

pub use client::{AprsClient, AprsConfig, DEFAULT_API_URL, DEFAULT_USER_AGENT};
pub use error::{Error, Result};
