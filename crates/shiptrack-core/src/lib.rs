//! Core types and trait definitions for shiptrack.
//!
//! This crate has no HTTP or database dependencies. The
//! store, transport, and scheduler crates all depend on it.

// Native `async fn` in traits; the returned futures are bounded explicitly.
#![allow(async_fn_in_trait)]

pub mod route;
pub mod source;
pub mod store;
pub mod vessel;

pub use route::Route;
pub use vessel::{PositionFix, PositionSample, ShipReport, Vessel};
