//! SQLite backend for the shiptrack vessel store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{SqliteConnector, SqliteStore};

#[cfg(test)]
mod tests;
