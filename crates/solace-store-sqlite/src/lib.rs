//! SQLite backend for the Solace journaling store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! pool without blocking the async runtime. Each catalog's items live inside
//! the owning settings row as a JSON array; every catalog mutation runs its
//! whole read-modify-write inside one connection call, keeping each update
//! atomic per document.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
