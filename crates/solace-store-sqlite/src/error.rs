//! Error type for `solace-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown mood literal: {0:?}")]
  MoodParse(String),

  /// Attempted to replace a catalog item that is not in the catalog.
  #[error("catalog item not found: {0}")]
  ItemNotFound(uuid::Uuid),

  /// Attempted to update an entry that does not exist.
  #[error("entry not found: {0}")]
  EntryNotFound(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
