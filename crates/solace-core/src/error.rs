//! Error types for `solace-core`.
//!
//! Validation and conflict errors carry enough context to name the offending
//! field, item, or value in their message. Failures of external collaborators
//! (store, identity provider, field cipher) are wrapped rather than flattened
//! so the original error chain stays inspectable.

use thiserror::Error;
use uuid::Uuid;

use crate::catalog::CatalogKind;

/// A boxed error from an external collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  // ── Settings / catalog ────────────────────────────────────────────────
  #[error("settings not found for user {0}")]
  SettingsNotFound(Uuid),

  #[error("{kind} item not found: {item_id}")]
  ItemNotFound { kind: CatalogKind, item_id: Uuid },

  /// Duplicate name within a catalog — within a batch, against the existing
  /// catalog, or introduced by a rename.
  #[error("a {kind} named {name:?} already exists")]
  DuplicateName { kind: CatalogKind, name: String },

  #[error("catalog item {name:?} has no {field}")]
  MissingItemField { name: String, field: &'static str },

  #[error("type {type_name:?} is not allowed for {kind} items")]
  TypeNotAllowed { kind: CatalogKind, type_name: String },

  #[error("an edit must supply at least one field")]
  EmptyPatch,

  // ── Entries ───────────────────────────────────────────────────────────
  #[error("required field is empty: {0}")]
  EmptyField(&'static str),

  #[error("a pleasant entry cannot link to another entry")]
  LinkFromPleasant,

  #[error("entry {0} is unpleasant and cannot be linked to")]
  LinkTargetUnpleasant(Uuid),

  #[error("linked entry not found: {0}")]
  LinkedEntryNotFound(Uuid),

  /// Other entries link to this one; its mood cannot turn unpleasant while
  /// those links exist.
  #[error("entry {0} is a link target; its mood cannot become unpleasant")]
  LinkTargetMoodLocked(Uuid),

  // ── External collaborators ────────────────────────────────────────────
  #[error("store error: {0}")]
  Store(#[source] BoxError),

  #[error("identity provider error: {0}")]
  Identity(#[source] BoxError),

  #[error("field cipher error: {0}")]
  Cipher(#[source] BoxError),
}

impl Error {
  /// Wrap a storage backend error.
  pub fn store<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
    Self::Store(Box::new(err))
  }

  /// Wrap an identity provider error.
  pub fn identity<E: std::error::Error + Send + Sync + 'static>(
    err: E,
  ) -> Self {
    Self::Identity(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
