//! The `JournalStore` trait — the persistence boundary of the core.
//!
//! The trait is implemented by storage backends (e.g.
//! `solace-store-sqlite`). The services depend on this abstraction, not on
//! any concrete backend. The operations are deliberately rule-free: all
//! business validation lives in the services; the store guarantees only
//! per-document atomicity of each call.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  catalog::{CatalogItem, CatalogKind, NewCatalogItem},
  entry::{Entry, EntryDraft},
  settings::Settings,
};

/// Abstraction over a Solace persistence backend.
pub trait JournalStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Settings ──────────────────────────────────────────────────────────

  /// Retrieve a user's settings aggregate. Returns `None` if the user has
  /// never written settings.
  fn settings(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Settings>, Self::Error>> + Send + '_;

  /// Retrieve a user's settings, creating an empty aggregate first if none
  /// exists. Idempotent.
  fn ensure_settings(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Settings, Self::Error>> + Send + '_;

  /// Append a batch of items to one of the user's catalogs in a single
  /// atomic update, creating the aggregate if needed. The store assigns each
  /// item's id and returns the stored items in batch order.
  fn append_catalog_items(
    &self,
    user_id: Uuid,
    kind: CatalogKind,
    items: Vec<NewCatalogItem>,
  ) -> impl Future<Output = Result<Vec<CatalogItem>, Self::Error>> + Send + '_;

  /// Replace a catalog item wholesale, matched by `item.item_id`. Writing
  /// the complete object (id, name, type) avoids nulling fields during a
  /// partial-field update. Errors if the item is not in the catalog.
  fn replace_catalog_item(
    &self,
    user_id: Uuid,
    kind: CatalogKind,
    item: CatalogItem,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove every listed id from the catalog in one atomic update. Ids not
  /// present are ignored (pull semantics); existence checks are the
  /// caller's responsibility.
  fn remove_catalog_items(
    &self,
    user_id: Uuid,
    kind: CatalogKind,
    ids: Vec<Uuid>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Write the setup-status flag. No-op if the aggregate does not exist.
  fn set_setup_complete(
    &self,
    user_id: Uuid,
    complete: bool,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Write the reflection alert time, creating the aggregate if needed.
  fn set_reflection_alert(
    &self,
    user_id: Uuid,
    when: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Entries ───────────────────────────────────────────────────────────

  /// Persist a new entry. The store assigns `entry_id` and `created_at`.
  fn insert_entry(
    &self,
    user_id: Uuid,
    draft: EntryDraft,
  ) -> impl Future<Output = Result<Entry, Self::Error>> + Send + '_;

  /// Retrieve an entry by id, regardless of owner. Returns `None` if not
  /// found; ownership checks are the caller's responsibility.
  fn entry(
    &self,
    entry_id: Uuid,
  ) -> impl Future<Output = Result<Option<Entry>, Self::Error>> + Send + '_;

  /// Write a full replacement of an existing entry, matched by
  /// `entry.entry_id`. Errors if the entry does not exist.
  fn update_entry(
    &self,
    entry: Entry,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete an entry. Returns whether a row was removed.
  fn delete_entry(
    &self,
    entry_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// All of a user's entries, newest-first by creation time.
  fn entries_for_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Entry>, Self::Error>> + Send + '_;

  /// Count entries — across all users — whose tag or activity snapshots
  /// reference `item_id`. Backs the catalog in-use check.
  fn count_entries_referencing(
    &self,
    item_id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Count entries whose `linked_entry` is `entry_id`. Backs the mood-change
  /// guard on link targets.
  fn count_entries_linking_to(
    &self,
    entry_id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
