//! Settings catalog use-case service.
//!
//! # Responsibility
//! - CRUD over a user's tag and activity catalogs with uniqueness and
//!   type-whitelist guarantees.
//! - The setup-status flag and the reflection alert time.
//! - The in-use check gating safe deletion of catalog items.
//!
//! # Invariants
//! - No two items in the same catalog share a name (case-sensitive).
//! - Every item's type is a member of the kind's whitelist.
//! - Batch operations are all-or-nothing: validation runs in full before
//!   any write.
//! - Catalog mutations are serialized per user: the read-validate-write
//!   sequence runs under a per-user async mutex, so two concurrent writers
//!   cannot both pass the uniqueness check against a stale snapshot.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
  analytics::{AnalyticsSink, NullSink},
  catalog::{CatalogItem, CatalogKind, CatalogPatch, NewCatalogItem, TypePolicy},
  error::{Error, Result},
  settings::Settings,
  store::JournalStore,
  validate,
};

// ─── Per-user locks ──────────────────────────────────────────────────────────

/// Lazily-grown map of per-user write locks. Lock entries are never removed;
/// the map is bounded by the number of distinct users seen by this process.
#[derive(Default)]
struct UserLocks {
  inner: std::sync::Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl UserLocks {
  fn for_user(&self, user_id: Uuid) -> Arc<Mutex<()>> {
    let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
    Arc::clone(map.entry(user_id).or_default())
  }
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// Orchestrates the catalog store, the pure validators, and the usage guard.
pub struct SettingsCatalogService<S> {
  store:     Arc<S>,
  policy:    TypePolicy,
  analytics: Arc<dyn AnalyticsSink>,
  locks:     UserLocks,
}

impl<S: JournalStore> SettingsCatalogService<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      policy: TypePolicy::default(),
      analytics: Arc::new(NullSink),
      locks: UserLocks::default(),
    }
  }

  pub fn with_policy(mut self, policy: TypePolicy) -> Self {
    self.policy = policy;
    self
  }

  pub fn with_analytics(mut self, sink: Arc<dyn AnalyticsSink>) -> Self {
    self.analytics = sink;
    self
  }

  // ── Aggregate reads ───────────────────────────────────────────────────

  /// The whole settings aggregate.
  pub async fn settings(&self, user_id: Uuid) -> Result<Settings> {
    self
      .store
      .settings(user_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::SettingsNotFound(user_id))
  }

  /// The full catalog of `kind` for the user.
  pub async fn list_items(
    &self,
    user_id: Uuid,
    kind: CatalogKind,
  ) -> Result<Vec<CatalogItem>> {
    Ok(self.settings(user_id).await?.catalog(kind).to_vec())
  }

  // ── Setup status ──────────────────────────────────────────────────────

  pub async fn setup_status(&self, user_id: Uuid) -> Result<bool> {
    Ok(self.settings(user_id).await?.setup_complete)
  }

  pub async fn set_setup_status(
    &self,
    user_id: Uuid,
    complete: bool,
  ) -> Result<()> {
    // The flag can only be set on an existing aggregate.
    self.settings(user_id).await?;
    self
      .store
      .set_setup_complete(user_id, complete)
      .await
      .map_err(Error::store)?;
    tracing::info!(%user_id, complete, "setup status written");
    self
      .analytics
      .track("setup_status_set", user_id, json!({ "complete": complete }));
    Ok(())
  }

  // ── Reflection alert ──────────────────────────────────────────────────

  /// Write the reflection alert time, lazily creating the aggregate like
  /// every other settings write.
  pub async fn set_reflection_alert(
    &self,
    user_id: Uuid,
    when: DateTime<Utc>,
  ) -> Result<()> {
    let lock = self.locks.for_user(user_id);
    let _guard = lock.lock().await;

    self
      .store
      .set_reflection_alert(user_id, when)
      .await
      .map_err(Error::store)?;
    tracing::info!(%user_id, %when, "reflection alert written");
    Ok(())
  }

  // ── Catalog mutations ─────────────────────────────────────────────────

  /// Add a batch of items to the catalog of `kind`. All-or-nothing: every
  /// item is validated against the policy, the existing catalog, and the
  /// rest of the batch before anything is written. Returns the stored items
  /// with their assigned ids.
  pub async fn add_items(
    &self,
    user_id: Uuid,
    kind: CatalogKind,
    items: Vec<NewCatalogItem>,
  ) -> Result<Vec<CatalogItem>> {
    if items.is_empty() {
      return Ok(Vec::new());
    }

    let lock = self.locks.for_user(user_id);
    let _guard = lock.lock().await;

    let existing = self
      .store
      .settings(user_id)
      .await
      .map_err(Error::store)?
      .map(|s| s.catalog(kind).to_vec())
      .unwrap_or_default();
    validate::validate_new_items(&self.policy, kind, &existing, &items)?;

    let stored = self
      .store
      .append_catalog_items(user_id, kind, items)
      .await
      .map_err(Error::store)?;

    tracing::info!(%user_id, %kind, count = stored.len(), "catalog items added");
    self.analytics.track(
      "catalog_items_added",
      user_id,
      json!({ "kind": kind, "count": stored.len() }),
    );
    Ok(stored)
  }

  /// Edit one item by id. At least one of name/type must be supplied;
  /// unsupplied fields keep their prior values. The write always replaces
  /// the complete item object. Renaming onto a *different* item's name is a
  /// conflict; renaming onto the item's own current name is a no-op.
  pub async fn edit_item(
    &self,
    user_id: Uuid,
    kind: CatalogKind,
    item_id: Uuid,
    patch: CatalogPatch,
  ) -> Result<CatalogItem> {
    if patch.is_empty() {
      return Err(Error::EmptyPatch);
    }
    if let Some(type_name) = &patch.type_name {
      if !self.policy.allows(kind, type_name) {
        return Err(Error::TypeNotAllowed {
          kind,
          type_name: type_name.clone(),
        });
      }
    }

    let lock = self.locks.for_user(user_id);
    let _guard = lock.lock().await;

    let settings = self.settings(user_id).await?;
    let catalog = settings.catalog(kind);
    let current = validate::find_by_id(catalog, item_id)
      .ok_or(Error::ItemNotFound { kind, item_id })?;

    if let Some(name) = &patch.name {
      if name.is_empty() {
        return Err(Error::MissingItemField {
          name:  current.name.clone(),
          field: "name",
        });
      }
      let other_names = catalog
        .iter()
        .filter(|i| i.item_id != item_id)
        .map(|i| i.name.as_str());
      if !validate::is_name_unique(name, other_names) {
        return Err(Error::DuplicateName { kind, name: name.clone() });
      }
    }

    let updated = CatalogItem {
      item_id,
      name:      patch.name.unwrap_or_else(|| current.name.clone()),
      type_name: patch.type_name.unwrap_or_else(|| current.type_name.clone()),
    };
    self
      .store
      .replace_catalog_item(user_id, kind, updated.clone())
      .await
      .map_err(Error::store)?;

    tracing::info!(%user_id, %kind, %item_id, "catalog item edited");
    Ok(updated)
  }

  /// Delete a set of items by id in one atomic update. Every id must name
  /// an existing item of that kind; the first missing id fails the whole
  /// call and nothing is removed.
  ///
  /// Deletion is not gated on usage here — callers decide whether to check
  /// [`Self::item_in_use`] first.
  pub async fn delete_items(
    &self,
    user_id: Uuid,
    kind: CatalogKind,
    ids: Vec<Uuid>,
  ) -> Result<()> {
    let lock = self.locks.for_user(user_id);
    let _guard = lock.lock().await;

    let settings = self.settings(user_id).await?;
    let catalog = settings.catalog(kind);
    for id in &ids {
      if validate::find_by_id(catalog, *id).is_none() {
        return Err(Error::ItemNotFound { kind, item_id: *id });
      }
    }

    let count = ids.len();
    self
      .store
      .remove_catalog_items(user_id, kind, ids)
      .await
      .map_err(Error::store)?;

    tracing::info!(%user_id, %kind, count, "catalog items deleted");
    self
      .analytics
      .track("catalog_items_deleted", user_id, json!({ "kind": kind, "count": count }));
    Ok(())
  }

  // ── Usage guard ───────────────────────────────────────────────────────

  /// True iff any entry — regardless of owner — references `item_id` in its
  /// tag or activity snapshots. The item itself must exist in the caller's
  /// catalog.
  pub async fn item_in_use(
    &self,
    user_id: Uuid,
    kind: CatalogKind,
    item_id: Uuid,
  ) -> Result<bool> {
    let settings = self.settings(user_id).await?;
    validate::find_by_id(settings.catalog(kind), item_id)
      .ok_or(Error::ItemNotFound { kind, item_id })?;

    let referencing = self
      .store
      .count_entries_referencing(item_id)
      .await
      .map_err(Error::store)?;
    Ok(referencing > 0)
  }
}
