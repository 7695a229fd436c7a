//! Pure validation helpers — no persistence, no side effects.
//!
//! The catalog helpers back
//! [`crate::catalog_service::SettingsCatalogService`]; the link checks back
//! [`crate::entry_service::JournalEntryService`]. Keeping them free-standing
//! keeps them unit-testable without a store.

use uuid::Uuid;

use crate::{
  catalog::{CatalogItem, CatalogKind, NewCatalogItem, TypePolicy},
  error::{Error, Result},
  mood::{Mood, Valence},
};

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// True when `name` collides with none of `existing` (case-sensitive).
pub fn is_name_unique<'a>(
  name: &str,
  existing: impl IntoIterator<Item = &'a str>,
) -> bool {
  existing.into_iter().all(|e| e != name)
}

/// Find a catalog item by its id.
pub fn find_by_id(items: &[CatalogItem], id: Uuid) -> Option<&CatalogItem> {
  items.iter().find(|item| item.item_id == id)
}

/// Validate a whole batch of new items against the policy and the existing
/// catalog. All-or-nothing: the first violation fails the entire batch,
/// naming the offending item.
///
/// Checks, per item: non-empty name, non-empty whitelisted type, no name
/// collision with the existing catalog or with an earlier item in the batch.
pub fn validate_new_items(
  policy: &TypePolicy,
  kind: CatalogKind,
  existing: &[CatalogItem],
  batch: &[NewCatalogItem],
) -> Result<()> {
  for (index, item) in batch.iter().enumerate() {
    if item.name.is_empty() {
      return Err(Error::MissingItemField {
        name:  item.name.clone(),
        field: "name",
      });
    }
    if item.type_name.is_empty() {
      return Err(Error::MissingItemField {
        name:  item.name.clone(),
        field: "type",
      });
    }
    if !policy.allows(kind, &item.type_name) {
      return Err(Error::TypeNotAllowed {
        kind,
        type_name: item.type_name.clone(),
      });
    }

    let against_existing = existing.iter().map(|e| e.name.as_str());
    let against_batch = batch[..index].iter().map(|e| e.name.as_str());
    if !is_name_unique(&item.name, against_existing.chain(against_batch)) {
      return Err(Error::DuplicateName { kind, name: item.name.clone() });
    }
  }
  Ok(())
}

// ─── Linking ─────────────────────────────────────────────────────────────────

/// An entry may link out only when its own mood is unpleasant.
pub fn check_link_source(mood: Mood) -> Result<()> {
  match mood.valence() {
    Valence::Unpleasant => Ok(()),
    Valence::Pleasant => Err(Error::LinkFromPleasant),
  }
}

/// An entry may be linked *to* only when its mood is pleasant.
pub fn check_link_target(target_id: Uuid, target_mood: Mood) -> Result<()> {
  match target_mood.valence() {
    Valence::Pleasant => Ok(()),
    Valence::Unpleasant => Err(Error::LinkTargetUnpleasant(target_id)),
  }
}
