//! Catalog items — the named, typed classifications a user attaches to
//! journal entries.
//!
//! Tags and activities share one item shape and differ only in which embedded
//! array they live in and which type whitelist applies. The whitelists are an
//! open enumeration carried by [`TypePolicy`] rather than hard-coded match
//! arms, so domain values can evolve without code changes.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

// ─── Kind ────────────────────────────────────────────────────────────────────

/// Which of the two per-user catalogs an operation targets.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CatalogKind {
  Tag,
  Activity,
}

// ─── Items ───────────────────────────────────────────────────────────────────

/// A stored catalog item. The id is assigned by the store on insertion and is
/// immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
  pub item_id:   Uuid,
  /// Unique (case-sensitive) within the owning catalog.
  pub name:      String,
  /// Always a member of the kind's type whitelist.
  pub type_name: String,
}

/// Input to [`crate::catalog_service::SettingsCatalogService::add_items`].
/// The id is never accepted from callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCatalogItem {
  pub name:      String,
  pub type_name: String,
}

impl NewCatalogItem {
  pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
    Self { name: name.into(), type_name: type_name.into() }
  }
}

/// Partial update for [`crate::catalog_service::SettingsCatalogService::edit_item`].
/// At least one field must be supplied; the id is immutable.
#[derive(Debug, Clone, Default)]
pub struct CatalogPatch {
  pub name:      Option<String>,
  pub type_name: Option<String>,
}

impl CatalogPatch {
  pub fn rename(name: impl Into<String>) -> Self {
    Self { name: Some(name.into()), ..Self::default() }
  }

  pub fn retype(type_name: impl Into<String>) -> Self {
    Self { type_name: Some(type_name.into()), ..Self::default() }
  }

  pub fn is_empty(&self) -> bool {
    self.name.is_none() && self.type_name.is_none()
  }
}

// ─── Type policy ─────────────────────────────────────────────────────────────

/// The configurable type whitelists, one per catalog kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypePolicy {
  tag_types:      Vec<String>,
  activity_types: Vec<String>,
}

impl Default for TypePolicy {
  fn default() -> Self {
    Self {
      tag_types:      vec![
        "General Activity".to_owned(),
        "Soothing Activity".to_owned(),
      ],
      activity_types: vec!["Soothing".to_owned()],
    }
  }
}

impl TypePolicy {
  pub fn new(
    tag_types: impl IntoIterator<Item = String>,
    activity_types: impl IntoIterator<Item = String>,
  ) -> Self {
    Self {
      tag_types:      tag_types.into_iter().collect(),
      activity_types: activity_types.into_iter().collect(),
    }
  }

  /// The whitelist that applies to `kind`.
  pub fn types_for(&self, kind: CatalogKind) -> &[String] {
    match kind {
      CatalogKind::Tag => &self.tag_types,
      CatalogKind::Activity => &self.activity_types,
    }
  }

  pub fn allows(&self, kind: CatalogKind, type_name: &str) -> bool {
    self.types_for(kind).iter().any(|t| t == type_name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_policy_carries_the_stock_whitelists() {
    let policy = TypePolicy::default();
    assert!(policy.allows(CatalogKind::Tag, "General Activity"));
    assert!(policy.allows(CatalogKind::Tag, "Soothing Activity"));
    assert!(policy.allows(CatalogKind::Activity, "Soothing"));
  }

  #[test]
  fn whitelists_do_not_bleed_across_kinds() {
    let policy = TypePolicy::default();
    assert!(!policy.allows(CatalogKind::Activity, "General Activity"));
    assert!(!policy.allows(CatalogKind::Tag, "Soothing"));
  }

  #[test]
  fn membership_is_case_sensitive() {
    let policy = TypePolicy::default();
    assert!(!policy.allows(CatalogKind::Tag, "general activity"));
  }

  #[test]
  fn custom_policy_replaces_the_defaults() {
    let policy = TypePolicy::new(
      ["Focus".to_owned(), "Rest".to_owned()],
      ["Movement".to_owned()],
    );
    assert!(policy.allows(CatalogKind::Tag, "Focus"));
    assert!(!policy.allows(CatalogKind::Tag, "General Activity"));
    assert!(policy.allows(CatalogKind::Activity, "Movement"));
  }

  #[test]
  fn kind_display_is_lowercase() {
    assert_eq!(CatalogKind::Tag.to_string(), "tag");
    assert_eq!(CatalogKind::Activity.to_string(), "activity");
  }
}
