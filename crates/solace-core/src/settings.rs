//! The per-user Settings aggregate.
//!
//! Exactly zero or one Settings exists per user (the store enforces a
//! uniqueness constraint on `user_id`). The aggregate is created lazily on
//! the first settings write and is never deleted by this core; user deletion
//! is the identity provider's concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{CatalogItem, CatalogKind};

/// One user's settings document: both catalogs plus the setup flag and the
/// reflection alert time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
  pub user_id:          Uuid,
  pub tags:             Vec<CatalogItem>,
  pub activities:       Vec<CatalogItem>,
  pub setup_complete:   bool,
  pub reflection_alert: Option<DateTime<Utc>>,
}

impl Settings {
  /// A freshly-created aggregate with empty catalogs.
  pub fn empty(user_id: Uuid) -> Self {
    Self {
      user_id,
      tags: Vec::new(),
      activities: Vec::new(),
      setup_complete: false,
      reflection_alert: None,
    }
  }

  /// The catalog that `kind` selects.
  pub fn catalog(&self, kind: CatalogKind) -> &[CatalogItem] {
    match kind {
      CatalogKind::Tag => &self.tags,
      CatalogKind::Activity => &self.activities,
    }
  }
}
