//! Journal entry types.
//!
//! An entry's `tags` and `activities` are snapshots of catalog items taken at
//! attach time — the item id plus its name and type as they were then — so an
//! entry stays readable after the catalog evolves. The optional `linked_entry`
//! points an unpleasant entry at a pleasant one, used to surface a coping
//! suggestion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{catalog::CatalogItem, mood::Mood};

/// A stored journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
  pub entry_id:     Uuid,
  pub user_id:      Uuid,
  pub mood:         Mood,
  pub emotion:      String,
  pub text:         String,
  pub activities:   Vec<CatalogItem>,
  pub tags:         Vec<CatalogItem>,
  /// May only reference a pleasant entry, and only from an unpleasant one.
  pub linked_entry: Option<Uuid>,
  /// Server-assigned; never changes after creation.
  pub created_at:   DateTime<Utc>,
  pub updated_at:   Option<DateTime<Utc>>,
}

/// Input to [`crate::entry_service::JournalEntryService::create`].
/// `entry_id` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct EntryDraft {
  pub mood:         Mood,
  pub emotion:      String,
  pub text:         String,
  pub activities:   Vec<CatalogItem>,
  pub tags:         Vec<CatalogItem>,
  pub linked_entry: Option<Uuid>,
}

impl EntryDraft {
  /// Convenience constructor with no classifications and no link.
  pub fn new(
    mood: Mood,
    emotion: impl Into<String>,
    text: impl Into<String>,
  ) -> Self {
    Self {
      mood,
      emotion: emotion.into(),
      text: text.into(),
      activities: Vec::new(),
      tags: Vec::new(),
      linked_entry: None,
    }
  }

  pub fn linked_to(mut self, entry_id: Uuid) -> Self {
    self.linked_entry = Some(entry_id);
    self
  }
}

/// Partial update for [`crate::entry_service::JournalEntryService::edit`].
/// Supplied fields replace the stored values; omitted fields are retained.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
  pub mood:         Option<Mood>,
  pub emotion:      Option<String>,
  pub text:         Option<String>,
  pub activities:   Option<Vec<CatalogItem>>,
  pub tags:         Option<Vec<CatalogItem>>,
  pub linked_entry: Option<Uuid>,
}
