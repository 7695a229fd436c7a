//! Journal entry use-case service.
//!
//! # Responsibility
//! - Create/edit/delete/get/list of journal entries.
//! - The mood-based linking rule, at both create and edit.
//! - Ownership enforcement on every read and mutation of a single entry.
//!
//! # Access results
//! Operations whose target may be absent or owned by someone else resolve to
//! [`Outcome::Denied`] — one collapsed shape, so a caller cannot tell "not
//! found" from "not yours". Hard validation failures are `Err`. The settings
//! path deliberately differs (it raises `SettingsNotFound`); settings
//! existence is not an authorization boundary.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::{
  analytics::{AnalyticsSink, NullSink},
  cipher::FieldCipher,
  entry::{Entry, EntryDraft, EntryPatch},
  error::{Error, Result},
  identity::IdentityProvider,
  mood::Valence,
  store::JournalStore,
  validate,
};

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// Result of an ownership-sensitive operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
  Granted(T),
  /// The target does not exist or belongs to another user; the two cases
  /// are indistinguishable by design.
  Denied,
}

impl<T> Outcome<T> {
  pub fn is_denied(&self) -> bool {
    matches!(self, Self::Denied)
  }

  pub fn granted(self) -> Option<T> {
    match self {
      Self::Granted(value) => Some(value),
      Self::Denied => None,
    }
  }
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// Orchestrates the entry store, the linking validator, and the identity
/// provider.
pub struct JournalEntryService<S, I> {
  store:     Arc<S>,
  identity:  Arc<I>,
  cipher:    Option<Arc<dyn FieldCipher>>,
  analytics: Arc<dyn AnalyticsSink>,
}

impl<S, I> JournalEntryService<S, I>
where
  S: JournalStore,
  I: IdentityProvider,
{
  pub fn new(store: Arc<S>, identity: Arc<I>) -> Self {
    Self {
      store,
      identity,
      cipher: None,
      analytics: Arc::new(NullSink),
    }
  }

  pub fn with_cipher(mut self, cipher: Arc<dyn FieldCipher>) -> Self {
    self.cipher = Some(cipher);
    self
  }

  pub fn with_analytics(mut self, sink: Arc<dyn AnalyticsSink>) -> Self {
    self.analytics = sink;
    self
  }

  // ── Create ────────────────────────────────────────────────────────────

  /// Create a new entry. The linking rule is checked before the identity
  /// lookup so validation failures are reported even for unknown users.
  pub async fn create(
    &self,
    user_id: Uuid,
    draft: EntryDraft,
  ) -> Result<Outcome<Entry>> {
    if draft.emotion.trim().is_empty() {
      return Err(Error::EmptyField("emotion"));
    }
    if draft.text.trim().is_empty() {
      return Err(Error::EmptyField("text"));
    }
    if let Some(target_id) = draft.linked_entry {
      validate::check_link_source(draft.mood)?;
      let target = self
        .store
        .entry(target_id)
        .await
        .map_err(Error::store)?
        .ok_or(Error::LinkedEntryNotFound(target_id))?;
      validate::check_link_target(target_id, target.mood)?;
    }

    if !self
      .identity
      .verify_user(user_id)
      .await
      .map_err(Error::identity)?
    {
      return Ok(Outcome::Denied);
    }

    let mut draft = draft;
    if let Some(cipher) = &self.cipher {
      draft.emotion = cipher.seal(&draft.emotion).map_err(Error::Cipher)?;
      draft.text = cipher.seal(&draft.text).map_err(Error::Cipher)?;
    }

    let entry = self
      .store
      .insert_entry(user_id, draft)
      .await
      .map_err(Error::store)?;
    tracing::info!(%user_id, entry_id = %entry.entry_id, "entry created");
    self.analytics.track(
      "entry_created",
      user_id,
      json!({ "mood": entry.mood, "linked": entry.linked_entry.is_some() }),
    );
    Ok(Outcome::Granted(self.reveal(entry)?))
  }

  // ── Edit ──────────────────────────────────────────────────────────────

  /// Apply a partial update. The linking rule is re-checked against the
  /// *original* entry's mood, not an incoming mood patch. A mood patch that
  /// would flip a link target from pleasant to unpleasant is rejected while
  /// inbound links exist.
  pub async fn edit(
    &self,
    user_id: Uuid,
    entry_id: Uuid,
    patch: EntryPatch,
  ) -> Result<Outcome<Entry>> {
    let original = match self.store.entry(entry_id).await.map_err(Error::store)? {
      Some(entry) if entry.user_id == user_id => entry,
      _ => return Ok(Outcome::Denied),
    };

    if let Some(emotion) = &patch.emotion {
      if emotion.trim().is_empty() {
        return Err(Error::EmptyField("emotion"));
      }
    }
    if let Some(text) = &patch.text {
      if text.trim().is_empty() {
        return Err(Error::EmptyField("text"));
      }
    }

    if let Some(target_id) = patch.linked_entry {
      validate::check_link_source(original.mood)?;
      let target = self
        .store
        .entry(target_id)
        .await
        .map_err(Error::store)?
        .ok_or(Error::LinkedEntryNotFound(target_id))?;
      validate::check_link_target(target_id, target.mood)?;
    }

    if let Some(new_mood) = patch.mood {
      let flips_unpleasant = original.mood.valence() == Valence::Pleasant
        && new_mood.valence() == Valence::Unpleasant;
      if flips_unpleasant {
        let inbound = self
          .store
          .count_entries_linking_to(entry_id)
          .await
          .map_err(Error::store)?;
        if inbound > 0 {
          return Err(Error::LinkTargetMoodLocked(entry_id));
        }
      }
    }

    let mut updated = original;
    if let Some(mood) = patch.mood {
      updated.mood = mood;
    }
    if let Some(emotion) = patch.emotion {
      updated.emotion = self.seal(&emotion)?;
    }
    if let Some(text) = patch.text {
      updated.text = self.seal(&text)?;
    }
    if let Some(activities) = patch.activities {
      updated.activities = activities;
    }
    if let Some(tags) = patch.tags {
      updated.tags = tags;
    }
    if let Some(target_id) = patch.linked_entry {
      updated.linked_entry = Some(target_id);
    }
    updated.updated_at = Some(Utc::now());

    self
      .store
      .update_entry(updated.clone())
      .await
      .map_err(Error::store)?;
    tracing::info!(%user_id, %entry_id, "entry edited");
    self
      .analytics
      .track("entry_edited", user_id, json!({ "entry_id": entry_id }));
    Ok(Outcome::Granted(self.reveal(updated)?))
  }

  // ── Delete ────────────────────────────────────────────────────────────

  /// Delete an entry. Returns the deleted id, or `Denied` when the entry is
  /// absent or foreign-owned.
  pub async fn delete(
    &self,
    user_id: Uuid,
    entry_id: Uuid,
  ) -> Result<Outcome<Uuid>> {
    match self.store.entry(entry_id).await.map_err(Error::store)? {
      Some(entry) if entry.user_id == user_id => {}
      _ => return Ok(Outcome::Denied),
    }

    self
      .store
      .delete_entry(entry_id)
      .await
      .map_err(Error::store)?;
    tracing::info!(%user_id, %entry_id, "entry deleted");
    self
      .analytics
      .track("entry_deleted", user_id, json!({ "entry_id": entry_id }));
    Ok(Outcome::Granted(entry_id))
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All of the user's entries, newest-first. `Denied` when the identity
  /// provider does not know the user.
  pub async fn entries(&self, user_id: Uuid) -> Result<Outcome<Vec<Entry>>> {
    if !self
      .identity
      .verify_user(user_id)
      .await
      .map_err(Error::identity)?
    {
      return Ok(Outcome::Denied);
    }

    let entries = self
      .store
      .entries_for_user(user_id)
      .await
      .map_err(Error::store)?
      .into_iter()
      .map(|entry| self.reveal(entry))
      .collect::<Result<Vec<_>>>()?;
    Ok(Outcome::Granted(entries))
  }

  /// One entry by id, owner-checked.
  pub async fn entry(
    &self,
    user_id: Uuid,
    entry_id: Uuid,
  ) -> Result<Outcome<Entry>> {
    match self.store.entry(entry_id).await.map_err(Error::store)? {
      Some(entry) if entry.user_id == user_id => {
        Ok(Outcome::Granted(self.reveal(entry)?))
      }
      _ => Ok(Outcome::Denied),
    }
  }

  // ── Cipher plumbing ───────────────────────────────────────────────────

  fn seal(&self, field: &str) -> Result<String> {
    match &self.cipher {
      Some(cipher) => cipher.seal(field).map_err(Error::Cipher),
      None => Ok(field.to_owned()),
    }
  }

  fn reveal(&self, mut entry: Entry) -> Result<Entry> {
    if let Some(cipher) = &self.cipher {
      entry.emotion = cipher.open(&entry.emotion).map_err(Error::Cipher)?;
      entry.text = cipher.open(&entry.text).map_err(Error::Cipher)?;
    }
    Ok(entry)
  }
}
