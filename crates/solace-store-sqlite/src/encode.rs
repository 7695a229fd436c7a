//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Catalog snapshots are
//! stored as compact JSON arrays. Moods are stored as their display literals.
//! UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use solace_core::{
  catalog::CatalogItem,
  entry::Entry,
  mood::Mood,
  settings::Settings,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Mood ────────────────────────────────────────────────────────────────────

pub fn encode_mood(mood: Mood) -> String { mood.to_string() }

pub fn decode_mood(s: &str) -> Result<Mood> {
  s.parse().map_err(|_| Error::MoodParse(s.to_owned()))
}

// ─── Catalog item arrays ─────────────────────────────────────────────────────

pub fn encode_items(items: &[CatalogItem]) -> Result<String> {
  Ok(serde_json::to_string(items)?)
}

pub fn decode_items(s: &str) -> Result<Vec<CatalogItem>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `settings` row.
pub struct RawSettings {
  pub user_id:          String,
  pub setup_complete:   bool,
  pub reflection_alert: Option<String>,
  pub tags:             String,
  pub activities:       String,
}

impl RawSettings {
  pub fn into_settings(self) -> Result<Settings> {
    Ok(Settings {
      user_id:          decode_uuid(&self.user_id)?,
      tags:             decode_items(&self.tags)?,
      activities:       decode_items(&self.activities)?,
      setup_complete:   self.setup_complete,
      reflection_alert: self
        .reflection_alert
        .as_deref()
        .map(decode_dt)
        .transpose()?,
    })
  }
}

/// Raw strings read directly from an `entries` row.
pub struct RawEntry {
  pub entry_id:     String,
  pub user_id:      String,
  pub mood:         String,
  pub emotion:      String,
  pub body:         String,
  pub activities:   String,
  pub tags:         String,
  pub linked_entry: Option<String>,
  pub created_at:   String,
  pub updated_at:   Option<String>,
}

impl RawEntry {
  pub fn into_entry(self) -> Result<Entry> {
    Ok(Entry {
      entry_id:     decode_uuid(&self.entry_id)?,
      user_id:      decode_uuid(&self.user_id)?,
      mood:         decode_mood(&self.mood)?,
      emotion:      self.emotion,
      text:         self.body,
      activities:   decode_items(&self.activities)?,
      tags:         decode_items(&self.tags)?,
      linked_entry: self
        .linked_entry
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   self.updated_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}
