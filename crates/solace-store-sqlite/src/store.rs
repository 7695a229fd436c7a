//! [`SqliteStore`] — the SQLite implementation of [`JournalStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use solace_core::{
  catalog::{CatalogItem, CatalogKind, NewCatalogItem},
  entry::{Entry, EntryDraft},
  settings::Settings,
  store::JournalStore,
};

use crate::{
  encode::{
    encode_dt, encode_items, encode_mood, encode_uuid, RawEntry, RawSettings,
  },
  schema::SCHEMA,
  Error, Result,
};

/// The SQL column holding the catalog of `kind`.
fn catalog_column(kind: CatalogKind) -> &'static str {
  match kind {
    CatalogKind::Tag => "tags",
    CatalogKind::Activity => "activities",
  }
}

fn other(e: impl std::error::Error + Send + Sync + 'static) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(e))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Solace journal store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch the raw settings row for a user.
  async fn settings_row(&self, user_id: Uuid) -> Result<Option<RawSettings>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawSettings> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, setup_complete, reflection_alert, tags, activities
               FROM settings WHERE user_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawSettings {
                  user_id:          row.get(0)?,
                  setup_complete:   row.get(1)?,
                  reflection_alert: row.get(2)?,
                  tags:             row.get(3)?,
                  activities:       row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw)
  }

  /// Insert a fully-built [`Entry`] into the `entries` table.
  async fn insert_entry_row(&self, entry: &Entry) -> Result<()> {
    let entry_id_str = encode_uuid(entry.entry_id);
    let user_id_str  = encode_uuid(entry.user_id);
    let mood_str     = encode_mood(entry.mood);
    let emotion      = entry.emotion.clone();
    let body         = entry.text.clone();
    let activities   = encode_items(&entry.activities)?;
    let tags         = encode_items(&entry.tags)?;
    let linked_str   = entry.linked_entry.map(encode_uuid);
    let created_str  = encode_dt(entry.created_at);
    let updated_str  = entry.updated_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO entries (
             entry_id, user_id, mood, emotion, body,
             activities, tags, linked_entry, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            entry_id_str,
            user_id_str,
            mood_str,
            emotion,
            body,
            activities,
            tags,
            linked_str,
            created_str,
            updated_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── JournalStore impl ───────────────────────────────────────────────────────

impl JournalStore for SqliteStore {
  type Error = Error;

  // ── Settings ──────────────────────────────────────────────────────────────

  async fn settings(&self, user_id: Uuid) -> Result<Option<Settings>> {
    self
      .settings_row(user_id)
      .await?
      .map(RawSettings::into_settings)
      .transpose()
  }

  async fn ensure_settings(&self, user_id: Uuid) -> Result<Settings> {
    let id_str = encode_uuid(user_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO settings (user_id) VALUES (?1)",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;

    match self.settings(user_id).await? {
      Some(settings) => Ok(settings),
      // The row was just inserted; a miss here means it was deleted from
      // under us, which the aggregate's lifecycle rules out.
      None => Ok(Settings::empty(user_id)),
    }
  }

  async fn append_catalog_items(
    &self,
    user_id: Uuid,
    kind: CatalogKind,
    items: Vec<NewCatalogItem>,
  ) -> Result<Vec<CatalogItem>> {
    let assigned: Vec<CatalogItem> = items
      .into_iter()
      .map(|item| CatalogItem {
        item_id:   Uuid::new_v4(),
        name:      item.name,
        type_name: item.type_name,
      })
      .collect();

    let id_str = encode_uuid(user_id);
    let column = catalog_column(kind);
    let to_append = assigned.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO settings (user_id) VALUES (?1)",
          rusqlite::params![id_str],
        )?;

        let current: String = conn.query_row(
          &format!("SELECT {column} FROM settings WHERE user_id = ?1"),
          rusqlite::params![id_str],
          |row| row.get(0),
        )?;

        let mut array: Vec<CatalogItem> =
          serde_json::from_str(&current).map_err(other)?;
        array.extend(to_append);
        let encoded = serde_json::to_string(&array).map_err(other)?;

        conn.execute(
          &format!("UPDATE settings SET {column} = ?2 WHERE user_id = ?1"),
          rusqlite::params![id_str, encoded],
        )?;
        Ok(())
      })
      .await?;

    Ok(assigned)
  }

  async fn replace_catalog_item(
    &self,
    user_id: Uuid,
    kind: CatalogKind,
    item: CatalogItem,
  ) -> Result<()> {
    let id_str = encode_uuid(user_id);
    let column = catalog_column(kind);
    let item_id = item.item_id;

    let replaced: bool = self
      .conn
      .call(move |conn| {
        let current: Option<String> = conn
          .query_row(
            &format!("SELECT {column} FROM settings WHERE user_id = ?1"),
            rusqlite::params![id_str],
            |row| row.get(0),
          )
          .optional()?;
        let Some(current) = current else { return Ok(false) };

        let mut array: Vec<CatalogItem> =
          serde_json::from_str(&current).map_err(other)?;
        let Some(slot) =
          array.iter_mut().find(|i| i.item_id == item.item_id)
        else {
          return Ok(false);
        };
        *slot = item;

        let encoded = serde_json::to_string(&array).map_err(other)?;
        conn.execute(
          &format!("UPDATE settings SET {column} = ?2 WHERE user_id = ?1"),
          rusqlite::params![id_str, encoded],
        )?;
        Ok(true)
      })
      .await?;

    if replaced { Ok(()) } else { Err(Error::ItemNotFound(item_id)) }
  }

  async fn remove_catalog_items(
    &self,
    user_id: Uuid,
    kind: CatalogKind,
    ids: Vec<Uuid>,
  ) -> Result<()> {
    let id_str = encode_uuid(user_id);
    let column = catalog_column(kind);

    self
      .conn
      .call(move |conn| {
        let current: Option<String> = conn
          .query_row(
            &format!("SELECT {column} FROM settings WHERE user_id = ?1"),
            rusqlite::params![id_str],
            |row| row.get(0),
          )
          .optional()?;
        let Some(current) = current else { return Ok(()) };

        let mut array: Vec<CatalogItem> =
          serde_json::from_str(&current).map_err(other)?;
        array.retain(|item| !ids.contains(&item.item_id));

        let encoded = serde_json::to_string(&array).map_err(other)?;
        conn.execute(
          &format!("UPDATE settings SET {column} = ?2 WHERE user_id = ?1"),
          rusqlite::params![id_str, encoded],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn set_setup_complete(
    &self,
    user_id: Uuid,
    complete: bool,
  ) -> Result<()> {
    let id_str = encode_uuid(user_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE settings SET setup_complete = ?2 WHERE user_id = ?1",
          rusqlite::params![id_str, complete],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn set_reflection_alert(
    &self,
    user_id: Uuid,
    when: DateTime<Utc>,
  ) -> Result<()> {
    let id_str = encode_uuid(user_id);
    let when_str = encode_dt(when);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO settings (user_id) VALUES (?1)",
          rusqlite::params![id_str],
        )?;
        conn.execute(
          "UPDATE settings SET reflection_alert = ?2 WHERE user_id = ?1",
          rusqlite::params![id_str, when_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Entries ───────────────────────────────────────────────────────────────

  async fn insert_entry(
    &self,
    user_id: Uuid,
    draft: EntryDraft,
  ) -> Result<Entry> {
    let entry = Entry {
      entry_id:     Uuid::new_v4(),
      user_id,
      mood:         draft.mood,
      emotion:      draft.emotion,
      text:         draft.text,
      activities:   draft.activities,
      tags:         draft.tags,
      linked_entry: draft.linked_entry,
      created_at:   Utc::now(),
      updated_at:   None,
    };

    self.insert_entry_row(&entry).await?;
    Ok(entry)
  }

  async fn entry(&self, entry_id: Uuid) -> Result<Option<Entry>> {
    let id_str = encode_uuid(entry_id);

    let raw: Option<RawEntry> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT entry_id, user_id, mood, emotion, body,
                      activities, tags, linked_entry, created_at, updated_at
               FROM entries WHERE entry_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawEntry {
                  entry_id:     row.get(0)?,
                  user_id:      row.get(1)?,
                  mood:         row.get(2)?,
                  emotion:      row.get(3)?,
                  body:         row.get(4)?,
                  activities:   row.get(5)?,
                  tags:         row.get(6)?,
                  linked_entry: row.get(7)?,
                  created_at:   row.get(8)?,
                  updated_at:   row.get(9)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEntry::into_entry).transpose()
  }

  async fn update_entry(&self, entry: Entry) -> Result<()> {
    let entry_id     = entry.entry_id;
    let entry_id_str = encode_uuid(entry.entry_id);
    let mood_str     = encode_mood(entry.mood);
    let emotion      = entry.emotion;
    let body         = entry.text;
    let activities   = encode_items(&entry.activities)?;
    let tags         = encode_items(&entry.tags)?;
    let linked_str   = entry.linked_entry.map(encode_uuid);
    let updated_str  = entry.updated_at.map(encode_dt);

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE entries
           SET mood = ?2, emotion = ?3, body = ?4, activities = ?5,
               tags = ?6, linked_entry = ?7, updated_at = ?8
           WHERE entry_id = ?1",
          rusqlite::params![
            entry_id_str,
            mood_str,
            emotion,
            body,
            activities,
            tags,
            linked_str,
            updated_str,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::EntryNotFound(entry_id));
    }
    Ok(())
  }

  async fn delete_entry(&self, entry_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(entry_id);

    let removed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM entries WHERE entry_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(removed > 0)
  }

  async fn entries_for_user(&self, user_id: Uuid) -> Result<Vec<Entry>> {
    let id_str = encode_uuid(user_id);

    let raws: Vec<RawEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT entry_id, user_id, mood, emotion, body,
                  activities, tags, linked_entry, created_at, updated_at
           FROM entries WHERE user_id = ?1
           ORDER BY created_at DESC, entry_id ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawEntry {
              entry_id:     row.get(0)?,
              user_id:      row.get(1)?,
              mood:         row.get(2)?,
              emotion:      row.get(3)?,
              body:         row.get(4)?,
              activities:   row.get(5)?,
              tags:         row.get(6)?,
              linked_entry: row.get(7)?,
              created_at:   row.get(8)?,
              updated_at:   row.get(9)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntry::into_entry).collect()
  }

  async fn count_entries_referencing(&self, item_id: Uuid) -> Result<u64> {
    // LIKE over the JSON snapshot columns; the hyphenated UUID is specific
    // enough not to collide with other column content.
    let pattern = format!("%{}%", encode_uuid(item_id));

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM entries
           WHERE tags LIKE ?1 OR activities LIKE ?1",
          rusqlite::params![pattern],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as u64)
  }

  async fn count_entries_linking_to(&self, entry_id: Uuid) -> Result<u64> {
    let id_str = encode_uuid(entry_id);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM entries WHERE linked_entry = ?1",
          rusqlite::params![id_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as u64)
  }
}
