//! Integration tests for `SqliteStore` and the two core services against an
//! in-memory database.

use std::sync::Arc;
use std::time::Duration;

use solace_core::{
  catalog::{CatalogKind, CatalogPatch, NewCatalogItem, TypePolicy},
  catalog_service::SettingsCatalogService,
  cipher::FieldCipher,
  entry::{EntryDraft, EntryPatch},
  entry_service::{JournalEntryService, Outcome},
  error::BoxError,
  identity::{AllowAll, StaticDirectory},
  mood::Mood,
  store::JournalStore,
  Error,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn catalog_service() -> SettingsCatalogService<SqliteStore> {
  SettingsCatalogService::new(Arc::new(store().await))
}

fn entry_service(
  store: SqliteStore,
) -> JournalEntryService<SqliteStore, AllowAll> {
  JournalEntryService::new(Arc::new(store), Arc::new(AllowAll))
}

fn tag(name: &str) -> NewCatalogItem {
  NewCatalogItem::new(name, "General Activity")
}

fn granted<T>(outcome: Outcome<T>) -> T {
  outcome.granted().expect("operation unexpectedly denied")
}

// ─── Store: settings ─────────────────────────────────────────────────────────

#[tokio::test]
async fn settings_missing_returns_none() {
  let s = store().await;
  let result = s.settings(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn ensure_settings_is_idempotent() {
  let s = store().await;
  let user = Uuid::new_v4();

  let first = s.ensure_settings(user).await.unwrap();
  assert_eq!(first.user_id, user);
  assert!(first.tags.is_empty());
  assert!(!first.setup_complete);

  s.set_setup_complete(user, true).await.unwrap();
  let second = s.ensure_settings(user).await.unwrap();
  assert!(second.setup_complete, "ensure must not reset the aggregate");
}

#[tokio::test]
async fn append_assigns_distinct_ids() {
  let s = store().await;
  let user = Uuid::new_v4();

  let stored = s
    .append_catalog_items(user, CatalogKind::Tag, vec![tag("Home"), tag("Work")])
    .await
    .unwrap();
  assert_eq!(stored.len(), 2);
  assert_ne!(stored[0].item_id, stored[1].item_id);

  let settings = s.settings(user).await.unwrap().unwrap();
  assert_eq!(settings.tags, stored);
  assert!(settings.activities.is_empty());
}

#[tokio::test]
async fn replace_missing_item_errors() {
  let s = store().await;
  let user = Uuid::new_v4();
  s.ensure_settings(user).await.unwrap();

  let ghost = solace_core::catalog::CatalogItem {
    item_id:   Uuid::new_v4(),
    name:      "Ghost".into(),
    type_name: "General Activity".into(),
  };
  let err = s
    .replace_catalog_item(user, CatalogKind::Tag, ghost)
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::ItemNotFound(_)));
}

// ─── Store: entries ──────────────────────────────────────────────────────────

#[tokio::test]
async fn entry_missing_returns_none() {
  let s = store().await;
  assert!(s.entry(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn entries_for_user_newest_first() {
  let s = store().await;
  let user = Uuid::new_v4();

  let mut ids = Vec::new();
  for text in ["first", "second", "third"] {
    let entry = s
      .insert_entry(user, EntryDraft::new(Mood::LowEnergyPleasant, "Calm", text))
      .await
      .unwrap();
    ids.push(entry.entry_id);
    tokio::time::sleep(Duration::from_millis(3)).await;
  }

  let listed = s.entries_for_user(user).await.unwrap();
  assert_eq!(listed.len(), 3);
  assert_eq!(listed[0].entry_id, ids[2]);
  assert_eq!(listed[2].entry_id, ids[0]);
}

#[tokio::test]
async fn update_missing_entry_errors() {
  let s = store().await;
  let user = Uuid::new_v4();
  let mut entry = s
    .insert_entry(user, EntryDraft::new(Mood::LowEnergyPleasant, "Calm", "x"))
    .await
    .unwrap();
  assert!(s.delete_entry(entry.entry_id).await.unwrap());

  entry.text = "edited".into();
  let err = s.update_entry(entry).await.unwrap_err();
  assert!(matches!(err, crate::Error::EntryNotFound(_)));
}

// ─── Catalog service: add ────────────────────────────────────────────────────

#[tokio::test]
async fn add_items_creates_settings_lazily() {
  let svc = catalog_service().await;
  let user = Uuid::new_v4();

  let stored = svc
    .add_items(user, CatalogKind::Tag, vec![tag("Home")])
    .await
    .unwrap();
  assert_eq!(stored.len(), 1);
  assert_eq!(stored[0].name, "Home");

  let listed = svc.list_items(user, CatalogKind::Tag).await.unwrap();
  assert_eq!(listed, stored);
}

#[tokio::test]
async fn add_items_rejects_duplicate_against_existing() {
  let svc = catalog_service().await;
  let user = Uuid::new_v4();

  svc
    .add_items(user, CatalogKind::Tag, vec![tag("Home")])
    .await
    .unwrap();
  let err = svc
    .add_items(user, CatalogKind::Tag, vec![tag("Home")])
    .await
    .unwrap_err();
  assert!(
    matches!(err, Error::DuplicateName { ref name, .. } if name == "Home")
  );
}

#[tokio::test]
async fn add_items_is_all_or_nothing() {
  let svc = catalog_service().await;
  let user = Uuid::new_v4();

  svc
    .add_items(user, CatalogKind::Tag, vec![tag("Home")])
    .await
    .unwrap();

  // Second item's type is off-whitelist; the valid first item must not land.
  let err = svc
    .add_items(
      user,
      CatalogKind::Tag,
      vec![tag("Work"), NewCatalogItem::new("Nap", "Soothing")],
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::TypeNotAllowed { .. }));

  let listed = svc.list_items(user, CatalogKind::Tag).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].name, "Home");
}

#[tokio::test]
async fn add_items_respects_custom_policy() {
  let svc = SettingsCatalogService::new(Arc::new(store().await))
    .with_policy(TypePolicy::new(["Focus".to_owned()], ["Movement".to_owned()]));
  let user = Uuid::new_v4();

  svc
    .add_items(
      user,
      CatalogKind::Activity,
      vec![NewCatalogItem::new("Run", "Movement")],
    )
    .await
    .unwrap();
  let err = svc
    .add_items(
      user,
      CatalogKind::Activity,
      vec![NewCatalogItem::new("Bath", "Soothing")],
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::TypeNotAllowed { .. }));
}

#[tokio::test]
async fn concurrent_add_items_cannot_both_claim_a_name() {
  let svc = catalog_service().await;
  let user = Uuid::new_v4();

  let (a, b) = tokio::join!(
    svc.add_items(user, CatalogKind::Tag, vec![tag("Home")]),
    svc.add_items(user, CatalogKind::Tag, vec![tag("Home")]),
  );
  assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1, "exactly one add wins");

  let listed = svc.list_items(user, CatalogKind::Tag).await.unwrap();
  assert_eq!(listed.len(), 1);
}

// ─── Catalog service: edit ───────────────────────────────────────────────────

#[tokio::test]
async fn edit_item_rename_keeps_type() {
  let svc = catalog_service().await;
  let user = Uuid::new_v4();
  let stored = svc
    .add_items(user, CatalogKind::Tag, vec![tag("Home")])
    .await
    .unwrap();

  let updated = svc
    .edit_item(
      user,
      CatalogKind::Tag,
      stored[0].item_id,
      CatalogPatch::rename("Household"),
    )
    .await
    .unwrap();
  assert_eq!(updated.name, "Household");
  assert_eq!(updated.type_name, "General Activity");
  assert_eq!(updated.item_id, stored[0].item_id);

  let listed = svc.list_items(user, CatalogKind::Tag).await.unwrap();
  assert_eq!(listed, vec![updated]);
}

#[tokio::test]
async fn edit_item_retype_keeps_name() {
  let svc = catalog_service().await;
  let user = Uuid::new_v4();
  let stored = svc
    .add_items(user, CatalogKind::Tag, vec![tag("Bath")])
    .await
    .unwrap();

  let updated = svc
    .edit_item(
      user,
      CatalogKind::Tag,
      stored[0].item_id,
      CatalogPatch::retype("Soothing Activity"),
    )
    .await
    .unwrap();
  assert_eq!(updated.name, "Bath");
  assert_eq!(updated.type_name, "Soothing Activity");
}

#[tokio::test]
async fn edit_item_rename_onto_other_item_conflicts() {
  let svc = catalog_service().await;
  let user = Uuid::new_v4();
  let stored = svc
    .add_items(
      user,
      CatalogKind::Activity,
      vec![
        NewCatalogItem::new("Running", "Soothing"),
        NewCatalogItem::new("Walking", "Soothing"),
      ],
    )
    .await
    .unwrap();

  let err = svc
    .edit_item(
      user,
      CatalogKind::Activity,
      stored[1].item_id,
      CatalogPatch::rename("Running"),
    )
    .await
    .unwrap_err();
  assert!(
    matches!(err, Error::DuplicateName { ref name, .. } if name == "Running")
  );
}

#[tokio::test]
async fn edit_item_rename_onto_own_name_is_a_noop() {
  let svc = catalog_service().await;
  let user = Uuid::new_v4();
  let stored = svc
    .add_items(
      user,
      CatalogKind::Activity,
      vec![NewCatalogItem::new("Running", "Soothing")],
    )
    .await
    .unwrap();

  let updated = svc
    .edit_item(
      user,
      CatalogKind::Activity,
      stored[0].item_id,
      CatalogPatch::rename("Running"),
    )
    .await
    .unwrap();
  assert_eq!(updated, stored[0]);
}

#[tokio::test]
async fn edit_item_requires_at_least_one_field() {
  let svc = catalog_service().await;
  let user = Uuid::new_v4();
  let stored = svc
    .add_items(user, CatalogKind::Tag, vec![tag("Home")])
    .await
    .unwrap();

  let err = svc
    .edit_item(user, CatalogKind::Tag, stored[0].item_id, CatalogPatch::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EmptyPatch));
}

#[tokio::test]
async fn edit_missing_item_errors() {
  let svc = catalog_service().await;
  let user = Uuid::new_v4();
  svc
    .add_items(user, CatalogKind::Tag, vec![tag("Home")])
    .await
    .unwrap();

  let err = svc
    .edit_item(user, CatalogKind::Tag, Uuid::new_v4(), CatalogPatch::rename("X"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ItemNotFound { .. }));
}

// ─── Catalog service: delete ─────────────────────────────────────────────────

#[tokio::test]
async fn delete_items_removes_all_listed_ids() {
  let svc = catalog_service().await;
  let user = Uuid::new_v4();
  let stored = svc
    .add_items(
      user,
      CatalogKind::Tag,
      vec![tag("Home"), tag("Work"), tag("Garden")],
    )
    .await
    .unwrap();

  svc
    .delete_items(
      user,
      CatalogKind::Tag,
      vec![stored[0].item_id, stored[2].item_id],
    )
    .await
    .unwrap();

  let listed = svc.list_items(user, CatalogKind::Tag).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].name, "Work");
}

#[tokio::test]
async fn delete_items_with_unknown_id_removes_nothing() {
  let svc = catalog_service().await;
  let user = Uuid::new_v4();
  let stored = svc
    .add_items(user, CatalogKind::Tag, vec![tag("Home")])
    .await
    .unwrap();

  let ghost = Uuid::new_v4();
  let err = svc
    .delete_items(user, CatalogKind::Tag, vec![stored[0].item_id, ghost])
    .await
    .unwrap_err();
  assert!(
    matches!(err, Error::ItemNotFound { item_id, .. } if item_id == ghost)
  );

  let listed = svc.list_items(user, CatalogKind::Tag).await.unwrap();
  assert_eq!(listed.len(), 1, "failed delete must not remove anything");
}

// ─── Catalog service: setup status & reflection alert ────────────────────────

#[tokio::test]
async fn setup_status_round_trips() {
  let svc = catalog_service().await;
  let user = Uuid::new_v4();
  svc
    .add_items(user, CatalogKind::Tag, vec![tag("Home")])
    .await
    .unwrap();

  assert!(!svc.setup_status(user).await.unwrap());
  svc.set_setup_status(user, true).await.unwrap();
  assert!(svc.setup_status(user).await.unwrap());
  svc.set_setup_status(user, false).await.unwrap();
  assert!(!svc.setup_status(user).await.unwrap());
}

#[tokio::test]
async fn setup_status_requires_existing_settings() {
  let svc = catalog_service().await;
  let user = Uuid::new_v4();

  let err = svc.setup_status(user).await.unwrap_err();
  assert!(matches!(err, Error::SettingsNotFound(u) if u == user));

  let err = svc.set_setup_status(user, true).await.unwrap_err();
  assert!(matches!(err, Error::SettingsNotFound(u) if u == user));
}

#[tokio::test]
async fn reflection_alert_creates_settings_lazily() {
  let svc = catalog_service().await;
  let user = Uuid::new_v4();
  let when = chrono::Utc::now();

  svc.set_reflection_alert(user, when).await.unwrap();
  let settings = svc.settings(user).await.unwrap();
  assert_eq!(settings.reflection_alert, Some(when));
  assert!(settings.tags.is_empty());
}

// ─── Catalog service: in-use check ───────────────────────────────────────────

#[tokio::test]
async fn item_in_use_follows_referencing_entries() {
  let s = store().await;
  let catalog = SettingsCatalogService::new(Arc::new(s.clone()));
  let journal = entry_service(s);
  let user = Uuid::new_v4();

  let stored = catalog
    .add_items(user, CatalogKind::Tag, vec![tag("Home")])
    .await
    .unwrap();
  let item = stored[0].clone();

  assert!(
    !catalog
      .item_in_use(user, CatalogKind::Tag, item.item_id)
      .await
      .unwrap()
  );

  let mut draft = EntryDraft::new(Mood::LowEnergyPleasant, "Calm", "home day");
  draft.tags = vec![item.clone()];
  let entry = granted(journal.create(user, draft).await.unwrap());

  assert!(
    catalog
      .item_in_use(user, CatalogKind::Tag, item.item_id)
      .await
      .unwrap()
  );

  granted(journal.delete(user, entry.entry_id).await.unwrap());
  assert!(
    !catalog
      .item_in_use(user, CatalogKind::Tag, item.item_id)
      .await
      .unwrap()
  );
}

#[tokio::test]
async fn item_in_use_counts_entries_of_other_users() {
  let s = store().await;
  let catalog = SettingsCatalogService::new(Arc::new(s.clone()));
  let journal = entry_service(s);
  let owner = Uuid::new_v4();
  let other_user = Uuid::new_v4();

  let stored = catalog
    .add_items(owner, CatalogKind::Tag, vec![tag("Home")])
    .await
    .unwrap();
  let item = stored[0].clone();

  let mut draft = EntryDraft::new(Mood::LowEnergyPleasant, "Calm", "borrowed");
  draft.tags = vec![item.clone()];
  granted(journal.create(other_user, draft).await.unwrap());

  assert!(
    catalog
      .item_in_use(owner, CatalogKind::Tag, item.item_id)
      .await
      .unwrap()
  );
}

#[tokio::test]
async fn item_in_use_requires_the_item_to_exist() {
  let svc = catalog_service().await;
  let user = Uuid::new_v4();
  svc
    .add_items(user, CatalogKind::Tag, vec![tag("Home")])
    .await
    .unwrap();

  let err = svc
    .item_in_use(user, CatalogKind::Tag, Uuid::new_v4())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ItemNotFound { .. }));
}

// ─── Entry service: create ───────────────────────────────────────────────────

#[tokio::test]
async fn create_requires_emotion_and_text() {
  let journal = entry_service(store().await);
  let user = Uuid::new_v4();

  let err = journal
    .create(user, EntryDraft::new(Mood::LowEnergyPleasant, "", "body"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EmptyField("emotion")));

  let err = journal
    .create(user, EntryDraft::new(Mood::LowEnergyPleasant, "Calm", "  "))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EmptyField("text")));
}

#[tokio::test]
async fn create_denied_for_unknown_user() {
  let s = store().await;
  let known = Uuid::new_v4();
  let journal = JournalEntryService::new(
    Arc::new(s),
    Arc::new(StaticDirectory::new([known])),
  );

  let stranger = Uuid::new_v4();
  let outcome = journal
    .create(stranger, EntryDraft::new(Mood::LowEnergyPleasant, "Calm", "x"))
    .await
    .unwrap();
  assert!(outcome.is_denied());

  let outcome = journal
    .create(known, EntryDraft::new(Mood::LowEnergyPleasant, "Calm", "x"))
    .await
    .unwrap();
  assert!(!outcome.is_denied());
}

#[tokio::test]
async fn pleasant_entry_cannot_link_out() {
  let journal = entry_service(store().await);
  let user = Uuid::new_v4();

  let target = granted(
    journal
      .create(user, EntryDraft::new(Mood::HighEnergyPleasant, "Joy", "sun"))
      .await
      .unwrap(),
  );

  // The linking rule trips regardless of the target's mood.
  let err = journal
    .create(
      user,
      EntryDraft::new(Mood::HighEnergyPleasant, "Happy", "walk")
        .linked_to(target.entry_id),
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::LinkFromPleasant));
}

#[tokio::test]
async fn link_target_must_be_pleasant() {
  let journal = entry_service(store().await);
  let user = Uuid::new_v4();

  let target = granted(
    journal
      .create(user, EntryDraft::new(Mood::LowEnergyUnpleasant, "Flat", "rain"))
      .await
      .unwrap(),
  );

  let err = journal
    .create(
      user,
      EntryDraft::new(Mood::LowEnergyUnpleasant, "Sad", "gray day")
        .linked_to(target.entry_id),
    )
    .await
    .unwrap_err();
  assert!(
    matches!(err, Error::LinkTargetUnpleasant(id) if id == target.entry_id)
  );
}

#[tokio::test]
async fn unpleasant_entry_links_to_pleasant_entry() {
  let journal = entry_service(store().await);
  let user = Uuid::new_v4();

  let target = granted(
    journal
      .create(user, EntryDraft::new(Mood::HighEnergyPleasant, "Joy", "beach"))
      .await
      .unwrap(),
  );
  let entry = granted(
    journal
      .create(
        user,
        EntryDraft::new(Mood::LowEnergyUnpleasant, "Sad", "missing summer")
          .linked_to(target.entry_id),
      )
      .await
      .unwrap(),
  );
  assert_eq!(entry.linked_entry, Some(target.entry_id));
}

#[tokio::test]
async fn linked_entry_must_exist() {
  let journal = entry_service(store().await);
  let user = Uuid::new_v4();
  let ghost = Uuid::new_v4();

  let err = journal
    .create(
      user,
      EntryDraft::new(Mood::LowEnergyUnpleasant, "Sad", "x").linked_to(ghost),
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::LinkedEntryNotFound(id) if id == ghost));
}

// ─── Entry service: edit ─────────────────────────────────────────────────────

#[tokio::test]
async fn edit_applies_partial_patch_and_stamps_updated_at() {
  let journal = entry_service(store().await);
  let user = Uuid::new_v4();

  let entry = granted(
    journal
      .create(user, EntryDraft::new(Mood::LowEnergyPleasant, "Calm", "draft"))
      .await
      .unwrap(),
  );
  assert!(entry.updated_at.is_none());

  let edited = granted(
    journal
      .edit(
        user,
        entry.entry_id,
        EntryPatch { text: Some("final".into()), ..EntryPatch::default() },
      )
      .await
      .unwrap(),
  );
  assert_eq!(edited.text, "final");
  assert_eq!(edited.emotion, "Calm", "unsupplied fields are retained");
  assert_eq!(edited.mood, Mood::LowEnergyPleasant);
  assert!(edited.updated_at.is_some());
}

#[tokio::test]
async fn edit_link_checked_against_original_mood() {
  let journal = entry_service(store().await);
  let user = Uuid::new_v4();

  let target = granted(
    journal
      .create(user, EntryDraft::new(Mood::HighEnergyPleasant, "Joy", "beach"))
      .await
      .unwrap(),
  );
  let entry = granted(
    journal
      .create(user, EntryDraft::new(Mood::LowEnergyPleasant, "Calm", "walk"))
      .await
      .unwrap(),
  );

  // The original entry is pleasant, so the link is rejected even though the
  // same patch would make the mood unpleasant.
  let err = journal
    .edit(
      user,
      entry.entry_id,
      EntryPatch {
        mood:         Some(Mood::LowEnergyUnpleasant),
        linked_entry: Some(target.entry_id),
        ..EntryPatch::default()
      },
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::LinkFromPleasant));
}

#[tokio::test]
async fn edit_of_foreign_entry_is_denied() {
  let journal = entry_service(store().await);
  let owner = Uuid::new_v4();
  let intruder = Uuid::new_v4();

  let entry = granted(
    journal
      .create(owner, EntryDraft::new(Mood::LowEnergyPleasant, "Calm", "mine"))
      .await
      .unwrap(),
  );

  let outcome = journal
    .edit(
      intruder,
      entry.entry_id,
      EntryPatch { text: Some("stolen".into()), ..EntryPatch::default() },
    )
    .await
    .unwrap();
  assert!(outcome.is_denied());

  let unchanged = granted(journal.entry(owner, entry.entry_id).await.unwrap());
  assert_eq!(unchanged.text, "mine");
}

#[tokio::test]
async fn mood_of_link_target_cannot_become_unpleasant() {
  let journal = entry_service(store().await);
  let user = Uuid::new_v4();

  let target = granted(
    journal
      .create(user, EntryDraft::new(Mood::HighEnergyPleasant, "Joy", "beach"))
      .await
      .unwrap(),
  );
  granted(
    journal
      .create(
        user,
        EntryDraft::new(Mood::LowEnergyUnpleasant, "Sad", "gray")
          .linked_to(target.entry_id),
      )
      .await
      .unwrap(),
  );

  let err = journal
    .edit(
      user,
      target.entry_id,
      EntryPatch {
        mood: Some(Mood::HighEnergyUnpleasant),
        ..EntryPatch::default()
      },
    )
    .await
    .unwrap_err();
  assert!(
    matches!(err, Error::LinkTargetMoodLocked(id) if id == target.entry_id)
  );

  // Staying within the pleasant half is fine.
  let edited = granted(
    journal
      .edit(
        user,
        target.entry_id,
        EntryPatch {
          mood: Some(Mood::LowEnergyPleasant),
          ..EntryPatch::default()
        },
      )
      .await
      .unwrap(),
  );
  assert_eq!(edited.mood, Mood::LowEnergyPleasant);
}

// ─── Entry service: delete & reads ───────────────────────────────────────────

#[tokio::test]
async fn delete_returns_the_deleted_id() {
  let journal = entry_service(store().await);
  let user = Uuid::new_v4();

  let entry = granted(
    journal
      .create(user, EntryDraft::new(Mood::LowEnergyPleasant, "Calm", "x"))
      .await
      .unwrap(),
  );
  let deleted = granted(journal.delete(user, entry.entry_id).await.unwrap());
  assert_eq!(deleted, entry.entry_id);

  assert!(journal.entry(user, entry.entry_id).await.unwrap().is_denied());
}

#[tokio::test]
async fn delete_of_foreign_entry_is_denied() {
  let journal = entry_service(store().await);
  let owner = Uuid::new_v4();
  let intruder = Uuid::new_v4();

  let entry = granted(
    journal
      .create(owner, EntryDraft::new(Mood::LowEnergyPleasant, "Calm", "x"))
      .await
      .unwrap(),
  );
  assert!(journal.delete(intruder, entry.entry_id).await.unwrap().is_denied());
  assert!(!journal.entry(owner, entry.entry_id).await.unwrap().is_denied());
}

#[tokio::test]
async fn entries_are_scoped_to_the_user_and_newest_first() {
  let journal = entry_service(store().await);
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();

  let mut alice_ids = Vec::new();
  for text in ["one", "two"] {
    let entry = granted(
      journal
        .create(alice, EntryDraft::new(Mood::LowEnergyPleasant, "Calm", text))
        .await
        .unwrap(),
    );
    alice_ids.push(entry.entry_id);
    tokio::time::sleep(Duration::from_millis(3)).await;
  }
  granted(
    journal
      .create(bob, EntryDraft::new(Mood::HighEnergyPleasant, "Joy", "bob's"))
      .await
      .unwrap(),
  );

  let listed = granted(journal.entries(alice).await.unwrap());
  assert_eq!(listed.len(), 2);
  assert_eq!(listed[0].entry_id, alice_ids[1]);
  assert_eq!(listed[1].entry_id, alice_ids[0]);
}

#[tokio::test]
async fn entries_denied_for_unknown_user() {
  let s = store().await;
  let journal = JournalEntryService::new(
    Arc::new(s),
    Arc::new(StaticDirectory::default()),
  );
  assert!(journal.entries(Uuid::new_v4()).await.unwrap().is_denied());
}

// ─── Entry service: field cipher ─────────────────────────────────────────────

/// Reversible test cipher; real deployments plug in an external service.
struct MarkerCipher;

impl FieldCipher for MarkerCipher {
  fn seal(&self, plaintext: &str) -> Result<String, BoxError> {
    Ok(format!("sealed:{plaintext}"))
  }

  fn open(&self, sealed: &str) -> Result<String, BoxError> {
    Ok(
      sealed
        .strip_prefix("sealed:")
        .ok_or("field was not sealed")?
        .to_owned(),
    )
  }
}

#[tokio::test]
async fn cipher_seals_at_rest_and_opens_on_read() {
  let s = store().await;
  let journal = JournalEntryService::new(Arc::new(s.clone()), Arc::new(AllowAll))
    .with_cipher(Arc::new(MarkerCipher));
  let user = Uuid::new_v4();

  let entry = granted(
    journal
      .create(user, EntryDraft::new(Mood::LowEnergyPleasant, "Calm", "secret"))
      .await
      .unwrap(),
  );
  // Echoed fields are plaintext.
  assert_eq!(entry.emotion, "Calm");
  assert_eq!(entry.text, "secret");

  // At rest the fields are sealed.
  let raw = s.entry(entry.entry_id).await.unwrap().unwrap();
  assert_eq!(raw.emotion, "sealed:Calm");
  assert_eq!(raw.text, "sealed:secret");

  // Reads through the service open them again, including after an edit.
  let edited = granted(
    journal
      .edit(
        user,
        entry.entry_id,
        EntryPatch { text: Some("newer secret".into()), ..EntryPatch::default() },
      )
      .await
      .unwrap(),
  );
  assert_eq!(edited.text, "newer secret");
  assert_eq!(edited.emotion, "Calm");

  let read_back = granted(journal.entry(user, entry.entry_id).await.unwrap());
  assert_eq!(read_back.text, "newer secret");
}
