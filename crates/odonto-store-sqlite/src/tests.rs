//! Integration tests for `SqliteStore` and `ChartSession` against an
//! in-memory database.

use std::sync::Arc;

use odonto_core::{
  note::{NoteId, ToothNumber},
  notice::Notice,
  session::ChartSession,
  store::NoteStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn session() -> (SqliteStore, ChartSession<SqliteStore>) {
  let s = store().await;
  let session = ChartSession::new(Arc::new(s.clone()));
  (s, session)
}

/// Insert a row directly, bypassing the upsert.
async fn insert_raw(
  s: &SqliteStore,
  tooth: ToothNumber,
  note: Option<&str>,
  updated_at: &str,
) {
  let note = note.map(str::to_owned);
  let updated_at = updated_at.to_owned();
  s.conn
    .call(move |conn| {
      conn.execute(
        "INSERT INTO tooth_notes (tooth_number, note, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?3)",
        rusqlite::params![tooth, note, updated_at],
      )?;
      Ok(())
    })
    .await
    .unwrap();
}

/// Install a trigger that aborts every `event` ("UPDATE", "DELETE", ...) on
/// `tooth_notes`.
async fn refuse(s: &SqliteStore, event: &'static str) {
  s.conn
    .call(move |conn| {
      conn.execute_batch(&format!(
        "CREATE TRIGGER refuse_{event} BEFORE {event} ON tooth_notes
         BEGIN SELECT RAISE(ABORT, 'locked'); END;"
      ))?;
      Ok(())
    })
    .await
    .unwrap();
}

async fn row_count(s: &SqliteStore) -> i64 {
  s.conn
    .call(|conn| {
      Ok(conn.query_row("SELECT COUNT(*) FROM tooth_notes", [], |r| r.get(0))?)
    })
    .await
    .unwrap()
}

// ─── Gateway ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn find_latest_note_missing_returns_none() {
  let s = store().await;
  assert_eq!(s.find_latest_note(11).await.unwrap(), None);
}

#[tokio::test]
async fn upsert_inserts_then_updates_same_row() {
  let s = store().await;

  let first = s.upsert(18, "fractured cusp".into()).await.unwrap();
  assert_eq!(first.tooth_number, 18);
  assert_eq!(first.note.as_deref(), Some("fractured cusp"));
  assert_eq!(first.created_at, first.updated_at);

  let second = s.upsert(18, "restored with composite".into()).await.unwrap();
  assert_eq!(second.id, first.id);
  assert_eq!(second.created_at, first.created_at);
  assert!(second.updated_at >= first.updated_at);
  assert_eq!(second.note.as_deref(), Some("restored with composite"));

  assert_eq!(row_count(&s).await, 1);
  assert_eq!(
    s.find_latest_note(18).await.unwrap().as_deref(),
    Some("restored with composite")
  );
}

#[tokio::test]
async fn find_latest_note_prefers_most_recent_duplicate() {
  let s = store().await;
  insert_raw(&s, 26, Some("old finding"), "2024-01-01T10:00:00.000000Z").await;
  insert_raw(&s, 26, Some("new finding"), "2024-03-01T10:00:00.000000Z").await;
  insert_raw(&s, 26, Some("middle finding"), "2024-02-01T10:00:00.000000Z").await;

  assert_eq!(
    s.find_latest_note(26).await.unwrap().as_deref(),
    Some("new finding")
  );
}

#[tokio::test]
async fn find_latest_note_null_text_is_none() {
  let s = store().await;
  insert_raw(&s, 31, None, "2024-01-01T10:00:00.000000Z").await;
  assert_eq!(s.find_latest_note(31).await.unwrap(), None);
}

#[tokio::test]
async fn count_ignores_null_and_empty_notes() {
  let s = store().await;
  insert_raw(&s, 12, None, "2024-01-01T10:00:00.000000Z").await;
  s.upsert(13, String::new()).await.unwrap();
  s.upsert(14, "abrasion".into()).await.unwrap();

  assert_eq!(s.count_non_empty_notes(12).await.unwrap(), 0);
  assert_eq!(s.count_non_empty_notes(13).await.unwrap(), 0);
  assert_eq!(s.count_non_empty_notes(14).await.unwrap(), 1);
  assert_eq!(s.count_non_empty_notes(15).await.unwrap(), 0);
}

#[tokio::test]
async fn list_non_empty_notes_sorted_by_tooth() {
  let s = store().await;
  s.upsert(46, "crown".into()).await.unwrap();
  s.upsert(11, "chipped".into()).await.unwrap();
  s.upsert(27, String::new()).await.unwrap();
  insert_raw(&s, 35, None, "2024-01-01T10:00:00.000000Z").await;
  s.upsert(32, "mobility".into()).await.unwrap();

  let teeth: Vec<ToothNumber> = s
    .list_non_empty_notes()
    .await
    .unwrap()
    .iter()
    .map(|n| n.tooth_number)
    .collect();
  assert_eq!(teeth, vec![11, 32, 46]);
}

#[tokio::test]
async fn get_note_by_id() {
  let s = store().await;
  let saved = s.upsert(24, "sealant".into()).await.unwrap();

  let fetched = s.get_note(saved.id).await.unwrap().unwrap();
  assert_eq!(fetched, saved);
  assert!(s.get_note(NoteId(9999)).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_by_id_tolerates_missing_rows() {
  let s = store().await;
  let saved = s.upsert(37, "extraction planned".into()).await.unwrap();

  assert!(s.delete_by_id(saved.id).await.unwrap());
  assert!(!s.delete_by_id(saved.id).await.unwrap());
  assert_eq!(s.find_latest_note(37).await.unwrap(), None);
}

#[tokio::test]
async fn any_integer_is_accepted_as_tooth_number() {
  let s = store().await;
  s.upsert(99, "not an FDI tooth".into()).await.unwrap();
  assert_eq!(
    s.find_latest_note(99).await.unwrap().as_deref(),
    Some("not an FDI tooth")
  );
}

// ─── Rollback ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn failed_update_leaves_row_untouched() {
  let s = store().await;
  let before = s.upsert(16, "crown".into()).await.unwrap();
  refuse(&s, "UPDATE").await;

  assert!(s.upsert(16, "bridge".into()).await.is_err());

  assert_eq!(s.find_latest_note(16).await.unwrap().as_deref(), Some("crown"));
  let after = s.get_note(before.id).await.unwrap().unwrap();
  assert_eq!(after.updated_at, before.updated_at);
  assert_eq!(after, before);

  // The aborted transaction was rolled back, so the connection can open
  // another one.
  s.upsert(17, "sealant".into()).await.unwrap();
  assert_eq!(row_count(&s).await, 2);
}

#[tokio::test]
async fn failed_insert_adds_no_row() {
  let s = store().await;
  refuse(&s, "INSERT").await;

  assert!(s.upsert(26, "onlay".into()).await.is_err());
  assert_eq!(row_count(&s).await, 0);
  assert_eq!(s.find_latest_note(26).await.unwrap(), None);
}

#[tokio::test]
async fn failed_delete_keeps_row() {
  let s = store().await;
  let note = s.upsert(32, "abrasion".into()).await.unwrap();
  refuse(&s, "DELETE").await;

  assert!(s.delete_by_id(note.id).await.is_err());
  assert_eq!(s.get_note(note.id).await.unwrap(), Some(note));
  assert_eq!(s.find_latest_note(32).await.unwrap().as_deref(), Some("abrasion"));
}

#[tokio::test]
async fn failed_writes_become_notices_and_keep_session_state() {
  let (s, mut session) = session().await;
  let note = s.upsert(46, "mesial caries".into()).await.unwrap();
  session.select_tooth(46).await.unwrap();
  session.set_current_note("distal caries");
  refuse(&s, "UPDATE").await;
  refuse(&s, "DELETE").await;

  assert!(matches!(session.save_note().await, Notice::SaveFailed { .. }));
  assert!(matches!(session.delete_note(&note).await, Notice::DeleteFailed { .. }));

  assert_eq!(session.selected_tooth(), Some(46));
  assert_eq!(session.current_note(), "distal caries");
  assert_eq!(
    s.find_latest_note(46).await.unwrap().as_deref(),
    Some("mesial caries")
  );
}

// ─── Session ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn select_save_then_lookup_roundtrips() {
  let (s, mut session) = session().await;

  session.select_tooth(18).await.unwrap();
  assert_eq!(session.current_note(), "");
  session.set_current_note("fractured cusp");

  assert_eq!(session.save_note().await, Notice::Saved { tooth: 18 });
  assert_eq!(session.current_note(), "fractured cusp");
  assert!(session.has_note(18).await.unwrap());

  let all = session.all_notes().await;
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].tooth_number, 18);
  assert_eq!(all[0].note.as_deref(), Some("fractured cusp"));

  session.set_current_note("restored with composite");
  assert_eq!(session.save_note().await, Notice::Saved { tooth: 18 });

  let all = s.list_non_empty_notes().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].note.as_deref(), Some("restored with composite"));
}

#[tokio::test]
async fn selecting_loads_existing_note_into_buffer() {
  let (s, mut session) = session().await;
  s.upsert(36, "deep occlusal caries".into()).await.unwrap();

  session.select_tooth(36).await.unwrap();
  assert_eq!(session.selected_tooth(), Some(36));
  assert_eq!(session.current_note(), "deep occlusal caries");

  session.select_tooth(35).await.unwrap();
  assert_eq!(session.current_note(), "");
}

#[tokio::test]
async fn save_without_selection_writes_nothing() {
  let (s, mut session) = session().await;
  session.set_current_note("lost text");

  assert_eq!(session.save_note().await, Notice::NoToothSelected);
  assert_eq!(row_count(&s).await, 0);
}

#[tokio::test]
async fn deleting_selected_note_clears_selection() {
  let (s, mut session) = session().await;
  session.select_tooth(21).await.unwrap();
  session.set_current_note("veneer");
  session.save_note().await;

  let note = s.list_non_empty_notes().await.unwrap().remove(0);
  assert_eq!(session.delete_note(&note).await, Notice::Deleted { tooth: 21 });

  assert_eq!(session.selected_tooth(), None);
  assert_eq!(session.current_note(), "");
  assert_eq!(s.find_latest_note(21).await.unwrap(), None);
}

#[tokio::test]
async fn deleting_other_note_keeps_selection() {
  let (s, mut session) = session().await;
  let other = s.upsert(41, "calculus".into()).await.unwrap();

  session.select_tooth(11).await.unwrap();
  session.set_current_note("draft");

  assert_eq!(session.delete_note(&other).await, Notice::Deleted { tooth: 41 });
  assert_eq!(session.selected_tooth(), Some(11));
  assert_eq!(session.current_note(), "draft");
}

#[tokio::test]
async fn deleting_an_already_deleted_note_succeeds() {
  let (s, mut session) = session().await;
  let note = s.upsert(15, "inlay".into()).await.unwrap();
  s.delete_by_id(note.id).await.unwrap();

  assert_eq!(session.delete_note(&note).await, Notice::Deleted { tooth: 15 });
}

#[tokio::test]
async fn modify_note_reselects_its_tooth() {
  let (s, mut session) = session().await;
  let note = s.upsert(44, "root canal".into()).await.unwrap();

  session.select_tooth(11).await.unwrap();
  session.modify_note(&note).await.unwrap();

  assert_eq!(session.selected_tooth(), Some(44));
  assert_eq!(session.current_note(), "root canal");
}

#[tokio::test]
async fn tooth_style_reflects_selection_and_notes() {
  let (s, mut session) = session().await;
  s.upsert(17, "amalgam".into()).await.unwrap();
  session.select_tooth(16).await.unwrap();

  let selected = session.tooth_style(16).await.unwrap();
  assert!(selected.selected && !selected.has_note);
  assert_eq!(selected.css_class(), "selected-tooth");

  let noted = session.tooth_style(17).await.unwrap();
  assert!(!noted.selected && noted.has_note);
  assert_eq!(noted.css_class(), "has-note");

  session.select_tooth(17).await.unwrap();
  let both = session.tooth_style(17).await.unwrap();
  assert_eq!(both.css_class(), "selected-tooth has-note");

  assert_eq!(session.tooth_style(48).await.unwrap().css_class(), "");
}

#[tokio::test]
async fn chart_covers_all_quadrants_in_display_order() {
  let (s, mut session) = session().await;
  s.upsert(38, "impacted".into()).await.unwrap();
  session.select_tooth(11).await.unwrap();

  let chart = session.chart().await.unwrap();
  assert_eq!(chart.len(), 4);

  let upper_right: Vec<ToothNumber> = chart[0].teeth.iter().map(|c| c.tooth).collect();
  assert_eq!(upper_right, vec![18, 17, 16, 15, 14, 13, 12, 11]);

  let eleven = chart[0].teeth.last().unwrap();
  assert!(eleven.style.selected);
  assert_eq!(eleven.class, "selected-tooth");

  let thirty_eight = chart[2].teeth.last().unwrap();
  assert_eq!(thirty_eight.tooth, 38);
  assert!(thirty_eight.style.has_note);
}

#[tokio::test]
async fn two_sessions_last_writer_wins() {
  let (s, mut alice) = session().await;
  let mut bob = ChartSession::new(Arc::new(s.clone()));

  alice.select_tooth(22).await.unwrap();
  bob.select_tooth(22).await.unwrap();
  alice.set_current_note("from alice");
  bob.set_current_note("from bob");

  alice.save_note().await;
  bob.save_note().await;

  assert_eq!(row_count(&s).await, 1);
  assert_eq!(
    s.find_latest_note(22).await.unwrap().as_deref(),
    Some("from bob")
  );
}
