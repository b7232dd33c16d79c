//! [`SqliteStore`]: the SQLite implementation of [`NoteStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::debug;

use odonto_core::{
  note::{NoteId, ToothNote, ToothNumber},
  store::NoteStore,
};

use crate::{
  encode::{NOTE_COLUMNS, RawToothNote, encode_dt},
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A tooth-note store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
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
}

// ─── NoteStore impl ──────────────────────────────────────────────────────────

impl NoteStore for SqliteStore {
  type Error = crate::Error;

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn find_latest_note(&self, tooth: ToothNumber) -> Result<Option<String>> {
    let note: Option<Option<String>> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT note FROM tooth_notes
             WHERE tooth_number = ?1
             ORDER BY updated_at DESC, id DESC
             LIMIT 1",
            rusqlite::params![tooth],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    Ok(note.flatten())
  }

  async fn count_non_empty_notes(&self, tooth: ToothNumber) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM tooth_notes
           WHERE tooth_number = ?1 AND note IS NOT NULL AND note <> ''",
          rusqlite::params![tooth],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as u64)
  }

  async fn list_non_empty_notes(&self) -> Result<Vec<ToothNote>> {
    let raws: Vec<RawToothNote> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {NOTE_COLUMNS} FROM tooth_notes
           WHERE note IS NOT NULL AND note <> ''
           ORDER BY tooth_number ASC, id ASC"
        ))?;
        let rows = stmt
          .query_map([], RawToothNote::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawToothNote::into_note).collect()
  }

  async fn get_note(&self, id: NoteId) -> Result<Option<ToothNote>> {
    let raw: Option<RawToothNote> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {NOTE_COLUMNS} FROM tooth_notes WHERE id = ?1"),
            rusqlite::params![id.0],
            RawToothNote::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawToothNote::into_note).transpose()
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn upsert(&self, tooth: ToothNumber, text: String) -> Result<ToothNote> {
    let now = encode_dt(Utc::now());

    // The transaction rolls back when dropped without `commit`, so any `?`
    // below leaves the table untouched.
    let raw: RawToothNote = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let existing: Option<i64> = tx
          .query_row(
            "SELECT id FROM tooth_notes WHERE tooth_number = ?1 LIMIT 1",
            rusqlite::params![tooth],
            |row| row.get(0),
          )
          .optional()?;

        let id = match existing {
          Some(id) => {
            tx.execute(
              "UPDATE tooth_notes SET note = ?1, updated_at = ?2 WHERE id = ?3",
              rusqlite::params![text, now, id],
            )?;
            id
          }
          None => {
            tx.execute(
              "INSERT INTO tooth_notes (tooth_number, note, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?3)",
              rusqlite::params![tooth, text, now],
            )?;
            tx.last_insert_rowid()
          }
        };

        let raw = tx.query_row(
          &format!("SELECT {NOTE_COLUMNS} FROM tooth_notes WHERE id = ?1"),
          rusqlite::params![id],
          RawToothNote::from_row,
        )?;

        tx.commit()?;
        Ok(raw)
      })
      .await?;

    let note = raw.into_note()?;
    debug!(tooth, id = %note.id, "upserted tooth note");
    Ok(note)
  }

  async fn delete_by_id(&self, id: NoteId) -> Result<bool> {
    let removed: usize = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let removed =
          tx.execute("DELETE FROM tooth_notes WHERE id = ?1", rusqlite::params![id.0])?;
        tx.commit()?;
        Ok(removed)
      })
      .await?;

    Ok(removed > 0)
  }
}
