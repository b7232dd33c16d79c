//! The `NoteStore` trait: the persistence gateway behind a chart session.
//!
//! The trait is implemented by storage backends (e.g. `odonto-store-sqlite`).
//! [`crate::session::ChartSession`] and the server depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::note::{NoteId, ToothNote, ToothNumber};

/// Abstraction over a tooth-note store backend.
///
/// Every call is self-contained: implementations must not hold rows or
/// cursors between calls. Writes run in a single transaction and either
/// commit fully or roll back.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait NoteStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Text of the most recently updated note for `tooth`, or `None` when the
  /// tooth has no row (or its row has a NULL note).
  fn find_latest_note(
    &self,
    tooth: ToothNumber,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  /// Number of rows for `tooth` whose note is neither NULL nor empty.
  fn count_non_empty_notes(
    &self,
    tooth: ToothNumber,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// All rows with a non-empty note, ordered by tooth number ascending.
  fn list_non_empty_notes(
    &self,
  ) -> impl Future<Output = Result<Vec<ToothNote>, Self::Error>> + Send + '_;

  /// Retrieve a row by id. Returns `None` if not found.
  fn get_note(
    &self,
    id: NoteId,
  ) -> impl Future<Output = Result<Option<ToothNote>, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Overwrite the note of the existing row for `tooth`, or insert a new row
  /// if there is none. Both timestamps are set by the store.
  fn upsert(
    &self,
    tooth: ToothNumber,
    text: String,
  ) -> impl Future<Output = Result<ToothNote, Self::Error>> + Send + '_;

  /// Delete a row by id. A row that is already gone is not an error; the
  /// returned flag tells whether anything was removed.
  fn delete_by_id(
    &self,
    id: NoteId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
