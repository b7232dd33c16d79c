//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with a fixed number of
//! fractional digits, so `ORDER BY updated_at` on the text column is
//! chronological.

use chrono::{DateTime, SecondsFormat, Utc};
use odonto_core::note::{NoteId, ToothNote, ToothNumber};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawToothNote::from_row`].
pub const NOTE_COLUMNS: &str = "id, tooth_number, note, created_at, updated_at";

/// Raw values read directly from a `tooth_notes` row.
pub struct RawToothNote {
  pub id:           i64,
  pub tooth_number: ToothNumber,
  pub note:         Option<String>,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawToothNote {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      tooth_number: row.get(1)?,
      note:         row.get(2)?,
      created_at:   row.get(3)?,
      updated_at:   row.get(4)?,
    })
  }

  pub fn into_note(self) -> Result<ToothNote> {
    Ok(ToothNote {
      id:           NoteId(self.id),
      tooth_number: self.tooth_number,
      note:         self.note,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}
