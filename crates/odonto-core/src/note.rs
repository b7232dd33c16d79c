//! The tooth note: one free-text clinical note attached to a tooth.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tooth number. Nominally two-digit FDI notation, but any integer is
/// accepted by the session and the store.
pub type ToothNumber = i32;

/// Storage-assigned surrogate key of a [`ToothNote`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NoteId(pub i64);

impl fmt::Display for NoteId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// A persisted note row.
///
/// The store reuses the existing row for a tooth on every save, so normal
/// application flow produces at most one note per tooth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToothNote {
  pub id:           NoteId,
  pub tooth_number: ToothNumber,
  /// `None` or empty both mean "no note".
  pub note:         Option<String>,
  /// Set once, on first insert.
  pub created_at:   DateTime<Utc>,
  /// Refreshed on every write.
  pub updated_at:   DateTime<Utc>,
}
