//! User-visible outcomes of session write operations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::note::ToothNumber;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Info,
  Warn,
  Error,
}

/// The message a session hands back to the UI after a save or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
  /// Save was requested with no tooth selected. Nothing was written.
  NoToothSelected,
  Saved { tooth: ToothNumber },
  Deleted { tooth: ToothNumber },
  /// The write was rolled back; `detail` is the underlying failure.
  SaveFailed { detail: String },
  DeleteFailed { detail: String },
}

impl Notice {
  pub fn severity(&self) -> Severity {
    match self {
      Self::NoToothSelected => Severity::Warn,
      Self::Saved { .. } | Self::Deleted { .. } => Severity::Info,
      Self::SaveFailed { .. } | Self::DeleteFailed { .. } => Severity::Error,
    }
  }

  pub fn is_error(&self) -> bool { self.severity() == Severity::Error }
}

impl fmt::Display for Notice {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NoToothSelected => f.write_str("Select a tooth first"),
      Self::Saved { tooth } => write!(f, "Note saved for tooth {tooth}"),
      Self::Deleted { tooth } => write!(f, "Note deleted from tooth {tooth}"),
      Self::SaveFailed { detail } => write!(f, "Error while saving: {detail}"),
      Self::DeleteFailed { detail } => {
        write!(f, "Error while deleting: {detail}")
      }
    }
  }
}
