//! [`ChartSession`]: the per-clinician selection and edit state.
//!
//! A session tracks which tooth is active and stages note edits before they
//! are committed. It never caches store contents: every query goes to the
//! backing [`NoteStore`], so two sessions on the same store always see each
//! other's committed writes (last writer wins).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
  fdi::{self, Quadrant},
  note::{ToothNote, ToothNumber},
  notice::Notice,
  store::NoteStore,
};

// ─── Render model ────────────────────────────────────────────────────────────

/// Render markers for one tooth of the chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToothStyle {
  pub selected: bool,
  pub has_note: bool,
}

impl ToothStyle {
  pub const SELECTED_CLASS: &'static str = "selected-tooth";
  pub const HAS_NOTE_CLASS: &'static str = "has-note";

  /// Space-joined marker classes; empty when neither applies.
  pub fn css_class(&self) -> String {
    let mut classes = Vec::with_capacity(2);
    if self.selected {
      classes.push(Self::SELECTED_CLASS);
    }
    if self.has_note {
      classes.push(Self::HAS_NOTE_CLASS);
    }
    classes.join(" ")
  }
}

/// One tooth of a rendered chart.
#[derive(Debug, Clone, Serialize)]
pub struct ToothCell {
  pub tooth: ToothNumber,
  pub style: ToothStyle,
  pub class: String,
}

/// One quadrant of a rendered chart, teeth in display order.
#[derive(Debug, Clone, Serialize)]
pub struct ChartQuadrant {
  pub quadrant: Quadrant,
  pub teeth:    Vec<ToothCell>,
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// Selection and edit-buffer state for one charting session.
pub struct ChartSession<S> {
  store:          Arc<S>,
  selected_tooth: Option<ToothNumber>,
  /// Editing buffer; only reaches storage on [`ChartSession::save_note`].
  current_note:   String,
}

impl<S: NoteStore> ChartSession<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store, selected_tooth: None, current_note: String::new() }
  }

  // ── Accessors ─────────────────────────────────────────────────────────

  pub fn selected_tooth(&self) -> Option<ToothNumber> { self.selected_tooth }

  /// Set the selection without loading its note.
  pub fn set_selected_tooth(&mut self, tooth: Option<ToothNumber>) {
    self.selected_tooth = tooth;
  }

  pub fn current_note(&self) -> &str { &self.current_note }

  pub fn set_current_note(&mut self, text: impl Into<String>) {
    self.current_note = text.into();
  }

  pub fn upper_right_teeth(&self) -> &'static [ToothNumber] { &fdi::UPPER_RIGHT }

  pub fn upper_left_teeth(&self) -> &'static [ToothNumber] { &fdi::UPPER_LEFT }

  pub fn lower_left_teeth(&self) -> &'static [ToothNumber] { &fdi::LOWER_LEFT }

  pub fn lower_right_teeth(&self) -> &'static [ToothNumber] { &fdi::LOWER_RIGHT }

  // ── Selection ─────────────────────────────────────────────────────────

  /// Select `tooth` and load its latest note into the edit buffer (empty if
  /// it has none).
  ///
  /// Any integer is accepted. If the lookup fails the error is returned and
  /// the previous selection and buffer are left as they were; the selection
  /// only moves once the note is in hand. Moving it before the lookup would
  /// leave a failed call with the new tooth selected over the old tooth's
  /// buffer, and the next `save_note` would write that text to the wrong
  /// tooth.
  pub async fn select_tooth(&mut self, tooth: ToothNumber) -> Result<(), S::Error> {
    let note = self.store.find_latest_note(tooth).await?;
    self.selected_tooth = Some(tooth);
    self.current_note = note.unwrap_or_default();
    debug!(tooth, "selected tooth");
    Ok(())
  }

  /// Re-select the tooth a listed note belongs to.
  pub async fn modify_note(&mut self, note: &ToothNote) -> Result<(), S::Error> {
    self.select_tooth(note.tooth_number).await
  }

  // ── Writes ────────────────────────────────────────────────────────────

  /// Commit the edit buffer for the selected tooth.
  ///
  /// The buffer is kept as-is afterwards, so it matches what was stored.
  pub async fn save_note(&self) -> Notice {
    let Some(tooth) = self.selected_tooth else {
      return Notice::NoToothSelected;
    };

    match self.store.upsert(tooth, self.current_note.clone()).await {
      Ok(row) => {
        info!(tooth, id = %row.id, "saved tooth note");
        Notice::Saved { tooth }
      }
      Err(e) => {
        warn!(tooth, error = %e, "failed to save tooth note");
        Notice::SaveFailed { detail: e.to_string() }
      }
    }
  }

  /// Delete `note`; clears the selection and buffer if it belonged to the
  /// selected tooth.
  pub async fn delete_note(&mut self, note: &ToothNote) -> Notice {
    match self.store.delete_by_id(note.id).await {
      Ok(removed) => {
        info!(tooth = note.tooth_number, id = %note.id, removed, "deleted tooth note");
        if self.selected_tooth == Some(note.tooth_number) {
          self.selected_tooth = None;
          self.current_note.clear();
        }
        Notice::Deleted { tooth: note.tooth_number }
      }
      Err(e) => {
        warn!(id = %note.id, error = %e, "failed to delete tooth note");
        Notice::DeleteFailed { detail: e.to_string() }
      }
    }
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Whether a non-empty note exists for `tooth`. Always queries the store.
  pub async fn has_note(&self, tooth: ToothNumber) -> Result<bool, S::Error> {
    Ok(self.store.count_non_empty_notes(tooth).await? > 0)
  }

  pub async fn tooth_style(&self, tooth: ToothNumber) -> Result<ToothStyle, S::Error> {
    Ok(ToothStyle {
      selected: self.selected_tooth == Some(tooth),
      has_note: self.has_note(tooth).await?,
    })
  }

  /// Every note with text, ordered by tooth number. A failing store yields an
  /// empty list.
  pub async fn all_notes(&self) -> Vec<ToothNote> {
    match self.store.list_non_empty_notes().await {
      Ok(notes) => notes,
      Err(e) => {
        warn!(error = %e, "failed to list tooth notes");
        Vec::new()
      }
    }
  }

  /// The whole chart in display order, styled for this session.
  pub async fn chart(&self) -> Result<Vec<ChartQuadrant>, S::Error> {
    let mut quadrants = Vec::with_capacity(Quadrant::ALL.len());
    for quadrant in Quadrant::ALL {
      let mut teeth = Vec::with_capacity(quadrant.teeth().len());
      for &tooth in quadrant.teeth() {
        let style = self.tooth_style(tooth).await?;
        teeth.push(ToothCell { tooth, style, class: style.css_class() });
      }
      quadrants.push(ChartQuadrant { quadrant, teeth });
    }
    Ok(quadrants)
  }
}
