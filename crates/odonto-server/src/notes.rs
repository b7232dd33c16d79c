//! Handlers for saving, listing, deleting and re-editing notes.
//!
//! Save and delete answer 200 with a [`NoticeBody`]; the notice severity
//! carries the outcome.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::Utc;
use odonto_core::{
  note::{NoteId, ToothNote, ToothNumber},
  notice::{Notice, Severity},
  store::NoteStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError, sessions::SessionView, store_error};

/// JSON form of a [`Notice`].
#[derive(Debug, Serialize, Deserialize)]
pub struct NoticeBody {
  pub severity: Severity,
  pub message:  String,
}

impl From<Notice> for NoticeBody {
  fn from(n: Notice) -> Self {
    Self { severity: n.severity(), message: n.to_string() }
  }
}

async fn find_note<S>(state: &AppState<S>, note_id: NoteId) -> Result<ToothNote, ApiError>
where
  S: NoteStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state
    .store
    .get_note(note_id)
    .await
    .map_err(store_error)?
    .ok_or_else(|| ApiError::NotFound(format!("note {note_id} not found")))
}

/// `POST /sessions/{id}/save`
pub async fn save<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<NoticeBody>, ApiError>
where
  S: NoteStore + Clone,
{
  let session = state.session(id)?;
  let notice = session.lock().await.save_note().await;
  Ok(Json(notice.into()))
}

/// `GET /sessions/{id}/notes` — every note with text, by tooth number. A
/// failing store yields `[]`.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<ToothNote>>, ApiError>
where
  S: NoteStore + Clone,
{
  let session = state.session(id)?;
  let notes = session.lock().await.all_notes().await;
  Ok(Json(notes))
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
  /// Tooth the note belonged to, as last listed by the client. Lets a delete
  /// of an already-removed row still clear a matching selection.
  pub tooth: Option<ToothNumber>,
}

/// `DELETE /sessions/{id}/notes/{note_id}[?tooth=<n>]`
///
/// A row that is already gone counts as deleted when the client names its
/// tooth; without `tooth` there is nothing to report against and the answer
/// is 404.
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Path((id, note_id)): Path<(Uuid, NoteId)>,
  Query(params): Query<DeleteParams>,
) -> Result<Json<NoticeBody>, ApiError>
where
  S: NoteStore + Clone,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let session = state.session(id)?;
  let note = match state.store.get_note(note_id).await.map_err(store_error)? {
    Some(note) => note,
    None => {
      let tooth = params
        .tooth
        .ok_or_else(|| ApiError::NotFound(format!("note {note_id} not found")))?;
      let now = Utc::now();
      ToothNote {
        id:           note_id,
        tooth_number: tooth,
        note:         None,
        created_at:   now,
        updated_at:   now,
      }
    }
  };
  let notice = session.lock().await.delete_note(&note).await;
  Ok(Json(notice.into()))
}

/// `POST /sessions/{id}/notes/{note_id}/modify` — select the note's tooth and
/// load it for editing.
pub async fn modify<S>(
  State(state): State<AppState<S>>,
  Path((id, note_id)): Path<(Uuid, NoteId)>,
) -> Result<Json<SessionView>, ApiError>
where
  S: NoteStore + Clone,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let session = state.session(id)?;
  let note = find_note(&state, note_id).await?;
  let mut session = session.lock().await;
  session.modify_note(&note).await.map_err(store_error)?;
  Ok(Json(SessionView::of(id, &session)))
}
