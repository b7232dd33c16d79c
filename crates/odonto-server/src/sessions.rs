//! Handlers for session lifecycle, selection and the edit buffer.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use odonto_core::{note::ToothNumber, session::ChartSession, store::NoteStore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError, store_error};

/// JSON view of a session's selection and edit buffer.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
  pub id:             Uuid,
  pub selected_tooth: Option<ToothNumber>,
  pub current_note:   String,
}

impl SessionView {
  pub fn of<S: NoteStore>(id: Uuid, session: &ChartSession<S>) -> Self {
    Self {
      id,
      selected_tooth: session.selected_tooth(),
      current_note: session.current_note().to_owned(),
    }
  }
}

// ─── Lifecycle ────────────────────────────────────────────────────────────────

/// `POST /sessions` — returns 201 + the empty session.
pub async fn create<S>(State(state): State<AppState<S>>) -> impl IntoResponse
where
  S: NoteStore + Clone,
{
  let (id, session) = state.sessions.open(state.store.clone());
  let view = SessionView::of(id, &*session.lock().await);
  (StatusCode::CREATED, Json(view))
}

/// `GET /sessions/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError>
where
  S: NoteStore + Clone,
{
  let session = state.session(id)?;
  let view = SessionView::of(id, &*session.lock().await);
  Ok(Json(view))
}

/// `DELETE /sessions/{id}` — 204, or 404 if unknown.
pub async fn close<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: NoteStore + Clone,
{
  if state.sessions.close(id) {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("session {id} not found")))
  }
}

// ─── Selection ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SelectBody {
  pub tooth: ToothNumber,
}

/// `POST /sessions/{id}/select` — body: `{"tooth": 18}`; loads the tooth's
/// latest note into the edit buffer.
pub async fn select<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<SelectBody>,
) -> Result<Json<SessionView>, ApiError>
where
  S: NoteStore + Clone,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let tooth = state.check_tooth(body.tooth)?;
  let session = state.session(id)?;
  let mut session = session.lock().await;
  session.select_tooth(tooth).await.map_err(store_error)?;
  Ok(Json(SessionView::of(id, &session)))
}

// ─── Edit buffer ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NoteBody {
  pub text: String,
}

/// `PUT /sessions/{id}/note` — body: `{"text": "..."}`. Nothing is stored
/// until `POST /sessions/{id}/save`.
pub async fn set_note<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NoteBody>,
) -> Result<Json<SessionView>, ApiError>
where
  S: NoteStore + Clone,
{
  let session = state.session(id)?;
  let mut session = session.lock().await;
  session.set_current_note(body.text);
  Ok(Json(SessionView::of(id, &session)))
}
