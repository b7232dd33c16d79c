//! Handlers for the odontogram layout and per-tooth styling.

use axum::{
  Json,
  extract::{Path, State},
};
use odonto_core::{
  fdi::Quadrant,
  note::ToothNumber,
  session::{ChartQuadrant, ToothStyle},
  store::NoteStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError, store_error};

#[derive(Debug, Serialize, Deserialize)]
pub struct QuadrantBody {
  pub quadrant: Quadrant,
  pub teeth:    Vec<ToothNumber>,
}

/// `GET /quadrants` — the four FDI sequences in chart order.
pub async fn quadrants() -> Json<Vec<QuadrantBody>> {
  Json(
    Quadrant::ALL
      .iter()
      .map(|&quadrant| QuadrantBody { quadrant, teeth: quadrant.teeth().to_vec() })
      .collect(),
  )
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToothBody {
  pub tooth:    ToothNumber,
  /// `None` for numbers outside the FDI permanent set.
  pub quadrant: Option<Quadrant>,
  pub style:    ToothStyle,
  pub class:    String,
}

/// `GET /sessions/{id}/teeth/{tooth}`
pub async fn tooth<S>(
  State(state): State<AppState<S>>,
  Path((id, tooth)): Path<(Uuid, ToothNumber)>,
) -> Result<Json<ToothBody>, ApiError>
where
  S: NoteStore + Clone,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let tooth = state.check_tooth(tooth)?;
  let session = state.session(id)?;
  let style = session.lock().await.tooth_style(tooth).await.map_err(store_error)?;
  Ok(Json(ToothBody {
    tooth,
    quadrant: Quadrant::of(tooth),
    style,
    class: style.css_class(),
  }))
}

/// `GET /sessions/{id}/chart`
pub async fn chart<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<ChartQuadrant>>, ApiError>
where
  S: NoteStore + Clone,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let session = state.session(id)?;
  let chart = session.lock().await.chart().await.map_err(store_error)?;
  Ok(Json(chart))
}
