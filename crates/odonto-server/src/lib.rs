//! JSON HTTP layer for the odontogram.
//!
//! Exposes an axum [`Router`] that hosts one [`ChartSession`] per client
//! session over any [`NoteStore`]. Rendering is left to the front end; this
//! crate only maps requests onto session operations.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | `GET` | `/quadrants` | FDI display sequences |
//! | `POST` | `/sessions` | open a session |
//! | `GET` / `DELETE` | `/sessions/{id}` | session state / close |
//! | `POST` | `/sessions/{id}/select` | select a tooth |
//! | `PUT` | `/sessions/{id}/note` | replace the edit buffer |
//! | `POST` | `/sessions/{id}/save` | commit the edit buffer |
//! | `GET` | `/sessions/{id}/notes` | every non-empty note |
//! | `DELETE` | `/sessions/{id}/notes/{note_id}[?tooth=n]` | delete a note |
//! | `POST` | `/sessions/{id}/notes/{note_id}/modify` | re-select a note's tooth |
//! | `GET` | `/sessions/{id}/teeth/{tooth}` | style of one tooth |
//! | `GET` | `/sessions/{id}/chart` | the styled chart |
//!
//! [`ChartSession`]: odonto_core::session::ChartSession

pub mod chart;
pub mod error;
pub mod notes;
pub mod registry;
pub mod sessions;

pub use error::ApiError;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use odonto_core::{fdi, note::ToothNumber, store::NoteStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use registry::{SessionRegistry, SharedSession};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ODONTO_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:              String,
  #[serde(default = "default_port")]
  pub port:              u16,
  #[serde(default = "default_store_path")]
  pub store_path:        PathBuf,
  /// Reject tooth numbers outside the permanent FDI set with 400.
  #[serde(default)]
  pub strict_fdi:        bool,
  /// Drop sessions unused for this many seconds. `0` keeps them until closed.
  #[serde(default = "default_session_idle_secs")]
  pub session_idle_secs: u64,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("odontogram.db") }

fn default_session_idle_secs() -> u64 { 3600 }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:              default_host(),
      port:              default_port(),
      store_path:        default_store_path(),
      strict_fdi:        false,
      session_idle_secs: default_session_idle_secs(),
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `ODONTO_*` environment
  /// variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    Self::load_with_env(path, config::Environment::with_prefix("ODONTO"))
  }

  /// Like [`ServerConfig::load`] but with the environment layer supplied by
  /// the caller.
  pub fn load_with_env(
    path: &Path,
    env: config::Environment,
  ) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(env)
      .build()?
      .try_deserialize()
  }

  /// The idle limit for sessions, or `None` when expiry is off.
  pub fn session_idle(&self) -> Option<Duration> {
    (self.session_idle_secs > 0).then(|| Duration::from_secs(self.session_idle_secs))
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: NoteStore> {
  pub store:    Arc<S>,
  pub sessions: Arc<SessionRegistry<S>>,
  pub config:   Arc<ServerConfig>,
}

impl<S: NoteStore> AppState<S> {
  pub fn new(store: S, config: ServerConfig) -> Self {
    Self {
      store:    Arc::new(store),
      sessions: Arc::new(SessionRegistry::new()),
      config:   Arc::new(config),
    }
  }

  pub(crate) fn session(&self, id: Uuid) -> Result<SharedSession<S>, ApiError> {
    self
      .sessions
      .get(id)
      .ok_or_else(|| ApiError::NotFound(format!("session {id} not found")))
  }

  /// Periodically drop idle sessions, per `session_idle_secs`. Returns `None`
  /// when expiry is off.
  pub fn spawn_session_sweeper(&self) -> Option<tokio::task::JoinHandle<()>>
  where
    S: Send + Sync + 'static,
  {
    let max_idle = self.config.session_idle()?;
    let sessions = self.sessions.clone();
    let period = max_idle.min(Duration::from_secs(60));
    Some(tokio::spawn(async move {
      let mut tick = tokio::time::interval(period);
      loop {
        tick.tick().await;
        let dropped = sessions.sweep_idle(max_idle);
        if dropped > 0 {
          tracing::info!(dropped, remaining = sessions.len(), "expired idle sessions");
        }
      }
    }))
  }

  /// Apply the `strict_fdi` policy to a tooth number from a request.
  pub(crate) fn check_tooth(&self, tooth: ToothNumber) -> Result<ToothNumber, ApiError> {
    if self.config.strict_fdi {
      fdi::validate(tooth)?;
    }
    Ok(tooth)
  }
}

pub(crate) fn store_error<E>(e: E) -> ApiError
where
  E: std::error::Error + Send + Sync + 'static,
{
  ApiError::Store(Box::new(e))
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: NoteStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/quadrants", get(chart::quadrants))
    // Session lifecycle and edit state
    .route("/sessions", post(sessions::create::<S>))
    .route("/sessions/{id}", get(sessions::get_one::<S>).delete(sessions::close::<S>))
    .route("/sessions/{id}/select", post(sessions::select::<S>))
    .route("/sessions/{id}/note", put(sessions::set_note::<S>))
    // Notes
    .route("/sessions/{id}/save", post(notes::save::<S>))
    .route("/sessions/{id}/notes", get(notes::list::<S>))
    .route("/sessions/{id}/notes/{note_id}", delete(notes::delete_one::<S>))
    .route("/sessions/{id}/notes/{note_id}/modify", post(notes::modify::<S>))
    // Chart
    .route("/sessions/{id}/teeth/{tooth}", get(chart::tooth::<S>))
    .route("/sessions/{id}/chart", get(chart::chart::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
