//! Live chart sessions, keyed by a server-issued UUID.
//!
//! A session exists from `POST /sessions` until `DELETE /sessions/{id}` or
//! until [`SessionRegistry::sweep_idle`] finds it unused for longer than the
//! configured idle limit. Its state is never persisted. Operations on one
//! session are serialised behind its own async mutex, while distinct sessions
//! proceed independently.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, PoisonError},
  time::{Duration, Instant},
};

use odonto_core::{session::ChartSession, store::NoteStore};
use uuid::Uuid;

pub type SharedSession<S> = Arc<tokio::sync::Mutex<ChartSession<S>>>;

struct Entry<S> {
  session:   SharedSession<S>,
  last_used: Instant,
}

pub struct SessionRegistry<S> {
  sessions: Mutex<HashMap<Uuid, Entry<S>>>,
}

impl<S> Default for SessionRegistry<S> {
  fn default() -> Self { Self { sessions: Mutex::new(HashMap::new()) } }
}

impl<S: NoteStore> SessionRegistry<S> {
  pub fn new() -> Self { Self::default() }

  /// Start a fresh session over `store`.
  pub fn open(&self, store: Arc<S>) -> (Uuid, SharedSession<S>) {
    let id = Uuid::new_v4();
    let session = Arc::new(tokio::sync::Mutex::new(ChartSession::new(store)));
    self
      .sessions
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .insert(id, Entry { session: session.clone(), last_used: Instant::now() });
    tracing::debug!(%id, "opened chart session");
    (id, session)
  }

  /// Look up a session and mark it as used now.
  pub fn get(&self, id: Uuid) -> Option<SharedSession<S>> {
    let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
    let entry = sessions.get_mut(&id)?;
    entry.last_used = Instant::now();
    Some(entry.session.clone())
  }

  /// Drop a session. Returns `false` if it did not exist.
  pub fn close(&self, id: Uuid) -> bool {
    let removed = self
      .sessions
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .remove(&id)
      .is_some();
    if removed {
      tracing::debug!(%id, "closed chart session");
    }
    removed
  }

  /// Drop every session not looked up for at least `max_idle`. Returns how
  /// many were dropped. A request already holding a dropped session finishes
  /// normally; later lookups of its id fail.
  pub fn sweep_idle(&self, max_idle: Duration) -> usize {
    let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
    let before = sessions.len();
    sessions.retain(|id, entry| {
      let keep = entry.last_used.elapsed() < max_idle;
      if !keep {
        tracing::debug!(%id, "expired idle chart session");
      }
      keep
    });
    before - sessions.len()
  }

  pub fn len(&self) -> usize {
    self.sessions.lock().unwrap_or_else(PoisonError::into_inner).len()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}
