//! Client-side session state.
//!
//! Holds the bearer token and cached user summary between calls, behind a
//! trait so storage can be swapped (in-memory here; a browser shell would
//! back it with local storage).

use crate::auth::models::UserSummary;
use parking_lot::RwLock;

/// A client-held session: bearer token plus cached user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: UserSummary,
}

/// Pluggable session storage
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Option<Session>;
    fn set(&self, session: Session);
    fn clear(&self);
}

/// In-memory session store
#[derive(Default)]
pub struct MemorySessionStore {
    inner: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<Session> {
        self.inner.read().clone()
    }

    fn set(&self, session: Session) {
        *self.inner.write() = Some(session);
    }

    fn clear(&self) {
        *self.inner.write() = None;
    }
}
