//! In-memory session store
//!
//! Sessions live only as long as the process. An absent entry is an `Idle`
//! session, so resetting a user removes the entry.

use crate::state_machine::{SessionState, UserId};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Per-user sessions, safe to share between concurrently running handlers
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<UserId, SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for `user`, `Idle` if there is no session yet
    pub async fn get(&self, user: UserId) -> SessionState {
        self.sessions
            .read()
            .await
            .get(&user)
            .cloned()
            .unwrap_or_default()
    }

    /// Store a new state; storing `Idle` clears the session
    pub async fn set(&self, user: UserId, state: SessionState) {
        if state.is_idle() {
            self.clear(user).await;
        } else {
            self.sessions.write().await.insert(user, state);
        }
    }

    pub async fn clear(&self, user: UserId) {
        self.sessions.write().await.remove(&user);
    }

    /// Number of users with a flow in progress
    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}
