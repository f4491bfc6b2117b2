use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::application::ports::session_store::{CursorScope, CursorState, SessionStore};

struct SessionEntry {
    cursors: HashMap<CursorScope, CursorState>,
    touched_at: Instant,
}

/// Process-local session state. Each access refreshes the session's idle
/// timer; sessions idle for longer than `ttl` read as empty and are dropped by
/// `prune_expired`.
pub struct InMemorySessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn is_live(&self, entry: &SessionEntry, now: Instant) -> bool {
        now.duration_since(entry.touched_at) <= self.ttl
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load_cursor(
        &self,
        session: Uuid,
        scope: CursorScope,
    ) -> anyhow::Result<Option<CursorState>> {
        let now = Instant::now();
        let mut guard = self.sessions.write().await;
        let Some(entry) = guard.get_mut(&session) else {
            return Ok(None);
        };
        if !self.is_live(entry, now) {
            guard.remove(&session);
            return Ok(None);
        }
        entry.touched_at = now;
        Ok(entry.cursors.get(&scope).cloned())
    }

    async fn save_cursor(
        &self,
        session: Uuid,
        scope: CursorScope,
        state: CursorState,
    ) -> anyhow::Result<()> {
        let now = Instant::now();
        let mut guard = self.sessions.write().await;
        let entry = guard.entry(session).or_insert_with(|| SessionEntry {
            cursors: HashMap::new(),
            touched_at: now,
        });
        if !self.is_live(entry, now) {
            entry.cursors.clear();
        }
        entry.touched_at = now;
        entry.cursors.insert(scope, state);
        Ok(())
    }

    async fn clear(&self, session: Uuid) -> anyhow::Result<()> {
        self.sessions.write().await.remove(&session);
        Ok(())
    }

    async fn prune_expired(&self) -> anyhow::Result<usize> {
        let now = Instant::now();
        let mut guard = self.sessions.write().await;
        let before = guard.len();
        guard.retain(|_, entry| now.duration_since(entry.touched_at) <= self.ttl);
        Ok(before - guard.len())
    }
}
