use async_trait::async_trait;
use uuid::Uuid;

use crate::application::pagination::ItemSnapshot;

/// Cursor namespace inside one session. Each scope pages independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorScope {
    /// The signed-in user browsing their own items.
    Own(i64),
    /// Browsing another user's items, keyed by that user's id.
    Other(i64),
}

impl CursorScope {
    pub fn owner_id(&self) -> i64 {
        match self {
            CursorScope::Own(id) | CursorScope::Other(id) => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CursorState {
    pub page: u32,
    pub snapshot: Option<ItemSnapshot>,
}

impl Default for CursorState {
    fn default() -> Self {
        Self {
            page: 1,
            snapshot: None,
        }
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load_cursor(
        &self,
        session: Uuid,
        scope: CursorScope,
    ) -> anyhow::Result<Option<CursorState>>;

    async fn save_cursor(
        &self,
        session: Uuid,
        scope: CursorScope,
        state: CursorState,
    ) -> anyhow::Result<()>;

    async fn clear(&self, session: Uuid) -> anyhow::Result<()>;

    /// Drops expired sessions, returning how many were removed.
    async fn prune_expired(&self) -> anyhow::Result<usize>;
}
