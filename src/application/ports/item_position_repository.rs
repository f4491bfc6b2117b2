use async_trait::async_trait;

use crate::domain::items::ItemKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionUpdate {
    pub key: ItemKey,
    pub position: i32,
}

#[async_trait]
pub trait ItemPositionRepository: Send + Sync {
    /// Writes every position in one transaction; on error nothing is applied.
    async fn apply_positions(&self, updates: &[PositionUpdate]) -> anyhow::Result<()>;
}
