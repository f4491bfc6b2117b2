use async_trait::async_trait;

use crate::application::ports::item_position_repository::{
    ItemPositionRepository, PositionUpdate,
};
use crate::domain::items::ItemKind;
use crate::infrastructure::db::PgPool;

pub struct SqlxItemPositionRepository {
    pub pool: PgPool,
}

impl SqlxItemPositionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemPositionRepository for SqlxItemPositionRepository {
    async fn apply_positions(&self, updates: &[PositionUpdate]) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;
        for update in updates {
            let sql = match update.key.kind {
                ItemKind::Link => "UPDATE links SET position = $2, updated_at = now() WHERE id = $1",
                ItemKind::Folder => {
                    "UPDATE folders SET position = $2, updated_at = now() WHERE id = $1"
                }
            };
            let res = sqlx::query(sql)
                .bind(update.key.id)
                .bind(update.position)
                .execute(&mut *tx)
                .await?;
            // dropping the transaction rolls back what was already written
            anyhow::ensure!(
                res.rows_affected() == 1,
                "{} {} vanished during position update",
                update.key.kind,
                update.key.id
            );
        }
        tx.commit().await?;
        Ok(())
    }
}
