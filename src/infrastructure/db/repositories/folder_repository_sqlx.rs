use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::ports::folder_repository::{FolderChanges, FolderRepository, NewFolder};
use crate::domain::items::{Folder, ItemKey, ParentScope};
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::{ITEM_ORDER, parent_filter};

const FOLDER_COLUMNS: &str = "id, owner_id, title, parent_id, position, created_at, updated_at";

pub struct SqlxFolderRepository {
    pub pool: PgPool,
}

impl SqlxFolderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn folder_from_row(r: &PgRow) -> Folder {
    Folder {
        id: r.get("id"),
        owner_id: r.get("owner_id"),
        title: r.get("title"),
        parent_id: r.get("parent_id"),
        position: r.get("position"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

#[async_trait]
impl FolderRepository for SqlxFolderRepository {
    async fn list_for_owner(
        &self,
        owner_id: i64,
        scope: ParentScope,
    ) -> anyhow::Result<Vec<Folder>> {
        let (filter, parent) = parent_filter("parent_id", scope, 2);
        let sql =
            format!("SELECT {FOLDER_COLUMNS} FROM folders WHERE owner_id = $1{filter} {ITEM_ORDER}");
        let mut query = sqlx::query(&sql).bind(owner_id);
        if let Some(parent) = parent {
            query = query.bind(parent);
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(folder_from_row).collect())
    }

    async fn list_page_for_owner(
        &self,
        owner_id: i64,
        scope: ParentScope,
        offset: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<Folder>> {
        let (filter, parent) = parent_filter("parent_id", scope, 4);
        let sql = format!(
            "SELECT {FOLDER_COLUMNS} FROM folders WHERE owner_id = $1{filter} {ITEM_ORDER} OFFSET $2 LIMIT $3"
        );
        let mut query = sqlx::query(&sql).bind(owner_id).bind(offset).bind(limit);
        if let Some(parent) = parent {
            query = query.bind(parent);
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(folder_from_row).collect())
    }

    async fn count_for_owner(&self, owner_id: i64, scope: ParentScope) -> anyhow::Result<i64> {
        let (filter, parent) = parent_filter("parent_id", scope, 2);
        let sql = format!("SELECT COUNT(*) FROM folders WHERE owner_id = $1{filter}");
        let mut query = sqlx::query_scalar::<_, i64>(&sql).bind(owner_id);
        if let Some(parent) = parent {
            query = query.bind(parent);
        }
        Ok(query.fetch_one(&self.pool).await?)
    }

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Folder>> {
        let sql = format!("SELECT {FOLDER_COLUMNS} FROM folders WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(folder_from_row))
    }

    async fn get_owned(&self, id: i64, owner_id: i64) -> anyhow::Result<Option<Folder>> {
        let sql = format!("SELECT {FOLDER_COLUMNS} FROM folders WHERE id = $1 AND owner_id = $2");
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(folder_from_row))
    }

    async fn create_for_owner(
        &self,
        owner_id: i64,
        folder: &NewFolder,
    ) -> anyhow::Result<Folder> {
        let sql = format!(
            r#"INSERT INTO folders (owner_id, title, parent_id, position)
               VALUES ($1, $2, $3, $4)
               RETURNING {FOLDER_COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(owner_id)
            .bind(&folder.title)
            .bind(folder.parent_id)
            .bind(folder.position)
            .fetch_one(&self.pool)
            .await?;
        Ok(folder_from_row(&row))
    }

    async fn update_fields(
        &self,
        id: i64,
        changes: &FolderChanges,
    ) -> anyhow::Result<Option<Folder>> {
        let sql = format!(
            r#"UPDATE folders SET title = COALESCE($2, title), updated_at = now()
               WHERE id = $1
               RETURNING {FOLDER_COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&changes.title)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(folder_from_row))
    }

    async fn set_parent(&self, id: i64, parent_id: Option<i64>) -> anyhow::Result<Option<Folder>> {
        let sql = format!(
            r#"UPDATE folders SET parent_id = $2, position = NULL, updated_at = now()
               WHERE id = $1
               RETURNING {FOLDER_COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(parent_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(folder_from_row))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn count_owned(&self, owner_id: i64, ids: &[i64]) -> anyhow::Result<usize> {
        let n: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM folders WHERE owner_id = $1 AND id = ANY($2)",
        )
        .bind(owner_id)
        .bind(ids)
        .fetch_one(&self.pool)
        .await?;
        Ok(usize::try_from(n).unwrap_or_default())
    }

    async fn subtree_keys(&self, id: i64) -> anyhow::Result<Vec<ItemKey>> {
        let rows = sqlx::query(
            r#"
            WITH RECURSIVE subtree AS (
              SELECT id FROM folders WHERE id = $1
              UNION ALL
              SELECT f.id FROM folders f JOIN subtree s ON f.parent_id = s.id
            )
            SELECT 'folder' AS kind, id FROM subtree
            UNION ALL
            SELECT 'link' AS kind, l.id FROM links l JOIN subtree s ON l.folder_id = s.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(|r| {
                let kind: String = r.get("kind");
                let id: i64 = r.get("id");
                if kind == "link" {
                    ItemKey::link(id)
                } else {
                    ItemKey::folder(id)
                }
            })
            .collect())
    }
}
