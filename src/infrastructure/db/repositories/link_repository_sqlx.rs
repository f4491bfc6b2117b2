use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::ports::link_repository::{LinkChanges, LinkRepository, NewLink};
use crate::domain::items::{Link, ParentScope};
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::{ITEM_ORDER, parent_filter};

const LINK_COLUMNS: &str =
    "id, owner_id, title, description, url, folder_id, position, created_at, updated_at";

pub struct SqlxLinkRepository {
    pub pool: PgPool,
}

impl SqlxLinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn link_from_row(r: &PgRow) -> Link {
    Link {
        id: r.get("id"),
        owner_id: r.get("owner_id"),
        title: r.get("title"),
        description: r.try_get("description").ok().flatten(),
        url: r.get("url"),
        folder_id: r.get("folder_id"),
        position: r.get("position"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

#[async_trait]
impl LinkRepository for SqlxLinkRepository {
    async fn list_for_owner(
        &self,
        owner_id: i64,
        scope: ParentScope,
    ) -> anyhow::Result<Vec<Link>> {
        let (filter, parent) = parent_filter("folder_id", scope, 2);
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE owner_id = $1{filter} {ITEM_ORDER}");
        let mut query = sqlx::query(&sql).bind(owner_id);
        if let Some(parent) = parent {
            query = query.bind(parent);
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(link_from_row).collect())
    }

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Link>> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(link_from_row))
    }

    async fn create_for_owner(&self, owner_id: i64, link: &NewLink) -> anyhow::Result<Link> {
        let sql = format!(
            r#"INSERT INTO links (owner_id, title, description, url, folder_id, position)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {LINK_COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(owner_id)
            .bind(&link.title)
            .bind(&link.description)
            .bind(&link.url)
            .bind(link.folder_id)
            .bind(link.position)
            .fetch_one(&self.pool)
            .await?;
        Ok(link_from_row(&row))
    }

    async fn update_fields(
        &self,
        id: i64,
        changes: &LinkChanges,
    ) -> anyhow::Result<Option<Link>> {
        let sql = format!(
            r#"UPDATE links SET
                 title = COALESCE($2, title),
                 description = CASE WHEN $5 THEN $3 ELSE description END,
                 url = COALESCE($4, url),
                 updated_at = now()
               WHERE id = $1
               RETURNING {LINK_COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&changes.title)
            .bind(changes.description.clone().flatten())
            .bind(&changes.url)
            .bind(changes.description.is_some())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(link_from_row))
    }

    async fn set_folder(&self, id: i64, folder_id: Option<i64>) -> anyhow::Result<Option<Link>> {
        let sql = format!(
            r#"UPDATE links SET folder_id = $2, position = NULL, updated_at = now()
               WHERE id = $1
               RETURNING {LINK_COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(folder_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(link_from_row))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn count_owned(&self, owner_id: i64, ids: &[i64]) -> anyhow::Result<usize> {
        let n: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM links WHERE owner_id = $1 AND id = ANY($2)",
        )
        .bind(owner_id)
        .bind(ids)
        .fetch_one(&self.pool)
        .await?;
        Ok(usize::try_from(n).unwrap_or_default())
    }
}
