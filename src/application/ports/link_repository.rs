use async_trait::async_trait;

use crate::domain::items::{Link, ParentScope};

#[derive(Debug, Clone)]
pub struct NewLink {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub folder_id: Option<i64>,
    pub position: Option<i32>,
}

// None fields are left untouched; `description: Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct LinkChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub url: Option<String>,
}

#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Links of the owner ordered by `position ASC NULLS LAST, created_at, id`.
    async fn list_for_owner(&self, owner_id: i64, scope: ParentScope)
    -> anyhow::Result<Vec<Link>>;

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Link>>;

    async fn create_for_owner(&self, owner_id: i64, link: &NewLink) -> anyhow::Result<Link>;

    async fn update_fields(&self, id: i64, changes: &LinkChanges)
    -> anyhow::Result<Option<Link>>;

    // Moves the link and clears its position
    async fn set_folder(&self, id: i64, folder_id: Option<i64>) -> anyhow::Result<Option<Link>>;

    async fn delete(&self, id: i64) -> anyhow::Result<bool>;

    /// Number of distinct ids in `ids` owned by `owner_id`.
    async fn count_owned(&self, owner_id: i64, ids: &[i64]) -> anyhow::Result<usize>;
}
