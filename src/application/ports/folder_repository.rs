use async_trait::async_trait;

use crate::domain::items::{Folder, ItemKey, ParentScope};

#[derive(Debug, Clone)]
pub struct NewFolder {
    pub title: String,
    pub parent_id: Option<i64>,
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct FolderChanges {
    pub title: Option<String>,
}

#[async_trait]
pub trait FolderRepository: Send + Sync {
    /// Folders of the owner ordered by `position ASC NULLS LAST, created_at, id`.
    async fn list_for_owner(
        &self,
        owner_id: i64,
        scope: ParentScope,
    ) -> anyhow::Result<Vec<Folder>>;

    async fn list_page_for_owner(
        &self,
        owner_id: i64,
        scope: ParentScope,
        offset: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<Folder>>;

    async fn count_for_owner(&self, owner_id: i64, scope: ParentScope) -> anyhow::Result<i64>;

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Folder>>;

    async fn get_owned(&self, id: i64, owner_id: i64) -> anyhow::Result<Option<Folder>>;

    async fn create_for_owner(&self, owner_id: i64, folder: &NewFolder)
    -> anyhow::Result<Folder>;

    async fn update_fields(
        &self,
        id: i64,
        changes: &FolderChanges,
    ) -> anyhow::Result<Option<Folder>>;

    // Moves the folder and clears its position
    async fn set_parent(&self, id: i64, parent_id: Option<i64>) -> anyhow::Result<Option<Folder>>;

    // Child folders and links go with it (ON DELETE CASCADE)
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;

    async fn count_owned(&self, owner_id: i64, ids: &[i64]) -> anyhow::Result<usize>;

    /// The folder itself plus every descendant folder and link.
    async fn subtree_keys(&self, id: i64) -> anyhow::Result<Vec<ItemKey>>;
}
