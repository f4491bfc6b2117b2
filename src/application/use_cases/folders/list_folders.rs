use crate::application::errors::ItemError;
use crate::application::ports::folder_repository::FolderRepository;
use crate::domain::items::{Folder, ParentScope};

#[derive(Debug, Clone)]
pub struct FolderPage {
    pub folders: Vec<Folder>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_folders: i64,
}

/// Counted pages over the folders directly under `parent_id` (root level when
/// `None`). Unlike the merged item cursor this keeps no session state.
pub struct ListFolders<'a, F: FolderRepository + ?Sized> {
    pub folders: &'a F,
    pub page_size: usize,
}

impl<'a, F: FolderRepository + ?Sized> ListFolders<'a, F> {
    pub async fn execute(
        &self,
        owner_id: i64,
        parent_id: Option<i64>,
        page: u32,
    ) -> Result<FolderPage, ItemError> {
        let page = page.max(1);
        let size = self.page_size.max(1) as i64;
        let scope = ParentScope::from_parent(parent_id);

        let total = self.folders.count_for_owner(owner_id, scope).await?;
        let offset = (i64::from(page) - 1) * size;
        let folders = self
            .folders
            .list_page_for_owner(owner_id, scope, offset, size)
            .await?;
        let total_pages = u32::try_from((total + size - 1) / size).unwrap_or(u32::MAX);
        Ok(FolderPage {
            folders,
            current_page: page,
            total_pages,
            total_folders: total,
        })
    }
}
