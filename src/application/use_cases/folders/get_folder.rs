use crate::application::errors::ItemError;
use crate::application::ports::folder_repository::FolderRepository;
use crate::domain::items::Folder;

pub struct GetFolder<'a, F: FolderRepository + ?Sized> {
    pub folders: &'a F,
}

impl<'a, F: FolderRepository + ?Sized> GetFolder<'a, F> {
    pub async fn execute(&self, owner_id: i64, id: i64) -> Result<Folder, ItemError> {
        self.folders
            .get_owned(id, owner_id)
            .await?
            .ok_or(ItemError::NotFound("Folder not found"))
    }
}
