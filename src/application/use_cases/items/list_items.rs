use crate::application::errors::ItemError;
use crate::application::ordering;
use crate::application::ports::folder_repository::FolderRepository;
use crate::application::ports::link_repository::LinkRepository;
use crate::domain::items::{Item, ParentScope};

/// Merged, ordered links and folders of one owner.
pub struct ListItems<'a, L, F>
where
    L: LinkRepository + ?Sized,
    F: FolderRepository + ?Sized,
{
    pub links: &'a L,
    pub folders: &'a F,
}

impl<'a, L, F> ListItems<'a, L, F>
where
    L: LinkRepository + ?Sized,
    F: FolderRepository + ?Sized,
{
    pub async fn execute(&self, owner_id: i64, scope: ParentScope) -> Result<Vec<Item>, ItemError> {
        let links = self.links.list_for_owner(owner_id, scope).await?;
        let folders = self.folders.list_for_owner(owner_id, scope).await?;
        Ok(ordering::merge(links, folders))
    }
}
