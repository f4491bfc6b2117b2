use crate::application::errors::ItemError;
use crate::application::ports::link_repository::LinkRepository;
use crate::domain::items::{Link, ParentScope};

/// Links of one owner, all of them or only those directly inside `folder_id`.
pub struct ListLinks<'a, L: LinkRepository + ?Sized> {
    pub links: &'a L,
}

impl<'a, L: LinkRepository + ?Sized> ListLinks<'a, L> {
    pub async fn execute(
        &self,
        owner_id: i64,
        folder_id: Option<i64>,
    ) -> Result<Vec<Link>, ItemError> {
        let scope = match folder_id {
            Some(id) => ParentScope::In(id),
            None => ParentScope::Any,
        };
        Ok(self.links.list_for_owner(owner_id, scope).await?)
    }
}
