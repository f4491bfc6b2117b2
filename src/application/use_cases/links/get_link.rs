use crate::application::errors::ItemError;
use crate::application::ports::link_repository::LinkRepository;
use crate::domain::items::Link;

pub struct GetLink<'a, L: LinkRepository + ?Sized> {
    pub links: &'a L,
}

impl<'a, L: LinkRepository + ?Sized> GetLink<'a, L> {
    pub async fn execute(&self, owner_id: i64, id: i64) -> Result<Link, ItemError> {
        self.links
            .get_by_id(id)
            .await?
            .filter(|l| l.owner_id == owner_id)
            .ok_or(ItemError::NotFound("Link not found"))
    }
}
