use uuid::Uuid;

use crate::application::errors::ItemError;
use crate::application::hierarchy;
use crate::application::pagination::update_snapshot;
use crate::application::ports::folder_repository::FolderRepository;
use crate::application::ports::link_repository::{LinkRepository, NewLink};
use crate::application::ports::session_store::{CursorScope, SessionStore};
use crate::domain::items::{Item, Link};

pub struct CreateLink<'a, L, F, S>
where
    L: LinkRepository + ?Sized,
    F: FolderRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    pub links: &'a L,
    pub folders: &'a F,
    pub sessions: &'a S,
}

impl<'a, L, F, S> CreateLink<'a, L, F, S>
where
    L: LinkRepository + ?Sized,
    F: FolderRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    pub async fn execute(
        &self,
        session: Uuid,
        owner_id: i64,
        link: &NewLink,
    ) -> Result<Link, ItemError> {
        hierarchy::resolve_parent(self.folders, owner_id, link.folder_id).await?;
        let created = self.links.create_for_owner(owner_id, link).await?;
        let cached = Item::Link(created.clone());
        update_snapshot(self.sessions, session, CursorScope::Own(owner_id), |snap| {
            snap.insert(cached)
        })
        .await;
        Ok(created)
    }
}
