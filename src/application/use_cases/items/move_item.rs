use uuid::Uuid;

use crate::application::errors::ItemError;
use crate::application::hierarchy;
use crate::application::pagination::update_snapshot;
use crate::application::ports::folder_repository::FolderRepository;
use crate::application::ports::link_repository::LinkRepository;
use crate::application::ports::session_store::{CursorScope, SessionStore};
use crate::domain::items::{Item, ItemKey};

pub struct MoveItem<'a, L, F, S>
where
    L: LinkRepository + ?Sized,
    F: FolderRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    pub links: &'a L,
    pub folders: &'a F,
    pub sessions: &'a S,
}

impl<'a, L, F, S> MoveItem<'a, L, F, S>
where
    L: LinkRepository + ?Sized,
    F: FolderRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    pub async fn execute(
        &self,
        session: Uuid,
        owner_id: i64,
        key: ItemKey,
        target_folder_id: Option<i64>,
    ) -> Result<Item, ItemError> {
        let moved =
            hierarchy::move_item(self.links, self.folders, owner_id, key, target_folder_id).await?;
        update_snapshot(self.sessions, session, CursorScope::Own(owner_id), |snap| {
            snap.relocate(key, target_folder_id)
        })
        .await;
        tracing::debug!(owner_id, kind = %key.kind, id = key.id, ?target_folder_id, "item_moved");
        Ok(moved)
    }
}
