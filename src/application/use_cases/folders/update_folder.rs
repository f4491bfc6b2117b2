use uuid::Uuid;

use crate::application::errors::ItemError;
use crate::application::hierarchy;
use crate::application::pagination::update_snapshot;
use crate::application::ports::folder_repository::{FolderChanges, FolderRepository};
use crate::application::ports::session_store::{CursorScope, SessionStore};
use crate::domain::items::{Folder, Item};

pub struct UpdateFolder<'a, F, S>
where
    F: FolderRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    pub folders: &'a F,
    pub sessions: &'a S,
}

impl<'a, F, S> UpdateFolder<'a, F, S>
where
    F: FolderRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    pub async fn execute(
        &self,
        session: Uuid,
        owner_id: i64,
        id: i64,
        changes: &FolderChanges,
    ) -> Result<Folder, ItemError> {
        hierarchy::require_owned_folder(self.folders, owner_id, id).await?;
        let updated = self
            .folders
            .update_fields(id, changes)
            .await?
            .ok_or(ItemError::NotAuthorized("Access to resource denied"))?;
        let cached = Item::Folder(updated.clone());
        update_snapshot(self.sessions, session, CursorScope::Own(owner_id), |snap| {
            snap.insert(cached)
        })
        .await;
        Ok(updated)
    }
}
