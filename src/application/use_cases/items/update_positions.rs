use serde_json::Value;
use uuid::Uuid;

use crate::application::errors::ItemError;
use crate::application::pagination::update_snapshot;
use crate::application::ports::folder_repository::FolderRepository;
use crate::application::ports::item_position_repository::{
    ItemPositionRepository, PositionUpdate,
};
use crate::application::ports::link_repository::LinkRepository;
use crate::application::ports::session_store::{CursorScope, SessionStore};
use crate::application::use_cases::items::list_items::ListItems;
use crate::domain::items::{Item, ItemKey, ItemKind, ParentScope};

/// Reads a position batch from a raw JSON body. Runs before any store access.
pub fn parse_batch(body: &Value) -> Result<Vec<PositionUpdate>, ItemError> {
    let Some(entries) = body.as_array() else {
        return Err(ItemError::NotAuthorized("Items position should be an array"));
    };
    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let id = entry
                .get("id")
                .and_then(Value::as_i64)
                .ok_or_else(|| ItemError::InvalidInput(format!("entry {idx}: id must be an integer")))?;
            let kind = entry
                .get("type")
                .and_then(Value::as_str)
                .and_then(ItemKind::parse)
                .ok_or_else(|| {
                    ItemError::InvalidInput(format!(
                        "entry {idx}: type must be \"link\" or \"folder\""
                    ))
                })?;
            let position = entry
                .get("position")
                .and_then(Value::as_i64)
                .and_then(|p| i32::try_from(p).ok())
                .ok_or_else(|| {
                    ItemError::InvalidInput(format!("entry {idx}: position must be an integer"))
                })?;
            Ok(PositionUpdate {
                key: ItemKey { kind, id },
                position,
            })
        })
        .collect()
}

/// Applies a batch of manual positions for one owner.
///
/// Ownership of every id is checked per kind before anything is written; a
/// single foreign or missing id rejects the whole batch. The writes then go
/// through one store transaction, and the owner's full list is re-read and
/// re-sorted for the response.
pub struct UpdatePositions<'a, L, F, P, S>
where
    L: LinkRepository + ?Sized,
    F: FolderRepository + ?Sized,
    P: ItemPositionRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    pub links: &'a L,
    pub folders: &'a F,
    pub positions: &'a P,
    pub sessions: &'a S,
}

impl<'a, L, F, P, S> UpdatePositions<'a, L, F, P, S>
where
    L: LinkRepository + ?Sized,
    F: FolderRepository + ?Sized,
    P: ItemPositionRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    pub async fn execute(
        &self,
        session: Uuid,
        owner_id: i64,
        updates: &[PositionUpdate],
    ) -> Result<Vec<Item>, ItemError> {
        let link_ids: Vec<i64> = ids_of(updates, ItemKind::Link);
        let folder_ids: Vec<i64> = ids_of(updates, ItemKind::Folder);

        let owned_links = if link_ids.is_empty() {
            0
        } else {
            self.links.count_owned(owner_id, &link_ids).await?
        };
        let owned_folders = if folder_ids.is_empty() {
            0
        } else {
            self.folders.count_owned(owner_id, &folder_ids).await?
        };
        if owned_links != link_ids.len() || owned_folders != folder_ids.len() {
            return Err(ItemError::NotAuthorized(
                "Some items do not belong to the user",
            ));
        }

        self.positions.apply_positions(updates).await?;

        let items = ListItems {
            links: self.links,
            folders: self.folders,
        }
        .execute(owner_id, ParentScope::Any)
        .await?;

        let fresh = items.clone();
        update_snapshot(self.sessions, session, CursorScope::Own(owner_id), move |snap| {
            snap.replace(fresh)
        })
        .await;
        Ok(items)
    }
}

fn ids_of(updates: &[PositionUpdate], kind: ItemKind) -> Vec<i64> {
    updates
        .iter()
        .filter(|u| u.key.kind == kind)
        .map(|u| u.key.id)
        .collect()
}
