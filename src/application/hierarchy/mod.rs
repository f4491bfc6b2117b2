use std::collections::HashSet;

use crate::application::errors::ItemError;
use crate::application::ports::folder_repository::FolderRepository;
use crate::application::ports::link_repository::LinkRepository;
use crate::domain::items::{Folder, Item, ItemKey, ItemKind, Link};

// Ownership and containment rules shared by the link, folder and item use
// cases. Missing and foreign-owned records are indistinguishable to callers:
// both come back as NotAuthorized.

pub async fn resolve_parent<F>(
    folders: &F,
    owner_id: i64,
    parent_id: Option<i64>,
) -> Result<Option<Folder>, ItemError>
where
    F: FolderRepository + ?Sized,
{
    let Some(parent_id) = parent_id else {
        return Ok(None);
    };
    match folders.get_owned(parent_id, owner_id).await? {
        Some(folder) => Ok(Some(folder)),
        None => Err(ItemError::NotAuthorized("Parent folder not found")),
    }
}

pub async fn require_owned_link<L>(links: &L, owner_id: i64, id: i64) -> Result<Link, ItemError>
where
    L: LinkRepository + ?Sized,
{
    match links.get_by_id(id).await? {
        Some(link) if link.owner_id == owner_id => Ok(link),
        _ => Err(ItemError::NotAuthorized("Access to resource denied")),
    }
}

pub async fn require_owned_folder<F>(
    folders: &F,
    owner_id: i64,
    id: i64,
) -> Result<Folder, ItemError>
where
    F: FolderRepository + ?Sized,
{
    match folders.get_by_id(id).await? {
        Some(folder) if folder.owner_id == owner_id => Ok(folder),
        _ => Err(ItemError::NotAuthorized("Access to resource denied")),
    }
}

pub async fn require_owned_item<L, F>(
    links: &L,
    folders: &F,
    owner_id: i64,
    key: ItemKey,
) -> Result<Item, ItemError>
where
    L: LinkRepository + ?Sized,
    F: FolderRepository + ?Sized,
{
    match key.kind {
        ItemKind::Link => require_owned_link(links, owner_id, key.id)
            .await
            .map(Item::Link),
        ItemKind::Folder => require_owned_folder(folders, owner_id, key.id)
            .await
            .map(Item::Folder),
    }
}

/// Rejects placing `folder_id` under `target_id` when the target is the folder
/// itself or one of its descendants.
pub async fn ensure_not_within<F>(
    folders: &F,
    folder_id: i64,
    target_id: i64,
) -> Result<(), ItemError>
where
    F: FolderRepository + ?Sized,
{
    let mut seen = HashSet::new();
    let mut current = Some(target_id);
    while let Some(id) = current {
        if id == folder_id {
            return Err(ItemError::Conflict(
                "Folder cannot be moved into its own subtree",
            ));
        }
        if !seen.insert(id) {
            break;
        }
        current = folders.get_by_id(id).await?.and_then(|f| f.parent_id);
    }
    Ok(())
}

/// Moves an item under `target_folder_id` (root when `None`) and clears its
/// position so it lands at the unordered tail of the new container.
pub async fn move_item<L, F>(
    links: &L,
    folders: &F,
    owner_id: i64,
    key: ItemKey,
    target_folder_id: Option<i64>,
) -> Result<Item, ItemError>
where
    L: LinkRepository + ?Sized,
    F: FolderRepository + ?Sized,
{
    let item = require_owned_item(links, folders, owner_id, key).await?;
    if item.parent_id() == target_folder_id {
        return Err(ItemError::Conflict("Item is already in the target folder"));
    }
    if let Some(target) = target_folder_id {
        if folders.get_owned(target, owner_id).await?.is_none() {
            return Err(ItemError::NotAuthorized(
                "Folder not found or not owned by user",
            ));
        }
        if key.kind == ItemKind::Folder {
            ensure_not_within(folders, key.id, target).await?;
        }
    }
    let moved = match key.kind {
        ItemKind::Link => links
            .set_folder(key.id, target_folder_id)
            .await?
            .map(Item::Link),
        ItemKind::Folder => folders
            .set_parent(key.id, target_folder_id)
            .await?
            .map(Item::Folder),
    };
    // Deleted between the ownership check and the write
    moved.ok_or(ItemError::NotAuthorized("Access to resource denied"))
}

/// Deletes an owned folder together with everything below it and returns the
/// keys of all removed records.
pub async fn delete_folder<F>(
    folders: &F,
    owner_id: i64,
    folder_id: i64,
) -> Result<Vec<ItemKey>, ItemError>
where
    F: FolderRepository + ?Sized,
{
    require_owned_folder(folders, owner_id, folder_id).await?;
    let subtree = folders.subtree_keys(folder_id).await?;
    if !folders.delete(folder_id).await? {
        return Err(ItemError::NotAuthorized("Access to resource denied"));
    }
    Ok(subtree)
}

pub async fn delete_link<L>(links: &L, owner_id: i64, link_id: i64) -> Result<ItemKey, ItemError>
where
    L: LinkRepository + ?Sized,
{
    require_owned_link(links, owner_id, link_id).await?;
    if !links.delete(link_id).await? {
        return Err(ItemError::NotAuthorized("Access to resource denied"));
    }
    Ok(ItemKey::link(link_id))
}
