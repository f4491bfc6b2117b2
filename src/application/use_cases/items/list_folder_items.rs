use crate::application::errors::ItemError;
use crate::application::ports::folder_repository::FolderRepository;
use crate::application::ports::link_repository::LinkRepository;
use crate::application::use_cases::items::list_items::ListItems;
use crate::domain::items::{Item, ParentScope};

/// Direct children (links and sub-folders) of one folder, ordered.
pub struct ListFolderItems<'a, L, F>
where
    L: LinkRepository + ?Sized,
    F: FolderRepository + ?Sized,
{
    pub links: &'a L,
    pub folders: &'a F,
}

impl<'a, L, F> ListFolderItems<'a, L, F>
where
    L: LinkRepository + ?Sized,
    F: FolderRepository + ?Sized,
{
    pub async fn execute(&self, owner_id: i64, folder_id: i64) -> Result<Vec<Item>, ItemError> {
        // read-only lookup: an unknown folder is simply not found
        if self.folders.get_owned(folder_id, owner_id).await?.is_none() {
            return Err(ItemError::NotFound("Folder not found"));
        }
        ListItems {
            links: self.links,
            folders: self.folders,
        }
        .execute(owner_id, ParentScope::In(folder_id))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::MemoryStore;
    use crate::domain::items::ItemKey;

    #[tokio::test]
    async fn lists_only_direct_children_in_order() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice");
        let folder = store.add_folder(alice, None, Some(1));
        let loose = store.add_link(alice, Some(folder.id), None);
        let sub = store.add_folder(alice, Some(folder.id), Some(2));
        let first = store.add_link(alice, Some(folder.id), Some(1));
        let nested = store.add_folder(alice, Some(sub.id), None);
        store.add_link(alice, None, Some(1));

        let uc = ListFolderItems {
            links: &store,
            folders: &store,
        };
        let keys: Vec<ItemKey> = uc
            .execute(alice, folder.id)
            .await
            .unwrap()
            .iter()
            .map(Item::key)
            .collect();
        assert_eq!(
            keys,
            vec![
                ItemKey::link(first.id),
                ItemKey::folder(sub.id),
                ItemKey::link(loose.id)
            ]
        );
        assert!(!keys.contains(&ItemKey::folder(nested.id)));
    }

    #[tokio::test]
    async fn foreign_folder_is_not_found() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice");
        let bob = store.add_user("bob");
        let folder = store.add_folder(bob, None, None);
        let uc = ListFolderItems {
            links: &store,
            folders: &store,
        };
        assert!(matches!(
            uc.execute(alice, folder.id).await.unwrap_err(),
            ItemError::NotFound(_)
        ));
    }
}
