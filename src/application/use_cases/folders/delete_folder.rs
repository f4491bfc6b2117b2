use uuid::Uuid;

use crate::application::errors::ItemError;
use crate::application::hierarchy;
use crate::application::pagination::update_snapshot;
use crate::application::ports::folder_repository::FolderRepository;
use crate::application::ports::session_store::{CursorScope, SessionStore};

/// Deletes an owned folder with its whole subtree and evicts every removed
/// record from the session's cached list.
pub struct DeleteFolder<'a, F, S>
where
    F: FolderRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    pub folders: &'a F,
    pub sessions: &'a S,
}

impl<'a, F, S> DeleteFolder<'a, F, S>
where
    F: FolderRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    pub async fn execute(&self, session: Uuid, owner_id: i64, id: i64) -> Result<usize, ItemError> {
        let removed = hierarchy::delete_folder(self.folders, owner_id, id).await?;
        let count = removed.len();
        update_snapshot(self.sessions, session, CursorScope::Own(owner_id), |snap| {
            snap.evict(&removed)
        })
        .await;
        tracing::debug!(owner_id, folder_id = id, removed = count, "folder_deleted");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::MemoryStore;
    use crate::application::use_cases::items::browse_items::BrowseItems;
    use crate::domain::items::{Item, ItemKey};
    use crate::infrastructure::session::InMemorySessionStore;
    use std::time::Duration;

    #[tokio::test]
    async fn subtree_leaves_the_cached_snapshot() {
        let store = MemoryStore::new();
        let sessions = InMemorySessionStore::new(Duration::from_secs(60));
        let alice = store.add_user("alice");
        let folder = store.add_folder(alice, None, Some(1));
        store.add_link(alice, Some(folder.id), Some(1));
        let sub = store.add_folder(alice, Some(folder.id), Some(2));
        store.add_link(alice, Some(sub.id), None);
        let survivor = store.add_link(alice, None, Some(2));
        let sid = Uuid::new_v4();
        let first = BrowseItems {
            links: &store,
            folders: &store,
            sessions: &sessions,
            page_size: 10,
        }
        .page(sid, CursorScope::Own(alice), 1)
        .await
        .unwrap();
        assert_eq!(first.items.len(), 5);

        let removed = DeleteFolder {
            folders: &store,
            sessions: &sessions,
        }
        .execute(sid, alice, folder.id)
        .await
        .unwrap();
        assert_eq!(removed, 4);

        let snapshot = sessions
            .load_cursor(sid, CursorScope::Own(alice))
            .await
            .unwrap()
            .unwrap()
            .snapshot
            .unwrap();
        let keys: Vec<ItemKey> = snapshot.items().iter().map(Item::key).collect();
        assert_eq!(keys, vec![ItemKey::link(survivor.id)]);
    }
}
