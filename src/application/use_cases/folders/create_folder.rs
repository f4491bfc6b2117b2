use uuid::Uuid;

use crate::application::errors::ItemError;
use crate::application::hierarchy;
use crate::application::pagination::update_snapshot;
use crate::application::ports::folder_repository::{FolderRepository, NewFolder};
use crate::application::ports::session_store::{CursorScope, SessionStore};
use crate::domain::items::{Folder, Item};

pub struct CreateFolder<'a, F, S>
where
    F: FolderRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    pub folders: &'a F,
    pub sessions: &'a S,
}

impl<'a, F, S> CreateFolder<'a, F, S>
where
    F: FolderRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    pub async fn execute(
        &self,
        session: Uuid,
        owner_id: i64,
        folder: &NewFolder,
    ) -> Result<Folder, ItemError> {
        hierarchy::resolve_parent(self.folders, owner_id, folder.parent_id).await?;
        let created = self.folders.create_for_owner(owner_id, folder).await?;
        let cached = Item::Folder(created.clone());
        update_snapshot(self.sessions, session, CursorScope::Own(owner_id), |snap| {
            snap.insert(cached)
        })
        .await;
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::MemoryStore;
    use crate::application::use_cases::items::browse_items::BrowseItems;
    use crate::domain::items::ItemKey;
    use crate::infrastructure::session::InMemorySessionStore;
    use std::time::Duration;

    #[tokio::test]
    async fn new_folder_joins_cached_snapshot_in_order() {
        let store = MemoryStore::new();
        let sessions = InMemorySessionStore::new(Duration::from_secs(60));
        let alice = store.add_user("alice");
        let a = store.add_link(alice, None, Some(1));
        let b = store.add_link(alice, None, Some(3));
        let sid = Uuid::new_v4();
        BrowseItems {
            links: &store,
            folders: &store,
            sessions: &sessions,
            page_size: 5,
        }
        .page(sid, CursorScope::Own(alice), 1)
        .await
        .unwrap();

        let uc = CreateFolder {
            folders: &store,
            sessions: &sessions,
        };
        let folder = uc
            .execute(
                sid,
                alice,
                &NewFolder {
                    title: "reading".into(),
                    parent_id: None,
                    position: Some(2),
                },
            )
            .await
            .unwrap();

        let snapshot = sessions
            .load_cursor(sid, CursorScope::Own(alice))
            .await
            .unwrap()
            .unwrap()
            .snapshot
            .unwrap();
        let keys: Vec<ItemKey> = snapshot.items().iter().map(Item::key).collect();
        assert_eq!(
            keys,
            vec![
                ItemKey::link(a.id),
                ItemKey::folder(folder.id),
                ItemKey::link(b.id)
            ]
        );
    }

    #[tokio::test]
    async fn missing_parent_is_rejected() {
        let store = MemoryStore::new();
        let sessions = InMemorySessionStore::new(Duration::from_secs(60));
        let alice = store.add_user("alice");

        let uc = CreateFolder {
            folders: &store,
            sessions: &sessions,
        };
        let err = uc
            .execute(
                Uuid::new_v4(),
                alice,
                &NewFolder {
                    title: "orphan".into(),
                    parent_id: Some(404),
                    position: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ItemError::NotAuthorized(_)));
        assert_eq!(store.record_count(), 0);
    }
}
