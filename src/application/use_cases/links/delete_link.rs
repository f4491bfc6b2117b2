use uuid::Uuid;

use crate::application::errors::ItemError;
use crate::application::hierarchy;
use crate::application::pagination::update_snapshot;
use crate::application::ports::link_repository::LinkRepository;
use crate::application::ports::session_store::{CursorScope, SessionStore};

pub struct DeleteLink<'a, L, S>
where
    L: LinkRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    pub links: &'a L,
    pub sessions: &'a S,
}

impl<'a, L, S> DeleteLink<'a, L, S>
where
    L: LinkRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    pub async fn execute(&self, session: Uuid, owner_id: i64, id: i64) -> Result<(), ItemError> {
        let key = hierarchy::delete_link(self.links, owner_id, id).await?;
        update_snapshot(self.sessions, session, CursorScope::Own(owner_id), |snap| {
            snap.evict(&[key])
        })
        .await;
        Ok(())
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
    async fn removes_link_from_store_and_snapshot() {
        let store = MemoryStore::new();
        let sessions = InMemorySessionStore::new(Duration::from_secs(60));
        let alice = store.add_user("alice");
        let keep = store.add_link(alice, None, Some(1));
        let gone = store.add_link(alice, None, Some(2));
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

        DeleteLink {
            links: &store,
            sessions: &sessions,
        }
        .execute(sid, alice, gone.id)
        .await
        .unwrap();

        assert!(store.link(gone.id).is_none());
        let snapshot = sessions
            .load_cursor(sid, CursorScope::Own(alice))
            .await
            .unwrap()
            .unwrap()
            .snapshot
            .unwrap();
        let keys: Vec<ItemKey> = snapshot.items().iter().map(Item::key).collect();
        assert_eq!(keys, vec![ItemKey::link(keep.id)]);
    }
}
