use uuid::Uuid;

use crate::application::ports::session_store::SessionStore;
use crate::application::ports::user_repository::UserRepository;

pub struct DeleteAccount<'a, UR, S>
where
    UR: UserRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    pub user_repo: &'a UR,
    pub sessions: &'a S,
}

impl<'a, UR, S> DeleteAccount<'a, UR, S>
where
    UR: UserRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    /// Removes the user; links and folders go with it through the store's
    /// cascading foreign keys.
    pub async fn execute(&self, session: Uuid, user_id: i64) -> anyhow::Result<()> {
        let deleted = self.user_repo.delete_user(user_id).await?;
        anyhow::ensure!(deleted, "user not found");

        if let Err(err) = self.sessions.clear(session).await {
            tracing::warn!(user_id, error = ?err, "failed to clear session during account deletion");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::ItemError;
    use crate::application::ports::session_store::CursorScope;
    use crate::application::test_support::MemoryStore;
    use crate::application::use_cases::items::browse_items::BrowseItems;
    use crate::application::use_cases::users::get_profile::GetProfile;
    use crate::infrastructure::session::InMemorySessionStore;
    use std::time::Duration;

    #[tokio::test]
    async fn removes_user_items_and_session() {
        let store = MemoryStore::new();
        let sessions = InMemorySessionStore::new(Duration::from_secs(60));
        let alice = store.add_user("alice");
        let bob = store.add_user("bob");
        let folder = store.add_folder(alice, None, None);
        store.add_link(alice, Some(folder.id), None);
        let kept = store.add_link(bob, None, None);
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

        DeleteAccount {
            user_repo: &store,
            sessions: &sessions,
        }
        .execute(sid, alice)
        .await
        .unwrap();

        assert_eq!(store.record_count(), 1);
        assert!(store.link(kept.id).is_some());
        assert!(
            sessions
                .load_cursor(sid, CursorScope::Own(alice))
                .await
                .unwrap()
                .is_none()
        );
        assert!(matches!(
            GetProfile { repo: &store }
                .execute("alice")
                .await
                .unwrap_err(),
            ItemError::NotFound(_)
        ));
        assert_eq!(GetProfile { repo: &store }.execute("bob").await.unwrap().id, bob);
    }
}
