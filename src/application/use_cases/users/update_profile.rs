use crate::application::errors::ItemError;
use crate::application::ports::user_repository::{ProfileChanges, UserRepository};
use crate::domain::users::User;

/// Edits the signed-in user's names and email. Username and password have
/// their own flows.
pub struct UpdateProfile<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> UpdateProfile<'a, R> {
    pub async fn execute(&self, user_id: i64, changes: &ProfileChanges) -> Result<User, ItemError> {
        if let Some(email) = &changes.email {
            if !email.contains('@') {
                return Err(ItemError::InvalidInput("email must be a valid address".into()));
            }
            if let Some(other) = self.repo.find_by_email(email).await? {
                if other.user.id != user_id {
                    return Err(ItemError::Conflict("Email already in use"));
                }
            }
        }
        let user = self
            .repo
            .update_profile(user_id, changes)
            .await?
            .ok_or(ItemError::NotFound("User not found"))?;
        tracing::info!(user_id, "profile_updated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::MemoryStore;
    use crate::application::use_cases::users::get_profile::GetProfile;

    #[tokio::test]
    async fn writes_names_and_keeps_untouched_fields() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice");
        let uc = UpdateProfile { repo: &store };

        let updated = uc
            .execute(
                alice,
                &ProfileChanges {
                    first_name: Some("Alice".into()),
                    last_name: Some("Liddell".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.first_name.as_deref(), Some("Alice"));
        assert_eq!(updated.last_name.as_deref(), Some("Liddell"));
        assert_eq!(updated.email, "alice@example.com");

        let updated = uc
            .execute(
                alice,
                &ProfileChanges {
                    email: Some("alice@wonderland.example".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.email, "alice@wonderland.example");
        assert_eq!(updated.first_name.as_deref(), Some("Alice"));

        let stored = GetProfile { repo: &store }.execute("alice").await.unwrap();
        assert_eq!(stored.last_name.as_deref(), Some("Liddell"));
    }

    #[tokio::test]
    async fn email_of_another_user_is_a_conflict() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice");
        store.add_user("bob");
        let uc = UpdateProfile { repo: &store };

        let err = uc
            .execute(
                alice,
                &ProfileChanges {
                    email: Some("bob@example.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ItemError::Conflict(_)));

        let err = uc
            .execute(
                alice,
                &ProfileChanges {
                    email: Some("not-an-address".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ItemError::InvalidInput(_)));

        let same = uc
            .execute(
                alice,
                &ProfileChanges {
                    email: Some("alice@example.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(same.email, "alice@example.com");
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let store = MemoryStore::new();
        let err = UpdateProfile { repo: &store }
            .execute(404, &ProfileChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ItemError::NotFound(_)));
    }
}
