use crate::application::errors::ItemError;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::users::User;

/// Public lookup by username; also resolves the owner id for browsing
/// another user's items.
pub struct GetProfile<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> GetProfile<'a, R> {
    pub async fn execute(&self, username: &str) -> Result<User, ItemError> {
        self.repo
            .find_by_username(username)
            .await?
            .map(|row| row.user)
            .ok_or(ItemError::NotFound("User not found"))
    }
}
