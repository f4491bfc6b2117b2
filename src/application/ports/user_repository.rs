use async_trait::async_trait;

use crate::domain::users::User;

#[derive(Debug, Clone)]
pub struct UserRow {
    pub user: User,
    pub password_hash: Option<String>,
}

/// Profile fields a user may edit; `None` leaves the stored value as is.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> anyhow::Result<User>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRow>>;
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<UserRow>>;
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;
    async fn update_profile(
        &self,
        id: i64,
        changes: &ProfileChanges,
    ) -> anyhow::Result<Option<User>>;
    async fn update_password_hash(&self, id: i64, password_hash: &str) -> anyhow::Result<bool>;
    async fn delete_user(&self, id: i64) -> anyhow::Result<bool>;
}
