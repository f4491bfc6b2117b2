use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::auth::{AuthError, hash_password, verify_password};

pub struct ChangePassword<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct ChangePasswordRequest {
    /// Email address or username.
    pub identifier: String,
    pub old_password: String,
    pub new_password: String,
}

impl<'a, R: UserRepository + ?Sized> ChangePassword<'a, R> {
    pub async fn execute(&self, req: &ChangePasswordRequest) -> Result<(), AuthError> {
        let row = if req.identifier.contains('@') {
            self.repo.find_by_email(&req.identifier).await?
        } else {
            self.repo.find_by_username(&req.identifier).await?
        };
        let row = row.ok_or(AuthError::CredentialsIncorrect)?;
        if !verify_password(&req.old_password, row.password_hash.as_deref()) {
            return Err(AuthError::CredentialsIncorrect);
        }
        let hash = hash_password(&req.new_password)?;
        if !self.repo.update_password_hash(row.user.id, &hash).await? {
            return Err(AuthError::CredentialsIncorrect);
        }
        tracing::info!(user_id = row.user.id, "password_changed");
        Ok(())
    }
}
