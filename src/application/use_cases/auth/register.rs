use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::auth::{AuthError, hash_password};
use crate::domain::users::User;

pub struct Register<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> Register<'a, R> {
    pub async fn execute(&self, req: &RegisterRequest) -> Result<User, AuthError> {
        if self.repo.find_by_email(&req.email).await?.is_some()
            || self.repo.find_by_username(&req.username).await?.is_some()
        {
            return Err(AuthError::CredentialsTaken);
        }
        let hash = hash_password(&req.password)?;
        let user = self
            .repo
            .create_user(&req.email, &req.username, &hash)
            .await?;
        Ok(user)
    }
}
