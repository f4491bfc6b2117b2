use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::auth::{AuthError, verify_password};
use crate::domain::users::User;

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    pub async fn execute(&self, req: &LoginRequest) -> Result<User, AuthError> {
        let row = self
            .repo
            .find_by_email(&req.email)
            .await?
            .ok_or(AuthError::CredentialsIncorrect)?;
        if verify_password(&req.password, row.password_hash.as_deref()) {
            Ok(row.user)
        } else {
            Err(AuthError::CredentialsIncorrect)
        }
    }
}
