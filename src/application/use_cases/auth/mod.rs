use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;

pub mod change_password;
pub mod login;
pub mod me;
pub mod register;

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("Credentials taken")]
    CredentialsTaken,
    #[error("Credentials incorrect")]
    CredentialsIncorrect,
    #[error("user store failed")]
    Store(#[from] anyhow::Error),
}

pub(crate) fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string())
}

// A missing or unparsable stored hash never verifies
pub(crate) fn verify_password(password: &str, stored: Option<&str>) -> bool {
    let Some(stored) = stored else {
        return false;
    };
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
