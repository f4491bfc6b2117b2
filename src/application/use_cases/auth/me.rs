use crate::application::ports::user_repository::UserRepository;
use crate::domain::users::User;

pub struct GetMe<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> GetMe<'a, R> {
    pub async fn execute(&self, id: i64) -> anyhow::Result<Option<User>> {
        self.repo.find_by_id(id).await
    }
}
