use crate::domain::model::{NewUser, User, UserUpdate};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Source of the raw pipe-delimited feed text.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<String>;
}

/// Identity and session boundary.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Checks the credentials and issues a new bearer token.
    async fn authenticate(&self, email: &str, password: &str) -> Result<(String, User)>;

    async fn current_user(&self, token: &str) -> Option<User>;

    async fn revoke_tokens(&self, user_id: u64);
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User>;
    async fn find(&self, id: u64) -> Option<User>;
    async fn find_by_email(&self, email: &str) -> Option<User>;
    /// All users, newest id first.
    async fn list(&self) -> Vec<User>;
    async fn update(&self, id: u64, update: UserUpdate) -> Result<User>;
    async fn delete(&self, id: u64) -> Result<()>;
}
