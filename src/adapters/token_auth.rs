use crate::adapters::password::{sha256_hex, verify_password};
use crate::domain::model::User;
use crate::domain::ports::{AuthService, UserRepository};
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct TokenTable {
    /// sha256(token) -> user id
    owners: HashMap<String, u64>,
    next_id: u64,
}

/// Opaque bearer tokens of the form `<id>|<secret>`.
///
/// Only a digest of each token is kept, so a leaked table cannot be replayed.
pub struct TokenAuthService {
    users: Arc<dyn UserRepository>,
    tokens: RwLock<TokenTable>,
}

impl TokenAuthService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            users,
            tokens: RwLock::new(TokenTable::default()),
        }
    }

    async fn issue_token(&self, user_id: u64) -> String {
        let mut tokens = self.tokens.write().await;
        tokens.next_id += 1;

        let secret = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let token = format!("{}|{}", tokens.next_id, secret);
        tokens.owners.insert(sha256_hex(&token), user_id);

        token
    }

    pub async fn active_tokens(&self, user_id: u64) -> usize {
        self.tokens
            .read()
            .await
            .owners
            .values()
            .filter(|owner| **owner == user_id)
            .count()
    }
}

#[async_trait]
impl AuthService for TokenAuthService {
    async fn authenticate(&self, email: &str, password: &str) -> Result<(String, User)> {
        let user = self
            .users
            .find_by_email(email)
            .await
            .filter(|user| verify_password(password, &user.password_hash))
            .ok_or(AppError::InvalidCredentials)?;

        if !user.is_active {
            tracing::info!("Login refused for inactive account {}", user.email);
            return Err(AppError::InactiveAccount);
        }

        let token = self.issue_token(user.id).await;
        tracing::info!("🔑 Issued token for user {}", user.id);

        Ok((token, user))
    }

    async fn current_user(&self, token: &str) -> Option<User> {
        let user_id = *self.tokens.read().await.owners.get(&sha256_hex(token))?;
        self.users.find(user_id).await
    }

    async fn revoke_tokens(&self, user_id: u64) {
        let mut tokens = self.tokens.write().await;
        let before = tokens.owners.len();
        tokens.owners.retain(|_, owner| *owner != user_id);
        tracing::debug!(
            "Revoked {} tokens for user {}",
            before - tokens.owners.len(),
            user_id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_users::InMemoryUserStore;
    use crate::domain::model::{NewUser, Role, UserUpdate};

    async fn setup() -> (Arc<InMemoryUserStore>, TokenAuthService) {
        let users = Arc::new(InMemoryUserStore::new());
        users
            .create(NewUser {
                name: "Turner Mia".to_string(),
                email: "turner.mia@example.com".to_string(),
                password: "password".to_string(),
                role: Role::User,
                is_active: true,
            })
            .await
            .unwrap();
        let auth = TokenAuthService::new(users.clone());
        (users, auth)
    }

    #[tokio::test]
    async fn test_login_issues_token_that_resolves_to_user() {
        let (_, auth) = setup().await;

        let (token, user) = auth
            .authenticate("turner.mia@example.com", "password")
            .await
            .unwrap();

        assert!(token.starts_with("1|"));
        assert_eq!(token.len(), "1|".len() + 64);
        assert_eq!(auth.current_user(&token).await.unwrap().id, user.id);
        assert!(auth.current_user("1|forged").await.is_none());
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email() {
        let (_, auth) = setup().await;

        assert!(matches!(
            auth.authenticate("turner.mia@example.com", "wrong-password").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.authenticate("nobody@example.com", "password").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_inactive_account_cannot_login() {
        let (users, auth) = setup().await;
        users
            .update(
                1,
                UserUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(matches!(
            auth.authenticate("turner.mia@example.com", "password").await,
            Err(AppError::InactiveAccount)
        ));
        assert_eq!(auth.active_tokens(1).await, 0);
    }

    #[tokio::test]
    async fn test_revoke_removes_every_token_of_the_user() {
        let (_, auth) = setup().await;
        let (first, _) = auth.authenticate("turner.mia@example.com", "password").await.unwrap();
        let (second, _) = auth.authenticate("turner.mia@example.com", "password").await.unwrap();
        assert_eq!(auth.active_tokens(1).await, 2);

        auth.revoke_tokens(1).await;

        assert!(auth.current_user(&first).await.is_none());
        assert!(auth.current_user(&second).await.is_none());
    }
}
