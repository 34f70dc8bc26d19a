use crate::adapters::password::hash_password;
use crate::config::toml_config::SeedUser;
use crate::domain::model::{NewUser, User, UserUpdate};
use crate::domain::ports::UserRepository;
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

pub const EMAIL_TAKEN: &str = "The email has already been taken.";

#[derive(Debug, Default)]
struct UserTable {
    rows: BTreeMap<u64, User>,
    next_id: u64,
}

impl UserTable {
    fn email_taken(&self, email: &str, except: Option<u64>) -> bool {
        self.rows
            .values()
            .any(|u| Some(u.id) != except && u.email.eq_ignore_ascii_case(email))
    }
}

/// Process-local user store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    table: RwLock<UserTable>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, users: &[SeedUser]) -> Result<()> {
        for seed in users {
            let user = self
                .create(NewUser {
                    name: seed.name.clone(),
                    email: seed.email.clone(),
                    password: seed.password.clone(),
                    role: seed.role,
                    is_active: seed.is_active,
                })
                .await?;
            tracing::info!("👤 Seeded user {} ({:?})", user.email, user.role);
        }
        Ok(())
    }
}

fn not_found() -> AppError {
    AppError::NotFound {
        message: "User not found".to_string(),
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User> {
        let password_hash = hash_password(&user.password)?;
        let mut table = self.table.write().await;
        if table.email_taken(&user.email, None) {
            return Err(AppError::invalid_input("email", EMAIL_TAKEN));
        }

        table.next_id += 1;
        let now = Utc::now();
        let created = User {
            id: table.next_id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            created_at: now,
            updated_at: now,
            password_hash,
        };
        table.rows.insert(created.id, created.clone());

        Ok(created)
    }

    async fn find(&self, id: u64) -> Option<User> {
        self.table.read().await.rows.get(&id).cloned()
    }

    async fn find_by_email(&self, email: &str) -> Option<User> {
        self.table
            .read()
            .await
            .rows
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    async fn list(&self) -> Vec<User> {
        self.table.read().await.rows.values().rev().cloned().collect()
    }

    async fn update(&self, id: u64, update: UserUpdate) -> Result<User> {
        let password_hash = update.password.as_deref().map(hash_password).transpose()?;
        let mut table = self.table.write().await;

        if let Some(email) = &update.email {
            if table.email_taken(email, Some(id)) {
                return Err(AppError::invalid_input("email", EMAIL_TAKEN));
            }
        }

        let user = table.rows.get_mut(&id).ok_or_else(not_found)?;
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(password_hash) = password_hash {
            user.password_hash = password_hash;
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(is_active) = update.is_active {
            user.is_active = is_active;
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn delete(&self, id: u64) -> Result<()> {
        self.table
            .write()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(not_found)
    }
}
