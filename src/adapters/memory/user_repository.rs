//! In-memory implementation of UserRepository.

use async_trait::async_trait;
use std::sync::RwLock;

use super::filtering::select_page;
use super::poisoned;
use crate::domain::{ApiError, ListParams, ListResult, User, UserId};
use crate::ports::UserRepository;

/// In-memory user store. Backs tests and local runs without a database.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), ApiError> {
        let mut users = self.users.write().map_err(poisoned)?;
        if users.iter().any(|u| u.email() == user.email()) {
            return Err(ApiError::duplicate_key());
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), ApiError> {
        let mut users = self.users.write().map_err(poisoned)?;
        if users
            .iter()
            .any(|u| u.email() == user.email() && u.id() != user.id())
        {
            return Err(ApiError::duplicate_key());
        }
        match users.iter_mut().find(|u| u.id() == user.id()) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(ApiError::not_found("No user found")),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, ApiError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.iter().find(|u| u.id() == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.iter().find(|u| u.email() == email).cloned())
    }

    async fn find_by_reset_token(&self, token_hash: &str) -> Result<Option<User>, ApiError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users
            .iter()
            .find(|u| u.reset_password_token() == Some(token_hash))
            .cloned())
    }

    async fn list(&self, params: &ListParams) -> Result<ListResult<User>, ApiError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(select_page(&users, params))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, ApiError> {
        let mut users = self.users.write().map_err(poisoned)?;
        let before = users.len();
        users.retain(|u| u.id() != id);
        Ok(users.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    fn user(email: &str) -> User {
        User::new(UserId::new(), "Test", email, "hash", Role::User).unwrap()
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_email() {
        let repo = MemoryUserRepository::new();
        repo.insert(&user("a@b.com")).await.unwrap();

        let err = repo.insert(&user("a@b.com")).await.unwrap_err();
        assert_eq!(err.code, crate::domain::ErrorCode::DuplicateKey);
    }

    #[tokio::test]
    async fn lookup_by_email_and_delete() {
        let repo = MemoryUserRepository::new();
        let u = user("a@b.com");
        repo.insert(&u).await.unwrap();

        assert!(repo.find_by_email("a@b.com").await.unwrap().is_some());
        assert!(repo.delete(u.id()).await.unwrap());
        assert!(!repo.delete(u.id()).await.unwrap());
        assert!(repo.find_by_email("a@b.com").await.unwrap().is_none());
    }
}
