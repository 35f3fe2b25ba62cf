//! User service - Handles user-related business logic.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{PasswordHasher, UserResponse};

use crate::repository::UserRepository;

/// User service trait for dependency injection.
///
/// All operations return projections; the stored password hash never leaves
/// this layer.
#[async_trait]
pub trait UserService: Send + Sync {
    /// List projections of every stored user
    async fn list_users(&self) -> AppResult<Vec<UserResponse>>;

    /// Get the projection for a single user
    async fn get_user(&self, id: Uuid) -> AppResult<UserResponse>;

    /// Hash the password and persist a new user
    async fn create_user(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> AppResult<UserResponse>;

    /// Update an existing user's name and email
    async fn update_user(&self, id: Uuid, name: String, email: String)
        -> AppResult<UserResponse>;

    /// Delete an existing user
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;

    /// Check whether an email address is already taken
    async fn email_exists(&self, email: &str) -> AppResult<bool>;

    /// Verify a plain text password against a stored hash
    fn verify_password(&self, plain_text: &str, password_hash: &str) -> bool;

    /// Replace a user's password after verifying the current one
    async fn change_password(
        &self,
        id: Uuid,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> AppResult<()>;
}

/// Concrete implementation of UserService using repository and hasher.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserManager {
    /// Create new user service instance with repository and hasher
    pub fn new(repo: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repo, hasher }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn list_users(&self) -> AppResult<Vec<UserResponse>> {
        let users = self.repo.list().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    async fn get_user(&self, id: Uuid) -> AppResult<UserResponse> {
        self.repo
            .find_by_id(id)
            .await?
            .map(UserResponse::from)
            .ok_or(AppError::NotFound)
    }

    async fn create_user(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> AppResult<UserResponse> {
        let password_hash = self.hasher.hash(&password)?;

        // Email uniqueness is enforced by the repository; a duplicate fails
        // the insert like any other storage error.
        let user = self.repo.create(name, email, password_hash).await?;
        Ok(UserResponse::from(user))
    }

    async fn update_user(
        &self,
        id: Uuid,
        name: String,
        email: String,
    ) -> AppResult<UserResponse> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound);
        }

        let user = self.repo.update(id, name, email).await?;
        Ok(UserResponse::from(user))
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound);
        }

        self.repo.delete(id).await
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        self.repo.email_exists(email).await
    }

    fn verify_password(&self, plain_text: &str, password_hash: &str) -> bool {
        self.hasher.verify(plain_text, password_hash)
    }

    async fn change_password(
        &self,
        id: Uuid,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> AppResult<()> {
        let user = self.repo.find_by_id(id).await?.ok_or(AppError::NotFound)?;

        if !self.hasher.verify(old_password, &user.password_hash) {
            return Err(AppError::InvalidCredentials);
        }

        if new_password != confirm_password {
            return Err(AppError::PasswordMismatch);
        }

        let password_hash = self.hasher.hash(new_password)?;
        self.repo.update_password(id, password_hash).await
    }
}
