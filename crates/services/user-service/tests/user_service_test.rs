//! End-to-end user service flows against an in-memory repository.
//!
//! These tests use the real Argon2 hasher, so stored hashes behave exactly as
//! in production and never equal the plaintext.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Argon2Hasher, PasswordHasher, User};
use user_service_lib::repository::UserRepository;
use user_service_lib::service::{UserManager, UserService};

/// In-memory repository standing in for the SeaORM store.
#[derive(Default)]
struct InMemoryUserStore {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    fn stored_hash(&self, id: Uuid) -> Option<String> {
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .map(|user| user.password_hash.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn list(&self) -> AppResult<Vec<User>> {
        let users = self.users.lock().unwrap();
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by_key(|user| user.created_at);
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn create(&self, name: String, email: String, password_hash: String) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();

        // Duplicate email behaves like the unique-index violation in Postgres
        if users.values().any(|user| user.email == email) {
            return Err(AppError::internal("unique constraint violated: users.email"));
        }

        let user = User::new(Uuid::new_v4(), name, email, password_hash);
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, name: String, email: String) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&id).ok_or(AppError::NotFound)?;
        user.name = name;
        user.email = email;
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.users
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|user| user.email == email))
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&id).ok_or(AppError::NotFound)?;
        user.password_hash = password_hash;
        Ok(())
    }
}

fn setup() -> (Arc<InMemoryUserStore>, UserManager) {
    let repo = Arc::new(InMemoryUserStore::default());
    let service = UserManager::new(repo.clone(), Arc::new(Argon2Hasher::new()));
    (repo, service)
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let (repo, service) = setup();

    let created = service
        .create_user(
            "Alice".to_string(),
            "alice@example.com".to_string(),
            "secret1".to_string(),
        )
        .await
        .unwrap();

    // The stored password is never the plaintext
    let stored = repo.stored_hash(created.id).unwrap();
    assert_ne!(stored, "secret1");

    let fetched = service.get_user(created.id).await.unwrap();
    assert_eq!(fetched.name, "Alice");
    assert_eq!(fetched.email, "alice@example.com");

    let all = service.list_users().await.unwrap();
    assert_eq!(all, vec![fetched]);
}

#[tokio::test]
async fn test_create_duplicate_email_fails() {
    let (_repo, service) = setup();

    service
        .create_user(
            "Alice".to_string(),
            "alice@example.com".to_string(),
            "secret1".to_string(),
        )
        .await
        .unwrap();

    let result = service
        .create_user(
            "Bob".to_string(),
            "alice@example.com".to_string(),
            "secret2".to_string(),
        )
        .await;

    assert!(result.is_err());
    assert!(service.email_exists("alice@example.com").await.unwrap());
    assert!(!service.email_exists("bob@example.com").await.unwrap());
}

#[tokio::test]
async fn test_change_password_flow() {
    let (repo, service) = setup();
    let hasher = Argon2Hasher::new();

    let created = service
        .create_user(
            "Alice".to_string(),
            "alice@example.com".to_string(),
            "secret1".to_string(),
        )
        .await
        .unwrap();
    let original_hash = repo.stored_hash(created.id).unwrap();

    // Wrong old password: rejected, stored hash untouched
    let result = service
        .change_password(created.id, "wrongOld", "newpass1", "newpass1")
        .await;
    assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
    assert_eq!(repo.stored_hash(created.id).unwrap(), original_hash);
    assert!(hasher.verify("secret1", &repo.stored_hash(created.id).unwrap()));

    // Mismatched confirmation: rejected, stored hash untouched
    let result = service
        .change_password(created.id, "secret1", "newpass1", "different")
        .await;
    assert!(matches!(result.unwrap_err(), AppError::PasswordMismatch));
    assert_eq!(repo.stored_hash(created.id).unwrap(), original_hash);

    // Correct old password and matching confirmation: hash replaced
    service
        .change_password(created.id, "secret1", "newpass1", "newpass1")
        .await
        .unwrap();

    let new_hash = repo.stored_hash(created.id).unwrap();
    assert_ne!(new_hash, original_hash);
    assert!(service.verify_password("newpass1", &new_hash));
    assert!(!service.verify_password("secret1", &new_hash));
}

#[tokio::test]
async fn test_change_password_unknown_user() {
    let (_repo, service) = setup();

    let result = service
        .change_password(Uuid::new_v4(), "secret1", "newpass1", "newpass1")
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn test_update_and_delete() {
    let (_repo, service) = setup();

    let created = service
        .create_user(
            "Alice".to_string(),
            "alice@example.com".to_string(),
            "secret1".to_string(),
        )
        .await
        .unwrap();

    let updated = service
        .update_user(
            created.id,
            "Alice Cooper".to_string(),
            "alice.cooper@example.com".to_string(),
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Alice Cooper");
    assert_eq!(updated.email, "alice.cooper@example.com");

    service.delete_user(created.id).await.unwrap();

    let result = service.get_user(created.id).await;
    assert!(matches!(result.unwrap_err(), AppError::NotFound));

    let result = service.delete_user(created.id).await;
    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}
