use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::reconcile::plan_phones;

/// Persistence port for the user aggregate.
///
/// Implementations store and return the whole aggregate: the user together
/// with its address, document, and phones.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user and its nested entities
    async fn create(&self, user: User) -> UserResult<User>;

    /// Persist every change to an existing user atomically, reconciling
    /// nested entities against what is stored
    async fn update(&self, user: User) -> UserResult<User>;

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn sort_phones(user: &mut User) {
    user.phones.sort_by_key(|p| p.id);
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, mut user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| same_email(&u.email, &user.email)) {
            return Err(UserError::DuplicateEmail(user.email));
        }
        if users.contains_key(&user.id) {
            return Err(UserError::Internal(format!("User {} already stored", user.id)));
        }

        sort_phones(&mut user);
        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, phones = user.phones.len(), "Created user");
        Ok(user)
    }

    async fn update(&self, mut user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        let stored = users.get(&user.id).ok_or(UserError::NotFound(user.id))?;

        if users
            .values()
            .any(|u| u.id != user.id && same_email(&u.email, &user.email))
        {
            return Err(UserError::DuplicateEmail(user.email));
        }

        let persisted: Vec<Uuid> = stored.phones.iter().map(|p| p.id).collect();
        let plan = plan_phones(&persisted, &user.phones);

        // Same rule as a primary-key collision in the database
        if let Some(taken) = plan.insert.iter().find(|phone| {
            users
                .values()
                .any(|u| u.id != user.id && u.phones.iter().any(|p| p.id == phone.id))
        }) {
            return Err(UserError::Internal(format!(
                "Phone {} belongs to another user",
                taken.id
            )));
        }

        sort_phones(&mut user);
        users.insert(user.id, user.clone());

        tracing::info!(
            user_id = %user.id,
            inserted = plan.insert.len(),
            updated = plan.update.len(),
            deleted = plan.delete.len(),
            "Updated user"
        );
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| same_email(&u.email, email)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateUser, DocumentProps, Phone, PhoneInput, PhoneProps, UpdateUser};

    fn new_user(email: &str) -> User {
        User::create(CreateUser {
            email: email.to_string(),
            password_hash: "hashed_password".to_string(),
            name: "Test User".to_string(),
            birth_date: None,
            profile_picture: None,
            address: None,
            phones: vec![PhoneProps {
                number: "84999221557".to_string(),
                is_primary: true,
            }],
            document: DocumentProps {
                rg: "0005".to_string(),
                cpf: "70119006405".to_string(),
                other_info: None,
            },
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(new_user("test@example.com")).await.unwrap();

        let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id, created);

        let by_email = repo.find_by_email("TEST@example.com").await.unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(created.id));

        assert!(repo.find_by_id(Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_error() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("test@example.com")).await.unwrap();

        let result = repo.create(new_user("Test@Example.com")).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repo = InMemoryUserRepository::new();
        let user = new_user("ghost@example.com");
        let id = user.id;

        let result = repo.update(user).await;
        assert!(matches!(result, Err(UserError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_update_rejects_email_taken_by_other_user() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("first@example.com")).await.unwrap();
        let mut second = repo.create(new_user("second@example.com")).await.unwrap();

        second.email = "first@example.com".to_string();
        let result = repo.update(second).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_update_reconciles_phones() {
        let repo = InMemoryUserRepository::new();
        let mut user = repo.create(new_user("phones@example.com")).await.unwrap();
        let original = user.phones[0].id;

        user.update(UpdateUser {
            phones: Some(vec![PhoneInput {
                id: None,
                number: "84933334444".to_string(),
                is_primary: true,
            }]),
            ..Default::default()
        })
        .unwrap();
        let updated = repo.update(user).await.unwrap();

        assert_eq!(updated.phones.len(), 1);
        assert_ne!(updated.phones[0].id, original);

        let stored = repo.find_by_id(updated.id).await.unwrap().unwrap();
        assert_eq!(stored.phones, updated.phones);
    }

    #[tokio::test]
    async fn test_update_cannot_claim_another_users_phone() {
        let repo = InMemoryUserRepository::new();
        let owner = repo.create(new_user("owner@example.com")).await.unwrap();
        let mut thief = repo.create(new_user("thief@example.com")).await.unwrap();

        thief.phones = vec![Phone {
            id: owner.phones[0].id,
            number: "84900000000".to_string(),
            is_primary: false,
        }];
        let result = repo.update(thief).await;
        assert!(matches!(result, Err(UserError::Internal(_))));

        let untouched = repo.find_by_id(owner.id).await.unwrap().unwrap();
        assert_eq!(untouched.phones[0].number, "84999221557");
    }
}
