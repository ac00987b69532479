use std::sync::Arc;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User};
use crate::repository::UserRepository;

/// Service layer for the user use cases
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate the request, reject a taken email, then persist the new user
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        input.check()?;

        if self.repository.find_by_email(&input.email).await?.is_some() {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let user = User::create(input)?;
        self.repository.create(user).await
    }

    /// Load the user, apply the patch, and persist every change
    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> UserResult<User> {
        let mut user = self.get_user(id).await?;

        if let Some(email) = input.email.as_deref().filter(|e| !e.is_empty() && *e != user.email) {
            if let Some(owner) = self.repository.find_by_email(email).await? {
                if owner.id != id {
                    return Err(UserError::DuplicateEmail(email.to_string()));
                }
            }
        }

        user.update(input)?;
        let updated = self.repository.update(user).await?;

        tracing::debug!(user_id = %id, phones = updated.phones.len(), "User updated");
        Ok(updated)
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    pub async fn find_user_by_email(&self, email: &str) -> UserResult<Option<User>> {
        self.repository.find_by_email(email).await
    }
}
