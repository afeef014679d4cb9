//! Users API surface.
//!
//! User records are mutable authenticated resources, so every read bypasses
//! the GET cache.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    api::{ApiClient, ApiError, Envelope, Freshness},
    users::models::{NewUser, User, UserUpdate},
};

#[automock]
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// Every user (admin).
    async fn list(&self) -> Result<Vec<User>, ApiError>;

    /// A single user by id.
    async fn get(&self, user_id: u64) -> Result<User, ApiError>;

    /// Create a user (admin).
    async fn create(&self, new_user: NewUser) -> Result<User, ApiError>;

    /// Update a user (admin).
    async fn update(&self, user_id: u64, update: UserUpdate) -> Result<User, ApiError>;

    /// Delete a user (admin).
    async fn delete(&self, user_id: u64) -> Result<(), ApiError>;
}

/// HTTP implementation over the shared [`ApiClient`].
#[derive(Debug, Clone)]
pub struct HttpUsersApi {
    client: Arc<ApiClient>,
}

impl HttpUsersApi {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UsersApi for HttpUsersApi {
    async fn list(&self) -> Result<Vec<User>, ApiError> {
        self.client.get_json("/users", Freshness::Bypass).await
    }

    async fn get(&self, user_id: u64) -> Result<User, ApiError> {
        self.client
            .get_json(&format!("/user/{user_id}"), Freshness::Bypass)
            .await
    }

    async fn create(&self, new_user: NewUser) -> Result<User, ApiError> {
        let envelope: Envelope<User> = self.client.post_json("/user/add", &new_user).await?;

        envelope.into_data()
    }

    async fn update(&self, user_id: u64, update: UserUpdate) -> Result<User, ApiError> {
        let envelope: Envelope<User> = self
            .client
            .post_json(&format!("/user/edit/{user_id}"), &update)
            .await?;

        envelope.into_data()
    }

    async fn delete(&self, user_id: u64) -> Result<(), ApiError> {
        self.client.delete(&format!("/user/{user_id}")).await
    }
}
