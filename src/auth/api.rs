//! Auth API surface.
//!
//! Successful login and register store the returned bearer token; logout
//! clears it even when the server call fails, so the client can always
//! reach the logged-out state.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    api::{ApiClient, ApiError, Freshness},
    auth::{
        credentials::CredentialStore,
        models::{LoginRequest, RegisterRequest, Session},
    },
};

#[automock]
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a session, storing its bearer token.
    async fn login(&self, request: LoginRequest) -> Result<Session, ApiError>;

    /// Create an account and log in, storing the bearer token.
    async fn register(&self, request: RegisterRequest) -> Result<Session, ApiError>;

    /// End the session and discard the stored token.
    async fn logout(&self) -> Result<(), ApiError>;
}

/// HTTP implementation over the shared [`ApiClient`].
pub struct HttpAuthApi {
    client: Arc<ApiClient>,
    credentials: Arc<dyn CredentialStore>,
}

impl HttpAuthApi {
    #[must_use]
    pub fn new(client: Arc<ApiClient>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            client,
            credentials,
        }
    }
}

impl std::fmt::Debug for HttpAuthApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAuthApi").finish_non_exhaustive()
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, request: LoginRequest) -> Result<Session, ApiError> {
        let session: Session = self.client.post_json("/login", &request).await?;

        self.credentials.store(&session.token);

        Ok(session)
    }

    async fn register(&self, request: RegisterRequest) -> Result<Session, ApiError> {
        let session: Session = self.client.post_json("/register", &request).await?;

        self.credentials.store(&session.token);

        Ok(session)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let result: Result<serde_json::Value, ApiError> =
            self.client.get_json("/logout", Freshness::Bypass).await;

        self.credentials.clear();

        match result {
            // A dead token is already logged out as far as we care.
            Ok(_) | Err(ApiError::Unauthenticated) => Ok(()),
            Err(error) => Err(error),
        }
    }
}
