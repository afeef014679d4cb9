//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    api::{ApiClient, ApiError},
    auth::{
        api::{AuthApi, HttpAuthApi},
        credentials::{CredentialStore, StoredCredentialStore},
    },
    carts::{api::HttpCartApi, store::CartStore},
    catalog::api::{CatalogApi, HttpCatalogApi},
    config::ClientConfig,
    favorites::FavoritesStore,
    preferences::PreferencesStore,
    ratings::api::{HttpRatingsApi, RatingsApi},
    storage::{FileStorage, Storage},
    users::api::{HttpUsersApi, UsersApi},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to build http client")]
    Http(#[source] reqwest::Error),
}

/// Application-level wiring: one shared transport, one cart store, one
/// favorites store — constructed once at startup and passed by reference to
/// every consumer.
#[derive(Clone)]
pub struct AppContext {
    pub credentials: Arc<dyn CredentialStore>,
    pub auth: Arc<dyn AuthApi>,
    pub carts: Arc<CartStore>,
    pub catalog: Arc<dyn CatalogApi>,
    pub ratings: Arc<dyn RatingsApi>,
    pub users: Arc<dyn UsersApi>,
    pub favorites: Arc<FavoritesStore>,
    pub preferences: Arc<PreferencesStore>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build the application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn from_config(config: &ClientConfig) -> Result<Self, AppInitError> {
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(config.state_dir.clone()));
        let credentials: Arc<dyn CredentialStore> =
            Arc::new(StoredCredentialStore::new(storage.clone()));

        let client = Arc::new(
            ApiClient::new(config, credentials.clone()).map_err(AppInitError::Http)?,
        );

        Ok(Self {
            auth: Arc::new(HttpAuthApi::new(client.clone(), credentials.clone())),
            carts: Arc::new(CartStore::new(
                Arc::new(HttpCartApi::new(client.clone())),
                credentials.clone(),
            )),
            catalog: Arc::new(HttpCatalogApi::new(client.clone())),
            ratings: Arc::new(HttpRatingsApi::new(client.clone())),
            users: Arc::new(HttpUsersApi::new(client)),
            favorites: Arc::new(FavoritesStore::load(storage.clone())),
            preferences: Arc::new(PreferencesStore::new(storage)),
            credentials,
        })
    }

    /// End the session: clear the credential and destroy the cart state.
    ///
    /// # Errors
    ///
    /// Returns the API failure from the logout call; the local session is
    /// torn down regardless.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.auth.logout().await;

        self.carts.reset();

        result
    }
}
