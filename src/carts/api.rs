//! Cart wire API.
//!
//! Every mutation response embeds the updated cart, which the store adopts
//! wholesale; nothing is patched locally. Cart reads always bypass the GET
//! cache: the cart is a mutable authenticated resource, so freshness is a
//! property of the read itself.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;

use crate::{
    api::{ApiClient, ApiError, Envelope, Freshness},
    carts::models::{CartCount, CartPayload},
};

#[derive(Debug, Serialize)]
struct AddItemRequest {
    product_id: u64,
    quantity: u32,
}

#[derive(Debug, Serialize)]
struct UpdateItemRequest {
    quantity: u32,
}

#[automock]
#[async_trait]
pub trait CartApi: Send + Sync {
    /// Retrieve the current cart.
    async fn fetch_cart(&self) -> Result<CartPayload, ApiError>;

    /// Add a product line and return the updated cart.
    async fn add_item(&self, product_id: u64, quantity: u32) -> Result<CartPayload, ApiError>;

    /// Change a line's quantity and return the updated cart.
    async fn update_item(&self, item_id: u64, quantity: u32) -> Result<CartPayload, ApiError>;

    /// Remove a line and return the updated cart.
    async fn remove_item(&self, item_id: u64) -> Result<CartPayload, ApiError>;

    /// Empty the cart. Idempotent.
    async fn clear(&self) -> Result<CartPayload, ApiError>;

    /// Total units in the cart.
    async fn count(&self) -> Result<u32, ApiError>;
}

/// HTTP implementation over the shared [`ApiClient`].
#[derive(Debug, Clone)]
pub struct HttpCartApi {
    client: Arc<ApiClient>,
}

impl HttpCartApi {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CartApi for HttpCartApi {
    async fn fetch_cart(&self) -> Result<CartPayload, ApiError> {
        let envelope: Envelope<CartPayload> =
            self.client.get_json("/cart", Freshness::Bypass).await?;

        envelope.into_data()
    }

    async fn add_item(&self, product_id: u64, quantity: u32) -> Result<CartPayload, ApiError> {
        let envelope: Envelope<CartPayload> = self
            .client
            .post_json(
                "/cart",
                &AddItemRequest {
                    product_id,
                    quantity,
                },
            )
            .await?;

        envelope.into_data()
    }

    async fn update_item(&self, item_id: u64, quantity: u32) -> Result<CartPayload, ApiError> {
        let envelope: Envelope<CartPayload> = self
            .client
            .put_json(&format!("/cart/{item_id}"), &UpdateItemRequest { quantity })
            .await?;

        envelope.into_data()
    }

    async fn remove_item(&self, item_id: u64) -> Result<CartPayload, ApiError> {
        let envelope: Envelope<CartPayload> =
            self.client.delete_json(&format!("/cart/{item_id}")).await?;

        envelope.into_data()
    }

    async fn clear(&self) -> Result<CartPayload, ApiError> {
        let envelope: Envelope<CartPayload> = self.client.delete_json("/cart").await?;

        envelope.into_data()
    }

    async fn count(&self) -> Result<u32, ApiError> {
        let envelope: Envelope<CartCount> =
            self.client.get_json("/cart/count", Freshness::Bypass).await?;

        Ok(envelope.into_data()?.count)
    }
}
