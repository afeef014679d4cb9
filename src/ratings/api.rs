//! Ratings API surface.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;

use crate::{
    api::{ApiClient, ApiError, Envelope, Freshness},
    ratings::models::{NewRating, Rating, RatingStats},
};

#[derive(Debug, Deserialize)]
struct RatingsData {
    #[serde(default)]
    ratings: Vec<Rating>,
}

#[automock]
#[async_trait]
pub trait RatingsApi: Send + Sync {
    /// Submit or replace the current user's rating for a product.
    async fn submit(&self, new_rating: NewRating) -> Result<Rating, ApiError>;

    /// All ratings for a product.
    async fn for_product(&self, product_id: u64) -> Result<Vec<Rating>, ApiError>;

    /// Aggregate stats for a product.
    async fn stats(&self, product_id: u64) -> Result<RatingStats, ApiError>;

    /// The current user's rating for a product, if they have one.
    async fn user_rating(&self, product_id: u64) -> Result<Option<Rating>, ApiError>;

    /// Withdraw a rating.
    async fn delete(&self, rating_id: u64, product_id: u64) -> Result<(), ApiError>;
}

/// HTTP implementation over the shared [`ApiClient`].
#[derive(Debug, Clone)]
pub struct HttpRatingsApi {
    client: Arc<ApiClient>,
}

impl HttpRatingsApi {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    fn invalidate_rating_reads(&self, product_id: u64) {
        self.client
            .invalidate(&format!("/product/{product_id}/ratings"));
        self.client
            .invalidate(&format!("/product/{product_id}/rating-stats"));
        self.client.invalidate("/top-rated");
    }
}

#[async_trait]
impl RatingsApi for HttpRatingsApi {
    async fn submit(&self, new_rating: NewRating) -> Result<Rating, ApiError> {
        let product_id = new_rating.product_id;

        let envelope: Envelope<Rating> = self.client.post_json("/rating", &new_rating).await?;

        self.invalidate_rating_reads(product_id);

        envelope.into_data()
    }

    async fn for_product(&self, product_id: u64) -> Result<Vec<Rating>, ApiError> {
        let envelope: Envelope<RatingsData> = self
            .client
            .get_json(&format!("/product/{product_id}/ratings"), Freshness::Cached)
            .await?;

        Ok(envelope.into_data()?.ratings)
    }

    async fn stats(&self, product_id: u64) -> Result<RatingStats, ApiError> {
        let envelope: Envelope<RatingStats> = self
            .client
            .get_json(
                &format!("/product/{product_id}/rating-stats"),
                Freshness::Cached,
            )
            .await?;

        envelope.into_data()
    }

    async fn user_rating(&self, product_id: u64) -> Result<Option<Rating>, ApiError> {
        // Per-user state: never served from the shared GET cache.
        let result: Result<Envelope<Option<Rating>>, ApiError> = self
            .client
            .get_json(
                &format!("/product/{product_id}/user-rating"),
                Freshness::Bypass,
            )
            .await;

        match result {
            Ok(envelope) => envelope.into_data(),
            Err(ApiError::NotFound) => Ok(None),
            Err(error) => Err(error),
        }
    }

    async fn delete(&self, rating_id: u64, product_id: u64) -> Result<(), ApiError> {
        self.client.delete(&format!("/rating/{rating_id}")).await?;

        self.invalidate_rating_reads(product_id);

        Ok(())
    }
}
