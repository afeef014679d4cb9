//! Catalog API surface.
//!
//! Reads are cacheable; the admin mutations evict exactly the entries they
//! make stale.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use reqwest::multipart::{Form, Part};
use rust_decimal::Decimal;

use crate::{
    api::{ApiClient, ApiError, Envelope, Freshness},
    catalog::models::{Category, Product},
};

/// An image attached to an admin create/edit request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    fn into_part(self) -> Part {
        Part::bytes(self.bytes).file_name(self.file_name)
    }
}

/// Payload for `POST /product/add`.
#[derive(Debug)]
pub struct NewProduct {
    pub title: String,
    pub price: Decimal,
    pub category: u64,
    pub about: Option<String>,
    pub desc: Option<String>,
    pub discount: Option<Decimal>,
    pub image: Option<ImageUpload>,
}

impl NewProduct {
    fn into_form(self) -> Form {
        let mut form = Form::new()
            .text("title", self.title)
            .text("price", self.price.to_string())
            .text("category", self.category.to_string());

        if let Some(about) = self.about {
            form = form.text("about", about);
        }

        if let Some(desc) = self.desc {
            form = form.text("desc", desc);
        }

        if let Some(discount) = self.discount {
            form = form.text("discount", discount.to_string());
        }

        if let Some(image) = self.image {
            form = form.part("image", image.into_part());
        }

        form
    }
}

/// Payload for `POST /product/edit/:id`; only set fields are sent.
#[derive(Debug, Default)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<u64>,
    pub about: Option<String>,
    pub desc: Option<String>,
    pub discount: Option<Decimal>,
    pub image: Option<ImageUpload>,
}

impl ProductUpdate {
    fn into_form(self) -> Form {
        let mut form = Form::new();

        if let Some(title) = self.title {
            form = form.text("title", title);
        }

        if let Some(price) = self.price {
            form = form.text("price", price.to_string());
        }

        if let Some(category) = self.category {
            form = form.text("category", category.to_string());
        }

        if let Some(about) = self.about {
            form = form.text("about", about);
        }

        if let Some(desc) = self.desc {
            form = form.text("desc", desc);
        }

        if let Some(discount) = self.discount {
            form = form.text("discount", discount.to_string());
        }

        if let Some(image) = self.image {
            form = form.part("image", image.into_part());
        }

        form
    }
}

/// Payload for `POST /category/add`.
#[derive(Debug)]
pub struct NewCategory {
    pub title: String,
    pub image: Option<ImageUpload>,
}

/// Payload for `POST /category/edit/:id`.
#[derive(Debug, Default)]
pub struct CategoryUpdate {
    pub title: Option<String>,
    pub image: Option<ImageUpload>,
}

#[automock]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Every product in the catalog.
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;

    /// A single product by id.
    async fn get_product(&self, product_id: u64) -> Result<Product, ApiError>;

    /// Every category.
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError>;

    /// A single category by id.
    async fn get_category(&self, category_id: u64) -> Result<Category, ApiError>;

    /// Highest-rated products, server-ranked.
    async fn top_rated(&self) -> Result<Vec<Product>, ApiError>;

    /// Products currently on sale.
    async fn latest_sales(&self) -> Result<Vec<Product>, ApiError>;

    /// Create a product (admin).
    async fn create_product(&self, new_product: NewProduct) -> Result<Product, ApiError>;

    /// Update a product (admin).
    async fn update_product(
        &self,
        product_id: u64,
        update: ProductUpdate,
    ) -> Result<Product, ApiError>;

    /// Delete a product (admin).
    async fn delete_product(&self, product_id: u64) -> Result<(), ApiError>;

    /// Create a category (admin).
    async fn create_category(&self, new_category: NewCategory) -> Result<Category, ApiError>;

    /// Update a category (admin).
    async fn update_category(
        &self,
        category_id: u64,
        update: CategoryUpdate,
    ) -> Result<Category, ApiError>;

    /// Delete a category (admin).
    async fn delete_category(&self, category_id: u64) -> Result<(), ApiError>;
}

/// HTTP implementation over the shared [`ApiClient`].
#[derive(Debug, Clone)]
pub struct HttpCatalogApi {
    client: Arc<ApiClient>,
}

impl HttpCatalogApi {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    fn invalidate_product_reads(&self, product_id: Option<u64>) {
        self.client.invalidate("/products");
        self.client.invalidate("/top-rated");
        self.client.invalidate("/latest-sale");

        if let Some(product_id) = product_id {
            self.client.invalidate(&format!("/product/{product_id}"));
        }
    }

    fn invalidate_category_reads(&self, category_id: Option<u64>) {
        self.client.invalidate("/categories");

        if let Some(category_id) = category_id {
            self.client.invalidate(&format!("/category/{category_id}"));
        }
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.client.get_json("/products", Freshness::Cached).await
    }

    async fn get_product(&self, product_id: u64) -> Result<Product, ApiError> {
        self.client
            .get_json(&format!("/product/{product_id}"), Freshness::Cached)
            .await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.client.get_json("/categories", Freshness::Cached).await
    }

    async fn get_category(&self, category_id: u64) -> Result<Category, ApiError> {
        self.client
            .get_json(&format!("/category/{category_id}"), Freshness::Cached)
            .await
    }

    async fn top_rated(&self) -> Result<Vec<Product>, ApiError> {
        self.client.get_json("/top-rated", Freshness::Cached).await
    }

    async fn latest_sales(&self) -> Result<Vec<Product>, ApiError> {
        self.client.get_json("/latest-sale", Freshness::Cached).await
    }

    async fn create_product(&self, new_product: NewProduct) -> Result<Product, ApiError> {
        let envelope: Envelope<Product> = self
            .client
            .post_multipart("/product/add", new_product.into_form())
            .await?;

        self.invalidate_product_reads(None);

        envelope.into_data()
    }

    async fn update_product(
        &self,
        product_id: u64,
        update: ProductUpdate,
    ) -> Result<Product, ApiError> {
        let envelope: Envelope<Product> = self
            .client
            .post_multipart(&format!("/product/edit/{product_id}"), update.into_form())
            .await?;

        self.invalidate_product_reads(Some(product_id));

        envelope.into_data()
    }

    async fn delete_product(&self, product_id: u64) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/product/{product_id}"))
            .await?;

        self.invalidate_product_reads(Some(product_id));
        // Rating reads for the product are stale too once it is gone.
        self.client
            .invalidate_prefix(&format!("/product/{product_id}/"));

        Ok(())
    }

    async fn create_category(&self, new_category: NewCategory) -> Result<Category, ApiError> {
        let mut form = Form::new().text("title", new_category.title);

        if let Some(image) = new_category.image {
            form = form.part("image", image.into_part());
        }

        let envelope: Envelope<Category> =
            self.client.post_multipart("/category/add", form).await?;

        self.invalidate_category_reads(None);

        envelope.into_data()
    }

    async fn update_category(
        &self,
        category_id: u64,
        update: CategoryUpdate,
    ) -> Result<Category, ApiError> {
        let mut form = Form::new();

        if let Some(title) = update.title {
            form = form.text("title", title);
        }

        if let Some(image) = update.image {
            form = form.part("image", image.into_part());
        }

        let envelope: Envelope<Category> = self
            .client
            .post_multipart(&format!("/category/edit/{category_id}"), form)
            .await?;

        self.invalidate_category_reads(Some(category_id));

        envelope.into_data()
    }

    async fn delete_category(&self, category_id: u64) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/category/{category_id}"))
            .await?;

        self.invalidate_category_reads(Some(category_id));

        Ok(())
    }
}
