//! HTTP transport for the storefront API.

pub mod cache;
pub mod client;
pub mod envelope;
pub mod errors;

pub use client::{ApiClient, Freshness};
pub use envelope::Envelope;
pub use errors::ApiError;
