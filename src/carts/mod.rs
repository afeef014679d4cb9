//! Carts

pub mod api;
pub mod errors;
pub mod models;
pub mod stepper;
pub mod store;

pub use errors::CartError;
pub use api::*;
pub use store::CartStore;
