//! Authentication: bearer credential storage and the login/logout API.

pub mod api;
pub mod credentials;
pub mod models;

pub use api::*;
pub use credentials::*;
