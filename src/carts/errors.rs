//! Cart store errors.

use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum CartError {
    /// A mutating operation was attempted with no stored credential; no
    /// network call was made.
    #[error("not authenticated")]
    Unauthenticated,

    /// The backend rejected or failed the operation.
    #[error(transparent)]
    Api(#[from] ApiError),
}
