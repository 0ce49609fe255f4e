use bridge_traits::error::BridgeError;
use thiserror::Error;

use crate::cache::CacheError;

/// Outcome of album resolution other than an album.
///
/// `AlbumNotFound` is an expected result. Everything else is a failure
/// reported verbatim from the layer that produced it.
#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Album not found: {title}")]
    AlbumNotFound { title: String },

    /// The remote album service failed. Never reinterpreted as not-found.
    #[error("Remote service error: {0}")]
    Remote(#[from] BridgeError),

    /// The cache backend failed. A plain miss never surfaces here.
    #[error("Album cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },
}

impl GalleryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GalleryError::AlbumNotFound { .. })
    }

    /// Whether the caller's context was cancelled or ran past its deadline.
    pub fn is_cancellation(&self) -> bool {
        match self {
            GalleryError::Remote(err) => err.is_cancellation(),
            GalleryError::Cache(CacheError::Bridge(err)) => err.is_cancellation(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;
