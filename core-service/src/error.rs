use bridge_traits::error::BridgeError;
use core_gallery::GalleryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error("Gallery error: {0}")]
    Gallery(#[from] GalleryError),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// The service answered but did not create the media item
    #[error("Media item creation failed for '{file_name}': {message}")]
    MediaCreationFailed { file_name: String, message: String },
}

impl CoreError {
    /// Whether this is the expected "no album with that title" outcome.
    pub fn is_album_not_found(&self) -> bool {
        matches!(self, CoreError::Gallery(err) if err.is_not_found())
    }

    pub fn is_cancellation(&self) -> bool {
        match self {
            CoreError::Gallery(err) => err.is_cancellation(),
            CoreError::Bridge(err) => err.is_cancellation(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
