//! # Google Photos Provider
//!
//! Implements the `AlbumService` trait for the Google Photos Library API v1.
//!
//! ## Overview
//!
//! This module provides:
//! - Paginated album listing (`GET /albums`)
//! - Album creation (`POST /albums`)
//! - Media item creation from upload tokens (`POST /mediaItems:batchCreate`)
//! - Mapping of HTTP status codes to typed errors
//!
//! Authentication is a caller-supplied OAuth 2.0 bearer token. Listing
//! requests are retried by the transport according to the connector's
//! [`RetryPolicy`](bridge_traits::RetryPolicy); creation requests are sent once.

pub mod connector;
pub mod error;
pub mod types;

pub use connector::GooglePhotosConnector;
pub use error::{GooglePhotosError, Result};
