//! # Host Bridge Traits
//!
//! Capability contracts shared by the gallery client crates.
//!
//! ## Overview
//!
//! This crate defines the seams between the album resolution core and the
//! things it does not own: the HTTP transport, the remote photo library, the
//! host's logging pipeline and the wall clock. Each trait has a production
//! implementation elsewhere in the workspace and is small enough to fake in
//! tests.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP with retry policy per request
//! - [`AlbumService`](gallery::AlbumService) - Paginated album listing, album
//!   creation and media-item creation on the remote library
//! - [`Clock`](time::Clock) - Time source for deterministic expiry tests
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Cancellation
//!
//! Every remote or cache operation receives a [`CallContext`](context::CallContext).
//! Implementations run their I/O through [`CallContext::run`](context::CallContext::run)
//! so that cancellation and deadlines surface as [`BridgeError`] values.
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Connector
//! crates keep richer error enums internally and convert at the trait boundary.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so implementations can be shared
//! behind `Arc` across async tasks.

pub mod context;
pub mod error;
pub mod gallery;
pub mod http;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use context::CallContext;
pub use gallery::{
    Album, AlbumPage, AlbumService, MediaItem, MediaItemResult, MediaItemStatus, MediaUpload,
};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use time::{Clock, ConsoleLogger, LogEntry, LogLevel, LoggerSink, ManualClock, SystemClock};
