//! Workspace umbrella crate.
//!
//! This crate exposes feature flags that map to the individual workspace
//! crates so host applications can depend on `gallery-client-workspace` and
//! enable the documented features without wiring each crate individually.
//!
//! - `desktop-shims` (default): the full [`core_service::GalleryClient`] facade
//!   with the reqwest-backed HTTP client and the Google Photos connector.
//! - `gallery-only`: just the album resolver and cache contracts from
//!   `core-gallery`, for hosts that bring their own remote service.

#[cfg(feature = "desktop-shims")]
pub use core_service;

#[cfg(feature = "gallery-only")]
pub use core_gallery;
