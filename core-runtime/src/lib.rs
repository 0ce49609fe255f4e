//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the gallery client:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the other modules depend on.
//! It establishes the logging conventions and the validated configuration
//! the gallery client is bootstrapped from.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
