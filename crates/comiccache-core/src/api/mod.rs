//! Remote comic source.
//!
//! This module provides the `ComicSource` trait the access layer fetches
//! through, and `XkcdClient`, its implementation over the public xkcd JSON
//! endpoints. No authentication, no retries, no caching happens here.

pub mod client;
pub mod error;
#[cfg(test)]
pub mod mock;

pub use client::{ComicSource, XkcdClient, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use error::ApiError;
