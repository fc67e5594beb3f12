//! Data models for comics.
//!
//! - `Comic`: the domain record, including the local-only favorite flag
//! - `ComicDto`: the shape returned by the remote JSON endpoints

pub mod comic;

pub use comic::{Comic, ComicDto};
