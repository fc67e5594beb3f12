//! Core library for comiccache.
//!
//! This crate holds everything that is not terminal rendering:
//!
//! - `api`: the remote comic source (xkcd JSON endpoints)
//! - `store`: the SQLite-backed local comic store with a live favorites query
//! - `repository`: the access layer that combines the two (local-first reads,
//!   favorite toggling, random selection)
//! - `viewer`: per-screen view state driven by the repository
//! - `models`: domain and wire types
//! - `config`: on-disk configuration and directory resolution

pub mod api;
pub mod config;
pub mod models;
pub mod repository;
pub mod store;
pub mod viewer;

pub use api::{ApiError, ComicSource, XkcdClient};
pub use config::Config;
pub use models::{Comic, ComicDto};
pub use repository::{parse_comic_number, AccessError, ComicRepository, ComicResult};
pub use store::{ComicStore, StoreError};
pub use viewer::{ComicViewState, ComicViewer, FavoritesViewer};
