//! Local persistent comic store.
//!
//! Comics are kept in a single SQLite table keyed by comic number. The store
//! is the source of truth once populated and survives restarts. It also owns
//! the live favorites query: subscribers get the full favorites list again
//! whenever a write changes it.

pub mod comic_store;
pub mod error;

pub use comic_store::ComicStore;
pub use error::StoreError;
