//! Per-screen view state.
//!
//! - `ComicViewer`: the comic screen (current comic, loading flag, error text)
//!   and its navigation actions
//! - `FavoritesViewer`: the favorites screen, a mirror of the live favorites
//!   query with a selection cursor

pub mod comic;
pub mod favorites;

pub use comic::{ComicViewState, ComicViewer};
pub use favorites::FavoritesViewer;
