//! Application state management for comiccache.
//!
//! This module contains the `App` struct: which screen is showing, overlay
//! state, the view-state holders from the core crate, and the single
//! background task that runs the current comic action.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use comiccache_core::{
    ComicRepository, ComicStore, ComicViewState, ComicViewer, Config, FavoritesViewer,
    StoreError, XkcdClient,
};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for the comic number search input.
/// Comic numbers are four digits today; 10 leaves room for typos to show up.
const MAX_SEARCH_LENGTH: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Screens the user can be on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Comic,
    Favorites,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    Quitting,
}

/// Actions on the comic screen that run against the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComicAction {
    Latest,
    Open(u32),
    Previous,
    Next,
    Random,
    ToggleFavorite,
    Search(String),
    Retry,
}

impl ComicAction {
    async fn run(self, viewer: &ComicViewer<XkcdClient>) -> Result<(), StoreError> {
        match self {
            ComicAction::Latest => viewer.load_latest().await,
            ComicAction::Open(num) => viewer.load_comic(num).await,
            ComicAction::Previous => viewer.load_previous().await,
            ComicAction::Next => viewer.load_next().await,
            ComicAction::Random => viewer.load_random().await,
            ComicAction::ToggleFavorite => viewer.toggle_favorite().await,
            ComicAction::Search(input) => viewer.search(&input).await,
            ComicAction::Retry => viewer.retry().await,
        }
    }
}

pub struct App {
    viewer: Arc<ComicViewer<XkcdClient>>,
    comic_rx: watch::Receiver<ComicViewState>,
    in_flight: Option<JoinHandle<Result<(), StoreError>>>,

    pub state: AppState,
    pub screen: Screen,
    pub comic: ComicViewState,
    pub favorites: FavoritesViewer,
    pub search_input: String,
    pub status_message: Option<String>,
}

impl App {
    /// Build the client, open the store, and wire up the view state.
    pub fn new(config: &Config) -> Result<Self> {
        let client = XkcdClient::with_base_url(&config.base_url, config.request_timeout())
            .context("Failed to build HTTP client")?;

        let db_path = config.database_path()?;
        let store = ComicStore::open(&db_path)
            .with_context(|| format!("Failed to open comic store at {}", db_path.display()))?;
        info!(path = %db_path.display(), comics = store.len()?, "Comic store ready");

        let repository = Arc::new(ComicRepository::new(client, Arc::new(store)));
        let favorites = FavoritesViewer::new(repository.favorites());
        let viewer = Arc::new(ComicViewer::new(repository));
        let comic_rx = viewer.subscribe();

        Ok(Self {
            viewer,
            comic_rx,
            in_flight: None,

            state: AppState::Normal,
            screen: Screen::Comic,
            comic: ComicViewState::default(),
            favorites,
            search_input: String::new(),
            status_message: None,
        })
    }

    /// True while a comic action is still running.
    pub fn is_busy(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Run a comic action in the background.
    ///
    /// Only one action runs at a time; keys pressed while one is pending are
    /// dropped with a status message.
    pub fn dispatch(&mut self, action: ComicAction) {
        if self.is_busy() {
            self.status_message = Some("Still loading...".to_string());
            return;
        }

        debug!(?action, "Dispatching comic action");
        self.status_message = None;
        let viewer = self.viewer.clone();
        self.in_flight = Some(tokio::spawn(async move { action.run(&viewer).await }));
    }

    /// Collect a finished action and pull fresh view state.
    ///
    /// A store failure is returned as an error and ends the main loop.
    pub async fn check_background_tasks(&mut self) -> Result<()> {
        if self.in_flight.as_ref().is_some_and(|h| h.is_finished()) {
            if let Some(handle) = self.in_flight.take() {
                match handle.await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        error!(error = %e, "Comic store failure");
                        return Err(e).context("Comic store failure");
                    }
                    Err(e) if e.is_cancelled() => {}
                    Err(e) => return Err(anyhow!("Comic task failed: {}", e)),
                }
            }
        }

        if self.comic_rx.has_changed().unwrap_or(false) {
            self.comic = self.comic_rx.borrow_and_update().clone();
        }
        self.favorites.sync();
        Ok(())
    }

    /// Open the highlighted favorite on the comic screen.
    pub fn open_selected_favorite(&mut self) {
        if let Some(num) = self.favorites.selected_comic().map(|c| c.num) {
            self.screen = Screen::Comic;
            self.dispatch(ComicAction::Open(num));
        }
    }

    pub fn start_search(&mut self) {
        self.search_input.clear();
        self.state = AppState::Searching;
    }

    pub fn submit_search(&mut self) {
        let input = std::mem::take(&mut self.search_input);
        self.state = AppState::Normal;
        self.dispatch(ComicAction::Search(input));
    }

    pub fn push_search_char(&mut self, c: char) {
        if can_add_search_char(self.search_input.len(), c) {
            self.search_input.push(c);
        }
    }

    /// Cancel whatever is still running. Called when the screen goes away.
    pub fn shutdown(&mut self) {
        self.abort_in_flight();
    }

    fn abort_in_flight(&mut self) -> Option<JoinHandle<Result<(), StoreError>>> {
        let handle = self.in_flight.take()?;
        if !handle.is_finished() {
            debug!("Aborting in-flight comic action");
        }
        handle.abort();
        Some(handle)
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Check if a character can be added to the search input.
/// Anything printable is accepted; the viewer decides if it is a number.
pub fn can_add_search_char(current_len: usize, c: char) -> bool {
    current_len < MAX_SEARCH_LENGTH && !c.is_control()
}

// ============================================================================
// Tests
// ============================================================================
