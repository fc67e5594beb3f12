//! State holder for the comic screen.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::api::ComicSource;
use crate::models::Comic;
use crate::repository::{parse_comic_number, ComicRepository, ComicResult};
use crate::store::StoreError;

/// What the comic screen renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComicViewState {
    pub comic: Option<Comic>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Drives the comic screen through the repository.
///
/// Each action marks the state as loading, awaits the repository, then sets
/// either the new comic or the error message. The last shown comic is kept
/// under an error so the screen is never blanked by a failed fetch.
pub struct ComicViewer<S> {
    repository: Arc<ComicRepository<S>>,
    state: watch::Sender<ComicViewState>,
}

impl<S: ComicSource> ComicViewer<S> {
    pub fn new(repository: Arc<ComicRepository<S>>) -> Self {
        let (state, _) = watch::channel(ComicViewState::default());
        Self { repository, state }
    }

    /// Receiver that sees every state change.
    pub fn subscribe(&self) -> watch::Receiver<ComicViewState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ComicViewState {
        self.state.borrow().clone()
    }

    fn current_num(&self) -> Option<u32> {
        self.state.borrow().comic.as_ref().map(|c| c.num)
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });
    }

    fn settle(&self, outcome: Result<ComicResult, StoreError>) -> Result<(), StoreError> {
        match outcome {
            Ok(Ok(comic)) => {
                self.state.send_modify(|s| {
                    s.comic = Some(comic);
                    s.is_loading = false;
                });
                Ok(())
            }
            Ok(Err(e)) => {
                let message = e.to_string();
                self.state.send_modify(|s| {
                    s.error = Some(message);
                    s.is_loading = false;
                });
                Ok(())
            }
            Err(e) => {
                self.state.send_modify(|s| s.is_loading = false);
                Err(e)
            }
        }
    }

    pub async fn load_latest(&self) -> Result<(), StoreError> {
        self.begin();
        let outcome = self.repository.get_latest().await;
        self.settle(outcome)
    }

    pub async fn load_comic(&self, num: u32) -> Result<(), StoreError> {
        self.begin();
        let outcome = self.repository.get(num).await;
        self.settle(outcome)
    }

    pub async fn load_random(&self) -> Result<(), StoreError> {
        self.begin();
        let outcome = self.repository.get_random().await;
        self.settle(outcome)
    }

    /// Go to `num - 1`. Does nothing on comic 1 or with nothing shown.
    pub async fn load_previous(&self) -> Result<(), StoreError> {
        match self.current_num() {
            Some(current) if current > 1 => self.load_comic(current - 1).await,
            _ => Ok(()),
        }
    }

    /// Go to `num + 1` if the store knows a higher comic.
    ///
    /// No request is made just to discover the bound: with an empty store the
    /// bound is the current comic and this does nothing.
    pub async fn load_next(&self) -> Result<(), StoreError> {
        let Some(current) = self.current_num() else {
            return Ok(());
        };

        let max = self.repository.max_known_number().await?.unwrap_or(current);
        if current < max {
            self.load_comic(current + 1).await
        } else {
            debug!(current, max, "Already at the newest known comic");
            Ok(())
        }
    }

    /// Re-run after an error. The error view always offers the latest comic.
    pub async fn retry(&self) -> Result<(), StoreError> {
        self.load_latest().await
    }

    /// Flip the favorite flag of the shown comic.
    pub async fn toggle_favorite(&self) -> Result<(), StoreError> {
        let Some(num) = self.current_num() else {
            return Ok(());
        };

        self.repository.toggle_favorite(num).await?;
        self.state.send_modify(|s| {
            if let Some(comic) = s.comic.as_mut().filter(|c| c.num == num) {
                comic.is_favorite = !comic.is_favorite;
            }
        });
        Ok(())
    }

    /// Load the comic whose number the user typed.
    ///
    /// Bad input sets the error right away without touching the network or
    /// the store.
    pub async fn search(&self, input: &str) -> Result<(), StoreError> {
        match parse_comic_number(input) {
            Ok(num) => self.load_comic(num).await,
            Err(e) => {
                let message = e.to_string();
                self.state.send_modify(|s| {
                    s.error = Some(message);
                    s.is_loading = false;
                });
                Ok(())
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
