//! Comic access layer.
//!
//! `ComicRepository` is the single read/write API the view state talks to.
//! It reads local-first, writes every remote fetch through to the store
//! without touching the local favorite flag, and picks random comics.
//!
//! Every operation returns `Result<ComicResult, StoreError>`: the inner
//! `ComicResult` carries recoverable problems (network, bad input) as values,
//! while the outer error is a store fault that callers propagate with `?`.

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::{ApiError, ComicSource};
use crate::models::Comic;
use crate::store::{ComicStore, StoreError};

/// Message shown for unparseable or non-positive comic numbers
pub const INVALID_COMIC_NUMBER: &str = "Invalid comic number";

/// Recoverable failure of an access-layer call.
#[derive(Error, Debug)]
pub enum AccessError {
    #[error(transparent)]
    Network(#[from] ApiError),

    #[error("Invalid comic number")]
    InvalidNumber,
}

pub type ComicResult = Result<Comic, AccessError>;

/// Parse user input as a comic number. Only positive integers are accepted.
pub fn parse_comic_number(input: &str) -> Result<u32, AccessError> {
    match input.trim().parse::<u32>() {
        Ok(num) if num > 0 => Ok(num),
        _ => Err(AccessError::InvalidNumber),
    }
}

/// Mediates between the remote source and the local store.
pub struct ComicRepository<S> {
    source: S,
    store: Arc<ComicStore>,
    rng: Mutex<StdRng>,
}

impl<S: ComicSource> ComicRepository<S> {
    pub fn new(source: S, store: Arc<ComicStore>) -> Self {
        Self {
            source,
            store,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Same as [`ComicRepository::new`] with a reproducible random sequence.
    pub fn with_seed(source: S, store: Arc<ComicStore>, seed: u64) -> Self {
        Self {
            source,
            store,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &Arc<ComicStore> {
        &self.store
    }

    /// Fetch the newest comic. Never served from the cache.
    pub async fn get_latest(&self) -> Result<ComicResult, StoreError> {
        let dto = match self.source.fetch_latest().await {
            Ok(dto) => dto,
            Err(e) => {
                warn!(error = %e, "Failed to fetch latest comic");
                return Ok(Err(e.into()));
            }
        };
        debug!(num = dto.num, "Fetched latest comic");
        self.write_through(Comic::from(dto)).await.map(Ok)
    }

    /// Fetch comic `num`, from the store if it is there.
    pub async fn get(&self, num: u32) -> Result<ComicResult, StoreError> {
        if num == 0 {
            return Ok(Err(AccessError::InvalidNumber));
        }

        if let Some(comic) = self.with_store(move |store| store.get(num)).await? {
            debug!(num, "Comic cache hit");
            return Ok(Ok(comic));
        }

        debug!(num, "Comic cache miss, fetching");
        let dto = match self.source.fetch_comic(num).await {
            Ok(dto) => dto,
            Err(e) => {
                warn!(num, error = %e, "Failed to fetch comic");
                return Ok(Err(e.into()));
            }
        };
        self.write_through(Comic::from(dto)).await.map(Ok)
    }

    /// Pick a comic uniformly from `1..=latest` and load it like [`get`](Self::get).
    ///
    /// The latest comic fetched for the bound is not written to the store.
    pub async fn get_random(&self) -> Result<ComicResult, StoreError> {
        let latest = match self.source.fetch_latest().await {
            Ok(dto) => dto,
            Err(e) => {
                warn!(error = %e, "Failed to fetch latest comic for random pick");
                return Ok(Err(e.into()));
            }
        };

        let num = self.pick(latest.num);
        debug!(num, latest = latest.num, "Picked random comic");
        self.get(num).await
    }

    /// Flip the favorite flag of a stored comic. Uncached comics are left alone.
    pub async fn toggle_favorite(&self, num: u32) -> Result<(), StoreError> {
        let toggled = self
            .with_store(move |store| match store.get(num)? {
                Some(comic) => store.set_favorite(num, !comic.is_favorite),
                None => Ok(false),
            })
            .await?;
        if !toggled {
            debug!(num, "Ignoring favorite toggle for uncached comic");
        }
        Ok(())
    }

    /// Live favorites list, newest first.
    pub fn favorites(&self) -> watch::Receiver<Vec<Comic>> {
        self.store.observe_favorites()
    }

    /// Highest comic number in the store; bounds "next" without a network call.
    pub async fn max_known_number(&self) -> Result<Option<u32>, StoreError> {
        self.with_store(|store| store.max_num()).await
    }

    /// Store a freshly fetched comic and return the merged row.
    async fn write_through(&self, comic: Comic) -> Result<Comic, StoreError> {
        self.with_store(move |store| {
            store.upsert(&comic)?;
            Ok(store.get(comic.num)?.unwrap_or(comic))
        })
        .await
    }

    /// Run a store call on the blocking pool.
    async fn with_store<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&ComicStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(&store)).await?
    }

    fn pick(&self, upper: u32) -> u32 {
        let upper = upper.max(1);
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(1..=upper)
    }
}

// ============================================================================
// Tests
// ============================================================================
