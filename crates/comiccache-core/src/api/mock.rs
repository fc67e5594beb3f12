//! Mock comic source for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::models::ComicDto;

use super::client::{ComicSource, SourceFuture};
use super::ApiError;

/// A hand-rolled archive of comics `1..=latest` implementing [`ComicSource`].
///
/// Supports:
/// - Call counting per endpoint and a log of requested numbers.
/// - Going offline (every call fails with a server error).
/// - Growing the archive and renaming comics to simulate upstream edits.
pub struct MockSource {
    latest: AtomicU32,
    offline: AtomicBool,
    titles: Mutex<HashMap<u32, String>>,
    latest_calls: AtomicUsize,
    comic_calls: AtomicUsize,
    requested: Mutex<Vec<u32>>,
}

impl MockSource {
    /// Create a mock whose archive holds comics `1..=latest`.
    pub fn new(latest: u32) -> Self {
        Self {
            latest: AtomicU32::new(latest),
            offline: AtomicBool::new(false),
            titles: Mutex::new(HashMap::new()),
            latest_calls: AtomicUsize::new(0),
            comic_calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn set_latest(&self, latest: u32) {
        self.latest.store(latest, Ordering::SeqCst);
    }

    pub fn set_title(&self, num: u32, title: &str) {
        self.titles.lock().unwrap().insert(num, title.to_string());
    }

    pub fn latest_calls(&self) -> usize {
        self.latest_calls.load(Ordering::SeqCst)
    }

    pub fn comic_calls(&self) -> usize {
        self.comic_calls.load(Ordering::SeqCst)
    }

    /// Total network round-trips across both endpoints.
    pub fn total_calls(&self) -> usize {
        self.latest_calls() + self.comic_calls()
    }

    /// Numbers passed to `fetch_comic`, in call order.
    pub fn requested(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }

    pub fn dto(&self, num: u32) -> ComicDto {
        let title = self
            .titles
            .lock()
            .unwrap()
            .get(&num)
            .cloned()
            .unwrap_or_else(|| format!("Comic {}", num));
        ComicDto {
            num,
            title,
            img: format!("https://imgs.xkcd.com/comics/comic_{}.png", num),
            alt: format!("Alt text for {}", num),
            day: "1".to_string(),
            month: "4".to_string(),
            year: "2010".to_string(),
        }
    }

    fn respond(&self, num: u32) -> Result<ComicDto, ApiError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::ServerError("503 Service Unavailable".to_string()));
        }
        if num == 0 || num > self.latest.load(Ordering::SeqCst) {
            return Err(ApiError::NotFound(format!("/{}/info.0.json", num)));
        }
        Ok(self.dto(num))
    }
}

impl ComicSource for MockSource {
    fn fetch_latest(&self) -> SourceFuture<'_> {
        self.latest_calls.fetch_add(1, Ordering::SeqCst);
        let result = self.respond(self.latest.load(Ordering::SeqCst));
        Box::pin(async move { result })
    }

    fn fetch_comic(&self, num: u32) -> SourceFuture<'_> {
        self.comic_calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(num);
        let result = self.respond(num);
        Box::pin(async move { result })
    }
}
