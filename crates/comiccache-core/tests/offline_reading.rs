//! End-to-end checks of the public API against an on-disk store.
//!
//! A comic read once must stay readable after a restart with the network
//! gone, and favorites must survive both the restart and later refetches.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use comiccache_core::api::client::SourceFuture;
use comiccache_core::{
    ApiError, ComicDto, ComicRepository, ComicSource, ComicStore, ComicViewer, FavoritesViewer,
};

const LATEST: u32 = 2900;

struct Archive {
    online: AtomicBool,
    calls: AtomicUsize,
}

impl Archive {
    fn new() -> Self {
        Self {
            online: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
        }
    }

    fn respond(&self, num: u32) -> Result<ComicDto, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.online.load(Ordering::SeqCst) {
            return Err(ApiError::ServerError("offline".to_string()));
        }
        if num == 0 || num > LATEST {
            return Err(ApiError::NotFound(num.to_string()));
        }
        Ok(ComicDto {
            num,
            title: format!("Comic {}", num),
            img: format!("https://imgs.xkcd.com/comics/{}.png", num),
            alt: "alt".to_string(),
            day: "3".to_string(),
            month: "2".to_string(),
            year: "2024".to_string(),
        })
    }
}

impl ComicSource for Archive {
    fn fetch_latest(&self) -> SourceFuture<'_> {
        let result = self.respond(LATEST);
        Box::pin(async move { result })
    }

    fn fetch_comic(&self, num: u32) -> SourceFuture<'_> {
        let result = self.respond(num);
        Box::pin(async move { result })
    }
}

fn temp_db(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("comiccache_it_{}_{}", name, std::process::id()))
        .join("comics.db")
}

fn cleanup(path: &PathBuf) {
    if let Some(dir) = path.parent() {
        let _ = std::fs::remove_dir_all(dir);
    }
}

#[tokio::test]
async fn favorites_and_cache_survive_restart_offline() {
    let path = temp_db("restart");
    cleanup(&path);

    {
        let store = Arc::new(ComicStore::open(&path).unwrap());
        let repo = Arc::new(ComicRepository::new(Archive::new(), store));
        let viewer = ComicViewer::new(repo.clone());

        viewer.load_latest().await.unwrap();
        viewer.load_previous().await.unwrap();
        viewer.toggle_favorite().await.unwrap();
        assert!(viewer.state().comic.unwrap().is_favorite);
    }

    let store = Arc::new(ComicStore::open(&path).unwrap());
    let archive = Archive::new();
    archive.online.store(false, Ordering::SeqCst);
    let repo = Arc::new(ComicRepository::new(archive, store));

    let mut favorites = FavoritesViewer::new(repo.favorites());
    assert!(favorites.sync());
    let nums: Vec<u32> = favorites.favorites().iter().map(|c| c.num).collect();
    assert_eq!(nums, vec![LATEST - 1]);

    let viewer = ComicViewer::new(repo.clone());
    viewer.load_comic(LATEST - 1).await.unwrap();
    let state = viewer.state();
    assert_eq!(state.error, None);
    assert!(state.comic.unwrap().is_favorite);

    // Next is bounded by what the store knows, and LATEST is stored.
    viewer.load_next().await.unwrap();
    assert_eq!(viewer.state().comic.unwrap().num, LATEST);
    assert_eq!(repo.source().calls.load(Ordering::SeqCst), 0);

    // Anything not cached needs the network.
    viewer.load_comic(1).await.unwrap();
    let state = viewer.state();
    assert_eq!(state.comic.unwrap().num, LATEST);
    assert!(state.error.unwrap().contains("offline"));

    cleanup(&path);
}

#[tokio::test]
async fn refetching_latest_keeps_favorite() {
    let path = temp_db("refetch");
    cleanup(&path);

    let store = Arc::new(ComicStore::open(&path).unwrap());
    let repo = ComicRepository::new(Archive::new(), store.clone());

    let latest = repo.get_latest().await.unwrap().unwrap();
    repo.toggle_favorite(latest.num).await.unwrap();

    let again = repo.get_latest().await.unwrap().unwrap();
    assert!(again.is_favorite);
    assert_eq!(store.len().unwrap(), 1);
    assert_eq!(repo.max_known_number().await.unwrap(), Some(LATEST));

    cleanup(&path);
}
