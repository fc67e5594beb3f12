//! State holder for the favorites screen.

use tokio::sync::watch;

use crate::models::Comic;

/// Mirror of the live favorites query.
///
/// Starts empty; the first [`sync`](Self::sync) or [`changed`](Self::changed)
/// pulls whatever the store currently holds.
pub struct FavoritesViewer {
    rx: watch::Receiver<Vec<Comic>>,
    favorites: Vec<Comic>,
    selected: usize,
}

impl FavoritesViewer {
    pub fn new(mut rx: watch::Receiver<Vec<Comic>>) -> Self {
        rx.mark_changed();
        Self {
            rx,
            favorites: Vec::new(),
            selected: 0,
        }
    }

    pub fn favorites(&self) -> &[Comic] {
        &self.favorites
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    /// Copy the newest snapshot if one arrived. Returns whether it did.
    pub fn sync(&mut self) -> bool {
        match self.rx.has_changed() {
            Ok(true) => {
                self.take_snapshot();
                true
            }
            _ => false,
        }
    }

    /// Wait for the next snapshot. Returns `false` once the store is gone.
    pub async fn changed(&mut self) -> bool {
        if self.rx.changed().await.is_err() {
            return false;
        }
        self.take_snapshot();
        true
    }

    fn take_snapshot(&mut self) {
        self.favorites = self.rx.borrow_and_update().clone();
        if self.selected >= self.favorites.len() {
            self.selected = self.favorites.len().saturating_sub(1);
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_comic(&self) -> Option<&Comic> {
        self.favorites.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.favorites.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ComicStore;

    fn comic(num: u32) -> Comic {
        Comic {
            num,
            title: format!("Comic {}", num),
            img: String::new(),
            alt: String::new(),
            day: "1".to_string(),
            month: "1".to_string(),
            year: "2020".to_string(),
            is_favorite: false,
        }
    }

    fn store_with_favorites(nums: &[u32]) -> ComicStore {
        let store = ComicStore::open_in_memory().unwrap();
        for &n in nums {
            store.upsert(&comic(n)).unwrap();
            store.set_favorite(n, true).unwrap();
        }
        store
    }

    fn shown(viewer: &FavoritesViewer) -> Vec<u32> {
        viewer.favorites().iter().map(|c| c.num).collect()
    }

    #[test]
    fn test_starts_empty_then_syncs() {
        let store = store_with_favorites(&[1, 3]);
        let mut viewer = FavoritesViewer::new(store.observe_favorites());
        assert!(viewer.is_empty());

        assert!(viewer.sync());
        assert_eq!(shown(&viewer), vec![3, 1]);
        assert!(!viewer.sync());
    }

    #[test]
    fn test_follows_store_changes() {
        let store = store_with_favorites(&[1]);
        let mut viewer = FavoritesViewer::new(store.observe_favorites());
        viewer.sync();

        store.upsert(&comic(8)).unwrap();
        store.set_favorite(8, true).unwrap();
        assert!(viewer.sync());
        assert_eq!(shown(&viewer), vec![8, 1]);

        store.set_favorite(1, false).unwrap();
        assert!(viewer.sync());
        assert_eq!(shown(&viewer), vec![8]);
    }

    #[test]
    fn test_selection_clamped_when_list_shrinks() {
        let store = store_with_favorites(&[1, 2, 3]);
        let mut viewer = FavoritesViewer::new(store.observe_favorites());
        viewer.sync();

        viewer.select_next();
        viewer.select_next();
        viewer.select_next();
        assert_eq!(viewer.selected(), 2);
        assert_eq!(viewer.selected_comic().unwrap().num, 1);

        store.set_favorite(1, false).unwrap();
        store.set_favorite(2, false).unwrap();
        viewer.sync();
        assert_eq!(viewer.selected(), 0);
        assert_eq!(viewer.selected_comic().unwrap().num, 3);

        viewer.select_previous();
        assert_eq!(viewer.selected(), 0);
    }

    #[test]
    fn test_empty_selection() {
        let store = ComicStore::open_in_memory().unwrap();
        let mut viewer = FavoritesViewer::new(store.observe_favorites());
        viewer.sync();
        viewer.select_next();
        assert_eq!(viewer.selected(), 0);
        assert!(viewer.selected_comic().is_none());
    }

    #[tokio::test]
    async fn test_changed_ends_when_store_dropped() {
        let store = store_with_favorites(&[5]);
        let mut viewer = FavoritesViewer::new(store.observe_favorites());
        assert!(viewer.changed().await);
        assert_eq!(shown(&viewer), vec![5]);

        drop(store);
        assert!(!viewer.changed().await);
    }
}
