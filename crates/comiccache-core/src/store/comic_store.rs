use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::sync::watch;
use tracing::debug;

use crate::models::Comic;

use super::StoreError;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS comics (
         num         INTEGER PRIMARY KEY,
         title       TEXT NOT NULL,
         img         TEXT NOT NULL,
         alt         TEXT NOT NULL,
         day         TEXT NOT NULL,
         month       TEXT NOT NULL,
         year        TEXT NOT NULL,
         is_favorite INTEGER NOT NULL DEFAULT 0
     );";

const COLUMNS: &str = "num, title, img, alt, day, month, year, is_favorite";

/// SQLite-backed comic table plus the favorites change feed.
///
/// A single connection sits behind a [`Mutex`], so writes are serialized.
/// Favorites subscribers read from a [`watch`] channel and never hold the lock.
pub struct ComicStore {
    conn: Mutex<Connection>,
    favorites_tx: watch::Sender<Vec<Comic>>,
}

impl ComicStore {
    /// Open (or create) the store at `path` with WAL mode and standard pragmas.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        debug!(path = %path.display(), "Opened comic store");
        Self::from_connection(conn)
    }

    /// Non-persistent store, mainly for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        let favorites = query_favorites(&conn)?;
        let (favorites_tx, _) = watch::channel(favorites);

        Ok(Self {
            conn: Mutex::new(conn),
            favorites_tx,
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Point lookup. A miss is `Ok(None)`, not an error.
    pub fn get(&self, num: u32) -> Result<Option<Comic>, StoreError> {
        let conn = self.conn()?;
        let comic = conn
            .query_row(
                &format!("SELECT {} FROM comics WHERE num = ?1", COLUMNS),
                params![num],
                row_to_comic,
            )
            .optional()?;
        Ok(comic)
    }

    /// Insert a comic, or refresh the remote fields of an existing one.
    ///
    /// `is_favorite` is only written when the row is new; an existing row keeps
    /// its flag no matter what `comic.is_favorite` says.
    pub fn upsert(&self, comic: &Comic) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO comics (num, title, img, alt, day, month, year, is_favorite)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(num) DO UPDATE SET
                 title = excluded.title,
                 img   = excluded.img,
                 alt   = excluded.alt,
                 day   = excluded.day,
                 month = excluded.month,
                 year  = excluded.year",
            params![
                comic.num,
                comic.title,
                comic.img,
                comic.alt,
                comic.day,
                comic.month,
                comic.year,
                comic.is_favorite
            ],
        )?;

        // A refreshed favorite changes what the favorites view shows.
        let is_favorite: bool = conn.query_row(
            "SELECT is_favorite FROM comics WHERE num = ?1",
            params![comic.num],
            |row| row.get(0),
        )?;
        if is_favorite {
            self.publish_favorites(&conn)?;
        }

        debug!(num = comic.num, is_favorite, "Upserted comic");
        Ok(())
    }

    /// Set only the favorite flag. Returns `false` if `num` is not stored.
    pub fn set_favorite(&self, num: u32, value: bool) -> Result<bool, StoreError> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE comics SET is_favorite = ?2 WHERE num = ?1",
            params![num, value],
        )?;

        if changed == 0 {
            debug!(num, "Favorite update skipped, comic not stored");
            return Ok(false);
        }

        self.publish_favorites(&conn)?;
        debug!(num, value, "Updated favorite flag");
        Ok(true)
    }

    /// Greatest stored comic number, `None` when the store is empty.
    pub fn max_num(&self) -> Result<Option<u32>, StoreError> {
        let conn = self.conn()?;
        let max = conn.query_row("SELECT MAX(num) FROM comics", [], |row| {
            row.get::<_, Option<u32>>(0)
        })?;
        Ok(max)
    }

    /// Number of stored comics.
    pub fn len(&self) -> Result<usize, StoreError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM comics", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Live favorites query, newest comic first.
    ///
    /// The receiver starts at the current list and sees a new list after every
    /// write that changes it. Dropping the receiver unsubscribes.
    pub fn observe_favorites(&self) -> watch::Receiver<Vec<Comic>> {
        self.favorites_tx.subscribe()
    }

    fn publish_favorites(&self, conn: &Connection) -> Result<(), StoreError> {
        let fresh = query_favorites(conn)?;
        let count = fresh.len();
        let sent = self.favorites_tx.send_if_modified(|current| {
            if *current == fresh {
                false
            } else {
                *current = fresh;
                true
            }
        });
        if sent {
            debug!(count, "Published favorites snapshot");
        }
        Ok(())
    }
}

fn query_favorites(conn: &Connection) -> Result<Vec<Comic>, StoreError> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM comics WHERE is_favorite = 1 ORDER BY num DESC",
        COLUMNS
    ))?;
    let comics = stmt
        .query_map([], row_to_comic)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(comics)
}

fn row_to_comic(row: &Row<'_>) -> rusqlite::Result<Comic> {
    Ok(Comic {
        num: row.get(0)?,
        title: row.get(1)?,
        img: row.get(2)?,
        alt: row.get(3)?,
        day: row.get(4)?,
        month: row.get(5)?,
        year: row.get(6)?,
        is_favorite: row.get(7)?,
    })
}

// ============================================================================
// Tests
// ============================================================================
