//! News Archive
//!
//! SQLite archive of fetched articles, deduplicated by publisher link.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};
use tracing::{debug, info};

use radar_core::Article;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Lock poisoned")]
    LockError,
}

/// SQLite-backed article archive
pub struct NewsArchive {
    conn: Mutex<Connection>,
}

impl NewsArchive {
    /// Open (or create) the archive at `db_path`
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, ArchiveError> {
        if let Some(parent) = db_path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ArchiveError::Io(format!("Failed to create database directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path.as_ref())?;
        let archive = Self {
            conn: Mutex::new(conn),
        };
        archive.init_schema()?;

        info!("Initialized news archive at: {}", db_path.as_ref().display());
        Ok(archive)
    }

    /// Create an in-memory archive (useful for testing)
    pub fn new_in_memory() -> Result<Self, ArchiveError> {
        let archive = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        archive.init_schema()?;
        Ok(archive)
    }

    fn init_schema(&self) -> Result<(), ArchiveError> {
        let conn = self.conn.lock().map_err(|_| ArchiveError::LockError)?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS news (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                link TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL,
                pub_date INTEGER,
                archived_at INTEGER DEFAULT (strftime('%s', 'now'))
            );

            CREATE INDEX IF NOT EXISTS idx_news_pub_date ON news(pub_date DESC);
            "#,
        )?;

        Ok(())
    }

    /// Insert articles whose link is not archived yet; returns how many were new
    pub fn store_articles(&self, articles: &[Article]) -> Result<usize, ArchiveError> {
        let mut conn = self.conn.lock().map_err(|_| ArchiveError::LockError)?;
        let tx = conn.transaction()?;
        let mut inserted = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO news (title, link, description, pub_date)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for article in articles.iter().filter(|a| !a.link.is_empty()) {
                inserted += stmt.execute(params![
                    article.title,
                    article.link,
                    article.description,
                    article.published_at.map(|dt| dt.timestamp()),
                ])?;
            }
        }

        tx.commit()?;
        debug!(
            "Archived {} new of {} articles",
            inserted,
            articles.len()
        );
        Ok(inserted)
    }

    /// Whether an article with `link` is archived
    pub fn contains(&self, link: &str) -> Result<bool, ArchiveError> {
        let conn = self.conn.lock().map_err(|_| ArchiveError::LockError)?;
        let found: i64 = conn.query_row(
            "SELECT COUNT(*) FROM news WHERE link = ?1",
            params![link],
            |row| row.get(0),
        )?;
        Ok(found > 0)
    }

    /// Number of archived articles
    pub fn count(&self) -> Result<i64, ArchiveError> {
        let conn = self.conn.lock().map_err(|_| ArchiveError::LockError)?;
        Ok(conn.query_row("SELECT COUNT(*) FROM news", [], |row| row.get(0))?)
    }
}
