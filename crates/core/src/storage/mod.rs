//! SQLite storage layer for Seatwise

mod layouts;
mod migrations;
mod parse;
mod traits;

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::instrument;

use crate::context::SessionCode;
use crate::error::Result;
use crate::store::LayoutSnapshot;

pub use layouts::{LayoutInfo, SnapshotStore};
pub use traits::LayoutRepository;

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    /// Get snapshot store
    pub fn snapshots(&self) -> SnapshotStore<'_> {
        SnapshotStore::new(&self.conn)
    }
}

/// Default database location (`<data dir>/seatwise.db`)
pub fn default_database_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "seatwise", "seatwise")
        .map(|dirs| dirs.data_dir().join("seatwise.db"))
}

impl LayoutRepository for Database {
    fn save_layout(&self, snapshot: &LayoutSnapshot) -> Result<()> {
        self.snapshots().save(snapshot)
    }

    fn load_layout(&self, code: &SessionCode) -> Result<Option<LayoutSnapshot>> {
        self.snapshots().load(code)
    }

    fn list_layouts(&self) -> Result<Vec<LayoutInfo>> {
        self.snapshots().list()
    }

    fn delete_layout(&self, code: &SessionCode) -> Result<bool> {
        self.snapshots().delete(code)
    }
}
