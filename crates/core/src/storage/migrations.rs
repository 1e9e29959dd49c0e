//! Database migration system
//!
//! Tracks schema versions and applies migrations in order.

use rusqlite::Connection;
use tracing::{info, instrument};

use crate::error::Result;

/// A database migration
pub struct Migration {
    /// Version number (must be sequential starting from 1)
    pub version: u32,
    /// Description of what this migration does
    pub description: &'static str,
    /// SQL to run for this migration
    pub sql: &'static str,
}

/// All migrations in order
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema",
        sql: r#"
            -- One row per saved design session
            CREATE TABLE IF NOT EXISTS layouts (
                code TEXT PRIMARY KEY,
                kind TEXT NOT NULL,
                room_shape TEXT,
                room_width REAL,
                room_height REAL,
                saved_at TEXT NOT NULL
            );

            -- Tables, booths and decor
            CREATE TABLE IF NOT EXISTS elements (
                layout_code TEXT NOT NULL,
                id TEXT NOT NULL,
                position INTEGER NOT NULL,
                label TEXT NOT NULL,
                -- table, booth or decor
                variant TEXT NOT NULL,
                -- booth kind or decor kind, NULL for tables
                subkind TEXT,
                shape TEXT,
                x REAL NOT NULL,
                y REAL NOT NULL,
                width REAL NOT NULL,
                height REAL NOT NULL,
                rotation REAL NOT NULL,
                seat_count INTEGER NOT NULL,
                PRIMARY KEY (layout_code, id),
                FOREIGN KEY (layout_code) REFERENCES layouts(code) ON DELETE CASCADE
            );

            -- Seats in element order
            CREATE TABLE IF NOT EXISTS seats (
                layout_code TEXT NOT NULL,
                id TEXT NOT NULL,
                element_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                left_offset REAL NOT NULL,
                top_offset REAL NOT NULL,
                occupant TEXT,
                PRIMARY KEY (layout_code, id),
                FOREIGN KEY (layout_code, element_id)
                    REFERENCES elements(layout_code, id) ON DELETE CASCADE
            );

            -- Attendees and exhibitors
            CREATE TABLE IF NOT EXISTS people (
                layout_code TEXT NOT NULL,
                id TEXT NOT NULL,
                position INTEGER NOT NULL,
                name TEXT NOT NULL,
                -- attendee or exhibitor
                variant TEXT NOT NULL,
                attribute1 TEXT NOT NULL DEFAULT '',
                attribute2 TEXT NOT NULL DEFAULT '',
                tags_json TEXT NOT NULL DEFAULT '[]',
                element_id TEXT,
                PRIMARY KEY (layout_code, id),
                FOREIGN KEY (layout_code) REFERENCES layouts(code) ON DELETE CASCADE
            );
        "#,
    },
    Migration {
        version: 2,
        description: "Add indexes for layout loading",
        sql: r#"
            CREATE INDEX IF NOT EXISTS idx_elements_layout ON elements(layout_code, position);
            CREATE INDEX IF NOT EXISTS idx_seats_element ON seats(layout_code, element_id, position);
            CREATE INDEX IF NOT EXISTS idx_people_layout ON people(layout_code, position);
            CREATE INDEX IF NOT EXISTS idx_layouts_saved ON layouts(saved_at);
        "#,
    },
];

/// Initialize the migrations table
fn init_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

/// Get the current schema version
fn get_current_version(conn: &Connection) -> Result<u32> {
    let version: Option<u32> = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })
        .unwrap_or(None);
    Ok(version.unwrap_or(0))
}

/// Record that a migration was applied
fn record_migration(conn: &Connection, migration: &Migration) -> Result<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            migration.version,
            migration.description,
            chrono::Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Run all pending migrations
#[instrument(skip(conn))]
pub fn run_migrations(conn: &Connection) -> Result<()> {
    init_migrations_table(conn)?;

    let current_version = get_current_version(conn)?;
    info!(current_version, "Checking for pending migrations");

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                description = migration.description,
                "Applying migration"
            );

            conn.execute_batch(migration.sql)?;
            record_migration(conn, migration)?;
        }
    }

    let new_version = get_current_version(conn)?;
    if new_version > current_version {
        info!(
            from = current_version,
            to = new_version,
            "Database schema updated"
        );
    }

    Ok(())
}
