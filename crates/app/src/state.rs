//! Application state management

use std::path::Path;

use seatwise_core::storage::default_database_path;
use seatwise_core::{Database, Error, PlannerConfig, Result};

/// Main application state
pub struct AppState {
    pub db: Database,
    pub config: PlannerConfig,
}

impl AppState {
    /// Open the layout database and load the planner configuration
    ///
    /// Without explicit paths the database lives in the user data directory
    /// and the configuration is read from the user config directory, falling
    /// back to defaults when no file exists.
    pub fn new(db_path: Option<&Path>, config_path: Option<&Path>) -> Result<Self> {
        let db_path = match db_path {
            Some(path) => path.to_path_buf(),
            None => default_database_path().ok_or_else(|| {
                Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine data directory",
                ))
            })?,
        };

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let config = match config_path {
            Some(path) => PlannerConfig::load(path)?,
            None => PlannerConfig::load_or_default()?,
        };
        let db = Database::open(&db_path)?;
        tracing::info!(db = %db_path.display(), "Application state ready");

        Ok(Self { db, config })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_paths() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("seatwise.toml");
        std::fs::write(&config_path, "[sizes]\nmax_batch = 10\n").unwrap();

        let state = AppState::new(
            Some(&dir.path().join("nested").join("layouts.db")),
            Some(&config_path),
        )
        .unwrap();
        assert_eq!(state.config.sizes.max_batch, 10);
        assert!(dir.path().join("nested").join("layouts.db").exists());
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppState::new(
            Some(&dir.path().join("layouts.db")),
            Some(&dir.path().join("missing.toml")),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
