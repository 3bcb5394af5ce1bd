pub mod database;

pub use database::Database;

use std::path::PathBuf;

use crate::error::DatabaseError;

/// Returns `~/.config/actearly[-dev]/` based on ACTEARLY_ENV.
///
/// Set ACTEARLY_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, DatabaseError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("ACTEARLY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("actearly-dev")
    } else {
        base_dir.join("actearly")
    };

    std::fs::create_dir_all(&dir).map_err(|source| DatabaseError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
