pub mod format;
pub mod json_backend;

use std::path::{Path, PathBuf};

use crate::{domain::Roster, errors::StorageError};

pub type Result<T> = std::result::Result<T, StorageError>;

/// Abstraction over persistence backends that store rosters by name.
pub trait StorageBackend: Send + Sync {
    /// Writes the roster under its own name and returns the file written.
    fn save(&self, roster: &Roster) -> Result<PathBuf>;
    fn load(&self, name: &str) -> Result<LoadReport>;
    fn list_rosters(&self) -> Result<Vec<String>>;
    /// Backup file names for `name`, newest first.
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<LoadReport>;

    fn save_to_path(&self, roster: &Roster, path: &Path) -> Result<()> {
        json_backend::save_roster_to_path(roster, path)
    }

    fn load_from_path(&self, path: &Path) -> Result<LoadReport> {
        let fallback = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("roster");
        json_backend::load_roster_from_path(path, fallback)
    }
}

pub use format::LoadReport;
pub use json_backend::{canonical_name, JsonStorage};
