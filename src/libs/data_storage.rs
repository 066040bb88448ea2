//! Host paths: the tool's own data directory and the Things group container.

use anyhow::Result;
use std::env::consts::OS;
use std::env::var;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "thingsview";

const THINGS_CONTAINER: &str = "JLMPQHK86H.com.culturedcode.ThingsMac";
const THINGS_DATA_PREFIX: &str = "ThingsData-";
const THINGS_DATABASE_DIR: &str = "Things Database.thingsdatabase";
const THINGS_DATABASE_FILE: &str = "main.sqlite";

#[derive(Clone, Debug)]
pub struct DataStorage {
    base_path: PathBuf,
}

impl DataStorage {
    pub fn new() -> Self {
        let base_path = match OS {
            "windows" => var("LOCALAPPDATA").unwrap_or_else(|_| ".".into()),
            "macos" => home() + "/Library/Application Support",
            _ => home() + "/.local/share",
        };

        Self {
            base_path: Path::new(&base_path).join(APP_NAME),
        }
    }

    /// Path of `file_name` in the data directory, creating the directory if needed.
    pub fn get_path(&self, file_name: &str) -> Result<PathBuf> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path)?;
        }
        Ok(self.base_path.join(file_name))
    }
}

impl Default for DataStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn home() -> String {
    var("HOME").unwrap_or_else(|_| ".".into())
}

/// Root of the Things group container under the current `HOME`.
pub fn things_container() -> PathBuf {
    Path::new(&home()).join("Library").join("Group Containers").join(THINGS_CONTAINER)
}

/// Finds `ThingsData-*/Things Database.thingsdatabase/main.sqlite` inside `container`.
///
/// Candidates are checked in name order so the result is stable when more
/// than one data directory exists.
pub fn find_things_database(container: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(container).ok()?;
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(THINGS_DATA_PREFIX))
        .map(|entry| entry.path().join(THINGS_DATABASE_DIR).join(THINGS_DATABASE_FILE))
        .collect();
    candidates.sort();
    candidates.into_iter().find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn finds_database_in_data_directory() {
        let container = tempdir().expect("tempdir");
        let db_dir = container.path().join("ThingsData-ABC12").join(THINGS_DATABASE_DIR);
        fs::create_dir_all(&db_dir).expect("create dirs");
        fs::write(db_dir.join(THINGS_DATABASE_FILE), b"").expect("write db");

        let found = find_things_database(container.path()).expect("database found");
        assert_eq!(found, db_dir.join(THINGS_DATABASE_FILE));
    }

    #[test]
    fn skips_data_directory_without_database() {
        let container = tempdir().expect("tempdir");
        fs::create_dir_all(container.path().join("ThingsData-EMPTY")).expect("create dir");
        fs::create_dir_all(container.path().join("Other").join(THINGS_DATABASE_DIR)).expect("create dir");

        assert!(find_things_database(container.path()).is_none());
    }

    #[test]
    fn missing_container_yields_none() {
        let container = tempdir().expect("tempdir");
        assert!(find_things_database(&container.path().join("absent")).is_none());
    }
}
