//! User configuration for thingsview.
//!
//! Settings live in `config.json` inside the platform data directory provided
//! by [`DataStorage`]. A missing file means defaults; a malformed one is an
//! error rather than silently replaced.
//!
//! The database location is chosen in this order:
//!
//! 1. the `--db` command-line flag
//! 2. the `THINGSVIEW_DB` environment variable
//! 3. `db_path` from `config.json`
//! 4. auto-detection inside the Things group container

use super::data_storage::{self, DataStorage};
use crate::db::engine::{DEFAULT_DEADLINE_DAYS, DEFAULT_LOGBOOK_LIMIT};
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_debug, msg_error_anyhow, msg_print};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DB_ENV_VAR: &str = "THINGSVIEW_DB";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Explicit path to the Things `main.sqlite`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
    pub logbook_limit: usize,
    pub deadline_days: i64,
    /// Per-query timeout; absent or zero disables it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_timeout_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: None,
            logbook_limit: DEFAULT_LOGBOOK_LIMIT,
            deadline_days: DEFAULT_DEADLINE_DAYS,
            query_timeout_ms: None,
        }
    }
}

impl Config {
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config = serde_json::from_str(&config_str).map_err(|e| msg_error_anyhow!(format!("{}: {}", Message::ConfigParseError, e)))?;
        msg_debug!(Message::ConfigLoaded);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self).map_err(|e| msg_error_anyhow!(format!("{}: {}", Message::ConfigSaveError, e)))
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_ms.filter(|&ms| ms > 0).map(Duration::from_millis)
    }

    /// Picks the database path by precedence: flag, environment, config, detection.
    pub fn resolve_db_path(&self, flag: Option<&Path>) -> Result<PathBuf> {
        let from_env = std::env::var_os(DB_ENV_VAR).map(PathBuf::from);
        self.resolve_db_path_from(flag, from_env, &data_storage::things_container())
    }

    fn resolve_db_path_from(&self, flag: Option<&Path>, from_env: Option<PathBuf>, container: &Path) -> Result<PathBuf> {
        if let Some(path) = flag {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = from_env.filter(|path| !path.as_os_str().is_empty()) {
            return Ok(path);
        }
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }
        let detected = data_storage::find_things_database(container).ok_or_else(|| msg_error_anyhow!(Message::DbNotFound))?;
        msg_debug!(Message::DbAutodetected(detected.display().to_string()));
        Ok(detected)
    }

    /// Interactive setup. Existing values are offered as defaults.
    pub fn init() -> Result<Self> {
        let current = Self::read().unwrap_or_default();
        let theme = ColorfulTheme::default();

        msg_print!(Message::ConfigModuleDatabase, true);
        let detected = data_storage::find_things_database(&data_storage::things_container());
        let use_detected = match &detected {
            Some(path) if current.db_path.is_none() => Confirm::with_theme(&theme)
                .with_prompt(Message::PromptUseDetectedDb(path.display().to_string()).to_string())
                .default(true)
                .interact()?,
            _ => false,
        };
        let db_path = if use_detected {
            None
        } else {
            let default = current
                .db_path
                .clone()
                .or(detected)
                .map(|path| path.display().to_string())
                .unwrap_or_default();
            let entered: String = Input::with_theme(&theme)
                .with_prompt(Message::PromptDbPath.to_string())
                .default(default)
                .allow_empty(true)
                .interact_text()?;
            let entered = entered.trim();
            if entered.is_empty() {
                None
            } else if Path::new(entered).is_file() {
                Some(PathBuf::from(entered))
            } else {
                msg_bail_anyhow!(Message::DbPathInvalid(entered.to_string()));
            }
        };

        msg_print!(Message::ConfigModuleQueries, true);
        let logbook_limit = Input::with_theme(&theme)
            .with_prompt(Message::PromptLogbookLimit.to_string())
            .default(current.logbook_limit)
            .validate_with(|value: &usize| if *value >= 1 { Ok(()) } else { Err("must be at least 1") })
            .interact_text()?;
        let deadline_days = Input::with_theme(&theme)
            .with_prompt(Message::PromptDeadlineDays.to_string())
            .default(current.deadline_days)
            .validate_with(|value: &i64| if *value >= 0 { Ok(()) } else { Err("must not be negative") })
            .interact_text()?;
        let timeout_ms: u64 = Input::with_theme(&theme)
            .with_prompt(Message::PromptQueryTimeout.to_string())
            .default(current.query_timeout_ms.unwrap_or(0))
            .interact_text()?;

        Ok(Config {
            db_path,
            logbook_limit,
            deadline_days,
            query_timeout_ms: Some(timeout_ms).filter(|&ms| ms > 0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn container_with_database() -> (tempfile::TempDir, PathBuf) {
        let container = tempdir().expect("tempdir");
        let db_dir = container.path().join("ThingsData-T3ST").join("Things Database.thingsdatabase");
        fs::create_dir_all(&db_dir).expect("create dirs");
        let db = db_dir.join("main.sqlite");
        fs::write(&db, b"").expect("write db");
        (container, db)
    }

    #[test]
    fn flag_wins_over_everything() {
        let (container, _) = container_with_database();
        let config = Config {
            db_path: Some(PathBuf::from("/from/config.sqlite")),
            ..Config::default()
        };
        let path = config
            .resolve_db_path_from(Some(Path::new("/from/flag.sqlite")), Some(PathBuf::from("/from/env.sqlite")), container.path())
            .expect("resolved");
        assert_eq!(path, PathBuf::from("/from/flag.sqlite"));
    }

    #[test]
    fn environment_wins_over_config() {
        let (container, _) = container_with_database();
        let config = Config {
            db_path: Some(PathBuf::from("/from/config.sqlite")),
            ..Config::default()
        };
        let path = config
            .resolve_db_path_from(None, Some(PathBuf::from("/from/env.sqlite")), container.path())
            .expect("resolved");
        assert_eq!(path, PathBuf::from("/from/env.sqlite"));
    }

    #[test]
    fn empty_environment_is_ignored() {
        let (container, _) = container_with_database();
        let config = Config {
            db_path: Some(PathBuf::from("/from/config.sqlite")),
            ..Config::default()
        };
        let path = config.resolve_db_path_from(None, Some(PathBuf::new()), container.path()).expect("resolved");
        assert_eq!(path, PathBuf::from("/from/config.sqlite"));
    }

    #[test]
    fn falls_back_to_detection() {
        let (container, db) = container_with_database();
        let path = Config::default().resolve_db_path_from(None, None, container.path()).expect("resolved");
        assert_eq!(path, db);
    }

    #[test]
    fn nothing_found_is_an_error() {
        let container = tempdir().expect("tempdir");
        let err = Config::default().resolve_db_path_from(None, None, container.path()).unwrap_err();
        assert!(err.to_string().contains("Things database not found"));
    }

    #[test]
    fn zero_timeout_disables_limit() {
        let mut config = Config::default();
        assert_eq!(config.query_timeout(), None);
        config.query_timeout_ms = Some(0);
        assert_eq!(config.query_timeout(), None);
        config.query_timeout_ms = Some(250);
        assert_eq!(config.query_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"logbook_limit": 10}"#).expect("parse");
        assert_eq!(config.logbook_limit, 10);
        assert_eq!(config.deadline_days, DEFAULT_DEADLINE_DAYS);
        assert_eq!(config.db_path, None);
    }
}
