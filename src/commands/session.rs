use crate::db::db::{CancelToken, QueryOptions, Store};
use crate::db::engine::{AsOf, Engine};
use crate::libs::config::Config;
use crate::libs::error::EngineResult;
use crate::libs::messages::Message;
use crate::libs::packed_date::PackedDate;
use crate::libs::task::ClassifiedTask;
use crate::libs::view::View;
use crate::{msg_debug, msg_error_anyhow, msg_info, msg_print, msg_warning};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Flags accepted by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    #[arg(long, global = true, help = "Path to the Things main.sqlite")]
    pub db: Option<PathBuf>,
    #[arg(long, global = true, help = "Print JSON instead of tables")]
    pub json: bool,
    #[arg(long, global = true, help = "Abort a query after this many milliseconds (0 disables)")]
    pub timeout_ms: Option<u64>,
}

/// An opened database plus the settings a command renders with.
pub struct Session {
    engine: Engine,
    today: PackedDate,
    pub config: Config,
    pub json: bool,
}

impl Session {
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let config = Config::read()?;
        let path = config.resolve_db_path(global.db.as_deref())?;
        let store = Store::open(&path).map_err(|e| msg_error_anyhow!(Message::DbOpenFailed(e.to_string())))?;
        msg_debug!(Message::DbOpened(store.path().display().to_string()));
        if !store.schema().area_trashed {
            msg_debug!(Message::DbAreasWithoutTrash);
        }

        let mut options = QueryOptions::default().with_cancel(cancel_on_interrupt());
        let timeout = match global.timeout_ms {
            Some(ms) => Some(ms).filter(|&ms| ms > 0).map(Duration::from_millis),
            None => config.query_timeout(),
        };
        if let Some(timeout) = timeout {
            options = options.with_timeout(timeout);
        }

        Ok(Session {
            engine: Engine::new(store).with_options(options),
            today: PackedDate::today()?,
            config,
            json: global.json,
        })
    }

    /// Runs one engine operation off the async runtime.
    pub async fn run<T, F>(&self, operation: F) -> Result<T>
    where
        F: FnOnce(AsOf<'_>) -> EngineResult<T> + Send + 'static,
        T: Send + 'static,
    {
        self.engine
            .run_blocking(self.today, operation)
            .await
            .map_err(|e| msg_error_anyhow!(Message::QueryFailed(e.to_string())))
    }

    /// Prints `value` as JSON, or hands it to `render` for a table.
    pub fn emit<T: Serialize + ?Sized>(&self, value: &T, render: impl FnOnce(&T) -> Result<()>) -> Result<()> {
        if self.json {
            View::json(value)
        } else {
            render(value)
        }
    }

    /// Header and task table, or an "empty" note when there is nothing to show.
    pub fn show_tasks(&self, header: Message, empty: Message, tasks: &[ClassifiedTask]) -> Result<()> {
        self.emit(tasks, |tasks| {
            if tasks.is_empty() {
                msg_info!(empty);
                return Ok(());
            }
            msg_print!(header, true);
            View::tasks(tasks)
        })
    }
}

/// A token that trips on Ctrl-C so the running query stops at its next progress check.
fn cancel_on_interrupt() -> CancelToken {
    let token = CancelToken::new();
    let watch = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            msg_warning!(Message::Interrupted);
            watch.cancel();
        }
    });
    token
}
