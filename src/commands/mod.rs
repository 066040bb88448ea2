//! Command-line surface of thingsview.
//!
//! Every read command opens one [`Session`](session::Session), runs a single
//! engine operation on the blocking pool and renders the result either as a
//! table or, with `--json`, as pretty JSON.

pub mod areas;
pub mod init;
pub mod lists;
pub mod projects;
pub mod search;
pub mod session;
pub mod snapshot;
pub mod tags;
pub mod tasks;

use crate::libs::task::VirtualList;
use anyhow::Result;
use clap::{Parser, Subcommand};
use session::{GlobalArgs, Session};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configure the database location and defaults")]
    Init(init::InitArgs),
    #[command(about = "Tasks not yet filed")]
    Inbox,
    #[command(about = "Tasks to do today")]
    Today,
    #[command(about = "Open tasks with no particular date")]
    Anytime,
    #[command(about = "Tasks scheduled for a future date")]
    Upcoming,
    #[command(about = "Tasks put off for later")]
    Someday,
    #[command(about = "Recently completed and canceled tasks")]
    Logbook(lists::LogbookArgs),
    #[command(about = "Open tasks with a deadline coming up")]
    Deadlines(lists::DeadlinesArgs),
    #[command(about = "Search titles and notes")]
    Search(search::SearchArgs),
    #[command(about = "List or show tasks")]
    Tasks(tasks::TasksArgs),
    #[command(about = "List or show areas")]
    Areas(areas::AreasArgs),
    #[command(about = "List or show projects")]
    Projects(projects::ProjectsArgs),
    #[command(about = "List tags or their tasks")]
    Tags(tags::TagsArgs),
    #[command(about = "Everything open, grouped by list, area and project")]
    Snapshot,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        let open = || Session::open(&cli.global);

        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Inbox => lists::cmd(&open()?, VirtualList::Inbox).await,
            Commands::Today => lists::cmd(&open()?, VirtualList::Today).await,
            Commands::Anytime => lists::cmd(&open()?, VirtualList::Anytime).await,
            Commands::Upcoming => lists::cmd(&open()?, VirtualList::Upcoming).await,
            Commands::Someday => lists::cmd(&open()?, VirtualList::Someday).await,
            Commands::Logbook(args) => lists::logbook(&open()?, args).await,
            Commands::Deadlines(args) => lists::deadlines(&open()?, args).await,
            Commands::Search(args) => search::cmd(&open()?, args).await,
            Commands::Tasks(args) => tasks::cmd(&open()?, args).await,
            Commands::Areas(args) => areas::cmd(&open()?, args).await,
            Commands::Projects(args) => projects::cmd(&open()?, args).await,
            Commands::Tags(args) => tags::cmd(&open()?, args).await,
            Commands::Snapshot => snapshot::cmd(&open()?).await,
        }
    }
}
