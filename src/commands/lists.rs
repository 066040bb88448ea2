//! The host's virtual lists: inbox, today, anytime, upcoming, someday,
//! logbook, plus the deadline window.

use super::session::Session;
use crate::libs::messages::Message;
use crate::libs::task::VirtualList;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct LogbookArgs {
    #[arg(short = 'n', long, help = "Number of closed tasks to show")]
    limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct DeadlinesArgs {
    #[arg(long, help = "Days ahead of today to include")]
    days: Option<i64>,
}

pub async fn cmd(session: &Session, list: VirtualList) -> Result<()> {
    let tasks = match list {
        VirtualList::Inbox => session.run(|as_of| as_of.list_inbox()).await?,
        VirtualList::Today => session.run(|as_of| as_of.list_today()).await?,
        VirtualList::Anytime => session.run(|as_of| as_of.list_anytime()).await?,
        VirtualList::Upcoming => session.run(|as_of| as_of.list_upcoming()).await?,
        VirtualList::Someday => session.run(|as_of| as_of.list_someday()).await?,
        VirtualList::Logbook => return logbook(session, LogbookArgs { limit: None }).await,
    };

    session.show_tasks(
        Message::ListHeader(list.to_string(), tasks.len()),
        Message::NoTasksInList(list.to_string()),
        &tasks,
    )
}

pub async fn logbook(session: &Session, args: LogbookArgs) -> Result<()> {
    let limit = args.limit.unwrap_or(session.config.logbook_limit);
    let tasks = session.run(move |as_of| as_of.list_logbook(limit)).await?;

    session.show_tasks(
        Message::LogbookHeader(tasks.len()),
        Message::NoTasksInList(VirtualList::Logbook.to_string()),
        &tasks,
    )
}

pub async fn deadlines(session: &Session, args: DeadlinesArgs) -> Result<()> {
    let days = args.days.unwrap_or(session.config.deadline_days);
    let tasks = session.run(move |as_of| as_of.list_deadlines(days)).await?;

    session.show_tasks(Message::DeadlinesHeader(days, tasks.len()), Message::NoTasksFound, &tasks)
}
