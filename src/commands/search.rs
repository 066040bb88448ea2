use super::session::Session;
use crate::libs::messages::Message;
use crate::libs::query::SearchRequest;
use crate::libs::task::StatusFilter;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(help = "Text to look for in titles")]
    term: String,
    #[arg(long, help = "Also match notes")]
    notes: bool,
    #[arg(long, help = "Include future instances of repeating tasks")]
    include_future: bool,
    #[arg(long, default_value = "all", help = "all, incomplete, completed or canceled")]
    status: StatusFilter,
}

pub async fn cmd(session: &Session, args: SearchArgs) -> Result<()> {
    let term = args.term.clone();
    let request = SearchRequest {
        include_notes: args.notes,
        include_future: args.include_future,
        status: args.status,
        ..SearchRequest::new(args.term)
    };
    let tasks = session.run(move |as_of| as_of.search(&request)).await?;

    session.show_tasks(Message::SearchResultsHeader(term, tasks.len()), Message::NoTasksFound, &tasks)
}
