use super::session::Session;
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_info, msg_print};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TagsArgs {
    #[command(subcommand)]
    command: TagsCommand,
}

#[derive(Debug, Subcommand)]
enum TagsCommand {
    #[command(about = "List tags with open task counts")]
    List,
    #[command(about = "Tasks carrying a tag")]
    Tasks {
        #[arg(help = "Tag title, identifier or identifier prefix")]
        tag: String,
        #[arg(long, help = "Include completed and canceled tasks")]
        all: bool,
    },
}

pub async fn cmd(session: &Session, args: TagsArgs) -> Result<()> {
    match args.command {
        TagsCommand::List => handle_list(session).await,
        TagsCommand::Tasks { tag, all } => handle_tasks(session, tag, all).await,
    }
}

async fn handle_list(session: &Session) -> Result<()> {
    let tags = session.run(|as_of| as_of.list_tags()).await?;

    session.emit(&tags, |tags| {
        if tags.is_empty() {
            msg_info!(Message::NoTagsFound);
            return Ok(());
        }
        msg_print!(Message::TagsHeader(tags.len()), true);
        View::tags(tags)
    })
}

async fn handle_tasks(session: &Session, tag: String, all: bool) -> Result<()> {
    let (title, tasks) = session
        .run(move |as_of| {
            let summary = as_of.get_tag(&tag)?;
            let tasks = as_of.list_tag_tasks(&summary.uuid, all)?;
            Ok((summary.title, tasks))
        })
        .await?;

    session.show_tasks(Message::TagTasksHeader(title.clone(), tasks.len()), Message::NoTasksInList(title), &tasks)
}
