use super::session::Session;
use crate::libs::messages::Message;
use crate::libs::query::TaskQuery;
use crate::libs::task::StatusFilter;
use crate::libs::view::View;
use crate::msg_print;
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TasksArgs {
    #[command(subcommand)]
    command: TasksCommand,
}

#[derive(Debug, Subcommand)]
enum TasksCommand {
    #[command(about = "List tasks matching filters")]
    List {
        #[arg(long, default_value = "incomplete", help = "all, incomplete, completed or canceled")]
        status: StatusFilter,
        #[arg(long, help = "Area title contains")]
        area: Option<String>,
        #[arg(long, help = "Project title contains")]
        project: Option<String>,
        #[arg(long, help = "A tag title contains")]
        tag: Option<String>,
        #[arg(long, help = "Only tasks in Today")]
        today: bool,
        #[arg(long, help = "Include future instances of repeating tasks")]
        include_future: bool,
    },
    #[command(about = "Show one task, project or heading")]
    Show {
        #[arg(help = "Full identifier or unique prefix")]
        id: String,
    },
}

pub async fn cmd(session: &Session, args: TasksArgs) -> Result<()> {
    match args.command {
        TasksCommand::List {
            status,
            area,
            project,
            tag,
            today,
            include_future,
        } => {
            let query = TaskQuery {
                status,
                area,
                project,
                tag,
                today,
                include_future,
            };
            let tasks = session.run(move |as_of| as_of.list_tasks(&query)).await?;
            session.show_tasks(Message::ListHeader("Tasks".to_string(), tasks.len()), Message::NoTasksFound, &tasks)
        }
        TasksCommand::Show { id } => {
            let task = session
                .run(move |as_of| {
                    let uuid = as_of.resolve_task_prefix(&id)?;
                    as_of.get_task(&uuid)
                })
                .await?;

            session.emit(&task, |task| {
                msg_print!(Message::TaskDetailsHeader(task.record.title.clone()), true);
                View::task_details(task)?;
                if !task.record.tags.is_empty() {
                    msg_print!(Message::TaskTags(task.record.tags.join(", ")));
                }
                if let Some(notes) = task.record.notes.as_deref() {
                    msg_print!(Message::TaskNotes, true);
                    msg_print!(notes);
                }
                Ok(())
            })
        }
    }
}
