use super::session::Session;
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_info, msg_print};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ProjectsArgs {
    #[command(subcommand)]
    command: ProjectsCommand,
}

#[derive(Debug, Subcommand)]
enum ProjectsCommand {
    #[command(about = "List projects")]
    List {
        #[arg(long, help = "Include completed and canceled projects")]
        all: bool,
    },
    #[command(about = "Show a project with its headings and tasks")]
    Show {
        #[arg(help = "Project title, identifier or identifier prefix")]
        project: String,
        #[arg(long, help = "Include completed and canceled tasks")]
        all: bool,
    },
}

pub async fn cmd(session: &Session, args: ProjectsArgs) -> Result<()> {
    match args.command {
        ProjectsCommand::List { all } => {
            let projects = session.run(move |as_of| as_of.list_projects(all)).await?;
            session.emit(&projects, |projects| {
                if projects.is_empty() {
                    msg_info!(Message::NoProjectsFound);
                    return Ok(());
                }
                msg_print!(Message::ProjectsHeader(projects.len()), true);
                View::projects(projects)
            })
        }
        ProjectsCommand::Show { project, all } => {
            let details = session.run(move |as_of| as_of.project_details(&project, all)).await?;

            session.emit(&details, |details| {
                msg_print!(Message::ProjectHeader(details.project.title.clone()), true);
                if let Some(notes) = details.project.notes.as_deref() {
                    msg_print!(notes);
                }
                if !details.headings.is_empty() {
                    msg_print!(Message::ProjectHeadingsHeader(details.headings.len()), true);
                    View::headings(&details.headings)?;
                }
                msg_print!(Message::ProjectTasksHeader(details.tasks.len()), true);
                if !details.tasks.is_empty() {
                    View::tasks(&details.tasks)?;
                }
                Ok(())
            })
        }
    }
}
