use super::session::Session;
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_info, msg_print};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct AreasArgs {
    #[command(subcommand)]
    command: AreasCommand,
}

#[derive(Debug, Subcommand)]
enum AreasCommand {
    #[command(about = "List visible areas")]
    List,
    #[command(about = "Show an area with its projects and tasks")]
    Show {
        #[arg(help = "Area title, identifier or identifier prefix")]
        area: String,
        #[arg(long, help = "Include completed and canceled items")]
        all: bool,
    },
}

pub async fn cmd(session: &Session, args: AreasArgs) -> Result<()> {
    match args.command {
        AreasCommand::List => {
            let areas = session.run(|as_of| as_of.list_areas()).await?;
            session.emit(&areas, |areas| {
                if areas.is_empty() {
                    msg_info!(Message::NoAreasFound);
                    return Ok(());
                }
                msg_print!(Message::AreasHeader(areas.len()), true);
                View::areas(areas)
            })
        }
        AreasCommand::Show { area, all } => {
            let details = session.run(move |as_of| as_of.area_details(&area, all)).await?;

            session.emit(&details, |details| {
                msg_print!(Message::AreaHeader(details.area.title.clone()), true);
                msg_print!(Message::AreaProjectsHeader(details.projects.len()));
                if !details.projects.is_empty() {
                    View::projects(&details.projects)?;
                }
                msg_print!(Message::AreaTasksHeader(details.tasks.len()), true);
                if !details.tasks.is_empty() {
                    View::tasks(&details.tasks)?;
                }
                Ok(())
            })
        }
    }
}
