use super::session::Session;
use crate::db::engine::{Overview, ProjectOutline};
use crate::libs::messages::Message;
use crate::libs::task::VirtualList;
use crate::libs::view::View;
use crate::msg_print;
use anyhow::Result;

pub async fn cmd(session: &Session) -> Result<()> {
    let overview = session.run(|as_of| as_of.snapshot()).await?;
    session.emit(&overview, render)
}

fn render(overview: &Overview) -> Result<()> {
    for (list, tasks) in [
        (VirtualList::Today, &overview.today),
        (VirtualList::Inbox, &overview.inbox),
        (VirtualList::Upcoming, &overview.upcoming),
        (VirtualList::Someday, &overview.someday),
    ] {
        msg_print!(Message::ListHeader(list.to_string(), tasks.len()), true);
        if !tasks.is_empty() {
            View::tasks(tasks)?;
        }
    }

    for outline in &overview.areas {
        let area = &outline.area;
        msg_print!(Message::SnapshotAreaHeader(area.title.clone(), area.open_tasks, area.active_projects), true);
        if !outline.tasks.is_empty() {
            View::tasks(&outline.tasks)?;
        }
        render_projects(&outline.projects)?;
    }

    if !overview.unfiled_projects.is_empty() {
        msg_print!(Message::SnapshotUnfiledHeader, true);
        render_projects(&overview.unfiled_projects)?;
    }
    Ok(())
}

fn render_projects(projects: &[ProjectOutline]) -> Result<()> {
    for outline in projects {
        msg_print!(Message::ProjectHeader(outline.project.title.clone()));
        if !outline.tasks.is_empty() {
            View::tasks(&outline.tasks)?;
        }
    }
    Ok(())
}
