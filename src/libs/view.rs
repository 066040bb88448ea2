use super::messages::Message;
use super::task::{AreaSummary, ClassifiedTask, HeadingSummary, ProjectSummary, TagSummary};
use crate::msg_error_anyhow;
use anyhow::Result;
use prettytable::{row, Table};
use serde::Serialize;

pub struct View {}

impl View {
    pub fn tasks(tasks: &[ClassifiedTask]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["", "ID", "TITLE", "WHERE", "WHEN", "DEADLINE", "TAGS"]);
        for task in tasks {
            let record = &task.record;
            table.add_row(row![
                record.status.icon(),
                task.short_id(),
                record.title,
                location(task),
                optional(record.scheduled),
                optional(record.deadline),
                record.tags.join(", ")
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn task_details(task: &ClassifiedTask) -> Result<()> {
        let record = &task.record;
        let mut table = Table::new();

        table.add_row(row!["ID", record.uuid]);
        table.add_row(row!["TYPE", record.kind()]);
        table.add_row(row!["STATUS", record.status]);
        table.add_row(row!["LIST", task.list.map(|list| list.to_string()).unwrap_or_default()]);
        table.add_row(row!["WHERE", location(task)]);
        table.add_row(row!["WHEN", optional(record.scheduled)]);
        table.add_row(row!["DEADLINE", optional(record.deadline)]);
        table.add_row(row!["REPEATING", if task.is_repeating { "yes" } else { "no" }]);
        table.add_row(row!["CREATED", optional(record.created.map(|at| at.format("%Y-%m-%d %H:%M")))]);
        table.add_row(row!["MODIFIED", optional(record.modified.map(|at| at.format("%Y-%m-%d %H:%M")))]);
        if let Some(completed) = record.completed {
            table.add_row(row!["CLOSED", completed.format("%Y-%m-%d %H:%M")]);
        }
        table.add_row(row!["TAGS", record.tags.join(", ")]);
        table.printstd();

        Ok(())
    }

    pub fn areas(areas: &[AreaSummary]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "AREA", "OPEN TASKS", "ACTIVE PROJECTS"]);
        for area in areas {
            table.add_row(row![super::task::short_id(&area.uuid), area.title, area.open_tasks, area.active_projects]);
        }
        table.printstd();

        Ok(())
    }

    pub fn projects(projects: &[ProjectSummary]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["", "ID", "PROJECT", "AREA", "DEADLINE", "PROGRESS"]);
        for project in projects {
            let done = project.total_tasks.saturating_sub(project.open_tasks);
            table.add_row(row![
                project.status.icon(),
                super::task::short_id(&project.uuid),
                project.title,
                project.area_name.as_deref().unwrap_or(""),
                optional(project.deadline),
                format!("{}/{}", done, project.total_tasks)
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn headings(headings: &[HeadingSummary]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["HEADING", "OPEN TASKS"]);
        for heading in headings {
            table.add_row(row![heading.title, heading.open_tasks]);
        }
        table.printstd();

        Ok(())
    }

    pub fn tags(tags: &[TagSummary]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TAG", "SHORTCUT", "OPEN TASKS"]);
        for tag in tags {
            table.add_row(row![
                super::task::short_id(&tag.uuid),
                tag.title,
                tag.shortcut.as_deref().unwrap_or(""),
                tag.task_count
            ]);
        }
        table.printstd();

        Ok(())
    }

    /// Pretty JSON on stdout for `--json`.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
        let encoded = serde_json::to_string_pretty(value).map_err(|e| msg_error_anyhow!(Message::JsonEncodeFailed(e.to_string())))?;
        println!("{}", encoded);
        Ok(())
    }
}

/// "Area › Project › Heading", skipping missing levels.
fn location(task: &ClassifiedTask) -> String {
    [&task.area_name, &task.project_name, &task.heading_name]
        .into_iter()
        .filter_map(|name| name.as_deref())
        .collect::<Vec<_>>()
        .join(" › ")
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}
