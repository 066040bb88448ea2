//! Display implementation for thingsview messages.
//!
//! All user-facing text lives here, so the command modules only choose which
//! [`Message`] to show and never format prose themselves.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === LIST MESSAGES ===
            Message::ListHeader(list, count) => format!("📋 {} ({})", list, count),
            Message::LogbookHeader(count) => format!("📗 Logbook ({})", count),
            Message::DeadlinesHeader(days, count) => format!("⏰ Deadlines within {} days ({})", days, count),
            Message::SearchResultsHeader(term, count) => format!("🔍 Results for '{}' ({})", term, count),
            Message::NoTasksFound => "No tasks found".to_string(),
            Message::NoTasksInList(list) => format!("{} is empty", list),

            // === TASK MESSAGES ===
            Message::TaskDetailsHeader(title) => format!("📝 {}", title),
            Message::TaskNotes => "Notes:".to_string(),
            Message::TaskTags(tags) => format!("Tags: {}", tags),

            // === AREA MESSAGES ===
            Message::AreasHeader(count) => format!("🗂  Areas ({})", count),
            Message::AreaHeader(title) => format!("🗂  {}", title),
            Message::AreaProjectsHeader(count) => format!("Projects ({})", count),
            Message::AreaTasksHeader(count) => format!("Tasks ({})", count),
            Message::NoAreasFound => "No areas found".to_string(),

            // === PROJECT MESSAGES ===
            Message::ProjectsHeader(count) => format!("📁 Projects ({})", count),
            Message::ProjectHeader(title) => format!("📁 {}", title),
            Message::ProjectHeadingsHeader(count) => format!("Headings ({})", count),
            Message::ProjectTasksHeader(count) => format!("Tasks ({})", count),
            Message::NoProjectsFound => "No projects found".to_string(),

            // === TAG MESSAGES ===
            Message::TagsHeader(count) => format!("🏷  Tags ({})", count),
            Message::TagTasksHeader(title, count) => format!("🏷  {} ({})", title, count),
            Message::NoTagsFound => "No tags found".to_string(),

            // === SNAPSHOT MESSAGES ===
            Message::SnapshotAreaHeader(title, open, active) => {
                format!("🗂  {} ({} open tasks, {} active projects)", title, open, active)
            }
            Message::SnapshotUnfiledHeader => "📁 Projects without an area".to_string(),

            // === DATABASE MESSAGES ===
            Message::DbOpened(path) => format!("Opened Things database at {}", path),
            Message::DbAreasWithoutTrash => "Areas table has no trash column; every area is treated as live".to_string(),
            Message::DbAutodetected(path) => format!("Found Things database: {}", path),
            Message::DbNotFound => {
                "Things database not found. Pass --db, set THINGSVIEW_DB or run 'thingsview init'".to_string()
            }
            Message::DbPathInvalid(path) => format!("No database file at {}", path),
            Message::DbOpenFailed(error) => format!("Failed to open the Things database: {}", error),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigLoaded => "Configuration loaded".to_string(),
            Message::ConfigParseError => "Failed to parse configuration file".to_string(),
            Message::ConfigSaveError => "Failed to save configuration".to_string(),
            Message::ConfigModuleDatabase => "Database location".to_string(),
            Message::ConfigModuleQueries => "Query defaults".to_string(),
            Message::ConfigCurrent(path) => format!("Configuration file: {}", path),

            // === PROMPTS ===
            Message::PromptDbPath => "Path to the Things main.sqlite".to_string(),
            Message::PromptUseDetectedDb(path) => format!("Use the detected database {}?", path),
            Message::PromptLogbookLimit => "Default logbook length".to_string(),
            Message::PromptDeadlineDays => "Default deadline window in days".to_string(),
            Message::PromptQueryTimeout => "Query timeout in milliseconds (0 for none)".to_string(),

            // === ERRORS ===
            Message::QueryFailed(error) => format!("Query failed: {}", error),
            Message::JsonEncodeFailed(error) => format!("Failed to encode JSON output: {}", error),
            Message::Interrupted => "Interrupted, canceling the running query".to_string(),
        };
        write!(f, "{}", text)
    }
}
