//! Read-only data model over the Things store.
//!
//! Tasks, projects and headings share one table (`TMTask`) discriminated by a
//! `type` code. Here the discriminant is a [`Placement`] enum carrying only the
//! parent references that make sense for each kind, so callers never rely on
//! nullable columns to work out what a record is.

use super::error::{EngineError, EngineResult};
use super::packed_date::PackedDate;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Incomplete,
    Canceled,
    Completed,
}

impl TaskStatus {
    pub fn from_code(code: i64) -> EngineResult<Self> {
        match code {
            0 => Ok(TaskStatus::Incomplete),
            2 => Ok(TaskStatus::Canceled),
            3 => Ok(TaskStatus::Completed),
            other => Err(EngineError::DataIntegrity(format!("unknown status code {}", other))),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            TaskStatus::Incomplete => 0,
            TaskStatus::Canceled => 2,
            TaskStatus::Completed => 3,
        }
    }

    pub fn is_closed(self) -> bool {
        matches!(self, TaskStatus::Canceled | TaskStatus::Completed)
    }

    pub fn icon(self) -> &'static str {
        match self {
            TaskStatus::Incomplete => "○",
            TaskStatus::Completed => "✓",
            TaskStatus::Canceled => "✗",
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TaskStatus::Incomplete => "incomplete",
            TaskStatus::Canceled => "canceled",
            TaskStatus::Completed => "completed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Task,
    Project,
    Heading,
}

impl TaskKind {
    pub fn code(self) -> i64 {
        match self {
            TaskKind::Task => 0,
            TaskKind::Project => 1,
            TaskKind::Heading => 2,
        }
    }

    /// Search ordering: projects, then headings, then tasks.
    pub fn search_rank(self) -> u8 {
        match self {
            TaskKind::Project => 0,
            TaskKind::Heading => 1,
            TaskKind::Task => 2,
        }
    }
}

impl Display for TaskKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TaskKind::Task => "Task",
            TaskKind::Project => "Project",
            TaskKind::Heading => "Heading",
        };
        f.write_str(name)
    }
}

/// The `start` column: where the user filed the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StartBucket {
    Inbox,
    Anytime,
    Someday,
}

impl StartBucket {
    pub fn from_code(code: i64) -> EngineResult<Self> {
        match code {
            0 => Ok(StartBucket::Inbox),
            1 => Ok(StartBucket::Anytime),
            2 => Ok(StartBucket::Someday),
            other => Err(EngineError::DataIntegrity(format!("unknown start code {}", other))),
        }
    }
}

/// Parent references, discriminated by record kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Placement {
    Task {
        area: Option<String>,
        project: Option<String>,
        heading: Option<String>,
    },
    Project {
        area: Option<String>,
    },
    Heading {
        project: Option<String>,
    },
}

impl Placement {
    /// Builds the placement for a raw `type` code and its parent columns.
    pub fn from_columns(kind_code: i64, area: Option<String>, project: Option<String>, heading: Option<String>) -> EngineResult<Self> {
        match kind_code {
            0 => Ok(Placement::Task { area, project, heading }),
            1 => Ok(Placement::Project { area }),
            2 => Ok(Placement::Heading { project }),
            other => Err(EngineError::DataIntegrity(format!("unknown record type {}", other))),
        }
    }

    pub fn kind(&self) -> TaskKind {
        match self {
            Placement::Task { .. } => TaskKind::Task,
            Placement::Project { .. } => TaskKind::Project,
            Placement::Heading { .. } => TaskKind::Heading,
        }
    }

    /// Direct area. Headings never carry one.
    pub fn area(&self) -> Option<&str> {
        match self {
            Placement::Task { area, .. } | Placement::Project { area } => area.as_deref(),
            Placement::Heading { .. } => None,
        }
    }

    /// Assigned project. Projects never have one.
    pub fn project(&self) -> Option<&str> {
        match self {
            Placement::Task { project, .. } | Placement::Heading { project } => project.as_deref(),
            Placement::Project { .. } => None,
        }
    }

    /// Parent heading. Only tasks can sit under a heading.
    pub fn heading(&self) -> Option<&str> {
        match self {
            Placement::Task { heading, .. } => heading.as_deref(),
            _ => None,
        }
    }
}

/// One decoded `TMTask` row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRecord {
    pub uuid: String,
    pub title: String,
    pub notes: Option<String>,
    pub status: TaskStatus,
    pub start: StartBucket,
    #[serde(flatten)]
    pub placement: Placement,
    pub scheduled: Option<PackedDate>,
    pub deadline: Option<PackedDate>,
    #[serde(skip)]
    pub deadline_suppressed: bool,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub completed: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub trashed: bool,
    #[serde(skip)]
    pub repeating_template: Option<String>,
    pub today_index: Option<f64>,
    pub index: i64,
    pub tags: Vec<String>,
}

impl TaskRecord {
    pub fn kind(&self) -> TaskKind {
        self.placement.kind()
    }

    pub fn is_repeating(&self) -> bool {
        self.repeating_template.is_some()
    }
}

/// One `TMArea` row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaRecord {
    pub uuid: String,
    pub title: String,
    pub visible: bool,
    pub index: i64,
    #[serde(skip)]
    pub trashed: bool,
}

/// One `TMTag` row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagRecord {
    pub uuid: String,
    pub title: String,
    pub shortcut: Option<String>,
}

/// The virtual lists the host shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VirtualList {
    Inbox,
    Today,
    Upcoming,
    Someday,
    Anytime,
    Logbook,
}

impl Display for VirtualList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            VirtualList::Inbox => "Inbox",
            VirtualList::Today => "Today",
            VirtualList::Upcoming => "Upcoming",
            VirtualList::Someday => "Someday",
            VirtualList::Anytime => "Anytime",
            VirtualList::Logbook => "Logbook",
        };
        f.write_str(name)
    }
}

/// A record enriched with resolved ancestry names and its virtual list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedTask {
    #[serde(flatten)]
    pub record: TaskRecord,
    pub area_id: Option<String>,
    pub area_name: Option<String>,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub heading_id: Option<String>,
    pub heading_name: Option<String>,
    pub list: Option<VirtualList>,
    pub is_repeating: bool,
}

impl ClassifiedTask {
    pub fn short_id(&self) -> &str {
        short_id(&self.record.uuid)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaSummary {
    pub uuid: String,
    pub title: String,
    pub visible: bool,
    pub open_tasks: usize,
    pub active_projects: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSummary {
    pub uuid: String,
    pub title: String,
    pub notes: Option<String>,
    pub status: TaskStatus,
    pub area_name: Option<String>,
    pub deadline: Option<PackedDate>,
    pub open_tasks: usize,
    pub total_tasks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagSummary {
    pub uuid: String,
    pub title: String,
    pub shortcut: Option<String>,
    pub task_count: usize,
}

/// The heading a group of project tasks sits under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingSummary {
    pub uuid: String,
    pub title: String,
    pub index: i64,
    pub open_tasks: usize,
}

/// Status filter for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    All,
    #[default]
    Incomplete,
    Completed,
    Canceled,
}

impl StatusFilter {
    pub fn matches(self, status: TaskStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Incomplete => status == TaskStatus::Incomplete,
            StatusFilter::Completed => status == TaskStatus::Completed,
            StatusFilter::Canceled => status == TaskStatus::Canceled,
        }
    }

    /// The status code to push down into SQL, if any.
    pub fn code(self) -> Option<i64> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Incomplete => Some(TaskStatus::Incomplete.code()),
            StatusFilter::Completed => Some(TaskStatus::Completed.code()),
            StatusFilter::Canceled => Some(TaskStatus::Canceled.code()),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "" | "incomplete" => Ok(StatusFilter::Incomplete),
            "completed" => Ok(StatusFilter::Completed),
            "canceled" | "cancelled" => Ok(StatusFilter::Canceled),
            other => Err(EngineError::InvalidArgument(format!(
                "unknown status filter '{}' (expected all, incomplete, completed or canceled)",
                other
            ))),
        }
    }
}

/// First eight characters of an identifier, as shown in listings.
pub fn short_id(uuid: &str) -> &str {
    uuid.get(..8).unwrap_or(uuid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_accessors_are_guarded_by_kind() {
        let heading = Placement::from_columns(2, Some("area".into()), Some("proj".into()), Some("h".into())).unwrap();
        assert_eq!(heading.kind(), TaskKind::Heading);
        assert_eq!(heading.area(), None);
        assert_eq!(heading.project(), Some("proj"));
        assert_eq!(heading.heading(), None);

        let project = Placement::from_columns(1, Some("area".into()), Some("other".into()), None).unwrap();
        assert_eq!(project.area(), Some("area"));
        assert_eq!(project.project(), None);
    }

    #[test]
    fn unknown_codes_are_integrity_errors() {
        assert!(TaskStatus::from_code(1).is_err());
        assert!(StartBucket::from_code(7).is_err());
        assert!(Placement::from_columns(5, None, None, None).is_err());
    }

    #[test]
    fn status_filter_parses_and_defaults_to_incomplete() {
        assert_eq!(StatusFilter::default(), StatusFilter::Incomplete);
        assert_eq!("ALL".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!("canceled".parse::<StatusFilter>().unwrap(), StatusFilter::Canceled);
        assert!("done".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn short_id_truncates() {
        assert_eq!(short_id("ABCDEF12-0000-0000-0000-000000000000"), "ABCDEF12");
        assert_eq!(short_id("abc"), "abc");
    }
}
