//! Query operations over one store.
//!
//! Every operation runs inside a single read transaction: rows, the ancestor
//! snapshot and any name resolution all come from the same consistent view.
//! "Today" is fixed by [`Engine::as_of`] and never read from the clock here.

use crate::db::areas::Areas;
use crate::db::db::{QueryOptions, Snapshot, Store};
use crate::db::tags::Tags;
use crate::db::tasks::{TaskFilter, Tasks};
use crate::libs::error::{EngineError, EngineResult};
use crate::libs::hierarchy::{AreaTally, Hierarchy, ProjectTally};
use crate::libs::packed_date::PackedDate;
use crate::libs::query::{Composer, SearchRequest, SortOrder, TaskQuery};
use crate::libs::resolver::{self, RecordKind};
use crate::libs::task::{
    AreaRecord, AreaSummary, ClassifiedTask, HeadingSummary, ProjectSummary, StatusFilter, TagRecord, TagSummary, TaskKind, TaskRecord, TaskStatus,
    VirtualList,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

pub const DEFAULT_LOGBOOK_LIMIT: usize = 50;
pub const DEFAULT_DEADLINE_DAYS: i64 = 7;

/// Hierarchical view of everything open, read in one transaction.
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub today: Vec<ClassifiedTask>,
    pub inbox: Vec<ClassifiedTask>,
    pub upcoming: Vec<ClassifiedTask>,
    pub someday: Vec<ClassifiedTask>,
    pub areas: Vec<AreaOutline>,
    pub unfiled_projects: Vec<ProjectOutline>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AreaOutline {
    #[serde(flatten)]
    pub area: AreaSummary,
    pub projects: Vec<ProjectOutline>,
    pub tasks: Vec<ClassifiedTask>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectOutline {
    #[serde(flatten)]
    pub project: ProjectSummary,
    pub headings: Vec<HeadingSummary>,
    pub tasks: Vec<ClassifiedTask>,
}

/// An area with the projects and tasks filed directly in it.
#[derive(Debug, Clone, Serialize)]
pub struct AreaDetails {
    #[serde(flatten)]
    pub area: AreaSummary,
    pub projects: Vec<ProjectSummary>,
    pub tasks: Vec<ClassifiedTask>,
}

#[derive(Debug, Clone)]
pub struct Engine {
    store: Store,
    options: QueryOptions,
}

impl Engine {
    pub fn new(store: Store) -> Self {
        Engine {
            store,
            options: QueryOptions::default(),
        }
    }

    /// Default limits applied to every query of this engine.
    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn as_of(&self, today: PackedDate) -> AsOf<'_> {
        AsOf {
            engine: self,
            today,
            options: self.options.clone(),
        }
    }

    /// Runs an operation on tokio's blocking pool.
    pub async fn run_blocking<T, F>(&self, today: PackedDate, operation: F) -> EngineResult<T>
    where
        F: FnOnce(AsOf<'_>) -> EngineResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let engine = self.clone();
        tokio::task::spawn_blocking(move || operation(engine.as_of(today)))
            .await
            .map_err(|e| EngineError::StoreUnavailable(format!("query task join error: {e}")))?
    }
}

/// Areas, projects and headings of one snapshot.
struct Frame {
    areas: Vec<AreaRecord>,
    containers: Vec<TaskRecord>,
    hierarchy: Hierarchy,
}

impl Frame {
    fn load(snapshot: &Snapshot<'_>) -> EngineResult<Self> {
        let areas = Areas::new(snapshot.conn(), snapshot.schema()).list()?;
        let containers = Tasks::new(snapshot.conn()).containers()?;
        let hierarchy = Hierarchy::new(&areas, &containers);
        Ok(Frame { areas, containers, hierarchy })
    }

    fn live_area(&self, uuid: &str) -> Option<&AreaRecord> {
        self.areas.iter().find(|area| area.uuid == uuid && !area.trashed)
    }

    /// Projects not hidden by themselves or an ancestor, by `index`.
    fn live_projects(&self) -> Vec<&TaskRecord> {
        let mut projects: Vec<&TaskRecord> = self
            .containers
            .iter()
            .filter(|record| record.kind() == TaskKind::Project && !self.hierarchy.ancestry(record).hidden)
            .collect();
        projects.sort_by_key(|record| record.index);
        projects
    }

    fn live_headings(&self, project: &str) -> Vec<&TaskRecord> {
        let mut headings: Vec<&TaskRecord> = self
            .containers
            .iter()
            .filter(|record| record.kind() == TaskKind::Heading && record.placement.project() == Some(project))
            .filter(|record| !self.hierarchy.ancestry(record).hidden)
            .collect();
        headings.sort_by_key(|record| record.index);
        headings
    }

    fn area_summary(&self, area: &AreaRecord, tallies: &HashMap<String, AreaTally>) -> AreaSummary {
        let tally = tallies.get(&area.uuid).copied().unwrap_or_default();
        AreaSummary {
            uuid: area.uuid.clone(),
            title: area.title.clone(),
            visible: area.visible,
            open_tasks: tally.open_tasks,
            active_projects: tally.active_projects,
        }
    }

    fn project_summary(&self, project: &TaskRecord, tallies: &HashMap<String, ProjectTally>) -> ProjectSummary {
        let tally = tallies.get(&project.uuid).copied().unwrap_or_default();
        ProjectSummary {
            uuid: project.uuid.clone(),
            title: project.title.clone(),
            notes: project.notes.clone(),
            status: project.status,
            area_name: self.hierarchy.ancestry(project).area.map(|area| area.title),
            deadline: project.deadline,
            open_tasks: tally.open_tasks,
            total_tasks: tally.total_tasks,
        }
    }
}

fn heading_summary(heading: &TaskRecord, open_tasks: usize) -> HeadingSummary {
    HeadingSummary {
        uuid: heading.uuid.clone(),
        title: heading.title.clone(),
        index: heading.index,
        open_tasks,
    }
}

fn include_status(include_completed: bool) -> StatusFilter {
    if include_completed {
        StatusFilter::All
    } else {
        StatusFilter::Incomplete
    }
}

fn traced(operation: &'static str, rows: usize, tasks: Vec<ClassifiedTask>) -> Vec<ClassifiedTask> {
    debug!(operation, rows, results = tasks.len(), "composed");
    tasks
}

/// The engine pinned to one value of "today".
pub struct AsOf<'e> {
    engine: &'e Engine,
    today: PackedDate,
    options: QueryOptions,
}

impl<'e> AsOf<'e> {
    /// Replaces the limits for queries issued through this handle.
    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn today(&self) -> PackedDate {
        self.today
    }

    fn read<T>(&self, operation: &'static str, read: impl FnOnce(&Snapshot<'_>) -> EngineResult<T>) -> EngineResult<T> {
        self.engine.store.read(operation, &self.options, read)
    }

    fn open_tasks(snapshot: &Snapshot<'_>) -> EngineResult<Vec<TaskRecord>> {
        Tasks::new(snapshot.conn()).load(&TaskFilter::kinds(&[TaskKind::Task]).status(Some(TaskStatus::Incomplete.code())))
    }

    /// Tasks matching a filtered listing request.
    pub fn list_tasks(&self, query: &TaskQuery) -> EngineResult<Vec<ClassifiedTask>> {
        query.validate()?;
        self.read("list_tasks", |snapshot| {
            let frame = Frame::load(snapshot)?;
            let records = Tasks::new(snapshot.conn()).load(&TaskFilter::kinds(&[TaskKind::Task]).status(query.status.code()))?;
            snapshot.checkpoint()?;

            let composer = Composer::new(&frame.hierarchy, self.today);
            let tasks = composer.compose(&records, query.include_future, |task| query.matches(task), SortOrder::List);
            Ok(traced("list_tasks", records.len(), tasks))
        })
    }

    /// Any live task, project or heading by its full identifier.
    pub fn get_task(&self, uuid: &str) -> EngineResult<ClassifiedTask> {
        self.read("get_task", |snapshot| {
            let frame = Frame::load(snapshot)?;
            let record = Tasks::new(snapshot.conn()).get(uuid)?.ok_or_else(|| EngineError::not_found("Task", uuid))?;
            Composer::new(&frame.hierarchy, self.today)
                .enrich(&record)
                .ok_or_else(|| EngineError::not_found("Task", uuid))
        })
    }

    fn list_virtual(&self, operation: &'static str, list: VirtualList, include_future: bool, order: SortOrder) -> EngineResult<Vec<ClassifiedTask>> {
        self.read(operation, |snapshot| {
            let frame = Frame::load(snapshot)?;
            let records = Self::open_tasks(snapshot)?;
            snapshot.checkpoint()?;

            let composer = Composer::new(&frame.hierarchy, self.today);
            let tasks = composer.compose(&records, include_future, |task| task.list == Some(list), order);
            Ok(traced(operation, records.len(), tasks))
        })
    }

    pub fn list_inbox(&self) -> EngineResult<Vec<ClassifiedTask>> {
        self.list_virtual("list_inbox", VirtualList::Inbox, false, SortOrder::List)
    }

    pub fn list_today(&self) -> EngineResult<Vec<ClassifiedTask>> {
        self.list_virtual("list_today", VirtualList::Today, false, SortOrder::List)
    }

    pub fn list_anytime(&self) -> EngineResult<Vec<ClassifiedTask>> {
        self.list_virtual("list_anytime", VirtualList::Anytime, false, SortOrder::List)
    }

    /// Upcoming shows future dates by definition, repeating instances included.
    pub fn list_upcoming(&self) -> EngineResult<Vec<ClassifiedTask>> {
        self.list_virtual("list_upcoming", VirtualList::Upcoming, true, SortOrder::Scheduled)
    }

    pub fn list_someday(&self) -> EngineResult<Vec<ClassifiedTask>> {
        self.list_virtual("list_someday", VirtualList::Someday, false, SortOrder::List)
    }

    /// Completed and canceled tasks, most recent first.
    pub fn list_logbook(&self, limit: usize) -> EngineResult<Vec<ClassifiedTask>> {
        if limit == 0 {
            return Err(EngineError::InvalidArgument("logbook limit must be at least 1".to_string()));
        }
        self.read("list_logbook", |snapshot| {
            let frame = Frame::load(snapshot)?;
            let records = Tasks::new(snapshot.conn()).load(&TaskFilter::kinds(&[TaskKind::Task]).closed_only())?;
            snapshot.checkpoint()?;

            let composer = Composer::new(&frame.hierarchy, self.today);
            let mut tasks = composer.compose(&records, false, |task| task.list == Some(VirtualList::Logbook), SortOrder::Logbook);
            tasks.truncate(limit);
            Ok(traced("list_logbook", records.len(), tasks))
        })
    }

    /// Open tasks whose deadline falls on or before today plus `days`.
    pub fn list_deadlines(&self, days: i64) -> EngineResult<Vec<ClassifiedTask>> {
        if days < 0 {
            return Err(EngineError::InvalidArgument(format!("deadline window must not be negative, got {}", days)));
        }
        let horizon = self.today.add_days(days)?;
        self.read("list_deadlines", |snapshot| {
            let frame = Frame::load(snapshot)?;
            let records = Self::open_tasks(snapshot)?;
            snapshot.checkpoint()?;

            let composer = Composer::new(&frame.hierarchy, self.today);
            let tasks = composer.compose(&records, false, |task| task.record.deadline.is_some_and(|d| d <= horizon), SortOrder::Deadline);
            Ok(traced("list_deadlines", records.len(), tasks))
        })
    }

    pub fn search(&self, request: &SearchRequest) -> EngineResult<Vec<ClassifiedTask>> {
        request.validate()?;
        self.read("search", |snapshot| {
            let frame = Frame::load(snapshot)?;
            let filter = TaskFilter::kinds(&[TaskKind::Task, TaskKind::Project, TaskKind::Heading]).status(request.status.code());
            let records = Tasks::new(snapshot.conn()).load(&filter)?;
            snapshot.checkpoint()?;

            let composer = Composer::new(&frame.hierarchy, self.today);
            let tasks = composer.compose(&records, request.include_future, |task| request.matches(task), SortOrder::Search);
            Ok(traced("search", records.len(), tasks))
        })
    }

    /// Visible areas with open-task and active-project counts.
    pub fn list_areas(&self) -> EngineResult<Vec<AreaSummary>> {
        self.read("list_areas", |snapshot| {
            let frame = Frame::load(snapshot)?;
            let tasks = Self::open_tasks(snapshot)?;
            snapshot.checkpoint()?;

            let tallies = frame.hierarchy.area_tallies(tasks.iter().chain(frame.containers.iter()));
            Ok(frame
                .areas
                .iter()
                .filter(|area| area.visible && !area.trashed)
                .map(|area| frame.area_summary(area, &tallies))
                .collect())
        })
    }

    /// One area by title, full identifier or identifier prefix. Hidden areas
    /// are still readable here.
    pub fn get_area(&self, key: &str) -> EngineResult<AreaSummary> {
        self.read("get_area", |snapshot| {
            let uuid = resolver::resolve_any(snapshot, RecordKind::Area, key)?;
            let frame = Frame::load(snapshot)?;
            Self::area_in(snapshot, &frame, &uuid, key)
        })
    }

    /// `get_area`, `list_area_projects` and `list_area_tasks` from one read.
    pub fn area_details(&self, key: &str, include_completed: bool) -> EngineResult<AreaDetails> {
        let status = include_status(include_completed);
        self.read("area_details", |snapshot| {
            let uuid = resolver::resolve_any(snapshot, RecordKind::Area, key)?;
            let frame = Frame::load(snapshot)?;
            let area = Self::area_in(snapshot, &frame, &uuid, key)?;
            let projects = Self::area_projects_in(snapshot, &frame, &uuid, status)?;
            let tasks = self.area_tasks_in(snapshot, &frame, &uuid, status)?;
            Ok(AreaDetails { area, projects, tasks })
        })
    }

    fn area_in(snapshot: &Snapshot<'_>, frame: &Frame, uuid: &str, key: &str) -> EngineResult<AreaSummary> {
        let tasks = Self::open_tasks(snapshot)?;
        let area = frame.live_area(uuid).ok_or_else(|| EngineError::not_found("Area", key))?;
        let tallies = frame.hierarchy.area_tallies(tasks.iter().chain(frame.containers.iter()));
        Ok(frame.area_summary(area, &tallies))
    }

    /// Projects filed directly in an area.
    pub fn list_area_projects(&self, key: &str, include_completed: bool) -> EngineResult<Vec<ProjectSummary>> {
        let status = include_status(include_completed);
        self.read("list_area_projects", |snapshot| {
            let uuid = resolver::resolve_any(snapshot, RecordKind::Area, key)?;
            let frame = Frame::load(snapshot)?;
            Self::area_projects_in(snapshot, &frame, &uuid, status)
        })
    }

    fn area_projects_in(snapshot: &Snapshot<'_>, frame: &Frame, uuid: &str, status: StatusFilter) -> EngineResult<Vec<ProjectSummary>> {
        let tasks = Tasks::new(snapshot.conn()).load(&TaskFilter::kinds(&[TaskKind::Task]))?;
        snapshot.checkpoint()?;

        let tallies = frame.hierarchy.project_tallies(&tasks);
        Ok(frame
            .live_projects()
            .into_iter()
            .filter(|project| project.placement.area() == Some(uuid) && status.matches(project.status))
            .map(|project| frame.project_summary(project, &tallies))
            .collect())
    }

    /// Tasks filed directly in an area, outside any project.
    pub fn list_area_tasks(&self, key: &str, include_completed: bool) -> EngineResult<Vec<ClassifiedTask>> {
        let status = include_status(include_completed);
        self.read("list_area_tasks", |snapshot| {
            let uuid = resolver::resolve_any(snapshot, RecordKind::Area, key)?;
            let frame = Frame::load(snapshot)?;
            self.area_tasks_in(snapshot, &frame, &uuid, status)
        })
    }

    fn area_tasks_in(&self, snapshot: &Snapshot<'_>, frame: &Frame, uuid: &str, status: StatusFilter) -> EngineResult<Vec<ClassifiedTask>> {
        let records = Tasks::new(snapshot.conn()).load(&TaskFilter::kinds(&[TaskKind::Task]).status(status.code()))?;
        snapshot.checkpoint()?;

        let direct = |task: &ClassifiedTask| {
            let placement = &task.record.placement;
            placement.area() == Some(uuid) && placement.project().is_none() && placement.heading().is_none()
        };
        let tasks = Composer::new(&frame.hierarchy, self.today).compose(&records, false, direct, SortOrder::List);
        Ok(traced("list_area_tasks", records.len(), tasks))
    }

    pub fn list_projects(&self, include_completed: bool) -> EngineResult<Vec<ProjectSummary>> {
        let status = include_status(include_completed);
        self.read("list_projects", |snapshot| {
            let frame = Frame::load(snapshot)?;
            let tasks = Tasks::new(snapshot.conn()).load(&TaskFilter::kinds(&[TaskKind::Task]))?;
            snapshot.checkpoint()?;

            let tallies = frame.hierarchy.project_tallies(&tasks);
            Ok(frame
                .live_projects()
                .into_iter()
                .filter(|project| status.matches(project.status))
                .map(|project| frame.project_summary(project, &tallies))
                .collect())
        })
    }

    pub fn get_project(&self, key: &str) -> EngineResult<ProjectSummary> {
        self.read("get_project", |snapshot| {
            let uuid = resolver::resolve_any(snapshot, RecordKind::Project, key)?;
            let frame = Frame::load(snapshot)?;
            Self::project_in(snapshot, &frame, &uuid, key)
        })
    }

    /// `get_project`, `list_project_headings` and `list_project_tasks` from one read.
    pub fn project_details(&self, key: &str, include_completed: bool) -> EngineResult<ProjectOutline> {
        let status = include_status(include_completed);
        self.read("project_details", |snapshot| {
            let uuid = resolver::resolve_any(snapshot, RecordKind::Project, key)?;
            let frame = Frame::load(snapshot)?;
            let project = Self::project_in(snapshot, &frame, &uuid, key)?;
            let headings = self.project_headings_in(snapshot, &frame, &uuid)?;
            let tasks = self.project_tasks_in(snapshot, &frame, &uuid, status)?;
            Ok(ProjectOutline { project, headings, tasks })
        })
    }

    fn project_in(snapshot: &Snapshot<'_>, frame: &Frame, uuid: &str, key: &str) -> EngineResult<ProjectSummary> {
        let tasks = Tasks::new(snapshot.conn()).load(&TaskFilter::kinds(&[TaskKind::Task]))?;
        let project = frame
            .live_projects()
            .into_iter()
            .find(|project| project.uuid == uuid)
            .ok_or_else(|| EngineError::not_found("Project", key))?;
        let tallies = frame.hierarchy.project_tallies(&tasks);
        Ok(frame.project_summary(project, &tallies))
    }

    /// Tasks whose effective project is the given one, headings included.
    pub fn list_project_tasks(&self, key: &str, include_completed: bool) -> EngineResult<Vec<ClassifiedTask>> {
        let status = include_status(include_completed);
        self.read("list_project_tasks", |snapshot| {
            let uuid = resolver::resolve_any(snapshot, RecordKind::Project, key)?;
            let frame = Frame::load(snapshot)?;
            self.project_tasks_in(snapshot, &frame, &uuid, status)
        })
    }

    fn project_tasks_in(&self, snapshot: &Snapshot<'_>, frame: &Frame, uuid: &str, status: StatusFilter) -> EngineResult<Vec<ClassifiedTask>> {
        let records = Tasks::new(snapshot.conn()).load(&TaskFilter::kinds(&[TaskKind::Task]).status(status.code()))?;
        snapshot.checkpoint()?;

        let composer = Composer::new(&frame.hierarchy, self.today);
        let tasks = composer.compose(&records, false, |task| task.project_id.as_deref() == Some(uuid), SortOrder::List);
        Ok(traced("list_project_tasks", records.len(), tasks))
    }

    /// Live headings of a project with their open-task counts.
    pub fn list_project_headings(&self, key: &str) -> EngineResult<Vec<HeadingSummary>> {
        self.read("list_project_headings", |snapshot| {
            let uuid = resolver::resolve_any(snapshot, RecordKind::Project, key)?;
            let frame = Frame::load(snapshot)?;
            self.project_headings_in(snapshot, &frame, &uuid)
        })
    }

    fn project_headings_in(&self, snapshot: &Snapshot<'_>, frame: &Frame, uuid: &str) -> EngineResult<Vec<HeadingSummary>> {
        let records = Self::open_tasks(snapshot)?;
        snapshot.checkpoint()?;

        let composer = Composer::new(&frame.hierarchy, self.today);
        let open = composer.compose(&records, false, |task| task.project_id.as_deref() == Some(uuid), SortOrder::List);
        Ok(frame
            .live_headings(uuid)
            .into_iter()
            .map(|heading| {
                let count = open.iter().filter(|task| task.heading_id.as_deref() == Some(heading.uuid.as_str())).count();
                heading_summary(heading, count)
            })
            .collect())
    }

    /// Every tag with the number of open, visible tasks carrying it.
    pub fn list_tags(&self) -> EngineResult<Vec<TagSummary>> {
        self.read("list_tags", |snapshot| {
            let frame = Frame::load(snapshot)?;
            let tags = Tags::new(snapshot.conn());
            let records = tags.list()?;
            let counts = self.tag_counts(snapshot, &frame, &tags)?;
            Ok(records.into_iter().map(|tag| tag_summary(tag, &counts)).collect())
        })
    }

    pub fn get_tag(&self, key: &str) -> EngineResult<TagSummary> {
        self.read("get_tag", |snapshot| {
            let uuid = resolver::resolve_any(snapshot, RecordKind::Tag, key)?;
            let frame = Frame::load(snapshot)?;
            let tags = Tags::new(snapshot.conn());
            let tag = tags.get_by_id(&uuid)?.ok_or_else(|| EngineError::not_found("Tag", key))?;
            let counts = self.tag_counts(snapshot, &frame, &tags)?;
            Ok(tag_summary(tag, &counts))
        })
    }

    fn tag_counts(&self, snapshot: &Snapshot<'_>, frame: &Frame, tags: &Tags<'_>) -> EngineResult<HashMap<String, usize>> {
        let records = Self::open_tasks(snapshot)?;
        let links = tags.links()?;
        snapshot.checkpoint()?;

        let visible: HashSet<String> = Composer::new(&frame.hierarchy, self.today)
            .compose(&records, false, |_| true, SortOrder::List)
            .into_iter()
            .map(|task| task.record.uuid)
            .collect();

        let mut counts = HashMap::new();
        for (tag, task) in links {
            if visible.contains(&task) {
                *counts.entry(tag).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    /// Tasks carrying a tag.
    pub fn list_tag_tasks(&self, key: &str, include_completed: bool) -> EngineResult<Vec<ClassifiedTask>> {
        let status = include_status(include_completed);
        self.read("list_tag_tasks", |snapshot| {
            let uuid = resolver::resolve_any(snapshot, RecordKind::Tag, key)?;
            let frame = Frame::load(snapshot)?;
            let tagged: HashSet<String> = Tags::new(snapshot.conn())
                .links()?
                .into_iter()
                .filter(|(tag, _)| *tag == uuid)
                .map(|(_, task)| task)
                .collect();
            let records = Tasks::new(snapshot.conn()).load(&TaskFilter::kinds(&[TaskKind::Task]).status(status.code()))?;
            snapshot.checkpoint()?;

            let composer = Composer::new(&frame.hierarchy, self.today);
            let tasks = composer.compose(&records, false, |task| tagged.contains(&task.record.uuid), SortOrder::List);
            Ok(traced("list_tag_tasks", records.len(), tasks))
        })
    }

    /// Virtual lists plus the area, project and heading outline.
    pub fn snapshot(&self) -> EngineResult<Overview> {
        self.read("snapshot", |snapshot| {
            let frame = Frame::load(snapshot)?;
            let records = Self::open_tasks(snapshot)?;
            snapshot.checkpoint()?;

            let composer = Composer::new(&frame.hierarchy, self.today);
            let open = composer.compose(&records, false, |_| true, SortOrder::List);
            let upcoming = composer.compose(&records, true, |task| task.list == Some(VirtualList::Upcoming), SortOrder::Scheduled);
            let in_list = |list: VirtualList| open.iter().filter(|task| task.list == Some(list)).cloned().collect::<Vec<_>>();

            let area_tallies = frame.hierarchy.area_tallies(records.iter().chain(frame.containers.iter()));
            let project_tallies = frame.hierarchy.project_tallies(&records);

            let outline = |project: &TaskRecord| ProjectOutline {
                project: frame.project_summary(project, &project_tallies),
                headings: frame
                    .live_headings(&project.uuid)
                    .into_iter()
                    .map(|heading| {
                        let count = open.iter().filter(|task| task.heading_id.as_deref() == Some(heading.uuid.as_str())).count();
                        heading_summary(heading, count)
                    })
                    .collect(),
                tasks: open.iter().filter(|task| task.project_id.as_deref() == Some(project.uuid.as_str())).cloned().collect(),
            };

            let open_projects: Vec<&TaskRecord> = frame
                .live_projects()
                .into_iter()
                .filter(|project| project.status == TaskStatus::Incomplete)
                .collect();

            let areas = frame
                .areas
                .iter()
                .filter(|area| area.visible && !area.trashed)
                .map(|area| AreaOutline {
                    area: frame.area_summary(area, &area_tallies),
                    projects: open_projects
                        .iter()
                        .filter(|project| project.placement.area() == Some(area.uuid.as_str()))
                        .map(|&project| outline(project))
                        .collect(),
                    tasks: open
                        .iter()
                        .filter(|task| {
                            let placement = &task.record.placement;
                            placement.area() == Some(area.uuid.as_str()) && placement.project().is_none() && placement.heading().is_none()
                        })
                        .cloned()
                        .collect(),
                })
                .collect();

            let unfiled_projects = open_projects
                .iter()
                .filter(|project| project.placement.area().and_then(|area| frame.hierarchy.area_title(area)).is_none())
                .map(|&project| outline(project))
                .collect();

            debug!(operation = "snapshot", rows = records.len(), open = open.len(), "composed");
            Ok(Overview {
                today: in_list(VirtualList::Today),
                inbox: in_list(VirtualList::Inbox),
                upcoming,
                someday: in_list(VirtualList::Someday),
                areas,
                unfiled_projects,
            })
        })
    }

    pub fn resolve_area_id(&self, name_or_id: &str) -> EngineResult<String> {
        self.read("resolve_area_id", |snapshot| resolver::resolve(snapshot, RecordKind::Area, name_or_id))
    }

    pub fn resolve_project_id(&self, name_or_id: &str) -> EngineResult<String> {
        self.read("resolve_project_id", |snapshot| resolver::resolve(snapshot, RecordKind::Project, name_or_id))
    }

    pub fn resolve_tag_id(&self, name_or_id: &str) -> EngineResult<String> {
        self.read("resolve_tag_id", |snapshot| resolver::resolve(snapshot, RecordKind::Tag, name_or_id))
    }

    pub fn resolve_area_prefix(&self, prefix: &str) -> EngineResult<String> {
        self.read("resolve_area_prefix", |snapshot| resolver::resolve_prefix(snapshot, RecordKind::Area, prefix))
    }

    pub fn resolve_project_prefix(&self, prefix: &str) -> EngineResult<String> {
        self.read("resolve_project_prefix", |snapshot| resolver::resolve_prefix(snapshot, RecordKind::Project, prefix))
    }

    pub fn resolve_tag_prefix(&self, prefix: &str) -> EngineResult<String> {
        self.read("resolve_tag_prefix", |snapshot| resolver::resolve_prefix(snapshot, RecordKind::Tag, prefix))
    }

    pub fn resolve_task_prefix(&self, prefix: &str) -> EngineResult<String> {
        self.read("resolve_task_prefix", |snapshot| resolver::resolve_prefix(snapshot, RecordKind::Task, prefix))
    }
}

fn tag_summary(tag: TagRecord, counts: &HashMap<String, usize>) -> TagSummary {
    TagSummary {
        task_count: counts.get(&tag.uuid).copied().unwrap_or(0),
        uuid: tag.uuid,
        title: tag.title,
        shortcut: tag.shortcut,
    }
}
