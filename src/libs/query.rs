//! Request objects and pure result-set composition.
//!
//! The engine loads one snapshot of rows and hands them to a [`Composer`],
//! which drops hidden records, applies the repeating horizon, classifies,
//! filters, orders and deduplicates. Nothing here touches the store.

use super::classifier::{classify, excluded_by_horizon};
use super::error::{EngineError, EngineResult};
use super::hierarchy::{AncestorRef, Hierarchy};
use super::packed_date::PackedDate;
use super::task::{ClassifiedTask, StatusFilter, TaskRecord, VirtualList};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Filtered task listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskQuery {
    pub status: StatusFilter,
    /// Case-insensitive substring of the effective area title.
    pub area: Option<String>,
    /// Case-insensitive substring of the effective project title.
    pub project: Option<String>,
    /// Case-insensitive substring of any of the task's tag titles.
    pub tag: Option<String>,
    /// Restrict to tasks classified Today.
    pub today: bool,
    pub include_future: bool,
}

impl TaskQuery {
    pub fn validate(&self) -> EngineResult<()> {
        for (name, value) in [("area", &self.area), ("project", &self.project), ("tag", &self.tag)] {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                return Err(EngineError::InvalidArgument(format!("{} filter must not be empty", name)));
            }
        }
        Ok(())
    }

    pub fn matches(&self, task: &ClassifiedTask) -> bool {
        self.status.matches(task.record.status)
            && (!self.today || task.list == Some(VirtualList::Today))
            && self.area.as_deref().map_or(true, |term| optional_contains(task.area_name.as_deref(), term))
            && self.project.as_deref().map_or(true, |term| optional_contains(task.project_name.as_deref(), term))
            && self.tag.as_deref().map_or(true, |term| task.record.tags.iter().any(|tag| contains_ignore_case(tag, term)))
    }
}

/// Free-text search over titles and optionally notes.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub term: String,
    pub include_notes: bool,
    pub include_future: bool,
    pub status: StatusFilter,
}

impl SearchRequest {
    pub fn new(term: impl Into<String>) -> Self {
        SearchRequest {
            term: term.into(),
            include_notes: false,
            include_future: false,
            status: StatusFilter::All,
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.term.trim().is_empty() {
            return Err(EngineError::InvalidArgument("search term must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn matches(&self, task: &ClassifiedTask) -> bool {
        let term = self.term.trim();
        self.status.matches(task.record.status)
            && (contains_ignore_case(&task.record.title, term)
                || (self.include_notes && optional_contains(task.record.notes.as_deref(), term)))
    }
}

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// `todayIndex` for Today tasks (absent last), then `index`.
    List,
    /// Completion instant, newest first.
    Logbook,
    /// Projects, then headings, then tasks; each by `index`.
    Search,
    /// Scheduled date ascending, then `index`.
    Scheduled,
    /// Deadline ascending, then `index`.
    Deadline,
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn optional_contains(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| contains_ignore_case(h, needle))
}

/// Turns snapshot rows into an ordered, deduplicated result set.
pub struct Composer<'h> {
    hierarchy: &'h Hierarchy,
    today: PackedDate,
}

impl<'h> Composer<'h> {
    pub fn new(hierarchy: &'h Hierarchy, today: PackedDate) -> Self {
        Composer { hierarchy, today }
    }

    /// Enriches one record, or `None` when an ancestor hides it.
    pub fn enrich(&self, record: &TaskRecord) -> Option<ClassifiedTask> {
        let ancestry = self.hierarchy.ancestry(record);
        if ancestry.hidden {
            return None;
        }
        let (area_id, area_name) = split(ancestry.area);
        let (project_id, project_name) = split(ancestry.project);
        let (heading_id, heading_name) = split(ancestry.heading);
        Some(ClassifiedTask {
            list: classify(record, self.today),
            is_repeating: record.is_repeating(),
            area_id,
            area_name,
            project_id,
            project_name,
            heading_id,
            heading_name,
            record: record.clone(),
        })
    }

    pub fn compose<'r>(
        &self,
        records: impl IntoIterator<Item = &'r TaskRecord>,
        include_future: bool,
        keep: impl Fn(&ClassifiedTask) -> bool,
        order: SortOrder,
    ) -> Vec<ClassifiedTask> {
        let mut seen = HashSet::new();
        let mut tasks: Vec<ClassifiedTask> = records
            .into_iter()
            .filter(|record| !excluded_by_horizon(record, self.today, include_future))
            .filter_map(|record| self.enrich(record))
            .filter(|task| keep(task))
            .filter(|task| seen.insert(task.record.uuid.clone()))
            .collect();
        sort_tasks(&mut tasks, order);
        tasks
    }
}

fn split(ancestor: Option<AncestorRef>) -> (Option<String>, Option<String>) {
    match ancestor {
        Some(AncestorRef { uuid, title }) => (Some(uuid), Some(title)),
        None => (None, None),
    }
}

pub fn sort_tasks(tasks: &mut [ClassifiedTask], order: SortOrder) {
    tasks.sort_by(|a, b| compare(a, b, order).then_with(|| a.record.uuid.cmp(&b.record.uuid)));
}

fn compare(a: &ClassifiedTask, b: &ClassifiedTask, order: SortOrder) -> Ordering {
    let by_index = a.record.index.cmp(&b.record.index);
    match order {
        SortOrder::List => compare_today_rank(today_rank(a), today_rank(b)).then(by_index),
        SortOrder::Logbook => newest_first(a, b).then(by_index),
        SortOrder::Search => a.record.kind().search_rank().cmp(&b.record.kind().search_rank()).then(by_index),
        SortOrder::Scheduled => none_last(a.record.scheduled, b.record.scheduled).then(by_index),
        SortOrder::Deadline => none_last(a.record.deadline, b.record.deadline).then(by_index),
    }
}

fn newest_first(a: &ClassifiedTask, b: &ClassifiedTask) -> Ordering {
    match (a.record.completed, b.record.completed) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn today_rank(task: &ClassifiedTask) -> Option<f64> {
    match task.list {
        Some(VirtualList::Today) => task.record.today_index,
        _ => None,
    }
}

fn compare_today_rank(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn none_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
