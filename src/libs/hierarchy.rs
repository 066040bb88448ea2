//! Effective ancestry and aggregate counts.
//!
//! A task reaches its area by one of three paths: a direct area, the area of
//! its project, or the area of the project owning its heading. The walk below
//! follows those links only through live (non-trashed) ancestors and reports
//! separately whether any ancestor on the way is trashed, in which case the
//! record is hidden everywhere.
//!
//! References to records missing from the snapshot are treated as absent.

use super::task::{AreaRecord, TaskKind, TaskRecord, TaskStatus};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AncestorRef {
    pub uuid: String,
    pub title: String,
}

/// Result of the ancestor walk for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ancestry {
    pub hidden: bool,
    pub area: Option<AncestorRef>,
    pub project: Option<AncestorRef>,
    pub heading: Option<AncestorRef>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AreaTally {
    pub open_tasks: usize,
    pub active_projects: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectTally {
    pub open_tasks: usize,
    pub total_tasks: usize,
}

#[derive(Debug, Clone)]
struct AreaNode {
    title: String,
    trashed: bool,
}

#[derive(Debug, Clone)]
struct ContainerNode {
    kind: TaskKind,
    title: String,
    trashed: bool,
    area: Option<String>,
    project: Option<String>,
}

/// Snapshot of areas and containers (projects and headings).
///
/// Trashed entries are kept so the walk can tell "trashed" from "missing".
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    areas: HashMap<String, AreaNode>,
    containers: HashMap<String, ContainerNode>,
}

impl Hierarchy {
    pub fn new<'a>(areas: impl IntoIterator<Item = &'a AreaRecord>, records: impl IntoIterator<Item = &'a TaskRecord>) -> Self {
        let areas = areas
            .into_iter()
            .map(|area| {
                (
                    area.uuid.clone(),
                    AreaNode {
                        title: area.title.clone(),
                        trashed: area.trashed,
                    },
                )
            })
            .collect();

        let containers = records
            .into_iter()
            .filter(|record| record.kind() != TaskKind::Task)
            .map(|record| {
                (
                    record.uuid.clone(),
                    ContainerNode {
                        kind: record.kind(),
                        title: record.title.clone(),
                        trashed: record.trashed,
                        area: record.placement.area().map(str::to_string),
                        project: record.placement.project().map(str::to_string),
                    },
                )
            })
            .collect();

        Hierarchy { areas, containers }
    }

    pub fn ancestry(&self, record: &TaskRecord) -> Ancestry {
        let mut walk = Ancestry {
            hidden: record.trashed,
            ..Ancestry::default()
        };

        let direct_area = self.area_link(record.placement.area(), &mut walk.hidden);

        let (project, heading) = match record.kind() {
            TaskKind::Project => (None, None),
            TaskKind::Heading => (self.container_link(record.placement.project(), TaskKind::Project, &mut walk.hidden), None),
            TaskKind::Task => (
                self.container_link(record.placement.project(), TaskKind::Project, &mut walk.hidden),
                self.container_link(record.placement.heading(), TaskKind::Heading, &mut walk.hidden),
            ),
        };

        let project_area = project.and_then(|(_, node)| self.area_link(node.area.as_deref(), &mut walk.hidden));

        let heading_project = heading.and_then(|(_, node)| self.container_link(node.project.as_deref(), TaskKind::Project, &mut walk.hidden));
        let heading_area = heading_project.and_then(|(_, node)| self.area_link(node.area.as_deref(), &mut walk.hidden));

        walk.area = direct_area.or(project_area).or(heading_area).map(|(uuid, node)| AncestorRef {
            uuid: uuid.to_string(),
            title: node.title.clone(),
        });
        walk.project = project.or(heading_project).map(container_ref);
        walk.heading = heading.map(container_ref);
        walk
    }

    /// Follows an area reference. Returns the node only when it is live; a
    /// trashed target marks the walk hidden.
    fn area_link<'h>(&'h self, uuid: Option<&'h str>, hidden: &mut bool) -> Option<(&'h str, &'h AreaNode)> {
        let uuid = uuid?;
        let node = self.areas.get(uuid)?;
        if node.trashed {
            *hidden = true;
            return None;
        }
        Some((uuid, node))
    }

    fn container_link<'h>(&'h self, uuid: Option<&'h str>, kind: TaskKind, hidden: &mut bool) -> Option<(&'h str, &'h ContainerNode)> {
        let uuid = uuid?;
        let node = self.containers.get(uuid).filter(|node| node.kind == kind)?;
        if node.trashed {
            *hidden = true;
            return None;
        }
        Some((uuid, node))
    }

    /// Title of a live area, if the snapshot has one.
    pub fn area_title(&self, uuid: &str) -> Option<&str> {
        self.areas.get(uuid).filter(|node| !node.trashed).map(|node| node.title.as_str())
    }

    /// Open-task and active-project counts per effective area.
    pub fn area_tallies<'a>(&self, records: impl IntoIterator<Item = &'a TaskRecord>) -> HashMap<String, AreaTally> {
        let mut tallies: HashMap<String, AreaTally> = HashMap::new();
        for record in records {
            if record.status != TaskStatus::Incomplete || record.kind() == TaskKind::Heading {
                continue;
            }
            let ancestry = self.ancestry(record);
            if ancestry.hidden {
                continue;
            }
            let Some(area) = ancestry.area else {
                continue;
            };
            let tally = tallies.entry(area.uuid).or_default();
            match record.kind() {
                TaskKind::Task => tally.open_tasks += 1,
                TaskKind::Project => tally.active_projects += 1,
                TaskKind::Heading => {}
            }
        }
        tallies
    }

    /// Open and total task counts per effective project.
    pub fn project_tallies<'a>(&self, records: impl IntoIterator<Item = &'a TaskRecord>) -> HashMap<String, ProjectTally> {
        let mut tallies: HashMap<String, ProjectTally> = HashMap::new();
        for record in records.into_iter().filter(|record| record.kind() == TaskKind::Task) {
            let ancestry = self.ancestry(record);
            if ancestry.hidden {
                continue;
            }
            let Some(project) = ancestry.project else {
                continue;
            };
            let tally = tallies.entry(project.uuid).or_default();
            tally.total_tasks += 1;
            if record.status == TaskStatus::Incomplete {
                tally.open_tasks += 1;
            }
        }
        tallies
    }
}

fn container_ref((uuid, node): (&str, &ContainerNode)) -> AncestorRef {
    AncestorRef {
        uuid: uuid.to_string(),
        title: node.title.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::task::{Placement, StartBucket};

    fn area(uuid: &str, title: &str, trashed: bool) -> AreaRecord {
        AreaRecord {
            uuid: uuid.to_string(),
            title: title.to_string(),
            visible: true,
            index: 0,
            trashed,
        }
    }

    fn record(uuid: &str, placement: Placement) -> TaskRecord {
        TaskRecord {
            uuid: uuid.to_string(),
            title: uuid.to_lowercase(),
            notes: None,
            status: TaskStatus::Incomplete,
            start: StartBucket::Anytime,
            placement,
            scheduled: None,
            deadline: None,
            deadline_suppressed: false,
            created: None,
            modified: None,
            completed: None,
            trashed: false,
            repeating_template: None,
            today_index: None,
            index: 0,
            tags: Vec::new(),
        }
    }

    fn task(uuid: &str, area: Option<&str>, project: Option<&str>, heading: Option<&str>) -> TaskRecord {
        record(
            uuid,
            Placement::Task {
                area: area.map(str::to_string),
                project: project.map(str::to_string),
                heading: heading.map(str::to_string),
            },
        )
    }

    fn project(uuid: &str, area: Option<&str>) -> TaskRecord {
        record(uuid, Placement::Project { area: area.map(str::to_string) })
    }

    fn heading(uuid: &str, project: &str) -> TaskRecord {
        record(
            uuid,
            Placement::Heading {
                project: Some(project.to_string()),
            },
        )
    }

    struct Fixture {
        areas: Vec<AreaRecord>,
        containers: Vec<TaskRecord>,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                areas: vec![area("WORK", "Work", false), area("HOME", "Home", false)],
                containers: vec![project("LAUNCH", Some("WORK")), heading("PREP", "LAUNCH"), project("LOOSE", None)],
            }
        }

        fn hierarchy(&self) -> Hierarchy {
            Hierarchy::new(&self.areas, &self.containers)
        }

        fn trash(&mut self, uuid: &str) {
            for area in self.areas.iter_mut().filter(|a| a.uuid == uuid) {
                area.trashed = true;
            }
            for container in self.containers.iter_mut().filter(|c| c.uuid == uuid) {
                container.trashed = true;
            }
        }
    }

    #[test]
    fn area_is_coalesced_through_project_and_heading() {
        let fixture = Fixture::new();
        let hierarchy = fixture.hierarchy();

        let direct = hierarchy.ancestry(&task("T1", Some("HOME"), None, None));
        assert_eq!(direct.area.unwrap().title, "Home");

        let via_project = hierarchy.ancestry(&task("T2", None, Some("LAUNCH"), None));
        assert_eq!(via_project.area.unwrap().uuid, "WORK");
        assert_eq!(via_project.project.unwrap().uuid, "LAUNCH");

        let via_heading = hierarchy.ancestry(&task("T3", None, None, Some("PREP")));
        assert_eq!(via_heading.area.unwrap().uuid, "WORK");
        assert_eq!(via_heading.project.unwrap().uuid, "LAUNCH");
        assert_eq!(via_heading.heading.unwrap().uuid, "PREP");
        assert!(!via_heading.hidden);
    }

    #[test]
    fn trashed_project_hides_tasks_under_its_headings() {
        let mut fixture = Fixture::new();
        fixture.trash("LAUNCH");
        let hierarchy = fixture.hierarchy();

        let under_heading = hierarchy.ancestry(&task("T3", None, None, Some("PREP")));
        assert!(under_heading.hidden);
        assert_eq!(under_heading.area, None);
        assert_eq!(under_heading.project, None);

        let heading_itself = hierarchy.ancestry(&heading("PREP", "LAUNCH"));
        assert!(heading_itself.hidden);
    }

    #[test]
    fn trashed_heading_hides_its_tasks() {
        let mut fixture = Fixture::new();
        fixture.trash("PREP");
        let hierarchy = fixture.hierarchy();

        let ancestry = hierarchy.ancestry(&task("T3", None, None, Some("PREP")));
        assert!(ancestry.hidden);
        assert_eq!(ancestry.heading, None);
    }

    #[test]
    fn trashed_area_hides_everything_beneath_it() {
        let mut fixture = Fixture::new();
        fixture.trash("WORK");
        let hierarchy = fixture.hierarchy();

        assert!(hierarchy.ancestry(&project("LAUNCH", Some("WORK"))).hidden);
        assert!(hierarchy.ancestry(&task("T2", None, Some("LAUNCH"), None)).hidden);
        assert!(hierarchy.ancestry(&task("T3", None, None, Some("PREP"))).hidden);
        assert!(!hierarchy.ancestry(&task("T1", Some("HOME"), None, None)).hidden);
        assert_eq!(hierarchy.area_title("WORK"), None);
    }

    #[test]
    fn dangling_references_are_absent_not_hidden() {
        let hierarchy = Fixture::new().hierarchy();
        let ancestry = hierarchy.ancestry(&task("T9", Some("GONE"), Some("MISSING"), None));
        assert!(!ancestry.hidden);
        assert_eq!(ancestry, Ancestry::default());
    }

    #[test]
    fn project_reference_must_point_at_a_project() {
        let hierarchy = Fixture::new().hierarchy();
        let ancestry = hierarchy.ancestry(&task("T4", None, Some("PREP"), None));
        assert_eq!(ancestry.project, None);
    }

    #[test]
    fn tallies_use_effective_membership_and_skip_hidden() {
        let mut fixture = Fixture::new();
        let mut done = task("T5", None, Some("LAUNCH"), None);
        done.status = TaskStatus::Completed;
        let mut trashed = task("T6", None, Some("LAUNCH"), None);
        trashed.trashed = true;

        let mut records = fixture.containers.clone();
        records.extend([
            task("T1", Some("HOME"), None, None),
            task("T2", None, Some("LAUNCH"), None),
            task("T3", None, None, Some("PREP")),
            done,
            trashed,
        ]);

        let hierarchy = fixture.hierarchy();
        let areas = hierarchy.area_tallies(&records);
        assert_eq!(areas["WORK"], AreaTally { open_tasks: 2, active_projects: 1 });
        assert_eq!(areas["HOME"], AreaTally { open_tasks: 1, active_projects: 0 });

        let projects = hierarchy.project_tallies(&records);
        assert_eq!(projects["LAUNCH"], ProjectTally { open_tasks: 2, total_tasks: 3 });

        fixture.trash("PREP");
        let projects = fixture.hierarchy().project_tallies(&records);
        assert_eq!(projects["LAUNCH"], ProjectTally { open_tasks: 1, total_tasks: 2 });
    }
}
