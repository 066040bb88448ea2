//! Visibility classifier.
//!
//! Decides which virtual list a record belongs to from its raw fields and the
//! packed date of "today". Rules are evaluated in order and the first match
//! wins, so every incomplete record lands in exactly one of Inbox, Today,
//! Upcoming, Someday or Anytime. Closed records only ever show in the Logbook.

use super::packed_date::PackedDate;
use super::task::{StartBucket, TaskRecord, VirtualList};

/// Classifies a record against `today`.
pub fn classify(record: &TaskRecord, today: PackedDate) -> Option<VirtualList> {
    if record.status.is_closed() {
        return Some(VirtualList::Logbook);
    }
    if record.start == StartBucket::Inbox {
        return Some(VirtualList::Inbox);
    }
    if is_today(record, today) {
        return Some(VirtualList::Today);
    }

    match (record.start, record.scheduled) {
        (StartBucket::Someday, Some(scheduled)) if scheduled > today => Some(VirtualList::Upcoming),
        (StartBucket::Someday, None) => Some(VirtualList::Someday),
        (StartBucket::Anytime, None) => Some(VirtualList::Anytime),
        _ => None,
    }
}

fn is_today(record: &TaskRecord, today: PackedDate) -> bool {
    match (record.start, record.scheduled) {
        (StartBucket::Anytime, Some(_)) => true,
        (StartBucket::Someday, Some(scheduled)) => scheduled <= today,
        (_, None) => deadline_is_due(record, today),
        _ => false,
    }
}

fn deadline_is_due(record: &TaskRecord, today: PackedDate) -> bool {
    match record.deadline {
        Some(deadline) => deadline <= today && !record.deadline_suppressed,
        None => false,
    }
}

/// Whether the repeating-instance horizon hides this record.
///
/// Instances generated from a repeating template with a scheduled date after
/// today stay hidden until the caller opts into future instances.
pub fn excluded_by_horizon(record: &TaskRecord, today: PackedDate, include_future: bool) -> bool {
    if include_future || !record.is_repeating() {
        return false;
    }
    matches!(record.scheduled, Some(scheduled) if scheduled > today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::task::{Placement, TaskStatus};
    use chrono::NaiveDate;

    fn today() -> PackedDate {
        PackedDate::encode(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()).unwrap()
    }

    fn days(offset: i64) -> Option<PackedDate> {
        Some(today().add_days(offset).unwrap())
    }

    fn record(start: StartBucket, scheduled: Option<PackedDate>) -> TaskRecord {
        TaskRecord {
            uuid: "A1B2C3D4-0000-0000-0000-000000000001".to_string(),
            title: "Water plants".to_string(),
            notes: None,
            status: TaskStatus::Incomplete,
            start,
            placement: Placement::Task {
                area: None,
                project: None,
                heading: None,
            },
            scheduled,
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

    #[test]
    fn anytime_scheduled_today_is_today() {
        let task = record(StartBucket::Anytime, days(0));
        assert_eq!(classify(&task, today()), Some(VirtualList::Today));
    }

    #[test]
    fn someday_scheduled_in_future_is_upcoming_not_today() {
        let task = record(StartBucket::Someday, days(30));
        assert_eq!(classify(&task, today()), Some(VirtualList::Upcoming));
    }

    #[test]
    fn someday_scheduled_in_past_is_today() {
        let task = record(StartBucket::Someday, days(-2));
        assert_eq!(classify(&task, today()), Some(VirtualList::Today));
    }

    #[test]
    fn someday_without_schedule_is_someday() {
        let task = record(StartBucket::Someday, None);
        assert_eq!(classify(&task, today()), Some(VirtualList::Someday));
    }

    #[test]
    fn overdue_deadline_pulls_into_today_unless_suppressed() {
        let mut task = record(StartBucket::Anytime, None);
        task.deadline = days(-1);
        assert_eq!(classify(&task, today()), Some(VirtualList::Today));

        task.deadline_suppressed = true;
        assert_eq!(classify(&task, today()), Some(VirtualList::Anytime));
    }

    #[test]
    fn future_deadline_stays_in_anytime() {
        let mut task = record(StartBucket::Anytime, None);
        task.deadline = days(3);
        assert_eq!(classify(&task, today()), Some(VirtualList::Anytime));
    }

    #[test]
    fn inbox_wins_over_today_rules() {
        let mut task = record(StartBucket::Inbox, days(0));
        task.deadline = days(-5);
        assert_eq!(classify(&task, today()), Some(VirtualList::Inbox));
    }

    #[test]
    fn closed_records_are_logbook_only() {
        for status in [TaskStatus::Completed, TaskStatus::Canceled] {
            let mut task = record(StartBucket::Anytime, days(0));
            task.status = status;
            assert_eq!(classify(&task, today()), Some(VirtualList::Logbook));
        }
    }

    #[test]
    fn incomplete_records_land_in_exactly_one_open_list() {
        let starts = [StartBucket::Inbox, StartBucket::Anytime, StartBucket::Someday];
        let schedules = [None, days(-3), days(0), days(4)];
        let deadlines = [None, days(-1), days(0), days(2)];

        for start in starts {
            for scheduled in schedules {
                for deadline in deadlines {
                    for suppressed in [false, true] {
                        let mut task = record(start, scheduled);
                        task.deadline = deadline;
                        task.deadline_suppressed = suppressed;
                        let list = classify(&task, today());
                        assert!(
                            matches!(
                                list,
                                Some(VirtualList::Inbox | VirtualList::Today | VirtualList::Upcoming | VirtualList::Someday | VirtualList::Anytime)
                            ),
                            "{:?} {:?} {:?} {} classified as {:?}",
                            start,
                            scheduled,
                            deadline,
                            suppressed,
                            list
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn horizon_only_hides_future_repeating_instances() {
        let mut plain = record(StartBucket::Someday, days(5));
        assert!(!excluded_by_horizon(&plain, today(), false));

        plain.repeating_template = Some("TEMPLATE".to_string());
        assert!(excluded_by_horizon(&plain, today(), false));
        assert!(!excluded_by_horizon(&plain, today(), true));

        let due_now = TaskRecord {
            scheduled: days(0),
            ..plain.clone()
        };
        assert!(!excluded_by_horizon(&due_now, today(), false));
    }
}
