use crate::libs::error::{EngineError, EngineResult};
use crate::libs::packed_date::{decode_instant, PackedDate};
use crate::libs::task::{Placement, StartBucket, TaskKind, TaskRecord, TaskStatus};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};

/// Unit separator; never appears in tag titles typed by a user.
const TAG_SEPARATOR: char = '\u{1f}';

const SELECT_TASKS: &str = r#"SELECT
    t.uuid,
    t.title,
    t.notes,
    t.status,
    t.type,
    t.start,
    t.startDate,
    t.deadline,
    t.deadlineSuppressionDate,
    t.creationDate,
    t.userModificationDate,
    t.stopDate,
    t.area,
    t.project,
    t.heading,
    t.trashed,
    t.rt1_repeatingTemplate,
    t.todayIndex,
    t."index",
    (SELECT GROUP_CONCAT(tag.title, char(31))
        FROM TMTaskTag tt
        JOIN TMTag tag ON tag.uuid = tt.tags
        WHERE tt.tasks = t.uuid) AS tags
FROM TMTask t"#;

/// Coarse row selection pushed down into SQL.
///
/// Everything that depends on ancestry or "today" is decided in Rust after
/// loading; this only narrows what crosses the driver boundary.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub kinds: Vec<TaskKind>,
    pub status: Option<i64>,
    pub closed_only: bool,
    pub include_trashed: bool,
    pub uuid: Option<String>,
}

impl TaskFilter {
    pub fn kinds(kinds: &[TaskKind]) -> Self {
        TaskFilter {
            kinds: kinds.to_vec(),
            ..TaskFilter::default()
        }
    }

    /// Projects and headings, trashed ones included, for the ancestor walk.
    pub fn containers() -> Self {
        TaskFilter {
            kinds: vec![TaskKind::Project, TaskKind::Heading],
            include_trashed: true,
            ..TaskFilter::default()
        }
    }

    pub fn status(mut self, code: Option<i64>) -> Self {
        self.status = code;
        self
    }

    pub fn closed_only(mut self) -> Self {
        self.closed_only = true;
        self
    }

    fn to_sql(&self) -> (String, Vec<Value>) {
        let mut clauses = Vec::new();
        let mut values = Vec::new();

        if !self.kinds.is_empty() {
            let marks = vec!["?"; self.kinds.len()].join(", ");
            clauses.push(format!("t.type IN ({})", marks));
            values.extend(self.kinds.iter().map(|kind| Value::Integer(kind.code())));
        }
        if !self.include_trashed {
            clauses.push("t.trashed = 0".to_string());
        }
        if let Some(code) = self.status {
            clauses.push("t.status = ?".to_string());
            values.push(Value::Integer(code));
        }
        if self.closed_only {
            clauses.push("t.status IN (2, 3)".to_string());
        }
        if let Some(uuid) = &self.uuid {
            clauses.push("t.uuid = ?".to_string());
            values.push(Value::Text(uuid.clone()));
        }

        let mut sql = SELECT_TASKS.to_string();
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        (sql, values)
    }
}

/// Columns as stored, before decoding.
struct RawTask {
    uuid: String,
    title: Option<String>,
    notes: Option<String>,
    status: Option<i64>,
    kind: Option<i64>,
    start: Option<i64>,
    scheduled: Option<i64>,
    deadline: Option<i64>,
    deadline_suppression: Option<i64>,
    created: Option<f64>,
    modified: Option<f64>,
    stopped: Option<f64>,
    area: Option<String>,
    project: Option<String>,
    heading: Option<String>,
    trashed: Option<bool>,
    repeating_template: Option<String>,
    today_index: Option<f64>,
    index: Option<i64>,
    tags: Option<String>,
}

impl RawTask {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(RawTask {
            uuid: row.get(0)?,
            title: row.get(1)?,
            notes: row.get(2)?,
            status: row.get(3)?,
            kind: row.get(4)?,
            start: row.get(5)?,
            scheduled: row.get(6)?,
            deadline: row.get(7)?,
            deadline_suppression: row.get(8)?,
            created: row.get(9)?,
            modified: row.get(10)?,
            stopped: row.get(11)?,
            area: row.get(12)?,
            project: row.get(13)?,
            heading: row.get(14)?,
            trashed: row.get(15)?,
            repeating_template: row.get(16)?,
            today_index: row.get(17)?,
            index: row.get(18)?,
            tags: row.get(19)?,
        })
    }

    fn decode(self) -> EngineResult<TaskRecord> {
        let uuid = self.uuid;
        let context = |err: EngineError| match err {
            EngineError::DataIntegrity(message) => EngineError::DataIntegrity(format!("task {}: {}", uuid, message)),
            other => other,
        };
        let required = |value: Option<i64>, column: &str| {
            value.ok_or_else(|| EngineError::DataIntegrity(format!("task {}: {} is NULL", uuid, column)))
        };

        let status = TaskStatus::from_code(required(self.status, "status")?).map_err(context)?;
        let start = StartBucket::from_code(required(self.start, "start")?).map_err(context)?;
        let placement = Placement::from_columns(required(self.kind, "type")?, non_empty(self.area), non_empty(self.project), non_empty(self.heading))
            .map_err(context)?;

        let mut tags: Vec<String> = self
            .tags
            .map(|joined| joined.split(TAG_SEPARATOR).filter(|t| !t.is_empty()).map(str::to_string).collect())
            .unwrap_or_default();
        tags.sort();
        tags.dedup();

        Ok(TaskRecord {
            title: self.title.unwrap_or_default(),
            notes: self.notes.filter(|n| !n.is_empty()),
            status,
            start,
            placement,
            scheduled: PackedDate::from_column(self.scheduled).map_err(context)?,
            deadline: PackedDate::from_column(self.deadline).map_err(context)?,
            deadline_suppressed: self.deadline_suppression.is_some_and(|v| v != 0),
            created: decode_instant(self.created).map_err(context)?,
            modified: decode_instant(self.modified).map_err(context)?,
            completed: decode_instant(self.stopped).map_err(context)?,
            trashed: self.trashed.unwrap_or(false),
            repeating_template: non_empty(self.repeating_template),
            today_index: self.today_index,
            index: self.index.unwrap_or(0),
            tags,
            uuid,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub struct Tasks<'c> {
    conn: &'c Connection,
}

impl<'c> Tasks<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Tasks { conn }
    }

    /// Loads and decodes every row matching `filter`.
    ///
    /// A single undecodable row fails the whole load.
    pub fn load(&self, filter: &TaskFilter) -> EngineResult<Vec<TaskRecord>> {
        let (sql, values) = filter.to_sql();
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), RawTask::from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.decode()?);
        }
        Ok(records)
    }

    /// A single live record of any kind.
    pub fn get(&self, uuid: &str) -> EngineResult<Option<TaskRecord>> {
        let filter = TaskFilter {
            uuid: Some(uuid.to_string()),
            ..TaskFilter::default()
        };
        Ok(self.load(&filter)?.into_iter().next())
    }

    pub fn containers(&self) -> EngineResult<Vec<TaskRecord>> {
        self.load(&TaskFilter::containers())
    }
}
