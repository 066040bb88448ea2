#![allow(dead_code)]

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use test_context::TestContext;
use thingsview::db::db::Store;
use thingsview::db::engine::Engine;
use thingsview::libs::packed_date::PackedDate;

pub const THINGS_SCHEMA: &str = r#"
CREATE TABLE TMArea (
    uuid TEXT PRIMARY KEY,
    title TEXT,
    visible INTEGER,
    "index" INTEGER,
    trashed INTEGER DEFAULT 0
);
CREATE TABLE TMTask (
    uuid TEXT PRIMARY KEY,
    title TEXT,
    notes TEXT,
    status INTEGER,
    type INTEGER,
    start INTEGER,
    startDate INTEGER,
    deadline INTEGER,
    deadlineSuppressionDate INTEGER,
    creationDate REAL,
    userModificationDate REAL,
    stopDate REAL,
    area TEXT,
    project TEXT,
    heading TEXT,
    trashed INTEGER DEFAULT 0,
    rt1_repeatingTemplate TEXT,
    todayIndex INTEGER,
    "index" INTEGER
);
CREATE TABLE TMTag (uuid TEXT PRIMARY KEY, title TEXT, shortcut TEXT);
CREATE TABLE TMTaskTag (tasks TEXT, tags TEXT);
"#;

/// Older stores have no `TMArea.trashed`.
pub const THINGS_SCHEMA_WITHOUT_AREA_TRASH: &str = r#"
CREATE TABLE TMArea (uuid TEXT PRIMARY KEY, title TEXT, visible INTEGER, "index" INTEGER);
CREATE TABLE TMTask (
    uuid TEXT PRIMARY KEY, title TEXT, notes TEXT, status INTEGER, type INTEGER, start INTEGER,
    startDate INTEGER, deadline INTEGER, deadlineSuppressionDate INTEGER, creationDate REAL,
    userModificationDate REAL, stopDate REAL, area TEXT, project TEXT, heading TEXT,
    trashed INTEGER DEFAULT 0, rt1_repeatingTemplate TEXT, todayIndex INTEGER, "index" INTEGER
);
CREATE TABLE TMTag (uuid TEXT PRIMARY KEY, title TEXT, shortcut TEXT);
CREATE TABLE TMTaskTag (tasks TEXT, tags TEXT);
"#;

/// The fixed "today" every fixture is classified against.
pub fn today() -> PackedDate {
    PackedDate::encode(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()).unwrap()
}

/// Packed value of today plus `offset` days.
pub fn day(offset: i64) -> i64 {
    today().add_days(offset).unwrap().raw()
}

/// One `TMTask` row under construction.
#[derive(Debug, Clone)]
pub struct TaskRow {
    uuid: String,
    title: String,
    notes: Option<String>,
    status: i64,
    kind: i64,
    start: i64,
    scheduled: Option<i64>,
    deadline: Option<i64>,
    deadline_suppressed: Option<i64>,
    stopped: Option<f64>,
    area: Option<String>,
    project: Option<String>,
    heading: Option<String>,
    trashed: bool,
    repeating_template: Option<String>,
    today_index: Option<i64>,
    index: i64,
}

impl TaskRow {
    fn new(uuid: &str, title: &str, kind: i64) -> Self {
        TaskRow {
            uuid: uuid.to_string(),
            title: title.to_string(),
            notes: None,
            status: 0,
            kind,
            start: 1,
            scheduled: None,
            deadline: None,
            deadline_suppressed: None,
            stopped: None,
            area: None,
            project: None,
            heading: None,
            trashed: false,
            repeating_template: None,
            today_index: None,
            index: 0,
        }
    }

    pub fn task(uuid: &str, title: &str) -> Self {
        Self::new(uuid, title, 0)
    }

    pub fn project(uuid: &str, title: &str) -> Self {
        Self::new(uuid, title, 1)
    }

    pub fn heading(uuid: &str, title: &str) -> Self {
        Self::new(uuid, title, 2)
    }

    pub fn inbox(mut self) -> Self {
        self.start = 0;
        self
    }

    pub fn someday(mut self) -> Self {
        self.start = 2;
        self
    }

    pub fn scheduled(mut self, offset: i64) -> Self {
        self.scheduled = Some(day(offset));
        self
    }

    pub fn raw_scheduled(mut self, raw: i64) -> Self {
        self.scheduled = Some(raw);
        self
    }

    pub fn deadline(mut self, offset: i64) -> Self {
        self.deadline = Some(day(offset));
        self
    }

    pub fn suppressed(mut self) -> Self {
        self.deadline_suppressed = Some(day(0));
        self
    }

    pub fn completed_at(mut self, seconds: f64) -> Self {
        self.status = 3;
        self.stopped = Some(seconds);
        self
    }

    pub fn canceled_at(mut self, seconds: f64) -> Self {
        self.status = 2;
        self.stopped = Some(seconds);
        self
    }

    pub fn in_area(mut self, uuid: &str) -> Self {
        self.area = Some(uuid.to_string());
        self
    }

    pub fn in_project(mut self, uuid: &str) -> Self {
        self.project = Some(uuid.to_string());
        self
    }

    pub fn under_heading(mut self, uuid: &str) -> Self {
        self.heading = Some(uuid.to_string());
        self
    }

    pub fn trashed(mut self) -> Self {
        self.trashed = true;
        self
    }

    pub fn repeating(mut self, template: &str) -> Self {
        self.repeating_template = Some(template.to_string());
        self
    }

    pub fn today_index(mut self, value: i64) -> Self {
        self.today_index = Some(value);
        self
    }

    pub fn index(mut self, value: i64) -> Self {
        self.index = value;
        self
    }

    pub fn notes(mut self, text: &str) -> Self {
        self.notes = Some(text.to_string());
        self
    }
}

/// A Things-shaped SQLite file in a temporary directory.
pub struct ThingsFixture {
    _dir: TempDir,
    path: PathBuf,
    conn: Connection,
}

impl ThingsFixture {
    pub fn new() -> Self {
        Self::with_schema(THINGS_SCHEMA)
    }

    pub fn with_schema(ddl: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.sqlite");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(ddl).unwrap();
        ThingsFixture { _dir: dir, path, conn }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn execute(&self, sql: &str) -> &Self {
        self.conn.execute_batch(sql).unwrap();
        self
    }

    pub fn area(&self, uuid: &str, title: &str) -> &Self {
        self.conn
            .execute(r#"INSERT INTO TMArea (uuid, title, visible, "index") VALUES (?1, ?2, NULL, 0)"#, params![uuid, title])
            .unwrap();
        self
    }

    pub fn hidden_area(&self, uuid: &str, title: &str) -> &Self {
        self.conn
            .execute(r#"INSERT INTO TMArea (uuid, title, visible, "index") VALUES (?1, ?2, 0, 0)"#, params![uuid, title])
            .unwrap();
        self
    }

    pub fn trashed_area(&self, uuid: &str, title: &str) -> &Self {
        self.conn
            .execute(r#"INSERT INTO TMArea (uuid, title, visible, "index", trashed) VALUES (?1, ?2, 1, 0, 1)"#, params![uuid, title])
            .unwrap();
        self
    }

    pub fn insert(&self, row: TaskRow) -> &Self {
        self.conn
            .execute(
                r#"INSERT INTO TMTask (
                    uuid, title, notes, status, type, start, startDate, deadline, deadlineSuppressionDate,
                    creationDate, userModificationDate, stopDate, area, project, heading, trashed,
                    rt1_repeatingTemplate, todayIndex, "index"
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)"#,
                params![
                    row.uuid,
                    row.title,
                    row.notes,
                    row.status,
                    row.kind,
                    row.start,
                    row.scheduled,
                    row.deadline,
                    row.deadline_suppressed,
                    1_700_000_000.0_f64,
                    1_700_000_000.0_f64,
                    row.stopped,
                    row.area,
                    row.project,
                    row.heading,
                    row.trashed,
                    row.repeating_template,
                    row.today_index,
                    row.index,
                ],
            )
            .unwrap();
        self
    }

    pub fn tag(&self, uuid: &str, title: &str) -> &Self {
        self.conn
            .execute("INSERT INTO TMTag (uuid, title, shortcut) VALUES (?1, ?2, NULL)", params![uuid, title])
            .unwrap();
        self
    }

    pub fn tag_task(&self, tag: &str, task: &str) -> &Self {
        self.conn
            .execute("INSERT INTO TMTaskTag (tasks, tags) VALUES (?1, ?2)", params![task, tag])
            .unwrap();
        self
    }

    pub fn engine(&self) -> Engine {
        Engine::new(Store::open(&self.path).unwrap())
    }
}

/// Points `HOME` and `LOCALAPPDATA` at a scratch directory and provides an
/// empty Things store.
pub struct ThingsTestContext {
    _home: TempDir,
    pub fixture: ThingsFixture,
}

impl TestContext for ThingsTestContext {
    fn setup() -> Self {
        let home = tempfile::tempdir().unwrap();
        std::env::set_var("HOME", home.path());
        std::env::set_var("LOCALAPPDATA", home.path());
        ThingsTestContext {
            _home: home,
            fixture: ThingsFixture::new(),
        }
    }
}

pub fn titles(tasks: &[thingsview::libs::task::ClassifiedTask]) -> Vec<&str> {
    tasks.iter().map(|task| task.record.title.as_str()).collect()
}
