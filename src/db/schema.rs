//! The host application's table contract.
//!
//! The engine never creates or migrates anything. On open it checks that the
//! tables and columns it reads are present, so a Things update that renames a
//! column fails loudly instead of producing empty lists.

use crate::libs::error::{EngineError, EngineResult};
use rusqlite::Connection;
use std::collections::HashSet;

pub const TASK_TABLE: &str = "TMTask";
pub const AREA_TABLE: &str = "TMArea";
pub const TAG_TABLE: &str = "TMTag";
pub const TASK_TAG_TABLE: &str = "TMTaskTag";

const REQUIRED: &[(&str, &[&str])] = &[
    (
        TASK_TABLE,
        &[
            "uuid",
            "title",
            "notes",
            "status",
            "type",
            "start",
            "startDate",
            "deadline",
            "deadlineSuppressionDate",
            "creationDate",
            "userModificationDate",
            "stopDate",
            "area",
            "project",
            "heading",
            "trashed",
            "rt1_repeatingTemplate",
            "todayIndex",
            "index",
        ],
    ),
    (AREA_TABLE, &["uuid", "title", "visible", "index"]),
    (TAG_TABLE, &["uuid", "title", "shortcut"]),
    (TASK_TAG_TABLE, &["tasks", "tags"]),
];

const SELECT_COLUMNS: &str = "SELECT name FROM pragma_table_info(?1)";

/// Optional parts of the schema detected at open time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaInfo {
    /// `TMArea.trashed` exists in this store version.
    pub area_trashed: bool,
}

/// Checks every required table and column, reporting the first one missing.
pub fn verify_schema(conn: &Connection) -> EngineResult<SchemaInfo> {
    for (table, columns) in REQUIRED {
        let present = table_columns(conn, table)?;
        if present.is_empty() {
            return Err(EngineError::StoreUnavailable(format!("required table {} is missing", table)));
        }
        if let Some(missing) = columns.iter().find(|column| !present.contains(**column)) {
            return Err(EngineError::StoreUnavailable(format!("required column {}.{} is missing", table, missing)));
        }
    }

    let area_columns = table_columns(conn, AREA_TABLE)?;
    Ok(SchemaInfo {
        area_trashed: area_columns.contains("trashed"),
    })
}

fn table_columns(conn: &Connection, table: &str) -> EngineResult<HashSet<String>> {
    let mut stmt = conn.prepare(SELECT_COLUMNS)?;
    let names = stmt.query_map([table], |row| row.get::<_, String>(0))?;

    let mut columns = HashSet::new();
    for name in names {
        columns.insert(name?);
    }
    Ok(columns)
}
