//! [`RecordLookup`] over a store snapshot.
//!
//! Resolution queries run inside the same read transaction as the listing
//! that uses their result.

use crate::db::db::Snapshot;
use crate::libs::error::EngineResult;
use crate::libs::resolver::{RecordKind, RecordLookup};
use rusqlite::{params, OptionalExtension};

impl Snapshot<'_> {
    fn scope(&self, kind: RecordKind) -> (&'static str, &'static str) {
        match kind {
            RecordKind::Area if self.schema().area_trashed => ("TMArea", " AND trashed = 0"),
            RecordKind::Area => ("TMArea", ""),
            RecordKind::Project => ("TMTask", " AND type = 1 AND trashed = 0"),
            RecordKind::Tag => ("TMTag", ""),
            RecordKind::Task => ("TMTask", " AND trashed = 0"),
        }
    }

    fn matching_ids(&self, kind: RecordKind, predicate: &str, value: &str) -> EngineResult<Vec<String>> {
        let (table, live) = self.scope(kind);
        let sql = format!("SELECT uuid FROM {} WHERE {}{} ORDER BY uuid", table, predicate, live);
        let mut stmt = self.conn().prepare(&sql)?;
        let id_iter = stmt.query_map(params![value], |row| row.get::<_, String>(0))?;

        let mut ids = Vec::new();
        for id in id_iter {
            ids.push(id?);
        }
        Ok(ids)
    }
}

impl RecordLookup for Snapshot<'_> {
    fn exists(&self, kind: RecordKind, uuid: &str) -> EngineResult<bool> {
        let (table, live) = self.scope(kind);
        let sql = format!("SELECT 1 FROM {} WHERE uuid = ?1{}", table, live);
        let found: Option<i64> = self.conn().query_row(&sql, params![uuid], |row| row.get(0)).optional()?;
        Ok(found.is_some())
    }

    fn ids_by_title(&self, kind: RecordKind, title: &str) -> EngineResult<Vec<String>> {
        self.matching_ids(kind, "title = ?1", title)
    }

    fn ids_by_prefix(&self, kind: RecordKind, prefix: &str) -> EngineResult<Vec<String>> {
        self.matching_ids(kind, "substr(uuid, 1, length(?1)) = ?1", prefix)
    }
}
