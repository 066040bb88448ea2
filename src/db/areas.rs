use crate::db::schema::SchemaInfo;
use crate::libs::error::EngineResult;
use crate::libs::task::AreaRecord;
use rusqlite::Connection;

const SELECT_AREAS: &str = r#"SELECT uuid, title, visible, "index", 0 FROM TMArea ORDER BY "index""#;
const SELECT_AREAS_WITH_TRASH: &str = r#"SELECT uuid, title, visible, "index", trashed FROM TMArea ORDER BY "index""#;

pub struct Areas<'c> {
    conn: &'c Connection,
    schema: SchemaInfo,
}

impl<'c> Areas<'c> {
    pub fn new(conn: &'c Connection, schema: SchemaInfo) -> Self {
        Areas { conn, schema }
    }

    /// All areas, hidden and trashed ones included, ordered by `index`.
    pub fn list(&self) -> EngineResult<Vec<AreaRecord>> {
        let sql = if self.schema.area_trashed { SELECT_AREAS_WITH_TRASH } else { SELECT_AREAS };
        let mut stmt = self.conn.prepare(sql)?;
        let area_iter = stmt.query_map([], |row| {
            Ok(AreaRecord {
                uuid: row.get(0)?,
                title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                // NULL means the user never toggled visibility.
                visible: row.get::<_, Option<i64>>(2)?.map_or(true, |v| v != 0),
                index: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
                trashed: row.get::<_, Option<i64>>(4)?.is_some_and(|v| v != 0),
            })
        })?;

        let mut areas = Vec::new();
        for area in area_iter {
            areas.push(area?);
        }
        Ok(areas)
    }
}
