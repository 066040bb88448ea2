use crate::libs::error::EngineResult;
use crate::libs::task::TagRecord;
use rusqlite::{params, Connection, OptionalExtension};

const SELECT_ALL_TAGS: &str = "SELECT uuid, title, shortcut FROM TMTag ORDER BY title";
const SELECT_TAG_BY_ID: &str = "SELECT uuid, title, shortcut FROM TMTag WHERE uuid = ?1";
const SELECT_TAG_LINKS: &str = "SELECT tags, tasks FROM TMTaskTag";

pub struct Tags<'c> {
    conn: &'c Connection,
}

impl<'c> Tags<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Tags { conn }
    }

    /// Get all tags
    pub fn list(&self) -> EngineResult<Vec<TagRecord>> {
        let mut stmt = self.conn.prepare(SELECT_ALL_TAGS)?;
        let tag_iter = stmt.query_map([], |row| {
            Ok(TagRecord {
                uuid: row.get(0)?,
                title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                shortcut: row.get::<_, Option<String>>(2)?.filter(|s| !s.is_empty()),
            })
        })?;

        let mut tags = Vec::new();
        for tag in tag_iter {
            tags.push(tag?);
        }
        Ok(tags)
    }

    /// Get a tag by ID
    pub fn get_by_id(&self, uuid: &str) -> EngineResult<Option<TagRecord>> {
        self.conn
            .query_row(SELECT_TAG_BY_ID, params![uuid], |row| {
                Ok(TagRecord {
                    uuid: row.get(0)?,
                    title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    shortcut: row.get::<_, Option<String>>(2)?.filter(|s| !s.is_empty()),
                })
            })
            .optional()
            .map_err(Into::into)
    }

    /// (tag, task) pairs from the join table.
    pub fn links(&self) -> EngineResult<Vec<(String, String)>> {
        let mut stmt = self.conn.prepare(SELECT_TAG_LINKS)?;
        let link_iter = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut links = Vec::new();
        for link in link_iter {
            links.push(link?);
        }
        Ok(links)
    }
}
