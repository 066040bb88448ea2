//! Name-or-identifier resolution.
//!
//! Users refer to areas, projects and tags by title, by full identifier or by
//! the short identifier prefix shown in listings. Resolution is generic over
//! [`RecordLookup`] so the rules can be exercised without a store; the SQLite
//! implementation lives in `db::lookup`.

use super::error::{EngineError, EngineResult};
use regex::Regex;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

/// Record kinds that can be looked up by name or identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Area,
    Project,
    Tag,
    Task,
}

impl RecordKind {
    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Area => "Area",
            RecordKind::Project => "Project",
            RecordKind::Tag => "Tag",
            RecordKind::Task => "Task",
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Existence and matching queries a backing store answers.
///
/// Implementations must skip trashed records and records of the wrong kind.
pub trait RecordLookup {
    fn exists(&self, kind: RecordKind, uuid: &str) -> EngineResult<bool>;
    fn ids_by_title(&self, kind: RecordKind, title: &str) -> EngineResult<Vec<String>>;
    fn ids_by_prefix(&self, kind: RecordKind, prefix: &str) -> EngineResult<Vec<String>>;
}

static RE_UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}$").expect("identifier pattern is valid")
});

/// Whether a string has the canonical `8-4-4-4-12` identifier shape.
pub fn looks_like_uuid(value: &str) -> bool {
    RE_UUID.is_match(value)
}

/// Resolves a title or a full identifier to exactly one identifier.
pub fn resolve<L: RecordLookup + ?Sized>(lookup: &L, kind: RecordKind, name_or_id: &str) -> EngineResult<String> {
    let id = name_or_id.trim();
    if id.is_empty() {
        return Err(EngineError::InvalidArgument(format!("{} name must not be empty", kind.label())));
    }

    if looks_like_uuid(id) {
        return if lookup.exists(kind, id)? {
            Ok(id.to_string())
        } else {
            Err(EngineError::not_found(kind.label(), id))
        };
    }

    // Titles are matched verbatim, surrounding whitespace included.
    single(kind, name_or_id, lookup.ids_by_title(kind, name_or_id)?)
}

/// Resolves a short identifier prefix to exactly one identifier.
pub fn resolve_prefix<L: RecordLookup + ?Sized>(lookup: &L, kind: RecordKind, prefix: &str) -> EngineResult<String> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(EngineError::InvalidArgument(format!("{} id prefix must not be empty", kind.label())));
    }
    single(kind, prefix, lookup.ids_by_prefix(kind, prefix)?)
}

/// Resolves either form: a full identifier or title first, then a prefix.
///
/// Used by `show` commands where the user may paste any of the three.
pub fn resolve_any<L: RecordLookup + ?Sized>(lookup: &L, kind: RecordKind, key: &str) -> EngineResult<String> {
    match resolve(lookup, kind, key) {
        Err(EngineError::NotFound { .. }) if !looks_like_uuid(key.trim()) => resolve_prefix(lookup, kind, key),
        other => other,
    }
}

fn single(kind: RecordKind, key: &str, mut matches: Vec<String>) -> EngineResult<String> {
    match matches.len() {
        0 => Err(EngineError::not_found(kind.label(), key)),
        1 => Ok(matches.remove(0)),
        count => Err(EngineError::Ambiguous {
            what: kind.label(),
            key: key.to_string(),
            count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::error::ErrorKind;

    const WORK_A: &str = "1A2B3C4D-0000-4000-8000-00000000000A";
    const WORK_B: &str = "1A2B9999-0000-4000-8000-00000000000B";

    struct Areas(Vec<(&'static str, &'static str)>);

    impl RecordLookup for Areas {
        fn exists(&self, kind: RecordKind, uuid: &str) -> EngineResult<bool> {
            Ok(kind == RecordKind::Area && self.0.iter().any(|(id, _)| *id == uuid))
        }

        fn ids_by_title(&self, _kind: RecordKind, title: &str) -> EngineResult<Vec<String>> {
            Ok(self.0.iter().filter(|(_, t)| *t == title).map(|(id, _)| id.to_string()).collect())
        }

        fn ids_by_prefix(&self, _kind: RecordKind, prefix: &str) -> EngineResult<Vec<String>> {
            Ok(self.0.iter().filter(|(id, _)| id.starts_with(prefix)).map(|(id, _)| id.to_string()).collect())
        }
    }

    fn two_work_areas() -> Areas {
        Areas(vec![(WORK_A, "Work"), (WORK_B, "Work")])
    }

    #[test]
    fn recognises_canonical_identifiers() {
        assert!(looks_like_uuid(WORK_A));
        assert!(looks_like_uuid(&WORK_A.to_lowercase()));
        assert!(!looks_like_uuid("Work"));
        assert!(!looks_like_uuid("1A2B3C4D"));
        assert!(!looks_like_uuid("1A2B3C4D-0000-4000-8000-00000000000AX"));
    }

    #[test]
    fn duplicate_titles_are_ambiguous_but_full_ids_resolve() {
        let areas = two_work_areas();
        let err = resolve(&areas, RecordKind::Area, "Work").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Ambiguous);
        assert!(err.to_string().contains("2 matches"));

        assert_eq!(resolve(&areas, RecordKind::Area, WORK_B).unwrap(), WORK_B);
    }

    #[test]
    fn titles_match_case_sensitively() {
        let areas = Areas(vec![(WORK_A, "Work")]);
        assert_eq!(resolve(&areas, RecordKind::Area, "Work").unwrap(), WORK_A);
        assert_eq!(resolve(&areas, RecordKind::Area, "work").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn titles_keep_surrounding_whitespace() {
        let areas = Areas(vec![(WORK_A, " Work "), (WORK_B, "Work")]);
        assert_eq!(resolve(&areas, RecordKind::Area, " Work ").unwrap(), WORK_A);
        assert_eq!(resolve(&areas, RecordKind::Area, "Work").unwrap(), WORK_B);
        assert_eq!(resolve(&areas, RecordKind::Area, &format!(" {} ", WORK_A)).unwrap(), WORK_A);
    }

    #[test]
    fn unknown_full_identifier_is_not_found() {
        let areas = two_work_areas();
        let err = resolve(&areas, RecordKind::Area, "FFFFFFFF-0000-4000-8000-000000000000").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn prefixes_follow_the_same_cardinality_rules() {
        let areas = two_work_areas();
        assert_eq!(resolve_prefix(&areas, RecordKind::Area, "1A2B3C").unwrap(), WORK_A);
        assert_eq!(resolve_prefix(&areas, RecordKind::Area, "1A2B").unwrap_err().kind(), ErrorKind::Ambiguous);
        assert_eq!(resolve_prefix(&areas, RecordKind::Area, "FF").unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(resolve_prefix(&areas, RecordKind::Area, "  ").unwrap_err().kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn resolve_any_falls_back_to_prefix() {
        let areas = two_work_areas();
        assert_eq!(resolve_any(&areas, RecordKind::Area, "1A2B99").unwrap(), WORK_B);
        assert_eq!(resolve_any(&areas, RecordKind::Area, "Work").unwrap_err().kind(), ErrorKind::Ambiguous);
    }

    #[test]
    fn resolution_is_deterministic() {
        let areas = two_work_areas();
        let first = resolve_prefix(&areas, RecordKind::Area, "1A2B3");
        let second = resolve_prefix(&areas, RecordKind::Area, "1A2B3");
        assert_eq!(first, second);
    }
}
