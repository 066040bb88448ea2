//! # thingsview - read-only views over a Things 3 database
//!
//! Opens the host's SQLite store read-only and answers the questions the
//! app's own sidebar answers: what is in Today, Inbox, Upcoming, Someday,
//! Anytime and the Logbook, which projects and headings belong to which
//! area, and which tags are in use.
//!
//! ## Features
//!
//! - **Virtual lists**: classification of every open task into exactly one list
//! - **Hierarchy**: area, project and heading ancestry with soft-delete cascade
//! - **Lookup**: areas, projects and tags by title, identifier or prefix
//! - **Search**: titles and notes, optionally including future repeats
//! - **Snapshot**: the whole open outline in one read transaction
//!
//! ## Usage
//!
//! ```rust,no_run
//! use thingsview::db::db::Store;
//! use thingsview::db::engine::Engine;
//! use thingsview::libs::packed_date::PackedDate;
//!
//! # fn main() -> Result<(), thingsview::libs::error::EngineError> {
//! let engine = Engine::new(Store::open("main.sqlite")?);
//! for task in engine.as_of(PackedDate::today()?).list_today()? {
//!     println!("{} {}", task.short_id(), task.record.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
