//! Read-only access to the Things SQLite store.
//!
//! [`db::Store`] owns the connections and runs every operation inside one
//! deferred read transaction; the table modules decode rows into the record
//! types of [`crate::libs::task`]; [`engine::Engine`] puts them together.
//!
//! ```rust,no_run
//! use thingsview::db::db::{QueryOptions, Store};
//! use thingsview::db::engine::Engine;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), thingsview::libs::error::EngineError> {
//! let store = Store::open("main.sqlite")?;
//! let engine = Engine::new(store).with_options(QueryOptions::default().with_timeout(Duration::from_secs(2)));
//! # Ok(())
//! # }
//! ```

pub mod areas;
pub mod db;
pub mod engine;
pub mod lookup;
pub mod schema;
pub mod tags;
pub mod tasks;
