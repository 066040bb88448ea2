//! Domain logic that needs no database: the packed date codec, record types,
//! classification, hierarchy walking, identifier resolution and query
//! composition, plus the CLI's configuration, messages and tables.
//!
//! Everything above the store is pure and takes "today" as an argument, so
//! the same inputs always classify the same way.

pub mod classifier;
pub mod config;
pub mod data_storage;
pub mod error;
pub mod hierarchy;
pub mod messages;
pub mod packed_date;
pub mod query;
pub mod resolver;
pub mod task;
pub mod view;
