//! Process-local implementation of the store-client seam.
//!
//! Supports the query, update and aggregation subset the facade relies on,
//! unique indexes and the `system.indexes` catalog.

mod collection;
mod database;
mod matcher;
mod pipeline;
mod projection;
mod store;
mod updater;

pub use collection::*;
pub use database::*;
pub use store::*;
