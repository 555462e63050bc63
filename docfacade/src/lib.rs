//! # docfacade - typed collection facade over document stores
//!
//! `docfacade` puts a uniform, strongly typed collection API in front of a
//! document store. The facade does not store anything itself: it
//! normalizes what callers hand it and forwards each call to the store.
//!
//! ## Key Features
//!
//! - **Index management**: key specifications given as a field name, field
//!   and order pairs or a key document, option modes given as flags or an
//!   explicit option set, with an optional legacy boolean encoding for
//!   unique indexes
//! - **Identifiers**: canonical ids, native ids and their textual form all
//!   resolve to the same `_id` filter
//! - **Entities**: typed snapshots that are read and written through their
//!   raw documents
//! - **References**: `{$ref, $id, $db}` values are recognized, created and
//!   followed to their target collection
//! - **Scoped aggregation**: pipelines run without a read timeout while the
//!   connection keeps its configured timeout for every other call
//! - **In-memory store**: a complete store backend for embedding and tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docfacade::{doc, FacadeBuilder};
//! use docfacade::collection::Collection;
//!
//! let db = FacadeBuilder::new().open_in_memory("app")?;
//! let users = db.collection("users")?;
//!
//! users.ensure_index("email", Collection::UNIQUE)?;
//! users.insert(doc! { name: "ada", email: "ada@example.com" })?;
//!
//! let totals = users.aggregate(&[
//!     doc! { "$match": { name: "ada" } },
//!     doc! { "$count": "n" },
//! ])?;
//! ```
//!
//! ## Design Pattern
//!
//! Public handles (`Database`, `Collection`, `FacadeConfig`, store
//! wrappers) are thin `Arc` wrappers around a hidden inner type. Clones
//! share state, so a handle can be passed across threads freely.
//!
//! ## Module Organization
//!
//! - [`collection`] - documents, identifiers, entities, references and the
//!   collection facade
//! - [`common`] - values, constants, cursors and shared utilities
//! - [`errors`] - error types and result definitions
//! - [`index`] - index key specifications and options
//! - [`store`] - the store contract and the in-memory backend
//! - [`database`] - database handle
//! - [`facade_builder`] - database builder
//! - [`facade_config`] - connection-scoped configuration

pub mod collection;
pub mod common;
pub mod database;
pub mod errors;
pub mod facade_builder;
pub mod facade_config;
pub mod index;
pub mod store;

pub use database::Database;
pub use facade_builder::FacadeBuilder;
pub use facade_config::FacadeConfig;

#[cfg(test)]
#[ctor::ctor]
fn init() {
    colog::init();
}
