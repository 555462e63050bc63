//! The store-client seam.
//!
//! The facade talks to a document store exclusively through
//! [StoreDatabaseProvider] and [StoreCollectionProvider]. Each provider trait
//! comes with a cheap-to-clone wrapper ([StoreDatabase], [StoreCollection])
//! that dereferences to it.
//!
//! # Backends
//!
//! - [memory::InMemoryStore]: a process-local store for tests and embedded use
//!
//! # Options
//!
//! Write primitives take an acknowledgment level ([WriteConcern]); reads take
//! a [ReadTimeout] passed explicitly per call.

mod find_options;
pub mod memory;
mod read_timeout;
#[cfg(test)]
pub(crate) mod recording;
mod store_collection;
mod store_database;
mod update_options;
mod write_options;
mod write_result;

pub use find_options::*;
pub use read_timeout::*;
pub use store_collection::*;
pub use store_database::*;
pub use update_options::*;
pub use write_options::*;
pub use write_result::*;
