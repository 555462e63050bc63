//! Documents, identifiers, entities and the collection facade.
//!
//! # Documents
//!
//! A [Document] is an ordered map of field names to [crate::common::Value]s.
//! Dotted paths address embedded documents.
//!
//! ```rust,ignore
//! use docfacade::doc;
//!
//! let mut user = doc! { name: "ada", address: { city: "london" } };
//! user.put_path("address.zip", "NW1");
//! assert_eq!(user.get("address.city"), "london".into());
//! ```
//!
//! # Identifiers
//!
//! Documents are keyed by `_id`. An [Identifier] accepts the facade's
//! [DocumentId], the store's native [ObjectId] or the 24 hex digit text of
//! either; all three produce the same `{_id: <native>}` filter.
//!
//! # Entities and references
//!
//! An [Entity] is a typed snapshot of one document together with the name
//! of the collection it came from. A [DocumentRef] points at a document of
//! a (possibly different) collection and database.
//!
//! # Collections
//!
//! [Collection] is the facade itself, obtained from
//! [crate::Database::collection]:
//!
//! ```rust,ignore
//! let users = db.collection("users")?;
//! users.ensure_index("email", Collection::UNIQUE)?;
//!
//! let saved = users.save(&Entity::from_raw(doc! { name: "ada" }))?;
//! let again = users.find_one(saved.and_then(|e| e.id()).unwrap())?;
//! ```

mod collection;
mod document;
mod entity;
mod identifier;
mod object_id;
pub(crate) mod operation;
mod query;
mod reference;

pub use collection::*;
pub use document::*;
pub use entity::*;
pub use identifier::*;
pub use object_id::*;
pub use operation::RemoveTarget;
pub use query::*;
pub use reference::*;
