use smallvec::SmallVec;

use crate::collection::Document;
use crate::common::{Value, NAMESPACE_SEPARATOR};

/// Path segments of a dotted field name; most paths are shallow.
pub type FieldPath<'a> = SmallVec<[&'a str; 4]>;

/// Splits a dotted field name (`"address.city"`) into its segments.
pub fn split_path(field: &str) -> FieldPath<'_> {
    field.split('.').collect()
}

/// Builds the `<database>.<collection>` namespace string stored in index
/// descriptors.
pub fn namespace(database: &str, collection: &str) -> String {
    format!("{}{}{}", database, NAMESPACE_SEPARATOR, collection)
}

/// Creates a document with a single key-value pair.
pub fn create_document(key: &str, value: impl Into<Value>) -> Document {
    let mut doc = Document::new();
    doc.put(key, value);
    doc
}
