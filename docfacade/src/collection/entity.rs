use crate::collection::{Document, DocumentId};
use crate::common::{Value, DOC_ID};
use std::fmt::Display;

/// A typed view over one raw document.
///
/// An entity is a snapshot: it owns a copy of the document's fields and the
/// name of the collection that produced it. Read operations construct a
/// fresh entity, write operations read its raw data and hand back a new
/// snapshot, so the facade never keeps or mutates caller-held entities.
///
/// An entity built from an absent document is empty; check
/// [Entity::is_empty] after lookups that may miss.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entity {
    data: Document,
    collection: Option<String>,
}

impl Entity {
    /// Wraps a raw document that is not bound to any collection.
    pub fn from_raw(data: Document) -> Self {
        Entity {
            data,
            collection: None,
        }
    }

    /// Wraps a raw document read from `collection`. `None` yields an empty
    /// entity.
    pub fn bound(data: Option<Document>, collection: &str) -> Self {
        Entity {
            data: data.unwrap_or_default(),
            collection: Some(collection.to_string()),
        }
    }

    /// The raw field snapshot.
    pub fn raw_data(&self) -> &Document {
        &self.data
    }

    pub fn into_raw(self) -> Document {
        self.data
    }

    /// A copy of this entity holding `data` instead of its current fields.
    pub fn with_raw_data(&self, data: Document) -> Self {
        Entity {
            data,
            collection: self.collection.clone(),
        }
    }

    /// Name of the collection the entity was read from, if any.
    pub fn collection_name(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    /// True when the entity wraps no document.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The entity's identifier when its `_id` holds a native id.
    pub fn id(&self) -> Option<DocumentId> {
        self.data
            .get_value(DOC_ID)
            .and_then(|value| value.as_object_id())
            .map(|id| DocumentId::from_object_id(*id))
    }

    pub fn get(&self, field: &str) -> Value {
        self.data.get(field)
    }

    /// Sets a field, dotted paths writing into embedded documents.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        self.data.put_path(field, value);
    }
}

impl From<Document> for Entity {
    fn from(data: Document) -> Self {
        Entity::from_raw(data)
    }
}

impl Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.data)
    }
}
