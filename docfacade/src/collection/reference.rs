use crate::collection::{Document, ObjectId};
use crate::common::{Value, REF_COLLECTION, REF_DATABASE, REF_ID};
use crate::errors::FacadeResult;

/// A structural pointer from one document to another.
///
/// Stored inside documents as `{"$ref": <collection>, "$id": <id>}`,
/// optionally with `"$db"` naming another database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    collection: String,
    id: Value,
    database: Option<String>,
}

impl DocumentRef {
    pub fn new(collection: &str, id: impl Into<Value>) -> Self {
        DocumentRef {
            collection: collection.to_string(),
            id: id.into(),
            database: None,
        }
    }

    pub fn with_database(mut self, database: &str) -> Self {
        self.database = Some(database.to_string());
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn id(&self) -> &Value {
        &self.id
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// Structural recognizer: a reference is a document whose `$ref` is a
    /// string and which carries an `$id`.
    pub fn is_ref(value: &Value) -> bool {
        DocumentRef::from_value(value).is_some()
    }

    /// Reads a reference out of `value`; anything that is not a structurally
    /// valid reference yields `None`.
    pub fn from_value(value: &Value) -> Option<DocumentRef> {
        DocumentRef::from_document(value.as_document()?)
    }

    pub fn from_document(document: &Document) -> Option<DocumentRef> {
        let collection = document.get_value(REF_COLLECTION)?.as_string()?;
        let id = document.get_value(REF_ID)?;
        let database = document
            .get_value(REF_DATABASE)
            .and_then(|db| db.as_string())
            .cloned();

        Some(DocumentRef {
            collection: collection.clone(),
            id: id.clone(),
            database,
        })
    }

    /// Copy of this reference whose `$id` is a native id, parsing a textual
    /// `$id` when needed.
    ///
    /// # Errors
    ///
    /// Fails with [crate::errors::ErrorKind::InvalidIdentifier] when the
    /// `$id` cannot be read as a native id.
    pub fn with_native_id(&self) -> FacadeResult<DocumentRef> {
        if self.id.is_object_id() {
            return Ok(self.clone());
        }

        let text = match &self.id {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        Ok(DocumentRef {
            collection: self.collection.clone(),
            id: Value::ObjectId(ObjectId::parse_str(&text)?),
            database: self.database.clone(),
        })
    }

    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        document.put(REF_COLLECTION, self.collection.as_str());
        document.put(REF_ID, self.id.clone());
        if let Some(database) = &self.database {
            document.put(REF_DATABASE, database.as_str());
        }
        document
    }
}

impl From<DocumentRef> for Value {
    fn from(reference: DocumentRef) -> Self {
        Value::Document(reference.to_document())
    }
}
