use crate::collection::{Document, ObjectId};
use crate::common::{Value, DOC_ID};
use crate::errors::FacadeResult;
use std::fmt::Display;

/// The facade's own identifier type, wrapping the store's native [ObjectId].
///
/// Entities hand out `DocumentId`s so application code does not depend on
/// the store client's identifier type directly.
#[derive(PartialEq, Eq, Ord, PartialOrd, Hash, Clone, Copy, Debug, Default)]
pub struct DocumentId {
    object_id: ObjectId,
}

impl DocumentId {
    /// Creates a fresh identifier.
    pub fn new() -> Self {
        DocumentId {
            object_id: ObjectId::new(),
        }
    }

    pub fn from_object_id(object_id: ObjectId) -> Self {
        DocumentId { object_id }
    }

    /// Parses the hexadecimal form.
    pub fn parse_str(value: &str) -> FacadeResult<Self> {
        Ok(DocumentId {
            object_id: ObjectId::parse_str(value)?,
        })
    }

    /// The wrapped native identifier.
    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.object_id)
    }
}

impl From<ObjectId> for DocumentId {
    fn from(object_id: ObjectId) -> Self {
        DocumentId::from_object_id(object_id)
    }
}

impl From<DocumentId> for Value {
    fn from(id: DocumentId) -> Self {
        Value::ObjectId(id.object_id)
    }
}

/// Any of the three forms an identifier can be given in.
///
/// All three normalize to the same native [ObjectId] through
/// [Identifier::resolve], so lookups behave the same whichever form the
/// caller holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// The facade's wrapped identifier.
    Canonical(DocumentId),
    /// The store's native identifier.
    Native(ObjectId),
    /// A textual identifier, parsed on resolution.
    Raw(String),
}

impl Identifier {
    /// Normalizes the identifier into its native form.
    ///
    /// # Errors
    ///
    /// [Identifier::Raw] values that are not a valid native id fail with
    /// [crate::errors::ErrorKind::InvalidIdentifier].
    pub fn resolve(&self) -> FacadeResult<ObjectId> {
        match self {
            Identifier::Canonical(id) => Ok(id.object_id()),
            Identifier::Native(id) => Ok(*id),
            Identifier::Raw(text) => ObjectId::parse_str(text),
        }
    }

    /// The `{_id: <native id>}` equality filter for this identifier.
    pub fn to_filter(&self) -> FacadeResult<Document> {
        let mut filter = Document::new();
        filter.put(DOC_ID, self.resolve()?);
        Ok(filter)
    }
}

impl From<DocumentId> for Identifier {
    fn from(id: DocumentId) -> Self {
        Identifier::Canonical(id)
    }
}

impl From<&DocumentId> for Identifier {
    fn from(id: &DocumentId) -> Self {
        Identifier::Canonical(*id)
    }
}

impl From<ObjectId> for Identifier {
    fn from(id: ObjectId) -> Self {
        Identifier::Native(id)
    }
}

impl From<&str> for Identifier {
    fn from(id: &str) -> Self {
        Identifier::Raw(id.to_string())
    }
}

impl From<String> for Identifier {
    fn from(id: String) -> Self {
        Identifier::Raw(id)
    }
}
