use crate::collection::{Document, Entity};
use crate::errors::FacadeResult;

type DocumentIter = Box<dyn Iterator<Item = FacadeResult<Document>> + Send>;

/// Lazy sequence of raw documents returned by queries.
///
/// Documents are pulled from the underlying store iterator on demand and
/// cached, so a cursor can be [reset](DocumentCursor::reset) and walked
/// again without re-querying.
pub struct DocumentCursor {
    underlying: Option<DocumentIter>,
    cache: Vec<FacadeResult<Document>>,
    current_index: usize,
}

impl DocumentCursor {
    pub fn new(iter: DocumentIter) -> Self {
        DocumentCursor {
            underlying: Some(iter),
            cache: Vec::new(),
            current_index: 0,
        }
    }

    /// Cursor over already materialized documents.
    pub fn from_documents(documents: Vec<Document>) -> Self {
        DocumentCursor::new(Box::new(documents.into_iter().map(Ok)))
    }

    /// Cursor that yields nothing.
    pub fn empty() -> Self {
        DocumentCursor::from_documents(Vec::new())
    }

    /// Rewinds the cursor to its first document.
    pub fn reset(&mut self) {
        self.current_index = 0;
    }

    /// Number of documents, draining the underlying iterator if needed.
    pub fn size(&mut self) -> usize {
        if self.underlying.is_some() {
            for _ in self.by_ref() {}
        }
        self.reset();
        self.cache.len()
    }

    pub fn first(&mut self) -> Option<FacadeResult<Document>> {
        self.reset();
        self.next()
    }

    /// Collects the remaining documents, stopping at the first error.
    pub fn to_vec(&mut self) -> FacadeResult<Vec<Document>> {
        self.by_ref().collect()
    }

    /// Wraps every remaining document into an [Entity] bound to `collection`.
    pub fn into_entities(self, collection: &str) -> impl Iterator<Item = FacadeResult<Entity>> + '_ {
        self.map(move |result| result.map(|doc| Entity::bound(Some(doc), collection)))
    }
}

impl Iterator for DocumentCursor {
    type Item = FacadeResult<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index < self.cache.len() {
            let result = self.cache[self.current_index].clone();
            self.current_index += 1;
            return Some(result);
        }

        if let Some(ref mut iter) = self.underlying {
            if let Some(item) = iter.next() {
                self.cache.push(item.clone());
                self.current_index += 1;
                return Some(item);
            }
            // exhausted
            self.underlying = None;
        }
        None
    }
}
