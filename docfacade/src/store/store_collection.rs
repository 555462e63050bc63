use crate::collection::{Document, DocumentRef};
use crate::common::{DocumentCursor, Value};
use crate::errors::FacadeResult;
use crate::index::{IndexCreateOptions, IndexFields};
use crate::store::{
    FindAndModifyOptions, FindOptions, InsertOptions, ReadTimeout, SaveOptions, UpdateOptions,
    WriteResult,
};
use std::ops::Deref;
use std::sync::Arc;

/// Collection-level interface of a document store client.
///
/// This is the seam between the facade and a concrete store. Implementations
/// speak the store's wire protocol (or, for [crate::store::memory], keep the
/// data in process); the facade only relies on the request and response
/// shapes below.
///
/// Write primitives report rejected writes as values ([WriteResult] or
/// `false`); `Err` is reserved for transport level failures, which the
/// facade propagates untouched.
///
/// # Thread Safety
/// Implementers must be `Send + Sync`.
pub trait StoreCollectionProvider: Send + Sync {
    /// Name of the collection.
    fn name(&self) -> String;

    /// Name of the database owning the collection.
    fn database_name(&self) -> String;

    /// Documents matching `filter`, lazily.
    fn find(&self, filter: &Document, options: &FindOptions) -> FacadeResult<DocumentCursor>;

    /// First document matching `filter`.
    fn find_one(&self, filter: &Document) -> FacadeResult<Option<Document>>;

    fn insert(&self, document: Document, options: &InsertOptions) -> FacadeResult<WriteResult>;

    fn batch_insert(&self, documents: Vec<Document>, options: &InsertOptions) -> FacadeResult<WriteResult>;

    /// Inserts or replaces `document` by `_id`.
    ///
    /// A document without `_id` gets one assigned, written back into
    /// `document`. Returns `false` when the store rejected the write.
    fn save(&self, document: &mut Document, options: &SaveOptions) -> FacadeResult<bool>;

    fn update(&self, filter: &Document, update: &Document, options: &UpdateOptions) -> FacadeResult<WriteResult>;

    fn remove(&self, filter: &Document) -> FacadeResult<WriteResult>;

    fn count(&self, filter: &Document) -> FacadeResult<u64>;

    /// Drops the collection with its indexes.
    fn drop_collection(&self) -> FacadeResult<bool>;

    /// Runs an aggregation pipeline under an explicit read timeout.
    ///
    /// Returns the raw reply envelope `{ok, result[], code?, errmsg?}`.
    fn aggregate(&self, pipeline: &[Document], timeout: ReadTimeout) -> FacadeResult<Document>;

    fn create_index(&self, fields: &IndexFields, options: &IndexCreateOptions) -> FacadeResult<bool>;

    fn delete_index(&self, fields: &IndexFields) -> FacadeResult<bool>;

    /// Deletes every index except the one on `_id`.
    fn delete_indexes(&self) -> FacadeResult<bool>;

    /// Atomically finds one document and updates or removes it.
    ///
    /// Returns the pre- or post-image per [FindAndModifyOptions::is_return_new],
    /// projected on `fields` when it is not empty.
    fn find_and_modify(
        &self,
        query: &Document,
        update: &Document,
        fields: &Document,
        options: &FindAndModifyOptions,
    ) -> FacadeResult<Option<Document>>;

    /// Builds a reference to `value`: a document's `_id`, or the value
    /// itself when it is a scalar id. `None` when nothing can be referenced.
    fn create_ref(&self, value: &Value) -> FacadeResult<Option<DocumentRef>>;

    /// Loads the document a reference points to.
    fn get_ref(&self, reference: &DocumentRef) -> FacadeResult<Option<Document>>;
}

/// Cheap-to-clone handle to a store collection.
#[derive(Clone)]
pub struct StoreCollection {
    inner: Arc<dyn StoreCollectionProvider>,
}

impl StoreCollection {
    pub fn new<T: StoreCollectionProvider + 'static>(inner: T) -> Self {
        StoreCollection { inner: Arc::new(inner) }
    }
}

impl Deref for StoreCollection {
    type Target = Arc<dyn StoreCollectionProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
