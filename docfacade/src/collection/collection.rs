use super::operation::{CollectionOperations, RemoveTarget};
use super::{Document, DocumentRef, Entity, Identifier, Query};
use crate::common::{DocumentCursor, Value};
use crate::database::Database;
use crate::errors::FacadeResult;
use crate::index::{IndexFields, IndexParams};
use crate::store::{
    FindAndModifyOptions, FindOptions, InsertOptions, ReadTimeout, SaveOptions, StoreCollection,
    UpdateOptions, WriteResult,
};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A facade over one store collection.
///
/// Every call is forwarded to the store after its arguments are
/// normalized: index specifications and options get their canonical
/// shape, identifiers of any form become native `_id` filters, entities
/// are read and written through their raw snapshots, references are
/// resolved against their target collection and aggregations run with
/// the connection's read timeout disabled.
///
/// The facade keeps no state of its own besides the store handle, so
/// clones and separate facades over the same collection are
/// interchangeable.
///
/// # Examples
///
/// ```rust,ignore
/// use docfacade::{doc, FacadeBuilder};
/// use docfacade::collection::Collection;
///
/// let db = FacadeBuilder::new().open_in_memory("app")?;
/// let users = db.collection("users")?;
///
/// users.ensure_index("email", Collection::UNIQUE)?;
/// users.insert(doc! { name: "ada", email: "ada@example.com" })?;
///
/// let ada = users.query().eq("name", "ada").entities()?;
/// ```
#[derive(Clone)]
pub struct Collection {
    inner: Arc<CollectionOperations>,
}

impl Collection {
    /// Index parameter for a unique index.
    pub const UNIQUE: IndexParams = IndexParams::Unique;
    /// Index parameter for a unique index that drops documents with
    /// duplicate keys.
    pub const DROP_DUPLICATES: IndexParams = IndexParams::DropDuplicates;

    pub(crate) fn new(store: StoreCollection, database: Database) -> Self {
        Collection {
            inner: Arc::new(CollectionOperations::new(store, database)),
        }
    }

    pub fn name(&self) -> String {
        self.inner.name()
    }

    /// The database this collection belongs to.
    pub fn database(&self) -> Database {
        self.inner.database().clone()
    }

    /// Creates an index unless it already exists.
    ///
    /// `fields` accepts a single field name, `(field, order)` pairs or a
    /// key document; `params` accepts [Collection::UNIQUE],
    /// [Collection::DROP_DUPLICATES] or an explicit
    /// [crate::index::IndexOptions]. With the legacy unique flag enabled on
    /// the database, a unique index is sent as the bare boolean `true`.
    pub fn ensure_index(
        &self,
        fields: impl Into<IndexFields>,
        params: impl Into<IndexParams>,
    ) -> FacadeResult<bool> {
        self.inner.ensure_index(fields.into(), params.into())
    }

    pub fn ensure_unique_index(
        &self,
        fields: impl Into<IndexFields>,
        drop_duplicates: bool,
    ) -> FacadeResult<bool> {
        self.inner.ensure_unique_index(fields.into(), drop_duplicates)
    }

    pub fn drop_index(&self, fields: impl Into<IndexFields>) -> FacadeResult<bool> {
        self.inner.drop_index(fields.into())
    }

    /// Drops every index but the one on `_id`.
    pub fn drop_indexes(&self) -> FacadeResult<bool> {
        self.inner.drop_indexes()
    }

    /// Descriptors of this collection's indexes.
    pub fn get_indexes(&self) -> FacadeResult<DocumentCursor> {
        self.inner.get_indexes()
    }

    pub fn get_indexed_fields(&self) -> FacadeResult<Vec<String>> {
        self.inner.get_indexed_fields()
    }

    /// Looks a document up by identifier. The entity is empty when no
    /// document matched.
    pub fn find_one(&self, id: impl Into<Identifier>) -> FacadeResult<Entity> {
        self.inner.find_one(&id.into())
    }

    pub fn find_one_raw(&self, id: impl Into<Identifier>) -> FacadeResult<Option<Document>> {
        self.inner.find_one_raw(&id.into())
    }

    /// Saves an entity's snapshot, inserting or replacing by `_id`.
    ///
    /// Returns the stored snapshot, carrying the assigned `_id`, or `None`
    /// when the store rejected the write. The given entity is left as it
    /// was either way.
    pub fn save(&self, entity: &Entity) -> FacadeResult<Option<Entity>> {
        let options = SaveOptions::new(false, self.inner.database().config().default_write_concern());
        self.inner.save(entity, &options)
    }

    pub fn save_with(&self, entity: &Entity, options: &SaveOptions) -> FacadeResult<Option<Entity>> {
        self.inner.save(entity, options)
    }

    pub fn find_and_modify(
        &self,
        query: &Document,
        update: &Document,
        fields: &Document,
        options: &FindAndModifyOptions,
    ) -> FacadeResult<Entity> {
        self.inner.find_and_modify(query, update, fields, options)
    }

    pub fn insert(&self, document: Document) -> FacadeResult<WriteResult> {
        self.inner.insert(document, &self.inner.default_insert_options())
    }

    pub fn insert_with(&self, document: Document, options: &InsertOptions) -> FacadeResult<WriteResult> {
        self.inner.insert(document, options)
    }

    pub fn batch_insert(&self, documents: Vec<Document>) -> FacadeResult<WriteResult> {
        self.inner.batch_insert(documents, &self.inner.default_insert_options())
    }

    pub fn batch_insert_with(&self, documents: Vec<Document>, options: &InsertOptions) -> FacadeResult<WriteResult> {
        self.inner.batch_insert(documents, options)
    }

    /// Builds a reference to a document of this collection, from either
    /// the document itself or its `_id`.
    pub fn create_ref(&self, value: impl Into<Value>) -> FacadeResult<Option<DocumentRef>> {
        self.inner.create_ref(&value.into())
    }

    /// Resolves a reference value. Values that are not references yield
    /// `None`.
    pub fn get_ref(&self, value: impl Into<Value>) -> FacadeResult<Option<Entity>> {
        self.inner.get_ref(&value.into())
    }

    /// Runs an aggregation pipeline and returns its result documents.
    ///
    /// The store call runs without a read timeout. The connection's
    /// configured timeout is left unchanged, so other reads keep it.
    ///
    /// # Errors
    ///
    /// A store reply that is not ok fails with
    /// [crate::errors::ErrorKind::AggregationFailed] carrying the store's
    /// error code.
    pub fn aggregate(&self, pipeline: &[Document]) -> FacadeResult<Vec<Document>> {
        self.inner.aggregate(pipeline)
    }

    /// The connection's read timeout.
    pub fn timeout(&self) -> ReadTimeout {
        self.inner.timeout()
    }

    /// Sets the connection's read timeout, shared by every collection of
    /// the database.
    pub fn set_timeout(&self, timeout: ReadTimeout) {
        self.inner.set_timeout(timeout)
    }

    pub fn update(&self, filter: &Document, update: &Document) -> FacadeResult<WriteResult> {
        self.inner.update(filter, update, &self.inner.default_update_options())
    }

    pub fn update_with_options(
        &self,
        filter: &Document,
        update: &Document,
        options: &UpdateOptions,
    ) -> FacadeResult<WriteResult> {
        self.inner.update(filter, update, options)
    }

    pub fn find(&self, filter: &Document) -> FacadeResult<DocumentCursor> {
        self.inner.find(filter, &FindOptions::new())
    }

    pub fn find_with_options(&self, filter: &Document, options: &FindOptions) -> FacadeResult<DocumentCursor> {
        self.inner.find(filter, options)
    }

    /// Starts a fluent query over this collection.
    pub fn query(&self) -> Query {
        self.inner.query()
    }

    pub fn count(&self) -> FacadeResult<u64> {
        self.inner.count(&Document::new())
    }

    pub fn count_matching(&self, filter: &Document) -> FacadeResult<u64> {
        self.inner.count(filter)
    }

    /// Removes every document but keeps the collection and its indexes.
    pub fn clear(&self) -> FacadeResult<WriteResult> {
        self.inner.clear()
    }

    /// Removes the documents a filter matches, or the single document an
    /// entity or identifier designates.
    pub fn remove(&self, target: impl Into<RemoveTarget>) -> FacadeResult<WriteResult> {
        self.inner.remove(&target.into())
    }

    /// Drops the collection together with its indexes.
    pub fn drop(&self) -> FacadeResult<bool> {
        self.inner.drop_collection()
    }
}

impl Debug for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name())
            .field("database", &self.inner.database().name())
            .finish()
    }
}
