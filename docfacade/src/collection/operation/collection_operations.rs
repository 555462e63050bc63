use super::{
    aggregate_operations::AggregateOperations, index_operations::IndexOperations,
    read_operations::ReadOperations, reference_operations::ReferenceOperations,
    write_operations::{RemoveTarget, WriteOperations},
};
use crate::collection::{Document, DocumentRef, Entity, Identifier, Query};
use crate::common::{DocumentCursor, Value};
use crate::database::Database;
use crate::errors::FacadeResult;
use crate::index::{IndexFields, IndexParams};
use crate::store::{
    FindAndModifyOptions, FindOptions, InsertOptions, ReadTimeout, SaveOptions, StoreCollection,
    UpdateOptions, WriteResult,
};

pub(crate) struct CollectionOperations {
    store: StoreCollection,
    database: Database,
    index_operations: IndexOperations,
    read_operations: ReadOperations,
    write_operations: WriteOperations,
    reference_operations: ReferenceOperations,
    aggregate_operations: AggregateOperations,
}

impl CollectionOperations {
    pub fn new(store: StoreCollection, database: Database) -> Self {
        let index_operations = IndexOperations::new(store.clone(), database.clone());
        let read_operations = ReadOperations::new(store.clone(), database.clone());
        let write_operations = WriteOperations::new(store.clone(), database.clone());
        let reference_operations = ReferenceOperations::new(store.clone());
        let aggregate_operations = AggregateOperations::new(store.clone(), database.config().clone());

        CollectionOperations {
            store,
            database,
            index_operations,
            read_operations,
            write_operations,
            reference_operations,
            aggregate_operations,
        }
    }

    pub fn name(&self) -> String {
        self.store.name()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn ensure_index(&self, fields: IndexFields, params: IndexParams) -> FacadeResult<bool> {
        self.index_operations.ensure_index(fields, params)
    }

    pub fn ensure_unique_index(&self, fields: IndexFields, drop_duplicates: bool) -> FacadeResult<bool> {
        self.index_operations.ensure_unique_index(fields, drop_duplicates)
    }

    pub fn drop_index(&self, fields: IndexFields) -> FacadeResult<bool> {
        self.index_operations.drop_index(fields)
    }

    pub fn drop_indexes(&self) -> FacadeResult<bool> {
        self.index_operations.drop_indexes()
    }

    pub fn get_indexes(&self) -> FacadeResult<DocumentCursor> {
        self.index_operations.get_indexes()
    }

    pub fn get_indexed_fields(&self) -> FacadeResult<Vec<String>> {
        self.index_operations.get_indexed_fields()
    }

    pub fn find_one(&self, id: &Identifier) -> FacadeResult<Entity> {
        self.read_operations.find_one(id)
    }

    pub fn find_one_raw(&self, id: &Identifier) -> FacadeResult<Option<Document>> {
        self.read_operations.find_one_raw(id)
    }

    pub fn find(&self, filter: &Document, options: &FindOptions) -> FacadeResult<DocumentCursor> {
        self.read_operations.find(filter, options)
    }

    pub fn count(&self, filter: &Document) -> FacadeResult<u64> {
        self.read_operations.count(filter)
    }

    pub fn query(&self) -> Query {
        self.read_operations.query()
    }

    pub fn default_insert_options(&self) -> InsertOptions {
        self.write_operations.default_insert_options()
    }

    pub fn default_update_options(&self) -> UpdateOptions {
        self.write_operations.default_update_options()
    }

    pub fn insert(&self, document: Document, options: &InsertOptions) -> FacadeResult<WriteResult> {
        self.write_operations.insert(document, options)
    }

    pub fn batch_insert(&self, documents: Vec<Document>, options: &InsertOptions) -> FacadeResult<WriteResult> {
        self.write_operations.batch_insert(documents, options)
    }

    pub fn save(&self, entity: &Entity, options: &SaveOptions) -> FacadeResult<Option<Entity>> {
        self.write_operations.save(entity, options)
    }

    pub fn update(&self, filter: &Document, update: &Document, options: &UpdateOptions) -> FacadeResult<WriteResult> {
        self.write_operations.update(filter, update, options)
    }

    pub fn remove(&self, target: &RemoveTarget) -> FacadeResult<WriteResult> {
        self.write_operations.remove(target)
    }

    pub fn clear(&self) -> FacadeResult<WriteResult> {
        self.write_operations.clear()
    }

    pub fn drop_collection(&self) -> FacadeResult<bool> {
        self.write_operations.drop_collection()
    }

    pub fn find_and_modify(
        &self,
        query: &Document,
        update: &Document,
        fields: &Document,
        options: &FindAndModifyOptions,
    ) -> FacadeResult<Entity> {
        self.write_operations.find_and_modify(query, update, fields, options)
    }

    pub fn create_ref(&self, value: &Value) -> FacadeResult<Option<DocumentRef>> {
        self.reference_operations.create_ref(value)
    }

    pub fn get_ref(&self, value: &Value) -> FacadeResult<Option<Entity>> {
        self.reference_operations.get_ref(value)
    }

    pub fn aggregate(&self, pipeline: &[Document]) -> FacadeResult<Vec<Document>> {
        self.aggregate_operations.aggregate(pipeline)
    }

    pub fn timeout(&self) -> ReadTimeout {
        self.aggregate_operations.timeout()
    }

    pub fn set_timeout(&self, timeout: ReadTimeout) {
        self.aggregate_operations.set_timeout(timeout)
    }
}
