//! A store double that records every call the facade makes and answers
//! with canned replies.

use crate::collection::{Document, DocumentRef, ObjectId};
use crate::common::{DocumentCursor, Value, DOC_ID, REPLY_OK, REPLY_RESULT};
use crate::errors::FacadeResult;
use crate::index::{IndexCreateOptions, IndexFields};
use crate::store::{
    FindAndModifyOptions, FindOptions, InsertOptions, ReadTimeout, SaveOptions, StoreCollection,
    StoreCollectionProvider, StoreDatabaseProvider, UpdateOptions, WriteResult,
};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StoreCall {
    Find(Document, FindOptions),
    FindOne(Document),
    Insert(Document, InsertOptions),
    BatchInsert(Vec<Document>, InsertOptions),
    Save(Document, SaveOptions),
    Update(Document, Document, UpdateOptions),
    Remove(Document),
    Count(Document),
    DropCollection,
    Aggregate(Vec<Document>, ReadTimeout),
    CreateIndex(IndexFields, IndexCreateOptions),
    DeleteIndex(IndexFields),
    DeleteIndexes,
    FindAndModify(Document, Document, Document),
    CreateRef(Value),
    GetRef(DocumentRef),
}

type AggregateHandler = dyn Fn(&[Document], ReadTimeout) -> FacadeResult<Document> + Send + Sync;

struct Replies {
    find_one: Option<Document>,
    accept_saves: bool,
    get_ref: Option<Document>,
    aggregate: Arc<AggregateHandler>,
}

#[derive(Clone)]
pub(crate) struct RecordingCollection {
    inner: Arc<RecordingCollectionInner>,
}

struct RecordingCollectionInner {
    name: String,
    database_name: String,
    calls: Mutex<Vec<StoreCall>>,
    replies: Mutex<Replies>,
}

impl RecordingCollection {
    fn new(name: &str, database_name: &str) -> Self {
        let empty_reply: Arc<AggregateHandler> = Arc::new(|_: &[Document], _: ReadTimeout| -> FacadeResult<Document> {
            let mut reply = Document::new();
            reply.put(REPLY_OK, 1.0);
            reply.put(REPLY_RESULT, Vec::<Value>::new());
            Ok(reply)
        });

        RecordingCollection {
            inner: Arc::new(RecordingCollectionInner {
                name: name.to_string(),
                database_name: database_name.to_string(),
                calls: Mutex::new(Vec::new()),
                replies: Mutex::new(Replies {
                    find_one: None,
                    accept_saves: true,
                    get_ref: None,
                    aggregate: empty_reply,
                }),
            }),
        }
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.inner.calls.lock().clone()
    }

    pub fn last_call(&self) -> Option<StoreCall> {
        self.inner.calls.lock().last().cloned()
    }

    pub fn reply_find_one(&self, document: Option<Document>) {
        self.inner.replies.lock().find_one = document;
    }

    pub fn reply_get_ref(&self, document: Option<Document>) {
        self.inner.replies.lock().get_ref = document;
    }

    pub fn reject_saves(&self) {
        self.inner.replies.lock().accept_saves = false;
    }

    pub fn on_aggregate<F>(&self, handler: F)
    where
        F: Fn(&[Document], ReadTimeout) -> FacadeResult<Document> + Send + Sync + 'static,
    {
        self.inner.replies.lock().aggregate = Arc::new(handler);
    }

    fn record(&self, call: StoreCall) {
        self.inner.calls.lock().push(call);
    }
}

impl StoreCollectionProvider for RecordingCollection {
    fn name(&self) -> String {
        self.inner.name.clone()
    }

    fn database_name(&self) -> String {
        self.inner.database_name.clone()
    }

    fn find(&self, filter: &Document, options: &FindOptions) -> FacadeResult<DocumentCursor> {
        self.record(StoreCall::Find(filter.clone(), options.clone()));
        Ok(DocumentCursor::empty())
    }

    fn find_one(&self, filter: &Document) -> FacadeResult<Option<Document>> {
        self.record(StoreCall::FindOne(filter.clone()));
        Ok(self.inner.replies.lock().find_one.clone())
    }

    fn insert(&self, document: Document, options: &InsertOptions) -> FacadeResult<WriteResult> {
        self.record(StoreCall::Insert(document, *options));
        Ok(WriteResult::acknowledged(1))
    }

    fn batch_insert(&self, documents: Vec<Document>, options: &InsertOptions) -> FacadeResult<WriteResult> {
        let n = documents.len() as u64;
        self.record(StoreCall::BatchInsert(documents, *options));
        Ok(WriteResult::acknowledged(n))
    }

    fn save(&self, document: &mut Document, options: &SaveOptions) -> FacadeResult<bool> {
        self.record(StoreCall::Save(document.clone(), *options));
        if !self.inner.replies.lock().accept_saves {
            return Ok(false);
        }
        if document.id().is_none() {
            document.put(DOC_ID, ObjectId::new());
        }
        Ok(true)
    }

    fn update(&self, filter: &Document, update: &Document, options: &UpdateOptions) -> FacadeResult<WriteResult> {
        self.record(StoreCall::Update(filter.clone(), update.clone(), *options));
        Ok(WriteResult::acknowledged(1))
    }

    fn remove(&self, filter: &Document) -> FacadeResult<WriteResult> {
        self.record(StoreCall::Remove(filter.clone()));
        Ok(WriteResult::acknowledged(1))
    }

    fn count(&self, filter: &Document) -> FacadeResult<u64> {
        self.record(StoreCall::Count(filter.clone()));
        Ok(0)
    }

    fn drop_collection(&self) -> FacadeResult<bool> {
        self.record(StoreCall::DropCollection);
        Ok(true)
    }

    fn aggregate(&self, pipeline: &[Document], timeout: ReadTimeout) -> FacadeResult<Document> {
        self.record(StoreCall::Aggregate(pipeline.to_vec(), timeout));
        // the handler runs without the replies lock held
        let handler = self.inner.replies.lock().aggregate.clone();
        handler(pipeline, timeout)
    }

    fn create_index(&self, fields: &IndexFields, options: &IndexCreateOptions) -> FacadeResult<bool> {
        self.record(StoreCall::CreateIndex(fields.clone(), *options));
        Ok(true)
    }

    fn delete_index(&self, fields: &IndexFields) -> FacadeResult<bool> {
        self.record(StoreCall::DeleteIndex(fields.clone()));
        Ok(true)
    }

    fn delete_indexes(&self) -> FacadeResult<bool> {
        self.record(StoreCall::DeleteIndexes);
        Ok(true)
    }

    fn find_and_modify(
        &self,
        query: &Document,
        update: &Document,
        fields: &Document,
        _options: &FindAndModifyOptions,
    ) -> FacadeResult<Option<Document>> {
        self.record(StoreCall::FindAndModify(query.clone(), update.clone(), fields.clone()));
        Ok(None)
    }

    fn create_ref(&self, value: &Value) -> FacadeResult<Option<DocumentRef>> {
        self.record(StoreCall::CreateRef(value.clone()));
        let id = match value {
            Value::Document(document) => document.id().cloned(),
            Value::Null => None,
            other => Some(other.clone()),
        };
        Ok(id.map(|id| DocumentRef::new(&self.inner.name, id).with_database(&self.inner.database_name)))
    }

    fn get_ref(&self, reference: &DocumentRef) -> FacadeResult<Option<Document>> {
        self.record(StoreCall::GetRef(reference.clone()));
        Ok(self.inner.replies.lock().get_ref.clone())
    }
}

/// Database double handing out one [RecordingCollection] per name.
#[derive(Clone)]
pub(crate) struct RecordingDatabase {
    name: String,
    collections: Arc<DashMap<String, RecordingCollection>>,
}

impl RecordingDatabase {
    pub fn new(name: &str) -> Self {
        RecordingDatabase {
            name: name.to_string(),
            collections: Arc::new(DashMap::new()),
        }
    }

    /// The recorder behind the collection facade of the same name.
    pub fn recorder(&self, name: &str) -> RecordingCollection {
        self.collections
            .entry(name.to_string())
            .or_insert_with(|| RecordingCollection::new(name, &self.name))
            .clone()
    }
}

impl StoreDatabaseProvider for RecordingDatabase {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn collection(&self, name: &str) -> FacadeResult<StoreCollection> {
        Ok(StoreCollection::new(self.recorder(name)))
    }

    fn collection_names(&self) -> FacadeResult<Vec<String>> {
        let mut names: Vec<String> = self.collections.iter().map(|it| it.key().clone()).collect();
        names.sort();
        Ok(names)
    }

    fn drop_collection(&self, name: &str) -> FacadeResult<bool> {
        Ok(self.collections.remove(name).is_some())
    }
}
