use crate::collection::{Document, DocumentRef, ObjectId};
use crate::common::{
    atomic, namespace, Atomic, DocumentCursor, ReadExecutor, Value, WriteExecutor, DOC_ID,
    ERR_DUPLICATE_KEY, ID_INDEX_NAME, INDEX_KEY, INDEX_NAME, INDEX_NAMESPACE, INDEX_VERSION,
};
use crate::errors::{ErrorKind, FacadeError, FacadeResult};
use crate::index::{IndexCreateOptions, IndexFields, IndexOptions};
use crate::store::memory::database::InMemoryDatabaseInner;
use crate::store::memory::matcher::matches;
use crate::store::memory::pipeline::run_pipeline;
use crate::store::memory::projection::{project, sort_documents};
use crate::store::memory::updater::{apply_update, is_operator_update, upsert_seed};
use crate::store::{
    FindAndModifyOptions, FindOptions, InsertOptions, ReadTimeout, SaveOptions,
    StoreCollectionProvider, UpdateOptions, WriteConcern, WriteResult,
};
use im::OrdMap;
use indexmap::IndexMap;
use itertools::Itertools;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Instant;

type DocumentMap = OrdMap<Value, Document>;

#[derive(Clone)]
struct IndexEntry {
    fields: IndexFields,
    options: IndexOptions,
}

/// A collection of the in-memory store.
///
/// Documents are kept in a persistent ordered map keyed by `_id`, so reads
/// work on a cheap snapshot while writers replace the map under a lock.
/// Index definitions are kept locally for unique-key enforcement and
/// mirrored as descriptors into the database's `system.indexes` catalog.
#[derive(Clone)]
pub struct InMemoryCollection {
    inner: Arc<InMemoryCollectionInner>,
}

impl InMemoryCollection {
    pub(crate) fn new(
        name: &str,
        database_name: &str,
        database: Weak<InMemoryDatabaseInner>,
        catalog: Option<InMemoryCollection>,
    ) -> Self {
        InMemoryCollection {
            inner: Arc::new(InMemoryCollectionInner {
                name: name.to_string(),
                database_name: database_name.to_string(),
                database,
                catalog,
                documents: atomic(OrdMap::new()),
                indexes: atomic(IndexMap::new()),
                materialized: AtomicBool::new(false),
            }),
        }
    }

    /// True once the collection received its first write or index.
    pub(crate) fn is_materialized(&self) -> bool {
        self.inner.materialized.load(Ordering::Acquire)
    }

    /// Removes every document and index, leaving the handle usable.
    pub(crate) fn purge(&self) -> FacadeResult<bool> {
        self.inner.purge()
    }

    /// Removes matching documents without write-concern handling; used
    /// for catalog maintenance.
    pub(crate) fn remove_matching(&self, filter: &Document) -> FacadeResult<u64> {
        self.inner.remove_matching(filter)
    }
}

impl StoreCollectionProvider for InMemoryCollection {
    fn name(&self) -> String {
        self.inner.name.clone()
    }

    fn database_name(&self) -> String {
        self.inner.database_name.clone()
    }

    fn find(&self, filter: &Document, options: &FindOptions) -> FacadeResult<DocumentCursor> {
        self.inner.find(filter, options)
    }

    fn find_one(&self, filter: &Document) -> FacadeResult<Option<Document>> {
        self.inner.find_one(filter)
    }

    fn insert(&self, document: Document, options: &InsertOptions) -> FacadeResult<WriteResult> {
        self.inner.batch_insert(vec![document], options.write_concern())
    }

    fn batch_insert(&self, documents: Vec<Document>, options: &InsertOptions) -> FacadeResult<WriteResult> {
        self.inner.batch_insert(documents, options.write_concern())
    }

    fn save(&self, document: &mut Document, options: &SaveOptions) -> FacadeResult<bool> {
        self.inner.save(document, options)
    }

    fn update(&self, filter: &Document, update: &Document, options: &UpdateOptions) -> FacadeResult<WriteResult> {
        self.inner.update(filter, update, options)
    }

    fn remove(&self, filter: &Document) -> FacadeResult<WriteResult> {
        let removed = self.inner.remove_matching(filter)?;
        Ok(WriteResult::acknowledged(removed))
    }

    fn count(&self, filter: &Document) -> FacadeResult<u64> {
        self.inner.count(filter)
    }

    fn drop_collection(&self) -> FacadeResult<bool> {
        self.inner.purge()
    }

    fn aggregate(&self, pipeline: &[Document], timeout: ReadTimeout) -> FacadeResult<Document> {
        self.inner.aggregate(pipeline, timeout)
    }

    fn create_index(&self, fields: &IndexFields, options: &IndexCreateOptions) -> FacadeResult<bool> {
        self.inner.create_index(fields, options.to_options())
    }

    fn delete_index(&self, fields: &IndexFields) -> FacadeResult<bool> {
        self.inner.delete_index(fields)
    }

    fn delete_indexes(&self) -> FacadeResult<bool> {
        self.inner.delete_indexes()
    }

    fn find_and_modify(
        &self,
        query: &Document,
        update: &Document,
        fields: &Document,
        options: &FindAndModifyOptions,
    ) -> FacadeResult<Option<Document>> {
        self.inner.find_and_modify(query, update, fields, options)
    }

    fn create_ref(&self, value: &Value) -> FacadeResult<Option<DocumentRef>> {
        let id = match value {
            Value::Null => None,
            Value::Document(document) => document.id().cloned(),
            scalar => Some(scalar.clone()),
        };
        Ok(id.map(|id| DocumentRef::new(&self.inner.name, id)))
    }

    fn get_ref(&self, reference: &DocumentRef) -> FacadeResult<Option<Document>> {
        self.inner.get_ref(reference)
    }
}

/// Outcome of an index definition change.
enum IndexChange {
    Created,
    Unchanged,
    Rejected(String),
}

struct InMemoryCollectionInner {
    name: String,
    database_name: String,
    database: Weak<InMemoryDatabaseInner>,
    catalog: Option<InMemoryCollection>,
    documents: Atomic<DocumentMap>,
    indexes: Atomic<IndexMap<String, IndexEntry>>,
    materialized: AtomicBool,
}

impl InMemoryCollectionInner {
    fn namespace(&self) -> String {
        namespace(&self.database_name, &self.name)
    }

    fn snapshot(&self) -> DocumentMap {
        self.documents.read_with(|docs| docs.clone())
    }

    fn find(&self, filter: &Document, options: &FindOptions) -> FacadeResult<DocumentCursor> {
        log::trace!("find on {} with timeout {}", self.namespace(), options.read_timeout());
        let snapshot = self.snapshot();
        let skip = options.skip_count().unwrap_or(0) as usize;
        let limit = options.limit_count().map(|l| l as usize).unwrap_or(usize::MAX);
        let projection = options.projection_spec().cloned().unwrap_or_default();

        if let Some(sort) = options.sort_spec() {
            let mut selected = Vec::new();
            for (_, document) in snapshot.iter() {
                if matches(document, filter)? {
                    selected.push(document.clone());
                }
            }
            sort_documents(&mut selected, sort)?;
            let documents = selected
                .into_iter()
                .skip(skip)
                .take(limit)
                .map(|document| project(&document, &projection))
                .collect::<FacadeResult<Vec<_>>>()?;
            return Ok(DocumentCursor::from_documents(documents));
        }

        let filter = filter.clone();
        let iter = snapshot
            .into_iter()
            .filter_map(move |(_, document)| match matches(&document, &filter) {
                Ok(true) => Some(Ok(document)),
                Ok(false) => None,
                Err(err) => Some(Err(err)),
            })
            .skip(skip)
            .take(limit)
            .map(move |result| result.and_then(|document| project(&document, &projection)));
        Ok(DocumentCursor::new(Box::new(iter)))
    }

    fn find_one(&self, filter: &Document) -> FacadeResult<Option<Document>> {
        for (_, document) in self.snapshot().iter() {
            if matches(document, filter)? {
                return Ok(Some(document.clone()));
            }
        }
        Ok(None)
    }

    fn count(&self, filter: &Document) -> FacadeResult<u64> {
        let mut count = 0;
        for (_, document) in self.snapshot().iter() {
            if matches(document, filter)? {
                count += 1;
            }
        }
        Ok(count)
    }

    fn batch_insert(&self, documents: Vec<Document>, concern: WriteConcern) -> FacadeResult<WriteResult> {
        let outcome = self.documents.write_with(|docs| -> Result<WriteResult, String> {
            let mut inserted = 0;
            for document in documents {
                self.insert_one(docs, document)?;
                inserted += 1;
            }
            Ok(WriteResult::acknowledged(inserted))
        });
        Ok(self.report(concern, outcome))
    }

    fn save(&self, document: &mut Document, options: &SaveOptions) -> FacadeResult<bool> {
        log::trace!("save on {} (save flag {})", self.namespace(), options.is_save());
        if document.id().is_none() {
            *document = with_id(std::mem::take(document));
        }

        let candidate = document.clone();
        let outcome = self.documents.write_with(|docs| -> Result<WriteResult, String> {
            let id = candidate.get(DOC_ID);
            if docs.contains_key(&id) {
                self.check_unique(docs, &candidate)?;
                docs.insert(id, candidate);
                Ok(WriteResult::acknowledged(1))
            } else {
                self.insert_one(docs, candidate)?;
                Ok(WriteResult::acknowledged(1))
            }
        });
        Ok(self.report(options.write_concern(), outcome).is_ok())
    }

    fn update(&self, filter: &Document, update: &Document, options: &UpdateOptions) -> FacadeResult<WriteResult> {
        let outcome = self
            .documents
            .write_with(|docs| self.update_documents(docs, filter, update, options))?;
        Ok(self.report(options.write_concern(), outcome))
    }

    fn update_documents(
        &self,
        docs: &mut DocumentMap,
        filter: &Document,
        update: &Document,
        options: &UpdateOptions,
    ) -> FacadeResult<Result<WriteResult, String>> {
        if options.is_multi() && !is_operator_update(update) {
            return Ok(Err("multi update only works with $ operators".to_string()));
        }

        let targets = matching_ids(docs, filter, !options.is_multi())?;
        if targets.is_empty() {
            if !options.is_upsert() {
                return Ok(Ok(WriteResult::acknowledged(0)));
            }
            let seed = if is_operator_update(update) {
                upsert_seed(filter)
            } else {
                Document::new()
            };
            let document = apply_update(&seed, update)?;
            return Ok(self
                .insert_one(docs, document)
                .map(|id| WriteResult::acknowledged(1).with_upserted(id)));
        }

        let mut updated = 0;
        for id in targets {
            let original = docs.get(&id).cloned().unwrap_or_default();
            let replacement = apply_update(&original, update)?;
            if let Err(err) = self.check_unique(docs, &replacement) {
                return Ok(Err(err));
            }
            docs.insert(id, replacement);
            updated += 1;
        }
        Ok(Ok(WriteResult::acknowledged(updated)))
    }

    fn remove_matching(&self, filter: &Document) -> FacadeResult<u64> {
        self.documents.write_with(|docs| -> FacadeResult<u64> {
            let targets = matching_ids(docs, filter, false)?;
            for id in &targets {
                docs.remove(id);
            }
            Ok(targets.len() as u64)
        })
    }

    fn purge(&self) -> FacadeResult<bool> {
        let existed = self.materialized.swap(false, Ordering::AcqRel);
        self.documents.write_with(|docs| *docs = OrdMap::new());
        self.indexes.write_with(|indexes| indexes.clear());
        if let Some(catalog) = &self.catalog {
            let mut filter = Document::new();
            filter.put(INDEX_NAMESPACE, self.namespace());
            catalog.remove_matching(&filter)?;
        }
        log::debug!("Dropped collection {}", self.namespace());
        Ok(existed)
    }

    fn aggregate(&self, pipeline: &[Document], timeout: ReadTimeout) -> FacadeResult<Document> {
        let started = Instant::now();
        let documents = self.snapshot().into_iter().map(|(_, document)| document).collect();
        let reply = run_pipeline(documents, pipeline);

        if let Some(limit) = timeout.duration() {
            if started.elapsed() > limit {
                log::error!("Aggregation on {} exceeded the read timeout {}", self.namespace(), timeout);
                return Err(FacadeError::new(
                    &format!("read timed out after {}", timeout),
                    ErrorKind::StoreTimeout,
                ));
            }
        }
        Ok(reply)
    }

    fn create_index(&self, fields: &IndexFields, options: IndexOptions) -> FacadeResult<bool> {
        if fields.is_empty() {
            log::error!("Cannot create an index without key fields on {}", self.namespace());
            return Err(FacadeError::new("index keys cannot be empty", ErrorKind::IndexingError));
        }

        self.materialize()?;
        let name = fields.index_name();
        let change = self.documents.write_with(|docs| {
            self.indexes.write_with(|indexes| {
                if indexes.contains_key(&name) {
                    return IndexChange::Unchanged;
                }
                if options.is_unique() {
                    let duplicates = duplicate_ids(docs, fields);
                    if !duplicates.is_empty() {
                        if !options.is_drop_duplicates() {
                            return IndexChange::Rejected(self.duplicate_key_error(&name, fields, &duplicates[0], docs));
                        }
                        log::warn!(
                            "Dropping {} duplicate documents while indexing {} on {}",
                            duplicates.len(),
                            name,
                            self.namespace()
                        );
                        for id in &duplicates {
                            docs.remove(id);
                        }
                    }
                }
                indexes.insert(
                    name.clone(),
                    IndexEntry {
                        fields: fields.clone(),
                        options,
                    },
                );
                IndexChange::Created
            })
        });

        match change {
            IndexChange::Created => {
                log::debug!("Created index {} on {}", name, self.namespace());
                self.record_index(&name, fields, options)?;
                Ok(true)
            }
            IndexChange::Unchanged => Ok(true),
            IndexChange::Rejected(err) => {
                log::warn!("Index {} rejected on {}: {}", name, self.namespace(), err);
                Ok(false)
            }
        }
    }

    fn delete_index(&self, fields: &IndexFields) -> FacadeResult<bool> {
        let name = fields.index_name();
        if name == self.id_index_name() || fields.field_names() == [DOC_ID] {
            log::warn!("Refusing to drop the _id index of {}", self.namespace());
            return Ok(false);
        }

        let removed = self
            .indexes
            .write_with(|indexes| indexes.shift_remove(&name).is_some());
        if removed {
            self.forget_index(Some(&name))?;
            log::debug!("Dropped index {} on {}", name, self.namespace());
        }
        Ok(removed)
    }

    fn delete_indexes(&self) -> FacadeResult<bool> {
        let id_index = self.id_index_name();
        self.indexes
            .write_with(|indexes| indexes.retain(|name, _| *name == id_index));
        self.forget_index(None)?;
        log::debug!("Dropped all secondary indexes on {}", self.namespace());
        Ok(true)
    }

    fn find_and_modify(
        &self,
        query: &Document,
        update: &Document,
        fields: &Document,
        options: &FindAndModifyOptions,
    ) -> FacadeResult<Option<Document>> {
        let image = self.documents.write_with(|docs| -> FacadeResult<Option<Document>> {
            let mut candidates = Vec::new();
            for (_, document) in docs.iter() {
                if matches(document, query)? {
                    candidates.push(document.clone());
                }
            }
            if let Some(sort) = options.sort_spec() {
                sort_documents(&mut candidates, sort)?;
            }

            let original = match candidates.into_iter().next() {
                Some(original) => original,
                None if options.is_upsert() && !options.is_remove() => {
                    let seed = if is_operator_update(update) {
                        upsert_seed(query)
                    } else {
                        Document::new()
                    };
                    let document = with_id(apply_update(&seed, update)?);
                    self.insert_one(docs, document.clone()).map_err(write_error)?;
                    return Ok(options.is_return_new().then_some(document));
                }
                None => return Ok(None),
            };

            let id = original.get(DOC_ID);
            if options.is_remove() {
                docs.remove(&id);
                return Ok(Some(original));
            }

            let updated = apply_update(&original, update)?;
            self.check_unique(docs, &updated).map_err(write_error)?;
            docs.insert(id, updated.clone());
            Ok(Some(if options.is_return_new() { updated } else { original }))
        })?;

        image.map(|document| project(&document, fields)).transpose()
    }

    fn get_ref(&self, reference: &DocumentRef) -> FacadeResult<Option<Document>> {
        if let Some(database) = reference.database() {
            if database != self.database_name {
                log::warn!(
                    "Reference into database {} cannot be resolved from {}",
                    database,
                    self.database_name
                );
                return Ok(None);
            }
        }

        let database = self.database.upgrade().ok_or_else(|| {
            log::error!("Database of {} is no longer available", self.namespace());
            FacadeError::new("database has been closed", ErrorKind::StoreError)
        })?;
        let mut filter = Document::new();
        filter.put(DOC_ID, reference.id().clone());
        database.collection(reference.collection()).find_one(&filter)
    }

    /// Inserts one document under the write lock, assigning `_id` when
    /// missing. `Err` carries the duplicate-key message.
    fn insert_one(&self, docs: &mut DocumentMap, document: Document) -> Result<Value, String> {
        let document = with_id(document);
        let id = document.get(DOC_ID);
        if docs.contains_key(&id) {
            let fields = IndexFields::from(DOC_ID);
            return Err(self.duplicate_key_error(&self.id_index_name(), &fields, &id, docs));
        }
        self.check_unique(docs, &document)?;
        self.materialize().map_err(|err| err.to_string())?;
        docs.insert(id.clone(), document);
        Ok(id)
    }

    /// Verifies `candidate` does not clash with another document on any
    /// unique index.
    fn check_unique(&self, docs: &DocumentMap, candidate: &Document) -> Result<(), String> {
        let id = candidate.get(DOC_ID);
        self.indexes.read_with(|indexes| {
            for (name, entry) in indexes.iter().filter(|(_, entry)| entry.options.is_unique()) {
                let key = index_key(&entry.fields, candidate);
                for (other_id, other) in docs.iter() {
                    if *other_id != id && index_key(&entry.fields, other) == key {
                        return Err(self.duplicate_key_error(name, &entry.fields, other_id, docs));
                    }
                }
            }
            Ok(())
        })
    }

    fn duplicate_key_error(&self, index: &str, fields: &IndexFields, id: &Value, docs: &DocumentMap) -> String {
        let key = docs
            .get(id)
            .map(|document| index_key(fields, document))
            .unwrap_or_else(|| vec![id.clone()]);
        format!(
            "E{} duplicate key error index: {}.${} dup key: {{ : {} }}",
            ERR_DUPLICATE_KEY,
            self.namespace(),
            index,
            key.iter().map(|value| value.to_string()).join(", : ")
        )
    }

    /// Marks the collection as existing, registering its `_id` index.
    fn materialize(&self) -> FacadeResult<()> {
        if self.materialized.swap(true, Ordering::AcqRel) || self.catalog.is_none() {
            return Ok(());
        }

        let fields = IndexFields::from(DOC_ID);
        let name = self.id_index_name();
        let options = IndexOptions::default();
        self.indexes.write_with(|indexes| {
            indexes.insert(
                name.clone(),
                IndexEntry {
                    fields: fields.clone(),
                    options,
                },
            )
        });
        self.record_index(&name, &fields, options)
    }

    fn id_index_name(&self) -> String {
        ID_INDEX_NAME.to_string()
    }

    /// Writes an index descriptor into the catalog.
    fn record_index(&self, name: &str, fields: &IndexFields, options: IndexOptions) -> FacadeResult<()> {
        let catalog = match &self.catalog {
            Some(catalog) => catalog,
            None => return Ok(()),
        };

        let mut descriptor = Document::new();
        descriptor.put(INDEX_VERSION, 1);
        descriptor.put(INDEX_KEY, fields.to_document());
        descriptor.put(INDEX_NAMESPACE, self.namespace());
        descriptor.put(INDEX_NAME, name);
        descriptor.merge(&options.to_document());

        let result = catalog.insert(descriptor, &InsertOptions::default())?;
        if !result.is_ok() {
            log::error!("Could not record index {} of {}", name, self.namespace());
            return Err(FacadeError::new(
                &format!("could not record index {}", name),
                ErrorKind::IndexingError,
            ));
        }
        Ok(())
    }

    /// Removes catalog descriptors: one index by name, or every index but
    /// the `_id` one.
    fn forget_index(&self, name: Option<&str>) -> FacadeResult<()> {
        let catalog = match &self.catalog {
            Some(catalog) => catalog,
            None => return Ok(()),
        };

        let mut filter = Document::new();
        filter.put(INDEX_NAMESPACE, self.namespace());
        match name {
            Some(name) => {
                filter.put(INDEX_NAME, name);
            }
            None => {
                let mut not_id = Document::new();
                not_id.put("$ne", self.id_index_name());
                filter.put(INDEX_NAME, not_id);
            }
        }
        catalog.remove_matching(&filter)?;
        Ok(())
    }

    /// Applies the write concern to a write outcome.
    fn report(&self, concern: WriteConcern, outcome: Result<WriteResult, String>) -> WriteResult {
        match (outcome, concern.is_acknowledged()) {
            (Ok(result), true) => result,
            (Ok(_), false) => WriteResult::unacknowledged(),
            (Err(err), true) => {
                log::warn!("Write on {} rejected: {}", self.namespace(), err);
                WriteResult::failed(&err)
            }
            (Err(err), false) => {
                log::warn!("Unacknowledged write on {} was lost: {}", self.namespace(), err);
                WriteResult::unacknowledged()
            }
        }
    }
}

/// Places a fresh `_id` first when the document has none.
fn with_id(document: Document) -> Document {
    if document.id().is_some() {
        return document;
    }
    let mut identified = Document::new();
    identified.put(DOC_ID, ObjectId::new());
    identified.merge(&document);
    identified
}

fn index_key(fields: &IndexFields, document: &Document) -> Vec<Value> {
    fields.iter().map(|(field, _)| document.get(field)).collect()
}

fn matching_ids(docs: &DocumentMap, filter: &Document, first_only: bool) -> FacadeResult<Vec<Value>> {
    let mut ids = Vec::new();
    for (id, document) in docs.iter() {
        if matches(document, filter)? {
            ids.push(id.clone());
            if first_only {
                break;
            }
        }
    }
    Ok(ids)
}

/// Ids of documents whose key repeats an earlier document's key, in `_id`
/// order.
fn duplicate_ids(docs: &DocumentMap, fields: &IndexFields) -> Vec<Value> {
    let mut seen = HashSet::new();
    docs.iter()
        .filter(|(_, document)| !seen.insert(index_key(fields, document)))
        .map(|(id, _)| id.clone())
        .collect()
}

fn write_error(err: String) -> FacadeError {
    log::error!("Write rejected: {}", err);
    FacadeError::new(&err, ErrorKind::StoreError)
}
