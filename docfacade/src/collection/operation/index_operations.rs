use crate::collection::Collection;
use crate::common::{namespace, DocumentCursor, INDEX_KEY, INDEX_NAMESPACE, SYSTEM_INDEXES};
use crate::database::Database;
use crate::errors::FacadeResult;
use crate::index::{IndexCreateOptions, IndexFields, IndexParams};
use crate::store::StoreCollection;

/// Index lifecycle of one collection.
///
/// Normalizes key specifications and option modes before they reach the
/// store, and lists indexes through the database's `system.indexes`
/// catalog.
#[derive(Clone)]
pub(crate) struct IndexOperations {
    store: StoreCollection,
    database: Database,
}

impl IndexOperations {
    pub fn new(store: StoreCollection, database: Database) -> Self {
        IndexOperations { store, database }
    }

    pub fn ensure_index(&self, fields: IndexFields, params: IndexParams) -> FacadeResult<bool> {
        let options = params.to_options();
        let legacy = self.database.config().legacy_boolean_unique_index();
        let encoded = IndexCreateOptions::encode(options, legacy);

        log::debug!(
            "Ensuring index {} on {} with options {}",
            fields.to_document(),
            self.store.name(),
            encoded.to_value()
        );
        self.store.create_index(&fields, &encoded)
    }

    pub fn ensure_unique_index(&self, fields: IndexFields, drop_duplicates: bool) -> FacadeResult<bool> {
        let params = if drop_duplicates {
            Collection::DROP_DUPLICATES
        } else {
            Collection::UNIQUE
        };
        self.ensure_index(fields, params)
    }

    pub fn drop_index(&self, fields: IndexFields) -> FacadeResult<bool> {
        log::debug!("Dropping index {} on {}", fields.index_name(), self.store.name());
        self.store.delete_index(&fields)
    }

    pub fn drop_indexes(&self) -> FacadeResult<bool> {
        log::debug!("Dropping all indexes on {}", self.store.name());
        self.store.delete_indexes()
    }

    /// Index descriptors of this collection, read lazily from the catalog.
    pub fn get_indexes(&self) -> FacadeResult<DocumentCursor> {
        let catalog = self.database.collection(SYSTEM_INDEXES)?;
        let namespace = namespace(&self.database.name(), &self.store.name());
        catalog.query().eq(INDEX_NAMESPACE, namespace).cursor()
    }

    /// Key field names across all indexes, in catalog order. A field used
    /// by several indexes appears once per index.
    pub fn get_indexed_fields(&self) -> FacadeResult<Vec<String>> {
        let mut fields = Vec::new();
        for descriptor in self.get_indexes()? {
            let descriptor = descriptor?;
            if let Some(key) = descriptor.get_value(INDEX_KEY).and_then(|key| key.as_document()) {
                fields.extend(key.keys().cloned());
            }
        }
        Ok(fields)
    }
}
