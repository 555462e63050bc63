use crate::common::SYSTEM_INDEXES;
use crate::errors::FacadeResult;
use crate::store::memory::InMemoryCollection;
use crate::store::{StoreCollection, StoreDatabaseProvider};
use dashmap::DashMap;
use std::sync::Arc;

/// A database of the in-memory store.
///
/// Collections are created lazily on first access and registered in a
/// concurrent map. Every database owns its `system.indexes` catalog.
#[derive(Clone)]
pub struct InMemoryDatabase {
    inner: Arc<InMemoryDatabaseInner>,
}

impl InMemoryDatabase {
    pub fn new(name: &str) -> Self {
        InMemoryDatabase {
            inner: InMemoryDatabaseInner::new(name),
        }
    }
}

impl StoreDatabaseProvider for InMemoryDatabase {
    fn name(&self) -> String {
        self.inner.name.clone()
    }

    fn collection(&self, name: &str) -> FacadeResult<StoreCollection> {
        Ok(StoreCollection::new(self.inner.collection(name)))
    }

    fn collection_names(&self) -> FacadeResult<Vec<String>> {
        Ok(self.inner.collection_names())
    }

    fn drop_collection(&self, name: &str) -> FacadeResult<bool> {
        match self.inner.collections.get(name) {
            Some(collection) => collection.purge(),
            None => Ok(false),
        }
    }
}

pub(crate) struct InMemoryDatabaseInner {
    name: String,
    collections: DashMap<String, InMemoryCollection>,
    catalog: InMemoryCollection,
}

impl InMemoryDatabaseInner {
    fn new(name: &str) -> Arc<Self> {
        Arc::new_cyclic(|database| InMemoryDatabaseInner {
            name: name.to_string(),
            collections: DashMap::new(),
            catalog: InMemoryCollection::new(SYSTEM_INDEXES, name, database.clone(), None),
        })
    }

    /// Returns the named collection, creating its handle on first access.
    pub(crate) fn collection(self: &Arc<Self>, name: &str) -> InMemoryCollection {
        if name == SYSTEM_INDEXES {
            return self.catalog.clone();
        }

        self.collections
            .entry(name.to_string())
            .or_insert_with(|| {
                log::debug!("Opening collection {}.{}", self.name, name);
                InMemoryCollection::new(
                    name,
                    &self.name,
                    Arc::downgrade(self),
                    Some(self.catalog.clone()),
                )
            })
            .clone()
    }

    fn collection_names(&self) -> Vec<String> {
        let mut names = self
            .collections
            .iter()
            .filter(|entry| entry.value().is_materialized())
            .map(|entry| entry.key().clone())
            .collect::<Vec<_>>();
        names.sort();
        names
    }
}
