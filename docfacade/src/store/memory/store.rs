use crate::store::memory::InMemoryDatabase;
use crate::store::StoreDatabase;
use dashmap::DashMap;
use std::sync::Arc;

/// A process-local document store.
///
/// `InMemoryStore` plays the role of a client connection: it hands out
/// databases by name, creating them on first use. Handles are cheap to
/// clone and share the same data.
///
/// All data is lost when the last handle is dropped.
///
/// ```text
/// let store = InMemoryStore::new();
/// let database = store.database("app");
/// let users = database.collection("users")?;
/// ```
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<InMemoryStoreInner>,
}

impl InMemoryStore {
    pub fn new() -> InMemoryStore {
        InMemoryStore {
            inner: Arc::new(InMemoryStoreInner::default()),
        }
    }

    /// Returns the named database.
    pub fn database(&self, name: &str) -> StoreDatabase {
        StoreDatabase::new(self.inner.database(name))
    }

    /// Names of the databases opened so far.
    pub fn database_names(&self) -> Vec<String> {
        let mut names = self
            .inner
            .databases
            .iter()
            .map(|entry| entry.key().clone())
            .collect::<Vec<_>>();
        names.sort();
        names
    }
}

#[derive(Default)]
struct InMemoryStoreInner {
    databases: DashMap<String, InMemoryDatabase>,
}

impl InMemoryStoreInner {
    fn database(&self, name: &str) -> InMemoryDatabase {
        self.databases
            .entry(name.to_string())
            .or_insert_with(|| InMemoryDatabase::new(name))
            .clone()
    }
}
