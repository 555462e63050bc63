use crate::errors::FacadeResult;
use crate::store::StoreCollection;
use std::ops::Deref;
use std::sync::Arc;

/// Database-level interface of a document store client.
pub trait StoreDatabaseProvider: Send + Sync {
    /// Name of the database.
    fn name(&self) -> String;

    /// Handle to a collection; collections come into existence with their
    /// first write or index.
    fn collection(&self, name: &str) -> FacadeResult<StoreCollection>;

    /// Names of the collections holding data or indexes.
    fn collection_names(&self) -> FacadeResult<Vec<String>>;

    fn drop_collection(&self, name: &str) -> FacadeResult<bool>;
}

/// Cheap-to-clone handle to a store database.
#[derive(Clone)]
pub struct StoreDatabase {
    inner: Arc<dyn StoreDatabaseProvider>,
}

impl StoreDatabase {
    pub fn new<T: StoreDatabaseProvider + 'static>(inner: T) -> Self {
        StoreDatabase { inner: Arc::new(inner) }
    }
}

impl Deref for StoreDatabase {
    type Target = Arc<dyn StoreDatabaseProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
