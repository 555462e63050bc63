use crate::collection::Collection;
use crate::errors::{ErrorKind, FacadeError, FacadeResult};
use crate::facade_builder::FacadeBuilder;
use crate::facade_config::FacadeConfig;
use crate::store::StoreDatabase;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A database handle: the entry point to collection facades.
///
/// Cheap to clone; clones share the store connection and the
/// [FacadeConfig], including its connection-scoped read timeout.
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    pub(crate) fn new(store: StoreDatabase, config: FacadeConfig) -> Self {
        Database {
            inner: Arc::new(DatabaseInner { store, config }),
        }
    }

    pub fn builder() -> FacadeBuilder {
        FacadeBuilder::new()
    }

    pub fn name(&self) -> String {
        self.inner.store.name()
    }

    pub fn config(&self) -> &FacadeConfig {
        &self.inner.config
    }

    /// Binds a collection facade to the named collection.
    ///
    /// # Errors
    ///
    /// Fails with [ErrorKind::InvalidOperation] when the name is empty or
    /// contains `$` or a NUL character.
    pub fn collection(&self, name: &str) -> FacadeResult<Collection> {
        validate_collection_name(name)?;
        let store = self.inner.store.collection(name)?;
        Ok(Collection::new(store, self.clone()))
    }

    /// Names of the collections holding data or indexes.
    pub fn collection_names(&self) -> FacadeResult<Vec<String>> {
        self.inner.store.collection_names()
    }

    pub fn has_collection(&self, name: &str) -> FacadeResult<bool> {
        Ok(self.collection_names()?.iter().any(|it| it == name))
    }

    pub fn drop_collection(&self, name: &str) -> FacadeResult<bool> {
        validate_collection_name(name)?;
        self.inner.store.drop_collection(name)
    }
}

impl Debug for Database {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("name", &self.name()).finish()
    }
}

struct DatabaseInner {
    store: StoreDatabase,
    config: FacadeConfig,
}

fn validate_collection_name(name: &str) -> FacadeResult<()> {
    if name.is_empty() || name.contains('$') || name.contains('\0') {
        log::error!("Invalid collection name {:?}", name);
        return Err(FacadeError::new(
            &format!("Invalid collection name {:?}", name),
            ErrorKind::InvalidOperation,
        ));
    }
    Ok(())
}
