use crate::collection::{Document, Entity, Identifier, Query};
use crate::common::DocumentCursor;
use crate::database::Database;
use crate::errors::FacadeResult;
use crate::store::{FindOptions, ReadTimeout, StoreCollection};

#[derive(Clone)]
pub(crate) struct ReadOperations {
    store: StoreCollection,
    database: Database,
}

impl ReadOperations {
    pub fn new(store: StoreCollection, database: Database) -> Self {
        ReadOperations { store, database }
    }

    /// Raw lookup by identifier; the identifier is normalized to its native
    /// form first.
    pub fn find_one_raw(&self, id: &Identifier) -> FacadeResult<Option<Document>> {
        let filter = id.to_filter()?;
        self.store.find_one(&filter)
    }

    /// Lookup by identifier wrapped into an entity, empty when nothing
    /// matched.
    pub fn find_one(&self, id: &Identifier) -> FacadeResult<Entity> {
        let document = self.find_one_raw(id)?;
        Ok(Entity::bound(document, &self.store.name()))
    }

    pub fn find(&self, filter: &Document, options: &FindOptions) -> FacadeResult<DocumentCursor> {
        let options = if options.read_timeout() == ReadTimeout::Default {
            options.clone().timeout(self.database.config().read_timeout())
        } else {
            options.clone()
        };
        self.store.find(filter, &options)
    }

    pub fn count(&self, filter: &Document) -> FacadeResult<u64> {
        self.store.count(filter)
    }

    pub fn query(&self) -> Query {
        Query::new(self.store.clone(), self.database.config().read_timeout())
    }
}
