use crate::collection::{Document, DocumentId, Entity, Identifier, ObjectId};
use crate::common::{create_document, DOC_ID};
use crate::database::Database;
use crate::errors::{ErrorKind, FacadeError, FacadeResult};
use crate::store::{
    FindAndModifyOptions, InsertOptions, SaveOptions, StoreCollection, UpdateOptions, WriteResult,
};

/// What `remove` deletes: the documents matching a raw filter, or the one
/// document an entity or identifier designates.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveTarget {
    Filter(Document),
    Entity(Entity),
    Id(Identifier),
}

impl RemoveTarget {
    /// The filter sent to the store.
    ///
    /// # Errors
    ///
    /// Fails with [ErrorKind::InvalidIdentifier] for an entity without `_id`
    /// or an identifier that does not resolve, so a remove can never
    /// degrade into clearing the collection.
    pub fn to_filter(&self) -> FacadeResult<Document> {
        match self {
            RemoveTarget::Filter(filter) => Ok(filter.clone()),
            RemoveTarget::Id(id) => id.to_filter(),
            RemoveTarget::Entity(entity) => match (entity.id(), entity.raw_data().id()) {
                (Some(id), _) => Identifier::from(id).to_filter(),
                (None, Some(raw)) => Ok(create_document(DOC_ID, raw.clone())),
                (None, None) => {
                    log::error!("Cannot remove an entity without identifier");
                    Err(FacadeError::new(
                        "Cannot remove an entity without identifier",
                        ErrorKind::InvalidIdentifier,
                    ))
                }
            },
        }
    }
}

impl From<Document> for RemoveTarget {
    fn from(filter: Document) -> Self {
        RemoveTarget::Filter(filter)
    }
}

impl From<Entity> for RemoveTarget {
    fn from(entity: Entity) -> Self {
        RemoveTarget::Entity(entity)
    }
}

impl From<&Entity> for RemoveTarget {
    fn from(entity: &Entity) -> Self {
        RemoveTarget::Entity(entity.clone())
    }
}

impl From<Identifier> for RemoveTarget {
    fn from(id: Identifier) -> Self {
        RemoveTarget::Id(id)
    }
}

impl From<DocumentId> for RemoveTarget {
    fn from(id: DocumentId) -> Self {
        RemoveTarget::Id(id.into())
    }
}

impl From<ObjectId> for RemoveTarget {
    fn from(id: ObjectId) -> Self {
        RemoveTarget::Id(id.into())
    }
}

impl From<&str> for RemoveTarget {
    fn from(id: &str) -> Self {
        RemoveTarget::Id(id.into())
    }
}

#[derive(Clone)]
pub(crate) struct WriteOperations {
    store: StoreCollection,
    database: Database,
}

impl WriteOperations {
    pub fn new(store: StoreCollection, database: Database) -> Self {
        WriteOperations { store, database }
    }

    pub fn default_insert_options(&self) -> InsertOptions {
        InsertOptions::new(self.database.config().default_write_concern())
    }

    pub fn default_update_options(&self) -> UpdateOptions {
        UpdateOptions::default().with_write_concern(self.database.config().default_write_concern())
    }

    pub fn insert(&self, document: Document, options: &InsertOptions) -> FacadeResult<WriteResult> {
        let result = self.store.insert(document, options)?;
        self.log_unacknowledged("insert", &result);
        Ok(result)
    }

    pub fn batch_insert(&self, documents: Vec<Document>, options: &InsertOptions) -> FacadeResult<WriteResult> {
        let result = self.store.batch_insert(documents, options)?;
        self.log_unacknowledged("batch insert", &result);
        Ok(result)
    }

    /// Saves the entity's raw snapshot. Returns the stored snapshot, with
    /// any store-assigned `_id`, or `None` when the store rejected the
    /// write. The caller's entity is never touched.
    pub fn save(&self, entity: &Entity, options: &SaveOptions) -> FacadeResult<Option<Entity>> {
        let mut data = entity.raw_data().clone();
        if !self.store.save(&mut data, options)? {
            log::warn!("Save on {} was rejected by the store", self.store.name());
            return Ok(None);
        }
        Ok(Some(Entity::bound(Some(data), &self.store.name())))
    }

    pub fn update(&self, filter: &Document, update: &Document, options: &UpdateOptions) -> FacadeResult<WriteResult> {
        let result = self.store.update(filter, update, options)?;
        self.log_unacknowledged("update", &result);
        Ok(result)
    }

    pub fn remove(&self, target: &RemoveTarget) -> FacadeResult<WriteResult> {
        let filter = target.to_filter()?;
        self.store.remove(&filter)
    }

    pub fn clear(&self) -> FacadeResult<WriteResult> {
        self.store.remove(&Document::new())
    }

    pub fn drop_collection(&self) -> FacadeResult<bool> {
        log::debug!("Dropping collection {}", self.store.name());
        self.store.drop_collection()
    }

    pub fn find_and_modify(
        &self,
        query: &Document,
        update: &Document,
        fields: &Document,
        options: &FindAndModifyOptions,
    ) -> FacadeResult<Entity> {
        let document = self.store.find_and_modify(query, update, fields, options)?;
        Ok(Entity::bound(document, &self.store.name()))
    }

    fn log_unacknowledged(&self, operation: &str, result: &WriteResult) {
        if !result.is_acknowledged() {
            log::warn!("{} on {} was not acknowledged", operation, self.store.name());
        }
    }
}
