use crate::collection::{DocumentRef, Entity};
use crate::common::Value;
use crate::errors::FacadeResult;
use crate::store::StoreCollection;

#[derive(Clone)]
pub(crate) struct ReferenceOperations {
    store: StoreCollection,
}

impl ReferenceOperations {
    pub fn new(store: StoreCollection) -> Self {
        ReferenceOperations { store }
    }

    pub fn create_ref(&self, value: &Value) -> FacadeResult<Option<DocumentRef>> {
        self.store.create_ref(value)
    }

    /// Follows a reference value.
    ///
    /// Anything that is not structurally a reference resolves to `None`.
    /// A reference whose `$id` cannot be read as a native id is an error;
    /// a well-formed reference to a missing document is an empty entity.
    pub fn get_ref(&self, value: &Value) -> FacadeResult<Option<Entity>> {
        let reference = match DocumentRef::from_value(value) {
            Some(reference) => reference,
            None => {
                log::debug!("Ignoring malformed reference {}", value);
                return Ok(None);
            }
        };

        let reference = reference.with_native_id()?;
        let document = self.store.get_ref(&reference)?;
        Ok(Some(Entity::bound(document, reference.collection())))
    }
}
