use crate::database::Database;
use crate::errors::{ErrorKind, FacadeError, FacadeResult};
use crate::facade_config::FacadeConfig;
use crate::store::memory::InMemoryStore;
use crate::store::{ReadTimeout, StoreDatabase, WriteConcern};

/// Builder for a [Database] facade.
///
/// Setters record the first configuration error, which is returned when
/// the database is opened.
///
/// # Examples
///
/// ```rust,ignore
/// use docfacade::FacadeBuilder;
///
/// let db = FacadeBuilder::new()
///     .legacy_boolean_unique_index(true)
///     .read_timeout(ReadTimeout::Millis(30_000))
///     .open_in_memory("app")?;
/// ```
#[derive(Default)]
pub struct FacadeBuilder {
    error: Option<FacadeError>,
    config: FacadeConfig,
}

impl FacadeBuilder {
    pub fn new() -> Self {
        FacadeBuilder {
            error: None,
            config: FacadeConfig::new(),
        }
    }

    /// Sends unique index options as a bare boolean, for store clients
    /// that predate option documents.
    pub fn legacy_boolean_unique_index(mut self, legacy: bool) -> Self {
        if self.error.is_none() {
            if let Err(err) = self.config.set_legacy_boolean_unique_index(legacy) {
                self.error = Some(err);
            }
        }
        self
    }

    /// Acknowledgment level for writes that do not name one.
    pub fn write_concern(mut self, write_concern: impl Into<WriteConcern>) -> Self {
        if self.error.is_none() {
            if let Err(err) = self.config.set_default_write_concern(write_concern.into()) {
                self.error = Some(err);
            }
        }
        self
    }

    /// Initial connection-scoped read timeout.
    pub fn read_timeout(self, timeout: ReadTimeout) -> Self {
        self.config.set_read_timeout(timeout);
        self
    }

    /// Opens the facade over an existing store database.
    pub fn open(self, store: StoreDatabase) -> FacadeResult<Database> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if store.name().is_empty() {
            log::error!("Database name cannot be empty");
            return Err(FacadeError::new(
                "Database name cannot be empty",
                ErrorKind::InvalidOperation,
            ));
        }

        self.config.initialize();
        log::debug!("Opened database facade over {}", store.name());
        Ok(Database::new(store, self.config))
    }

    /// Opens the facade over a fresh in-memory store.
    pub fn open_in_memory(self, name: &str) -> FacadeResult<Database> {
        let store = InMemoryStore::new().database(name);
        self.open(store)
    }
}
