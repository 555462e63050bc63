use crate::collection::Document;
use crate::common::{Value, REPLY_CODE, REPLY_ERRMSG, REPLY_OK, REPLY_RESULT};
use crate::errors::{ErrorKind, FacadeError, FacadeResult};
use crate::facade_config::FacadeConfig;
use crate::store::{ReadTimeout, StoreCollection};

/// Scope of a store call that runs without a read timeout.
///
/// The guarded call gets [ReadTimeout::Disabled] from
/// [TimeoutOverride::timeout]; the connection's configured timeout is left
/// alone, so reads elsewhere keep it. Overlapping guards nest, and the
/// scope closes when the guard drops, whether the call returned, failed or
/// panicked.
pub(crate) struct TimeoutOverride<'a> {
    config: &'a FacadeConfig,
    previous: ReadTimeout,
}

impl<'a> TimeoutOverride<'a> {
    pub fn acquire(config: &'a FacadeConfig) -> Self {
        let previous = config.suspend_read_timeout();
        log::trace!("Read timeout {} suspended for one call", previous);
        TimeoutOverride { config, previous }
    }

    /// The timeout the guarded call runs with.
    pub fn timeout(&self) -> ReadTimeout {
        ReadTimeout::Disabled
    }
}

impl Drop for TimeoutOverride<'_> {
    fn drop(&mut self) {
        self.config.resume_read_timeout();
        log::trace!("Read timeout suspension over, configured {}", self.previous);
    }
}

#[derive(Clone)]
pub(crate) struct AggregateOperations {
    store: StoreCollection,
    config: FacadeConfig,
}

impl AggregateOperations {
    pub fn new(store: StoreCollection, config: FacadeConfig) -> Self {
        AggregateOperations { store, config }
    }

    /// Runs a pipeline with the read timeout disabled and unwraps the
    /// store's reply into its result documents.
    pub fn aggregate(&self, pipeline: &[Document]) -> FacadeResult<Vec<Document>> {
        let reply = {
            let guard = TimeoutOverride::acquire(&self.config);
            self.store.aggregate(pipeline, guard.timeout())?
        };

        if !reply.get(REPLY_OK).is_truthy() {
            let code = reply.get(REPLY_CODE).as_integer().unwrap_or_default();
            let errmsg = reply
                .get_value(REPLY_ERRMSG)
                .map(|msg| match msg {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_default();
            log::error!("Aggregation on {} failed: {} - {}", self.store.name(), code, errmsg);
            return Err(FacadeError::aggregation_failed(code, &errmsg));
        }

        match reply.get(REPLY_RESULT) {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Document(document) => Ok(document),
                    other => {
                        log::error!("Aggregation result entry {} is not a document", other);
                        Err(FacadeError::new(
                            &format!("aggregation result entry {} is not a document", other),
                            ErrorKind::EncodingError,
                        ))
                    }
                })
                .collect(),
            other => {
                log::error!("Aggregation result {} is not an array", other);
                Err(FacadeError::new(
                    "aggregation result is not an array",
                    ErrorKind::EncodingError,
                ))
            }
        }
    }

    pub fn timeout(&self) -> ReadTimeout {
        self.config.read_timeout()
    }

    pub fn set_timeout(&self, timeout: ReadTimeout) {
        self.config.set_read_timeout(timeout);
    }
}
