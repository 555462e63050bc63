//! Configuration shared by a database handle and its collections.

use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
use crate::errors::{ErrorKind, FacadeError, FacadeResult};
use crate::store::{ReadTimeout, WriteConcern};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Settings of one facade connection.
///
/// A config is cheap to clone; clones share state. Capability flags are
/// fixed once the database is opened, while the read timeout stays
/// adjustable for the life of the connection.
///
/// # Read timeout
///
/// The timeout is connection scoped: every collection of a database reads
/// the same value. Long-running operations open a suspension scope and pass
/// [ReadTimeout::Disabled] to their own store call only; other reads keep
/// using the configured value. Scopes nest, see
/// [FacadeConfig::is_read_timeout_suspended].
///
/// ```rust,ignore
/// let config = FacadeConfig::new();
/// config.set_legacy_boolean_unique_index(true)?;
/// config.set_read_timeout(ReadTimeout::Millis(30_000));
/// ```
#[derive(Clone)]
pub struct FacadeConfig {
    inner: Arc<FacadeConfigInner>,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FacadeConfig {
    pub fn new() -> Self {
        FacadeConfig {
            inner: Arc::new(FacadeConfigInner::new()),
        }
    }

    /// Whether unique index options are sent as a bare boolean, as legacy
    /// store clients expect.
    pub fn legacy_boolean_unique_index(&self) -> bool {
        self.inner.legacy_boolean_unique_index.load(Ordering::Relaxed)
    }

    /// Selects the index option encoding.
    ///
    /// # Errors
    ///
    /// Fails once the database has been opened.
    pub fn set_legacy_boolean_unique_index(&self, legacy: bool) -> FacadeResult<()> {
        self.inner.ensure_not_configured("index option encoding")?;
        self.inner
            .legacy_boolean_unique_index
            .store(legacy, Ordering::Relaxed);
        Ok(())
    }

    /// Acknowledgment level used when a call does not name one.
    pub fn default_write_concern(&self) -> WriteConcern {
        self.inner.default_write_concern.read_with(|it| *it)
    }

    /// # Errors
    ///
    /// Fails once the database has been opened.
    pub fn set_default_write_concern(&self, write_concern: WriteConcern) -> FacadeResult<()> {
        self.inner.ensure_not_configured("default write concern")?;
        self.inner
            .default_write_concern
            .write_with(|it| *it = write_concern);
        Ok(())
    }

    /// The configured read timeout. Reads default to it; a running
    /// aggregation does not change it.
    pub fn read_timeout(&self) -> ReadTimeout {
        self.inner.read_timeout.read_with(|it| it.configured)
    }

    pub fn set_read_timeout(&self, timeout: ReadTimeout) {
        self.inner.read_timeout.write_with(|it| it.configured = timeout);
    }

    /// Whether some operation on this connection currently runs with the
    /// read timeout disabled.
    pub fn is_read_timeout_suspended(&self) -> bool {
        self.inner.read_timeout.read_with(|it| it.suspensions > 0)
    }

    /// Opens a scope that runs with the read timeout disabled, until the
    /// matching [FacadeConfig::resume_read_timeout]. Returns the configured
    /// timeout.
    pub(crate) fn suspend_read_timeout(&self) -> ReadTimeout {
        self.inner.read_timeout.write_with(|it| {
            it.suspensions += 1;
            it.configured
        })
    }

    /// Ends one scope opened by [FacadeConfig::suspend_read_timeout].
    pub(crate) fn resume_read_timeout(&self) {
        self.inner.read_timeout.write_with(|it| {
            it.suspensions = it.suspensions.saturating_sub(1);
        });
    }

    pub fn is_configured(&self) -> bool {
        self.inner.configured.load(Ordering::Acquire)
    }

    /// Freezes the capability flags.
    pub(crate) fn initialize(&self) {
        self.inner.configured.store(true, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct TimeoutState {
    configured: ReadTimeout,
    suspensions: usize,
}

struct FacadeConfigInner {
    configured: AtomicBool,
    legacy_boolean_unique_index: AtomicBool,
    default_write_concern: Atomic<WriteConcern>,
    read_timeout: Atomic<TimeoutState>,
}

impl FacadeConfigInner {
    fn new() -> Self {
        FacadeConfigInner {
            configured: AtomicBool::new(false),
            legacy_boolean_unique_index: AtomicBool::new(false),
            default_write_concern: atomic(WriteConcern::default()),
            read_timeout: atomic(TimeoutState::default()),
        }
    }

    fn ensure_not_configured(&self, setting: &str) -> FacadeResult<()> {
        if self.configured.load(Ordering::Acquire) {
            log::error!("Cannot change {} after the database is opened", setting);
            return Err(FacadeError::new(
                &format!("Cannot change {} after the database is opened", setting),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }
}
