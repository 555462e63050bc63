use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for facade operations.
///
/// Each kind describes one category of failure so callers can branch on
/// [FacadeError::kind] instead of parsing messages.
///
/// # Examples
///
/// ```rust,ignore
/// use docfacade::errors::{FacadeError, ErrorKind, FacadeResult};
///
/// fn example() -> FacadeResult<()> {
///     Err(FacadeError::new("bad id", ErrorKind::InvalidIdentifier))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// An identifier could not be converted into a native store identifier
    InvalidIdentifier,
    /// The store reported a non-ok aggregation result
    AggregationFailed {
        /// Error code reported by the store
        code: i64,
        /// Error message reported by the store
        message: String,
    },
    /// The operation is not valid in the current context
    InvalidOperation,
    /// A value does not have the expected type
    InvalidDataType,
    /// Index creation or removal failed
    IndexingError,
    /// The requested resource was not found
    NotFound,
    /// Error reported by the underlying store
    StoreError,
    /// Timeout reported by the underlying store
    StoreTimeout,
    /// Error encoding or decoding data
    EncodingError,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidIdentifier => write!(f, "Invalid identifier"),
            ErrorKind::AggregationFailed { code, message } => {
                write!(f, "Aggregation failed ({}): {}", code, message)
            }
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::InvalidDataType => write!(f, "Invalid data type"),
            ErrorKind::IndexingError => write!(f, "Indexing error"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::StoreError => write!(f, "Store error"),
            ErrorKind::StoreTimeout => write!(f, "Store timeout"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type of the facade.
///
/// `FacadeError` carries a message, an [ErrorKind], an optional cause and the
/// backtrace captured where the error was built.
#[derive(Clone)]
pub struct FacadeError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<FacadeError>>,
    backtrace: Atomic<Backtrace>,
}

impl FacadeError {
    /// Creates a new `FacadeError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        FacadeError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new_unresolved()),
        }
    }

    /// Creates a new `FacadeError` wrapping a cause.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: FacadeError) -> Self {
        FacadeError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new_unresolved()),
        }
    }

    /// Builds the error raised when the store answers an aggregation with a
    /// non-ok reply.
    pub fn aggregation_failed(code: i64, errmsg: &str) -> Self {
        FacadeError::new(
            &format!("aggregate failed with the following error: {} - {}", code, errmsg),
            ErrorKind::AggregationFailed {
                code,
                message: errmsg.to_string(),
            },
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&FacadeError> {
        self.cause.as_deref()
    }

    /// Returns the store error code when this is an aggregation failure.
    pub fn aggregation_code(&self) -> Option<i64> {
        match &self.error_kind {
            ErrorKind::AggregationFailed { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl Display for FacadeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for FacadeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => {
                // symbols are resolved on first print only
                let mut backtrace = self.backtrace.write();
                backtrace.resolve();
                write!(f, "{}\n{:?}", self.message, *backtrace)
            }
        }
    }
}

impl Error for FacadeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// `FacadeResult<T>` is shorthand for `Result<T, FacadeError>`.
pub type FacadeResult<T> = Result<T, FacadeError>;

impl From<std::io::Error> for FacadeError {
    fn from(err: std::io::Error) -> Self {
        let error_kind = match err.kind() {
            std::io::ErrorKind::TimedOut => ErrorKind::StoreTimeout,
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            _ => ErrorKind::StoreError,
        };
        FacadeError::new(&format!("IO error: {}", err), error_kind)
    }
}

impl From<std::fmt::Error> for FacadeError {
    fn from(err: std::fmt::Error) -> Self {
        FacadeError::new(&format!("Formatting error: {}", err), ErrorKind::InternalError)
    }
}

impl From<std::num::ParseIntError> for FacadeError {
    fn from(err: std::num::ParseIntError) -> Self {
        FacadeError::new(
            &format!("Integer parsing error: {}", err),
            ErrorKind::InvalidDataType,
        )
    }
}

impl From<regex::Error> for FacadeError {
    fn from(err: regex::Error) -> Self {
        FacadeError::new(&format!("Invalid pattern: {}", err), ErrorKind::InvalidOperation)
    }
}

impl From<String> for FacadeError {
    fn from(msg: String) -> Self {
        FacadeError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for FacadeError {
    fn from(msg: &str) -> Self {
        FacadeError::new(msg, ErrorKind::InternalError)
    }
}
