use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic, WriteExecutor};

/// Error kinds for catalog operations.
///
/// Each kind names one category of failure so callers can branch on
/// [`CatalogError::kind`] instead of parsing messages.
///
/// # Examples
///
/// ```rust
/// use avl_catalog::errors::{CatalogError, CatalogResult, ErrorKind};
///
/// fn example() -> CatalogResult<()> {
///     Err(CatalogError::new("no such key", ErrorKind::NotFound))
/// }
///
/// assert_eq!(example().unwrap_err().kind(), &ErrorKind::NotFound);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Lookup Errors
    /// The requested key is not present in the tree
    NotFound,
    /// An insert collided with an existing key under the reject policy
    DuplicateKey,

    // Usage Errors
    /// A range filter was called with `max <= min`
    InvalidRange,
    /// A configuration value was rejected
    ValidationError,

    // Snapshot Errors
    /// A snapshot blob is missing, truncated, tampered with or structurally invalid
    CorruptSnapshot,
    /// Error encoding a snapshot payload
    EncodingError,
    /// Error reading or writing a snapshot through the host's I/O handle
    IOError,

    // Collaborator Errors
    /// The dataset indexer could not classify a raw key
    ClassificationFailed,

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::DuplicateKey => write!(f, "Duplicate key"),
            ErrorKind::InvalidRange => write!(f, "Invalid range"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::CorruptSnapshot => write!(f, "Corrupt snapshot"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::ClassificationFailed => write!(f, "Classification failed"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type of the catalog.
///
/// Carries a message, an [`ErrorKind`], an optional cause and a lazily
/// resolved backtrace. The backtrace is captured unresolved at construction
/// and symbolized only when the error is printed with `{:?}`.
///
/// # Examples
///
/// ```rust
/// use avl_catalog::errors::{CatalogError, ErrorKind};
///
/// let cause = CatalogError::new("checksum mismatch", ErrorKind::CorruptSnapshot);
/// let err = CatalogError::new_with_cause("cannot restore catalog", ErrorKind::CorruptSnapshot, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct CatalogError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<CatalogError>>,
    backtrace: Atomic<Backtrace>,
}

impl CatalogError {
    /// Creates a new `CatalogError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        CatalogError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new_unresolved()),
        }
    }

    /// Creates a new `CatalogError` chained to the error that caused it.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: CatalogError) -> Self {
        CatalogError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new_unresolved()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&CatalogError> {
        self.cause.as_deref()
    }
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}: {}\nCaused by: {:?}", self.error_kind, self.message, cause),
            None => {
                let trace = self.backtrace.write_with(|bt| {
                    bt.resolve();
                    format!("{:?}", bt)
                });
                write!(f, "{}: {}\n{}", self.error_kind, self.message, trace)
            }
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// Result alias used by every fallible catalog operation.
pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        let error_kind = match err.kind() {
            std::io::ErrorKind::UnexpectedEof | std::io::ErrorKind::InvalidData => {
                ErrorKind::CorruptSnapshot
            }
            _ => ErrorKind::IOError,
        };
        CatalogError::new(&format!("IO error: {}", err), error_kind)
    }
}

impl From<postcard::Error> for CatalogError {
    fn from(err: postcard::Error) -> Self {
        let error_kind = match err {
            postcard::Error::SerializeBufferFull
            | postcard::Error::SerializeSeqLengthUnknown
            | postcard::Error::SerdeSerCustom => ErrorKind::EncodingError,
            _ => ErrorKind::CorruptSnapshot,
        };
        CatalogError::new(&format!("Snapshot payload error: {}", err), error_kind)
    }
}

impl From<std::string::FromUtf8Error> for CatalogError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        CatalogError::new(
            &format!("UTF-8 encoding error: {}", err),
            ErrorKind::EncodingError,
        )
    }
}

impl From<String> for CatalogError {
    fn from(msg: String) -> Self {
        CatalogError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for CatalogError {
    fn from(msg: &str) -> Self {
        CatalogError::new(msg, ErrorKind::InternalError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_error_new_creates_error() {
        let error = CatalogError::new("key missing", ErrorKind::NotFound);
        assert_eq!(error.message, "key missing");
        assert_eq!(error.error_kind, ErrorKind::NotFound);
        assert!(error.cause.is_none());
    }

    #[test]
    fn catalog_error_new_with_cause_creates_error() {
        let cause = CatalogError::new("bad magic", ErrorKind::CorruptSnapshot);
        let error = CatalogError::new_with_cause("restore failed", ErrorKind::CorruptSnapshot, cause);
        assert_eq!(error.message(), "restore failed");
        assert_eq!(error.cause().map(|c| c.message()), Some("bad magic"));
    }

    #[test]
    fn catalog_error_display_is_message_only() {
        let error = CatalogError::new("range is empty", ErrorKind::InvalidRange);
        assert_eq!(format!("{}", error), "range is empty");
    }

    #[test]
    fn catalog_error_debug_includes_kind() {
        let error = CatalogError::new("range is empty", ErrorKind::InvalidRange);
        let formatted = format!("{:?}", error);
        assert!(formatted.contains("Invalid range"));
        assert!(formatted.contains("range is empty"));
    }

    #[test]
    fn catalog_error_debug_formats_with_cause() {
        let cause = CatalogError::new("checksum mismatch", ErrorKind::CorruptSnapshot);
        let error = CatalogError::new_with_cause("restore failed", ErrorKind::CorruptSnapshot, cause);
        let formatted = format!("{:?}", error);
        assert!(formatted.contains("restore failed"));
        assert!(formatted.contains("Caused by:"));
        assert!(formatted.contains("checksum mismatch"));
    }

    #[test]
    fn catalog_error_source_follows_cause() {
        let cause = CatalogError::new("inner", ErrorKind::IOError);
        let error = CatalogError::new_with_cause("outer", ErrorKind::CorruptSnapshot, cause);
        assert_eq!(error.source().map(|s| s.to_string()), Some("inner".to_string()));

        let lone = CatalogError::new("lone", ErrorKind::InternalError);
        assert!(lone.source().is_none());
    }

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::DuplicateKey.to_string(), "Duplicate key");
        assert_eq!(ErrorKind::ClassificationFailed.to_string(), "Classification failed");
        assert_eq!(ErrorKind::CorruptSnapshot.to_string(), "Corrupt snapshot");
    }

    #[test]
    fn test_from_io_error_eof_is_corrupt_snapshot() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        let err: CatalogError = io_err.into();
        assert_eq!(err.kind(), &ErrorKind::CorruptSnapshot);
        assert!(err.message().contains("IO error"));
    }

    #[test]
    fn test_from_io_error_other() {
        let io_err = std::io::Error::other("disk gone");
        let err: CatalogError = io_err.into();
        assert_eq!(err.kind(), &ErrorKind::IOError);
    }

    #[test]
    fn test_from_postcard_error() {
        let err: CatalogError = postcard::Error::DeserializeUnexpectedEnd.into();
        assert_eq!(err.kind(), &ErrorKind::CorruptSnapshot);

        let err: CatalogError = postcard::Error::SerializeBufferFull.into();
        assert_eq!(err.kind(), &ErrorKind::EncodingError);
    }

    #[test]
    fn test_from_utf8_error() {
        let utf8_err = String::from_utf8(vec![0xFF, 0xFE]).unwrap_err();
        let err: CatalogError = utf8_err.into();
        assert_eq!(err.kind(), &ErrorKind::EncodingError);
    }

    #[test]
    fn test_from_str_and_string() {
        let err: CatalogError = "oops".into();
        assert_eq!(err.kind(), &ErrorKind::InternalError);
        let err: CatalogError = String::from("oops").into();
        assert_eq!(err.message(), "oops");
    }

    #[test]
    fn test_question_mark_operator_with_from() {
        fn read_header() -> CatalogResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof"))?;
            Ok(())
        }

        let err = read_header().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::CorruptSnapshot);
    }

    #[test]
    fn cloned_error_shares_kind_and_message() {
        let error = CatalogError::new("dup", ErrorKind::DuplicateKey);
        let copy = error.clone();
        assert_eq!(copy.kind(), error.kind());
        assert_eq!(copy.message(), error.message());
    }
}
