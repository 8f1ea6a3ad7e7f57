//! Error types for bplusdb.

use thiserror::Error as ThisError;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
/// This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in bplusdb.
///
/// Lookups never fail: a missing key, an empty tree, or an inverted range
/// all surface as `None` or an empty iterator rather than as an error.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The requested tree order is below the minimum of 3.
    #[error("Invalid tree order {0} (must be >= 3)")]
    InvalidOrder(usize),

    /// A split cascade needs more nodes than the tree may allocate.
    ///
    /// The insert that hit this is rejected before any node is touched,
    /// so the tree is exactly as it was before the call.
    #[error("Resource exhausted: split needs {requested} node(s), {available} available")]
    ResourceExhausted { requested: usize, available: usize },

    /// `validate()` found a broken structural invariant.
    ///
    /// This indicates a bug in the split engine.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// I/O error while reading input rows.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A data row could not be parsed.
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Ranks are 1-based.
    #[error("Rank must be >= 1")]
    InvalidRank,

    /// An environment variable holds an unusable value.
    #[error("Invalid value for {name}: {message}")]
    Config { name: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidOrder(2);
        assert_eq!(format!("{}", err), "Invalid tree order 2 (must be >= 3)");

        let err = Error::ResourceExhausted {
            requested: 3,
            available: 1,
        };
        assert_eq!(
            format!("{}", err),
            "Resource exhausted: split needs 3 node(s), 1 available"
        );

        let err = Error::Parse {
            line: 7,
            message: "bad score".to_string(),
        };
        assert_eq!(format!("{}", err), "Parse error on line 7: bad score");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => {} // Success
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error as _;

        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: Error = io_err.into();
        assert!(err.source().is_some());
        assert!(Error::InvalidRank.source().is_none());
    }

    #[test]
    fn test_result_type_alias() {
        fn might_fail() -> Result<u32> {
            Ok(42)
        }

        assert_eq!(might_fail().unwrap(), 42);
    }
}
