/*!
    Error types for the side-channel crate ecosystem.
*/

use thiserror::Error;

/**
    Error type shared by all side-channel contracts.

    Every failure is local and non-fatal. A consumer that gets
    [`Error::NotFound`] for a side-data kind should treat the feature as
    unavailable for that unit and carry on with a default.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed identifier or inconsistent data/size pairing.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
    /// Query for something that was never stored.
    #[error("not found: {what}")]
    NotFound { what: String },
    /// Index past the current element count.
    #[error("index {index} out of range (count {count})")]
    OutOfRange { index: usize, count: usize },
    /// Operation not implemented by this carrier or component.
    #[error("unsupported: {message}")]
    Unsupported { message: String },
}

impl Error {
    /**
        Create an invalid argument error with the given message.
    */
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /**
        Create a not found error describing what was missing.
    */
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /**
        Create an out of range error for `index` against `count`.
    */
    pub fn out_of_range(index: usize, count: usize) -> Self {
        Self::OutOfRange { index, count }
    }

    /**
        Create an unsupported operation error with the given message.
    */
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /**
        Returns true if this is a not found error.
    */
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /**
        Returns true if this is an out of range error.
    */
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }

    /**
        Returns true if this is an unsupported operation error.
    */
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

/**
    Check that `index` addresses an element in a sequence of `count` elements.
*/
#[inline]
pub fn ensure_index(index: usize, count: usize) -> Result<()> {
    if index < count {
        Ok(())
    } else {
        Err(Error::out_of_range(index, count))
    }
}

/**
    Result type alias for the side-channel crate ecosystem.
*/
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let e = Error::invalid_argument("nil side-data kind");
        assert_eq!(format!("{e}"), "invalid argument: nil side-data kind");

        let e = Error::not_found("side-data {ABC}");
        assert_eq!(format!("{e}"), "not found: side-data {ABC}");

        let e = Error::out_of_range(3, 2);
        assert_eq!(format!("{e}"), "index 3 out of range (count 2)");

        let e = Error::unsupported("carrier has no side-data");
        assert_eq!(format!("{e}"), "unsupported: carrier has no side-data");
    }

    #[test]
    fn error_predicates() {
        assert!(Error::not_found("x").is_not_found());
        assert!(!Error::not_found("x").is_out_of_range());
        assert!(Error::out_of_range(0, 0).is_out_of_range());
        assert!(Error::unsupported("x").is_unsupported());
        assert!(!Error::invalid_argument("x").is_unsupported());
    }

    #[test]
    fn index_checks() {
        assert!(ensure_index(0, 1).is_ok());
        assert!(ensure_index(4, 5).is_ok());
        assert_eq!(ensure_index(5, 5), Err(Error::out_of_range(5, 5)));
        assert_eq!(ensure_index(0, 0), Err(Error::out_of_range(0, 0)));
    }
}
