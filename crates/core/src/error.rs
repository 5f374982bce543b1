//! Error types for Sunshine

use thiserror::Error;

/// Main error type for Sunshine operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TIFF error: {0}")]
    Tiff(String),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("Invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Computation failed at cell ({row}, {col}): {reason}")]
    Computation {
        row: usize,
        col: usize,
        reason: String,
    },

    #[error("Non-finite {quantity}: {value}")]
    NonFinite { quantity: &'static str, value: f64 },

    #[error("{0}")]
    Other(String),
}

/// Coarse classification of an [`Error`].
///
/// Callers that only need to pick an exit status or a user-facing message
/// match on this instead of on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad caller input: timestamp, parameter or array shape
    Input,
    /// The numerical model produced an undefined result
    Computation,
    /// Creating, writing or flushing a file failed
    Io,
    /// Anything else
    Other,
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidTimestamp { .. }
            | Error::InvalidParameter { .. }
            | Error::InvalidDimensions { .. } => ErrorKind::Input,
            Error::Computation { .. } | Error::NonFinite { .. } => ErrorKind::Computation,
            Error::Io(_) | Error::Tiff(_) => ErrorKind::Io,
            Error::IndexOutOfBounds { .. } | Error::UnsupportedDataType(_) | Error::Other(_) => {
                ErrorKind::Other
            }
        }
    }
}

impl From<tiff::TiffError> for Error {
    fn from(e: tiff::TiffError) -> Self {
        match e {
            tiff::TiffError::IoError(io) => Error::Io(io),
            other => Error::Tiff(other.to_string()),
        }
    }
}

/// Result type alias for Sunshine operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let io = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        assert_eq!(io.kind(), ErrorKind::Io);

        let ts = Error::InvalidTimestamp {
            value: "2020-06-21T12:00:00".into(),
            reason: "no offset".into(),
        };
        assert_eq!(ts.kind(), ErrorKind::Input);

        let comp = Error::Computation {
            row: 1,
            col: 2,
            reason: "NaN altitude".into(),
        };
        assert_eq!(comp.kind(), ErrorKind::Computation);
        assert!(comp.to_string().contains("(1, 2)"));
    }
}
