//! Errors raised while loading point streams.

use std::io;

use thiserror::Error;

/// Failure to decode a binary point stream.
///
/// None of these are fatal for a chart: the [`Catalog`](crate::Catalog) logs
/// the error once and treats the dataset as empty.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The resource could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The resource length is not a whole number of 8-byte records.
    #[error("stream truncated: {len} bytes is not a multiple of {record} bytes")]
    Truncated {
        /// Resource length in bytes.
        len: usize,
        /// Record length in bytes.
        record: usize,
    },

    /// The final record is not the stream end marker (or there is no record at all).
    #[error("stream end marker missing after {records} records")]
    MissingStreamEnd {
        /// Number of records read.
        records: usize,
    },

    /// A stream end marker appears before the last record.
    #[error("stream end marker at record {index} of {records}")]
    EarlyStreamEnd {
        /// Index of the marker.
        index: usize,
        /// Number of records in the resource.
        records: usize,
    },

    /// A record carries a negative right ascension that is not a known marker.
    #[error("invalid record {index}: right ascension {ra}")]
    InvalidRecord {
        /// Index of the record.
        index: usize,
        /// The stored right ascension.
        ra: f32,
    },
}

/// Result type of the decoder.
pub type Result<T> = std::result::Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let err = LoadError::Truncated { len: 13, record: 8 };
        assert_eq!(
            err.to_string(),
            "stream truncated: 13 bytes is not a multiple of 8 bytes"
        );

        let err = LoadError::InvalidRecord { index: 4, ra: -3.0 };
        assert_eq!(err.to_string(), "invalid record 4: right ascension -3");
    }

    #[test]
    fn from_io() {
        let err: LoadError = io::Error::new(io::ErrorKind::NotFound, "milkyway.bin").into();
        assert!(matches!(err, LoadError::Io(_)));
        assert_eq!(err.to_string(), "I/O error: milkyway.bin");
    }
}
