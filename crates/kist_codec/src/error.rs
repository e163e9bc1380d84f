//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding field data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Fewer bytes were available than the value's layout requires.
    ///
    /// Partial reads are never accepted as complete values.
    #[error("short read: needed {needed} bytes, {remaining} remaining")]
    ShortRead {
        /// Bytes the layout requires.
        needed: usize,
        /// Bytes actually available.
        remaining: usize,
    },

    /// A zero-length payload prefix was read where data was expected.
    ///
    /// Stored records never contain empty variable-length payloads, so a
    /// zero length prefix marks the end of usable data, not an empty value.
    #[error("end of data: zero-length payload prefix")]
    EndOfData,

    /// The type tag does not name a recognized field type.
    #[error("unknown field type tag {tag}")]
    UnknownFieldType {
        /// The offending tag byte.
        tag: u8,
    },

    /// A field ID of zero was supplied or decoded.
    ///
    /// Zero means "unset"; valid field IDs are 1..=255.
    #[error("zero field ID")]
    ZeroFieldId,

    /// A text payload is not valid UTF-8.
    #[error("invalid UTF-8 in text payload")]
    InvalidUtf8,

    /// A variable-length payload exceeds the 65 535-byte wire limit.
    #[error("value too large: {len} bytes exceeds the 65535-byte limit")]
    ValueTooLarge {
        /// Actual payload length.
        len: usize,
    },

    /// Writing a value failed.
    #[error("write failure: {message}")]
    WriteFailure {
        /// Description of the failure.
        message: String,
    },

    /// A stored timestamp could not be reconstructed.
    #[error("invalid timestamp: {message}")]
    InvalidTimestamp {
        /// Description of the problem.
        message: String,
    },
}

impl CodecError {
    /// Create a write failure error.
    pub fn write_failure(message: impl Into<String>) -> Self {
        Self::WriteFailure {
            message: message.into(),
        }
    }

    /// Create an invalid timestamp error.
    pub fn invalid_timestamp(message: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            message: message.into(),
        }
    }
}
