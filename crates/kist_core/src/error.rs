//! Error types for kist core.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in kist core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An empty name was given where a name is required.
    #[error("empty name given")]
    EmptyName,

    /// A name fails the naming rule.
    ///
    /// Names are lowercase ASCII, at least two characters, start and end
    /// with a letter or digit, and may contain `-` and `_` in between.
    #[error("invalid name: {name:?}")]
    InvalidName {
        /// The offending name.
        name: String,
    },

    /// A unique name was expected, but the given name already exists.
    #[error("name already exists: {name:?}")]
    NameExists {
        /// The duplicate name.
        name: String,
    },

    /// An existing name was expected, but the given name is unknown.
    #[error("unknown name: {name:?}")]
    NameUnknown {
        /// The name that was not found.
        name: String,
    },

    /// An unrecognized field type was specified.
    #[error("unknown field type specified")]
    UnknownFieldType,

    /// A positive ID was expected, but zero was given.
    #[error("zero ID value given")]
    ZeroIdentifier,

    /// An entity type already holds the maximum of 255 fields.
    #[error("entity type {entity_type:?} already has 255 fields")]
    TooManyFields {
        /// Name of the full entity type.
        entity_type: String,
    },

    /// An empty base path was given at storage initialization.
    #[error("empty storage path given")]
    PathEmpty,

    /// A relative base path was given at storage initialization.
    #[error("storage path is not absolute: {path:?}")]
    PathNotAbsolute {
        /// The offending path.
        path: String,
    },

    /// A cached storage-initialization failure, re-reported to every
    /// caller until a successful initialization replaces it.
    #[error("storage initialization failed: {message}")]
    InitFailed {
        /// The original failure, rendered.
        message: String,
    },

    /// A stored key is not a valid 8-byte entity key.
    #[error("corrupt entity key of {len} bytes")]
    CorruptKey {
        /// Length of the malformed key.
        len: usize,
    },

    /// Field codec error.
    #[error("codec error: {0}")]
    Codec(#[from] kist_codec::CodecError),

    /// System catalog (de)serialization error.
    #[error("catalog error: {message}")]
    Catalog {
        /// Description of the failure.
        message: String,
    },

    /// Storage engine error.
    #[error("storage engine error: {0}")]
    Engine(Box<redb::Error>),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CoreError {
    /// Create an invalid name error.
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName { name: name.into() }
    }

    /// Create a name-exists error.
    pub fn name_exists(name: impl Into<String>) -> Self {
        Self::NameExists { name: name.into() }
    }

    /// Create a name-unknown error.
    pub fn name_unknown(name: impl Into<String>) -> Self {
        Self::NameUnknown { name: name.into() }
    }

    /// Create a catalog error.
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }
}

impl From<redb::Error> for CoreError {
    fn from(err: redb::Error) -> Self {
        Self::Engine(Box::new(err))
    }
}

impl From<redb::DatabaseError> for CoreError {
    fn from(err: redb::DatabaseError) -> Self {
        Self::Engine(Box::new(err.into()))
    }
}

impl From<redb::TransactionError> for CoreError {
    fn from(err: redb::TransactionError) -> Self {
        Self::Engine(Box::new(err.into()))
    }
}

impl From<redb::TableError> for CoreError {
    fn from(err: redb::TableError) -> Self {
        Self::Engine(Box::new(err.into()))
    }
}

impl From<redb::StorageError> for CoreError {
    fn from(err: redb::StorageError) -> Self {
        Self::Engine(Box::new(err.into()))
    }
}

impl From<redb::CommitError> for CoreError {
    fn from(err: redb::CommitError) -> Self {
        Self::Engine(Box::new(err.into()))
    }
}
