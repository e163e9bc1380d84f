//! Entity identity and the capability contract stored values satisfy.

use crate::error::{CoreError, CoreResult};
use kist_codec::Field;
use std::fmt;

/// The canonical storage key of an entity.
///
/// Wraps the entity's 64-bit ID; the serialized form is the big-endian
/// 8-byte encoding, used directly as the key in the backing store. Byte
/// order of encoded keys therefore equals numeric order of IDs, which is
/// what gives searches their natural ascending-ID iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKey(u64);

impl EntityKey {
    /// Creates a key for the given entity ID.
    ///
    /// # Errors
    ///
    /// `ZeroIdentifier` if `id` is zero; zero means "unset" everywhere in
    /// kist and is never a valid entity ID.
    pub fn new(id: u64) -> CoreResult<Self> {
        if id == 0 {
            return Err(CoreError::ZeroIdentifier);
        }
        Ok(Self(id))
    }

    /// The numeric entity ID.
    #[inline]
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }

    /// The big-endian 8-byte storage encoding.
    #[inline]
    #[must_use]
    pub fn to_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Reconstructs a key from its storage encoding.
    ///
    /// # Errors
    ///
    /// `CorruptKey` if the slice is not exactly 8 bytes, `ZeroIdentifier`
    /// if it decodes to zero.
    pub fn from_bytes(bytes: &[u8]) -> CoreResult<Self> {
        let arr: [u8; 8] = bytes
            .try_into()
            .map_err(|_| CoreError::CorruptKey { len: bytes.len() })?;
        Self::new(u64::from_be_bytes(arr))
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The capability contract a stored value must satisfy.
///
/// Any value that can report a numeric ID, the name of its owning entity
/// type, and a human-readable form can be persisted. The storage key is
/// derived from the ID by default; types with a different key scheme can
/// override [`Entity::key`].
pub trait Entity: fmt::Display {
    /// A unique identifier for this instance within its entity type.
    fn id(&self) -> u64;

    /// The name of the entity type that owns this value.
    fn type_name(&self) -> &str;

    /// The storage key for this instance.
    ///
    /// # Errors
    ///
    /// `ZeroIdentifier` if the ID is zero.
    fn key(&self) -> CoreResult<EntityKey> {
        EntityKey::new(self.id())
    }
}

/// The serialization seam between application types and the record codec.
///
/// Implementors describe how a value decomposes into fields for storage
/// and how it is rebuilt from the fields read back. `from_fields` must
/// tolerate absent fields: a search that decodes only some fields, or a
/// record written before a field was added, hands back a partial set.
pub trait EntityCodec: Entity + Sized {
    /// Decomposes this value into its persistent fields.
    ///
    /// # Errors
    ///
    /// Field construction errors, e.g. a zero field ID.
    fn to_fields(&self) -> CoreResult<Vec<Field>>;

    /// Rebuilds a value from stored fields.
    ///
    /// `key` is the storage key the record was found under. Fields absent
    /// from `fields` take their empty/default values.
    ///
    /// # Errors
    ///
    /// Any domain-level validation failure.
    fn from_fields(key: EntityKey, fields: Vec<Field>) -> CoreResult<Self>;
}
