//! Field type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The data types a field can hold.
///
/// The discriminant doubles as the on-wire type tag, so variants must
/// never be reordered or renumbered. `Unknown` (zero) is invalid wherever
/// a type is accepted as input; it exists only so that an uninitialized
/// tag byte is distinguishable from every real type.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Invalid / unset. Rejected as input everywhere.
    Unknown = 0,
    /// Boolean, one byte on the wire.
    Bool = 1,
    /// Signed 8-bit integer.
    Int8 = 2,
    /// Signed 16-bit integer.
    Int16 = 3,
    /// Signed 32-bit integer.
    Int32 = 4,
    /// Signed 64-bit integer.
    Int64 = 5,
    /// Unsigned 8-bit integer.
    Uint8 = 6,
    /// Unsigned 16-bit integer.
    Uint16 = 7,
    /// Unsigned 32-bit integer.
    Uint32 = 8,
    /// Unsigned 64-bit integer.
    Uint64 = 9,
    /// IEEE 754 single-precision float.
    Float32 = 10,
    /// IEEE 754 double-precision float.
    Float64 = 11,
    /// Instant in time, stored UTC-normalized.
    Timestamp = 12,
    /// UTF-8 text, at most 65 535 bytes.
    Text = 13,
    /// Raw byte sequence, at most 65 535 bytes.
    Bytes = 14,
    /// Strong reference to another entity; opaque owner-defined payload.
    Reference = 15,
    /// Weak reference (link); opaque owner-defined payload.
    Link = 16,
    /// Collection of references; opaque owner-defined payload.
    Collection = 17,
}

impl FieldType {
    /// Answers whether this is a recognized, usable field type.
    ///
    /// `Unknown` is not usable.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self != FieldType::Unknown
    }

    /// The on-wire tag byte for this type.
    #[inline]
    #[must_use]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Resolves a wire tag back to a field type.
    ///
    /// Returns `None` for zero and for tags outside the known range.
    #[must_use]
    pub fn from_tag(tag: u8) -> Option<Self> {
        let ftype = match tag {
            1 => FieldType::Bool,
            2 => FieldType::Int8,
            3 => FieldType::Int16,
            4 => FieldType::Int32,
            5 => FieldType::Int64,
            6 => FieldType::Uint8,
            7 => FieldType::Uint16,
            8 => FieldType::Uint32,
            9 => FieldType::Uint64,
            10 => FieldType::Float32,
            11 => FieldType::Float64,
            12 => FieldType::Timestamp,
            13 => FieldType::Text,
            14 => FieldType::Bytes,
            15 => FieldType::Reference,
            16 => FieldType::Link,
            17 => FieldType::Collection,
            _ => return None,
        };
        Some(ftype)
    }

    /// Answers whether values of this type carry a length-prefixed payload.
    #[must_use]
    pub fn is_variable_length(self) -> bool {
        matches!(
            self,
            FieldType::Text
                | FieldType::Bytes
                | FieldType::Reference
                | FieldType::Link
                | FieldType::Collection
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Unknown => "unknown",
            FieldType::Bool => "bool",
            FieldType::Int8 => "int8",
            FieldType::Int16 => "int16",
            FieldType::Int32 => "int32",
            FieldType::Int64 => "int64",
            FieldType::Uint8 => "uint8",
            FieldType::Uint16 => "uint16",
            FieldType::Uint32 => "uint32",
            FieldType::Uint64 => "uint64",
            FieldType::Float32 => "float32",
            FieldType::Float64 => "float64",
            FieldType::Timestamp => "timestamp",
            FieldType::Text => "text",
            FieldType::Bytes => "bytes",
            FieldType::Reference => "reference",
            FieldType::Link => "link",
            FieldType::Collection => "collection",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_is_invalid() {
        assert!(!FieldType::Unknown.is_valid());
        assert!(FieldType::Bool.is_valid());
        assert!(FieldType::Collection.is_valid());
    }

    #[test]
    fn tag_roundtrip() {
        for tag in 1u8..=17 {
            let ftype = FieldType::from_tag(tag).unwrap();
            assert_eq!(ftype.tag(), tag);
        }
    }

    #[test]
    fn zero_and_out_of_range_tags_rejected() {
        assert_eq!(FieldType::from_tag(0), None);
        assert_eq!(FieldType::from_tag(18), None);
        assert_eq!(FieldType::from_tag(255), None);
    }

    #[test]
    fn variable_length_classification() {
        assert!(FieldType::Text.is_variable_length());
        assert!(FieldType::Reference.is_variable_length());
        assert!(!FieldType::Uint64.is_variable_length());
        assert!(!FieldType::Timestamp.is_variable_length());
    }
}
