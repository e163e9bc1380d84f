//! Typed field values and their wire codecs.

use crate::error::{CodecError, CodecResult};
use crate::time::{read_timestamp, write_timestamp, TIMESTAMP_WIRE_LEN};
use crate::types::FieldType;
use bytes::{Buf, BufMut};
use chrono::{DateTime, FixedOffset};
use std::cmp::Ordering;

/// Maximum payload length for variable-length values.
///
/// The length prefix is a `u16`, so text and byte payloads are capped at
/// 65 535 bytes. Larger blobs belong in files, not fields.
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

/// A single typed field value.
///
/// Every variant maps to exactly one [`FieldType`] and owns the codec for
/// that type's big-endian wire layout. Reference, link, and collection
/// payloads are opaque to this crate; only their type tags and round-trip
/// behavior are guaranteed.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Boolean; one byte, zero is false, nonzero is true.
    Bool(bool),
    /// Signed 8-bit integer.
    Int8(i8),
    /// Signed 16-bit integer.
    Int16(i16),
    /// Signed 32-bit integer.
    Int32(i32),
    /// Signed 64-bit integer.
    Int64(i64),
    /// Unsigned 8-bit integer.
    Uint8(u8),
    /// Unsigned 16-bit integer.
    Uint16(u16),
    /// Unsigned 32-bit integer.
    Uint32(u32),
    /// Unsigned 64-bit integer.
    Uint64(u64),
    /// Single-precision float.
    Float32(f32),
    /// Double-precision float.
    Float64(f64),
    /// Instant in time; normalized to UTC on write.
    Timestamp(DateTime<FixedOffset>),
    /// UTF-8 text, length-prefixed on the wire.
    Text(String),
    /// Raw bytes, length-prefixed on the wire.
    Bytes(Vec<u8>),
    /// Strong reference; opaque owner-defined payload.
    Reference(Vec<u8>),
    /// Weak reference; opaque owner-defined payload.
    Link(Vec<u8>),
    /// Collection of references; opaque owner-defined payload.
    Collection(Vec<u8>),
}

impl FieldValue {
    /// The field type of this value.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Bool(_) => FieldType::Bool,
            FieldValue::Int8(_) => FieldType::Int8,
            FieldValue::Int16(_) => FieldType::Int16,
            FieldValue::Int32(_) => FieldType::Int32,
            FieldValue::Int64(_) => FieldType::Int64,
            FieldValue::Uint8(_) => FieldType::Uint8,
            FieldValue::Uint16(_) => FieldType::Uint16,
            FieldValue::Uint32(_) => FieldType::Uint32,
            FieldValue::Uint64(_) => FieldType::Uint64,
            FieldValue::Float32(_) => FieldType::Float32,
            FieldValue::Float64(_) => FieldType::Float64,
            FieldValue::Timestamp(_) => FieldType::Timestamp,
            FieldValue::Text(_) => FieldType::Text,
            FieldValue::Bytes(_) => FieldType::Bytes,
            FieldValue::Reference(_) => FieldType::Reference,
            FieldValue::Link(_) => FieldType::Link,
            FieldValue::Collection(_) => FieldType::Collection,
        }
    }

    /// The variable-length payload of this value, if it has one.
    #[must_use]
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Text(s) => Some(s.as_bytes()),
            FieldValue::Bytes(b)
            | FieldValue::Reference(b)
            | FieldValue::Link(b)
            | FieldValue::Collection(b) => Some(b),
            _ => None,
        }
    }

    /// Answers whether this is a variable-length value with no payload.
    ///
    /// Empty payloads are never written to the wire; the whole field is
    /// omitted from the record instead.
    #[must_use]
    pub fn is_empty_payload(&self) -> bool {
        self.payload().is_some_and(<[u8]>::is_empty)
    }

    /// The text content, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The byte content, if this is a byte-sequence value.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Writes this value in its wire layout, answering the bytes written.
    ///
    /// An empty variable-length payload writes nothing and answers 0.
    ///
    /// # Errors
    ///
    /// `ValueTooLarge` if a variable-length payload exceeds
    /// [`MAX_PAYLOAD_LEN`].
    pub fn write_to<B: BufMut>(&self, buf: &mut B) -> CodecResult<usize> {
        match self {
            FieldValue::Bool(v) => {
                buf.put_u8(u8::from(*v));
                Ok(1)
            }
            FieldValue::Int8(v) => {
                buf.put_i8(*v);
                Ok(1)
            }
            FieldValue::Int16(v) => {
                buf.put_i16(*v);
                Ok(2)
            }
            FieldValue::Int32(v) => {
                buf.put_i32(*v);
                Ok(4)
            }
            FieldValue::Int64(v) => {
                buf.put_i64(*v);
                Ok(8)
            }
            FieldValue::Uint8(v) => {
                buf.put_u8(*v);
                Ok(1)
            }
            FieldValue::Uint16(v) => {
                buf.put_u16(*v);
                Ok(2)
            }
            FieldValue::Uint32(v) => {
                buf.put_u32(*v);
                Ok(4)
            }
            FieldValue::Uint64(v) => {
                buf.put_u64(*v);
                Ok(8)
            }
            FieldValue::Float32(v) => {
                buf.put_f32(*v);
                Ok(4)
            }
            FieldValue::Float64(v) => {
                buf.put_f64(*v);
                Ok(8)
            }
            FieldValue::Timestamp(v) => write_timestamp(v, buf),
            FieldValue::Text(_)
            | FieldValue::Bytes(_)
            | FieldValue::Reference(_)
            | FieldValue::Link(_)
            | FieldValue::Collection(_) => {
                let payload = self.payload().unwrap_or(&[]);
                if payload.is_empty() {
                    return Ok(0);
                }
                if payload.len() > MAX_PAYLOAD_LEN {
                    return Err(CodecError::ValueTooLarge {
                        len: payload.len(),
                    });
                }
                buf.put_u16(payload.len() as u16);
                buf.put_slice(payload);
                Ok(2 + payload.len())
            }
        }
    }

    /// Reads one value of type `ftype`, answering it with the bytes consumed.
    ///
    /// # Errors
    ///
    /// `ShortRead` if the buffer holds fewer bytes than the layout needs;
    /// `EndOfData` if a variable-length prefix is zero; `UnknownFieldType`
    /// if `ftype` is [`FieldType::Unknown`].
    pub fn read_from<B: Buf>(ftype: FieldType, buf: &mut B) -> CodecResult<(Self, usize)> {
        let fixed = |buf: &mut B, needed: usize| -> CodecResult<()> {
            if buf.remaining() < needed {
                return Err(CodecError::ShortRead {
                    needed,
                    remaining: buf.remaining(),
                });
            }
            Ok(())
        };

        match ftype {
            FieldType::Unknown => Err(CodecError::UnknownFieldType { tag: 0 }),
            FieldType::Bool => {
                fixed(buf, 1)?;
                Ok((FieldValue::Bool(buf.get_u8() != 0), 1))
            }
            FieldType::Int8 => {
                fixed(buf, 1)?;
                Ok((FieldValue::Int8(buf.get_i8()), 1))
            }
            FieldType::Int16 => {
                fixed(buf, 2)?;
                Ok((FieldValue::Int16(buf.get_i16()), 2))
            }
            FieldType::Int32 => {
                fixed(buf, 4)?;
                Ok((FieldValue::Int32(buf.get_i32()), 4))
            }
            FieldType::Int64 => {
                fixed(buf, 8)?;
                Ok((FieldValue::Int64(buf.get_i64()), 8))
            }
            FieldType::Uint8 => {
                fixed(buf, 1)?;
                Ok((FieldValue::Uint8(buf.get_u8()), 1))
            }
            FieldType::Uint16 => {
                fixed(buf, 2)?;
                Ok((FieldValue::Uint16(buf.get_u16()), 2))
            }
            FieldType::Uint32 => {
                fixed(buf, 4)?;
                Ok((FieldValue::Uint32(buf.get_u32()), 4))
            }
            FieldType::Uint64 => {
                fixed(buf, 8)?;
                Ok((FieldValue::Uint64(buf.get_u64()), 8))
            }
            FieldType::Float32 => {
                fixed(buf, 4)?;
                Ok((FieldValue::Float32(buf.get_f32()), 4))
            }
            FieldType::Float64 => {
                fixed(buf, 8)?;
                Ok((FieldValue::Float64(buf.get_f64()), 8))
            }
            FieldType::Timestamp => {
                let value = read_timestamp(buf)?;
                Ok((FieldValue::Timestamp(value), TIMESTAMP_WIRE_LEN))
            }
            FieldType::Text => {
                let payload = read_payload(buf)?;
                let text =
                    String::from_utf8(payload).map_err(|_| CodecError::InvalidUtf8)?;
                let consumed = 2 + text.len();
                Ok((FieldValue::Text(text), consumed))
            }
            FieldType::Bytes => {
                let payload = read_payload(buf)?;
                let consumed = 2 + payload.len();
                Ok((FieldValue::Bytes(payload), consumed))
            }
            FieldType::Reference => {
                let payload = read_payload(buf)?;
                let consumed = 2 + payload.len();
                Ok((FieldValue::Reference(payload), consumed))
            }
            FieldType::Link => {
                let payload = read_payload(buf)?;
                let consumed = 2 + payload.len();
                Ok((FieldValue::Link(payload), consumed))
            }
            FieldType::Collection => {
                let payload = read_payload(buf)?;
                let consumed = 2 + payload.len();
                Ok((FieldValue::Collection(payload), consumed))
            }
        }
    }

    /// Advances past one value of type `ftype` without materializing it.
    ///
    /// Answers the bytes skipped. Used to step over fields a reader did not
    /// request, or whose IDs it does not recognize.
    pub fn skip_from<B: Buf>(ftype: FieldType, buf: &mut B) -> CodecResult<usize> {
        let needed = match ftype {
            FieldType::Unknown => return Err(CodecError::UnknownFieldType { tag: 0 }),
            FieldType::Bool | FieldType::Int8 | FieldType::Uint8 => 1,
            FieldType::Int16 | FieldType::Uint16 => 2,
            FieldType::Int32 | FieldType::Uint32 | FieldType::Float32 => 4,
            FieldType::Int64 | FieldType::Uint64 | FieldType::Float64 => 8,
            FieldType::Timestamp => TIMESTAMP_WIRE_LEN,
            FieldType::Text
            | FieldType::Bytes
            | FieldType::Reference
            | FieldType::Link
            | FieldType::Collection => {
                if buf.remaining() < 2 {
                    return Err(CodecError::ShortRead {
                        needed: 2,
                        remaining: buf.remaining(),
                    });
                }
                let len = buf.get_u16() as usize;
                if len == 0 {
                    return Err(CodecError::EndOfData);
                }
                if buf.remaining() < len {
                    return Err(CodecError::ShortRead {
                        needed: len,
                        remaining: buf.remaining(),
                    });
                }
                buf.advance(len);
                return Ok(2 + len);
            }
        };

        if buf.remaining() < needed {
            return Err(CodecError::ShortRead {
                needed,
                remaining: buf.remaining(),
            });
        }
        buf.advance(needed);
        Ok(needed)
    }

    /// Orders two values of the same type.
    ///
    /// Numeric values order numerically, timestamps by instant, text and
    /// byte payloads lexicographically. Values of different types, and
    /// float comparisons involving NaN, answer `None`.
    #[must_use]
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Bool(a), FieldValue::Bool(b)) => Some(a.cmp(b)),
            (FieldValue::Int8(a), FieldValue::Int8(b)) => Some(a.cmp(b)),
            (FieldValue::Int16(a), FieldValue::Int16(b)) => Some(a.cmp(b)),
            (FieldValue::Int32(a), FieldValue::Int32(b)) => Some(a.cmp(b)),
            (FieldValue::Int64(a), FieldValue::Int64(b)) => Some(a.cmp(b)),
            (FieldValue::Uint8(a), FieldValue::Uint8(b)) => Some(a.cmp(b)),
            (FieldValue::Uint16(a), FieldValue::Uint16(b)) => Some(a.cmp(b)),
            (FieldValue::Uint32(a), FieldValue::Uint32(b)) => Some(a.cmp(b)),
            (FieldValue::Uint64(a), FieldValue::Uint64(b)) => Some(a.cmp(b)),
            (FieldValue::Float32(a), FieldValue::Float32(b)) => a.partial_cmp(b),
            (FieldValue::Float64(a), FieldValue::Float64(b)) => a.partial_cmp(b),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => Some(a.cmp(b)),
            (FieldValue::Text(a), FieldValue::Text(b)) => Some(a.cmp(b)),
            (FieldValue::Bytes(a), FieldValue::Bytes(b)) => Some(a.cmp(b)),
            (FieldValue::Reference(a), FieldValue::Reference(b)) => Some(a.cmp(b)),
            (FieldValue::Link(a), FieldValue::Link(b)) => Some(a.cmp(b)),
            (FieldValue::Collection(a), FieldValue::Collection(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Reads a u16-length-prefixed payload.
fn read_payload<B: Buf>(buf: &mut B) -> CodecResult<Vec<u8>> {
    if buf.remaining() < 2 {
        return Err(CodecError::ShortRead {
            needed: 2,
            remaining: buf.remaining(),
        });
    }
    let len = buf.get_u16() as usize;
    if len == 0 {
        // A zero-length prefix is never written; it marks end-of-data.
        return Err(CodecError::EndOfData);
    }
    if buf.remaining() < len {
        return Err(CodecError::ShortRead {
            needed: len,
            remaining: buf.remaining(),
        });
    }
    let mut payload = vec![0u8; len];
    buf.copy_to_slice(&mut payload);
    Ok(payload)
}
