//! Record framing.
//!
//! A record is the serialized image of one entity: a concatenation of
//! `(field-id, type-tag, payload)` tuples in no particular order. Readers
//! dispatch on the leading field ID, never on position, which is what makes
//! additive schema evolution possible: a reader that does not recognize a
//! field ID sizes the payload from the type tag and steps over it.

use crate::error::{CodecError, CodecResult};
use crate::field::Field;
use crate::types::FieldType;
use crate::value::FieldValue;
use bytes::Buf;

/// Serializes fields into a record image.
///
/// Fields with an empty variable-length payload are omitted entirely; they
/// decode back as absent, which callers treat as the empty value.
///
/// # Errors
///
/// Propagates value-level write failures, e.g. `ValueTooLarge`.
pub fn encode_record(fields: &[Field]) -> CodecResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(fields.len() * 16);
    for field in fields {
        if field.value().is_empty_payload() {
            continue;
        }
        buf.push(field.id());
        buf.push(field.field_type().tag());
        field.value().write_to(&mut buf)?;
    }
    Ok(buf)
}

/// Decodes every field present in a record image.
///
/// # Errors
///
/// Any malformed tuple aborts the whole decode; a partially decoded record
/// is never answered.
pub fn decode_record(bytes: &[u8]) -> CodecResult<Vec<Field>> {
    decode_record_fields(bytes, &[])
}

/// Decodes only the fields whose IDs appear in `wanted`.
///
/// Tuples for other IDs are skipped by sizing their payload from the type
/// tag, including IDs this reader has never seen. An empty `wanted` decodes
/// everything; that is the expensive path and callers should list the
/// fields they need when they can.
///
/// # Errors
///
/// `UnknownFieldType` if a tuple carries an unrecognizable type tag (the
/// payload cannot be sized); `ZeroFieldId` for a zero ID byte; any
/// value-level decode error aborts the whole record.
pub fn decode_record_fields(bytes: &[u8], wanted: &[u8]) -> CodecResult<Vec<Field>> {
    let mut buf = bytes;
    let mut fields = Vec::new();

    while buf.has_remaining() {
        let id = buf.get_u8();
        if id == 0 {
            return Err(CodecError::ZeroFieldId);
        }
        if !buf.has_remaining() {
            return Err(CodecError::ShortRead {
                needed: 1,
                remaining: 0,
            });
        }
        let tag = buf.get_u8();
        let ftype = FieldType::from_tag(tag).ok_or(CodecError::UnknownFieldType { tag })?;

        if wanted.is_empty() || wanted.contains(&id) {
            let (value, _) = FieldValue::read_from(ftype, &mut buf)?;
            fields.push(Field::new(id, value)?);
        } else {
            FieldValue::skip_from(ftype, &mut buf)?;
        }
    }

    Ok(fields)
}
