//! Runtime field holder.

use crate::error::{CodecError, CodecResult};
use crate::types::FieldType;
use crate::value::{FieldValue, MAX_PAYLOAD_LEN};
use tracing::warn;

/// One field of an entity: a definition ID paired with its current value.
///
/// Once serialized, a field is identified solely by its ID, never by its
/// name. That keeps records compact and makes renaming a field in the
/// schema safe for existing data.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    id: u8,
    value: FieldValue,
}

impl Field {
    /// Creates a field holding `value` for the definition with `id`.
    ///
    /// # Errors
    ///
    /// `ZeroFieldId` if `id` is zero; zero means "unset" and is never a
    /// valid field ID.
    pub fn new(id: u8, value: FieldValue) -> CodecResult<Self> {
        if id == 0 {
            return Err(CodecError::ZeroFieldId);
        }
        Ok(Self { id, value })
    }

    /// The ID of this field within its entity type definition.
    #[inline]
    #[must_use]
    pub fn id(&self) -> u8 {
        self.id
    }

    /// The field type of the held value.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.value.field_type()
    }

    /// The held value.
    #[must_use]
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Consumes the field, answering the held value.
    #[must_use]
    pub fn into_value(self) -> FieldValue {
        self.value
    }

    /// Replaces the held value.
    ///
    /// Text and byte payloads longer than 65 535 bytes cannot be stored;
    /// such a set is dropped, the previous value stays in place, and the
    /// attempt is reported through the log. Callers that need confirmation
    /// must check the held value afterwards.
    pub fn set(&mut self, value: FieldValue) {
        if let Some(payload) = value.payload() {
            if payload.len() > MAX_PAYLOAD_LEN {
                warn!(
                    field_id = self.id,
                    len = payload.len(),
                    limit = MAX_PAYLOAD_LEN,
                    "dropping oversized field value"
                );
                return;
            }
        }
        self.value = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_id_rejected() {
        let err = Field::new(0, FieldValue::Bool(true)).unwrap_err();
        assert_eq!(err, CodecError::ZeroFieldId);
    }

    #[test]
    fn set_replaces_value() {
        let mut field = Field::new(1, FieldValue::Text("old".into())).unwrap();
        field.set(FieldValue::Text("new".into()));
        assert_eq!(field.value().as_text(), Some("new"));
    }

    #[test]
    fn oversized_set_is_dropped() {
        let mut field = Field::new(2, FieldValue::Text("kept".into())).unwrap();
        field.set(FieldValue::Text("y".repeat(MAX_PAYLOAD_LEN + 1)));
        // Previous value is untouched.
        assert_eq!(field.value().as_text(), Some("kept"));

        field.set(FieldValue::Bytes(vec![0u8; 65_536]));
        assert_eq!(field.value().as_text(), Some("kept"));
    }

    #[test]
    fn maximum_length_set_is_accepted() {
        let mut field = Field::new(3, FieldValue::Text(String::new())).unwrap();
        let text = "z".repeat(MAX_PAYLOAD_LEN);
        field.set(FieldValue::Text(text.clone()));
        assert_eq!(field.value().as_text(), Some(text.as_str()));
    }
}
