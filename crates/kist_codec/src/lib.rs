//! # kist codec
//!
//! Typed field model and binary record codec for kist.
//!
//! This crate defines the closed set of field types an entity can hold and
//! the exact big-endian wire layout of each, plus the record framing that
//! strings field values together under their stable field IDs.
//!
//! ## Wire format
//!
//! A record is a concatenation of `(field-id: u8, type-tag: u8, payload)`
//! tuples. Fixed-width values occupy 1–8 bytes; timestamps a fixed 15;
//! text and byte payloads carry a `u16` big-endian length prefix and are
//! capped at 65 535 bytes. Readers dispatch on the leading field ID, so a
//! record written by a newer schema remains readable: tuples with
//! unrecognized IDs are sized from their type tag and skipped.
//!
//! ## Usage
//!
//! ```
//! use kist_codec::{encode_record, decode_record, Field, FieldValue};
//!
//! let fields = vec![
//!     Field::new(1, FieldValue::Uint64(42)).unwrap(),
//!     Field::new(2, FieldValue::Text("hello".into())).unwrap(),
//! ];
//! let bytes = encode_record(&fields).unwrap();
//! let decoded = decode_record(&bytes).unwrap();
//! assert_eq!(decoded, fields);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod field;
mod record;
mod time;
mod types;
mod value;

pub use error::{CodecError, CodecResult};
pub use field::Field;
pub use record::{decode_record, decode_record_fields, encode_record};
pub use time::{read_timestamp, write_timestamp, TIMESTAMP_WIRE_LEN};
pub use types::FieldType;
pub use value::{FieldValue, MAX_PAYLOAD_LEN};
