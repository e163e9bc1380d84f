//! Binary timestamp layout.
//!
//! Timestamps occupy a fixed 15 bytes on the wire:
//!
//! ```text
//! byte  0      layout version, always 1
//! bytes 1..9   i64 BE seconds since 0001-01-01T00:00:00 UTC
//! bytes 9..13  i32 BE nanoseconds within the second
//! bytes 13..15 i16 BE zone offset in minutes; -1 marks UTC
//! ```
//!
//! Values are normalized to UTC before encoding so that stored timestamps
//! compare without regard to the writer's zone. The decoder reconstructs
//! the instant and discards the stored offset.

use crate::error::{CodecError, CodecResult};
use bytes::{Buf, BufMut};
use chrono::{DateTime, FixedOffset, Utc};

/// Encoded size of a timestamp.
pub const TIMESTAMP_WIRE_LEN: usize = 15;

/// Layout version byte.
const LAYOUT_VERSION: u8 = 1;

/// Seconds between 0001-01-01 and the Unix epoch.
const UNIX_EPOCH_OFFSET: i64 = 62_135_596_800;

/// Offset-minutes sentinel for UTC.
const UTC_OFFSET_MARKER: i16 = -1;

/// Writes `value` in the 15-byte layout, normalized to UTC.
pub fn write_timestamp<B: BufMut>(value: &DateTime<FixedOffset>, buf: &mut B) -> CodecResult<usize> {
    let utc = value.with_timezone(&Utc);
    buf.put_u8(LAYOUT_VERSION);
    buf.put_i64(utc.timestamp() + UNIX_EPOCH_OFFSET);
    buf.put_i32(utc.timestamp_subsec_nanos() as i32);
    buf.put_i16(UTC_OFFSET_MARKER);
    Ok(TIMESTAMP_WIRE_LEN)
}

/// Reads a 15-byte timestamp, answering the reconstructed UTC instant.
///
/// # Errors
///
/// `ShortRead` if fewer than 15 bytes remain; `InvalidTimestamp` if the
/// version byte or the seconds/nanoseconds fields are out of range.
pub fn read_timestamp<B: Buf>(buf: &mut B) -> CodecResult<DateTime<FixedOffset>> {
    if buf.remaining() < TIMESTAMP_WIRE_LEN {
        return Err(CodecError::ShortRead {
            needed: TIMESTAMP_WIRE_LEN,
            remaining: buf.remaining(),
        });
    }

    let version = buf.get_u8();
    if version != LAYOUT_VERSION {
        return Err(CodecError::invalid_timestamp(format!(
            "unsupported layout version {version}"
        )));
    }

    let seconds = buf.get_i64() - UNIX_EPOCH_OFFSET;
    let nanos = buf.get_i32();
    let _offset_minutes = buf.get_i16(); // zone information is discarded

    let nanos = u32::try_from(nanos)
        .map_err(|_| CodecError::invalid_timestamp("negative nanoseconds"))?;
    let instant = DateTime::<Utc>::from_timestamp(seconds, nanos)
        .ok_or_else(|| CodecError::invalid_timestamp("seconds out of range"))?;
    Ok(instant.fixed_offset())
}
