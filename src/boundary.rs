//! Synthetic version 1 UUIDs bounding all UUIDs mintable within a millisecond, for inclusive range
//! scans over stores ordering UUIDs by time.
//!
//! Such stores compare two version 1 UUIDs by their 60-bit timestamps first and, on a tie, by their
//! bytes taken as signed integers. The bounds therefore fill the clock sequence and node bytes with
//! the smallest (`0x80`, i.e. -128) or the largest (`0x7f`) signed byte value. The lower bound keeps
//! the `10` variant bits with all other bits of its clock sequence and node cleared.

use crate::{
    clock::{self, TICKS_PER_MILLI},
    Error, Result, Uuid,
};

/// Clock sequence and node bits of the smallest UUID of a millisecond.
const MIN_CLOCK_SEQ_AND_NODE: u64 = 0x8080_8080_8080_8080;

/// Clock sequence and node bits of the largest UUID of a millisecond.
const MAX_CLOCK_SEQ_AND_NODE: u64 = 0x7f7f_7f7f_7f7f_7f7f;

/// Builds the most significant half of a version 1 UUID carrying `ticks`.
const fn time_and_version(ticks: u64) -> u64 {
    Uuid::from_fields_v1(ticks, 0, 0).as_u64_pair().0
}

/// Returns the smallest UUID that could have been generated at the millisecond `unix_ts_ms`.
///
/// # Panics
///
/// Panics if `unix_ts_ms` is outside
/// [`MIN_UNIX_MILLIS`](clock::MIN_UNIX_MILLIS)`..=`[`MAX_UNIX_MILLIS`](clock::MAX_UNIX_MILLIS).
///
/// # Examples
///
/// ```rust
/// let lower = timeuuid::start_of(0);
/// assert_eq!(lower.to_string(), "13814000-1dd2-11b2-8080-808080808080");
/// ```
pub const fn start_of(unix_ts_ms: i64) -> Uuid {
    let ticks = clock::ticks_from_unix_millis(unix_ts_ms);
    Uuid::from_u64_pair(time_and_version(ticks), MIN_CLOCK_SEQ_AND_NODE)
}

/// Returns the largest UUID that could have been generated at the millisecond `unix_ts_ms`.
///
/// # Panics
///
/// Panics if `unix_ts_ms` is outside
/// [`MIN_UNIX_MILLIS`](clock::MIN_UNIX_MILLIS)`..=`[`MAX_UNIX_MILLIS`](clock::MAX_UNIX_MILLIS).
///
/// # Examples
///
/// ```rust
/// let upper = timeuuid::end_of(0);
/// assert_eq!(upper.to_string(), "1381670f-1dd2-11b2-7f7f-7f7f7f7f7f7f");
/// ```
pub const fn end_of(unix_ts_ms: i64) -> Uuid {
    let ticks = clock::ticks_from_unix_millis(unix_ts_ms) + TICKS_PER_MILLI - 1;
    Uuid::from_u64_pair(time_and_version(ticks), MAX_CLOCK_SEQ_AND_NODE)
}

/// Returns the Unix timestamp in milliseconds embedded in a version 1 UUID.
///
/// # Errors
///
/// Returns [`Error::NotTimeBased`] if the version field of `uuid` is not 1. The variant field is
/// not checked, so the bounds returned by [`end_of`] are accepted.
///
/// # Examples
///
/// ```rust
/// let ts = timeuuid::unix_timestamp(&timeuuid::start_of(1_700_000_000_000))?;
/// assert_eq!(ts, 1_700_000_000_000);
/// # Ok::<(), timeuuid::Error>(())
/// ```
pub fn unix_timestamp(uuid: &Uuid) -> Result<i64> {
    uuid.timestamp()
        .map(clock::unix_millis_from_ticks)
        .ok_or_else(|| Error::NotTimeBased {
            version: uuid.version(),
        })
}
