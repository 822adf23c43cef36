//! Time sources, the strictly advancing clock sequence, and conversions between Unix milliseconds
//! and the 100-nanosecond ticks embedded in version 1 UUIDs.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

use crossbeam_utils::{Backoff, CachePadded};

use crate::{Error, Result};

/// Number of 100-nanosecond ticks between 1582-10-15T00:00:00Z and 1970-01-01T00:00:00Z.
pub const GREGORIAN_OFFSET_TICKS: u64 = 0x01b2_1dd2_1381_4000;

/// Number of 100-nanosecond ticks in one millisecond.
pub const TICKS_PER_MILLI: u64 = 10_000;

/// The largest value the 60-bit time field can hold.
pub const MAX_TICKS: u64 = (1 << 60) - 1;

/// How long a caller waits for the clock to leave an exhausted millisecond before moving on.
const MAX_SATURATION_WAIT: Duration = Duration::from_millis(1);

/// The earliest Unix timestamp in milliseconds that has a tick representation (1582-10-15).
pub const MIN_UNIX_MILLIS: i64 = -((GREGORIAN_OFFSET_TICKS / TICKS_PER_MILLI) as i64);

/// The latest Unix timestamp in milliseconds whose every tick fits in the 60-bit time field.
pub const MAX_UNIX_MILLIS: i64 = ((1 << 60) / TICKS_PER_MILLI - 1) as i64 + MIN_UNIX_MILLIS;

/// Converts milliseconds since the Unix epoch to 100-nanosecond ticks since 1582-10-15, exactly.
///
/// # Panics
///
/// Panics if `unix_ts_ms` is outside `MIN_UNIX_MILLIS..=MAX_UNIX_MILLIS`.
pub const fn ticks_from_unix_millis(unix_ts_ms: i64) -> u64 {
    assert!(
        MIN_UNIX_MILLIS <= unix_ts_ms && unix_ts_ms <= MAX_UNIX_MILLIS,
        "`unix_ts_ms` out of representable range"
    );
    (unix_ts_ms - MIN_UNIX_MILLIS) as u64 * TICKS_PER_MILLI
}

/// Converts 100-nanosecond ticks since 1582-10-15 to milliseconds since the Unix epoch, discarding
/// the sub-millisecond remainder.
pub const fn unix_millis_from_ticks(ticks: u64) -> i64 {
    (ticks / TICKS_PER_MILLI) as i64 + MIN_UNIX_MILLIS
}

/// A wall clock read in 100-nanosecond ticks since 1582-10-15T00:00:00Z.
///
/// This abstraction allows a generator to run on the real system clock or on a mocked clock in
/// tests.
///
/// # Example
///
/// ```
/// use timeuuid::{Result, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn now_ticks(&self) -> Result<u64> {
///         Ok(0x01b2_1dd2_1381_4000)
///     }
/// }
///
/// assert_eq!(FixedTime.now_ticks(), Ok(0x01b2_1dd2_1381_4000));
/// ```
pub trait TimeSource {
    /// Returns the current time in ticks.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock cannot be read or its value has no 60-bit tick
    /// representation.
    fn now_ticks(&self) -> Result<u64>;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_ticks(&self) -> Result<u64> {
        (**self).now_ticks()
    }
}

/// The time source backed by [`SystemTime`], at its full resolution truncated to 100 nanoseconds.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now_ticks(&self) -> Result<u64> {
        let ticks = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(since) => u64::try_from(since.as_nanos() / 100)
                .ok()
                .and_then(|t| t.checked_add(GREGORIAN_OFFSET_TICKS)),
            Err(err) => u64::try_from(err.duration().as_nanos().div_ceil(100))
                .ok()
                .and_then(|t| GREGORIAN_OFFSET_TICKS.checked_sub(t)),
        };
        ticks
            .filter(|&t| t <= MAX_TICKS)
            .ok_or(Error::ClockOutOfRange)
    }
}

/// A strictly increasing sequence of ticks derived from a [`TimeSource`].
///
/// Every call to [`ClockSequence::next_ticks`] returns a value greater than every value returned
/// before it, no matter how many threads call it concurrently. When the clock has not advanced
/// since the last call (coarse resolution, many calls within one tick), the sequence issues the
/// last value plus one instead of the clock reading.
///
/// The ticks issued this way may run ahead of the clock, but never beyond the millisecond the
/// last value belongs to: once all 10,000 ticks of a millisecond are taken, callers back off until
/// the clock reaches the next millisecond. A clock that does not get there within one millisecond
/// of real time is treated as stalled, and the sequence moves on to the next millisecond itself.
/// If the clock moves backwards into an earlier millisecond, the sequence keeps counting up from
/// the last value unconditionally. Either way a call never blocks for long and never repeats.
///
/// The last issued value lives in a single cache-padded atomic updated with compare-and-swap;
/// losers of a race back off exponentially with [`Backoff`] before retrying.
#[derive(Debug)]
pub struct ClockSequence<T> {
    last: CachePadded<AtomicU64>,
    time: T,
}

impl<T: TimeSource> ClockSequence<T> {
    /// Creates a sequence that has issued nothing yet.
    pub fn new(time: T) -> Self {
        Self {
            last: CachePadded::new(AtomicU64::new(0)),
            time,
        }
    }

    /// Returns the last value issued, or zero if none has been.
    pub fn last_issued(&self) -> u64 {
        self.last.load(Ordering::Acquire)
    }

    /// Returns the underlying time source.
    pub fn time_source(&self) -> &T {
        &self.time
    }

    /// Issues the next value of the sequence.
    ///
    /// # Errors
    ///
    /// Propagates the time source's error.
    pub fn next_ticks(&self) -> Result<u64> {
        let backoff = Backoff::new();
        let mut deadline = None;
        loop {
            let now = self.time.now_ticks()?;
            let last = self.last.load(Ordering::Acquire);

            let next = if now > last {
                now
            } else if now / TICKS_PER_MILLI < last / TICKS_PER_MILLI {
                tracing::trace!(now, last, "clock moved backwards; counting up from last tick");
                last + 1
            } else if (last + 1) / TICKS_PER_MILLI == last / TICKS_PER_MILLI {
                last + 1
            } else {
                let deadline = *deadline.get_or_insert_with(|| {
                    tracing::trace!(last, "millisecond exhausted; waiting for clock");
                    Instant::now() + MAX_SATURATION_WAIT
                });
                if Instant::now() < deadline {
                    backoff.snooze();
                    continue;
                }
                tracing::trace!(now, last, "clock stalled; moving on to the next millisecond");
                last + 1
            };

            match self
                .last
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return Ok(next),
                Err(_) => backoff.spin(),
            }
        }
    }
}

impl Default for ClockSequence<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}
