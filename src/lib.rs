//! Time-ordered version 1 UUIDs with a strictly advancing clock
//!
//! ```rust
//! let uuid = timeuuid::time_based()?;
//! println!("{}", uuid); // e.g. "5b6dcf2a-6c13-11ef-9a2b-c3d2e1f0a9b8"
//! println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
//!
//! let ms = timeuuid::unix_timestamp(&uuid)?;
//! assert!(timeuuid::start_of(ms).timestamp() <= uuid.timestamp());
//! assert!(uuid.timestamp() <= timeuuid::end_of(ms).timestamp());
//! # Ok::<(), timeuuid::Error>(())
//! ```
//!
//! See [RFC 4122, section 4.2](https://www.rfc-editor.org/rfc/rfc4122#section-4.2).
//!
//! # Field and bit layout
//!
//! This implementation produces identifiers with the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           time_low                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |           time_mid            |  ver  |       time_high       |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|         clock_seq         |1|           node              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                             node                              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - `time_high`, `time_mid`, and `time_low` hold the most, middle, and least significant parts of
//!   a 60-bit count of 100-nanosecond ticks since 1582-10-15T00:00:00Z.
//! - The 4-bit `ver` field is set at `0001`.
//! - The 2-bit `var` field is set at `10`.
//! - The 14-bit `clock_seq` field is a per-generator random constant. It does not take part in
//!   uniqueness.
//! - The 48-bit `node` field is a per-generator random value whose most significant bit is set to
//!   mark it as not derived from a hardware address.
//!
//! Uniqueness and order come from the timestamp alone: a generator never issues the same tick
//! twice. When the system clock has not advanced since the previous UUID, the generator uses the
//! previous tick plus one, running ahead of the clock by at most the remainder of the current
//! millisecond. Once all ticks of a millisecond are taken, callers wait for the next one, for up
//! to one millisecond; a clock that stays stuck longer is passed by the generator. A
//! system clock rollback does not break the order; the generator keeps counting up from the last
//! tick it issued.
//!
//! # Range boundaries
//!
//! [`start_of`] and [`end_of`] return the smallest and largest UUIDs that could have been
//! generated within a given Unix millisecond under the ordering used by stores that sort version 1
//! UUIDs by time, for use as inclusive range-scan bounds:
//!
//! ```rust
//! let (lower, upper) = (timeuuid::start_of(1_700_000_000_000), timeuuid::end_of(1_700_000_000_000));
//! assert_eq!(timeuuid::unix_timestamp(&lower)?, 1_700_000_000_000);
//! assert_eq!(timeuuid::unix_timestamp(&upper)?, 1_700_000_000_000);
//! # Ok::<(), timeuuid::Error>(())
//! ```
//!
//! # Other features
//!
//! This library also supports the generation of UUID version 4:
//!
//! ```rust
//! let uuid = timeuuid::random()?;
//! println!("{}", uuid); // e.g. "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
//! # Ok::<(), timeuuid::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

mod uuid;
pub use uuid::{Uuid, Variant};

mod error;
pub use error::{Error, Result};

pub mod clock;
pub use clock::{ClockSequence, SystemClock, TimeSource};

mod node;
pub use node::NodeId;

pub mod generator;
pub use generator::{Builder, V1Generator};

mod boundary;
pub use boundary::{end_of, start_of, unix_timestamp};

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{random, time_based};
