//! Version 1 UUID generator and related types.

use rand::{rngs::OsRng, RngCore};

use crate::{ClockSequence, NodeId, Result, SystemClock, TimeSource, Uuid};

/// Represents a version 1 UUID generator that owns a strictly advancing clock sequence, a node
/// identifier, and a clock sequence field value.
///
/// Every UUID generated by one instance carries a timestamp strictly greater than the timestamps
/// of all UUIDs the same instance generated before it, so UUIDs are unique and ordered by time
/// even when they are requested from many threads within a single clock tick. The generator is
/// `Sync` and generates through `&self`; share it with an `Arc` or a `static` rather than a lock.
///
/// The clock sequence field plays no part in uniqueness. It keeps its position in the layout and
/// carries a per-generator constant.
///
/// # Examples
///
/// ```rust
/// use std::thread;
/// use timeuuid::V1Generator;
///
/// let g = V1Generator::new()?;
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = &g;
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.generate().unwrap(), i);
///             }
///         });
///     }
/// });
/// # Ok::<(), timeuuid::Error>(())
/// ```
#[derive(Debug)]
pub struct V1Generator<T = SystemClock> {
    clock: ClockSequence<T>,
    node: NodeId,
    clock_seq: u16,
}

impl V1Generator<SystemClock> {
    /// Creates a generator on the system clock with a random node identifier and clock sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the operating system's random number source fails.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Returns a builder to configure the node identifier, clock sequence, and time source.
    pub fn builder() -> Builder<SystemClock> {
        Builder {
            time: SystemClock,
            node: None,
            clock_seq: None,
        }
    }
}

impl<T: TimeSource> V1Generator<T> {
    /// Generates a new version 1 UUID from the current time.
    ///
    /// # Errors
    ///
    /// Propagates the time source's error; no UUID is produced when the clock cannot be read.
    pub fn generate(&self) -> Result<Uuid> {
        Ok(self.build(self.clock.next_ticks()?))
    }

    /// Packs `ticks` together with the generator's node identifier and clock sequence.
    ///
    /// # Panics
    ///
    /// Panics if `ticks` is not a 60-bit integer.
    pub fn build(&self, ticks: u64) -> Uuid {
        Uuid::from_fields_v1(ticks, self.clock_seq, self.node.get())
    }

    /// Returns the node identifier shared by all UUIDs of this generator.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Returns the clock sequence field value shared by all UUIDs of this generator.
    pub fn clock_seq(&self) -> u16 {
        self.clock_seq
    }

    /// Returns the tick value of the most recently generated UUID, or zero if none has been.
    pub fn last_ticks(&self) -> u64 {
        self.clock.last_issued()
    }
}

/// Configures a [`V1Generator`].
///
/// Unset fields are drawn from the operating system's random number source when the generator is
/// built. Fixing both of them together with a mock [`TimeSource`] makes a generator fully
/// deterministic.
///
/// # Examples
///
/// ```rust
/// use timeuuid::{NodeId, Result, TimeSource, V1Generator};
///
/// struct Epoch;
/// impl TimeSource for Epoch {
///     fn now_ticks(&self) -> Result<u64> {
///         Ok(0x01b2_1dd2_1381_4000)
///     }
/// }
///
/// let g = V1Generator::builder()
///     .time_source(Epoch)
///     .node(NodeId::from_bits(0x0123_4567_89ab))
///     .clock_seq(0x0abc)
///     .build()?;
/// assert_eq!(g.generate()?.to_string(), "13814000-1dd2-11b2-8abc-8123456789ab");
/// assert_eq!(g.generate()?.to_string(), "13814001-1dd2-11b2-8abc-8123456789ab");
/// # Ok::<(), timeuuid::Error>(())
/// ```
#[derive(Clone, Debug)]
#[must_use]
pub struct Builder<T> {
    time: T,
    node: Option<NodeId>,
    clock_seq: Option<u16>,
}

impl<T: TimeSource> Builder<T> {
    /// Sets the node identifier.
    pub fn node(mut self, node: NodeId) -> Self {
        self.node = Some(node);
        self
    }

    /// Sets the clock sequence field value; only its low 14 bits are used.
    pub fn clock_seq(mut self, clock_seq: u16) -> Self {
        self.clock_seq = Some(clock_seq & 0x3fff);
        self
    }

    /// Replaces the time source.
    pub fn time_source<U: TimeSource>(self, time: U) -> Builder<U> {
        Builder {
            time,
            node: self.node,
            clock_seq: self.clock_seq,
        }
    }

    /// Creates the generator.
    ///
    /// # Errors
    ///
    /// Returns an error if a field left unset cannot be drawn from the random number source.
    pub fn build(self) -> Result<V1Generator<T>> {
        let node = match self.node {
            Some(node) => node,
            None => NodeId::random()?,
        };
        let clock_seq = match self.clock_seq {
            Some(clock_seq) => clock_seq,
            None => {
                let mut bytes = [0u8; 2];
                OsRng.try_fill_bytes(&mut bytes)?;
                u16::from_be_bytes(bytes) & 0x3fff
            }
        };
        tracing::debug!(
            node = format_args!("{:012x}", node.get()),
            clock_seq,
            "created version 1 UUID generator"
        );
        Ok(V1Generator {
            clock: ClockSequence::new(self.time),
            node,
            clock_seq,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::V1Generator;
    use crate::{clock, Error, NodeId, Result, TimeSource, Variant};
    use std::{
        collections::HashSet,
        sync::atomic::{AtomicU64, Ordering},
        thread,
    };

    /// A clock stepping back by one tick on every read.
    struct RewindingClock(AtomicU64);

    impl TimeSource for RewindingClock {
        fn now_ticks(&self) -> Result<u64> {
            Ok(self.0.fetch_sub(1, Ordering::Relaxed))
        }
    }

    struct BrokenClock;

    impl TimeSource for BrokenClock {
        fn now_ticks(&self) -> Result<u64> {
            Err(Error::ClockOutOfRange)
        }
    }

    fn fixed_generator(start: u64) -> V1Generator<RewindingClock> {
        V1Generator::builder()
            .time_source(RewindingClock(AtomicU64::new(start)))
            .node(NodeId::from_bits(0x0123_4567_89ab))
            .clock_seq(0x0abc)
            .build()
            .unwrap()
    }

    /// Builds UUIDs from the generator's fixed fields
    #[test]
    fn builds_uuids_from_the_generators_fixed_fields() {
        let g = fixed_generator(0);
        assert_eq!(g.node().get(), 0x8123_4567_89ab);
        assert_eq!(g.clock_seq(), 0x0abc);

        let e = g.build(clock::GREGORIAN_OFFSET_TICKS);
        assert_eq!(&e.to_string(), "13814000-1dd2-11b2-8abc-8123456789ab");
        assert_eq!(e.timestamp(), Some(clock::GREGORIAN_OFFSET_TICKS));
        assert_eq!(e.clock_sequence(), Some(0x0abc));
        assert_eq!(e.node(), Some(0x8123_4567_89ab));
    }

    /// Masks the clock sequence to 14 bits
    #[test]
    fn masks_the_clock_sequence_to_14_bits() {
        let g = V1Generator::builder().clock_seq(0xffff).build().unwrap();
        assert_eq!(g.clock_seq(), 0x3fff);
        assert_eq!(g.generate().unwrap().clock_sequence(), Some(0x3fff));
    }

    /// Generates increasing timestamps even with a decreasing clock
    #[test]
    fn generates_increasing_timestamps_even_with_a_decreasing_clock() {
        let start = clock::ticks_from_unix_millis(1_700_000_000_000) + 5_000;
        let g = fixed_generator(start);
        assert_eq!(g.last_ticks(), 0);
        let mut prev = g.generate().unwrap().timestamp().unwrap();
        assert_eq!(prev, start);
        for _ in 0..4_000 {
            let curr = g.generate().unwrap().timestamp().unwrap();
            assert_eq!(curr, prev + 1);
            prev = curr;
        }
        assert_eq!(g.last_ticks(), prev);
    }

    /// Propagates clock errors
    #[test]
    fn propagates_clock_errors() {
        let g = V1Generator::builder()
            .time_source(BrokenClock)
            .build()
            .unwrap();
        assert_eq!(g.generate(), Err(Error::ClockOutOfRange));
    }

    /// Creates generators with independent random nodes
    #[test]
    fn creates_generators_with_independent_random_nodes() {
        let a = V1Generator::new().unwrap();
        let b = V1Generator::new().unwrap();
        assert_ne!(a.node(), b.node());
        assert_eq!(a.node().get() >> 47, 1);
        assert!(a.clock_seq() < 1 << 14);
    }

    /// Shares one node and increasing timestamps across threads
    #[test]
    fn shares_one_node_and_increasing_timestamps_across_threads() {
        let g = V1Generator::new().unwrap();
        let per_thread: Vec<Vec<_>> = thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(|| {
                        (0..10_000)
                            .map(|_| g.generate().unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let mut seen = HashSet::new();
        for uuids in &per_thread {
            for w in uuids.windows(2) {
                assert!(w[0].timestamp() < w[1].timestamp());
            }
            for e in uuids {
                assert_eq!(e.variant(), Variant::Var10);
                assert_eq!(e.version(), Some(1));
                assert_eq!(e.node(), Some(g.node().get()));
                assert!(seen.insert(*e));
            }
        }
        assert_eq!(seen.len(), 4 * 10_000);
    }
}
