//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use crate::{Result, Uuid};
use inner::GlobalGen;

/// Returns the process-wide global generator, creating one if none exists.
///
/// Concurrent first callers all observe the same instance, and thus the same node identifier. A
/// failed initialization is kept and reported to every later caller.
fn global_gen() -> Result<&'static GlobalGen> {
    static G: sync::OnceLock<Result<GlobalGen>> = sync::OnceLock::new();
    get_or_init(&G)
}

fn get_or_init(cell: &sync::OnceLock<Result<GlobalGen>>) -> Result<&GlobalGen> {
    cell.get_or_init(GlobalGen::new)
        .as_ref()
        .map_err(Clone::clone)
}

/// Generates a version 1 UUID.
///
/// This function employs a global generator and guarantees the process-wide strictly increasing
/// order of the timestamps embedded in the generated UUIDs, across all threads.
///
/// # Errors
///
/// Returns an error if the global generator could not be initialized or the system clock is out
/// of range.
///
/// # Examples
///
/// ```rust
/// let uuid = timeuuid::time_based()?;
/// println!("{}", uuid); // e.g., "5b6dcf2a-6c13-11ef-9a2b-c3d2e1f0a9b8"
/// println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
/// assert_eq!(uuid.version(), Some(1));
/// # Ok::<(), timeuuid::Error>(())
/// ```
pub fn time_based() -> Result<Uuid> {
    global_gen()?.generator.generate()
}

/// Generates a version 4 UUID from a cryptographically strong random number generator.
///
/// # Errors
///
/// Returns an error if the global generator could not be initialized or its random number
/// generator lock is poisoned.
///
/// # Examples
///
/// ```rust
/// let uuid = timeuuid::random()?;
/// println!("{}", uuid); // e.g., "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
/// assert_eq!(uuid.version(), Some(4));
/// # Ok::<(), timeuuid::Error>(())
/// ```
pub fn random() -> Result<Uuid> {
    global_gen()?.generate_v4()
}

mod inner {
    use rand::rngs::{adapter::ReseedingRng, OsRng};
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha12Core;
    use std::sync::Mutex;

    use crate::{Result, Uuid, V1Generator};

    /// The type alias for the random number generator of the global generator.
    ///
    /// The global generator currently employs [`ChaCha12Core`] with [`ReseedingRng`] wrapper to
    /// emulate the strategy used by [`rand::rngs::ThreadRng`].
    type GlobalGenRng = ReseedingRng<ChaCha12Core, OsRng>;

    /// The process-wide state: a lock-free version 1 generator and a locked version 4 RNG.
    pub struct GlobalGen {
        pub generator: V1Generator,
        rng: Mutex<GlobalGenRng>,
    }

    impl GlobalGen {
        pub fn new() -> Result<Self> {
            let generator = V1Generator::new()?;
            let core = ChaCha12Core::from_rng(OsRng)?;
            tracing::debug!(
                node = format_args!("{:012x}", generator.node().get()),
                "initialized global generator"
            );
            Ok(Self {
                generator,
                rng: Mutex::new(ReseedingRng::new(core, 1024 * 64, OsRng)),
            })
        }

        /// Generates a new UUIDv4 object utilizing the random number generator inside.
        pub fn generate_v4(&self) -> Result<Uuid> {
            let mut bytes = [0u8; 16];
            self.rng.lock()?.fill_bytes(&mut bytes);
            bytes[6] = 0x40 | (bytes[6] >> 4);
            bytes[8] = 0x80 | (bytes[8] >> 2);
            Ok(Uuid::from(bytes))
        }
    }
}


#[cfg(test)]
mod tests_v4 {
    use super::random;
    use crate::{Uuid, Variant};

    const N_SAMPLES: usize = 100_000;
    thread_local!(static SAMPLES: Vec<String> = (0..N_SAMPLES).map(|_| random().unwrap().to_string()).collect());

    /// Generates canonical string
    #[test]
    fn generates_canonical_string() {
        let pattern = r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$";
        let re = regex::Regex::new(pattern).unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(e));
            }
        });
    }

    /// Generates 100k identifiers without collision
    #[test]
    fn generates_100k_identifiers_without_collision() {
        use std::collections::HashSet;
        SAMPLES.with(|samples| {
            let s: HashSet<&String> = samples.iter().collect();
            assert_eq!(s.len(), N_SAMPLES);
        });
    }

    /// Sets constant bits and random bits properly
    #[test]
    fn sets_constant_bits_and_random_bits_properly() {
        // count '1' of each bit
        let bins = SAMPLES.with(|samples| {
            let mut bins = [0u32; 128];
            for e in samples {
                let mut it = bins.iter_mut().rev();
                for c in e.chars().rev() {
                    if let Some(mut num) = c.to_digit(16) {
                        for _ in 0..4 {
                            *it.next().unwrap() += num & 1;
                            num >>= 1;
                        }
                    }
                }
            }
            bins
        });

        // test if constant bits are all set to 1 or 0
        let n = N_SAMPLES as u32;
        assert_eq!(bins[48], 0, "version bit 48");
        assert_eq!(bins[49], n, "version bit 49");
        assert_eq!(bins[50], 0, "version bit 50");
        assert_eq!(bins[51], 0, "version bit 51");
        assert_eq!(bins[64], n, "variant bit 64");
        assert_eq!(bins[65], 0, "variant bit 65");

        // test if random bits are set to 1 at ~50% probability
        // set margin based on binom dist 99.999% confidence interval
        let margin = 4.417173 * (0.5 * 0.5 / N_SAMPLES as f64).sqrt();
        for i in (0..48).chain(52..64).chain(66..128) {
            let p = bins[i] as f64 / N_SAMPLES as f64;
            assert!((p - 0.5).abs() < margin, "random bit {i}: {p}");
        }
    }

    /// Sets correct variant and version bits
    #[test]
    fn sets_correct_variant_and_version_bits() {
        for _ in 0..1_000 {
            let e = random().unwrap();
            assert_eq!(e.variant(), Variant::Var10);
            assert_eq!(e.version(), Some(4));
            assert_eq!(e.timestamp(), None);
        }
    }

    /// Initializes the shared generator through either entry point
    #[test]
    fn initializes_the_shared_generator_through_either_entry_point() {
        let v4: Uuid = random().unwrap();
        let v1 = super::time_based().unwrap();
        assert_ne!(v4, v1);
        assert_eq!(v1.version(), Some(1));
    }
}
