use std::{mem, sync::Arc};

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors this crate can produce.
#[derive(Clone, Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The operating system's random number source failed.
    ///
    /// A generator cannot pick its node identifier or clock sequence without it, so this is fatal
    /// for the generator being created.
    #[error("randomness source unavailable: {0}")]
    RandomnessUnavailable(#[source] Arc<rand::Error>),

    /// The system clock reads a time that cannot be expressed as a 60-bit count of 100-nanosecond
    /// ticks since 1582-10-15.
    #[error("system clock is outside the representable time range")]
    ClockOutOfRange,

    /// A timestamp was requested from a UUID that is not version 1.
    #[error("not a time-based UUID (version {version:?})")]
    NotTimeBased {
        /// The version of the UUID passed, if its variant defines one.
        version: Option<u8>,
    },

    /// The lock guarding the random number generator was poisoned by a panicking thread.
    #[error("random number generator lock poisoned")]
    LockPoisoned,
}

impl From<rand::Error> for Error {
    fn from(err: rand::Error) -> Self {
        Self::RandomnessUnavailable(Arc::new(err))
    }
}

/// Randomness failures are equal only when they share the same underlying error.
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::RandomnessUnavailable(a), Self::RandomnessUnavailable(b)) => Arc::ptr_eq(a, b),
            (Self::NotTimeBased { version: a }, Self::NotTimeBased { version: b }) => a == b,
            _ => mem::discriminant(self) == mem::discriminant(other),
        }
    }
}

impl Eq for Error {}


#[cfg(feature = "global_gen")]
impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}
