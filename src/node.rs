use rand::{rngs::OsRng, RngCore};

use crate::Result;

/// The 48-bit node identifier embedded in every version 1 UUID a generator produces.
///
/// The most significant bit of the 48-bit field is always set, marking the value as locally
/// generated so it can never equal an IEEE-assigned hardware address.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NodeId(u64);

impl NodeId {
    const MASK: u64 = (1 << 48) - 1;
    const LOCAL_BIT: u64 = 1 << 47;

    /// Draws a node identifier from the operating system's random number source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RandomnessUnavailable`](crate::Error::RandomnessUnavailable) if the source
    /// fails; no fallback value is substituted.
    pub fn random() -> Result<Self> {
        let mut bytes = [0u8; 8];
        OsRng.try_fill_bytes(&mut bytes[2..])?;
        Ok(Self::from_bits(u64::from_be_bytes(bytes)))
    }

    /// Creates a node identifier from the low 48 bits of `bits`, setting the most significant one.
    pub const fn from_bits(bits: u64) -> Self {
        Self((bits & Self::MASK) | Self::LOCAL_BIT)
    }

    /// Returns the 48-bit value.
    pub const fn get(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::NodeId;

    /// Sets the local bit and keeps 48 bits
    #[test]
    fn sets_the_local_bit_and_keeps_48_bits() {
        assert_eq!(NodeId::from_bits(0).get(), 0x8000_0000_0000);
        assert_eq!(NodeId::from_bits(0x1234_5678_9abc).get(), 0x9234_5678_9abc);
        assert_eq!(NodeId::from_bits(u64::MAX).get(), 0xffff_ffff_ffff);
    }

    /// Draws distinct random node identifiers
    #[test]
    fn draws_distinct_random_node_identifiers() {
        use std::collections::HashSet;
        let nodes: HashSet<u64> = (0..1_000).map(|_| NodeId::random().unwrap().get()).collect();
        assert_eq!(nodes.len(), 1_000);
        assert!(nodes.iter().all(|&n| n >> 47 == 1));
    }
}
