//! The UUID value type and the version 1 field layout.

use std::{fmt, str};

/// Represents a Universally Unique IDentifier.
///
/// The derived equality and hashing work on the 16-byte big-endian representation. No ordering is
/// provided: the byte order of a version 1 UUID starts with the least significant part of its
/// timestamp, so it does not sort chronologically. Ordered stores compare version 1 UUIDs by the
/// 60-bit time field first, which [`Uuid::timestamp`] exposes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

/// The variant field of a UUID, determined by the most significant bits of byte 8.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Variant {
    /// `0xx`: reserved, NCS backward compatibility.
    Var0,
    /// `10x`: the variant defined by RFC 4122, used by every UUID this crate generates.
    Var10,
    /// `110`: reserved, Microsoft Corporation backward compatibility.
    Var110,
    /// `111`: reserved for future definition.
    VarReserved,
}

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Creates a version 1 UUID from its field values.
    ///
    /// `ticks` is the 60-bit count of 100-nanosecond intervals since 1582-10-15T00:00:00Z,
    /// `clock_seq` the 14-bit clock sequence, and `node` the 48-bit node identifier.
    ///
    /// # Panics
    ///
    /// Panics if any argument does not fit in its field.
    pub const fn from_fields_v1(ticks: u64, clock_seq: u16, node: u64) -> Self {
        if ticks >= 1 << 60 || clock_seq >= 1 << 14 || node >= 1 << 48 {
            panic!("invalid field value");
        }

        let msb = ((ticks & 0xffff_ffff) << 32)
            | (((ticks >> 32) & 0xffff) << 16)
            | 0x1000
            | ((ticks >> 48) & 0x0fff);
        let lsb = 0x8000_0000_0000_0000 | ((clock_seq as u64) << 48) | node;
        Self::from_u64_pair(msb, lsb)
    }

    /// Creates a UUID from its most and least significant 64-bit halves.
    pub const fn from_u64_pair(msb: u64, lsb: u64) -> Self {
        Self((((msb as u128) << 64) | lsb as u128).to_be_bytes())
    }

    /// Returns the most and least significant 64-bit halves of the UUID.
    pub const fn as_u64_pair(&self) -> (u64, u64) {
        let value = u128::from_be_bytes(self.0);
        ((value >> 64) as u64, value as u64)
    }

    /// Returns the variant field value.
    pub const fn variant(&self) -> Variant {
        match self.0[8] >> 5 {
            0b000..=0b011 => Variant::Var0,
            0b100..=0b101 => Variant::Var10,
            0b110 => Variant::Var110,
            _ => Variant::VarReserved,
        }
    }

    /// Returns the version field value if the variant field is `10`, or `None` otherwise.
    pub const fn version(&self) -> Option<u8> {
        match self.variant() {
            Variant::Var10 => Some(self.0[6] >> 4),
            _ => None,
        }
    }

    /// Returns the 60-bit timestamp of a version 1 UUID in 100-nanosecond ticks since
    /// 1582-10-15T00:00:00Z, or `None` for any other version.
    ///
    /// Only the version field is checked, not the variant, so the range bounds returned by
    /// [`end_of`](crate::end_of), whose clock sequence and node bytes leave no room for the `10`
    /// variant bits, carry a timestamp as well.
    pub const fn timestamp(&self) -> Option<u64> {
        match self.0[6] >> 4 {
            1 => Some(self.time_field()),
            _ => None,
        }
    }

    /// Returns the 14-bit clock sequence of a version 1 UUID.
    pub const fn clock_sequence(&self) -> Option<u16> {
        match self.version() {
            Some(1) => Some(((self.as_u64_pair().1 >> 48) & 0x3fff) as u16),
            _ => None,
        }
    }

    /// Returns the 48-bit node identifier of a version 1 UUID.
    pub const fn node(&self) -> Option<u64> {
        match self.version() {
            Some(1) => Some(self.as_u64_pair().1 & 0xffff_ffff_ffff),
            _ => None,
        }
    }

    /// Reassembles the time field from its three parts regardless of the version.
    pub(crate) const fn time_field(&self) -> u64 {
        let msb = self.as_u64_pair().0;
        (msb >> 32) | ((msb & 0xffff_0000) << 16) | ((msb & 0x0fff) << 48)
    }
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";
        let mut buffer = [0u8; 36];
        let mut pos = 0;
        for (i, e) in self.0.iter().enumerate() {
            buffer[pos] = DIGITS[(e >> 4) as usize];
            buffer[pos + 1] = DIGITS[(e & 15) as usize];
            pos += 2;
            if i == 3 || i == 5 || i == 7 || i == 9 {
                buffer[pos] = b'-';
                pos += 1;
            }
        }
        f.write_str(str::from_utf8(&buffer).map_err(|_| fmt::Error)?)
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }
}

/// Serializes UUIDs as their 16-byte big-endian representation.
#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Uuid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_bytes(self.as_bytes())
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_bytes(VisitorImpl)
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a 16-byte UUID")
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 16]>::try_from(value)
                .map(Self::Value::from)
                .map_err(de::Error::custom)
        }
    }

}
