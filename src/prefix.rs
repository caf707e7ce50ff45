//! Bit addressing on 32-bit prefix keys, and the generic type `Prefix`.

use std::net::Ipv4Addr;

#[cfg(feature = "ipnet")]
use ipnet::Ipv4Net;

/// An IPv4 address in network byte order, treated as a bit string. Bit 0 is the most significant
/// bit, i.e., the top bit of the first octet.
pub type PrefixKey = u32;

/// Number of bits in a [`PrefixKey`], and thus the longest possible prefix length.
pub const MAX_PREFIX_LEN: u8 = 32;

/// Check if a specific bit is set (counted from the left, where 0 is the first bit from the
/// left).
///
/// ```
/// # use subnet_trie::prefix::bit_at;
/// assert!(bit_at(0x8000_0000, 0));
/// assert!(!bit_at(0x8000_0000, 1));
/// assert!(bit_at(0x0000_0001, 31));
/// ```
///
/// # Panics
/// Panics if `bit >= 32`.
#[inline(always)]
pub fn bit_at(key: PrefixKey, bit: u8) -> bool {
    assert!(bit < MAX_PREFIX_LEN, "bit index {bit} out of range");
    key & (0x8000_0000 >> bit) != 0
}

/// Index of the child (`0` or `1`) that `key` selects at depth `bit`.
///
/// # Panics
/// Panics if `bit >= 32`.
#[inline(always)]
pub fn child_index(key: PrefixKey, bit: u8) -> usize {
    bit_at(key, bit) as usize
}

/// Mask that keeps the first `len` bits of a key.
///
/// # Panics
/// Panics if `len > 32`.
pub fn mask_from_prefix_len(len: u8) -> PrefixKey {
    assert!(len <= MAX_PREFIX_LEN, "prefix length {len} out of range");
    if len == 0 {
        0
    } else {
        !0 << (MAX_PREFIX_LEN - len)
    }
}

/// Number of leading bits in which `a` and `b` agree.
#[inline(always)]
pub fn common_prefix_len(a: PrefixKey, b: PrefixKey) -> u8 {
    (a ^ b).leading_zeros() as u8
}

/// Trait for types that describe an IPv4 prefix, i.e., a key together with a prefix length.
pub trait Prefix {
    /// Raw representation of the address, ignoring the prefix length.
    fn key(&self) -> PrefixKey;

    /// Prefix length, in the range `0..=32`.
    fn prefix_len(&self) -> u8;

    /// `self.key()` with all bits beyond the prefix length cleared.
    fn mask(&self) -> PrefixKey {
        self.key() & mask_from_prefix_len(self.prefix_len())
    }

    /// Check if `self` contains `other` in its prefix range. This function also returns `true` if
    /// `self` is identical to `other`.
    fn contains<P: Prefix + ?Sized>(&self, other: &P) -> bool {
        if self.prefix_len() > other.prefix_len() {
            return false;
        }
        other.key() & mask_from_prefix_len(self.prefix_len()) == self.mask()
    }
}

impl Prefix for (PrefixKey, u8) {
    fn key(&self) -> PrefixKey {
        self.0
    }

    fn prefix_len(&self) -> u8 {
        self.1
    }
}

/// A single address is a host prefix of length 32.
impl Prefix for Ipv4Addr {
    fn key(&self) -> PrefixKey {
        (*self).into()
    }

    fn prefix_len(&self) -> u8 {
        MAX_PREFIX_LEN
    }
}

#[cfg(feature = "ipnet")]
impl Prefix for Ipv4Net {
    fn key(&self) -> PrefixKey {
        self.addr().into()
    }

    fn prefix_len(&self) -> u8 {
        Ipv4Net::prefix_len(self)
    }

    fn mask(&self) -> PrefixKey {
        self.network().into()
    }
}
