//! The capability shared by both trie implementations.

use crate::prefix::PrefixKey;

/// A longest-prefix-match table over IPv4 keys.
///
/// Both [`CompressedTrie`](crate::CompressedTrie) and [`BitTrie`](crate::BitTrie) implement this
/// trait, so that a [`SubnetDirectory`](crate::SubnetDirectory) can use either one as its backend,
/// and so that both can be checked against each other on the same input.
pub trait PrefixLookup<T>: Default {
    /// Associate the prefix of length `len` of `key` with `value`.
    ///
    /// - If that prefix already holds a value equal to `value`, nothing changes and `Some(value)`
    ///   is returned.
    /// - If that prefix holds a different value, it is replaced and the old value is returned.
    /// - Otherwise, a new association is created and `None` is returned.
    ///
    /// # Panics
    /// Panics if `len > 32`.
    fn insert_or_replace(&mut self, key: PrefixKey, len: u8, value: T) -> Option<T>;

    /// Get the value of the longest stored prefix that contains `key`.
    fn lookup(&self, key: PrefixKey) -> Option<&T>;

    /// Get the value stored for exactly this prefix.
    fn get(&self, key: PrefixKey, len: u8) -> Option<&T>;

    /// Number of prefixes stored.
    fn len(&self) -> usize;

    /// Returns `true` if no prefix is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
