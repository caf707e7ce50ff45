//! Uncompressed binary trie with one node per bit.
//!
//! This is the straightforward design that [`CompressedTrie`](crate::CompressedTrie) improves on:
//! every prefix of length `n` costs a path of `n` nodes, no matter how many other prefixes share
//! it. It offers the same lookup semantics and serves as a reference for the compressed trie.

use crate::lookup::PrefixLookup;
use crate::prefix::{child_index, PrefixKey, MAX_PREFIX_LEN};

#[derive(Clone)]
struct BitNode<T> {
    children: [Option<Box<BitNode<T>>>; 2],
    value: Option<T>,
}

impl<T> Default for BitNode<T> {
    fn default() -> Self {
        Self {
            children: [None, None],
            value: None,
        }
    }
}

/// Binary trie that descends one bit per level.
#[derive(Clone)]
pub struct BitTrie<T> {
    root: BitNode<T>,
    count: usize,
    nodes: usize,
}

impl<T> Default for BitTrie<T> {
    fn default() -> Self {
        Self {
            root: BitNode::default(),
            count: 0,
            nodes: 1,
        }
    }
}

impl<T> BitTrie<T> {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of the longest prefix that contains the address `key`.
    ///
    /// ```
    /// # use subnet_trie::*;
    /// let mut trie = BitTrie::new();
    /// trie.insert(0x0a00_0000, 8, "A");
    /// trie.insert(0x0a01_0000, 16, "B");
    /// assert_eq!(trie.lookup(0x0a01_0203), Some(&"B"));
    /// assert_eq!(trie.lookup(0x0a02_0203), Some(&"A"));
    /// assert_eq!(trie.lookup(0x0b00_0000), None);
    /// ```
    pub fn lookup(&self, key: PrefixKey) -> Option<&T> {
        let mut node = &self.root;
        let mut best_match = node.value.as_ref();
        for i in 0..MAX_PREFIX_LEN {
            match node.children[child_index(key, i)].as_deref() {
                Some(next) => node = next,
                None => break,
            }
            best_match = node.value.as_ref().or(best_match);
        }
        best_match
    }

    /// Get the value stored for exactly the prefix of length `len` of `key`.
    ///
    /// # Panics
    /// Panics if `len > 32`.
    pub fn get(&self, key: PrefixKey, len: u8) -> Option<&T> {
        assert!(len <= MAX_PREFIX_LEN, "prefix length {len} out of range");
        let mut node = &self.root;
        for i in 0..len {
            node = node.children[child_index(key, i)].as_deref()?;
        }
        node.value.as_ref()
    }

    /// Number of prefixes stored in the trie.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the trie holds no prefix.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of nodes in the trie, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    /// Walk down to the node of the prefix, creating all missing nodes on the way.
    fn locate_mut(&mut self, key: PrefixKey, len: u8) -> &mut BitNode<T> {
        assert!(len <= MAX_PREFIX_LEN, "prefix length {len} out of range");
        let mut node = &mut self.root;
        for i in 0..len {
            let slot = &mut node.children[child_index(key, i)];
            if slot.is_none() {
                self.nodes += 1;
            }
            node = slot.get_or_insert_with(Default::default);
        }
        node
    }
}

impl<T: PartialEq> BitTrie<T> {
    /// Associate the prefix of length `len` of `key` with `value`. Returns `true` if a different
    /// value was stored for that prefix and got overwritten.
    ///
    /// ```
    /// # use subnet_trie::*;
    /// let mut trie = BitTrie::new();
    /// assert!(!trie.insert(0x0a00_0000, 8, "A"));
    /// assert!(!trie.insert(0x0a00_0000, 8, "A"));
    /// assert!(trie.insert(0x0a00_0000, 8, "B"));
    /// ```
    ///
    /// # Panics
    /// Panics if `len > 32`.
    pub fn insert(&mut self, key: PrefixKey, len: u8, value: T) -> bool {
        let node = self.locate_mut(key, len);
        let replaced = node.value.as_ref().map_or(false, |old| *old != value);
        if node.value.replace(value).is_none() {
            self.count += 1;
        }
        replaced
    }

    /// Associate the prefix of length `len` of `key` with `value`, and return the value that was
    /// stored before. If an equal value was already stored, nothing changes and `Some(value)` is
    /// returned.
    ///
    /// # Panics
    /// Panics if `len > 32`.
    pub fn insert_or_replace(&mut self, key: PrefixKey, len: u8, value: T) -> Option<T> {
        let node = self.locate_mut(key, len);
        if node.value.as_ref() == Some(&value) {
            return Some(value);
        }
        let old = node.value.replace(value);
        if old.is_none() {
            self.count += 1;
        }
        old
    }
}

impl<T: PartialEq> PrefixLookup<T> for BitTrie<T> {
    fn insert_or_replace(&mut self, key: PrefixKey, len: u8, value: T) -> Option<T> {
        BitTrie::insert_or_replace(self, key, len, value)
    }

    fn lookup(&self, key: PrefixKey) -> Option<&T> {
        BitTrie::lookup(self, key)
    }

    fn get(&self, key: PrefixKey, len: u8) -> Option<&T> {
        BitTrie::get(self, key, len)
    }

    fn len(&self) -> usize {
        self.count
    }
}
