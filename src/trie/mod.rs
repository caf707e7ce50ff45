//! Implementation of the path-compressed prefix trie.

use log::trace;

use crate::lookup::PrefixLookup;
use crate::prefix::{
    child_index, common_prefix_len, mask_from_prefix_len, PrefixKey, MAX_PREFIX_LEN,
};

mod iter;

pub use iter::Iter;

/// Path-compressed prefix trie over IPv4 keys.
///
/// Each node spans a run of bits instead of a single one: its `range` is the prefix length it
/// fully determines, and its two children diverge exactly at bit `range`. Nodes live in a table
/// and refer to their children by index; the root is always at index 0 and has range 0.
#[derive(Clone)]
pub struct CompressedTrie<T> {
    pub(crate) table: Vec<Node<T>>,
    count: usize,
}

impl<T> Default for CompressedTrie<T> {
    fn default() -> Self {
        Self {
            table: vec![Node::new(0, 0, None)],
            count: 0,
        }
    }
}

impl<T> CompressedTrie<T> {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of the longest prefix that contains the address `key`.
    ///
    /// ```
    /// # use subnet_trie::*;
    /// let mut trie = CompressedTrie::new();
    /// trie.insert_or_replace(0x0a00_0000, 8, "A"); // 10.0.0.0/8
    /// trie.insert_or_replace(0x0a01_0000, 16, "B"); // 10.1.0.0/16
    /// assert_eq!(trie.lookup(0x0a01_0203), Some(&"B"));
    /// assert_eq!(trie.lookup(0x0a02_0203), Some(&"A"));
    /// assert_eq!(trie.lookup(0x0b00_0000), None);
    /// ```
    pub fn lookup(&self, key: PrefixKey) -> Option<&T> {
        self.lookup_prefix(key, MAX_PREFIX_LEN).map(|(_, _, v)| v)
    }

    /// Get the longest stored prefix that contains the prefix of length `len` of `key`, together
    /// with its value. The prefix is returned as its masked key and its length.
    ///
    /// ```
    /// # use subnet_trie::*;
    /// let mut trie = CompressedTrie::new();
    /// trie.insert_or_replace(0xc0a8_0100, 24, 1); // 192.168.1.0/24
    /// trie.insert_or_replace(0xc0a8_0000, 23, 2); // 192.168.0.0/23
    /// assert_eq!(trie.lookup_prefix(0xc0a8_0101, 32), Some((0xc0a8_0100, 24, &1)));
    /// assert_eq!(trie.lookup_prefix(0xc0a8_0100, 24), Some((0xc0a8_0100, 24, &1)));
    /// assert_eq!(trie.lookup_prefix(0xc0a8_0100, 23), Some((0xc0a8_0000, 23, &2)));
    /// assert_eq!(trie.lookup_prefix(0xc0a8_0000, 22), None);
    /// ```
    ///
    /// # Panics
    /// Panics if `len > 32`.
    pub fn lookup_prefix(&self, key: PrefixKey, len: u8) -> Option<(PrefixKey, u8, &T)> {
        assert!(len <= MAX_PREFIX_LEN, "prefix length {len} out of range");
        let mut idx = 0;
        let mut best_match = None;
        loop {
            let node = &self.table[idx];
            if node.range > len || common_prefix_len(key, node.key) < node.range {
                return best_match;
            }
            best_match = node.prefix_value().or(best_match);
            if node.range == len {
                return best_match;
            }
            match node.children[child_index(key, node.range)] {
                Some(next) => idx = next,
                None => return best_match,
            }
        }
    }

    /// Get the value of an element by matching exactly on the prefix.
    ///
    /// ```
    /// # use subnet_trie::*;
    /// let mut trie = CompressedTrie::new();
    /// trie.insert_or_replace(0xc0a8_0100, 24, 1);
    /// assert_eq!(trie.get(0xc0a8_0100, 24), Some(&1));
    /// assert_eq!(trie.get(0xc0a8_0100, 23), None);
    /// assert_eq!(trie.get(0xc0a8_0100, 25), None);
    /// ```
    ///
    /// # Panics
    /// Panics if `len > 32`.
    pub fn get(&self, key: PrefixKey, len: u8) -> Option<&T> {
        assert!(len <= MAX_PREFIX_LEN, "prefix length {len} out of range");
        let mut idx = 0;
        loop {
            let node = &self.table[idx];
            if node.range > len || common_prefix_len(key, node.key) < node.range {
                return None;
            }
            if node.range == len {
                return node.value.as_ref();
            }
            idx = node.children[child_index(key, node.range)]?;
        }
    }

    /// Number of prefixes stored in the trie.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the trie holds no prefix.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of nodes in the trie, including the root and all branch nodes without a value.
    pub fn node_count(&self) -> usize {
        self.table.len()
    }

    /// An iterator over all stored prefixes and their values, in lexicographic order.
    ///
    /// ```
    /// # use subnet_trie::*;
    /// let mut trie = CompressedTrie::new();
    /// trie.insert_or_replace(0x0a01_0000, 16, 'b');
    /// trie.insert_or_replace(0x0a00_0000, 8, 'a');
    /// trie.insert_or_replace(0x0000_0000, 0, 'z');
    /// assert_eq!(
    ///     trie.iter().collect::<Vec<_>>(),
    ///     vec![(0, 0, &'z'), (0x0a00_0000, 8, &'a'), (0x0a01_0000, 16, &'b')]
    /// );
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            trie: self,
            nodes: vec![0],
        }
    }

    /// Verify the structural invariants of the trie:
    ///
    /// - only the root has range 0,
    /// - every child agrees with its parent on the parent's range, selects its slot with its bit
    ///   at the parent's range, and has a strictly longer range,
    /// - every node except the root either stores a value or branches into both children,
    /// - the number of stored values matches [`Self::len`].
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut values = 0;
        let mut stack = vec![0];
        while let Some(idx) = stack.pop() {
            let node = &self.table[idx];
            if node.value.is_some() {
                values += 1;
            }
            if idx != 0 {
                if node.range == 0 {
                    return Err(format!("non-root node {idx} has range 0"));
                }
                if node.value.is_none() && node.children.iter().any(Option::is_none) {
                    return Err(format!("node {idx} ({node:?}) has no value and a single child"));
                }
            }
            for (slot, child) in node.children.iter().enumerate() {
                let Some(child) = *child else { continue };
                let c = &self.table[child];
                if c.range <= node.range {
                    return Err(format!("child {c:?} does not extend parent {node:?}"));
                }
                if common_prefix_len(node.key, c.key) < node.range {
                    return Err(format!("child {c:?} disagrees with parent {node:?}"));
                }
                if child_index(c.key, node.range) != slot {
                    return Err(format!("child {c:?} is in slot {slot} of parent {node:?}"));
                }
                stack.push(child);
            }
        }
        if values != self.count {
            return Err(format!("{values} values stored, but count is {}", self.count));
        }
        Ok(())
    }
}

impl<T: PartialEq> CompressedTrie<T> {
    /// Associate the prefix of length `len` of `key` with `value`.
    ///
    /// If the same prefix already holds an equal value, the trie is left unchanged and
    /// `Some(value)` is returned. If it holds a different value, that value is replaced and
    /// returned. Otherwise, `None` is returned.
    ///
    /// ```
    /// # use subnet_trie::*;
    /// let mut trie = CompressedTrie::new();
    /// assert_eq!(trie.insert_or_replace(0xc0a8_0000, 23, 1), None);
    /// assert_eq!(trie.insert_or_replace(0xc0a8_0100, 24, 2), None);
    /// assert_eq!(trie.insert_or_replace(0xc0a8_0100, 24, 2), Some(2));
    /// assert_eq!(trie.insert_or_replace(0xc0a8_0100, 24, 3), Some(2));
    /// assert_eq!(trie.len(), 2);
    /// ```
    ///
    /// # Panics
    /// Panics if `len > 32`.
    pub fn insert_or_replace(&mut self, key: PrefixKey, len: u8, value: T) -> Option<T> {
        assert!(len <= MAX_PREFIX_LEN, "prefix length {len} out of range");
        let key = key & mask_from_prefix_len(len);
        match self.find_landing(key, len) {
            Landing::Boundary(idx) if self.table[idx].range == len => self.store(idx, value),
            Landing::Boundary(idx) => {
                let right = child_index(key, self.table[idx].range);
                self.new_leaf(idx, right, key, len, value);
                None
            }
            Landing::Inside { idx, depth } => {
                self.split(idx, depth);
                if depth == len {
                    self.table[idx].key = key;
                    self.store(idx, value)
                } else {
                    self.new_leaf(idx, child_index(key, depth), key, len, value);
                    None
                }
            }
        }
    }

    /// Put `value` into the node at `idx`, which spans exactly the prefix to insert.
    fn store(&mut self, idx: usize, value: T) -> Option<T> {
        let node = &mut self.table[idx];
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

/// Private function implementations
impl<T> CompressedTrie<T> {
    /// Descend towards the prefix of length `len` of `key`, and report where that prefix belongs.
    ///
    /// In contrast to the lookup descent, this stops at the first bit where `key` leaves the span
    /// of a node, or where `len` ends inside the span of a node.
    fn find_landing(&self, key: PrefixKey, len: u8) -> Landing {
        let mut idx = 0;
        loop {
            let node = &self.table[idx];
            let depth = common_prefix_len(key, node.key).min(len);
            if depth < node.range {
                return Landing::Inside { idx, depth };
            }
            if node.range == len {
                return Landing::Boundary(idx);
            }
            match node.children[child_index(key, node.range)] {
                Some(next) => idx = next,
                None => return Landing::Boundary(idx),
            }
        }
    }

    /// Shorten the span of the node at `idx` to `depth`. Its old tail (key, range, value and
    /// children) moves into a new child, selected by the node's own bit at `depth`.
    fn split(&mut self, idx: usize, depth: u8) {
        let node = &mut self.table[idx];
        debug_assert!(depth < node.range);
        trace!(
            "split node {}/{} at depth {depth}",
            std::net::Ipv4Addr::from(node.key),
            node.range
        );
        let tail = Node {
            key: node.key,
            range: node.range,
            value: node.value.take(),
            children: std::mem::take(&mut node.children),
        };
        node.range = depth;
        let right = child_index(node.key, depth);
        let tail = self.push(tail);
        self.table[idx].children[right] = Some(tail);
    }

    /// Attach a new leaf node holding `value` below `parent`.
    fn new_leaf(&mut self, parent: usize, right: usize, key: PrefixKey, len: u8, value: T) {
        debug_assert!(self.table[parent].children[right].is_none());
        let leaf = self.push(Node::new(key, len, Some(value)));
        self.table[parent].children[right] = Some(leaf);
        self.count += 1;
    }

    /// insert a new node into the table and return its index.
    #[inline(always)]
    fn push(&mut self, node: Node<T>) -> usize {
        self.table.push(node);
        self.table.len() - 1
    }
}

impl<T: PartialEq> PrefixLookup<T> for CompressedTrie<T> {
    fn insert_or_replace(&mut self, key: PrefixKey, len: u8, value: T) -> Option<T> {
        CompressedTrie::insert_or_replace(self, key, len, value)
    }

    fn lookup(&self, key: PrefixKey) -> Option<&T> {
        CompressedTrie::lookup(self, key)
    }

    fn get(&self, key: PrefixKey, len: u8) -> Option<&T> {
        CompressedTrie::get(self, key, len)
    }

    fn len(&self) -> usize {
        self.count
    }
}

impl<T: PartialEq> FromIterator<(PrefixKey, u8, T)> for CompressedTrie<T> {
    fn from_iter<I: IntoIterator<Item = (PrefixKey, u8, T)>>(iter: I) -> Self {
        let mut trie = Self::new();
        trie.extend(iter);
        trie
    }
}

impl<T: PartialEq> Extend<(PrefixKey, u8, T)> for CompressedTrie<T> {
    fn extend<I: IntoIterator<Item = (PrefixKey, u8, T)>>(&mut self, iter: I) {
        for (key, len, value) in iter {
            self.insert_or_replace(key, len, value);
        }
    }
}

impl<T: PartialEq> PartialEq for CompressedTrie<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for CompressedTrie<T> {}

/// A run of the trie without branching.
#[derive(Clone)]
pub(crate) struct Node<T> {
    /// Any key of the subtree; only the first `range` bits are meaningful.
    pub(crate) key: PrefixKey,
    pub(crate) range: u8,
    pub(crate) value: Option<T>,
    pub(crate) children: [Option<usize>; 2],
}

impl<T> Node<T> {
    fn new(key: PrefixKey, range: u8, value: Option<T>) -> Self {
        Self {
            key,
            range,
            value,
            children: [None, None],
        }
    }

    /// The masked key of this node.
    pub(crate) fn prefix(&self) -> PrefixKey {
        self.key & mask_from_prefix_len(self.range)
    }

    /// get the triple of prefix, length and value.
    pub(crate) fn prefix_value(&self) -> Option<(PrefixKey, u8, &T)> {
        self.value.as_ref().map(|v| (self.prefix(), self.range, v))
    }
}

impl<T> std::fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", std::net::Ipv4Addr::from(self.prefix()), self.range)
    }
}

/// Where the insertion descent stopped.
enum Landing {
    /// The prefix ends at, or continues below, the boundary of this node, whose child in the
    /// direction of the prefix is empty.
    Boundary(usize),
    /// The prefix leaves the span of the node at `depth`, or ends inside it at `depth`.
    Inside { idx: usize, depth: u8 },
}
