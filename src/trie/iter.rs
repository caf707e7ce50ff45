//! Module that contains the implementation for the iterators

use crate::prefix::PrefixKey;

use super::CompressedTrie;

/// An iterator over all entries of a [`CompressedTrie`] in lexicographic order. Each entry is the
/// masked key, the prefix length and the value.
#[derive(Clone)]
pub struct Iter<'a, T> {
    pub(crate) trie: &'a CompressedTrie<T>,
    pub(crate) nodes: Vec<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (PrefixKey, u8, &'a T);

    fn next(&mut self) -> Option<(PrefixKey, u8, &'a T)> {
        while let Some(cur) = self.nodes.pop() {
            let node = &self.trie.table[cur];
            if let Some(right) = node.children[1] {
                self.nodes.push(right);
            }
            if let Some(left) = node.children[0] {
                self.nodes.push(left);
            }
            if let Some(entry) = node.prefix_value() {
                return Some(entry);
            }
        }
        None
    }
}

impl<'a, T> IntoIterator for &'a CompressedTrie<T> {
    type Item = (PrefixKey, u8, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
