//! Formatting implementation for the CompressedTrie

use std::fmt::{Debug, Formatter, Result};

use crate::CompressedTrie;

impl<T: Debug> Debug for CompressedTrie<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        DebugTrie(self, 0).fmt(f)
    }
}

struct DebugTrie<'a, T>(&'a CompressedTrie<T>, usize);

impl<T: Debug> Debug for DebugTrie<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let trie = self.0;
        let node = &trie.table[self.1];
        match (node.value.as_ref(), node.children) {
            (None, [None, None]) => node.fmt(f),
            (None, [None, Some(child)]) | (None, [Some(child), None]) => f
                .debug_map()
                .entry(node, &Self(trie, child))
                .finish(),
            (None, [Some(left), Some(right)]) => f
                .debug_map()
                .entry(node, &(Self(trie, left), Self(trie, right)))
                .finish(),
            (Some(v), [None, None]) => f.debug_map().entry(node, v).finish(),
            (Some(v), [None, Some(child)]) | (Some(v), [Some(child), None]) => f
                .debug_map()
                .entry(node, &(v, Self(trie, child)))
                .finish(),
            (Some(v), [Some(left), Some(right)]) => f
                .debug_map()
                .entry(node, &(v, Self(trie, left), Self(trie, right)))
                .finish(),
        }
    }
}
