//! This crate provides a path-compressed prefix trie for IPv4 prefixes, and a subnet directory
//! built on top of it. Any lookup performs longest-prefix match: given a set of subnets, each
//! tagged with a value, and an address, it returns the value of the most specific subnet that
//! contains the address. This is what IP allow-lists, cloud-provider tagging of addresses, or
//! routing table lookups need.
//!
//! ```
//! # use subnet_trie::*;
//! let mut directory = SubnetDirectory::new();
//! directory.add_subnets([
//!     ("0.0.0.0/0", "internet"),
//!     ("10.0.0.0/8", "private"),
//!     ("10.1.0.0/16", "office"),
//! ]);
//! assert_eq!(directory.get_subnet("10.1.2.3"), Some(&"office"));
//! assert_eq!(directory.get_subnet("10.2.2.3"), Some(&"private"));
//! assert_eq!(directory.get_subnet("1.1.1.1"), Some(&"internet"));
//! assert_eq!(directory.add_subnet("256.0.0.1/24", "x"), AddResult::Failed);
//! ```
//!
//! # Description of the Tree
//!
//! Addresses are keys of type [`PrefixKey`] (a `u32` with the first octet in the most
//! significant byte), and the bits of a key are numbered from the left, starting at 0.
//!
//! Each node of a [`CompressedTrie`] consists of a key, a range, a container for a potential value
//! (`Option`), and two optional children. The range is the prefix length that the node fully
//! determines; only the first `range` bits of its key are meaningful, and all nodes below agree
//! with it on those bits. Traversing into the tree is done by looking at the first bit that is
//! **not** part of the node's range: if it is not set, we take the left child, and otherwise the
//! right one. A child always has a longer range than its parent, so a chain of nodes without
//! branching collapses into a single node (path compression).
//!
//! Inserting a prefix that leaves the span of a node somewhere within its range *splits* that
//! node: its range shrinks to the point where the two diverge, and its old content moves into a
//! new child. The new prefix then becomes either the shrunk node itself, or its other child.
//!
//! A [`BitTrie`] offers the same operations with one node per bit. Both implement
//! [`PrefixLookup`], and the [`SubnetDirectory`] works with either of them.
//!
//! # Operations on the tree
//!
//! The trie only supports adding and replacing prefixes; there is no removal. The intended use is
//! to build it from a single thread and to share it for lookups afterwards.
//!
//! | Operation                            | `CompressedTrie`     | `BitTrie`        |
//! |--------------------------------------|----------------------|------------------|
//! | `insert_or_replace`                  | `O(32)`              | `O(len)`         |
//! | `lookup`, `get`                      | `O(32)`              | `O(32)`          |
//! | `len` and `is_empty`                 | `O(1)`               | `O(1)`           |
//! | nodes for `n` prefixes               | at most `2n + 1`     | up to `32n + 1`  |

#![allow(clippy::collapsible_else_if)]
#![deny(missing_docs)]

mod fmt;
#[cfg(test)]
mod fuzzing;

pub mod bit_trie;
pub mod directory;
pub mod error;
pub mod lookup;
pub mod prefix;
pub mod trie;

pub use bit_trie::BitTrie;
pub use directory::{AddResult, LoadSummary, SubnetDirectory};
pub use error::{ParseError, ParseErrorKind};
pub use lookup::PrefixLookup;
pub use prefix::{Prefix, PrefixKey};
pub use trie::CompressedTrie;
