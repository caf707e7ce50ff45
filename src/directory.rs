//! The subnet directory: a prefix trie addressed with CIDR and IPv4 strings.

use std::marker::PhantomData;
use std::net::Ipv4Addr;

use log::{debug, warn};

use crate::error::{ParseError, ParseErrorKind};
use crate::lookup::PrefixLookup;
use crate::prefix::{Prefix, PrefixKey, MAX_PREFIX_LEN};
use crate::CompressedTrie;

/// Outcome of [`SubnetDirectory::add_subnet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddResult {
    /// The subnet was not yet in the directory.
    Added,
    /// The subnet was already in the directory. Its value is now the new one.
    Replaced,
    /// The subnet could not be parsed. The directory is unchanged.
    Failed,
}

/// Counts of the outcomes of [`SubnetDirectory::add_subnets`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Records that created a new subnet.
    pub added: usize,
    /// Records for a subnet that was already present.
    pub replaced: usize,
    /// Records that could not be parsed.
    pub failed: usize,
}

impl LoadSummary {
    fn record(&mut self, result: AddResult) {
        match result {
            AddResult::Added => self.added += 1,
            AddResult::Replaced => self.replaced += 1,
            AddResult::Failed => self.failed += 1,
        }
    }
}

/// Maps IPv4 subnets to values, and resolves addresses to the value of their most specific
/// subnet.
///
/// The directory only parses strings; storage and matching are done by the backend `B`, which
/// is a [`CompressedTrie`] unless chosen otherwise. It is meant to be built once from a single
/// thread and queried afterwards; once built, a shared reference can be handed to any number of
/// readers.
///
/// ```
/// # use subnet_trie::*;
/// let mut directory = SubnetDirectory::new();
/// assert_eq!(directory.add_subnet("10.0.0.0/8", "A"), AddResult::Added);
/// assert_eq!(directory.add_subnet("10.1.0.0/16", "B"), AddResult::Added);
/// assert_eq!(directory.add_subnet("10.0.0.0/8", "C"), AddResult::Replaced);
/// assert_eq!(directory.add_subnet("10.0.0.0/33", "D"), AddResult::Failed);
/// assert_eq!(directory.get_subnet("10.1.2.3"), Some(&"B"));
/// assert_eq!(directory.get_subnet("10.2.2.3"), Some(&"C"));
/// assert_eq!(directory.get_subnet("11.0.0.0"), None);
/// ```
#[derive(Clone)]
pub struct SubnetDirectory<T, B = CompressedTrie<T>> {
    lookup: B,
    _value: PhantomData<T>,
}

impl<T, B: PrefixLookup<T>> Default for SubnetDirectory<T, B> {
    fn default() -> Self {
        Self::with_backend(B::default())
    }
}

impl<T: PartialEq> SubnetDirectory<T> {
    /// Create an empty directory backed by a [`CompressedTrie`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T, B: PrefixLookup<T>> SubnetDirectory<T, B> {
    /// Create a directory on top of an existing backend.
    pub fn with_backend(lookup: B) -> Self {
        Self {
            lookup,
            _value: PhantomData,
        }
    }

    /// The trie that stores the subnets.
    pub fn backend(&self) -> &B {
        &self.lookup
    }

    /// Consume the directory and return its trie.
    pub fn into_backend(self) -> B {
        self.lookup
    }

    /// Number of subnets in the directory.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// Returns `true` if the directory holds no subnet.
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Associate the subnet `cidr` (e.g. `"10.0.0.0/8"`) with `value`, and return the value that
    /// was associated with it before. Bits of the address beyond the prefix length are ignored.
    ///
    /// ```
    /// # use subnet_trie::*;
    /// let mut directory = SubnetDirectory::new();
    /// assert_eq!(directory.try_add_subnet("10.0.0.0/8", 1), Ok(None));
    /// assert_eq!(directory.try_add_subnet("10.0.0.0/8", 2), Ok(Some(1)));
    /// assert!(directory.try_add_subnet("10.0.0.0", 3).is_err());
    /// ```
    pub fn try_add_subnet(&mut self, cidr: &str, value: T) -> Result<Option<T>, ParseError> {
        let (key, len) = parse_cidr(cidr)?;
        let old = self.lookup.insert_or_replace(key, len, value);
        if old.is_some() {
            debug!("replaced subnet {cidr}");
        } else {
            debug!("added subnet {cidr}");
        }
        Ok(old)
    }

    /// Associate the subnet `cidr` (e.g. `"10.0.0.0/8"`) with `value`. If `cidr` cannot be
    /// parsed, the directory is left unchanged and [`AddResult::Failed`] is returned.
    pub fn add_subnet(&mut self, cidr: &str, value: T) -> AddResult {
        match self.try_add_subnet(cidr, value) {
            Ok(None) => AddResult::Added,
            Ok(Some(_)) => AddResult::Replaced,
            Err(e) => {
                debug!("could not add subnet; {e}");
                AddResult::Failed
            }
        }
    }

    /// Add all `(cidr, value)` records, skipping those that cannot be parsed.
    ///
    /// ```
    /// # use subnet_trie::*;
    /// let mut directory = SubnetDirectory::new();
    /// let summary = directory.add_subnets([
    ///     ("13.64.0.0/11", "azure"),
    ///     ("3.5.140.0/22", "aws"),
    ///     ("13.64.0.0/11", "azure"),
    ///     ("not a subnet", "?"),
    /// ]);
    /// assert_eq!(summary, LoadSummary { added: 2, replaced: 1, failed: 1 });
    /// assert_eq!(directory.get_subnet("3.5.141.7"), Some(&"aws"));
    /// ```
    pub fn add_subnets<I, S>(&mut self, records: I) -> LoadSummary
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
    {
        let mut summary = LoadSummary::default();
        for (cidr, value) in records {
            let cidr = cidr.as_ref();
            let result = self.add_subnet(cidr, value);
            if result == AddResult::Failed {
                warn!("subnet could not be parsed: {cidr}");
            }
            summary.record(result);
        }
        summary
    }

    /// Associate an already parsed prefix with `value`, and return the value that was associated
    /// with it before.
    ///
    /// # Panics
    /// Panics if the prefix length of `prefix` exceeds 32.
    pub fn add_prefix<P: Prefix>(&mut self, prefix: &P, value: T) -> Option<T> {
        self.lookup
            .insert_or_replace(prefix.key(), prefix.prefix_len(), value)
    }

    /// Find the value of the most specific subnet that contains the address `ip`.
    ///
    /// `Ok(None)` means that `ip` is a valid address that is not covered by any subnet, while an
    /// error means that `ip` is not an IPv4 address.
    ///
    /// ```
    /// # use subnet_trie::*;
    /// let mut directory = SubnetDirectory::new();
    /// directory.add_subnet("192.168.0.0/16", "lan");
    /// assert_eq!(directory.try_get_subnet("192.168.4.2"), Ok(Some(&"lan")));
    /// assert_eq!(directory.try_get_subnet("8.8.8.8"), Ok(None));
    /// assert!(directory.try_get_subnet("192.168.4").is_err());
    /// ```
    pub fn try_get_subnet(&self, ip: &str) -> Result<Option<&T>, ParseError> {
        let key = parse_ip(ip)?;
        Ok(self.lookup.lookup(key))
    }

    /// Find the value of the most specific subnet that contains the address `ip`. Returns `None`
    /// both if no subnet matches and if `ip` is not an IPv4 address.
    pub fn get_subnet(&self, ip: &str) -> Option<&T> {
        self.try_get_subnet(ip).ok().flatten()
    }

    /// Find the value of the most specific subnet that contains `addr`.
    pub fn get_addr(&self, addr: Ipv4Addr) -> Option<&T> {
        self.lookup.lookup(addr.into())
    }
}

/// Parse a dotted-quad IPv4 address into its key. The first octet ends up in the most
/// significant byte.
///
/// ```
/// # use subnet_trie::directory::parse_ip;
/// assert_eq!(parse_ip("10.1.2.3"), Ok(0x0a01_0203));
/// assert!(parse_ip("256.0.0.1").is_err());
/// assert!(parse_ip("10.1.2").is_err());
/// ```
pub fn parse_ip(ip: &str) -> Result<PrefixKey, ParseError> {
    ip.parse::<Ipv4Addr>()
        .map(PrefixKey::from)
        .map_err(|_| ParseError::new(ParseErrorKind::Address, ip))
}

/// Parse a subnet in CIDR notation (`<address>/<length>`) into its key and prefix length. The
/// string is split at the first `/`.
///
/// ```
/// # use subnet_trie::directory::parse_cidr;
/// assert_eq!(parse_cidr("10.0.0.0/8"), Ok((0x0a00_0000, 8)));
/// assert!(parse_cidr("10.0.0.0").is_err());
/// assert!(parse_cidr("10.0.0.0/x").is_err());
/// ```
pub fn parse_cidr(cidr: &str) -> Result<(PrefixKey, u8), ParseError> {
    let (addr, len) = cidr
        .split_once('/')
        .ok_or_else(|| ParseError::new(ParseErrorKind::MissingSeparator, cidr))?;
    let key = parse_ip(addr).map_err(|e| ParseError::new(e.kind, cidr))?;
    let len = len
        .parse::<u8>()
        .ok()
        .filter(|len| *len <= MAX_PREFIX_LEN)
        .ok_or_else(|| ParseError::new(ParseErrorKind::PrefixLength, cidr))?;
    Ok((key, len))
}
