//! Module for testing using fuzzing (quickcheck)

use std::collections::HashMap;
use std::fmt::Debug;

use crate::prefix::mask_from_prefix_len;
use crate::*;
use quickcheck::Arbitrary;

mod lookups;

#[derive(Debug, PartialEq, Clone, Copy)]
enum Operation<P, T> {
    Insert(P, T),
    Lookup(PrefixKey),
}

#[cfg(miri)]
const DEFAULT_NUM_TESTS: usize = 10;
#[cfg(not(miri))]
const DEFAULT_NUM_TESTS: usize = 10000;
const DEFAULT_GEN_SIZE: usize = 100;

fn proptest_runner<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F) {
    let num_tests: usize = std::env::var("QUICKCHECK_TESTS")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_NUM_TESTS);

    let gen_size: usize = std::env::var("QUICKCHECK_GENERATOR_SIZE")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_GEN_SIZE);

    let mut gen = quickcheck::Gen::new(gen_size);

    // sample all inputs
    for _ in 0..num_tests {
        let input = A::arbitrary(&mut gen);
        let input_c = input.clone();
        let success = f(input_c);
        if !success {
            shrink_failure(f, input)
        }
    }
}

fn shrink_failure<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F, input: A) -> ! {
    for i in input.shrink() {
        let i_c = i.clone();
        let success = f(i_c);
        if !success {
            shrink_failure(f, i)
        }
    }
    // if we reach this point, then all shrunken inputs work. Therefore, `inputs` is the minimal
    // input
    panic!(
        "[QUICKCHECK] Test case failed!\n  Minimal input:\n    {:?}",
        input
    );
}

#[allow(missing_docs)]
#[macro_export]
macro_rules! qc {
    ($name:ident, $f:ident) => {
        #[test]
        fn $name() {
            proptest_runner($f)
        }
    };
}

/// Longest-prefix match by scanning every stored prefix.
fn brute_force_lookup<T>(map: &HashMap<TestPrefix, T>, key: PrefixKey) -> Option<&T> {
    map.iter()
        .filter(|(p, _)| p.contains(&(key, 32u8)))
        .max_by_key(|(p, _)| p.1)
        .map(|(_, t)| t)
}

impl<T: Arbitrary + PartialEq> Arbitrary for CompressedTrie<T> {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        <Vec<(TestPrefix, T)> as Arbitrary>::arbitrary(g)
            .into_iter()
            .map(|(p, t)| (p.0, p.1, t))
            .collect()
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let elems = self
            .iter()
            .map(|(k, l, t)| (TestPrefix(k, l), t.clone()))
            .collect::<Vec<_>>();
        let shrinked = elems.shrink();
        Box::new(shrinked.map(|elems| {
            elems
                .into_iter()
                .map(|(p, t)| (p.0, p.1, t))
                .collect::<CompressedTrie<T>>()
        }))
    }
}

impl<P: Arbitrary, T: Arbitrary> Arbitrary for Operation<P, T> {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        if g.choose(&[
            true, true, true, true, true, true, true, false, false, false,
        ])
        .copied()
        .unwrap_or_default()
        {
            Self::Insert(P::arbitrary(g), T::arbitrary(g))
        } else {
            Self::Lookup(TestKey::arbitrary(g).0)
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            Operation::Insert(p, t) => {
                let t = t.clone();
                Box::new(
                    p.clone()
                        .shrink()
                        .map(move |p| Operation::Insert(p, t.clone())),
                )
            }
            Operation::Lookup(_) => quickcheck::empty_shrinker(),
        }
    }
}

/// A masked prefix. Keys are drawn from a small set of leading octets, so that generated prefixes
/// nest and overlap, which is where splits happen.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
struct TestPrefix(PrefixKey, u8);

impl TestPrefix {
    fn new(key: PrefixKey, len: u8) -> Self {
        Self(key & mask_from_prefix_len(len), len)
    }
}

impl Debug for TestPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", std::net::Ipv4Addr::from(self.0), self.1)
    }
}

impl Arbitrary for TestPrefix {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        #[rustfmt::skip]
        let len: u8 = *g
            .choose(&[
                0,
                1, 1,
                2, 2,
                4, 4, 4,
                7, 7, 7,
                8, 8, 8, 8, 8,
                9, 9, 9,
                12, 12, 12,
                15, 15, 15,
                16, 16, 16, 16, 16,
                17, 17,
                20, 20,
                23, 23,
                24, 24, 24, 24, 24,
                25, 25,
                28, 28,
                30, 30,
                31, 31,
                32, 32, 32,
            ])
            .unwrap();
        Self::new(TestKey::arbitrary(g).0, len)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        if self.1 == 0 {
            quickcheck::empty_shrinker()
        } else {
            quickcheck::single_shrinker(Self::new(self.0, self.1 - 1))
        }
    }
}

impl Prefix for TestPrefix {
    fn key(&self) -> PrefixKey {
        self.0
    }

    fn prefix_len(&self) -> u8 {
        self.1
    }
}

/// An address that likely falls into one of the generated prefixes.
#[derive(PartialEq, Eq, Hash, Clone, Copy)]
struct TestKey(PrefixKey);

impl Debug for TestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", std::net::Ipv4Addr::from(self.0))
    }
}

impl Arbitrary for TestKey {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let first: u32 = *g.choose(&[0, 10, 11, 127, 128, 192, 255]).unwrap();
        let second: u32 = *g.choose(&[0, 1, 168, 169, 255]).unwrap();
        let rest = u32::arbitrary(g) & 0xffff;
        // leave some keys completely random
        if bool::arbitrary(g) && bool::arbitrary(g) {
            Self(u32::arbitrary(g))
        } else {
            Self(first << 24 | second << 16 | rest)
        }
    }
}
