use std::collections::HashMap;

use super::*;

qc!(lookup_matches_brute_force, _lookup_matches_brute_force);
fn _lookup_matches_brute_force(list: Vec<Operation<TestPrefix, i32>>) -> bool {
    let mut trie = CompressedTrie::new();
    let mut hmap = HashMap::new();

    for op in list {
        match op {
            Operation::Insert(p, t) => {
                trie.insert_or_replace(p.0, p.1, t);
                hmap.insert(p, t);
            }
            Operation::Lookup(key) => {
                if trie.lookup(key) != brute_force_lookup(&hmap, key) {
                    return false;
                }
            }
        }
    }
    true
}

qc!(compressed_matches_bit_trie, _compressed_matches_bit_trie);
fn _compressed_matches_bit_trie((list, keys): (Vec<(TestPrefix, i32)>, Vec<TestKey>)) -> bool {
    let mut trie = CompressedTrie::new();
    let mut bits = BitTrie::new();

    for (p, t) in list {
        if trie.insert_or_replace(p.0, p.1, t) != bits.insert_or_replace(p.0, p.1, t) {
            return false;
        }
    }

    trie.len() == bits.len()
        && trie.node_count() <= bits.node_count()
        && keys.iter().all(|k| trie.lookup(k.0) == bits.lookup(k.0))
}

qc!(lookup_of_stored_prefix, _lookup_of_stored_prefix);
fn _lookup_of_stored_prefix(trie: CompressedTrie<i32>) -> bool {
    // the first address of a stored prefix matches that prefix or a more specific one.
    trie.iter().all(|(k, l, _)| match trie.lookup_prefix(k, 32) {
        Some((k2, l2, _)) => l2 >= l && (k, l).contains(&(k2, l2)),
        None => false,
    })
}

qc!(lookup_prefix_matches_brute_force, _lookup_prefix_matches_brute_force);
fn _lookup_prefix_matches_brute_force(
    (list, probes): (Vec<(TestPrefix, i32)>, Vec<TestPrefix>),
) -> bool {
    let mut trie = CompressedTrie::new();
    let mut hmap = HashMap::new();

    for (p, t) in list {
        trie.insert_or_replace(p.0, p.1, t);
        hmap.insert(p, t);
    }

    probes.into_iter().all(|probe| {
        let want = hmap
            .iter()
            .filter(|(p, _)| p.contains(&probe))
            .max_by_key(|(p, _)| p.1)
            .map(|(p, t)| (p.0, p.1, t));
        trie.lookup_prefix(probe.0, probe.1) == want
    })
}

qc!(directory_backends_agree, _directory_backends_agree);
fn _directory_backends_agree((list, keys): (Vec<(TestPrefix, i32)>, Vec<TestKey>)) -> bool {
    let mut compressed = SubnetDirectory::<i32>::default();
    let mut bits = SubnetDirectory::<i32, BitTrie<i32>>::default();

    for (p, t) in list {
        let cidr = format!("{p:?}");
        if compressed.add_subnet(&cidr, t) != bits.add_subnet(&cidr, t) {
            return false;
        }
    }

    keys.iter().all(|k| {
        let addr = format!("{k:?}");
        compressed.get_subnet(&addr) == bits.get_subnet(&addr)
            && compressed.get_subnet(&addr) == compressed.backend().lookup(k.0)
    })
}

qc!(insert_then_find, _insert_then_find);
fn _insert_then_find(list: Vec<(TestPrefix, i32)>) -> bool {
    let mut trie = CompressedTrie::new();
    for (p, t) in list {
        trie.insert_or_replace(p.0, p.1, t);
        // the node the insertion landed on must be the one that lookups reach.
        if trie.get(p.0, p.1) != Some(&t) || trie.lookup_prefix(p.0, p.1) != Some((p.0, p.1, &t)) {
            return false;
        }
    }
    true
}
