//! Tag addresses with the cloud region they belong to.
//!
//! Run with `RUST_LOG=debug cargo run --example tag_lookup` to see every subnet being added.

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use log::info;
use subnet_trie::*;
use tracing_subscriber::EnvFilter;

const RANGES: &[(&str, &str)] = &[
    ("3.5.140.0/22", "aws:ap-northeast-2"),
    ("3.5.0.0/16", "aws"),
    ("13.64.0.0/11", "azure"),
    ("13.104.0.0/14", "azure:global"),
    ("34.64.0.0/10", "gcp"),
    ("35.190.247.0/24", "gcp:dns"),
    ("35.190.247.0/24", "gcp:dns"),
    ("52.95.245.0/24", "aws:us-east-1"),
    ("0.0.0.0/0", "internet"),
    ("52.95.245.0/33", "broken"),
];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut directory = SubnetDirectory::new();
    let summary = directory.add_subnets(RANGES.iter().copied());
    info!(
        "loaded {} subnets ({} added, {} replaced, {} rejected)",
        directory.len(),
        summary.added,
        summary.replaced,
        summary.failed
    );

    // prefixes that were already parsed can be added directly.
    let private: Ipv4Net = "10.0.0.0/8".parse().unwrap();
    directory.add_prefix(&private, "private");
    directory.add_prefix(&Ipv4Addr::new(10, 0, 0, 53), "private:dns");

    for ip in [
        "3.5.141.7",
        "3.5.1.1",
        "13.107.6.152",
        "35.190.247.13",
        "10.0.0.53",
        "10.20.30.40",
        "1.1.1.1",
        "300.1.1.1",
    ] {
        match directory.try_get_subnet(ip) {
            Ok(Some(tag)) => println!("{ip:>15} -> {tag}"),
            Ok(None) => println!("{ip:>15} -> (no match)"),
            Err(e) => println!("{ip:>15} -> {e}"),
        }
    }

    let trie = directory.into_backend();
    println!(
        "{} subnets stored in {} nodes",
        trie.len(),
        trie.node_count()
    );
}
