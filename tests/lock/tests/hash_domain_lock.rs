//! Hash domain lock: the domain set is closed, unique, and well formed.

use std::collections::BTreeSet;

use waymark_kernel::proof::hash::canonical_hash;
use waymark_kernel::proof::hash_domain::HashDomain;

#[test]
fn canonical_set_count() {
    assert_eq!(
        HashDomain::ALL.len(),
        5,
        "if you added a domain, update this count"
    );
}

#[test]
fn domain_bytes_are_unique() {
    let mut seen = BTreeSet::new();
    for domain in HashDomain::ALL {
        assert!(seen.insert(domain.as_bytes()), "duplicate bytes: {domain}");
    }
}

#[test]
fn domains_follow_naming_convention() {
    for domain in HashDomain::ALL {
        let bytes = domain.as_bytes();
        assert!(bytes.starts_with(b"WAYMARK::"), "{domain}");
        assert!(bytes.ends_with(b"::V1\0"), "{domain}");
        assert_eq!(
            bytes.iter().filter(|&&b| b == 0).count(),
            1,
            "{domain} has an interior null"
        );
    }
}

#[test]
fn same_bytes_hash_differently_per_domain() {
    let digests: BTreeSet<String> = HashDomain::ALL
        .iter()
        .map(|d| canonical_hash(*d, b"{}").as_str().to_string())
        .collect();
    assert_eq!(digests.len(), HashDomain::ALL.len());
}

#[test]
fn no_raw_domain_literals_outside_authority() {
    let roots = [
        concat!(env!("CARGO_MANIFEST_DIR"), "/../../kernel/src"),
        concat!(env!("CARGO_MANIFEST_DIR"), "/../../search/src"),
        concat!(env!("CARGO_MANIFEST_DIR"), "/../../harness/src"),
    ];
    let mut violations = Vec::new();
    for root in roots {
        scan(std::path::Path::new(root), &mut violations);
    }
    assert!(
        violations.is_empty(),
        "raw WAYMARK:: literals outside hash_domain.rs:\n{}",
        violations.join("\n")
    );
}

fn scan(dir: &std::path::Path, violations: &mut Vec<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan(&path, violations);
            continue;
        }
        let is_rs = path.extension().is_some_and(|e| e == "rs");
        let is_authority = path.file_name().is_some_and(|n| n == "hash_domain.rs");
        if !is_rs || is_authority {
            continue;
        }
        let Ok(content) = std::fs::read_to_string(&path) else {
            continue;
        };
        for (line_no, line) in content.lines().enumerate() {
            if line.contains("b\"WAYMARK::") {
                violations.push(format!("{}:{}", path.display(), line_no + 1));
            }
        }
    }
}
