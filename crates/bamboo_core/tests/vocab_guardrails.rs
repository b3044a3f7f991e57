use std::collections::HashMap;

use bamboo_core::vocab::clusters::{self, CLUSTERS, ClusterId};
use bamboo_core::vocab::compilers::{self, COMPILERS, CompilerId};

#[test]
fn compiler_table_order_matches_ids() {
    for (index, info) in COMPILERS.iter().enumerate() {
        assert_eq!(
            info.item.id as usize, index,
            "compiler {:?} is out of order in COMPILERS",
            info.item.id
        );
    }
    assert_eq!(COMPILERS.len(), CompilerId::Intel19 as usize + 1);
}

#[test]
fn cluster_table_order_matches_ids() {
    for (index, info) in CLUSTERS.iter().enumerate() {
        assert_eq!(
            info.item.id as usize, index,
            "cluster {:?} is out of order in CLUSTERS",
            info.item.id
        );
    }
    assert_eq!(CLUSTERS.len(), ClusterId::Local as usize + 1);
}

#[test]
fn compiler_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, CompilerId> = HashMap::new();
    for info in COMPILERS {
        assert_eq!(compilers::from_str(info.item.canonical), Some(info.item.id));
        if let Some(prev) = seen.insert(info.item.canonical, info.item.id) {
            panic!(
                "duplicate compiler spelling {:?}: {:?} and {:?}",
                info.item.canonical, prev, info.item.id
            );
        }
    }
}

#[test]
fn cluster_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, ClusterId> = HashMap::new();
    for info in CLUSTERS {
        for &spelling in std::iter::once(&info.item.canonical).chain(info.item.aliases) {
            assert_eq!(clusters::from_str(spelling), Some(info.item.id));
            if let Some(prev) = seen.insert(spelling, info.item.id) {
                panic!(
                    "duplicate cluster spelling {:?}: {:?} and {:?}",
                    spelling, prev, info.item.id
                );
            }
        }
    }
}
