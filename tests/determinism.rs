use std::collections::HashSet;

use blake3::hash;
use stepwise_avl::{AvlTree, TraceConfig};

fn render_session() -> String {
    let mut tree = AvlTree::with_config(TraceConfig::presentation());
    let mut rendered = String::new();
    for key in [50i64, 20, 80, 10, 30, 25, 27, 90, 85, 5, 1] {
        rendered.push_str(&tree.insert(key).to_string());
    }
    for key in [20i64, 50, 99, 85] {
        rendered.push_str(&tree.delete(&key).to_string());
    }
    for key in [27i64, 4] {
        rendered.push_str(&tree.search_with_trace(&key).to_string());
    }
    rendered
}

#[test]
fn traces_are_identical_across_runs() {
    let mut fingerprints = HashSet::new();
    for _ in 0..5 {
        fingerprints.insert(hash(render_session().as_bytes()));
    }

    assert_eq!(fingerprints.len(), 1, "traces diverged across runs");
}

#[test]
fn node_ids_follow_insertion_order() {
    let tree: AvlTree<i64> = [3i64, 1, 2].into_iter().collect();
    let ids: Vec<u64> = [3i64, 1, 2]
        .iter()
        .filter_map(|key| tree.search(key).map(|node| node.id().get()))
        .collect();

    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]), "ids {ids:?}");
}
