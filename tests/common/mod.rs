#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use stepwise_avl::{AvlTree, Node, Trace};

fn golden_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
        .join("traces")
        .join(format!("{name}.txt"))
}

/// Compare the rendered `trace` with `tests/snapshots/traces/<name>.txt`.
///
/// With `STEPWISE_AVL_UPDATE_SNAPSHOTS` set the file is rewritten instead.
pub fn assert_trace_golden(name: &str, trace: &Trace<i64>) {
    let path = golden_path(name);
    let rendered = trace.to_string();
    if std::env::var_os("STEPWISE_AVL_UPDATE_SNAPSHOTS").is_some() {
        fs::write(&path, &rendered).expect("write golden trace");
        return;
    }

    let expected = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("golden trace {} unreadable: {err}", path.display()));
    let mut expected_lines = expected.lines().map(str::trim_end);
    let mut actual_lines = rendered.lines().map(str::trim_end);
    for line in 1.. {
        match (expected_lines.next(), actual_lines.next()) {
            (None, None) => return,
            (want, got) if want == got => continue,
            (want, got) => panic!(
                "{} differs at line {line}\n  expected: {}\n  actual:   {}\nSet STEPWISE_AVL_UPDATE_SNAPSHOTS=1 to regenerate.\n\n{rendered}",
                path.display(),
                want.unwrap_or("<end of file>"),
                got.unwrap_or("<end of trace>"),
            ),
        }
    }
}

/// The last frame of a mutating trace is the resulting tree: same shape,
/// keys, ids and heights as the live tree once its markers are dropped.
pub fn assert_final_frame_matches(trace: &Trace<i64>, tree: &AvlTree<i64>) {
    let mut last = trace
        .last()
        .map(|step| step.after().clone())
        .expect("trace has at least one step");
    assert!(
        last.check_invariants().is_ok(),
        "final frame is not a valid AVL tree: {:?}\n{last}",
        last.check_invariants()
    );
    last.clear_markers();
    assert_eq!(last, tree.snapshot(), "final frame differs from the live tree");
}

/// Tree built by inserting `keys` in order.
pub fn tree_of(keys: &[i64]) -> AvlTree<i64> {
    keys.iter().copied().collect()
}

/// Parenthesized shape: leaves print bare, absent children print as `.`.
pub fn shape(node: Option<&Node<i64>>) -> String {
    match node {
        None => ".".to_string(),
        Some(n) if n.is_leaf() => n.value().to_string(),
        Some(n) => format!("({} {} {})", shape(n.left()), n.value(), shape(n.right())),
    }
}

pub fn root_value(tree: &AvlTree<i64>) -> Option<i64> {
    tree.root().map(|root| *root.value())
}
