#[path = "common/mod.rs"]
mod common;
use common::{root_value, shape, tree_of};
use stepwise_avl::{
    AvlTree, Marker, RotationCase, RotationDirection, RotationPhase, StepKind, Trace,
};
use test_case::test_case;

use stepwise_avl::RotationCase::{LL, LR, RL, RR};
use stepwise_avl::RotationDirection::{Left, Right};

fn insert_all(tree: &mut AvlTree<i64>, keys: &[i64]) -> Vec<Trace<i64>> {
    keys.iter().map(|&key| tree.insert(key)).collect()
}

#[test_case(&[30, 20, 10], &[(LL, Right)] ; "left-left single right rotation")]
#[test_case(&[10, 20, 30], &[(RR, Left)] ; "right-right single left rotation")]
#[test_case(&[30, 10, 20], &[(LR, Left), (LR, Right)] ; "left-right double rotation")]
#[test_case(&[10, 30, 20], &[(RL, Right), (RL, Left)] ; "right-left double rotation")]
fn three_key_cases(keys: &[i64], expected: &[(RotationCase, RotationDirection)]) {
    let mut tree = AvlTree::new();
    let traces = insert_all(&mut tree, keys);

    let rotations: Vec<_> = traces.iter().flat_map(|trace| trace.rotations()).collect();
    assert_eq!(rotations, expected);
    assert_eq!(traces[0].rotation_count() + traces[1].rotation_count(), 0);

    assert_eq!(root_value(&tree), Some(20));
    assert_eq!(shape(tree.root()), "(10 20 30)");
    assert!(tree.check_invariants().is_ok());
}

#[test]
fn every_rotation_event_is_in_progress_then_complete() {
    let mut tree = tree_of(&[30, 10]);
    let trace = tree.insert(20);

    let kinds: Vec<StepKind> = trace.steps().iter().map(|step| step.kind()).collect();
    let rotation = |direction, phase| StepKind::Rotation {
        case: LR,
        direction,
        phase,
    };
    assert_eq!(
        kinds,
        vec![
            rotation(Left, RotationPhase::InProgress),
            rotation(Left, RotationPhase::Complete),
            rotation(Right, RotationPhase::InProgress),
            rotation(Right, RotationPhase::Complete),
        ]
    );

    for step in trace.steps() {
        match step.kind() {
            StepKind::Rotation {
                phase: RotationPhase::InProgress,
                ..
            } => assert!(step.before().is_none()),
            _ => {
                let before = step.before().expect("complete step carries the pre-rotation tree");
                assert!(before.preorder().iter().all(|node| node.markers.is_empty()));
            }
        }
    }
}

#[test]
fn in_progress_step_marks_pivot_rising_and_transferred_subtree() {
    let mut tree = tree_of(&[50, 30, 70, 20, 40]);
    let id = |tree: &AvlTree<i64>, key: i64| tree.search(&key).map(|node| node.id());
    let (pivot, rising, inner) = (id(&tree, 50), id(&tree, 30), id(&tree, 40));

    let trace = tree.insert(10);
    assert_eq!(trace.rotations().collect::<Vec<_>>(), vec![(LL, Right)]);

    let in_progress = trace.steps()[0].after();
    assert_eq!(in_progress.marked(Marker::Pivot).first().copied(), pivot);
    assert_eq!(in_progress.marked(Marker::Rising).first().copied(), rising);
    assert_eq!(in_progress.marked(Marker::Transferred).first().copied(), inner);
    // no structural change yet
    assert_eq!(in_progress.root().map(|root| root.value), Some(50));

    let complete = trace.steps()[1].after();
    assert_eq!(complete.root().map(|root| root.id), rising);
    assert_eq!(complete.find_by_id(inner.expect("40 present")).map(|n| n.value), Some(40));
    assert_eq!(shape(tree.root()), "((10 20 .) 30 (40 50 70))");
    assert!(complete.check_invariants().is_ok());
}

#[test]
fn rotation_keeps_node_identity() {
    let mut tree = tree_of(&[10, 20]);
    let ids_before: Vec<_> = [10, 20]
        .iter()
        .map(|key| tree.search(key).map(|node| node.id()))
        .collect();

    let _ = tree.insert(30);

    let ids_after: Vec<_> = [10, 20]
        .iter()
        .map(|key| tree.search(key).map(|node| node.id()))
        .collect();
    assert_eq!(ids_before, ids_after);
}

#[test]
fn insert_without_rotation_emits_single_placed_step() {
    let mut tree = tree_of(&[20, 10]);
    let trace = tree.insert(30);

    assert_eq!(trace.len(), 1);
    let step = &trace.steps()[0];
    assert_eq!(step.kind(), StepKind::Placed);
    let inserted = tree.search(&30).map(|node| node.id());
    assert_eq!(step.after().marked(Marker::Inserted).first().copied(), inserted);
}
