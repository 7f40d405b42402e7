use std::sync::{Arc, RwLock};
use std::thread;

use avl_tree::{AvlInspect, AvlTree, RebalanceEvent, Retrace, Rotation, TracingObserver};

fn recorded(keys: &[i32]) -> AvlTree<i32, (), Vec<RebalanceEvent>> {
    let mut tree = AvlTree::with_observer(Vec::new());
    for &k in keys {
        tree.insert(k, ());
    }
    tree
}

fn rotations(events: &[RebalanceEvent]) -> Vec<Rotation> {
    events
        .iter()
        .filter_map(|e| match e {
            RebalanceEvent::Rotated { rotation, .. } => Some(*rotation),
            _ => None,
        })
        .collect()
}

#[test]
fn right_left_case_reports_one_rotation() {
    let tree = recorded(&[10, 20, 15]);
    assert_eq!(
        tree.observer().as_slice(),
        &[
            RebalanceEvent::Propagated {
                retrace: Retrace::Insertion,
                node: 0,
                bf: -1
            },
            RebalanceEvent::ReachedRoot {
                retrace: Retrace::Insertion
            },
            RebalanceEvent::Propagated {
                retrace: Retrace::Insertion,
                node: 1,
                bf: 1
            },
            RebalanceEvent::Rotated {
                retrace: Retrace::Insertion,
                rotation: Rotation::RightLeft,
                pivot: 0,
                new_root: 2
            },
        ]
    );
    assert_eq!(tree.root_index(), Some(2));
}

#[test]
fn left_right_case_reports_one_rotation() {
    let tree = recorded(&[20, 10, 15]);
    let last = *tree.observer().last().unwrap();
    assert_eq!(
        last,
        RebalanceEvent::Rotated {
            retrace: Retrace::Insertion,
            rotation: Rotation::LeftRight,
            pivot: 0,
            new_root: 2
        }
    );
    assert_eq!(rotations(tree.observer()), vec![Rotation::LeftRight]);
}

#[test]
fn balancing_insert_is_absorbed() {
    let mut tree = recorded(&[10, 20]);
    tree.observer_mut().clear();
    tree.insert(5, ());
    assert_eq!(
        tree.observer().as_slice(),
        &[RebalanceEvent::Absorbed {
            retrace: Retrace::Insertion,
            node: 0,
            bf: 0
        }]
    );
}

#[test]
fn overwrite_emits_nothing() {
    let mut tree = recorded(&[1, 2, 3]);
    tree.observer_mut().clear();
    assert_eq!(tree.insert(2, ()), Some(()));
    assert!(tree.observer().is_empty());
}

#[test]
fn insertion_never_rotates_twice() {
    let mut tree = AvlTree::with_observer(Vec::new());
    for k in 0..500 {
        tree.observer_mut().clear();
        tree.insert((k * 7919) % 1009, ());
        assert!(rotations(tree.observer()).len() <= 1);
    }
    tree.check().unwrap();
}

#[test]
fn deletion_cascades_rotations_to_the_root() {
    // Minimal AVL tree of height 5; slots follow insertion order.
    let mut tree = recorded(&[8, 5, 11, 3, 7, 10, 12, 2, 4, 6, 9, 1]);
    tree.observer_mut().clear();
    assert_eq!(tree.remove(&12), Some(()));
    assert_eq!(
        tree.observer().as_slice(),
        &[
            RebalanceEvent::Rotated {
                retrace: Retrace::Deletion,
                rotation: Rotation::Right,
                pivot: 2,
                new_root: 5
            },
            RebalanceEvent::Rotated {
                retrace: Retrace::Deletion,
                rotation: Rotation::Right,
                pivot: 0,
                new_root: 1
            },
            RebalanceEvent::ReachedRoot {
                retrace: Retrace::Deletion
            },
        ]
    );
    assert_eq!(tree.root_index(), Some(1));
    tree.check().unwrap();
}

#[test]
fn deletion_absorbed_by_balanced_parent() {
    let mut tree = recorded(&[2, 1, 3]);
    tree.observer_mut().clear();
    tree.remove(&3);
    assert_eq!(
        tree.observer().as_slice(),
        &[RebalanceEvent::Absorbed {
            retrace: Retrace::Deletion,
            node: 0,
            bf: 1
        }]
    );
}

#[test]
fn borrowed_observer_collects_events() {
    let mut events = Vec::new();
    {
        let mut tree = AvlTree::with_observer(&mut events);
        for k in 1..=3 {
            tree.insert(k, k);
        }
    }
    assert_eq!(rotations(&events), vec![Rotation::Left]);
}

#[test]
fn into_observer_hands_back_events() {
    let tree = recorded(&[3, 2, 1]);
    let events = tree.into_observer();
    assert_eq!(rotations(&events), vec![Rotation::Right]);
}

#[test]
fn tracing_observer_smoke() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        let mut tree = AvlTree::with_observer(TracingObserver);
        for k in 0..64 {
            tree.insert(k, k);
        }
        for k in (0..64).step_by(3) {
            tree.remove(&k);
        }
        tree.check().unwrap();
    });
}

#[test]
fn shared_tree_serves_concurrent_readers() {
    let tree: AvlTree<u32, String> = (0..1_000).map(|k| (k, k.to_string())).collect();
    let tree = Arc::new(RwLock::new(tree));

    thread::scope(|s| {
        for t in 0..4u32 {
            let tree = Arc::clone(&tree);
            s.spawn(move || {
                let guard = tree.read().unwrap();
                for k in (t..1_000).step_by(4) {
                    assert_eq!(guard.get(&k).map(String::as_str), Some(k.to_string().as_str()));
                }
            });
        }
        let writer = Arc::clone(&tree);
        s.spawn(move || {
            let mut guard = writer.write().unwrap();
            guard.insert(5_000, "extra".to_string());
        });
    });

    let guard = tree.read().unwrap();
    assert_eq!(guard.len(), 1_001);
    guard.check().unwrap();
}
