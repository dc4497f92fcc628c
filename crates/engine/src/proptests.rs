use super::*;

use proptest::prelude::*;
use protocol::{KeyValueEntry, Point, Rect};
use crate::spatial::{LEAF_CAPACITY, Quadrant};
use std::collections::{BTreeMap, HashSet};

const WORLD_WIDTH: i32 = 64;

/// Leaves hold at most `LEAF_CAPACITY` distinct points unless they cannot
/// split, and no internal node could be collapsed into a single leaf.
/// Returns the distinct points held by the subtree.
fn validate_node(node: &QuadNode<u8>, start: Point, width: i32) -> HashSet<Point> {
    match node {
        QuadNode::Empty => HashSet::new(),
        QuadNode::Leaf(entries) => {
            assert!(!entries.is_empty(), "leaf without entries at {start}, {width}");
            let distinct: HashSet<Point> = entries.iter().map(|e| *e.value()).collect();
            assert!(
                distinct.len() <= LEAF_CAPACITY || width <= 1,
                "leaf at {start}, {width} holds {} distinct points",
                distinct.len()
            );
            for entry in entries {
                let point = entry.value();
                if point.x() < WORLD_WIDTH && point.y() < WORLD_WIDTH {
                    assert!(
                        Rect::square(start, width).contains_point(point),
                        "{point} stored outside {start}, {width}"
                    );
                }
            }
            distinct
        }
        QuadNode::Internal(_) => {
            let half = width / 2;
            let mut distinct = HashSet::new();
            let mut any_internal = false;
            for quadrant in Quadrant::ALL {
                let child = node.child(quadrant).unwrap();
                any_internal |= child.is_internal();
                distinct.extend(validate_node(child, quadrant.origin(start, half), half));
            }
            assert!(
                any_internal || distinct.len() > LEAF_CAPACITY,
                "internal node at {start}, {width} should have collapsed"
            );
            distinct
        }
    }
}

#[derive(Clone, Debug)]
enum Op {
    Insert(u8, i32, i32),
    Remove(u8),
    RemoveByValue(i32, i32),
    Search(u8),
}

fn coord() -> impl Strategy<Value = i32> + Clone {
    // Small range so points collide often; a few land out of bounds.
    -2..=WORLD_WIDTH + 2
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = 0u8..8;
    let op = prop_oneof![
        50 => (key.clone(), coord(), coord()).prop_map(|(k, x, y)| Op::Insert(k, x, y)),
        20 => key.clone().prop_map(Op::Remove),
        20 => (coord(), coord()).prop_map(|(x, y)| Op::RemoveByValue(x, y)),
        10 => key.prop_map(Op::Search),
    ];
    prop::collection::vec(op, 0..=400)
}

fn in_bounds(x: i32, y: i32) -> bool {
    (0..=WORLD_WIDTH).contains(&x) && (0..=WORLD_WIDTH).contains(&y)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_skiplist_matches_model(ops in ops_strategy(), seed in any::<u64>()) {
        let mut list: SkipList<u8, Point> = SkipList::with_seed(seed);
        // Newest entry first within each key.
        let mut model: BTreeMap<u8, Vec<Point>> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(k, x, y) => {
                    let point = Point::new(x, y);
                    list.insert(KeyValueEntry::new(k, point));
                    model.entry(k).or_default().insert(0, point);
                }
                Op::Remove(k) => {
                    let got = list.remove(&k).map(|e| *e.value());
                    let expected = model.get_mut(&k).filter(|run| !run.is_empty()).map(|run| run.remove(0));
                    prop_assert_eq!(got, expected);
                }
                Op::RemoveByValue(x, y) => {
                    let point = Point::new(x, y);
                    let got = list.remove_by_value(&point).map(|e| *e.key());
                    // First key in order whose run holds the point, newest first.
                    let expected = model.iter_mut().find_map(|(k, run)| {
                        let pos = run.iter().position(|p| *p == point)?;
                        run.remove(pos);
                        Some(*k)
                    });
                    prop_assert_eq!(got, expected);
                }
                Op::Search(k) => {
                    let got: Vec<Point> = list.search(&k).into_iter().map(|e| *e.value()).collect();
                    let expected = model.get(&k).cloned().unwrap_or_default();
                    prop_assert_eq!(got, expected);
                }
            }
        }

        let got: Vec<(u8, Point)> = list.iter().map(|e| (*e.key(), *e.value())).collect();
        let expected: Vec<(u8, Point)> = model
            .iter()
            .flat_map(|(k, run)| run.iter().map(move |p| (*k, *p)))
            .collect();
        prop_assert_eq!(list.len(), expected.len());
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_database_indexes_agree(ops in ops_strategy(), seed in any::<u64>()) {
        let mut db: Database<u8> = Database::with_seed(WORLD_WIDTH, seed).unwrap();
        let mut model: HashSet<(u8, Point)> = HashSet::new();

        for op in ops {
            match op {
                Op::Insert(k, x, y) => {
                    let point = Point::new(x, y);
                    let expected = in_bounds(x, y) && !model.contains(&(k, point));
                    prop_assert_eq!(db.insert(KeyValueEntry::new(k, point)), expected);
                    if expected {
                        model.insert((k, point));
                    }
                }
                Op::Remove(k) => {
                    let newest = db.search(&k).first().map(|e| *e.value());
                    let removed = db.remove(&k).map(|e| *e.value());
                    prop_assert_eq!(removed, newest);
                    if let Some(point) = removed {
                        prop_assert!(model.remove(&(k, point)));
                    }
                }
                Op::RemoveByValue(x, y) => {
                    let point = Point::new(x, y);
                    let held = model.iter().any(|(_, p)| *p == point);
                    match db.remove_by_value(&point) {
                        Some(entry) => {
                            prop_assert_eq!(*entry.value(), point);
                            prop_assert!(model.remove(&(*entry.key(), point)));
                        }
                        None => prop_assert!(!held),
                    }
                }
                Op::Search(k) => {
                    let got: HashSet<Point> = db.search(&k).into_iter().map(|e| *e.value()).collect();
                    let expected: HashSet<Point> =
                        model.iter().filter(|(key, _)| *key == k).map(|(_, p)| *p).collect();
                    prop_assert_eq!(got, expected);
                }
            }
            prop_assert_eq!(db.len(), model.len());
        }

        let by_key: HashSet<(u8, Point)> = db.iter().map(|e| (*e.key(), *e.value())).collect();
        let by_region: Vec<(u8, Point)> = db
            .region_search(0, 0, WORLD_WIDTH + 1, WORLD_WIDTH + 1)
            .entries
            .into_iter()
            .map(|e| (*e.key(), *e.value()))
            .collect();
        prop_assert_eq!(by_region.len(), model.len());
        prop_assert_eq!(&by_key, &model);
        prop_assert_eq!(by_region.into_iter().collect::<HashSet<_>>(), model);

        validate_node(db.tree().root(), Point::new(0, 0), WORLD_WIDTH);
    }
}

#[test]
fn exhaustive_remove_order_restores_empty_tree() {
    let points = [(0, 0), (1, 0), (0, 1), (40, 40), (40, 40), (63, 2), (64, 64)];
    for first in 0..points.len() {
        let mut db: Database<u8> = Database::with_seed(WORLD_WIDTH, 3).unwrap();
        for (i, &(x, y)) in points.iter().enumerate() {
            assert!(db.insert(KeyValueEntry::new(i as u8, Point::new(x, y))));
        }
        validate_node(db.tree().root(), Point::new(0, 0), WORLD_WIDTH);

        let order = (first..points.len()).chain(0..first);
        for i in order {
            let (x, y) = points[i];
            assert!(db.remove_by_value(&Point::new(x, y)).is_some());
            validate_node(db.tree().root(), Point::new(0, 0), WORLD_WIDTH);
        }
        assert!(db.is_empty());
        assert!(db.tree().root().is_empty());
    }
}
