use crate::{Config, Error, Heap, HuffmanTree, NodeId, SingleSymbolCode};

use proptest::prelude::*;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

type Item = (i16, u32);

fn by_key(a: &Item, b: &Item) -> Ordering {
    a.0.cmp(&b.0)
}

fn item_heap() -> Heap<Item, fn(&Item, &Item) -> Ordering> {
    let cmp: fn(&Item, &Item) -> Ordering = by_key;
    Heap::new(cmp)
}

/// Array-backed heap doing the same swaps as `Heap`, 1-based positions
/// stored at `slots[p - 1]`.
#[derive(Default)]
struct ArrayHeap {
    slots: Vec<Item>,
}

impl ArrayHeap {
    fn at(&self, position: usize) -> Item {
        self.slots[position - 1]
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.slots.swap(a - 1, b - 1);
    }

    fn insert(&mut self, item: Item) {
        self.slots.push(item);
        let mut p = self.slots.len();
        while p > 1 && by_key(&self.at(p), &self.at(p / 2)) == Ordering::Less {
            self.swap(p, p / 2);
            p /= 2;
        }
    }

    fn extract_min(&mut self) -> Option<Item> {
        let last = self.slots.len();
        if last == 0 {
            return None;
        }
        self.swap(1, last);
        let min = self.slots.pop();
        let size = self.slots.len();
        let mut p = 1;
        while 2 * p <= size {
            let (l, r) = (2 * p, 2 * p + 1);
            let child = if r <= size && by_key(&self.at(r), &self.at(l)) == Ordering::Less {
                r
            } else {
                l
            };
            if by_key(&self.at(p), &self.at(child)) != Ordering::Greater {
                break;
            }
            self.swap(p, child);
            p = child;
        }
        min
    }
}

fn validate_heap<T, F>(heap: &Heap<T, F>)
where
    F: Fn(&T, &T) -> Ordering,
{
    let nodes = heap.nodes();
    let mut positions = Vec::new();
    let mut stack: Vec<(NodeId, usize)> = heap.root().into_iter().map(|r| (r, 1)).collect();

    if let Some(root) = heap.root() {
        assert_eq!(nodes.get(root).unwrap().parent(), None, "root has a parent");
    }

    while let Some((id, position)) = stack.pop() {
        let node = nodes.get(id).expect("reachable node must be live");
        positions.push(position);
        for (child, child_position) in [(node.left(), 2 * position), (node.right(), 2 * position + 1)] {
            let Some(child) = child else {
                continue;
            };
            let child_node = nodes.get(child).expect("child must be live");
            assert_eq!(child_node.parent(), Some(id), "broken parent link");
            assert_eq!(heap.locate(child_position), Some(child));
            stack.push((child, child_position));
        }
    }

    positions.sort_unstable();
    let expected: Vec<usize> = (1..=heap.len()).collect();
    assert_eq!(positions, expected, "tree is not shape-complete");
    assert_eq!(nodes.len(), heap.len(), "size must match live nodes");
}

fn validate_order(heap: &Heap<Item, fn(&Item, &Item) -> Ordering>) {
    for p in 2..=heap.len() {
        let child = heap.payload(heap.locate(p).unwrap()).unwrap();
        let parent = heap.payload(heap.locate(p / 2).unwrap()).unwrap();
        assert!(by_key(parent, child) != Ordering::Greater, "heap order broken at {p}");
    }
}

#[derive(Clone, Debug)]
enum Op {
    Insert(Item),
    Extract,
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        3 => (any::<i16>(), any::<u32>()).prop_map(Op::Insert),
        // narrow keys to get plenty of ties
        2 => (-4i16..4, any::<u32>()).prop_map(Op::Insert),
        3 => Just(Op::Extract),
    ];
    prop::collection::vec(op, 0..=400)
}

fn code_points(n: usize) -> Vec<char> {
    (0..n as u32).map(|i| char::from_u32(0x41 + i).unwrap()).collect()
}

fn reference_cost(frequencies: &[u64]) -> u64 {
    let mut heap: BinaryHeap<Reverse<u64>> = frequencies.iter().copied().map(Reverse).collect();
    let mut cost = 0;
    while heap.len() > 1 {
        let Reverse(a) = heap.pop().unwrap();
        let Reverse(b) = heap.pop().unwrap();
        cost += a + b;
        heap.push(Reverse(a + b));
    }
    cost
}

proptest! {
    #[test]
    fn linked_heap_matches_array_heap(ops in ops_strategy()) {
        let mut heap = item_heap();
        let mut reference = ArrayHeap::default();

        for op in ops {
            match op {
                Op::Insert(item) => {
                    heap.insert(item).unwrap();
                    reference.insert(item);
                }
                Op::Extract => match reference.extract_min() {
                    Some(expected) => {
                        prop_assert_eq!(heap.extract_min().unwrap(), expected);
                    }
                    None => {
                        prop_assert!(matches!(heap.extract_min(), Err(Error::EmptyHeap)));
                    }
                },
            }
            prop_assert_eq!(heap.len(), reference.slots.len());
            for p in 1..=heap.len() {
                let id = heap.locate(p).unwrap();
                prop_assert_eq!(heap.payload(id).copied(), Some(reference.at(p)));
            }
        }
        validate_heap(&heap);
        validate_order(&heap);
    }

    #[test]
    fn invariants_hold_after_every_op(ops in ops_strategy()) {
        let mut heap = item_heap();
        for op in ops {
            match op {
                Op::Insert(item) => { heap.insert(item).unwrap(); }
                Op::Extract => { let _ = heap.extract_min(); }
            }
            validate_heap(&heap);
            validate_order(&heap);
        }
    }

    #[test]
    fn extraction_is_non_decreasing(keys in prop::collection::vec(any::<i16>(), 0..=300)) {
        let mut heap = item_heap();
        for (i, &k) in keys.iter().enumerate() {
            heap.insert((k, i as u32)).unwrap();
        }
        let mut out = Vec::with_capacity(keys.len());
        while let Ok((k, _)) = heap.extract_min() {
            out.push(k);
        }
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        prop_assert_eq!(out, sorted);
        prop_assert!(heap.nodes().is_empty());
    }

    #[test]
    fn codes_are_prefix_free_and_optimal(frequencies in prop::collection::vec(0u64..1_000, 2..=60)) {
        let cps = code_points(frequencies.len());
        let tree = HuffmanTree::build(&cps, &frequencies).unwrap();
        let codes = tree.codes(SingleSymbolCode::Empty);

        prop_assert_eq!(codes.len(), cps.len());
        for (i, (_, a)) in codes.iter().enumerate() {
            prop_assert!(!a.is_empty());
            for (_, b) in &codes[i + 1..] {
                prop_assert!(!a.starts_with(b.as_str()) && !b.starts_with(a.as_str()));
            }
        }
        prop_assert_eq!(tree.weighted_length(SingleSymbolCode::Empty), u128::from(reference_cost(&frequencies)));
    }

    #[test]
    fn teardown_releases_leaves_and_sentinels(frequencies in prop::collection::vec(1u64..50, 1..=80)) {
        let n = frequencies.len();
        let tree = HuffmanTree::build(&code_points(n), &frequencies).unwrap();
        prop_assert_eq!(tree.len(), 2 * n - 1);

        let (mut leaves, mut internal) = (0, 0);
        let released = tree.destroy_with(|symbol| {
            if symbol.is_internal() {
                internal += 1;
            } else {
                leaves += 1;
            }
        });
        prop_assert_eq!(released, 2 * n - 1);
        prop_assert_eq!(leaves, n);
        prop_assert_eq!(internal, n - 1);
    }

    #[test]
    fn node_limit_below_tree_size_fails(n in 2usize..40, short in 1usize..10) {
        let frequencies: Vec<u64> = (1..=n as u64).collect();
        let config = Config {
            node_limit: Some((2 * n - 1).saturating_sub(short)),
            ..Config::default()
        };
        let err = HuffmanTree::build_with(&code_points(n), &frequencies, &config).unwrap_err();
        prop_assert!(err.is_allocation());
    }
}
