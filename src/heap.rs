//! Min-heap kept as a linked complete binary tree.
//!
//! There is no backing array. Level-order positions are reached by decoding
//! the position's bits into a left/right path from the root, so the
//! array relations (children of k at 2k and 2k+1) still hold in O(log n).

use std::cmp::Ordering;

use log::trace;

use crate::error::{Error, Result};
use crate::node::{NodeArena, NodeId};

/// Finds the node at 1-based level-order `position`.
///
/// The leading 1 bit of `position` stands for the root; every bit after it,
/// most significant first, picks the left (0) or right (1) child.
pub fn locate<T>(nodes: &NodeArena<T>, root: Option<NodeId>, position: usize) -> Option<NodeId> {
    if position == 0 {
        return None;
    }
    let mut current = root?;
    let mut mask = 1usize << (usize::BITS - 1 - position.leading_zeros());
    while mask > 1 {
        mask >>= 1;
        let node = nodes.get(current)?;
        current = if position & mask != 0 {
            node.right()?
        } else {
            node.left()?
        };
    }
    Some(current)
}

pub struct Heap<T, F> {
    nodes: NodeArena<T>,
    root: Option<NodeId>,
    size: usize,
    cmp: F,
}

impl<T, F> Heap<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    pub fn new(cmp: F) -> Self {
        Self {
            nodes: NodeArena::new(),
            root: None,
            size: 0,
            cmp,
        }
    }

    pub fn with_node_limit(cmp: F, limit: usize) -> Self {
        Self {
            nodes: NodeArena::with_limit(limit),
            root: None,
            size: 0,
            cmp,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn peek(&self) -> Option<&T> {
        self.nodes.payload(self.root?)
    }

    pub fn payload(&self, id: NodeId) -> Option<&T> {
        self.nodes.payload(id)
    }

    pub fn locate(&self, position: usize) -> Option<NodeId> {
        locate(&self.nodes, self.root, position)
    }

    #[cfg(test)]
    pub(crate) fn nodes(&self) -> &NodeArena<T> {
        &self.nodes
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Inserts `payload` and returns the node it settled in after sift-up.
    ///
    /// Fails only when a node cannot be allocated, in which case the heap
    /// is unchanged.
    pub fn insert(&mut self, payload: T) -> Result<NodeId> {
        let Some(root) = self.root else {
            let id = self.nodes.create(None, payload)?;
            self.root = Some(id);
            self.size = 1;
            return Ok(id);
        };

        let position = self.size + 1;
        let parent = locate(&self.nodes, Some(root), position / 2)
            .ok_or(Error::MissingPosition(position / 2))?;
        let id = self.nodes.create(Some(parent), payload)?;
        if position % 2 == 0 {
            self.nodes.set_left(parent, Some(id));
        } else {
            self.nodes.set_right(parent, Some(id));
        }
        self.size = position;

        Ok(self.sift_up(id))
    }

    pub fn extract_min(&mut self) -> Result<T> {
        let root = self.root.ok_or(Error::EmptyHeap)?;

        if self.size == 1 {
            let payload = self.nodes.release(root).ok_or(Error::MissingPosition(1))?;
            self.root = None;
            self.size = 0;
            return Ok(payload);
        }

        let last = locate(&self.nodes, Some(root), self.size)
            .ok_or(Error::MissingPosition(self.size))?;
        // the minimum travels to the last node, which is then cut off
        self.nodes.swap_payloads(root, last);
        self.nodes.detach(last);
        let min = self
            .nodes
            .release(last)
            .ok_or(Error::MissingPosition(self.size))?;
        self.size -= 1;

        self.sift_down(root);
        Ok(min)
    }

    /// Tears down every node, dropping the payloads.
    pub fn destroy(self) -> usize {
        self.destroy_with(drop)
    }

    pub fn destroy_with<D>(mut self, destructor: D) -> usize
    where
        D: FnMut(T),
    {
        let root = self.root.take();
        self.size = 0;
        self.nodes.destroy_with(root, destructor)
    }

    fn ordering(&self, a: NodeId, b: NodeId) -> Ordering {
        match (self.nodes.payload(a), self.nodes.payload(b)) {
            (Some(a), Some(b)) => (self.cmp)(a, b),
            _ => Ordering::Equal,
        }
    }

    fn sift_up(&mut self, mut current: NodeId) -> NodeId {
        let mut steps = 0;
        while let Some(parent) = self.nodes.get(current).and_then(|n| n.parent()) {
            if self.ordering(current, parent) != Ordering::Less {
                break;
            }
            self.nodes.swap_payloads(current, parent);
            current = parent;
            steps += 1;
        }
        trace!("sift-up moved payload {} levels", steps);
        current
    }

    fn sift_down(&mut self, mut current: NodeId) {
        while let Some(node) = self.nodes.get(current) {
            let Some(left) = node.left() else {
                break;
            };
            let child = match node.right() {
                Some(right) if self.ordering(right, left) == Ordering::Less => right,
                _ => left,
            };
            if self.ordering(current, child) != Ordering::Greater {
                break;
            }
            self.nodes.swap_payloads(current, child);
            current = child;
        }
    }
}
