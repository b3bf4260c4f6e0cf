//! Binary-tree nodes stored in a slot arena.
//!
//! Child links own their subtree; parent links are plain `NodeId`
//! back-references into the same arena. Released slots go on a free list
//! and are reused by later creations.

use log::trace;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
pub struct Node<T> {
    payload: T,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl<T> Node<T> {
    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

#[derive(Debug)]
pub struct NodeArena<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    live: usize,
    limit: Option<usize>,
}

impl<T> NodeArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            limit: None,
        }
    }

    /// An arena that refuses to hold more than `limit` live nodes.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::new()
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Makes sure the next `additional` calls to [`create`](Self::create)
    /// cannot fail.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        if let Some(limit) = self.limit {
            if self.live.saturating_add(additional) > limit {
                return Err(Error::NodeLimit { limit });
            }
        }
        let fresh = additional.saturating_sub(self.free.len());
        if fresh > 0 {
            self.slots.try_reserve(fresh)?;
        }
        Ok(())
    }

    /// Allocates a node with no children. The parent's child links are
    /// left untouched.
    pub fn create(&mut self, parent: Option<NodeId>, payload: T) -> Result<NodeId> {
        self.reserve(1)?;
        let node = Node {
            payload,
            parent,
            left: None,
            right: None,
        };
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                index
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.live += 1;
        Ok(NodeId(index))
    }

    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn payload(&self, id: NodeId) -> Option<&T> {
        self.get(id).map(Node::payload)
    }

    pub fn set_left(&mut self, parent: NodeId, child: Option<NodeId>) {
        if let Some(node) = self.get_mut(parent) {
            node.left = child;
        }
    }

    pub fn set_right(&mut self, parent: NodeId, child: Option<NodeId>) {
        if let Some(node) = self.get_mut(parent) {
            node.right = child;
        }
    }

    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) {
        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
        }
    }

    /// Clears whichever child link of the parent points at `id`.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.get(id).and_then(Node::parent) else {
            return;
        };
        if let Some(node) = self.get_mut(parent) {
            if node.left == Some(id) {
                node.left = None;
            } else if node.right == Some(id) {
                node.right = None;
            }
        }
        self.set_parent(id, None);
    }

    pub(crate) fn swap_payloads(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        let (lo, hi) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        if hi >= self.slots.len() {
            return;
        }
        let (head, tail) = self.slots.split_at_mut(hi);
        if let (Some(x), Some(y)) = (head[lo].as_mut(), tail[0].as_mut()) {
            std::mem::swap(&mut x.payload, &mut y.payload);
        }
    }

    /// Frees a single slot without looking at its links.
    pub(crate) fn release(&mut self, id: NodeId) -> Option<T> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        self.live -= 1;
        Some(node.payload)
    }

    /// Tears down the subtree under `node`, dropping the payloads.
    pub fn destroy(&mut self, node: Option<NodeId>) -> usize {
        self.destroy_with(node, drop)
    }

    /// Tears down the subtree under `node`: left subtree, right subtree,
    /// then the node itself, handing each payload to `destructor`.
    /// Returns the number of nodes released.
    pub fn destroy_with<F>(&mut self, node: Option<NodeId>, mut destructor: F) -> usize
    where
        F: FnMut(T),
    {
        let Some(top) = node else {
            return 0;
        };
        if self.get(top).is_none() {
            return 0;
        }
        self.detach(top);

        let mut released = 0;
        let mut stack = vec![(top, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                if let Some(payload) = self.release(id) {
                    destructor(payload);
                    released += 1;
                }
                continue;
            }
            let Some(current) = self.get(id) else {
                continue;
            };
            let (left, right) = (current.left, current.right);
            stack.push((id, true));
            if let Some(right) = right {
                stack.push((right, false));
            }
            if let Some(left) = left {
                stack.push((left, false));
            }
        }
        trace!("Released {} nodes, {} still live", released, self.live);
        released
    }
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
