// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point quadtree backend.
//!
//! Nodes live in a flat arena. A leaf holds up to `leaf_capacity` slots; one more
//! insert splits it into four quadrants at its midpoint. Splitting stops at
//! `max_depth`, so coincident points end up sharing one deep leaf instead of
//! recursing forever. Removals merge four sibling leaves back into their parent
//! once they fit in a single leaf again, so the tree shape only depends on the
//! current point set.
//!
//! Nearest-point search is a branch-and-bound walk: the quadrant containing the
//! query point is visited first, and any node whose rectangle is farther away
//! than the search radius or the best candidate so far is skipped.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use smallvec::SmallVec;

use crate::backend::{Backend, Nearest, offer};
use crate::types::{Aabb2D, Quadrant, Scalar, distance_squared};

const ROOT: usize = 0;

/// Tuning knobs for [`Quadtree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct QuadtreeConfig {
    /// Maximum number of points a leaf holds before it splits.
    ///
    /// Values below 1 are treated as 1.
    pub leaf_capacity: usize,
    /// Depth at which leaves stop splitting. The root has depth 0.
    pub max_depth: u8,
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        Self {
            leaf_capacity: 8,
            max_depth: 24,
        }
    }
}

#[derive(Clone, Debug)]
enum NodeKind {
    Leaf(SmallVec<[usize; 8]>),
    Internal([usize; 4]),
}

#[derive(Clone, Debug)]
struct Node<T> {
    rect: Aabb2D<T>,
    depth: u8,
    parent: Option<usize>,
    kind: NodeKind,
}

impl<T> Node<T> {
    fn leaf(rect: Aabb2D<T>, depth: u8, parent: Option<usize>) -> Self {
        Self {
            rect,
            depth,
            parent,
            kind: NodeKind::Leaf(SmallVec::new()),
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct SlotEntry<T> {
    x: T,
    y: T,
    // Leaf currently holding this slot.
    leaf: usize,
}

/// Point quadtree backend.
pub struct Quadtree<T: Scalar> {
    config: QuadtreeConfig,
    bounds: Aabb2D<T>,
    nodes: Vec<Node<T>>,
    free_nodes: Vec<usize>,
    slots: Vec<Option<SlotEntry<T>>>,
    len: usize,
}

impl<T: Scalar> Debug for Quadtree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Quadtree")
            .field("bounds", &self.bounds)
            .field("config", &self.config)
            .field("len", &self.len)
            .field("nodes", &self.node_count())
            .field("depth", &self.depth())
            .finish_non_exhaustive()
    }
}

impl<T: Scalar> Quadtree<T> {
    /// Create an empty quadtree covering `bounds`.
    pub fn new(bounds: Aabb2D<T>, config: QuadtreeConfig) -> Self {
        let config = QuadtreeConfig {
            leaf_capacity: config.leaf_capacity.max(1),
            ..config
        };
        Self {
            config,
            bounds,
            nodes: vec![Node::leaf(bounds, 0, None)],
            free_nodes: Vec::new(),
            slots: Vec::new(),
            len: 0,
        }
    }

    /// The root rectangle.
    pub fn bounds(&self) -> Aabb2D<T> {
        self.bounds
    }

    /// The configuration in effect.
    pub fn config(&self) -> QuadtreeConfig {
        self.config
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no points are stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of live nodes, internal and leaf.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free_nodes.len()
    }

    /// Depth of the deepest live leaf. An unsplit tree has depth 0.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: SmallVec<[usize; 64]> = SmallVec::new();
        stack.push(ROOT);
        while let Some(n) = stack.pop() {
            let node = &self.nodes[n];
            match &node.kind {
                NodeKind::Leaf(_) => deepest = deepest.max(usize::from(node.depth)),
                NodeKind::Internal(children) => stack.extend_from_slice(children),
            }
        }
        deepest
    }

    fn alloc_node(&mut self, node: Node<T>) -> usize {
        if let Some(n) = self.free_nodes.pop() {
            self.nodes[n] = node;
            n
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        }
    }

    fn slot_entry(&self, slot: usize) -> &SlotEntry<T> {
        self.slots
            .get(slot)
            .expect("quadtree invariant violated: leaf references out-of-bounds slot")
            .as_ref()
            .expect("quadtree invariant violated: leaf references vacant slot")
    }

    fn leaf_items_mut(&mut self, n: usize) -> &mut SmallVec<[usize; 8]> {
        match &mut self.nodes[n].kind {
            NodeKind::Leaf(items) => items,
            NodeKind::Internal(_) => {
                unreachable!("quadtree invariant violated: slot points at an internal node")
            }
        }
    }

    fn leaf_for(&self, x: T, y: T) -> usize {
        let mut n = ROOT;
        loop {
            let node = &self.nodes[n];
            match &node.kind {
                NodeKind::Leaf(_) => return n,
                NodeKind::Internal(children) => {
                    n = children[node.rect.quadrant_of(x, y).index()];
                }
            }
        }
    }

    fn split_if_needed(&mut self, leaf: usize) {
        let mut work: SmallVec<[usize; 8]> = SmallVec::new();
        work.push(leaf);
        while let Some(n) = work.pop() {
            let node = &self.nodes[n];
            let overfull = match &node.kind {
                NodeKind::Leaf(items) => items.len() > self.config.leaf_capacity,
                NodeKind::Internal(_) => false,
            };
            if overfull && node.depth < self.config.max_depth {
                work.extend_from_slice(&self.split(n));
            }
        }
    }

    fn split(&mut self, n: usize) -> [usize; 4] {
        let rect = self.nodes[n].rect;
        let depth = self.nodes[n].depth + 1;
        let mut children = [0; 4];
        for q in Quadrant::ALL {
            children[q.index()] = self.alloc_node(Node::leaf(rect.quadrant(q), depth, Some(n)));
        }
        let NodeKind::Leaf(items) =
            core::mem::replace(&mut self.nodes[n].kind, NodeKind::Internal(children))
        else {
            unreachable!("quadtree invariant violated: split called on an internal node");
        };
        for slot in items {
            let SlotEntry { x, y, .. } = *self.slot_entry(slot);
            let child = children[rect.quadrant_of(x, y).index()];
            self.leaf_items_mut(child).push(slot);
            if let Some(Some(entry)) = self.slots.get_mut(slot) {
                entry.leaf = child;
            }
        }
        children
    }

    // Walk up from `n`, folding four leaf children back into their parent while they fit.
    fn merge_upward(&mut self, mut n: Option<usize>) {
        while let Some(p) = n {
            let NodeKind::Internal(children) = self.nodes[p].kind else {
                return;
            };
            let mut total = 0;
            for &c in &children {
                match &self.nodes[c].kind {
                    NodeKind::Leaf(items) => total += items.len(),
                    NodeKind::Internal(_) => return,
                }
            }
            if total > self.config.leaf_capacity {
                return;
            }
            let mut merged: SmallVec<[usize; 8]> = SmallVec::with_capacity(total);
            for &c in &children {
                if let NodeKind::Leaf(items) =
                    core::mem::replace(&mut self.nodes[c].kind, NodeKind::Leaf(SmallVec::new()))
                {
                    merged.extend(items);
                }
                self.free_nodes.push(c);
            }
            for &slot in &merged {
                if let Some(Some(entry)) = self.slots.get_mut(slot) {
                    entry.leaf = p;
                }
            }
            self.nodes[p].kind = NodeKind::Leaf(merged);
            n = self.nodes[p].parent;
        }
    }

    fn reset_nodes(&mut self) {
        self.nodes.clear();
        self.free_nodes.clear();
        self.nodes.push(Node::leaf(self.bounds, 0, None));
    }
}

impl<T: Scalar> Backend<T> for Quadtree<T> {
    fn insert(&mut self, slot: usize, x: T, y: T) {
        debug_assert!(
            self.bounds.contains_point(x, y),
            "quadtree insert outside of bounds"
        );
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, || None);
        }
        // If this slot was previously used, drop its old position first.
        if self.slots[slot].is_some() {
            self.remove(slot);
        }
        let leaf = self.leaf_for(x, y);
        self.leaf_items_mut(leaf).push(slot);
        self.slots[slot] = Some(SlotEntry { x, y, leaf });
        self.len += 1;
        self.split_if_needed(leaf);
    }

    fn update(&mut self, slot: usize, x: T, y: T) {
        let Some(Some(entry)) = self.slots.get(slot).copied() else {
            // If the slot does not exist, treat this as an insert.
            self.insert(slot, x, y);
            return;
        };
        if self.leaf_for(x, y) == entry.leaf {
            self.slots[slot] = Some(SlotEntry { x, y, ..entry });
            return;
        }
        self.remove(slot);
        self.insert(slot, x, y);
    }

    fn remove(&mut self, slot: usize) {
        let Some(entry) = self.slots.get_mut(slot).and_then(Option::take) else {
            return;
        };
        self.len -= 1;
        let items = self.leaf_items_mut(entry.leaf);
        let pos = items
            .iter()
            .position(|&s| s == slot)
            .expect("quadtree invariant violated: slot not found in its leaf");
        items.swap_remove(pos);
        let parent = self.nodes[entry.leaf].parent;
        self.merge_upward(parent);
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.len = 0;
        self.reset_nodes();
    }

    fn rebound(&mut self, bounds: Aabb2D<T>) {
        let live: Vec<(usize, T, T)> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|e| (i, e.x, e.y)))
            .collect();
        self.bounds = bounds;
        self.clear();
        for (slot, x, y) in live {
            self.insert(slot, x, y);
        }
    }

    fn nearest(&self, x: T, y: T, max_distance_squared: T::Acc) -> Option<Nearest<T::Acc>> {
        let mut best: Option<Nearest<T::Acc>> = None;
        let mut stack: SmallVec<[usize; 64]> = SmallVec::new();
        stack.push(ROOT);
        while let Some(n) = stack.pop() {
            let node = &self.nodes[n];
            let bound = node.rect.distance_squared_to_point(x, y);
            if bound > max_distance_squared {
                continue;
            }
            // Equal bounds are not pruned: they may hold a tie with a lower slot.
            if let Some(b) = &best
                && bound > b.distance_squared
            {
                continue;
            }
            match &node.kind {
                NodeKind::Leaf(items) => {
                    for &slot in items {
                        let e = self.slot_entry(slot);
                        let d = distance_squared(e.x, e.y, x, y);
                        if d <= max_distance_squared {
                            offer(&mut best, slot, d);
                        }
                    }
                }
                NodeKind::Internal(children) => {
                    // Pop order: containing quadrant, then the two neighbours, then the diagonal.
                    let q = node.rect.quadrant_of(x, y).index();
                    stack.push(children[q ^ 3]);
                    stack.push(children[q ^ 2]);
                    stack.push(children[q ^ 1]);
                    stack.push(children[q]);
                }
            }
        }
        best
    }

    fn visit_rect<F: FnMut(usize)>(&self, rect: Aabb2D<T>, mut f: F) {
        let mut stack: SmallVec<[usize; 64]> = SmallVec::new();
        stack.push(ROOT);
        while let Some(n) = stack.pop() {
            let node = &self.nodes[n];
            if !node.rect.overlaps(&rect) {
                continue;
            }
            match &node.kind {
                NodeKind::Leaf(items) => {
                    for &slot in items {
                        let e = self.slot_entry(slot);
                        if rect.contains_point(e.x, e.y) {
                            f(slot);
                        }
                    }
                }
                NodeKind::Internal(children) => stack.extend_from_slice(children),
            }
        }
    }
}
