//! Node geometry: field dot → bounding box in surface-local coordinates.
//!
//! The rendering layer owns the boxes (it is the only one that can measure
//! them). The engine queries them on every event and never caches, since
//! layout may shift between events (scrolling, resizing).

use fm_core::model::NodeRef;
use kurbo::{Point, Rect};
use std::collections::HashMap;

/// Answers "where is this dot right now?".
///
/// A dot that is not mounted or not yet measured returns `None`, and is
/// then treated as absent from any hit-test candidate set.
pub trait GeometryProvider {
    fn bounds(&self, node: NodeRef) -> Option<Rect>;

    fn center(&self, node: NodeRef) -> Option<Point> {
        self.bounds(node).map(|r| r.center())
    }
}

/// An explicit id → box table filled in by the rendering layer.
#[derive(Debug, Clone, Default)]
pub struct NodeBoundsTable {
    bounds: HashMap<NodeRef, Rect>,
}

impl NodeBoundsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the box of a dot.
    pub fn set(&mut self, node: NodeRef, rect: Rect) {
        self.bounds.insert(node, rect);
    }

    /// Forget a dot, e.g. when it unmounts.
    pub fn remove(&mut self, node: NodeRef) -> Option<Rect> {
        self.bounds.remove(&node)
    }

    pub fn clear(&mut self) {
        self.bounds.clear();
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

impl GeometryProvider for NodeBoundsTable {
    fn bounds(&self, node: NodeRef) -> Option<Rect> {
        self.bounds.get(&node).copied()
    }
}
