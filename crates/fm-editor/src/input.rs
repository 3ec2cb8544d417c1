//! Input abstraction layer.
//!
//! Normalizes mouse, touch, and pen events on the editing surface into a
//! unified `PointerEvent` consumed by the editor. Coordinates are
//! surface-local.

use fm_core::model::NodeRef;
use kurbo::Point;

/// A normalized pointer event from any pointing device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer pressed. `node` is the connectable dot under the pointer, if any.
    Down {
        x: f64,
        y: f64,
        node: Option<NodeRef>,
    },

    /// Pointer moved.
    Move { x: f64, y: f64 },

    /// Pointer released.
    Up { x: f64, y: f64 },

    /// Pointer left the editing surface (or pointer capture was lost).
    Leave,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64, node: Option<NodeRef>) -> Self {
        Self::Down { x, y, node }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::Move { x, y }
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::Up { x, y }
    }

    /// Extract position if the event carries one.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::Down { x, y, .. } | Self::Move { x, y } | Self::Up { x, y } => {
                Some(Point::new(*x, *y))
            }
            Self::Leave => None,
        }
    }
}
