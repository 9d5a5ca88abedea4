//! Gesture state definitions.

use crate::canvas::ColumnRef;
use crate::input::PointerCapture;
use crate::template::{ColumnSpec, NodeId};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// The gesture currently in flight. Only one can be active at a time.
#[derive(Debug, Default)]
pub enum GestureState {
    /// No interaction.
    #[default]
    Idle,
    /// A palette template is being dragged toward the canvas.
    Placing,
    /// A node is following the pointer.
    Moving {
        node_id: NodeId,
        capture: PointerCapture,
    },
    /// A node's size is following the pointer.
    Resizing {
        node_id: NodeId,
        /// Pointer position (canvas coordinates) when the resize began.
        initial_pointer: Point,
        /// Node size when the resize began.
        initial_size: Size,
        capture: PointerCapture,
    },
    /// A column is being dragged toward another column.
    Connecting {
        origin: ColumnRef,
        origin_column: ColumnSpec,
    },
}

/// Discriminant of [`GestureState`], for logging and the render scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureKind {
    Idle,
    Placing,
    Moving,
    Resizing,
    Connecting,
}

impl GestureState {
    pub fn kind(&self) -> GestureKind {
        match self {
            Self::Idle => GestureKind::Idle,
            Self::Placing => GestureKind::Placing,
            Self::Moving { .. } => GestureKind::Moving,
            Self::Resizing { .. } => GestureKind::Resizing,
            Self::Connecting { .. } => GestureKind::Connecting,
        }
    }

    /// Check if any gesture is in flight.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Check if a move or resize is in flight.
    pub fn is_spatial(&self) -> bool {
        matches!(self, Self::Moving { .. } | Self::Resizing { .. })
    }

    /// The node targeted by a move or resize.
    pub fn spatial_target(&self) -> Option<&str> {
        match self {
            Self::Moving { node_id, .. } | Self::Resizing { node_id, .. } => Some(node_id.as_str()),
            _ => None,
        }
    }

    /// The column a connect gesture started from.
    pub fn connect_origin(&self) -> Option<&ColumnRef> {
        match self {
            Self::Connecting { origin, .. } => Some(origin),
            _ => None,
        }
    }
}

/// Size produced by a resize drag, before the canvas applies its floor.
pub fn resized(initial_size: Size, initial_pointer: Point, current: Point) -> Size {
    let delta: Vec2 = current - initial_pointer;
    Size::new(initial_size.width + delta.x, initial_size.height + delta.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{CaptureKind, ListenerRegistry};

    #[test]
    fn test_default_is_idle() {
        let state = GestureState::default();
        assert_eq!(state.kind(), GestureKind::Idle);
        assert!(!state.is_active());
    }

    #[test]
    fn test_spatial_target() {
        let registry = ListenerRegistry::new();
        let state = GestureState::Moving {
            node_id: "employees".to_string(),
            capture: registry.acquire(CaptureKind::Move),
        };
        assert!(state.is_spatial());
        assert_eq!(state.spatial_target(), Some("employees"));
        assert!(state.connect_origin().is_none());
    }

    #[test]
    fn test_replacing_state_releases_capture() {
        let registry = ListenerRegistry::new();
        let mut state = GestureState::Resizing {
            node_id: "a".to_string(),
            initial_pointer: Point::ZERO,
            initial_size: Size::new(250.0, 200.0),
            capture: registry.acquire(CaptureKind::Resize),
        };
        assert_eq!(state.kind(), GestureKind::Resizing);
        assert_eq!(registry.active(), 1);

        state = GestureState::Idle;
        assert_eq!(state.kind(), GestureKind::Idle);
        assert_eq!(registry.active(), 0);
    }

    #[test]
    fn test_resized_applies_delta_per_axis() {
        let size = resized(Size::new(250.0, 200.0), Point::new(100.0, 100.0), Point::new(150.0, 80.0));
        assert_eq!(size, Size::new(300.0, 180.0));
    }
}
