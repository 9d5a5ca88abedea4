//! Input events and pointer listener management.

use crate::payload::DragPayload;
use crate::template::{ColumnId, NodeId, NodeTemplate};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;

/// Events the host feeds into the interaction controller.
///
/// Positions are viewport-space (client) coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CanvasEvent {
    /// A palette item started dragging.
    PaletteDragStart { template: NodeTemplate },
    /// Something was dropped on the canvas surface.
    CanvasDrop {
        position: Point,
        #[serde(default)]
        payload: DragPayload,
    },
    /// Pointer pressed on a node's grip.
    GripDown { node_id: NodeId, position: Point },
    /// Pointer pressed on a node's resize handle.
    ResizeHandleDown { node_id: NodeId, position: Point },
    /// A column started dragging.
    ColumnDragStart { node_id: NodeId, column_id: ColumnId },
    /// A column drag is hovering over a column.
    ColumnDragOver { node_id: NodeId, column_id: ColumnId },
    /// A column drag left the column it was hovering.
    ColumnDragLeave { node_id: NodeId, column_id: ColumnId },
    /// A column drag was dropped on a column.
    ColumnDrop { node_id: NodeId, column_id: ColumnId },
    /// Pointer moved.
    Move { position: Point },
    /// Pointer released.
    Up { position: Point },
    /// A drag ended without a drop being handled.
    DragEnd,
    /// The canvas content scrolled to a new offset.
    Scroll { offset: Vec2 },
    /// The canvas surface moved or changed size in the host layout.
    SurfaceResize { origin: Point, size: Size },
    /// Remove a node (the node's close button).
    RemoveNode { node_id: NodeId },
}

/// Which transient listener a capture stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureKind {
    Move,
    Resize,
}

/// Tracks how many pointer listeners are currently attached.
///
/// Move and resize gestures acquire a [`PointerCapture`] from the registry
/// and hold it for exactly as long as the gesture lives. Dropping the
/// capture detaches the listener, so every exit path releases it once.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    active: Rc<Cell<usize>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a pointer listener for the duration of a gesture.
    pub fn acquire(&self, kind: CaptureKind) -> PointerCapture {
        self.active.set(self.active.get() + 1);
        log::trace!("Attached {:?} listener ({} active)", kind, self.active.get());
        PointerCapture {
            kind,
            active: Rc::clone(&self.active),
        }
    }

    /// Number of listeners currently attached.
    pub fn active(&self) -> usize {
        self.active.get()
    }
}

/// An attached pointer listener. Detaches on drop.
#[derive(Debug)]
pub struct PointerCapture {
    kind: CaptureKind,
    active: Rc<Cell<usize>>,
}

impl PointerCapture {
    pub fn kind(&self) -> CaptureKind {
        self.kind
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        self.active.set(self.active.get().saturating_sub(1));
        log::trace!("Detached {:?} listener ({} active)", self.kind, self.active.get());
    }
}
