//! ErdCanvas Core Library
//!
//! Platform-agnostic interaction engine for an entity-relationship diagram
//! canvas: placing tables from a palette, moving and resizing them, and
//! connecting columns across tables.

pub mod canvas;
pub mod config;
pub mod feedback;
pub mod gesture;
pub mod input;
pub mod interaction;
pub mod payload;
pub mod router;
pub mod scene;
pub mod template;
pub mod viewport;

pub use canvas::{CanvasError, CanvasState, ColumnRef, Connection, ConnectionId, PlacedNode};
pub use config::{CanvasConfig, ConfigError};
pub use feedback::{FeedbackChannel, Notification, NotificationKind};
pub use gesture::{GestureKind, GestureState};
pub use input::{CanvasEvent, CaptureKind, ListenerRegistry, PointerCapture};
pub use interaction::{EventOutcome, InteractionController};
pub use payload::{DragPayload, PayloadError};
pub use router::{ConnectionCurve, ConnectionRouter};
pub use scene::{ColumnView, NodeView, RenderScene};
pub use template::{ColumnId, ColumnSpec, NodeId, NodeTemplate, Palette, PaletteError, PaletteSource};
pub use viewport::Viewport;
