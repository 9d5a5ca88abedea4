//! Interaction controller: turns pointer gestures into canvas mutations.
//!
//! Every gesture either commits exactly one mutation of [`CanvasState`] or
//! is abandoned with none. Only one gesture is in flight at a time; a
//! gesture that tries to start while another is active is rejected.

use crate::canvas::{CanvasState, ColumnRef, ConnectionId};
use crate::config::CanvasConfig;
use crate::feedback::{FeedbackChannel, NotificationKind};
use crate::gesture::{self, GestureKind, GestureState};
use crate::input::{CanvasEvent, CaptureKind, ListenerRegistry};
use crate::payload::DragPayload;
use crate::router::{ConnectionCurve, ConnectionRouter};
use crate::scene::{NodeView, RenderScene};
use crate::template::NodeTemplate;
use crate::viewport::Viewport;
use kurbo::{Point, Vec2};

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Message shown when a drop payload cannot be decoded.
const MALFORMED_PAYLOAD_MESSAGE: &str = "Could not read the dropped table";

/// Result of feeding one event to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event changed nothing.
    Ignored,
    /// The event changed the canvas or the gesture state.
    Applied,
    /// A place gesture started; the host must carry this payload to the drop.
    Payload(DragPayload),
}

impl From<bool> for EventOutcome {
    fn from(applied: bool) -> Self {
        if applied { Self::Applied } else { Self::Ignored }
    }
}

/// Interprets gesture sequences and owns everything they touch.
#[derive(Debug)]
pub struct InteractionController {
    state: CanvasState,
    viewport: Viewport,
    gesture: GestureState,
    /// Column currently under a connect drag.
    hovered: Option<ColumnRef>,
    feedback: FeedbackChannel,
    router: ConnectionRouter,
    listeners: ListenerRegistry,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self::with_config(&CanvasConfig::default())
    }

    pub fn with_config(config: &CanvasConfig) -> Self {
        Self {
            state: CanvasState::with_config(config),
            viewport: Viewport::default(),
            gesture: GestureState::Idle,
            hovered: None,
            feedback: FeedbackChannel::new(config),
            router: ConnectionRouter::new(config),
            listeners: ListenerRegistry::new(),
        }
    }

    /// Replace the viewport (builder style).
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn feedback(&self) -> &FeedbackChannel {
        &self.feedback
    }

    /// Number of pointer listeners currently attached.
    pub fn active_listeners(&self) -> usize {
        self.listeners.active()
    }

    /// Dispatch a host event.
    pub fn handle_event(&mut self, event: CanvasEvent) -> EventOutcome {
        match event {
            CanvasEvent::PaletteDragStart { template } => match self.begin_place(&template) {
                Some(payload) => EventOutcome::Payload(payload),
                None => EventOutcome::Ignored,
            },
            CanvasEvent::CanvasDrop { position, payload } => self.drop_on_canvas(position, &payload).into(),
            CanvasEvent::GripDown { node_id, position } => self.begin_move(&node_id, position).into(),
            CanvasEvent::ResizeHandleDown { node_id, position } => self.begin_resize(&node_id, position).into(),
            CanvasEvent::ColumnDragStart { node_id, column_id } => self.begin_connect(&node_id, &column_id).into(),
            CanvasEvent::ColumnDragOver { node_id, column_id } => {
                self.drag_over_column(&node_id, &column_id);
                EventOutcome::Ignored
            }
            CanvasEvent::ColumnDragLeave { node_id, column_id } => {
                self.drag_leave_column(&node_id, &column_id);
                EventOutcome::Ignored
            }
            CanvasEvent::ColumnDrop { node_id, column_id } => {
                self.drop_on_column(&node_id, &column_id).is_some().into()
            }
            CanvasEvent::Move { position } => self.pointer_move(position).into(),
            CanvasEvent::Up { position } => self.pointer_up(position).into(),
            CanvasEvent::DragEnd => self.cancel().into(),
            CanvasEvent::Scroll { offset } => {
                self.scroll_to(offset);
                EventOutcome::Applied
            }
            CanvasEvent::SurfaceResize { origin, size } => {
                self.viewport.set_surface(origin, size);
                EventOutcome::Applied
            }
            CanvasEvent::RemoveNode { node_id } => self.remove_node(&node_id).into(),
        }
    }

    // --- Place ---

    /// Start dragging a palette template.
    ///
    /// Returns the payload the host must hand back on drop, or None if
    /// another gesture is in flight.
    pub fn begin_place(&mut self, template: &NodeTemplate) -> Option<DragPayload> {
        if !self.can_begin(GestureKind::Placing) {
            return None;
        }
        log::debug!("Place gesture started for {}", template.id);
        self.gesture = GestureState::Placing;
        Some(DragPayload::encode(template))
    }

    /// Drop a payload on the canvas at a viewport position.
    ///
    /// Returns true if a node was placed.
    pub fn drop_on_canvas(&mut self, client: Point, payload: &DragPayload) -> bool {
        match self.gesture.kind() {
            GestureKind::Connecting => {
                log::debug!("Connect gesture dropped outside any column");
                self.end_gesture();
                return false;
            }
            GestureKind::Moving | GestureKind::Resizing => {
                log::debug!("Ignoring drop during {:?}", self.gesture.kind());
                return false;
            }
            GestureKind::Idle | GestureKind::Placing => {}
        }
        self.end_gesture();

        if !self.viewport.contains_client(client) {
            log::debug!("Place gesture dropped outside the canvas at ({}, {})", client.x, client.y);
            return false;
        }

        let template = match payload.decode() {
            Ok(template) => template,
            Err(e) => {
                log::warn!("{}", e);
                self.feedback.notify(NotificationKind::Failure, MALFORMED_PAYLOAD_MESSAGE);
                return false;
            }
        };

        let position = self.viewport.client_to_canvas(client);
        match self.state.place_node(template, position) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{}", e);
                self.feedback.notify(NotificationKind::DuplicatePlacement, e.to_string());
                false
            }
        }
    }

    // --- Move ---

    /// Press on a node's grip. Returns true if the move gesture started.
    pub fn begin_move(&mut self, node_id: &str, client: Point) -> bool {
        if !self.can_begin(GestureKind::Moving) || !self.state.contains(node_id) {
            return false;
        }
        log::debug!(
            "Move gesture started for {} at ({}, {})",
            node_id,
            client.x,
            client.y
        );
        self.state.bring_to_front(node_id);
        self.gesture = GestureState::Moving {
            node_id: node_id.to_string(),
            capture: self.listeners.acquire(CaptureKind::Move),
        };
        true
    }

    // --- Resize ---

    /// Press on a node's resize handle. Returns true if the resize gesture started.
    pub fn begin_resize(&mut self, node_id: &str, client: Point) -> bool {
        if !self.can_begin(GestureKind::Resizing) {
            return false;
        }
        let Some(node) = self.state.node(node_id) else {
            return false;
        };
        let initial_size = node.size;
        let initial_pointer = self.viewport.client_to_canvas(client);
        log::debug!("Resize gesture started for {}", node_id);
        self.gesture = GestureState::Resizing {
            node_id: node_id.to_string(),
            initial_pointer,
            initial_size,
            capture: self.listeners.acquire(CaptureKind::Resize),
        };
        true
    }

    /// Pointer moved. Returns true if a node moved or resized.
    pub fn pointer_move(&mut self, client: Point) -> bool {
        let pointer = self.viewport.client_to_canvas(client);
        match &self.gesture {
            GestureState::Moving { node_id, .. } => self.state.move_node(node_id, pointer),
            GestureState::Resizing {
                node_id,
                initial_pointer,
                initial_size,
                ..
            } => {
                let size = gesture::resized(*initial_size, *initial_pointer, pointer);
                self.state.resize_node(node_id, size).is_some()
            }
            _ => false,
        }
    }

    /// Pointer released. Ends a move or resize and detaches its listener.
    pub fn pointer_up(&mut self, _client: Point) -> bool {
        if !self.gesture.is_spatial() {
            return false;
        }
        log::debug!("{:?} gesture finished", self.gesture.kind());
        self.end_gesture();
        true
    }

    // --- Connect ---

    /// Start dragging a column. Returns true if the connect gesture started.
    pub fn begin_connect(&mut self, node_id: &str, column_id: &str) -> bool {
        if !self.can_begin(GestureKind::Connecting) {
            return false;
        }
        let Some(column) = self.state.node(node_id).and_then(|n| n.template.column(column_id)) else {
            log::debug!("Cannot connect from unknown column {}.{}", node_id, column_id);
            return false;
        };
        log::debug!("Connect gesture started from {}.{}", node_id, column_id);
        self.gesture = GestureState::Connecting {
            origin: ColumnRef::new(node_id, column_id),
            origin_column: column.clone(),
        };
        true
    }

    /// A connect drag hovers a column. Returns whether that column is a valid target.
    pub fn drag_over_column(&mut self, node_id: &str, column_id: &str) -> bool {
        if self.gesture.connect_origin().is_none() {
            return false;
        }
        self.hovered = Some(ColumnRef::new(node_id, column_id));
        self.is_drop_target(node_id, column_id)
    }

    /// A connect drag left a column.
    pub fn drag_leave_column(&mut self, node_id: &str, column_id: &str) {
        if self
            .hovered
            .as_ref()
            .is_some_and(|h| h.node_id == node_id && h.column_id == column_id)
        {
            self.hovered = None;
        }
    }

    /// Drop a connect drag on a column.
    ///
    /// Returns the new connection's id. Drops on the origin node, on a
    /// column that is not on the canvas, and duplicates of an existing
    /// connection end the gesture silently.
    pub fn drop_on_column(&mut self, node_id: &str, column_id: &str) -> Option<ConnectionId> {
        if self.gesture.connect_origin().is_none() {
            return None;
        }
        self.hovered = None;
        let GestureState::Connecting { origin, origin_column } = std::mem::take(&mut self.gesture) else {
            return None;
        };

        if origin.node_id == node_id {
            log::debug!("Ignoring drop on origin node {}", node_id);
            return None;
        }
        let Some(target_node) = self.state.node(node_id) else {
            log::debug!("Connect gesture dropped on unknown node {}", node_id);
            return None;
        };
        let Some(target_column) = target_node.template.column(column_id) else {
            log::debug!("Connect gesture dropped on unknown column {}.{}", node_id, column_id);
            return None;
        };

        let origin_name = self.state.node(&origin.node_id).map_or(origin.node_id.as_str(), |n| n.name());
        let message = format!(
            "Connected {}.{} to {}.{}",
            origin_name,
            origin_column.name,
            target_node.name(),
            target_column.name
        );
        let id = self.state.add_connection(origin, ColumnRef::new(node_id, column_id))?;
        self.feedback.notify(NotificationKind::Connected, message);
        Some(id)
    }

    /// The column currently armed as a drop target, if any.
    pub fn drop_target(&self) -> Option<&ColumnRef> {
        let origin = self.gesture.connect_origin()?;
        self.hovered.as_ref().filter(|h| h.node_id != origin.node_id)
    }

    /// Check if a column should show the droppable affordance.
    pub fn is_drop_target(&self, node_id: &str, column_id: &str) -> bool {
        self.drop_target()
            .is_some_and(|t| t.node_id == node_id && t.column_id == column_id)
    }

    // --- Other operations ---

    /// Abandon whatever gesture is in flight without mutating the canvas.
    /// Returns true if a gesture was active.
    pub fn cancel(&mut self) -> bool {
        if !self.gesture.is_active() {
            return false;
        }
        log::debug!("{:?} gesture cancelled", self.gesture.kind());
        self.end_gesture();
        true
    }

    /// Remove a node and its connections.
    ///
    /// Refused while the node is being moved or resized. A connect drag
    /// that started on the node is cancelled.
    pub fn remove_node(&mut self, node_id: &str) -> bool {
        if self.gesture.spatial_target() == Some(node_id) {
            log::debug!("Refusing to remove {} during {:?}", node_id, self.gesture.kind());
            return false;
        }
        if self.gesture.connect_origin().is_some_and(|o| o.node_id == node_id) {
            self.end_gesture();
        }
        if self.hovered.as_ref().is_some_and(|h| h.node_id == node_id) {
            self.hovered = None;
        }
        self.state.remove_node(node_id).is_some()
    }

    /// Update the scroll offset of the canvas content.
    pub fn scroll_to(&mut self, offset: Vec2) {
        self.viewport.scroll_to(offset);
    }

    /// Run the notification clear if it is due.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.feedback.poll(now)
    }

    /// Poll against the current time.
    pub fn tick(&mut self) -> bool {
        self.feedback.tick()
    }

    /// Curve geometry for every resolvable connection.
    pub fn curves(&self) -> Vec<ConnectionCurve> {
        self.router.route(&self.state)
    }

    /// Snapshot everything the render surface needs.
    pub fn scene(&self) -> RenderScene {
        RenderScene {
            nodes: self
                .state
                .nodes()
                .map(|node| NodeView::from_node(node, |column_id| self.is_drop_target(node.id(), column_id)))
                .collect(),
            connections: self.curves(),
            notification: self.feedback.current().cloned(),
            gesture: self.gesture.kind(),
        }
    }

    fn can_begin(&self, kind: GestureKind) -> bool {
        if self.gesture.is_active() {
            log::debug!("Rejected {:?}: {:?} in progress", kind, self.gesture.kind());
            return false;
        }
        true
    }

    /// Return to idle. Dropping the old state releases any pointer capture.
    fn end_gesture(&mut self) {
        self.gesture = GestureState::Idle;
        self.hovered = None;
    }
}
