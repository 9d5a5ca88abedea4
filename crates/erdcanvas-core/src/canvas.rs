//! Canvas state: placed nodes and the connections between their columns.

use crate::config::CanvasConfig;
use crate::template::{ColumnId, ColumnSpec, NodeId, NodeTemplate};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Canvas mutation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    #[error("Table {name} already exists in the grid")]
    DuplicatePlacement { id: NodeId, name: String },
}

/// A template instance positioned and sized on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedNode {
    #[serde(flatten)]
    pub template: NodeTemplate,
    /// Top-left corner in canvas coordinates.
    pub position: Point,
    pub size: Size,
}

impl PlacedNode {
    pub fn id(&self) -> &str {
        &self.template.id
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.template.columns
    }

    /// Bounding box in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }
}

/// One end of a connection: a column on a placed node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    pub node_id: NodeId,
    pub column_id: ColumnId,
}

impl ColumnRef {
    pub fn new(node_id: impl Into<NodeId>, column_id: impl Into<ColumnId>) -> Self {
        Self {
            node_id: node_id.into(),
            column_id: column_id.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node_id, self.column_id)
    }
}

/// Identifier of a connection, derived from its four endpoint fields.
///
/// The fields are joined with `-`, so ids containing `-` can collide
/// (`a-b.c` and `a.b-c` toward the same target). Use the endpoints, not
/// the id, when the distinction matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn from_endpoints(source: &ColumnRef, target: &ColumnRef) -> Self {
        Self(format!(
            "{}-{}-{}-{}",
            source.node_id, source.column_id, target.node_id, target.column_id
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A directed relationship between columns of two different nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub source: ColumnRef,
    pub target: ColumnRef,
}

impl Connection {
    /// Check if either endpoint sits on the given node.
    pub fn touches(&self, node_id: &str) -> bool {
        self.source.node_id == node_id || self.target.node_id == node_id
    }

    fn same_endpoints(&self, source: &ColumnRef, target: &ColumnRef) -> bool {
        self.source == *source && self.target == *target
    }
}

/// Authoritative model of the diagram.
///
/// At most one node exists per template id, and no connection is a
/// self-loop or a duplicate of another. Every mutation below completes in
/// a single call, so callers never observe a half-applied change.
#[derive(Debug, Clone)]
pub struct CanvasState {
    /// Placed nodes keyed by template id.
    nodes: HashMap<NodeId, PlacedNode>,
    /// Stacking order (back to front).
    z_order: Vec<NodeId>,
    /// Connections in creation order.
    connections: Vec<Connection>,
    default_size: Size,
    min_size: Size,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasState {
    /// Create an empty canvas with default node metrics.
    pub fn new() -> Self {
        Self::with_config(&CanvasConfig::default())
    }

    /// Create an empty canvas using the node metrics from `config`.
    pub fn with_config(config: &CanvasConfig) -> Self {
        Self {
            nodes: HashMap::new(),
            z_order: Vec::new(),
            connections: Vec::new(),
            default_size: config.default_node_size,
            min_size: config.min_node_size,
        }
    }

    /// Place a template on the canvas at `position` with the default size.
    pub fn place_node(&mut self, template: NodeTemplate, position: Point) -> Result<(), CanvasError> {
        if self.nodes.contains_key(&template.id) {
            return Err(CanvasError::DuplicatePlacement {
                id: template.id,
                name: template.name,
            });
        }

        log::info!("Placed node {} at ({}, {})", template.id, position.x, position.y);
        let id = template.id.clone();
        self.z_order.push(id.clone());
        self.nodes.insert(
            id,
            PlacedNode {
                template,
                position,
                size: self.default_size,
            },
        );
        Ok(())
    }

    /// Move a node. Returns false if the node does not exist.
    pub fn move_node(&mut self, id: &str, position: Point) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Resize a node, clamping each dimension to the minimum size.
    /// Returns the stored size, or None if the node does not exist.
    pub fn resize_node(&mut self, id: &str, size: Size) -> Option<Size> {
        let clamped = self.clamp_size(size);
        let node = self.nodes.get_mut(id)?;
        node.size = clamped;
        Some(clamped)
    }

    /// Apply the per-dimension size floor.
    pub fn clamp_size(&self, size: Size) -> Size {
        Size::new(size.width.max(self.min_size.width), size.height.max(self.min_size.height))
    }

    /// Remove a node together with every connection that references it.
    pub fn remove_node(&mut self, id: &str) -> Option<PlacedNode> {
        let node = self.nodes.remove(id)?;
        self.z_order.retain(|node_id| node_id != id);

        let before = self.connections.len();
        self.connections.retain(|c| !c.touches(id));
        log::info!(
            "Removed node {} and {} connection(s)",
            id,
            before - self.connections.len()
        );
        Some(node)
    }

    /// Connect two columns.
    ///
    /// Self-loops and exact duplicates are silently ignored and yield `None`.
    pub fn add_connection(&mut self, source: ColumnRef, target: ColumnRef) -> Option<ConnectionId> {
        if source.node_id == target.node_id {
            log::debug!("Ignoring self-connection on {}", source.node_id);
            return None;
        }
        if self.connections.iter().any(|c| c.same_endpoints(&source, &target)) {
            log::debug!("Ignoring duplicate connection {} -> {}", source, target);
            return None;
        }

        let id = ConnectionId::from_endpoints(&source, &target);
        log::info!("Connected {} -> {}", source, target);
        self.connections.push(Connection {
            id: id.clone(),
            source,
            target,
        });
        Some(id)
    }

    /// Remove the oldest connection with this id. Returns true if one existed.
    pub fn remove_connection(&mut self, id: &ConnectionId) -> bool {
        match self.connections.iter().position(|c| c.id == *id) {
            Some(index) => {
                let connection = self.connections.remove(index);
                log::info!("Disconnected {} -> {}", connection.source, connection.target);
                true
            }
            None => false,
        }
    }

    /// Bring a node to the front of the stacking order.
    pub fn bring_to_front(&mut self, id: &str) {
        if let Some(pos) = self.z_order.iter().position(|node_id| node_id == id) {
            let node_id = self.z_order.remove(pos);
            self.z_order.push(node_id);
        }
    }

    /// Get a node by id.
    pub fn node(&self, id: &str) -> Option<&PlacedNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Get nodes in stacking order (back to front).
    pub fn nodes(&self) -> impl Iterator<Item = &PlacedNode> {
        self.z_order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Connections with an endpoint on the given node.
    pub fn connections_for<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Connection> {
        self.connections.iter().filter(move |c| c.touches(node_id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
