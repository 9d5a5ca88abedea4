//! Render scene handed to the external render surface each frame.

use crate::canvas::PlacedNode;
use crate::feedback::Notification;
use crate::gesture::GestureKind;
use crate::router::ConnectionCurve;
use crate::template::{ColumnId, NodeId};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// A column row as the render surface should draw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnView {
    pub column_id: ColumnId,
    pub name: String,
    pub data_type: String,
    /// The column is under a connect drag from another node.
    pub is_drop_target: bool,
}

/// A placed node with absolute geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub id: NodeId,
    pub name: String,
    pub position: Point,
    pub size: Size,
    pub columns: Vec<ColumnView>,
}

impl NodeView {
    pub(crate) fn from_node(node: &PlacedNode, is_drop_target: impl Fn(&str) -> bool) -> Self {
        Self {
            id: node.id().to_string(),
            name: node.name().to_string(),
            position: node.position,
            size: node.size,
            columns: node
                .columns()
                .iter()
                .map(|column| ColumnView {
                    column_id: column.column_id.clone(),
                    name: column.name.clone(),
                    data_type: column.data_type.clone(),
                    is_drop_target: is_drop_target(&column.column_id),
                })
                .collect(),
        }
    }
}

/// Everything the render surface needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderScene {
    /// Nodes back to front.
    pub nodes: Vec<NodeView>,
    pub connections: Vec<ConnectionCurve>,
    pub notification: Option<Notification>,
    pub gesture: GestureKind,
}

impl RenderScene {
    pub fn node(&self, id: &str) -> Option<&NodeView> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
