//! Connection routing: curve geometry between column anchors.

use crate::canvas::{CanvasState, Connection, ConnectionId, PlacedNode};
use crate::config::CanvasConfig;
use kurbo::{BezPath, CubicBez, Point};
use serde::{Deserialize, Serialize};

/// Render geometry for one connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionCurve {
    pub id: ConnectionId,
    /// Right edge of the source node, level with the source column.
    pub source_anchor: Point,
    /// Left edge of the target node, level with the target column.
    pub target_anchor: Point,
    pub control1: Point,
    pub control2: Point,
}

impl ConnectionCurve {
    pub fn to_cubic(&self) -> CubicBez {
        CubicBez::new(self.source_anchor, self.control1, self.control2, self.target_anchor)
    }

    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.source_anchor);
        path.curve_to(self.control1, self.control2, self.target_anchor);
        path
    }
}

/// Computes curve geometry for every connection from the current layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionRouter {
    header_height: f64,
    column_height: f64,
    control_near: f64,
    control_far: f64,
}

impl Default for ConnectionRouter {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

impl ConnectionRouter {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            header_height: config.header_height,
            column_height: config.column_height,
            control_near: config.curve_control_near,
            control_far: config.curve_control_far,
        }
    }

    /// Vertical offset of a column's anchor from the top of its node.
    pub fn column_offset(&self, index: usize) -> f64 {
        self.header_height + self.column_height * index as f64 + self.column_height / 2.0
    }

    /// Route every connection whose endpoints currently resolve.
    ///
    /// Connections with a missing node or column are skipped for this
    /// frame rather than treated as errors.
    pub fn route(&self, state: &CanvasState) -> Vec<ConnectionCurve> {
        state
            .connections()
            .iter()
            .filter_map(|connection| self.route_one(state, connection))
            .collect()
    }

    /// Route a single connection, or None if an endpoint is unresolved.
    pub fn route_one(&self, state: &CanvasState, connection: &Connection) -> Option<ConnectionCurve> {
        let source = self.resolve(state, &connection.source.node_id, &connection.source.column_id);
        let target = self.resolve(state, &connection.target.node_id, &connection.target.column_id);
        let (Some((source_node, source_index)), Some((target_node, target_index))) = (source, target) else {
            log::trace!("Skipping unresolved connection {}", connection.id);
            return None;
        };

        let source_bounds = source_node.bounds();
        let target_bounds = target_node.bounds();
        let source_anchor = Point::new(source_bounds.x1, source_bounds.y0 + self.column_offset(source_index));
        let target_anchor = Point::new(target_bounds.x0, target_bounds.y0 + self.column_offset(target_index));

        let dx = target_anchor.x - source_anchor.x;
        Some(ConnectionCurve {
            id: connection.id.clone(),
            source_anchor,
            target_anchor,
            control1: Point::new(source_anchor.x + dx * self.control_near, source_anchor.y),
            control2: Point::new(source_anchor.x + dx * self.control_far, target_anchor.y),
        })
    }

    fn resolve<'a>(&self, state: &'a CanvasState, node_id: &str, column_id: &str) -> Option<(&'a PlacedNode, usize)> {
        let node = state.node(node_id)?;
        let index = node.template.column_index(column_id)?;
        Some((node, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::ColumnRef;
    use crate::template::{Palette, PaletteSource};
    use kurbo::{ParamCurve, Size};

    fn assert_close(actual: Point, expected: Point) {
        assert!(
            (actual.x - expected.x).abs() < 1e-9 && (actual.y - expected.y).abs() < 1e-9,
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn sample_state() -> CanvasState {
        let palette = Palette::sample();
        let mut state = CanvasState::new();
        for (template, x) in palette.templates().iter().zip([0.0, 500.0]) {
            state.place_node(template.clone(), Point::new(x, 100.0)).unwrap();
        }
        state
    }

    #[test]
    fn test_column_offset() {
        let router = ConnectionRouter::default();
        assert!((router.column_offset(0) - 58.0).abs() < f64::EPSILON);
        assert!((router.column_offset(2) - 130.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_anchors_and_controls() {
        let mut state = sample_state();
        state.add_connection(ColumnRef::new("employees", "emp_dept"), ColumnRef::new("departments", "dept_id"));

        let curves = ConnectionRouter::default().route(&state);
        assert_eq!(curves.len(), 1);
        let curve = &curves[0];

        // employees: x 0..250, emp_dept is index 2
        assert_close(curve.source_anchor, Point::new(250.0, 230.0));
        // departments: x 500, dept_id is index 0
        assert_close(curve.target_anchor, Point::new(500.0, 158.0));
        assert_close(curve.control1, Point::new(350.0, 230.0));
        assert_close(curve.control2, Point::new(400.0, 158.0));
    }

    #[test]
    fn test_target_left_of_source() {
        let mut state = sample_state();
        state.add_connection(ColumnRef::new("departments", "dept_id"), ColumnRef::new("employees", "emp_id"));

        let curve = ConnectionRouter::default().route(&state).remove(0);
        // departments right edge 750, employees left edge 0
        assert!((curve.source_anchor.x - 750.0).abs() < 1e-9);
        assert!(curve.target_anchor.x.abs() < 1e-9);
        assert!((curve.control1.x - 450.0).abs() < 1e-9);
        assert!((curve.control2.x - 300.0).abs() < 1e-9);

        let cubic = curve.to_cubic();
        let mid = cubic.eval(0.5);
        assert!(mid.x.is_finite() && mid.y.is_finite());
        assert_close(cubic.eval(0.0), curve.source_anchor);
        assert_close(cubic.eval(1.0), curve.target_anchor);
    }

    #[test]
    fn test_anchor_follows_resize() {
        let mut state = sample_state();
        state.add_connection(ColumnRef::new("employees", "emp_id"), ColumnRef::new("departments", "dept_id"));
        state.resize_node("employees", Size::new(320.0, 200.0));

        let curve = ConnectionRouter::default().route(&state).remove(0);
        assert!((curve.source_anchor.x - 320.0).abs() < 1e-9);
    }

    #[test]
    fn test_unresolved_endpoints_are_skipped() {
        let mut state = sample_state();
        state.add_connection(ColumnRef::new("employees", "emp_id"), ColumnRef::new("departments", "dept_id"));
        state.add_connection(ColumnRef::new("employees", "nope"), ColumnRef::new("departments", "dept_id"));
        state.add_connection(ColumnRef::new("employees", "emp_id"), ColumnRef::new("ghost", "g1"));

        let curves = ConnectionRouter::default().route(&state);
        assert_eq!(curves.len(), 1);
        assert_eq!(curves[0].id.as_str(), "employees-emp_id-departments-dept_id");
    }

    #[test]
    fn test_path_has_one_curve() {
        let mut state = sample_state();
        state.add_connection(ColumnRef::new("employees", "emp_id"), ColumnRef::new("departments", "dept_id"));
        let path = ConnectionRouter::default().route(&state)[0].to_path();
        assert_eq!(path.elements().len(), 2);
    }
}
