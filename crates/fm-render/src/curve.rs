//! Connection curves between a source dot and a target dot.
//!
//! Each edge is a cubic Bézier leaving the source horizontally and arriving
//! at the target horizontally: both control points sit on the vertical line
//! through the midpoint, at the start and end heights respectively.

use crate::geometry::GeometryProvider;
use fm_core::model::{Connection, NodeRef};
use fm_core::ConnectionId;
use kurbo::{CubicBez, ParamCurve, ParamCurveNearest, Point};

/// Accuracy passed to kurbo's nearest-point solver.
const NEAREST_ACCURACY: f64 = 1e-3;

/// Build the curve from `start` to `end`.
pub fn connection_curve(start: Point, end: Point) -> CubicBez {
    let mid_x = (start.x + end.x) / 2.0;
    CubicBez::new(
        start,
        Point::new(mid_x, start.y),
        Point::new(mid_x, end.y),
        end,
    )
}

/// Where the delete affordance for a connection is drawn.
pub fn curve_midpoint(curve: &CubicBez) -> Point {
    curve.eval(0.5)
}

/// SVG path data (`M … C …`) for a curve.
pub fn svg_path(curve: &CubicBez) -> String {
    format!(
        "M {} {} C {} {}, {} {}, {} {}",
        curve.p0.x, curve.p0.y, curve.p1.x, curve.p1.y, curve.p2.x, curve.p2.y, curve.p3.x,
        curve.p3.y
    )
}

/// Curve for an existing connection, or `None` if either dot is unmeasured.
pub fn curve_for<G: GeometryProvider + ?Sized>(
    geometry: &G,
    connection: &Connection,
) -> Option<CubicBez> {
    let start = geometry.center(NodeRef::source(connection.source))?;
    let end = geometry.center(NodeRef::target(connection.target))?;
    Some(connection_curve(start, end))
}

/// Topmost connection whose curve passes within `hit_width / 2` of `point`.
///
/// Later connections are drawn over earlier ones, so the list is walked in
/// reverse.
pub fn hit_test_connection<G: GeometryProvider + ?Sized>(
    geometry: &G,
    connections: &[Connection],
    point: Point,
    hit_width: f64,
) -> Option<ConnectionId> {
    let half = hit_width / 2.0;
    connections.iter().rev().find_map(|conn| {
        let curve = curve_for(geometry, conn)?;
        let nearest = curve.nearest(point, NEAREST_ACCURACY);
        (nearest.distance_sq <= half * half).then_some(conn.id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::NodeBoundsTable;
    use fm_core::{FieldCatalog, FieldDescriptor, FieldId, MappingStore, Side};
    use kurbo::Rect;

    #[test]
    fn curve_leaves_and_arrives_horizontally() {
        let curve = connection_curve(Point::new(0.0, 0.0), Point::new(100.0, 50.0));
        assert_eq!(curve.p1, Point::new(50.0, 0.0));
        assert_eq!(curve.p2, Point::new(50.0, 50.0));
        let mid = curve_midpoint(&curve);
        assert!((mid.x - 50.0).abs() < 1e-9);
        assert!((mid.y - 25.0).abs() < 1e-9);
    }

    #[test]
    fn svg_path_lists_all_control_points() {
        let curve = connection_curve(Point::new(0.0, 0.0), Point::new(10.0, 4.0));
        assert_eq!(svg_path(&curve), "M 0 0 C 5 0, 5 4, 10 4");
    }

    #[test]
    fn connection_hover_uses_stroke_width() {
        let source = FieldCatalog::new(Side::Source, vec![FieldDescriptor::new("a", "A")]).unwrap();
        let target = FieldCatalog::new(Side::Target, vec![FieldDescriptor::new("x", "X")]).unwrap();
        let mut store = MappingStore::new(source, target);
        let conn = store
            .add_connection(FieldId::intern("a"), FieldId::intern("x"))
            .unwrap();

        let mut table = NodeBoundsTable::new();
        table.set(NodeRef::source(conn.source), Rect::new(-8.0, -8.0, 8.0, 8.0));
        table.set(NodeRef::target(conn.target), Rect::new(192.0, -8.0, 208.0, 8.0));

        // Straight horizontal curve along y = 0.
        let on_line = Point::new(100.0, 6.0);
        let off_line = Point::new(100.0, 12.0);
        assert_eq!(
            hit_test_connection(&table, store.connections(), on_line, 18.0),
            Some(conn.id)
        );
        assert_eq!(
            hit_test_connection(&table, store.connections(), off_line, 18.0),
            None
        );
    }
}
