//! Hit testing and proximity: point → field dot lookup.
//!
//! Candidates are scanned in the order given (callers pass catalog order),
//! and the first match wins. This is deliberately not "globally nearest":
//! two dots both within range resolve to the one listed first.
//!
//! Candidates with no measurable geometry are skipped.

use crate::geometry::GeometryProvider;
use fm_core::model::NodeRef;
use kurbo::{Point, Rect};

/// First candidate whose box contains `point`.
pub fn hit_test<G, I>(geometry: &G, candidates: I, point: Point) -> Option<NodeRef>
where
    G: GeometryProvider + ?Sized,
    I: IntoIterator<Item = NodeRef>,
{
    hit_test_tolerant(geometry, candidates, point, 0.0)
}

/// First candidate whose box, grown by `margin` on every side, contains `point`.
/// All four edges count as inside.
pub fn hit_test_tolerant<G, I>(
    geometry: &G,
    candidates: I,
    point: Point,
    margin: f64,
) -> Option<NodeRef>
where
    G: GeometryProvider + ?Sized,
    I: IntoIterator<Item = NodeRef>,
{
    candidates.into_iter().find(|&node| {
        geometry
            .bounds(node)
            .is_some_and(|r| contains_inclusive(r.inflate(margin, margin), point))
    })
}

/// `Rect::contains` excludes the right and bottom edges; dots are hit on all four.
fn contains_inclusive(r: Rect, p: Point) -> bool {
    p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
}

/// First candidate whose center lies within `radius` of `point`.
pub fn nearest<G, I>(geometry: &G, candidates: I, point: Point, radius: f64) -> Option<NodeRef>
where
    G: GeometryProvider + ?Sized,
    I: IntoIterator<Item = NodeRef>,
{
    let hit = candidates.into_iter().find(|&node| {
        geometry
            .center(node)
            .is_some_and(|c| c.distance(point) <= radius)
    });
    if let Some(node) = hit {
        log::trace!("proximity hit {} {} at ({}, {})", node.side, node.id, point.x, point.y);
    }
    hit
}
