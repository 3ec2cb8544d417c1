//! Drag-to-connect gesture state machine.
//!
//! ```text
//!   Idle ──begin_drag(unconnected source)──▶ Dragging
//!   Dragging ──move_to──▶ Dragging            (pointer + hover target updated)
//!   Dragging ──release──▶ Idle                (maybe adds a connection)
//!   Dragging ──cancel──▶ Idle                 (no mutation)
//! ```
//!
//! Only one gesture exists at a time; `begin_drag` while dragging is a no-op.
//! The machine never touches the connection set itself except through
//! `MappingStore::add_connection` on release.

use fm_core::model::{Connection, NodeRef, Side};
use fm_core::{EngineConfig, FieldId, MappingError, MappingStore};
use fm_render::GeometryProvider;
use fm_render::hit::{hit_test, hit_test_tolerant, nearest};
use kurbo::Point;
use serde::Serialize;

/// The in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    /// Field the edge starts from.
    pub source: FieldId,
    /// Where the press happened.
    pub origin: Point,
    /// Live endpoint of the dashed edge.
    pub pointer: Point,
    /// Unconnected target currently under (or near) the pointer.
    pub hovered: Option<FieldId>,
    /// Farthest the pointer has been from `origin` during this drag.
    travel: f64,
}

impl DragState {
    pub fn travel(&self) -> f64 {
        self.travel
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging(DragState),
}

impl GestureState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, GestureState::Dragging(_))
    }

    pub fn drag(&self) -> Option<&DragState> {
        match self {
            GestureState::Dragging(drag) => Some(drag),
            GestureState::Idle => None,
        }
    }
}

/// Cursor shown over the editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Cursor {
    Default,
    Crosshair,
}

/// Surface-wide styling that must hold exactly while a drag is active.
///
/// Derived from the gesture state rather than stored, so every exit from
/// `Dragging` (drop, miss, click, cancel) restores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceStyle {
    pub user_select: bool,
    pub cursor: Cursor,
}

impl SurfaceStyle {
    pub const IDLE: Self = Self {
        user_select: true,
        cursor: Cursor::Default,
    };
    pub const DRAGGING: Self = Self {
        user_select: false,
        cursor: Cursor::Crosshair,
    };
}

/// How a drag ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// A target was resolved and the store accepted the connection.
    Connected(Connection),
    /// A target was resolved but the store declined (e.g. stale hover).
    Rejected(MappingError),
    /// Press and release without meaningful travel and no target: a click.
    Clicked(FieldId),
    /// Released over nothing.
    Missed,
}

#[derive(Debug, Default)]
pub struct GestureMachine {
    state: GestureState,
}

impl GestureMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    pub fn surface_style(&self) -> SurfaceStyle {
        if self.is_dragging() {
            SurfaceStyle::DRAGGING
        } else {
            SurfaceStyle::IDLE
        }
    }

    /// Start dragging from `source`. Returns `true` if the machine entered
    /// `Dragging`.
    ///
    /// Ignored while already dragging, for fields outside the source catalog,
    /// and for sources that already have a connection.
    pub fn begin_drag(&mut self, store: &MappingStore, source: FieldId, pointer: Point) -> bool {
        if self.is_dragging() {
            log::debug!("begin_drag({source}) ignored: gesture already active");
            return false;
        }
        if !store.catalog(Side::Source).contains(source) || store.is_connected(source, Side::Source)
        {
            return false;
        }

        self.state = GestureState::Dragging(DragState {
            source,
            origin: pointer,
            pointer,
            hovered: None,
            travel: 0.0,
        });
        log::debug!("drag start from {source} at ({}, {})", pointer.x, pointer.y);
        true
    }

    /// Update the live endpoint and the hover target. Returns the hover
    /// target, or `None` when idle.
    pub fn move_to<G: GeometryProvider + ?Sized>(
        &mut self,
        store: &MappingStore,
        geometry: &G,
        config: &EngineConfig,
        pointer: Point,
    ) -> Option<FieldId> {
        let GestureState::Dragging(drag) = &mut self.state else {
            return None;
        };
        drag.pointer = pointer;
        drag.travel = drag.travel.max(drag.origin.distance(pointer));
        // A box under the pointer beats a neighbour whose radius reaches it.
        drag.hovered = hit_test(geometry, open_targets(store), pointer)
            .or_else(|| nearest(geometry, open_targets(store), pointer, config.hover_radius))
            .map(|node| node.id);
        log::trace!("drag move to ({}, {}), hover {:?}", pointer.x, pointer.y, drag.hovered);
        drag.hovered
    }

    /// Finish the drag at `pointer`. Returns `None` if no drag was active.
    ///
    /// The drop target is resolved from, in order: the current hover target,
    /// a direct hit on an unconnected target's box, then the same boxes grown
    /// by `drop_margin`. The machine is `Idle` afterwards in every case.
    pub fn release<G: GeometryProvider + ?Sized>(
        &mut self,
        store: &mut MappingStore,
        geometry: &G,
        config: &EngineConfig,
        pointer: Point,
    ) -> Option<DropOutcome> {
        let GestureState::Dragging(drag) = std::mem::take(&mut self.state) else {
            return None;
        };
        let travel = drag.travel.max(drag.origin.distance(pointer));

        let target = drag
            .hovered
            .filter(|&t| !store.is_connected(t, Side::Target))
            .or_else(|| hit_test(geometry, open_targets(store), pointer).map(|n| n.id))
            .or_else(|| {
                hit_test_tolerant(geometry, open_targets(store), pointer, config.drop_margin)
                    .map(|n| n.id)
            });

        let outcome = match target {
            Some(target) => match store.add_connection(drag.source, target) {
                Ok(conn) => DropOutcome::Connected(conn),
                Err(e) => {
                    log::debug!("drop of {} on {target} declined: {e}", drag.source);
                    DropOutcome::Rejected(e)
                }
            },
            None if travel <= config.click_slop => DropOutcome::Clicked(drag.source),
            None => DropOutcome::Missed,
        };
        log::debug!("drag end from {}: {outcome:?}", drag.source);
        Some(outcome)
    }

    /// Abandon the drag without mutating anything. Returns `true` if a drag
    /// was active.
    pub fn cancel(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            GestureState::Dragging(drag) => {
                log::debug!("drag from {} cancelled", drag.source);
                true
            }
            GestureState::Idle => false,
        }
    }
}

/// Target dots that can still receive a connection, in catalog order.
fn open_targets(store: &MappingStore) -> impl Iterator<Item = NodeRef> + '_ {
    store.unconnected(Side::Target).map(|f| NodeRef::target(f.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fm_core::{FieldCatalog, FieldDescriptor};
    use fm_render::NodeBoundsTable;
    use kurbo::Rect;

    fn id(s: &str) -> FieldId {
        FieldId::intern(s)
    }

    /// Sources a, b on the left at x=0; targets x, y on the right at x=200.
    fn setup() -> (MappingStore, NodeBoundsTable) {
        let source = FieldCatalog::new(
            Side::Source,
            vec![FieldDescriptor::new("a", "A"), FieldDescriptor::new("b", "B")],
        )
        .unwrap();
        let target = FieldCatalog::new(
            Side::Target,
            vec![FieldDescriptor::new("x", "X"), FieldDescriptor::new("y", "Y")],
        )
        .unwrap();
        let mut table = NodeBoundsTable::new();
        for (i, name) in ["a", "b"].iter().enumerate() {
            let y = i as f64 * 50.0;
            table.set(NodeRef::source(id(name)), Rect::new(0.0, y, 16.0, y + 16.0));
        }
        for (i, name) in ["x", "y"].iter().enumerate() {
            let y = i as f64 * 50.0;
            table.set(NodeRef::target(id(name)), Rect::new(200.0, y, 216.0, y + 16.0));
        }
        (MappingStore::new(source, target), table)
    }

    #[test]
    fn drag_and_drop_connects() {
        let (mut store, table) = setup();
        let config = EngineConfig::default();
        let mut machine = GestureMachine::new();

        assert!(machine.begin_drag(&store, id("a"), Point::new(8.0, 8.0)));
        assert_eq!(machine.surface_style(), SurfaceStyle::DRAGGING);
        machine.move_to(&store, &table, &config, Point::new(100.0, 30.0));
        assert_eq!(
            machine.move_to(&store, &table, &config, Point::new(205.0, 55.0)),
            Some(id("y"))
        );

        let outcome = machine
            .release(&mut store, &table, &config, Point::new(205.0, 55.0))
            .unwrap();
        match outcome {
            DropOutcome::Connected(conn) => {
                assert_eq!(conn.source, id("a"));
                assert_eq!(conn.target, id("y"));
            }
            other => panic!("expected Connected, got {other:?}"),
        }
        assert_eq!(*machine.state(), GestureState::Idle);
        assert_eq!(machine.surface_style(), SurfaceStyle::IDLE);
    }

    #[test]
    fn begin_drag_is_refused_for_connected_sources() {
        let (mut store, _) = setup();
        store.add_connection(id("a"), id("x")).unwrap();
        let mut machine = GestureMachine::new();
        assert!(!machine.begin_drag(&store, id("a"), Point::ZERO));
        assert!(!machine.is_dragging());
    }

    #[test]
    fn second_begin_drag_keeps_the_first_gesture() {
        let (store, _) = setup();
        let mut machine = GestureMachine::new();
        assert!(machine.begin_drag(&store, id("a"), Point::ZERO));
        assert!(!machine.begin_drag(&store, id("b"), Point::new(0.0, 50.0)));
        assert_eq!(machine.state().drag().map(|d| d.source), Some(id("a")));
    }

    #[test]
    fn connected_targets_never_receive_hover() {
        let (mut store, table) = setup();
        store.add_connection(id("b"), id("x")).unwrap();
        let config = EngineConfig::default();
        let mut machine = GestureMachine::new();
        machine.begin_drag(&store, id("a"), Point::ZERO);
        assert_eq!(
            machine.move_to(&store, &table, &config, Point::new(208.0, 8.0)),
            None
        );
        let outcome = machine
            .release(&mut store, &table, &config, Point::new(208.0, 8.0))
            .unwrap();
        assert_eq!(outcome, DropOutcome::Missed);
        assert_eq!(store.connections().len(), 1);
    }

    #[test]
    fn tolerant_drop_catches_imprecise_release() {
        let (mut store, table) = setup();
        let config = EngineConfig {
            hover_radius: 0.0,
            ..EngineConfig::default()
        };
        let mut machine = GestureMachine::new();
        machine.begin_drag(&store, id("a"), Point::ZERO);
        // 8px left of x's box: outside the box, inside the 12px margin.
        let release = Point::new(192.0, 8.0);
        machine.move_to(&store, &table, &config, release);
        let outcome = machine.release(&mut store, &table, &config, release).unwrap();
        assert!(matches!(outcome, DropOutcome::Connected(c) if c.target == id("x")));
    }

    #[test]
    fn release_on_the_right_edge_of_a_box_connects() {
        let (mut store, table) = setup();
        let config = EngineConfig {
            hover_radius: 0.0,
            drop_margin: 0.0,
            ..EngineConfig::default()
        };
        let mut machine = GestureMachine::new();
        machine.begin_drag(&store, id("a"), Point::new(8.0, 8.0));
        let edge = Point::new(216.0, 8.0);
        machine.move_to(&store, &table, &config, edge);
        let outcome = machine.release(&mut store, &table, &config, edge).unwrap();
        assert!(matches!(outcome, DropOutcome::Connected(c) if c.target == id("x")));
    }

    #[test]
    fn hover_prefers_the_box_under_the_pointer() {
        let (mut store, mut table) = setup();
        // y sits 24px below x, so x's hover radius reaches into y's box.
        table.set(NodeRef::target(id("y")), Rect::new(200.0, 24.0, 216.0, 40.0));
        let config = EngineConfig::default();
        let mut machine = GestureMachine::new();
        machine.begin_drag(&store, id("a"), Point::new(8.0, 8.0));

        let inside_y = Point::new(208.0, 25.0);
        assert_eq!(
            machine.move_to(&store, &table, &config, inside_y),
            Some(id("y"))
        );
        let outcome = machine.release(&mut store, &table, &config, inside_y).unwrap();
        assert!(matches!(outcome, DropOutcome::Connected(c) if c.target == id("y")));

        // Between the boxes the radius scan still resolves in catalog order.
        machine.begin_drag(&store, id("b"), Point::new(8.0, 58.0));
        store.remove_connection(store.connections()[0].id).unwrap();
        assert_eq!(
            machine.move_to(&store, &table, &config, Point::new(208.0, 20.0)),
            Some(id("x"))
        );
    }

    #[test]
    fn stale_hover_is_ignored_on_release() {
        let (mut store, table) = setup();
        let config = EngineConfig::default();
        let mut machine = GestureMachine::new();
        machine.begin_drag(&store, id("a"), Point::ZERO);
        machine.move_to(&store, &table, &config, Point::new(208.0, 8.0));

        // x gets taken through the menu path mid-drag.
        store.add_connection(id("b"), id("x")).unwrap();
        let outcome = machine
            .release(&mut store, &table, &config, Point::new(208.0, 8.0))
            .unwrap();
        assert_eq!(outcome, DropOutcome::Missed);
        assert_eq!(store.connections().len(), 1);
    }

    #[test]
    fn release_without_travel_is_a_click() {
        let (mut store, table) = setup();
        let config = EngineConfig::default();
        let mut machine = GestureMachine::new();
        machine.begin_drag(&store, id("b"), Point::new(8.0, 58.0));
        let outcome = machine
            .release(&mut store, &table, &config, Point::new(9.0, 58.0))
            .unwrap();
        assert_eq!(outcome, DropOutcome::Clicked(id("b")));
    }

    #[test]
    fn cancel_discards_the_drag() {
        let (store, _) = setup();
        let mut machine = GestureMachine::new();
        machine.begin_drag(&store, id("a"), Point::ZERO);
        assert!(machine.cancel());
        assert!(!machine.cancel());
        assert!(store.connections().is_empty());
        assert_eq!(machine.surface_style(), SurfaceStyle::IDLE);
    }
}
