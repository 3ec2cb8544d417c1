//! The mapping editor: routes surface input to the gesture machine, the
//! click-to-manage flow, and the Mapping Store.
//!
//! The editor owns all engine state for one session. The surface feeds it
//! pointer/key events plus a [`GeometryProvider`] that is re-read on every
//! call, and renders from [`MappingEditor::frame`]. Side effects the surface
//! must act on (open the dialog, open the menu, restyle the surface) come
//! back as [`EditorEffect`]s.

use crate::gesture::{DropOutcome, GestureMachine, GestureState, SurfaceStyle};
use crate::input::PointerEvent;
use crate::manage::{ManageFlow, ManageState, PendingRemoval, TargetMenu};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::snapshot::{self, EditorSnapshot};
use crate::view::ViewProjector;
use fm_core::model::{Connection, NodeRef, Side};
use fm_core::{ConnectionId, EngineConfig, FieldId, MappingError, MappingStore};
use fm_render::GeometryProvider;
use fm_render::curve::hit_test_connection;
use fm_render::hit::nearest;
use kurbo::Point;
use smallvec::SmallVec;

/// Something the surface (or its host) should react to.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEffect {
    Connected(Connection),
    Disconnected(Connection),
    /// The store declined a mutation. Normal interaction outcome; never
    /// shown to the user.
    Declined(MappingError),
    /// Show the confirmation dialog for this removal.
    ConfirmRemoval(PendingRemoval),
    /// Show the target selection menu.
    OpenTargetMenu(TargetMenu),
    /// Apply this surface style (selection lock and cursor).
    SurfaceStyle(SurfaceStyle),
}

pub type Effects = SmallVec<[EditorEffect; 2]>;

/// The idle "drag to connect" affordance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityHint {
    pub node: NodeRef,
    /// Pointer position the label follows.
    pub position: Point,
}

pub struct MappingEditor {
    store: MappingStore,
    config: EngineConfig,
    gesture: GestureMachine,
    manage: ManageFlow,
    projector: ViewProjector,
    hint: Option<ProximityHint>,
    hovered_connection: Option<ConnectionId>,
}

impl MappingEditor {
    pub fn new(store: MappingStore, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            gesture: GestureMachine::new(),
            manage: ManageFlow::new(),
            projector: ViewProjector::new(),
            hint: None,
            hovered_connection: None,
        }
    }

    // ─── State accessors ─────────────────────────────────────────────────

    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn gesture_state(&self) -> &GestureState {
        self.gesture.state()
    }

    pub fn manage_state(&self) -> &ManageState {
        self.manage.state()
    }

    pub fn surface_style(&self) -> SurfaceStyle {
        self.gesture.surface_style()
    }

    pub fn hint(&self) -> Option<ProximityHint> {
        self.hint
    }

    pub fn hovered_connection(&self) -> Option<ConnectionId> {
        self.hovered_connection
    }

    // ─── Pointer input ───────────────────────────────────────────────────

    /// Handle one pointer event. Geometry is queried during the call only.
    pub fn handle_pointer<G: GeometryProvider + ?Sized>(
        &mut self,
        event: PointerEvent,
        geometry: &G,
    ) -> Effects {
        let mut effects = Effects::new();
        let style_before = self.gesture.surface_style();

        match event {
            PointerEvent::Down { x, y, node } => {
                self.pointer_down(Point::new(x, y), node, &mut effects);
            }
            PointerEvent::Move { x, y } => self.pointer_move(Point::new(x, y), geometry),
            PointerEvent::Up { x, y } => self.pointer_up(Point::new(x, y), geometry, &mut effects),
            PointerEvent::Leave => {
                self.gesture.cancel();
                self.hint = None;
                self.hovered_connection = None;
            }
        }

        self.push_style_change(style_before, &mut effects);
        effects
    }

    fn pointer_down(&mut self, point: Point, node: Option<NodeRef>, effects: &mut Effects) {
        // The confirmation dialog is modal.
        if self.manage.pending_removal().is_some() {
            return;
        }
        if self.manage.menu().is_some() {
            self.manage.dismiss();
        }
        let Some(node) = node else {
            return;
        };
        if self.gesture.is_dragging() {
            log::debug!("pointer down on {} {} ignored mid-drag", node.side, node.id);
            return;
        }

        if self.store.is_connected(node.id, node.side) {
            if let Some(pending) = self.manage.request_removal(&self.store, node) {
                effects.push(EditorEffect::ConfirmRemoval(pending));
            }
            return;
        }

        if node.side == Side::Source && self.gesture.begin_drag(&self.store, node.id, point) {
            self.hint = None;
            self.hovered_connection = None;
        }
    }

    fn pointer_move<G: GeometryProvider + ?Sized>(&mut self, point: Point, geometry: &G) {
        if self.gesture.is_dragging() {
            self.gesture
                .move_to(&self.store, geometry, &self.config, point);
            return;
        }

        let candidates = self
            .store
            .unconnected(Side::Source)
            .map(|f| NodeRef::source(f.id))
            .chain(
                self.store
                    .unconnected(Side::Target)
                    .map(|f| NodeRef::target(f.id)),
            );
        self.hint = nearest(geometry, candidates, point, self.config.hint_radius)
            .map(|node| ProximityHint {
                node,
                position: point,
            });
        self.hovered_connection = hit_test_connection(
            geometry,
            self.store.connections(),
            point,
            self.config.connection_hit_width,
        );
    }

    fn pointer_up<G: GeometryProvider + ?Sized>(
        &mut self,
        point: Point,
        geometry: &G,
        effects: &mut Effects,
    ) {
        let Some(outcome) = self
            .gesture
            .release(&mut self.store, geometry, &self.config, point)
        else {
            return;
        };

        match outcome {
            DropOutcome::Connected(conn) => effects.push(EditorEffect::Connected(conn)),
            DropOutcome::Rejected(e) => effects.push(EditorEffect::Declined(e)),
            DropOutcome::Clicked(source) => {
                if let Some(menu) = self.manage.open_menu(&self.store, source) {
                    effects.push(EditorEffect::OpenTargetMenu(menu.clone()));
                }
            }
            DropOutcome::Missed => {}
        }
    }

    // ─── Dialog and menu results ─────────────────────────────────────────

    /// Feed back the confirmation dialog's answer.
    pub fn confirm_removal(&mut self, confirmed: bool) -> Effects {
        let mut effects = Effects::new();
        match self.manage.resolve_removal(&mut self.store, confirmed) {
            Some(Ok(Some(conn))) => self.push_disconnected(conn, &mut effects),
            Some(Err(e)) => effects.push(EditorEffect::Declined(e)),
            Some(Ok(None)) | None => {}
        }
        effects
    }

    /// Feed back the target menu's selection (`None` = dismissed).
    pub fn choose_target(&mut self, choice: Option<FieldId>) -> Effects {
        let mut effects = Effects::new();
        match self.manage.choose_target(&mut self.store, choice) {
            Some(Ok(Some(conn))) => effects.push(EditorEffect::Connected(conn)),
            Some(Err(e)) => effects.push(EditorEffect::Declined(e)),
            Some(Ok(None)) | None => {}
        }
        effects
    }

    // ─── Direct removal ──────────────────────────────────────────────────

    /// Remove a connection immediately, without the dialog (the delete
    /// button drawn on a hovered edge).
    pub fn remove_connection(&mut self, id: ConnectionId) -> Effects {
        let mut effects = Effects::new();
        match self.store.remove_connection(id) {
            Ok(conn) => self.push_disconnected(conn, &mut effects),
            Err(e) => effects.push(EditorEffect::Declined(e)),
        }
        effects
    }

    pub fn remove_hovered_connection(&mut self) -> Effects {
        match self.hovered_connection {
            Some(id) if !self.gesture.is_dragging() => self.remove_connection(id),
            _ => Effects::new(),
        }
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: &str) -> Effects {
        let Some(action) = ShortcutMap::resolve(key) else {
            return Effects::new();
        };
        match action {
            ShortcutAction::Cancel => {
                let mut effects = Effects::new();
                let style_before = self.gesture.surface_style();
                if !self.gesture.cancel() && self.manage.pending_removal().is_some() {
                    effects.extend(self.confirm_removal(false));
                } else {
                    self.manage.dismiss();
                }
                self.push_style_change(style_before, &mut effects);
                effects
            }
            ShortcutAction::Confirm if self.manage.pending_removal().is_some() => {
                self.confirm_removal(true)
            }
            ShortcutAction::Confirm => Effects::new(),
            ShortcutAction::RemoveHovered => self.remove_hovered_connection(),
        }
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Everything the surface needs to draw the current frame.
    ///
    /// Advances the view projector: entry/exit animations are reported
    /// relative to the previous `frame` call.
    pub fn frame<G: GeometryProvider + ?Sized>(&mut self, geometry: &G) -> EditorSnapshot {
        let fields = self.projector.project(&self.store);
        snapshot::build(self, fields, geometry)
    }

    // ─── Helpers ─────────────────────────────────────────────────────────

    fn push_disconnected(&mut self, conn: Connection, effects: &mut Effects) {
        if self.hovered_connection == Some(conn.id) {
            self.hovered_connection = None;
        }
        effects.push(EditorEffect::Disconnected(conn));
    }

    fn push_style_change(&self, before: SurfaceStyle, effects: &mut Effects) {
        let after = self.gesture.surface_style();
        if after != before {
            effects.push(EditorEffect::SurfaceStyle(after));
        }
    }
}
