//! Serializable per-frame output for the rendering surface.

use crate::editor::MappingEditor;
use crate::gesture::SurfaceStyle;
use crate::manage::{ManageState, PendingRemoval, TargetMenu};
use crate::view::ViewState;
use fm_core::model::{NodeRef, Side};
use fm_core::{ConnectionId, FieldId, RequiredCoverage};
use fm_render::GeometryProvider;
use fm_render::curve::{connection_curve, curve_for, curve_midpoint, svg_path};
use kurbo::Point;
use serde::Serialize;

/// Label shown next to the proximity hint.
pub const HINT_LABEL: &str = "Drag to connect";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pos {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for Pos {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// A committed connection, resolved to surface coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeView {
    pub id: ConnectionId,
    pub source_id: FieldId,
    pub target_id: FieldId,
    pub start: Pos,
    pub end: Pos,
    /// Anchor for the delete button.
    pub midpoint: Pos,
    pub path: String,
    pub hovered: bool,
}

/// The dashed edge following the pointer during a drag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftEdge {
    pub source_id: FieldId,
    pub start: Pos,
    pub end: Pos,
    pub hovered_target_id: Option<FieldId>,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HintView {
    pub field_id: FieldId,
    pub side: Side,
    pub position: Pos,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub edges: Vec<EdgeView>,
    pub draft: Option<DraftEdge>,
    pub fields: ViewState,
    pub hint: Option<HintView>,
    pub hovered_connection: Option<ConnectionId>,
    pub pending_removal: Option<PendingRemoval>,
    pub menu: Option<TargetMenu>,
    pub surface: SurfaceStyle,
    pub coverage: RequiredCoverage,
}

pub(crate) fn build<G: GeometryProvider + ?Sized>(
    editor: &MappingEditor,
    fields: ViewState,
    geometry: &G,
) -> EditorSnapshot {
    let store = editor.store();
    let hovered = editor.hovered_connection();

    // Edges with an unmeasured endpoint are not drawn this frame.
    let edges = store
        .connections()
        .iter()
        .filter_map(|conn| {
            let curve = curve_for(geometry, conn)?;
            Some(EdgeView {
                id: conn.id,
                source_id: conn.source,
                target_id: conn.target,
                start: curve.p0.into(),
                end: curve.p3.into(),
                midpoint: curve_midpoint(&curve).into(),
                path: svg_path(&curve),
                hovered: hovered == Some(conn.id),
            })
        })
        .collect();

    let draft = editor.gesture_state().drag().and_then(|drag| {
        let start = geometry.center(NodeRef::source(drag.source))?;
        let curve = connection_curve(start, drag.pointer);
        Some(DraftEdge {
            source_id: drag.source,
            start: start.into(),
            end: drag.pointer.into(),
            hovered_target_id: drag.hovered,
            path: svg_path(&curve),
        })
    });

    let hint = editor.hint().map(|hint| HintView {
        field_id: hint.node.id,
        side: hint.node.side,
        position: hint.position.into(),
        label: HINT_LABEL,
    });

    let manage = editor.manage_state();
    let pending_removal = match manage {
        ManageState::ConfirmRemoval(pending) => Some(*pending),
        _ => None,
    };
    let menu = match manage {
        ManageState::ChooseTarget(menu) => Some(menu.clone()),
        _ => None,
    };

    EditorSnapshot {
        edges,
        draft,
        fields,
        hint,
        hovered_connection: hovered,
        pending_removal,
        menu,
        surface: editor.surface_style(),
        coverage: store.required_coverage(),
    }
}
