//! View projection: connection set → per-field presentation flags.
//!
//! Everything here is a pure function of (previous connections, current
//! store). The animation class in particular comes from the transition
//! between the two sets, not from the current value, so it is reproducible
//! regardless of when the surface renders.

use fm_core::model::{Connection, NodeRef, Side};
use fm_core::{FieldId, MappingStore};
use serde::Serialize;
use std::collections::HashSet;

/// Entry/exit animation for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Animation {
    /// Connected now, was not at the previous render.
    Entered,
    /// Was connected at the previous render, is not now.
    Exited,
    None,
}

/// What the live preview shows for a target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PreviewContent {
    Real,
    Placeholder,
}

/// Presentation flags for one field row and its dot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub id: FieldId,
    pub side: Side,
    pub name: String,
    pub required: bool,
    /// Filled dot / highlighted row.
    pub active: bool,
    pub animation: Animation,
}

/// Preview slot for a target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreviewSlot {
    pub field: FieldId,
    pub content: PreviewContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub sources: Vec<FieldView>,
    pub targets: Vec<FieldView>,
    pub preview: Vec<PreviewSlot>,
}

/// The dots referenced by a connection list.
pub fn connected_set(connections: &[Connection]) -> HashSet<NodeRef> {
    connections
        .iter()
        .flat_map(|c| [NodeRef::source(c.source), NodeRef::target(c.target)])
        .collect()
}

/// Animation class for `node` given the connected sets before and after.
pub fn animation_for(
    previous: &HashSet<NodeRef>,
    current: &HashSet<NodeRef>,
    node: NodeRef,
) -> Animation {
    match (previous.contains(&node), current.contains(&node)) {
        (false, true) => Animation::Entered,
        (true, false) => Animation::Exited,
        _ => Animation::None,
    }
}

/// Project the store into view flags, diffing against `previous`.
pub fn project(store: &MappingStore, previous: &[Connection]) -> ViewState {
    let before = connected_set(previous);
    let after = connected_set(store.connections());

    let fields = |side: Side| -> Vec<FieldView> {
        store
            .catalog(side)
            .iter()
            .map(|f| {
                let node = NodeRef { side, id: f.id };
                FieldView {
                    id: f.id,
                    side,
                    name: f.name.clone(),
                    required: f.required,
                    active: after.contains(&node),
                    animation: animation_for(&before, &after, node),
                }
            })
            .collect()
    };

    let preview = store
        .catalog(Side::Target)
        .ids()
        .map(|field| PreviewSlot {
            field,
            content: if store.is_connected(field, Side::Target) {
                PreviewContent::Real
            } else {
                PreviewContent::Placeholder
            },
        })
        .collect();

    ViewState {
        sources: fields(Side::Source),
        targets: fields(Side::Target),
        preview,
    }
}

/// Remembers the connection set of the last render so each projection
/// reports transitions since then.
#[derive(Debug, Clone, Default)]
pub struct ViewProjector {
    last_rendered: Option<Vec<Connection>>,
}

impl ViewProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Project and mark the current set as rendered.
    ///
    /// The first projection diffs against itself, so initial connections do
    /// not animate in.
    pub fn project(&mut self, store: &MappingStore) -> ViewState {
        let current = store.connections();
        let previous = self.last_rendered.as_deref().unwrap_or(current);
        let view = project(store, previous);
        self.last_rendered = Some(current.to_vec());
        view
    }
}
