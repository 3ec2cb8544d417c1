//! WASM bridge for FM — exposes the mapping engine to the JavaScript surface.
//!
//! Compiled via `wasm-pack build --target web`. The surface owns the DOM:
//! it reports dot boxes and pointer events here and draws from `frame()`.
//! Every call that can change state returns a JSON envelope:
//! `{"ok":true,"effects":[...]}` or `{"ok":false,"error":"..."}`.

use fm_core::model::{Connection, FieldCatalog, NodeRef, Side};
use fm_core::{ConnectionId, EngineConfig, FieldId, MappingStore};
use fm_editor::{EditorEffect, Effects, MappingEditor, PointerEvent};
use fm_render::NodeBoundsTable;
use kurbo::Rect;
use serde_json::{Value, json};
use wasm_bindgen::prelude::*;

/// The WASM-facing editor controller for one mapping session.
#[wasm_bindgen]
pub struct MappingCanvas {
    editor: MappingEditor,
    /// Dot boxes reported by the surface, in surface-local pixels.
    geometry: NodeBoundsTable,
}

#[wasm_bindgen]
impl MappingCanvas {
    /// Create a session over the built-in product-import catalogs.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<MappingCanvas, JsValue> {
        console_error_panic_hook_setup();
        let store = fm_core::demo::store().map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::from_store(store, EngineConfig::default()))
    }

    /// Create a session from JSON catalogs (arrays of `{id, name, example?,
    /// required?}`) and an optional JSON config (empty string = defaults).
    pub fn with_catalogs(
        source_json: &str,
        target_json: &str,
        config_json: &str,
    ) -> Result<MappingCanvas, JsValue> {
        console_error_panic_hook_setup();
        Self::from_json(source_json, target_json, config_json).map_err(|e| JsValue::from_str(&e))
    }

    // ─── Geometry ────────────────────────────────────────────────────────

    /// Record the box of a dot. Returns `false` for an unknown side.
    pub fn set_node_bounds(&mut self, side: &str, id: &str, x: f64, y: f64, w: f64, h: f64) -> bool {
        let Some(node) = node_ref(side, id) else {
            return false;
        };
        self.geometry
            .set(node, Rect::from_origin_size((x, y), (w, h)));
        true
    }

    /// Forget a dot's box (it unmounted).
    pub fn remove_node_bounds(&mut self, side: &str, id: &str) -> bool {
        node_ref(side, id).is_some_and(|node| self.geometry.remove(node).is_some())
    }

    pub fn clear_node_bounds(&mut self) {
        self.geometry.clear();
    }

    // ─── Pointer & keyboard ──────────────────────────────────────────────

    /// Pointer down. `side`/`id` name the dot under the pointer; pass empty
    /// strings when the press is not on a dot.
    pub fn handle_pointer_down(&mut self, x: f64, y: f64, side: &str, id: &str) -> String {
        let node = node_ref(side, id);
        self.pointer(PointerEvent::down(x, y, node))
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64) -> String {
        self.pointer(PointerEvent::moved(x, y))
    }

    pub fn handle_pointer_up(&mut self, x: f64, y: f64) -> String {
        self.pointer(PointerEvent::up(x, y))
    }

    pub fn handle_pointer_leave(&mut self) -> String {
        self.pointer(PointerEvent::Leave)
    }

    /// Keyboard input (`KeyboardEvent.key`).
    pub fn handle_key(&mut self, key: &str) -> String {
        effects_envelope(&self.editor.handle_key(key))
    }

    // ─── Dialog / menu / delete button ───────────────────────────────────

    pub fn confirm_removal(&mut self, confirmed: bool) -> String {
        effects_envelope(&self.editor.confirm_removal(confirmed))
    }

    /// Menu selection; empty string means the menu was dismissed.
    pub fn choose_target(&mut self, id: &str) -> String {
        let choice = (!id.is_empty()).then(|| FieldId::intern(id));
        effects_envelope(&self.editor.choose_target(choice))
    }

    /// Remove a connection directly (delete button on a hovered edge).
    pub fn remove_connection(&mut self, id: &str) -> String {
        match id.parse::<ConnectionId>() {
            Ok(id) => effects_envelope(&self.editor.remove_connection(id)),
            Err(e) => error_envelope(&e.to_string()),
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Full render state for the current frame as JSON.
    pub fn frame(&mut self) -> String {
        let snapshot = self.editor.frame(&self.geometry);
        match serde_json::to_string(&snapshot) {
            Ok(json) => json,
            Err(e) => error_envelope(&format!("Serialization error: {e}")),
        }
    }

    /// Current connections as a JSON array of `{id, sourceId, targetId}`.
    pub fn connections(&self) -> String {
        serde_json::to_string(self.editor.store().connections()).unwrap_or_else(|_| "[]".to_string())
    }

    /// `{"mapped":n,"total":m}` for required target fields.
    pub fn required_coverage(&self) -> String {
        let coverage = self.editor.store().required_coverage();
        json!({ "mapped": coverage.mapped, "total": coverage.total }).to_string()
    }
}

impl MappingCanvas {
    fn from_store(store: MappingStore, config: EngineConfig) -> Self {
        Self {
            editor: MappingEditor::new(store, config),
            geometry: NodeBoundsTable::new(),
        }
    }

    fn from_json(source_json: &str, target_json: &str, config_json: &str) -> Result<Self, String> {
        let source = FieldCatalog::from_json(Side::Source, source_json).map_err(|e| e.to_string())?;
        let target = FieldCatalog::from_json(Side::Target, target_json).map_err(|e| e.to_string())?;
        let config = if config_json.trim().is_empty() {
            EngineConfig::default()
        } else {
            EngineConfig::from_json(config_json).map_err(|e| e.to_string())?
        };
        log::debug!(
            "mapping session with {} source and {} target fields",
            source.len(),
            target.len()
        );
        Ok(Self::from_store(MappingStore::new(source, target), config))
    }

    fn pointer(&mut self, event: PointerEvent) -> String {
        effects_envelope(&self.editor.handle_pointer(event, &self.geometry))
    }
}

// ─── JSON helpers ────────────────────────────────────────────────────────

fn node_ref(side: &str, id: &str) -> Option<NodeRef> {
    if id.is_empty() {
        return None;
    }
    let side = Side::parse(side)?;
    Some(NodeRef {
        side,
        id: FieldId::intern(id),
    })
}

fn connection_json(conn: &Connection) -> Value {
    json!({
        "id": conn.id.to_string(),
        "sourceId": conn.source.as_str(),
        "targetId": conn.target.as_str(),
    })
}

fn effect_json(effect: &EditorEffect) -> Value {
    match effect {
        EditorEffect::Connected(conn) => {
            json!({ "type": "connected", "connection": connection_json(conn) })
        }
        EditorEffect::Disconnected(conn) => {
            json!({ "type": "disconnected", "connection": connection_json(conn) })
        }
        EditorEffect::Declined(e) => json!({ "type": "declined", "reason": e.to_string() }),
        EditorEffect::ConfirmRemoval(pending) => json!({
            "type": "confirmRemoval",
            "connectionId": pending.connection.to_string(),
        }),
        EditorEffect::OpenTargetMenu(menu) => json!({
            "type": "openTargetMenu",
            "sourceId": menu.source.as_str(),
            "options": menu.options.iter().map(|id| id.as_str()).collect::<Vec<_>>(),
        }),
        EditorEffect::SurfaceStyle(style) => json!({
            "type": "surfaceStyle",
            "style": serde_json::to_value(style).unwrap_or(Value::Null),
        }),
    }
}

fn effects_envelope(effects: &Effects) -> String {
    let effects: Vec<Value> = effects.iter().map(effect_json).collect();
    json!({ "ok": true, "effects": effects }).to_string()
}

fn error_envelope(message: &str) -> String {
    json!({ "ok": false, "error": message }).to_string()
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("FM WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SOURCES: &str = r#"[{"id": "a", "name": "A"}, {"id": "b", "name": "B"}]"#;
    const TARGETS: &str = r#"[{"id": "x", "name": "X", "required": true}]"#;

    fn canvas() -> MappingCanvas {
        let mut canvas = MappingCanvas::from_json(SOURCES, TARGETS, "").unwrap();
        canvas.set_node_bounds("source", "a", 0.0, 0.0, 16.0, 16.0);
        canvas.set_node_bounds("source", "b", 0.0, 40.0, 16.0, 16.0);
        canvas.set_node_bounds("target", "x", 200.0, 0.0, 16.0, 16.0);
        canvas
    }

    fn parse(json: &str) -> Value {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn drag_reports_connected_effect() {
        let mut canvas = canvas();
        let down = parse(&canvas.handle_pointer_down(8.0, 8.0, "source", "a"));
        assert_eq!(down["effects"][0]["type"], "surfaceStyle");

        let up = parse(&canvas.handle_pointer_up(208.0, 8.0));
        assert_eq!(up["ok"], true);
        assert_eq!(up["effects"][0]["type"], "connected");
        assert_eq!(up["effects"][0]["connection"]["targetId"], "x");
        assert_eq!(parse(&canvas.required_coverage()), json!({"mapped": 1, "total": 1}));
    }

    #[test]
    fn removal_goes_through_confirmation() {
        let mut canvas = canvas();
        canvas.handle_pointer_down(8.0, 8.0, "source", "a");
        canvas.handle_pointer_up(208.0, 8.0);

        let click = parse(&canvas.handle_pointer_down(208.0, 8.0, "target", "x"));
        assert_eq!(click["effects"][0]["type"], "confirmRemoval");
        let confirm = parse(&canvas.confirm_removal(true));
        assert_eq!(confirm["effects"][0]["type"], "disconnected");
        assert_eq!(canvas.connections(), "[]");
    }

    #[test]
    fn bad_input_is_reported_not_panicked() {
        let mut canvas = canvas();
        assert!(!canvas.set_node_bounds("middle", "a", 0.0, 0.0, 1.0, 1.0));
        let err = parse(&canvas.remove_connection("nope"));
        assert_eq!(err["ok"], false);
        assert!(MappingCanvas::from_json("[", TARGETS, "").is_err());
        assert!(MappingCanvas::from_json(SOURCES, TARGETS, r#"{"dropMargin": -2}"#).is_err());
        assert!(MappingCanvas::from_json(SOURCES, TARGETS, "[1, 2]").is_err());
    }

    #[test]
    fn frame_serializes_edges() {
        let mut canvas = canvas();
        canvas.handle_pointer_down(8.0, 48.0, "source", "b");
        canvas.handle_pointer_up(208.0, 8.0);
        let frame = parse(&canvas.frame());
        assert_eq!(frame["edges"][0]["sourceId"], "b");
        assert_eq!(frame["edges"][0]["path"], "M 8 48 C 108 48, 108 8, 208 8");
    }
}
