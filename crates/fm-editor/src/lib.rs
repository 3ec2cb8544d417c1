pub mod editor;
pub mod gesture;
pub mod input;
pub mod manage;
pub mod shortcuts;
pub mod snapshot;
pub mod view;

pub use editor::{EditorEffect, Effects, MappingEditor, ProximityHint};
pub use gesture::{DropOutcome, GestureMachine, GestureState, SurfaceStyle};
pub use input::PointerEvent;
pub use snapshot::EditorSnapshot;
