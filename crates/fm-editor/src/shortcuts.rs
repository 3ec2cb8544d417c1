//! Keyboard shortcut mapping.
//!
//! Maps `KeyboardEvent.key` values to semantic `ShortcutAction`s so the
//! surface does not need to know the editor's state to route keys.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Abort the active drag, pending removal, or open menu.
    Cancel,
    /// Accept the pending removal.
    Confirm,
    /// Remove the connection under the pointer without confirmation.
    RemoveHovered,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key to an action. Returns `None` if the key has no binding.
    pub fn resolve(key: &str) -> Option<ShortcutAction> {
        match key {
            "Escape" | "Esc" => Some(ShortcutAction::Cancel),
            "Enter" => Some(ShortcutAction::Confirm),
            "Delete" | "Backspace" => Some(ShortcutAction::RemoveHovered),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_bindings() {
        assert_eq!(ShortcutMap::resolve("Escape"), Some(ShortcutAction::Cancel));
        assert_eq!(ShortcutMap::resolve("Enter"), Some(ShortcutAction::Confirm));
        assert_eq!(
            ShortcutMap::resolve("Backspace"),
            Some(ShortcutAction::RemoveHovered)
        );
        assert_eq!(ShortcutMap::resolve("z"), None);
    }
}
