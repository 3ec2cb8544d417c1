//! Click-to-manage: the non-drag path to editing connections.
//!
//! - Clicking a dot that already has a connection asks for confirmation
//!   before removing it (`PendingRemoval`).
//! - Clicking an unconnected source dot opens a menu of available targets;
//!   picking one connects directly.
//!
//! Both paths mutate only through `MappingStore`, so they share the
//! one-to-one checks with the drag gesture.

use fm_core::model::{Connection, NodeRef, Side};
use fm_core::{ConnectionId, FieldId, MappingError, MappingStore};
use serde::Serialize;

/// A connection waiting on the confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PendingRemoval {
    pub connection: ConnectionId,
}

/// The target selection menu opened from a source dot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetMenu {
    pub source: FieldId,
    /// Unconnected targets at the time the menu opened, in catalog order.
    pub options: Vec<FieldId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ManageState {
    #[default]
    Idle,
    ConfirmRemoval(PendingRemoval),
    ChooseTarget(TargetMenu),
}

#[derive(Debug, Default)]
pub struct ManageFlow {
    state: ManageState,
}

impl ManageFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ManageState {
        &self.state
    }

    pub fn pending_removal(&self) -> Option<PendingRemoval> {
        match self.state {
            ManageState::ConfirmRemoval(pending) => Some(pending),
            _ => None,
        }
    }

    pub fn menu(&self) -> Option<&TargetMenu> {
        match &self.state {
            ManageState::ChooseTarget(menu) => Some(menu),
            _ => None,
        }
    }

    /// Ask to remove the connection attached to `node`.
    ///
    /// Returns `None` (and leaves state alone) if the dot is unconnected.
    pub fn request_removal(&mut self, store: &MappingStore, node: NodeRef) -> Option<PendingRemoval> {
        let conn = store.connection_for(node.id, node.side)?;
        let pending = PendingRemoval {
            connection: conn.id,
        };
        log::debug!("removal of {} requested from {} {}", conn.id, node.side, node.id);
        self.state = ManageState::ConfirmRemoval(pending);
        Some(pending)
    }

    /// Apply the dialog's answer. `None` if nothing was pending.
    ///
    /// Confirm removes the connection (which may already be gone: `NotFound`);
    /// cancel only clears the pending removal.
    pub fn resolve_removal(
        &mut self,
        store: &mut MappingStore,
        confirmed: bool,
    ) -> Option<Result<Option<Connection>, MappingError>> {
        let pending = self.pending_removal()?;
        self.state = ManageState::Idle;
        if !confirmed {
            log::debug!("removal of {} cancelled", pending.connection);
            return Some(Ok(None));
        }
        Some(store.remove_connection(pending.connection).map(Some))
    }

    /// Open the target menu for an unconnected source.
    pub fn open_menu(&mut self, store: &MappingStore, source: FieldId) -> Option<&TargetMenu> {
        if !store.catalog(Side::Source).contains(source) || store.is_connected(source, Side::Source) {
            return None;
        }
        let options = store.available_targets().iter().map(|f| f.id).collect();
        self.state = ManageState::ChooseTarget(TargetMenu { source, options });
        log::debug!("target menu opened for {source}");
        self.menu()
    }

    /// Apply the menu's selection. `None` if no menu was open; `Some(Ok(None))`
    /// when the menu was dismissed without a choice.
    pub fn choose_target(
        &mut self,
        store: &mut MappingStore,
        choice: Option<FieldId>,
    ) -> Option<Result<Option<Connection>, MappingError>> {
        let ManageState::ChooseTarget(menu) = std::mem::take(&mut self.state) else {
            return None;
        };
        let Some(target) = choice else {
            return Some(Ok(None));
        };
        Some(store.add_connection(menu.source, target).map(Some))
    }

    /// Close any dialog or menu without acting on it.
    pub fn dismiss(&mut self) -> bool {
        !matches!(std::mem::take(&mut self.state), ManageState::Idle)
    }
}
