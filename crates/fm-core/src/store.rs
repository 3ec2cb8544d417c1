//! The Mapping Store: single source of truth for connections.
//!
//! Every mutation of the connection set goes through [`MappingStore::add_connection`]
//! or [`MappingStore::remove_connection`]. Both the drag gesture and the
//! click-to-manage menu call into these, so the one-to-one invariant is
//! enforced in exactly one place:
//!
//! - at most one connection per source field
//! - at most one connection per target field

use crate::error::MappingError;
use crate::id::{ConnectionId, FieldId};
use crate::model::{Connection, FieldCatalog, FieldDescriptor, Side};
use serde::Serialize;
use std::collections::HashMap;

/// Derived per-field "has a connection" flags.
///
/// A field gets an entry the first time it is connected and keeps it
/// (flipped to `false`) after disconnection, so "never set" and "unset" stay
/// distinguishable. Kept in step with the connection list by every mutation;
/// backs [`MappingStore::is_connected`] and is exposed to hosts through
/// [`MappingStore::connected_index`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectedFieldsIndex {
    flags: HashMap<(Side, FieldId), bool>,
}

impl ConnectedFieldsIndex {
    /// `None` if the field has never been connected.
    pub fn get(&self, side: Side, id: FieldId) -> Option<bool> {
        self.flags.get(&(side, id)).copied()
    }

    fn set(&mut self, side: Side, id: FieldId, connected: bool) {
        self.flags.insert((side, id), connected);
    }
}

/// How many required target fields currently have a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequiredCoverage {
    pub mapped: usize,
    pub total: usize,
}

impl RequiredCoverage {
    pub fn is_complete(&self) -> bool {
        self.mapped == self.total
    }
}

/// Holds the connection set for one editing session.
#[derive(Debug, Clone)]
pub struct MappingStore {
    source: FieldCatalog,
    target: FieldCatalog,
    /// Connections in insertion order.
    connections: Vec<Connection>,
    index: ConnectedFieldsIndex,
    /// Next raw connection id. Only ever increases.
    next_id: u64,
}

impl MappingStore {
    /// Create an empty store over the given catalogs.
    pub fn new(source: FieldCatalog, target: FieldCatalog) -> Self {
        Self {
            source,
            target,
            connections: Vec::new(),
            index: ConnectedFieldsIndex::default(),
            next_id: 1,
        }
    }

    /// Create a store seeded with initial `(source, target)` pairs.
    ///
    /// Seeds go through `add_connection`; pairs that would break the
    /// one-to-one invariant are skipped.
    pub fn with_connections(
        source: FieldCatalog,
        target: FieldCatalog,
        pairs: &[(FieldId, FieldId)],
    ) -> Self {
        let mut store = Self::new(source, target);
        for &(s, t) in pairs {
            if let Err(e) = store.add_connection(s, t) {
                log::debug!("skipping seed connection {s} -> {t}: {e}");
            }
        }
        store
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Connect `source` to `target`.
    ///
    /// Rejected unless both fields exist in their catalogs and neither
    /// currently has a connection.
    pub fn add_connection(
        &mut self,
        source: FieldId,
        target: FieldId,
    ) -> Result<Connection, MappingError> {
        if !self.source.contains(source) {
            return Err(MappingError::UnknownField {
                side: Side::Source,
                id: source,
            });
        }
        if !self.target.contains(target) {
            return Err(MappingError::UnknownField {
                side: Side::Target,
                id: target,
            });
        }
        if self.is_connected(source, Side::Source) {
            return Err(MappingError::SourceTaken(source));
        }
        if self.is_connected(target, Side::Target) {
            return Err(MappingError::TargetTaken(target));
        }

        let connection = Connection {
            id: ConnectionId::from_raw(self.next_id),
            source,
            target,
        };
        self.next_id += 1;
        self.connections.push(connection);
        self.index.set(Side::Source, source, true);
        self.index.set(Side::Target, target, true);

        log::debug!("connected {source} -> {target} as {}", connection.id);
        Ok(connection)
    }

    /// Remove a connection by id. A second removal of the same id returns
    /// `NotFound` and leaves the store untouched.
    pub fn remove_connection(&mut self, id: ConnectionId) -> Result<Connection, MappingError> {
        let pos = self
            .connections
            .iter()
            .position(|c| c.id == id)
            .ok_or(MappingError::NotFound(id))?;
        let connection = self.connections.remove(pos);
        self.index.set(Side::Source, connection.source, false);
        self.index.set(Side::Target, connection.target, false);

        log::debug!(
            "removed {id} ({} -> {})",
            connection.source,
            connection.target
        );
        Ok(connection)
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Whether any connection references `id` on `side`.
    pub fn is_connected(&self, id: FieldId, side: Side) -> bool {
        self.index.get(side, id).unwrap_or(false)
    }

    /// The connection referencing `id` on `side`, if any.
    pub fn connection_for(&self, id: FieldId, side: Side) -> Option<&Connection> {
        self.connections.iter().find(|c| c.endpoint(side) == id)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// All connections in insertion order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn catalog(&self, side: Side) -> &FieldCatalog {
        match side {
            Side::Source => &self.source,
            Side::Target => &self.target,
        }
    }

    /// Fields on `side` without a connection, in catalog order.
    pub fn unconnected(&self, side: Side) -> impl Iterator<Item = &FieldDescriptor> {
        self.catalog(side)
            .iter()
            .filter(move |f| !self.is_connected(f.id, side))
    }

    /// Target fields that can still receive a connection, in catalog order.
    pub fn available_targets(&self) -> Vec<&FieldDescriptor> {
        self.unconnected(Side::Target).collect()
    }

    pub fn connected_index(&self) -> &ConnectedFieldsIndex {
        &self.index
    }

    pub fn required_coverage(&self) -> RequiredCoverage {
        let required = self.target.iter().filter(|f| f.required);
        let (mapped, total) = required.fold((0, 0), |(mapped, total), f| {
            let hit = usize::from(self.is_connected(f.id, Side::Target));
            (mapped + hit, total + 1)
        });
        RequiredCoverage { mapped, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldDescriptor;
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> FieldId {
        FieldId::intern(s)
    }

    fn store() -> MappingStore {
        let source = FieldCatalog::new(
            Side::Source,
            vec![
                FieldDescriptor::new("a", "A"),
                FieldDescriptor::new("b", "B"),
            ],
        )
        .unwrap();
        let target = FieldCatalog::new(
            Side::Target,
            vec![
                FieldDescriptor::new("x", "X").required(),
                FieldDescriptor::new("y", "Y"),
            ],
        )
        .unwrap();
        MappingStore::new(source, target)
    }

    #[test]
    fn add_then_remove_restores_unconnected() {
        let mut store = store();
        let conn = store.add_connection(id("a"), id("x")).unwrap();
        assert!(store.is_connected(id("a"), Side::Source));
        assert!(store.is_connected(id("x"), Side::Target));

        store.remove_connection(conn.id).unwrap();
        assert!(!store.is_connected(id("a"), Side::Source));
        assert!(!store.is_connected(id("x"), Side::Target));
        assert!(store.connections().is_empty());
    }

    #[test]
    fn add_rejects_taken_source_and_target() {
        let mut store = store();
        store.add_connection(id("a"), id("x")).unwrap();
        let before = store.connections().to_vec();

        assert_eq!(
            store.add_connection(id("a"), id("y")),
            Err(MappingError::SourceTaken(id("a")))
        );
        assert_eq!(
            store.add_connection(id("b"), id("x")),
            Err(MappingError::TargetTaken(id("x")))
        );
        assert_eq!(store.connections(), before.as_slice());
    }

    #[test]
    fn add_rejects_fields_outside_the_catalogs() {
        let mut store = store();
        let err = store.add_connection(id("x"), id("y")).unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(
            err,
            MappingError::UnknownField {
                side: Side::Source,
                id: id("x"),
            }
        );
        assert!(store.add_connection(id("a"), id("a")).is_err());
    }

    #[test]
    fn second_remove_is_not_found() {
        let mut store = store();
        let conn = store.add_connection(id("b"), id("y")).unwrap();
        store.remove_connection(conn.id).unwrap();
        let err = store.remove_connection(conn.id).unwrap_err();
        assert_eq!(err, MappingError::NotFound(conn.id));
        assert!(!err.is_rejection());
        assert!(store.connections().is_empty());
    }

    #[test]
    fn connection_ids_are_never_reused() {
        let mut store = store();
        let first = store.add_connection(id("a"), id("x")).unwrap();
        store.remove_connection(first.id).unwrap();
        let second = store.add_connection(id("a"), id("x")).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn available_targets_keep_catalog_order() {
        let mut store = store();
        let names = |s: &MappingStore| -> Vec<String> {
            s.available_targets().iter().map(|f| f.name.clone()).collect()
        };
        assert_eq!(names(&store), vec!["X", "Y"]);
        store.add_connection(id("a"), id("x")).unwrap();
        assert_eq!(names(&store), vec!["Y"]);
    }

    #[test]
    fn index_distinguishes_never_set_from_unset() {
        let mut store = store();
        assert_eq!(store.connected_index().get(Side::Target, id("x")), None);
        let conn = store.add_connection(id("a"), id("x")).unwrap();
        assert_eq!(store.connected_index().get(Side::Target, id("x")), Some(true));
        store.remove_connection(conn.id).unwrap();
        assert_eq!(store.connected_index().get(Side::Target, id("x")), Some(false));
    }

    #[test]
    fn is_connected_agrees_with_the_connection_list() {
        let mut store = store();
        let conn = store.add_connection(id("a"), id("x")).unwrap();
        store.add_connection(id("b"), id("y")).unwrap();
        store.remove_connection(conn.id).unwrap();
        for side in [Side::Source, Side::Target] {
            for f in store.catalog(side).iter() {
                assert_eq!(
                    store.is_connected(f.id, side),
                    store.connection_for(f.id, side).is_some(),
                    "{side} {}",
                    f.id
                );
            }
        }
        assert!(!store.is_connected(id("unknown"), Side::Source));
    }

    #[test]
    fn seeds_obey_the_invariant() {
        let base = store();
        let store = MappingStore::with_connections(
            base.catalog(Side::Source).clone(),
            base.catalog(Side::Target).clone(),
            &[(id("a"), id("x")), (id("b"), id("x"))],
        );
        assert_eq!(store.connections().len(), 1);
        assert_eq!(store.connections()[0].id.to_string(), "conn-1");
    }

    #[test]
    fn required_coverage_counts_required_targets_only() {
        let mut store = store();
        assert_eq!(
            store.required_coverage(),
            RequiredCoverage {
                mapped: 0,
                total: 1
            }
        );
        store.add_connection(id("a"), id("y")).unwrap();
        assert!(!store.required_coverage().is_complete());
        store.add_connection(id("b"), id("x")).unwrap();
        assert!(store.required_coverage().is_complete());
    }
}
