//! Field catalogs and connections.
//!
//! Two flat, ordered catalogs (source and target) are supplied once per
//! editing session and never mutated. Connections reference one field from
//! each catalog.

use crate::error::CatalogError;
use crate::id::{ConnectionId, FieldId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ─── Sides ───────────────────────────────────────────────────────────────

/// Which catalog a field (or dot) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Source,
    Target,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Source => "source",
            Side::Target => "target",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "source" => Some(Side::Source),
            "target" => Some(Side::Target),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A connectable dot on the editing surface: a field id qualified by its side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    pub side: Side,
    pub id: FieldId,
}

impl NodeRef {
    pub fn source(id: FieldId) -> Self {
        Self {
            side: Side::Source,
            id,
        }
    }

    pub fn target(id: FieldId) -> Self {
        Self {
            side: Side::Target,
            id,
        }
    }
}

// ─── Field descriptors ───────────────────────────────────────────────────

/// One entry of a field catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: FieldId,
    pub name: String,
    /// Sample values shown next to a source column.
    #[serde(default, alias = "exampleContent", skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// Target fields may be marked required.
    #[serde(default)]
    pub required: bool,
}

impl FieldDescriptor {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: FieldId::intern(id),
            name: name.to_string(),
            example: None,
            required: false,
        }
    }

    pub fn with_example(mut self, example: &str) -> Self {
        self.example = Some(example.to_string());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// An ordered, immutable list of fields for one side.
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    side: Side,
    fields: Vec<FieldDescriptor>,
    positions: HashMap<FieldId, usize>,
}

impl FieldCatalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(side: Side, fields: Vec<FieldDescriptor>) -> Result<Self, CatalogError> {
        let mut positions = HashMap::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            if positions.insert(field.id, i).is_some() {
                return Err(CatalogError::DuplicateField {
                    side,
                    id: field.id.as_str().to_string(),
                });
            }
        }
        Ok(Self {
            side,
            fields,
            positions,
        })
    }

    /// Parse a catalog from a JSON array of field descriptors.
    pub fn from_json(side: Side, json: &str) -> Result<Self, CatalogError> {
        let fields: Vec<FieldDescriptor> =
            serde_json::from_str(json).map_err(|e| CatalogError::Json(e.to_string()))?;
        Self::new(side, fields)
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn get(&self, id: FieldId) -> Option<&FieldDescriptor> {
        self.positions.get(&id).map(|&i| &self.fields[i])
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Catalog order of a field.
    pub fn position(&self, id: FieldId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    /// Field ids in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.fields.iter().map(|f| f.id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ─── Connections ─────────────────────────────────────────────────────────

/// A single accepted mapping from one source field to one target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    #[serde(rename = "sourceId")]
    pub source: FieldId,
    #[serde(rename = "targetId")]
    pub target: FieldId,
}

impl Connection {
    /// The field this connection references on `side`.
    pub fn endpoint(&self, side: Side) -> FieldId {
        match side {
            Side::Source => self.source,
            Side::Target => self.target,
        }
    }
}
