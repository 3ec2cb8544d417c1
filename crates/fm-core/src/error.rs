use crate::id::{ConnectionId, FieldId};
use crate::model::Side;
use thiserror::Error;

/// Outcomes of a Mapping Store mutation that did not change state.
///
/// None of these are fatal. `SourceTaken`, `TargetTaken` and `UnknownField`
/// are rejections of `add_connection`; `NotFound` comes from
/// `remove_connection` when the connection is already gone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("Source field '{0}' is already mapped")]
    SourceTaken(FieldId),

    #[error("Target field '{0}' is already mapped")]
    TargetTaken(FieldId),

    #[error("Field '{id}' is not in the {side} catalog")]
    UnknownField { side: Side, id: FieldId },

    #[error("Connection '{0}' does not exist")]
    NotFound(ConnectionId),
}

impl MappingError {
    /// True for the errors `add_connection` uses to decline a mutation.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, MappingError::NotFound(_))
    }
}

/// Errors raised while building a field catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Failed to parse catalog JSON: {0}")]
    Json(String),

    #[error("Field '{id}' appears more than once in the {side} catalog")]
    DuplicateField { side: Side, id: String },
}

/// Errors raised while loading engine configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Failed to parse config JSON: {0}")]
    Json(String),

    #[error("Config value '{name}' must be finite and non-negative, got {value}")]
    Invalid { name: &'static str, value: f64 },
}
