pub mod config;
pub mod demo;
pub mod error;
pub mod id;
pub mod model;
pub mod store;

pub use config::EngineConfig;
pub use error::{CatalogError, ConfigError, MappingError};
pub use id::{ConnectionId, ConnectionIdError, FieldId};
pub use model::*;
pub use store::{ConnectedFieldsIndex, MappingStore, RequiredCoverage};
