//! Custom metadata fields
//!
//! Field definitions are owned by the host platform; instance data is
//! mirrored here so the plugin can format and round-trip it.

pub mod field;
pub mod handler;

pub use field::{ColumnResolver, CustomFieldColumns, FieldDefinition, FieldType};
pub use handler::CustomFieldHandler;
