use serde::Serialize;
use serde_json::Value;

use crate::error::{GantryError, GantryResult};

/// Data handed to the renderer for one module's templates.
///
/// A **Value Object**: built once from a typed record, never mutated. The
/// record's fields are the only names a template can see.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    value: Value,
}

impl RenderContext {
    /// Snapshot a serializable record.
    pub fn from_serialize<T: Serialize + ?Sized>(record: &T) -> GantryResult<Self> {
        let value = serde_json::to_value(record).map_err(|e| GantryError::Internal {
            message: format!("render context is not serializable: {e}"),
        })?;
        Ok(Self { value })
    }

    /// A context with no fields.
    pub fn empty() -> Self {
        Self {
            value: Value::Object(Default::default()),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }

    /// Look up a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.get(key)
    }
}
