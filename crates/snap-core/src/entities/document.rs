use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A document that is monitored for changes.
///
/// Natural key: `(service_id, name)`. `module` is the plugin module the
/// document was installed from; uninstalling that module removes it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Document {
    pub document_id: i64,
    pub service_id: i64,
    pub module: String,
    pub name: String,
    pub updated_at: DateTime<Utc>,
}
