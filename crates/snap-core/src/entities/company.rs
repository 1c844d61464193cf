use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A company that operates one or more services. Natural key: `name`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Company {
    pub company_id: i64,
    pub name: String,
    pub website: Option<String>,
    pub updated_at: DateTime<Utc>,
}
