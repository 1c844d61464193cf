use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A product or service offered by a company. Natural key: `(company_id, name)`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Service {
    pub service_id: i64,
    pub company_id: i64,
    pub name: String,
    pub website: Option<String>,
    pub updated_at: DateTime<Utc>,
}
