use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A document in one language at one URL: the unit a `run` polls.
///
/// Natural key: `(document_id, language_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SnapshotJob {
    pub job_id: i64,
    pub document_id: i64,
    pub language_id: i64,
    pub url: String,
    pub is_enabled: bool,
    pub updated_at: DateTime<Utc>,
}

/// A snapshot job joined with its hierarchy names and latest snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct JobDetail {
    pub job_id: i64,
    pub document_id: i64,
    pub url: String,
    pub is_enabled: bool,
    pub module: String,
    pub company_name: String,
    pub service_name: String,
    pub document_name: String,
    pub language_name: String,
    pub language_code: String,
    pub latest_snapshot_id: Option<i64>,
    pub latest_snapshot_at: Option<DateTime<Utc>>,
    /// Only populated by queries that feed a run; listings leave it empty.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub latest_snapshot_text: Option<String>,
}

impl JobDetail {
    /// Human-readable label, e.g. `"Acme Cloud Terms of Use in English"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{} {} in {}",
            self.service_name, self.document_name, self.language_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_joins_service_document_and_language() {
        let detail = JobDetail {
            job_id: 1,
            document_id: 1,
            url: "https://acme.test/terms".into(),
            is_enabled: true,
            module: "acme.legal".into(),
            company_name: "Acme".into(),
            service_name: "Acme Cloud".into(),
            document_name: "Terms of Use".into(),
            language_name: "English".into(),
            language_code: "en".into(),
            latest_snapshot_id: None,
            latest_snapshot_at: None,
            latest_snapshot_text: None,
        };
        assert_eq!(detail.label(), "Acme Cloud Terms of Use in English");
    }
}
