use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A language a document may be written in. Natural key: the ISO 639-1 code.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Language {
    pub language_id: i64,
    pub name: String,
    pub code_iso_639_1: String,
}
